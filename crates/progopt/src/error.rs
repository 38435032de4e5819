use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while declaring, parsing or reading options.
///
/// Every failure is terminal for the operation that produced it; nothing is
/// retried or recovered internally.
#[derive(Debug, Error)]
pub enum OptionError {
    #[error("no such option '{key}'")]
    UnknownOption { key: String },

    #[error("option '{key}' expects {expected} value(s) per occurrence, got {got}")]
    ArityMismatch {
        key: String,
        expected: usize,
        got: usize,
    },

    #[error("option '{key}' takes {narg} value(s); an implicit value needs narg 1")]
    ImplicitArityMismatch { key: String, narg: usize },

    #[error("option '{key}' expects {expected} value(s), only {available} left")]
    MissingArgument {
        key: String,
        expected: usize,
        available: usize,
    },

    #[error("option '{key}' does not take a value")]
    UnexpectedValue { key: String },

    #[error("option '{key}' already set and not composing or overwriting")]
    AlreadySet { key: String },

    #[error("option '{key}' does not have an implicit value")]
    NoImplicitValue { key: String },

    #[error("option '{key}' not set and without default")]
    NotSet { key: String },

    #[error("bad line {lineno}: {line}")]
    MalformedLine { lineno: usize, line: String },

    #[error("line {lineno} '{line}': {source}")]
    InLine {
        lineno: usize,
        line: String,
        #[source]
        source: Box<OptionError>,
    },

    #[error("positional arguments exhausted for option '{key}': need {needed}, {remaining} left")]
    OutOfTokens {
        key: String,
        needed: usize,
        remaining: usize,
    },

    #[error("error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("while reading '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<OptionError>,
    },
}

pub type Result<T, E = OptionError> = std::result::Result<T, E>;
