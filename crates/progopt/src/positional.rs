use std::sync::Arc;

use crate::error::{OptionError, Result};
use crate::option::OptionDef;
use crate::value_set::ValueSet;

/// Cursor over leftover positional tokens that assigns them to options.
///
/// ```
/// use std::sync::Arc;
/// use progopt::{OptionDef, OptionSet, PositionalConsumer, parse_command_line};
///
/// let input = Arc::new(OptionDef::new("input", "file to read"));
/// let extra = Arc::new(OptionDef::new("extra", "more files").set_composing());
/// let mut options = OptionSet::new();
/// options.add(&input).add(&extra);
///
/// let (mut values, positional) = parse_command_line(&["a.txt", "b.txt"], &options)?;
/// let mut consumer = PositionalConsumer::new(&mut values, &positional);
/// consumer.consume(&input)?.consume(&extra)?;
/// assert!(consumer.done());
/// assert_eq!(values.value(&extra, 0)?, "b.txt");
/// # Ok::<(), progopt::OptionError>(())
/// ```
#[derive(Debug)]
pub struct PositionalConsumer<'a> {
    values: &'a mut ValueSet,
    positional: &'a [String],
    next: usize,
}

impl<'a> PositionalConsumer<'a> {
    pub fn new(values: &'a mut ValueSet, positional: &'a [String]) -> Self {
        Self {
            values,
            positional,
            next: 0,
        }
    }

    /// Claim tokens for `opt`.
    ///
    /// A composing option takes one token per call. Any other option takes
    /// `narg` tokens, unless it is already set, in which case nothing is
    /// claimed.
    pub fn consume(&mut self, opt: &Arc<OptionDef>) -> Result<&mut Self> {
        if !opt.is_composing() && self.values.is_set(opt) {
            tracing::trace!(option = opt.key(), "already set, skipping");
            return Ok(self);
        }

        let needed = opt.narg();
        let remaining = self.remaining();
        if remaining.len() < needed {
            return Err(OptionError::OutOfTokens {
                key: opt.key().to_string(),
                needed,
                remaining: remaining.len(),
            });
        }
        let taken = remaining[..needed].to_vec();
        self.values.put(opt, taken)?;
        self.next += needed;
        Ok(self)
    }

    /// Tokens not yet claimed.
    pub fn remaining(&self) -> &'a [String] {
        &self.positional[self.next..]
    }

    pub fn done(&self) -> bool {
        self.next == self.positional.len()
    }

    pub fn dump(&self) -> String {
        let mut out = String::from("remaining positional arguments:\n");
        for p in self.remaining() {
            out.push_str(&format!(" -> '{p}'\n"));
        }
        out
    }
}
