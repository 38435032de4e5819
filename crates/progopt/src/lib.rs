//! Declarative option parsing for command lines and `key=value` config files.
//!
//! Programs declare their settings as [`OptionDef`]s, register them in an
//! [`OptionSet`], and hand raw input to one of the parsers:
//! - [`parse_command_line`] for `--long`/`-short` flags, collecting the
//!   leftover tokens as positional arguments
//! - [`parse_config`] / [`parse_config_file`] for `[section]` and `key=value` text
//!
//! Both produce a [`ValueSet`], which enforces that each option receives the
//! right number of values exactly once unless it is composing or overwriting.
//! Leftover positional tokens can be assigned afterwards with a
//! [`PositionalConsumer`].
//!
//! ```
//! use std::sync::Arc;
//! use progopt::{OptionDef, OptionSet, parse_command_line};
//!
//! let help = Arc::new(OptionDef::new("help", "show help").set_shortkey("h").set_narg(0));
//! let size = Arc::new(OptionDef::new("size", "width and height").set_narg(2));
//! let mut options = OptionSet::new();
//! options.add(&help).add(&size);
//!
//! let (values, positional) = parse_command_line(&["--size", "3", "4", "-h", "file"], &options)?;
//! assert!(values.is_set(&help));
//! assert_eq!(values.values(&size)?, ["3", "4"]);
//! assert_eq!(positional, ["file"]);
//! # Ok::<(), progopt::OptionError>(())
//! ```

mod command_line;
mod config;
mod error;
mod name;
mod option;
mod option_set;
mod positional;
mod value_set;

pub use command_line::parse_command_line;
pub use config::{parse_config, parse_config_file};
pub use error::{OptionError, Result};
pub use option::{Arity, OptionDef};
pub use option_set::OptionSet;
pub use positional::PositionalConsumer;
pub use value_set::ValueSet;
