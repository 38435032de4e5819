use std::sync::Arc;

use crate::error::{OptionError, Result};
use crate::name::is_option_name;
use crate::option::{Arity, OptionDef};
use crate::option_set::OptionSet;
use crate::value_set::ValueSet;

/// A token shaped like `-name`, `--name`, `-name=value` or `--name=value`.
#[derive(Debug, PartialEq, Eq)]
struct Flag<'a> {
    short: bool,
    name: &'a str,
    value: Option<&'a str>,
}

fn split_flag(arg: &str) -> Option<Flag<'_>> {
    let (short, rest) = match arg.strip_prefix("--") {
        Some(rest) => (false, rest),
        None => (true, arg.strip_prefix('-')?),
    };
    let (name, value) = match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    };
    is_option_name(name).then_some(Flag { short, name, value })
}

/// Parse `args` (without the program name) against `options`.
///
/// Returns the collected values and the tokens that did not match the flag
/// grammar, in order. After a bare `--` every token is positional; the `--`
/// itself is dropped.
///
/// - `-name` looks `name` up among short keys, `--name` among long keys
/// - `--name=value` supplies one value; only single-value and composing
///   options accept it
/// - without `=`, an implicit value is used if there is one, a zero-arity
///   option stores `""`, and otherwise the option takes its values from the
///   following tokens
pub fn parse_command_line<S: AsRef<str>>(
    args: &[S],
    options: &OptionSet,
) -> Result<(ValueSet, Vec<String>)> {
    tracing::debug!(args = args.len(), "parsing command line");

    let mut values = ValueSet::new();
    let mut positional = Vec::new();
    let mut end_of_options = false;

    let mut i = 0usize;
    while i < args.len() {
        let arg = args[i].as_ref();
        i += 1;

        if arg == "--" {
            end_of_options = true;
            continue;
        }

        let flag = if end_of_options {
            None
        } else {
            split_flag(arg)
        };
        let Some(flag) = flag else {
            tracing::trace!(arg, "positional argument");
            positional.push(arg.to_string());
            continue;
        };

        let opt = options.find_option(flag.name, flag.short)?;
        tracing::trace!(option = opt.key(), "matched option");
        i += take_values(&mut values, opt, flag.value, &args[i..])?;
    }

    tracing::debug!(
        options = values.len(),
        positional = positional.len(),
        "parsed command line"
    );
    Ok((values, positional))
}

/// Store the value(s) for one occurrence of `opt`; returns how many of the
/// `following` tokens were consumed.
fn take_values<S: AsRef<str>>(
    values: &mut ValueSet,
    opt: &Arc<OptionDef>,
    attached: Option<&str>,
    following: &[S],
) -> Result<usize> {
    if let Some(value) = attached {
        match opt.arity() {
            Arity::Fixed(0) => {
                return Err(OptionError::UnexpectedValue {
                    key: opt.key().to_string(),
                });
            }
            Arity::Fixed(n) if n != 1 => {
                return Err(OptionError::ArityMismatch {
                    key: opt.key().to_string(),
                    expected: n,
                    got: 1,
                });
            }
            _ => values.put_value(opt, value)?,
        }
        return Ok(0);
    }

    if opt.implicit_value().is_some() {
        values.put_implicit(opt)?;
        return Ok(0);
    }

    let needed = match opt.arity() {
        Arity::Fixed(0) => {
            values.put_value(opt, String::new())?;
            return Ok(0);
        }
        Arity::Fixed(n) => n,
        Arity::Composing => 1,
    };
    if following.len() < needed {
        return Err(OptionError::MissingArgument {
            key: opt.key().to_string(),
            expected: needed,
            available: following.len(),
        });
    }
    let taken = following[..needed]
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    values.put(opt, taken)?;
    Ok(needed)
}
