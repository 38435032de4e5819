use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{OptionError, Result};
use crate::name::{is_option_name, split_name};
use crate::option_set::OptionSet;
use crate::value_set::ValueSet;

/// One classified config line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment,
    Section(&'a str),
    Assign { key: &'a str, value: &'a str },
}

fn classify(line: &str) -> Option<Line<'_>> {
    if line.is_empty() {
        return Some(Line::Blank);
    }
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return Some(Line::Comment);
    }
    if let Some(name) = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return is_option_name(name).then_some(Line::Section(name));
    }

    let (key, rest) = split_name(trimmed)?;
    let value = rest.trim_start().strip_prefix('=')?.trim_start();
    Some(Line::Assign {
        key,
        value: unquote(value),
    })
}

/// Strip one pair of matching surrounding `'` or `"` quotes.
fn unquote(value: &str) -> &str {
    for q in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse `key=value` lines with optional `[section]` headers.
///
/// A section header prefixes the keys that follow it with `section.`; keys
/// are looked up among long keys only. Empty lines and lines starting with
/// `#` are skipped. Each assignment stores one value, so the usual write
/// policy applies: a plain option may only be assigned once.
pub fn parse_config<R: BufRead>(reader: R, options: &OptionSet) -> Result<ValueSet> {
    let mut values = ValueSet::new();
    let mut section = String::new();
    let mut count = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        count = lineno;

        match classify(&line) {
            Some(Line::Blank | Line::Comment) => {}
            Some(Line::Section(name)) => {
                tracing::trace!(section = name, lineno, "config section");
                section = format!("{name}.");
            }
            Some(Line::Assign { key, value }) => {
                let key = format!("{section}{key}");
                options
                    .find_option(&key, false)
                    .and_then(|opt| values.put_value(opt, value))
                    .map_err(|source| OptionError::InLine {
                        lineno,
                        line: line.clone(),
                        source: Box::new(source),
                    })?;
            }
            None => return Err(OptionError::MalformedLine { lineno, line }),
        }
    }

    tracing::debug!(lines = count, options = values.len(), "parsed config");
    Ok(values)
}

/// Open `path` and parse it with [`parse_config`]. Errors carry the path.
pub fn parse_config_file(path: impl AsRef<Path>, options: &OptionSet) -> Result<ValueSet> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading config file");
    File::open(path)
        .map_err(OptionError::from)
        .and_then(|file| parse_config(BufReader::new(file), options))
        .map_err(|source| OptionError::File {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::OptionDef;
    use std::io::{Cursor, Read};
    use std::sync::Arc;

    fn parse(text: &str, options: &OptionSet) -> Result<ValueSet> {
        parse_config(Cursor::new(text.as_bytes()), options)
    }

    #[test]
    fn classify_lines() {
        assert_eq!(classify(""), Some(Line::Blank));
        assert_eq!(classify("   \t"), None);
        assert_eq!(classify("  # note = x"), Some(Line::Comment));
        assert_eq!(classify("[one]"), Some(Line::Section("one")));
        assert_eq!(classify(" [one]"), None);
        assert_eq!(classify("[one] "), None);
        assert_eq!(classify("[]"), None);
        assert_eq!(
            classify("  a.b =  x y "),
            Some(Line::Assign {
                key: "a.b",
                value: "x y "
            })
        );
        assert_eq!(
            classify("empty="),
            Some(Line::Assign {
                key: "empty",
                value: ""
            })
        );
        assert_eq!(classify("no equals"), None);
        assert_eq!(classify("=value"), None);
    }

    #[test]
    fn unquote_matching_pairs_only() {
        assert_eq!(unquote("'val with spaces'"), "val with spaces");
        assert_eq!(unquote("\"x\""), "x");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("'x\""), "'x\"");
        assert_eq!(unquote("'x"), "'x");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn sections_prefix_keys() {
        let setting = Arc::new(OptionDef::new("one.setting", ""));
        let option = Arc::new(OptionDef::new("one.option", ""));
        let no_dot = Arc::new(OptionDef::new("no_dot", ""));
        let mut options = OptionSet::new();
        options.add(&setting).add(&option).add(&no_dot);

        let values = parse(
            "no_dot=5\n[one]\nsetting=hei\noption=hi\n",
            &options,
        )
        .unwrap();

        assert_eq!(values.len(), 3);
        assert_eq!(values.value(&no_dot, 0).unwrap(), "5");
        assert_eq!(values.value(&setting, 0).unwrap(), "hei");
        assert_eq!(values.value(&option, 0).unwrap(), "hi");
    }

    #[test]
    fn quoted_values_and_comments() {
        let key = Arc::new(OptionDef::new("sec.key", ""));
        let other = Arc::new(OptionDef::new("sec.other", ""));
        let mut options = OptionSet::new();
        options.add(&key).add(&other);

        let values = parse(
            "# leading comment\n\n[sec]\n  # indented comment\nkey='val with spaces'\nother = \"x'\r\n",
            &options,
        )
        .unwrap();
        assert_eq!(values.value(&key, 0).unwrap(), "val with spaces");
        assert_eq!(values.value(&other, 0).unwrap(), "\"x'");
    }

    #[test]
    fn round_trip_simple_section() {
        let key = Arc::new(OptionDef::new("sec.key", ""));
        let mut options = OptionSet::new();
        options.add(&key);

        let values = parse("[sec]\nkey=val\n", &options).unwrap();
        assert_eq!(values.value(&key, 0).unwrap(), "val");
    }

    #[test]
    fn short_keys_are_not_addressable() {
        let verbose = Arc::new(OptionDef::new("verbose", "").set_shortkey("v"));
        let mut options = OptionSet::new();
        options.add(&verbose);

        let err = parse("v=1\n", &options).unwrap_err();
        let OptionError::InLine { lineno, line, source } = err else {
            panic!("expected InLine error");
        };
        assert_eq!(lineno, 1);
        assert_eq!(line, "v=1");
        assert!(matches!(*source, OptionError::UnknownOption { ref key } if key == "v"));
    }

    #[test]
    fn write_policy_applies_per_line() {
        let name = Arc::new(OptionDef::new("name", ""));
        let include = Arc::new(OptionDef::new("include", "").set_composing());
        let mut options = OptionSet::new();
        options.add(&name).add(&include);

        let values = parse("include=a\ninclude=b\n", &options).unwrap();
        assert_eq!(values.values(&include).unwrap(), ["a", "b"]);

        let err = parse("name=a\nname=b\n", &options).unwrap_err();
        assert!(matches!(
            err,
            OptionError::InLine { lineno: 2, ref source, .. }
                if matches!(**source, OptionError::AlreadySet { .. })
        ));
        assert_eq!(
            err.to_string(),
            "line 2 'name=b': option 'name' already set and not composing or overwriting"
        );
    }

    #[test]
    fn malformed_line_reports_number_and_text() {
        let options = OptionSet::new();
        let err = parse("# ok\n\nthis is not valid\n", &options).unwrap_err();
        assert!(matches!(
            err,
            OptionError::MalformedLine { lineno: 3, ref line } if line == "this is not valid"
        ));
        assert_eq!(err.to_string(), "bad line 3: this is not valid");
    }

    #[test]
    fn whitespace_only_line_is_malformed() {
        let k = Arc::new(OptionDef::new("k", ""));
        let mut options = OptionSet::new();
        options.add(&k);

        let err = parse("k=1\n   \n", &options).unwrap_err();
        assert!(matches!(
            err,
            OptionError::MalformedLine { lineno: 2, ref line } if line == "   "
        ));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn read_errors_surface_as_io() {
        let options = OptionSet::new();
        let err = parse_config(std::io::BufReader::new(FailingReader), &options).unwrap_err();
        assert!(matches!(err, OptionError::Io(_)));
    }

    #[test]
    fn missing_file_is_wrapped_with_path() {
        let options = OptionSet::new();
        let path = std::env::temp_dir().join("progopt-does-not-exist.conf");
        let err = parse_config_file(&path, &options).unwrap_err();
        let OptionError::File { path: p, source } = err else {
            panic!("expected File error");
        };
        assert_eq!(p, path);
        assert!(matches!(*source, OptionError::Io(_)));
    }

    #[test]
    fn file_errors_wrap_the_inner_message() {
        let options = OptionSet::new();
        let path = std::env::temp_dir().join(format!(
            "progopt-config-test-{}.conf",
            std::process::id()
        ));
        std::fs::write(&path, "bogus\n").unwrap();

        let err = parse_config_file(&path, &options).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("while reading '"), "{msg}");
        assert!(msg.ends_with("bad line 1: bogus"), "{msg}");

        let _ = std::fs::remove_file(&path);
    }
}
