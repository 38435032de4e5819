//! Option name grammar shared by both parsers: `[A-Za-z0-9._][A-Za-z0-9._-]*`.

fn is_first_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

pub(crate) fn is_name_char(c: char) -> bool {
    is_first_char(c) || c == '-'
}

pub(crate) fn is_option_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_first_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

/// Split the longest name prefix off `s`. Returns `None` if `s` does not
/// start with a valid name.
pub(crate) fn split_name(s: &str) -> Option<(&str, &str)> {
    let end = s.find(|c: char| !is_name_char(c)).unwrap_or(s.len());
    let (name, rest) = s.split_at(end);
    is_option_name(name).then_some((name, rest))
}
