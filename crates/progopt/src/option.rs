/// Number of values an option takes each time it is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` values per occurrence; `Fixed(0)` is a presence flag.
    Fixed(usize),
    /// One value per occurrence, accumulated over any number of occurrences.
    Composing,
}

impl Arity {
    /// Values carried by a single occurrence.
    pub fn per_occurrence(self) -> usize {
        match self {
            Self::Fixed(n) => n,
            Self::Composing => 1,
        }
    }
}

impl Default for Arity {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

/// Descriptor of one configurable setting.
///
/// Options are built once, before any parsing, and then shared behind an
/// `Arc`. Registries and value sets identify an option by its allocation,
/// not by its key strings; keys only matter when matching raw input.
///
/// ```
/// use progopt::OptionDef;
///
/// let verbose = OptionDef::new("verbose", "more output")
///     .set_shortkey("v")
///     .set_narg(0);
/// assert!(verbose.matches("v", true));
/// assert!(!verbose.matches("v", false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionDef {
    keys: Vec<String>,
    shortkeys: Vec<String>,
    help: String,
    arity: Arity,
    overwriting: bool,
    default_value: Option<String>,
    implicit_value: Option<String>,
}

impl OptionDef {
    /// Create an option with a primary long key and help text.
    pub fn new(key: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            help: help.into(),
            ..Self::default()
        }
        .add_key(key)
    }

    /// Add a long key alias. Empty keys are ignored.
    pub fn add_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.is_empty() {
            self.keys.push(key);
        }
        self
    }

    /// Replace all short keys with `key`.
    pub fn set_shortkey(mut self, key: impl Into<String>) -> Self {
        self.shortkeys.clear();
        self.add_shortkey(key)
    }

    /// Add a short key. Empty keys are ignored.
    pub fn add_shortkey(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.is_empty() {
            self.shortkeys.push(key);
        }
        self
    }

    pub fn set_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn set_implicit_value(mut self, value: impl Into<String>) -> Self {
        self.implicit_value = Some(value.into());
        self
    }

    /// Allow repeated occurrences, each contributing one value.
    ///
    /// Clears `overwriting`.
    pub fn set_composing(mut self) -> Self {
        self.arity = Arity::Composing;
        self.overwriting = false;
        self
    }

    /// Allow repeated occurrences, each replacing the previous values.
    ///
    /// Clears `composing`: any earlier `set_composing` is discarded and the
    /// arity becomes `Fixed(1)`. A fixed arity is kept.
    pub fn set_overwriting(mut self) -> Self {
        if self.arity == Arity::Composing {
            self.arity = Arity::Fixed(1);
        }
        self.overwriting = true;
        self
    }

    /// Require exactly `n` values per occurrence. Clears `composing`.
    pub fn set_narg(mut self, n: usize) -> Self {
        self.arity = Arity::Fixed(n);
        self
    }

    /// Primary long key, or `""` if the option was built without one.
    pub fn key(&self) -> &str {
        self.keys.first().map(String::as_str).unwrap_or("")
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// First short key, or `""` if there is none.
    pub fn shortkey(&self) -> &str {
        self.shortkeys.first().map(String::as_str).unwrap_or("")
    }

    pub fn shortkeys(&self) -> &[String] {
        &self.shortkeys
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Values carried by one occurrence of this option.
    pub fn narg(&self) -> usize {
        self.arity.per_occurrence()
    }

    pub fn is_composing(&self) -> bool {
        self.arity == Arity::Composing
    }

    pub fn is_overwriting(&self) -> bool {
        self.overwriting
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub(crate) fn default_slice(&self) -> Option<&[String]> {
        self.default_value.as_ref().map(std::slice::from_ref)
    }

    pub fn implicit_value(&self) -> Option<&str> {
        self.implicit_value.as_deref()
    }

    /// Whether `key` is one of the long keys, or one of the short keys when
    /// `use_shortkeys` is set. Matching is exact and case-sensitive.
    pub fn matches(&self, key: &str, use_shortkeys: bool) -> bool {
        let keys = if use_shortkeys {
            &self.shortkeys
        } else {
            &self.keys
        };
        keys.iter().any(|k| k == key)
    }

    /// Flag spellings: `--key` for each long key, then `-k` for each short key.
    pub fn flags(&self) -> impl Iterator<Item = String> + '_ {
        self.keys
            .iter()
            .map(|k| format!("--{k}"))
            .chain(self.shortkeys.iter().map(|k| format!("-{k}")))
    }
}
