use std::sync::Arc;

use crate::error::{OptionError, Result};
use crate::option::OptionDef;
use crate::value_set::ValueSet;

/// Ordered registry of the options a program understands.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    options: Vec<Arc<OptionDef>>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `opt`. The set shares the option; it does not copy it.
    pub fn add(&mut self, opt: &Arc<OptionDef>) -> &mut Self {
        self.options.push(Arc::clone(opt));
        self
    }

    /// First registered option matching `key` in the long or short namespace.
    pub fn find_option(&self, key: &str, use_shortkey: bool) -> Result<&Arc<OptionDef>> {
        self.options
            .iter()
            .find(|opt| opt.matches(key, use_shortkey))
            .ok_or_else(|| OptionError::UnknownOption {
                key: key.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<OptionDef>> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// One line per option: its flags, the help text and the default.
    pub fn help(&self) -> String {
        let mut out = String::new();
        for opt in &self.options {
            out.push_str(&show_flags(opt));
            out.push_str(&format!(": {}", opt.help()));
            if let Some(default_value) = opt.default_value() {
                out.push_str(&format!(" (default: {default_value})"));
            }
            out.push('\n');
        }
        out
    }

    /// Every option set in `values`, in registration order, with its values.
    pub fn dump(&self, values: &ValueSet) -> String {
        let mut out = String::new();
        for opt in &self.options {
            let Some(stored) = values.get(opt) else {
                continue;
            };
            out.push_str(&show_flags(opt));
            out.push('\n');
            for v in stored {
                out.push_str(&format!("  => '{v}'\n"));
            }
        }
        out
    }
}

fn show_flags(opt: &OptionDef) -> String {
    opt.flags().collect::<Vec<_>>().join(" / ")
}
