use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{OptionError, Result};
use crate::option::OptionDef;

/// Options are keyed by the address of their shared allocation. The entry
/// keeps its own `Arc`, so the address stays valid while it is in the map.
fn identity(opt: &OptionDef) -> usize {
    opt as *const OptionDef as usize
}

#[derive(Debug, Clone)]
struct Entry {
    option: Arc<OptionDef>,
    values: Vec<String>,
}

/// Values supplied for a set of options, in supply order.
///
/// Writes go through [`put`](Self::put) and [`put_implicit`](Self::put_implicit),
/// which enforce each option's write policy:
/// - plain options may be written once
/// - composing options take one value per write and accumulate
/// - overwriting options replace their values on every write
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    entries: IndexMap<usize, Entry>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self, opt: &OptionDef) -> bool {
        self.entries.contains_key(&identity(opt))
    }

    /// Stored values, ignoring defaults.
    pub fn get(&self, opt: &OptionDef) -> Option<&[String]> {
        self.entries
            .get(&identity(opt))
            .map(|e| e.values.as_slice())
    }

    /// Stored values, or the default as a single value if never written.
    pub fn values<'a>(&'a self, opt: &'a OptionDef) -> Result<&'a [String]> {
        self.get(opt)
            .or_else(|| opt.default_slice())
            .ok_or_else(|| not_set(opt))
    }

    /// Value at `index`. The default only stands in for index 0 of an option
    /// that was never written.
    pub fn value<'a>(&'a self, opt: &'a OptionDef, index: usize) -> Result<&'a str> {
        let found = match self.get(opt) {
            Some(values) => values.get(index).map(String::as_str),
            None if index == 0 => opt.default_value(),
            None => None,
        };
        found.ok_or_else(|| not_set(opt))
    }

    /// Find a stored option by long key, or by short key if `use_shortkey`.
    pub fn find(&self, key: &str, use_shortkey: bool) -> Option<&Arc<OptionDef>> {
        self.entries
            .values()
            .map(|e| &e.option)
            .find(|opt| opt.matches(key, use_shortkey))
    }

    /// Store `values` for `opt`, following its write policy.
    pub fn put(&mut self, opt: &Arc<OptionDef>, values: Vec<String>) -> Result<()> {
        if opt.is_composing() {
            if values.len() != 1 {
                return Err(OptionError::ArityMismatch {
                    key: opt.key().to_string(),
                    expected: 1,
                    got: values.len(),
                });
            }
        } else if self.is_set(opt) && !opt.is_overwriting() {
            return Err(OptionError::AlreadySet {
                key: opt.key().to_string(),
            });
        }

        let entry = self.entries.entry(identity(opt)).or_insert_with(|| Entry {
            option: Arc::clone(opt),
            values: Vec::new(),
        });
        if opt.is_overwriting() {
            entry.values.clear();
        }
        entry.values.extend(values);
        Ok(())
    }

    /// Store a single value for `opt`.
    pub fn put_value(&mut self, opt: &Arc<OptionDef>, value: impl Into<String>) -> Result<()> {
        self.put(opt, vec![value.into()])
    }

    /// Store the implicit value of a single-value option.
    pub fn put_implicit(&mut self, opt: &Arc<OptionDef>) -> Result<()> {
        let Some(implicit) = opt.implicit_value() else {
            return Err(OptionError::NoImplicitValue {
                key: opt.key().to_string(),
            });
        };
        if opt.narg() != 1 {
            return Err(OptionError::ImplicitArityMismatch {
                key: opt.key().to_string(),
                narg: opt.narg(),
            });
        }
        self.put_value(opt, implicit)
    }

    /// Merge `other` into this set.
    ///
    /// Fails with `AlreadySet` if both sets hold a value for the same option;
    /// in that case nothing from `other` is merged.
    pub fn add(&mut self, other: ValueSet) -> Result<()> {
        if let Some(dup) = other
            .entries
            .iter()
            .find(|(id, _)| self.entries.contains_key(*id))
        {
            return Err(OptionError::AlreadySet {
                key: dup.1.option.key().to_string(),
            });
        }
        self.entries.extend(other.entries);
        Ok(())
    }

    /// Set options with their stored values, in first-write order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<OptionDef>, &[String])> {
        self.entries
            .values()
            .map(|e| (&e.option, e.values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn not_set(opt: &OptionDef) -> OptionError {
    OptionError::NotSet {
        key: opt.key().to_string(),
    }
}
