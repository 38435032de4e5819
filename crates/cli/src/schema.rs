use anyhow::{Context, Result, bail};
use progopt::OptionDef;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Option declarations loaded from a JSON schema file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub options: Vec<OptionSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionSchema {
    /// Primary long key (e.g. `server.port`).
    pub key: String,
    /// Additional long keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub short: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    /// Values per occurrence; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narg: Option<usize>,
    #[serde(default)]
    pub composing: bool,
    #[serde(default)]
    pub overwriting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit_value: Option<String>,
}

impl OptionSchema {
    pub fn to_option(&self) -> Result<OptionDef> {
        if self.key.trim().is_empty() {
            bail!("option key is empty");
        }
        if self.composing && self.overwriting {
            bail!(
                "option '{}' cannot be both composing and overwriting",
                self.key
            );
        }
        if self.composing && self.narg.is_some_and(|n| n != 1) {
            bail!("composing option '{}' takes one value per occurrence", self.key);
        }
        if self.implicit_value.is_some() && self.narg.is_some_and(|n| n != 1) {
            bail!("implicit value for '{}' requires narg 1", self.key);
        }

        let mut opt = OptionDef::new(&self.key, &self.help);
        for alias in &self.aliases {
            opt = opt.add_key(alias);
        }
        for short in &self.short {
            opt = opt.add_shortkey(short);
        }
        if let Some(n) = self.narg {
            opt = opt.set_narg(n);
        }
        if self.composing {
            opt = opt.set_composing();
        }
        if self.overwriting {
            opt = opt.set_overwriting();
        }
        if let Some(v) = &self.default_value {
            opt = opt.set_default_value(v);
        }
        if let Some(v) = &self.implicit_value {
            opt = opt.set_implicit_value(v);
        }
        Ok(opt)
    }
}

impl Schema {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schema: {}", path.display()))?;
        Self::from_str(&contents)
            .with_context(|| format!("invalid schema: {}", path.display()))
    }

    pub fn from_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("failed to parse schema JSON")
    }

    /// Build the declared options, in schema order.
    pub fn build(&self) -> Result<Vec<Arc<OptionDef>>> {
        self.options
            .iter()
            .map(|o| o.to_option().map(Arc::new))
            .collect()
    }
}
