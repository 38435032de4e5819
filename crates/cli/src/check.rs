use anyhow::{Context, Result};
use indexmap::IndexMap;
use progopt::{
    OptionSet, PositionalConsumer, ValueSet, parse_command_line, parse_config_file,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub schema: String,
    pub configs: Vec<String>,
    /// Supplied values by primary key, in schema order.
    pub values: IndexMap<String, Vec<String>>,
    /// Defaults of options that were not supplied.
    pub defaults: IndexMap<String, String>,
    /// Positional arguments not claimed by any option.
    pub positional: Vec<String>,
    #[serde(skip)]
    pub dump: String,
    #[serde(skip)]
    pub remaining_dump: String,
}

/// Parse config files and a command line against `options`, merge the
/// results and hand leftover positionals to the options named in
/// `positional_keys`, in order.
pub fn check_inputs(
    schema_path: &Path,
    options: &OptionSet,
    configs: &[PathBuf],
    argv: &[String],
    positional_keys: &[String],
) -> Result<CheckReport> {
    let mut values = ValueSet::new();
    for path in configs {
        let parsed = parse_config_file(path, options)?;
        tracing::debug!(path = %path.display(), options = parsed.len(), "config parsed");
        values
            .add(parsed)
            .with_context(|| format!("conflicting values in {}", path.display()))?;
    }

    let (parsed, positional) =
        parse_command_line(argv, options).context("invalid command line")?;
    values
        .add(parsed)
        .context("command line repeats a value from a config file")?;

    let mut consumer = PositionalConsumer::new(&mut values, &positional);
    for key in positional_keys {
        let opt = options
            .find_option(key, false)
            .context("unknown --positional target")?;
        consumer
            .consume(opt)
            .with_context(|| format!("failed to assign positional arguments to '{key}'"))?;
    }
    let remaining = consumer.remaining().to_vec();
    let remaining_dump = consumer.dump();

    let mut supplied = IndexMap::new();
    let mut defaults = IndexMap::new();
    for opt in options.iter() {
        if let Some(v) = values.get(opt) {
            supplied.insert(opt.key().to_string(), v.to_vec());
        } else if let Some(d) = opt.default_value() {
            defaults.insert(opt.key().to_string(), d.to_string());
        }
    }

    Ok(CheckReport {
        schema: schema_path.display().to_string(),
        configs: configs.iter().map(|p| p.display().to_string()).collect(),
        values: supplied,
        defaults,
        positional: remaining,
        dump: options.dump(&values),
        remaining_dump,
    })
}
