mod check;
mod schema;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use progopt::OptionSet;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing_subscriber::{EnvFilter, fmt};

use crate::schema::{OptionSchema, Schema};

pub const DEFAULT_SCHEMA_NAME: &str = "progopt.json";

#[derive(Parser)]
#[command(name = "progopt")]
#[command(version, about = "Validate command lines and config files against an option schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter option schema
    Init(InitArgs),

    /// Describe the options declared in a schema
    Describe(DescribeArgs),

    /// Parse config files and a command line against a schema
    Check(CheckArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Program name recorded in the schema
    #[arg(short, long, default_value = "my-tool")]
    name: String,
}

#[derive(Parser)]
struct DescribeArgs {
    /// Path to the option schema
    #[arg(short, long, default_value = DEFAULT_SCHEMA_NAME, value_name = "FILE")]
    schema: PathBuf,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the option schema
    #[arg(short, long, default_value = DEFAULT_SCHEMA_NAME, value_name = "FILE")]
    schema: PathBuf,

    /// Config file to parse (repeatable, merged in order)
    #[arg(short, long = "config", value_name = "FILE")]
    configs: Vec<PathBuf>,

    /// Assign leftover positional arguments to this option (repeatable)
    #[arg(short, long = "positional", value_name = "KEY")]
    positional: Vec<String>,

    /// Fail if positional arguments remain unassigned
    #[arg(long)]
    strict: bool,

    /// Output JSON report path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only output JSON (no human-readable output)
    #[arg(long)]
    json: bool,

    /// Command line to check, after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Describe(args) => describe(args),
        Commands::Check(args) => check_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let schema_path = dir.join(DEFAULT_SCHEMA_NAME);
    if schema_path.exists() {
        bail!("{} already exists in {}", DEFAULT_SCHEMA_NAME, dir.display());
    }

    let schema = Schema {
        name: args.name,
        options: vec![
            OptionSchema {
                key: "help".to_string(),
                short: vec!["h".to_string()],
                help: "show help".to_string(),
                narg: Some(0),
                ..Default::default()
            },
            OptionSchema {
                key: "input".to_string(),
                short: vec!["i".to_string()],
                help: "file to read".to_string(),
                ..Default::default()
            },
            OptionSchema {
                key: "log.level".to_string(),
                help: "log verbosity".to_string(),
                overwriting: true,
                default_value: Some("info".to_string()),
                ..Default::default()
            },
        ],
    };

    let json_content = serde_json::to_string_pretty(&schema)?;
    fs::write(&schema_path, &json_content)
        .with_context(|| format!("failed to write {}", schema_path.display()))?;

    eprintln!("Created: {}", schema_path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {} to declare your options", DEFAULT_SCHEMA_NAME);
    eprintln!("  2. Run: progopt describe");
    eprintln!("  3. Run: progopt check -c app.conf -- --input file.txt");

    Ok(())
}

fn load_options(path: &Path) -> Result<OptionSet> {
    let schema = Schema::from_file(path)?;
    let declared = schema.build()?;
    tracing::debug!(options = declared.len(), "schema loaded");

    let mut options = OptionSet::new();
    for opt in &declared {
        options.add(opt);
    }
    Ok(options)
}

fn describe(args: DescribeArgs) -> Result<()> {
    tracing::debug!("executing describe command");

    let options = load_options(&args.schema)?;
    print!("{}", options.help());
    Ok(())
}

fn check_command(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let options = load_options(&args.schema)?;
    let report = check::check_inputs(
        &args.schema,
        &options,
        &args.configs,
        &args.args,
        &args.positional,
    )?;

    if let Some(output_path) = &args.output {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(output_path, &json)
            .with_context(|| format!("failed to write report: {}", output_path.display()))?;
        if !args.json {
            eprintln!("Report: {}", output_path.display());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.dump);
        if !report.positional.is_empty() {
            print!("{}", report.remaining_dump);
        }
    }

    if args.strict && !report.positional.is_empty() {
        bail!(
            "{} positional argument(s) not assigned: {}",
            report.positional.len(),
            report.positional.join(" ")
        );
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
