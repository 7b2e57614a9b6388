//! Command-line interface for depfinding.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{self, Config};
use crate::data_source::{CommitType, FindingDataSource};
use crate::model::{Finding, FindingKey};
use crate::report::{self, Outcome};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Query and update the finding tracker used by CI dependency scans.
///
/// Each subcommand runs one data source operation against the source
/// selected by the config file. Without a config file the dummy source is
/// used: nothing is open, every commit is exempt, and writes are dropped.
#[derive(Parser)]
#[command(name = "depfinding")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up the open finding for a dependency version
    Lookup(LookupArgs),
    /// Check whether a commit is exempt from blocking
    Exception(ExceptionArgs),
    /// Create or update an open finding from a JSON or YAML file
    Record(RecordArgs),
    /// List the risk assessors
    Assessors,
}

/// Arguments for the lookup command.
#[derive(Args)]
pub struct LookupArgs {
    /// Repository the dependency belongs to (e.g. org/repo)
    #[arg(short, long)]
    pub repository: String,

    /// Scanner that reported the dependency
    #[arg(short, long)]
    pub scanner: String,

    /// Dependency id
    #[arg(long)]
    pub dependency_id: String,

    /// Dependency version
    #[arg(long)]
    pub dependency_version: String,
}

/// Arguments for the exception command.
#[derive(Args)]
pub struct ExceptionArgs {
    /// Commit type: merge or release
    #[arg(short = 't', long)]
    pub commit_type: CommitType,

    /// Commit hash (abbreviated or full)
    #[arg(short = 'H', long)]
    pub commit_hash: String,
}

/// Arguments for the record command.
#[derive(Args)]
pub struct RecordArgs {
    /// Finding file (.json, .yaml or .yml)
    pub file: PathBuf,
}

/// Load the config (explicit, discovered, or default) and build its data source.
pub fn load_data_source(path: Option<&Path>) -> anyhow::Result<Box<dyn FindingDataSource>> {
    let discovered = match path {
        Some(p) => Some(p.to_path_buf()),
        None => config::discover(),
    };
    build_from(discovered.as_deref())
}

/// Parse and validate the config at `path`, or use the default when there is none.
fn build_from(path: Option<&Path>) -> anyhow::Result<Box<dyn FindingDataSource>> {
    let config = match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            Config::parse_file(p)
                .map_err(|e| anyhow::anyhow!("failed to parse config {}: {}", p.display(), e))?
        }
        None => {
            debug!("no config file found, using dummy data source");
            Config::default()
        }
    };

    config::validate(&config).map_err(|e| anyhow::anyhow!("invalid config: {}", e))?;
    Ok(config.build_data_source())
}

/// Run the parsed command line and return the process exit code.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    if cli.format != "pretty" && cli.format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", cli.format);
        return Ok(EXIT_ERROR);
    }

    let source = load_data_source(cli.config.as_deref())?;

    let outcome = match &cli.command {
        Commands::Lookup(args) => run_lookup(args, source.as_ref())?,
        Commands::Exception(args) => run_exception(args, source.as_ref())?,
        Commands::Record(args) => run_record(args, source.as_ref())?,
        Commands::Assessors => run_assessors(source.as_ref())?,
    };

    match cli.format.as_str() {
        "json" => report::write_json(source.kind(), &outcome)?,
        _ => report::write_pretty(source.kind(), &outcome),
    }

    if outcome.blocks() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the lookup command.
pub fn run_lookup(args: &LookupArgs, source: &dyn FindingDataSource) -> anyhow::Result<Outcome> {
    let key = FindingKey::new(
        args.repository.as_str(),
        args.scanner.as_str(),
        args.dependency_id.as_str(),
        args.dependency_version.as_str(),
    );
    let missing = key.missing_fields();
    if !missing.is_empty() {
        anyhow::bail!("empty lookup coordinates: {}", missing.join(", "));
    }

    let finding = source.get_open_finding(
        &key.repository,
        &key.scanner,
        &key.dependency_id,
        &key.dependency_version,
    )?;
    Ok(Outcome::Lookup { key, finding })
}

/// Run the exception command.
pub fn run_exception(
    args: &ExceptionArgs,
    source: &dyn FindingDataSource,
) -> anyhow::Result<Outcome> {
    if !config::is_valid_commit_hash(&args.commit_hash) {
        anyhow::bail!(
            "invalid commit hash {:?}, expected 4-40 hex characters",
            args.commit_hash
        );
    }

    let exempt = source.commit_has_block_exception(args.commit_type, &args.commit_hash)?;
    Ok(Outcome::Exception {
        commit_type: args.commit_type,
        commit_hash: args.commit_hash.clone(),
        exempt,
    })
}

/// Run the record command.
pub fn run_record(args: &RecordArgs, source: &dyn FindingDataSource) -> anyhow::Result<Outcome> {
    let finding = read_finding(&args.file)?;
    source.create_or_update_open_finding(&finding)?;
    Ok(Outcome::Recorded { key: finding.id() })
}

/// Run the assessors command.
pub fn run_assessors(source: &dyn FindingDataSource) -> anyhow::Result<Outcome> {
    let users = source.get_risk_assessor()?;
    Ok(Outcome::Assessors { users })
}

/// Read a finding from a JSON or YAML file, picked by extension.
fn read_finding(path: &Path) -> anyhow::Result<Finding> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let finding: Finding = match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(finding)
}
