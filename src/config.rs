//! Configuration file for depfinding.
//!
//! The config picks the data source implementation and seeds it with
//! findings, block exceptions and risk assessors.

use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data_source::{
    CommitType, DataSourceKind, DummyFindingDataSource, FindingDataSource,
    InMemoryFindingDataSource,
};
use crate::model::{Finding, User};

/// Config file names looked up in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["depfinding.yaml", ".depfinding.yaml"];

lazy_static::lazy_static! {
    static ref COMMIT_HASH: Regex = Regex::new(r"^[0-9a-fA-F]{4,40}$").unwrap();
}

/// Returns true for abbreviated or full hex commit hashes.
pub fn is_valid_commit_hash(hash: &str) -> bool {
    COMMIT_HASH.is_match(hash)
}

/// Top-level config definition.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub data_source: DataSourceKind,
    #[serde(default)]
    pub risk_assessors: Vec<User>,
    #[serde(default)]
    pub block_exceptions: Vec<BlockException>,
    #[serde(default)]
    pub findings: Vec<Finding>,
}

/// A commit exempt from blocking.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockException {
    pub commit_type: CommitType,
    pub commit_hash: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Build the configured data source.
    pub fn build_data_source(&self) -> Box<dyn FindingDataSource> {
        match self.data_source {
            DataSourceKind::Dummy => Box::new(DummyFindingDataSource::new()),
            DataSourceKind::Memory => {
                let source = self.block_exceptions.iter().fold(
                    InMemoryFindingDataSource::new()
                        .with_findings(self.findings.iter().cloned())
                        .with_risk_assessors(self.risk_assessors.clone()),
                    |source, exception| {
                        source.with_block_exception(exception.commit_type, &exception.commit_hash)
                    },
                );
                debug!(
                    findings = source.len(),
                    exceptions = self.block_exceptions.len(),
                    assessors = self.risk_assessors.len(),
                    "built in-memory data source"
                );
                Box::new(source)
            }
        }
    }
}

/// Find a config file: working directory first, then the user config dir.
pub fn discover() -> Option<PathBuf> {
    discover_in(Path::new("."), user_config_path().as_deref())
}

/// Path of the per-user config file, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "depfinding")
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_NAMES[0]))
}

/// Find a config file in `dir` (in `DEFAULT_CONFIG_NAMES` order), then at `user_config`.
pub fn discover_in(dir: &Path, user_config: Option<&Path>) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .chain(user_config.map(Path::to_path_buf))
        .find(|path| path.exists())
}

/// Validate a config.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    for exception in &config.block_exceptions {
        if !is_valid_commit_hash(&exception.commit_hash) {
            anyhow::bail!(
                "invalid commit hash {:?} in block_exceptions, expected 4-40 hex characters",
                exception.commit_hash
            );
        }
    }

    for finding in &config.findings {
        finding
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid seeded finding {}: {}", finding.id(), e))?;
    }

    if config.data_source == DataSourceKind::Dummy
        && (!config.findings.is_empty() || !config.block_exceptions.is_empty())
    {
        anyhow::bail!(
            "data_source 'dummy' ignores findings and block_exceptions, use 'memory' instead"
        );
    }

    Ok(())
}
