//! Trait-based access to the finding tracker.
//!
//! Everything that needs to read or write findings goes through the
//! `FindingDataSource` trait, so the backing store can be swapped without
//! touching callers.
//!
//! # Architecture
//!
//! ```text
//! FindingDataSource trait
//!     ├── InMemoryFindingDataSource  (process-local store, seeded from config)
//!     └── DummyFindingDataSource     (no store: nothing open, every commit exempt)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Finding, User};

mod commit_type;
mod dummy;
mod memory;

pub use commit_type::CommitType;
pub use dummy::DummyFindingDataSource;
pub use memory::InMemoryFindingDataSource;

/// Errors a finding data source can report.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("invalid finding: {0}")]
    InvalidFinding(String),
    #[error("finding store lock poisoned")]
    Poisoned,
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Which `FindingDataSource` implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// No backing store
    #[default]
    Dummy,
    /// Process-local store
    Memory,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::Dummy => "dummy",
            DataSourceKind::Memory => "memory",
        }
    }
}

impl std::fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access to open findings, commit exceptions and risk assessors.
pub trait FindingDataSource: Send + Sync {
    /// Look up the open finding for the given coordinates, if any.
    fn get_open_finding(
        &self,
        repository: &str,
        scanner: &str,
        dependency_id: &str,
        dependency_version: &str,
    ) -> Result<Option<Finding>, DataSourceError>;

    /// Returns true if the commit is exempt from being blocked.
    fn commit_has_block_exception(
        &self,
        commit_type: CommitType,
        commit_hash: &str,
    ) -> Result<bool, DataSourceError>;

    /// Store a finding, replacing any open finding with the same id.
    fn create_or_update_open_finding(&self, finding: &Finding) -> Result<(), DataSourceError>;

    /// Users responsible for signing off on findings.
    fn get_risk_assessor(&self) -> Result<Vec<User>, DataSourceError>;

    /// Which implementation this is, for reporting.
    fn kind(&self) -> DataSourceKind;
}
