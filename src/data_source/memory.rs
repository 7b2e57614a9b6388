//! Process-local finding store.
//!
//! Findings live in memory for the lifetime of the data source. Block
//! exceptions and risk assessors are fixed at construction, usually from
//! the config file.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use tracing::debug;

use super::{CommitType, DataSourceError, DataSourceKind, FindingDataSource};
use crate::model::{Finding, FindingKey, User};

/// In-memory finding data source.
#[derive(Debug, Default)]
pub struct InMemoryFindingDataSource {
    findings: RwLock<HashMap<FindingKey, Finding>>,
    /// (commit type, lowercased hash)
    block_exceptions: HashSet<(CommitType, String)>,
    risk_assessors: Vec<User>,
}

impl InMemoryFindingDataSource {
    /// Create an empty store with no exceptions and no assessors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with findings. Later findings replace earlier ones
    /// with the same id.
    pub fn with_findings(mut self, findings: impl IntoIterator<Item = Finding>) -> Self {
        let store = self.findings.get_mut().unwrap_or_else(|e| e.into_inner());
        for finding in findings {
            store.insert(finding.id(), finding);
        }
        self
    }

    /// Exempt a commit from blocking.
    pub fn with_block_exception(mut self, commit_type: CommitType, commit_hash: &str) -> Self {
        self.block_exceptions.insert((commit_type, commit_hash.to_lowercase()));
        self
    }

    pub fn with_risk_assessors(mut self, users: Vec<User>) -> Self {
        self.risk_assessors = users;
        self
    }

    /// Number of stored findings. Still counts after the lock is poisoned.
    pub fn len(&self) -> usize {
        self.findings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FindingDataSource for InMemoryFindingDataSource {
    fn get_open_finding(
        &self,
        repository: &str,
        scanner: &str,
        dependency_id: &str,
        dependency_version: &str,
    ) -> Result<Option<Finding>, DataSourceError> {
        let key = FindingKey::new(repository, scanner, dependency_id, dependency_version);
        let store = self.findings.read().map_err(|_| DataSourceError::Poisoned)?;
        let found = store.get(&key).cloned();
        debug!(finding = %key, found = found.is_some(), "open finding lookup");
        Ok(found)
    }

    fn commit_has_block_exception(
        &self,
        commit_type: CommitType,
        commit_hash: &str,
    ) -> Result<bool, DataSourceError> {
        let exempt = self
            .block_exceptions
            .contains(&(commit_type, commit_hash.to_lowercase()));
        debug!(%commit_type, commit_hash, exempt, "block exception check");
        Ok(exempt)
    }

    fn create_or_update_open_finding(&self, finding: &Finding) -> Result<(), DataSourceError> {
        finding.validate().map_err(DataSourceError::InvalidFinding)?;

        let key = finding.id();
        let mut store = self.findings.write().map_err(|_| DataSourceError::Poisoned)?;
        let replaced = store.insert(key.clone(), finding.clone()).is_some();
        debug!(finding = %key, replaced, "stored open finding");
        Ok(())
    }

    fn get_risk_assessor(&self) -> Result<Vec<User>, DataSourceError> {
        Ok(self.risk_assessors.clone())
    }

    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Memory
    }
}
