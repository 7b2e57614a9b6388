//! Data source with no backing store.
//!
//! Used when finding tracking is disabled: nothing is ever open, every
//! commit is exempt from blocking, and writes are dropped.

use super::{CommitType, DataSourceError, DataSourceKind, FindingDataSource};
use crate::model::{Finding, User};

/// No-op finding data source.
///
/// Every lookup reports no open finding, every commit has a block
/// exception, recorded findings are discarded and there are no risk
/// assessors. Selected with `data_source: dummy` (the default) when
/// finding tracking is disabled, and handy as a stand-in for tests that
/// need a `FindingDataSource` but no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyFindingDataSource;

impl DummyFindingDataSource {
    /// Create a new dummy data source.
    pub fn new() -> Self {
        Self
    }
}

impl FindingDataSource for DummyFindingDataSource {
    fn get_open_finding(
        &self,
        _repository: &str,
        _scanner: &str,
        _dependency_id: &str,
        _dependency_version: &str,
    ) -> Result<Option<Finding>, DataSourceError> {
        Ok(None)
    }

    fn commit_has_block_exception(
        &self,
        _commit_type: CommitType,
        _commit_hash: &str,
    ) -> Result<bool, DataSourceError> {
        Ok(true)
    }

    fn create_or_update_open_finding(&self, _finding: &Finding) -> Result<(), DataSourceError> {
        Ok(())
    }

    fn get_risk_assessor(&self) -> Result<Vec<User>, DataSourceError> {
        Ok(Vec::new())
    }

    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Dummy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dependency;

    #[test]
    fn test_never_finds_open_finding() {
        let source = DummyFindingDataSource::new();

        assert!(source
            .get_open_finding("org/repo", "scanner-x", "pkg-1", "1.2.3")
            .unwrap()
            .is_none());
        assert!(source.get_open_finding("", "", "", "").unwrap().is_none());
    }

    #[test]
    fn test_every_commit_is_exempt() {
        let source = DummyFindingDataSource::new();

        assert!(source
            .commit_has_block_exception(CommitType::MergeCommit, "abc123")
            .unwrap());
        assert!(source
            .commit_has_block_exception(CommitType::ReleaseCommit, "")
            .unwrap());
    }

    #[test]
    fn test_writes_are_dropped() {
        let source = DummyFindingDataSource::new();
        let finding =
            Finding::new("org/repo", "scanner-x", Dependency::new("pkg-1", "pkg", "1.2.3"));

        source.create_or_update_open_finding(&finding).unwrap();
        source.create_or_update_open_finding(&finding).unwrap();

        assert!(source
            .get_open_finding("org/repo", "scanner-x", "pkg-1", "1.2.3")
            .unwrap()
            .is_none());
        assert!(source.get_risk_assessor().unwrap().is_empty());
    }

    #[test]
    fn test_no_risk_assessors() {
        let source = DummyFindingDataSource::new();
        for _ in 0..3 {
            assert!(source.get_risk_assessor().unwrap().is_empty());
        }
    }
}
