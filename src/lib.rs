//! depfinding - finding data sources for CI dependency scanning.
//!
//! Dependency scanners running in CI report vulnerable dependencies as
//! findings. Before blocking a pipeline they ask a finding data source
//! whether the finding is already tracked, whether the commit has a block
//! exception, and who the risk assessors are.
//!
//! # Architecture
//!
//! - `model`: Finding, dependency, vulnerability and user records
//! - `data_source`: `FindingDataSource` trait and its implementations
//! - `config`: YAML config selecting and seeding a data source
//! - `report`: Output formatting (text, JSON)
//! - `cli`: Command-line harness over the four data source operations
//!
//! # Adding a New Data Source
//!
//! Implement `FindingDataSource` in `src/data_source/`, add a variant to
//! `DataSourceKind`, and build it in `Config::build_data_source`.

pub mod cli;
pub mod config;
pub mod data_source;
pub mod model;
pub mod report;

pub use config::Config;
pub use data_source::{
    CommitType, DataSourceError, DataSourceKind, DummyFindingDataSource, FindingDataSource,
    InMemoryFindingDataSource,
};
pub use model::{Dependency, Finding, FindingKey, SecurityRisk, User, Vulnerability};
pub use report::Outcome;
