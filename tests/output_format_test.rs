//! Tests for the JSON output format.
//!
//! These tests run each command against the fixture config and check the
//! fields that CI scripts read from the JSON report.

use std::path::PathBuf;

use depfinding::cli::{self, ExceptionArgs, LookupArgs};
use depfinding::report;
use depfinding::{CommitType, DataSourceKind, DummyFindingDataSource, FindingDataSource};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn memory_source() -> Box<dyn FindingDataSource> {
    cli::load_data_source(Some(testdata_path().join("depfinding.yaml").as_path()))
        .expect("fixture config should load")
}

fn chrono_lookup() -> LookupArgs {
    LookupArgs {
        repository: "org/repo".to_string(),
        scanner: "bazel-rust".to_string(),
        dependency_id: "https://crates.io/crates/chrono".to_string(),
        dependency_version: "0.4.19".to_string(),
    }
}

fn json_value(source: &dyn FindingDataSource, outcome: &depfinding::Outcome) -> serde_json::Value {
    let json = report::to_json(source.kind(), outcome).expect("should render json");
    serde_json::from_str(&json).expect("should be valid json")
}

#[test]
fn test_lookup_report_with_open_finding() {
    let source = memory_source();
    let outcome = cli::run_lookup(&chrono_lookup(), source.as_ref()).unwrap();
    let value = json_value(source.as_ref(), &outcome);

    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(value["command"], "lookup");
    assert_eq!(value["data_source"], "memory");
    assert_eq!(value["key"]["scanner"], "bazel-rust");
    assert_eq!(value["finding"]["risk"], "medium");
    assert_eq!(value["finding"]["vulnerabilities"][0]["id"], "RUSTSEC-2020-0159");
    assert!(outcome.blocks(), "open finding should fail the gate");
}

#[test]
fn test_lookup_report_on_dummy() {
    let source = DummyFindingDataSource::new();
    let outcome = cli::run_lookup(&chrono_lookup(), &source).unwrap();
    let value = json_value(&source, &outcome);

    assert_eq!(value["data_source"], "dummy");
    assert!(value["finding"].is_null());
    assert!(!outcome.blocks());
}

#[test]
fn test_exception_report() {
    let source = memory_source();
    let args = ExceptionArgs {
        commit_type: CommitType::ReleaseCommit,
        commit_hash: "abc123".to_string(),
    };
    let outcome = cli::run_exception(&args, source.as_ref()).unwrap();
    let value = json_value(source.as_ref(), &outcome);

    assert_eq!(value["command"], "exception");
    assert_eq!(value["commit_type"], "release_commit");
    assert_eq!(value["commit_hash"], "abc123");
    assert_eq!(value["exempt"], false);
    assert!(outcome.blocks());
}

#[test]
fn test_assessors_report() {
    let source = memory_source();
    let outcome = cli::run_assessors(source.as_ref()).unwrap();
    let value = json_value(source.as_ref(), &outcome);

    assert_eq!(value["command"], "assessors");
    let users = value["users"].as_array().expect("users should be an array");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], "alice");
    assert!(users[1].get("email").is_none(), "missing email is omitted");
}

#[test]
fn test_assessors_report_on_dummy_is_empty() {
    let source = DummyFindingDataSource::new();
    let outcome = cli::run_assessors(&source).unwrap();
    let value = json_value(&source, &outcome);

    assert_eq!(value["users"], serde_json::json!([]));
    assert_eq!(source.kind(), DataSourceKind::Dummy);
}
