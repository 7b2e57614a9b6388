//! Output formatting for depfinding results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::data_source::{CommitType, DataSourceKind};
use crate::model::{Finding, FindingKey, SecurityRisk, User};

/// Result of one data source operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Outcome {
    Lookup {
        key: FindingKey,
        finding: Option<Finding>,
    },
    Exception {
        commit_type: CommitType,
        commit_hash: String,
        exempt: bool,
    },
    Recorded {
        key: FindingKey,
    },
    Assessors {
        users: Vec<User>,
    },
}

impl Outcome {
    /// Whether the outcome should fail a CI gate.
    pub fn blocks(&self) -> bool {
        match self {
            Outcome::Lookup { finding, .. } => finding.is_some(),
            Outcome::Exception { exempt, .. } => !exempt,
            Outcome::Recorded { .. } | Outcome::Assessors { .. } => false,
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report wrapping a single outcome.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub data_source: DataSourceKind,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Render an outcome as pretty-printed JSON.
pub fn to_json(data_source: DataSourceKind, outcome: &Outcome) -> anyhow::Result<String> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_source,
        outcome: outcome.clone(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write an outcome in JSON format.
pub fn write_json(data_source: DataSourceKind, outcome: &Outcome) -> anyhow::Result<()> {
    println!("{}", to_json(data_source, outcome)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Render an outcome for the terminal.
pub fn to_pretty(data_source: DataSourceKind, outcome: &Outcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "data source:".dimmed(), data_source));

    match outcome {
        Outcome::Lookup { key, finding: None } => {
            out.push_str(&format!("{} no open finding for {}\n", "✓".green(), key));
        }
        Outcome::Lookup {
            key,
            finding: Some(finding),
        } => {
            out.push_str(&format!("{} open finding for {}\n", "✗".red(), key));
            out.push_str(&format_finding(finding));
        }
        Outcome::Exception {
            commit_type,
            commit_hash,
            exempt,
        } => {
            if *exempt {
                out.push_str(&format!(
                    "{} {} {} has a block exception\n",
                    "✓".green(),
                    commit_type,
                    commit_hash
                ));
            } else {
                out.push_str(&format!(
                    "{} {} {} has no block exception\n",
                    "✗".red(),
                    commit_type,
                    commit_hash
                ));
            }
        }
        Outcome::Recorded { key } => {
            out.push_str(&format!("{} recorded open finding {}\n", "✓".green(), key));
        }
        Outcome::Assessors { users } if users.is_empty() => {
            out.push_str(&format!("{}\n", "no risk assessors configured".yellow()));
        }
        Outcome::Assessors { users } => {
            out.push_str(&format!("{}\n", "Risk assessors:".bold()));
            for user in users {
                out.push_str(&format!("  {} ({})\n", user, user.id.dimmed()));
            }
        }
    }

    out
}

/// Write an outcome in pretty format.
pub fn write_pretty(data_source: DataSourceKind, outcome: &Outcome) {
    print!("{}", to_pretty(data_source, outcome));
}

fn format_finding(finding: &Finding) -> String {
    let mut out = String::new();
    let dep = &finding.vulnerable_dependency;
    out.push_str(&format!("  dependency: {} {}\n", dep.name.bold(), dep.version));

    if let Some(risk) = finding.risk {
        let risk_str = risk.to_string();
        let colored_risk = match risk {
            SecurityRisk::Critical | SecurityRisk::High => risk_str.red(),
            SecurityRisk::Medium => risk_str.yellow(),
            _ => risk_str.normal(),
        };
        out.push_str(&format!("  risk:       {}\n", colored_risk));
    }

    if !finding.vulnerabilities.is_empty() {
        let ids: Vec<&str> = finding.vulnerabilities.iter().map(|v| v.id.as_str()).collect();
        out.push_str(&format!(
            "  vulns:      {} (max score {})\n",
            ids.join(", "),
            finding.max_vulnerability_score()
        ));
    }

    if !finding.projects.is_empty() {
        out.push_str(&format!("  projects:   {}\n", finding.projects.join(", ")));
    }

    if !finding.risk_assessor.is_empty() {
        let names: Vec<String> = finding.risk_assessor.iter().map(|u| u.to_string()).collect();
        out.push_str(&format!("  assessors:  {}\n", names.join(", ")));
    }

    if let Some(info) = &finding.more_info {
        out.push_str(&format!("  more info:  {}\n", info));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dependency;

    fn no_color() {
        colored::control::set_override(false);
    }

    fn key() -> FindingKey {
        FindingKey::new("org/repo", "scanner-x", "pkg-1", "1.2.3")
    }

    #[test]
    fn test_json_tags_command() {
        let outcome = Outcome::Exception {
            commit_type: CommitType::MergeCommit,
            commit_hash: "abc123".to_string(),
            exempt: true,
        };
        let json = to_json(DataSourceKind::Dummy, &outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["command"], "exception");
        assert_eq!(value["data_source"], "dummy");
        assert_eq!(value["commit_type"], "merge_commit");
        assert_eq!(value["exempt"], true);
        assert!(value["version"].is_string());
    }

    #[test]
    fn test_json_lookup_none_is_null() {
        let outcome = Outcome::Lookup {
            key: key(),
            finding: None,
        };
        let json = to_json(DataSourceKind::Memory, &outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["command"], "lookup");
        assert!(value["finding"].is_null());
        assert_eq!(value["key"]["dependency_version"], "1.2.3");
    }

    #[test]
    fn test_pretty_lookup_with_finding() {
        no_color();
        let mut finding =
            Finding::new("org/repo", "scanner-x", Dependency::new("pkg-1", "pkg", "1.2.3"));
        finding.risk = Some(SecurityRisk::High);
        finding.projects = vec!["rs/ledger".to_string()];
        finding.risk_assessor = vec![User::new("alice").with_name("Alice")];

        let out = to_pretty(
            DataSourceKind::Memory,
            &Outcome::Lookup {
                key: key(),
                finding: Some(finding),
            },
        );

        assert!(out.contains("open finding for org/repo|scanner-x|pkg-1|1.2.3"));
        assert!(out.contains("risk:       high"));
        assert!(out.contains("projects:   rs/ledger"));
        assert!(out.contains("assessors:  Alice"));
    }

    #[test]
    fn test_pretty_empty_assessors() {
        no_color();
        let out = to_pretty(DataSourceKind::Dummy, &Outcome::Assessors { users: vec![] });
        assert!(out.contains("data source: dummy"));
        assert!(out.contains("no risk assessors configured"));
    }

    #[test]
    fn test_blocks() {
        assert!(!Outcome::Lookup { key: key(), finding: None }.blocks());
        assert!(Outcome::Exception {
            commit_type: CommitType::ReleaseCommit,
            commit_hash: "abc123".into(),
            exempt: false,
        }
        .blocks());
        assert!(!Outcome::Recorded { key: key() }.blocks());
        assert!(!Outcome::Assessors { users: vec![] }.blocks());
    }
}
