//! Finding records and the dependency/vulnerability data they point at.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::User;

/// Score used for findings and vulnerabilities that have not been rated.
pub const UNSCORED: i32 = -1;

fn unscored() -> i32 {
    UNSCORED
}

/// Risk rating assigned by a risk assessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityRisk {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for SecurityRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityRisk::Informational => write!(f, "informational"),
            SecurityRisk::Low => write!(f, "low"),
            SecurityRisk::Medium => write!(f, "medium"),
            SecurityRisk::High => write!(f, "high"),
            SecurityRisk::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for SecurityRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "informational" | "info" => Ok(SecurityRisk::Informational),
            "low" => Ok(SecurityRisk::Low),
            "medium" => Ok(SecurityRisk::Medium),
            "high" => Ok(SecurityRisk::High),
            "critical" => Ok(SecurityRisk::Critical),
            _ => Err(format!("unknown security risk: {}", s)),
        }
    }
}

/// A package pulled into a repository, directly or transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,
    pub name: String,
    pub version: String,
    /// Vulnerability id -> versions of this dependency that fix it.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fix_version_for_vulnerability: BTreeMap<String, Vec<String>>,
}

impl Dependency {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            fix_version_for_vulnerability: BTreeMap::new(),
        }
    }
}

/// A known vulnerability (CVE, GHSA, RUSTSEC, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "unscored")]
    pub score: i32,
}

/// Identity of a finding: where it was found, by whom, and in what.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FindingKey {
    pub repository: String,
    pub scanner: String,
    pub dependency_id: String,
    pub dependency_version: String,
}

impl FindingKey {
    pub fn new(
        repository: impl Into<String>,
        scanner: impl Into<String>,
        dependency_id: impl Into<String>,
        dependency_version: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            scanner: scanner.into(),
            dependency_id: dependency_id.into(),
            dependency_version: dependency_version.into(),
        }
    }

    /// Names of the coordinates that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("repository", &self.repository),
            ("scanner", &self.scanner),
            ("dependency id", &self.dependency_id),
            ("dependency version", &self.dependency_version),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl std::fmt::Display for FindingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.repository, self.scanner, self.dependency_id, self.dependency_version
        )
    }
}

/// A detected issue tied to one dependency version in one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub repository: String,
    pub scanner: String,
    pub vulnerable_dependency: Dependency,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    pub first_level_dependencies: Vec<Dependency>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub risk_assessor: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<SecurityRisk>,
    #[serde(default)]
    pub patch_responsible: Vec<User>,
    /// Unix timestamp (seconds) by which the finding must be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    #[serde(default = "unscored")]
    pub score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,
}

impl Finding {
    pub fn new(
        repository: impl Into<String>,
        scanner: impl Into<String>,
        vulnerable_dependency: Dependency,
    ) -> Self {
        Self {
            repository: repository.into(),
            scanner: scanner.into(),
            vulnerable_dependency,
            vulnerabilities: Vec::new(),
            first_level_dependencies: Vec::new(),
            projects: Vec::new(),
            risk_assessor: Vec::new(),
            risk: None,
            patch_responsible: Vec::new(),
            due_date: None,
            score: UNSCORED,
            more_info: None,
        }
    }

    /// The key this finding is stored and looked up under.
    pub fn id(&self) -> FindingKey {
        FindingKey::new(
            self.repository.clone(),
            self.scanner.clone(),
            self.vulnerable_dependency.id.clone(),
            self.vulnerable_dependency.version.clone(),
        )
    }

    /// Check that every identity coordinate is present.
    pub fn validate(&self) -> Result<(), String> {
        let missing = self.id().missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("finding is missing {}", missing.join(", ")))
        }
    }

    /// Highest vulnerability score, or the finding score if none is rated.
    pub fn max_vulnerability_score(&self) -> i32 {
        self.vulnerabilities
            .iter()
            .map(|v| v.score)
            .filter(|&score| score != UNSCORED)
            .max()
            .unwrap_or(self.score)
    }
}
