use serde::{Deserialize, Serialize};

/// Classification of the commit a CI job runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitType {
    MergeCommit,
    ReleaseCommit,
}

impl CommitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::MergeCommit => "merge_commit",
            CommitType::ReleaseCommit => "release_commit",
        }
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "merge" | "merge_commit" => Ok(CommitType::MergeCommit),
            "release" | "release_commit" => Ok(CommitType::ReleaseCommit),
            _ => Err(format!("unknown commit type: {}", s)),
        }
    }
}
