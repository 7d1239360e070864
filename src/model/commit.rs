use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Commit metadata as read from the working copy by the version-control
/// backend. Parents are ordered; the first parent is the mainline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub message: String,
    pub parents: Vec<String>,
}

/// One point in the reconstructed history graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitNode {
    pub sha: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub message: String,
    /// Short names of every branch (local and remote) whose ancestry
    /// contains this commit, sorted for stable payloads.
    pub branches: Vec<String>,
    #[serde(rename = "isMerge")]
    pub is_merge: bool,
    /// Paths touched by this commit, capped for payload-size control.
    pub files: Vec<String>,
}

/// Directed child -> parent relationship. A merge commit yields one edge
/// per parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitEdge {
    pub from: String,
    pub to: String,
}

/// Complete DAG snapshot of the working copy across all branches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitGraph {
    pub nodes: Vec<CommitNode>,
    pub edges: Vec<CommitEdge>,
}

/// Reduced commit entry returned with a successful clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub message: String,
}

impl From<CommitInfo> for CommitSummary {
    fn from(info: CommitInfo) -> Self {
        Self {
            sha: info.sha,
            author: info.author,
            date: info.date,
            message: info.message,
        }
    }
}

/// Response body for a successful clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneReport {
    pub message: String,
    #[serde(rename = "commitHistory")]
    pub commit_history: Vec<CommitSummary>,
}
