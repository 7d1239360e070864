use serde::{Deserialize, Serialize};

/// A named pointer (local head or remote-tracking ref) to a commit. Remote
/// refs carry their short name (`origin/main` -> `main`); the remote's own
/// HEAD alias is excluded by the backend because it duplicates another
/// branch's pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    pub name: String,
    pub tip: String,
}

impl BranchRef {
    pub fn new(name: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tip: tip.into(),
        }
    }
}
