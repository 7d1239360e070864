use std::path::Path;

use anyhow::Result;

use crate::model::{BranchRef, CommitInfo};

/// Version-control backend primitives. Implementations read and mutate the
/// working copy synchronously; callers run them off the async runtime.
pub trait Vcs: Send + Sync {
    /// Shallow-clone `url` into `dest`, fetching every branch rather than
    /// just the default one.
    fn clone_all_branches(&self, url: &str, dest: &Path) -> Result<()>;

    /// Fetch from origin, pruning remote-tracking refs that no longer
    /// exist upstream.
    fn fetch_prune(&self, workdir: &Path) -> Result<()>;

    /// Short name of the branch HEAD points to, or None when detached.
    fn head_branch(&self, workdir: &Path) -> Result<Option<String>>;

    /// Every local branch and remote-tracking ref with its tip commit.
    /// Remote names are shortened (`origin/main` -> `main`) and the
    /// remote's HEAD alias is skipped.
    fn branch_refs(&self, workdir: &Path) -> Result<Vec<BranchRef>>;

    /// Up to `limit` commits, newest first, reachable from `tip` when
    /// given or from every ref otherwise.
    fn recent_commits(
        &self,
        workdir: &Path,
        tip: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CommitInfo>>;

    /// Metadata for a single commit.
    fn lookup_commit(&self, workdir: &Path, sha: &str) -> Result<CommitInfo>;

    /// Paths touched by a commit relative to its first parent, capped at
    /// `cap` entries.
    fn changed_files(&self, workdir: &Path, sha: &str, cap: usize) -> Result<Vec<String>>;
}
