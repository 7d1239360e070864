use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::DateTime;

use crate::model::{BranchRef, CommitInfo};
use crate::vcs::Vcs;

/// In-memory stand-in for the git backend: a hand-built commit DAG plus
/// branch tips, with switches for failure injection.
#[derive(Default)]
pub struct FakeVcs {
    pub commits: HashMap<String, CommitInfo>,
    pub branches: Vec<BranchRef>,
    pub head: Option<String>,
    pub files: HashMap<String, Vec<String>>,
    pub fail_clone: bool,
    pub fail_fetch: bool,
    pub fail_files: bool,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, sha: &str, author: &str, date: &str, message: &str, parents: &[&str]) {
        self.commits.insert(
            sha.to_string(),
            CommitInfo {
                sha: sha.to_string(),
                author: author.to_string(),
                date: DateTime::parse_from_rfc3339(date).expect("test dates are valid rfc3339"),
                message: message.to_string(),
                parents: parents.iter().map(|p| p.to_string()).collect(),
            },
        );
    }

    pub fn branch(&mut self, name: &str, tip: &str) {
        self.branches.push(BranchRef::new(name, tip));
        if self.head.is_none() {
            self.head = Some(name.to_string());
        }
    }

    fn ancestry(&self, tip: &str) -> Result<Vec<CommitInfo>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut pending = vec![tip.to_string()];
        let mut out = Vec::new();
        while let Some(sha) = pending.pop() {
            if !seen.insert(sha.clone()) {
                continue;
            }
            let info = self
                .commits
                .get(&sha)
                .cloned()
                .ok_or_else(|| anyhow!("missing commit {}", sha))?;
            pending.extend(info.parents.iter().cloned());
            out.push(info);
        }
        Ok(out)
    }
}

impl Vcs for FakeVcs {
    fn clone_all_branches(&self, url: &str, _dest: &Path) -> Result<()> {
        if self.fail_clone {
            return Err(anyhow!("remote rejected the clone of {}", url));
        }
        Ok(())
    }

    fn fetch_prune(&self, _workdir: &Path) -> Result<()> {
        if self.fail_fetch {
            return Err(anyhow!("fetch from origin failed"));
        }
        Ok(())
    }

    fn head_branch(&self, _workdir: &Path) -> Result<Option<String>> {
        Ok(self.head.clone())
    }

    fn branch_refs(&self, _workdir: &Path) -> Result<Vec<BranchRef>> {
        Ok(self.branches.clone())
    }

    fn recent_commits(
        &self,
        _workdir: &Path,
        tip: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        let mut commits = match tip {
            Some(name) => {
                let branch = self
                    .branches
                    .iter()
                    .find(|b| b.name == name)
                    .ok_or_else(|| anyhow!("unknown revision {}", name))?;
                self.ancestry(&branch.tip)?
            }
            None => {
                let mut all = Vec::new();
                let mut seen: HashSet<String> = HashSet::new();
                for branch in &self.branches {
                    for info in self.ancestry(&branch.tip)? {
                        if seen.insert(info.sha.clone()) {
                            all.push(info);
                        }
                    }
                }
                all
            }
        };
        commits.sort_by(|a, b| b.date.cmp(&a.date));
        commits.truncate(limit);
        Ok(commits)
    }

    fn lookup_commit(&self, _workdir: &Path, sha: &str) -> Result<CommitInfo> {
        self.commits
            .get(sha)
            .cloned()
            .ok_or_else(|| anyhow!("missing commit {}", sha))
    }

    fn changed_files(&self, _workdir: &Path, sha: &str, cap: usize) -> Result<Vec<String>> {
        if self.fail_files {
            return Err(anyhow!("diff stat failed for {}", sha));
        }
        let mut files = self.files.get(sha).cloned().unwrap_or_default();
        files.truncate(cap);
        Ok(files)
    }
}
