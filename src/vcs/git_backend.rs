use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use git2::{AutotagOption, BranchType, FetchOptions, FetchPrune, Oid, Repository, Sort};

use crate::model::{BranchRef, CommitInfo};
use crate::vcs::traits::Vcs;

/// Clone depth. Shallow keeps transfers bounded while still covering the
/// commit-history window reported to callers.
const CLONE_DEPTH: i32 = 50;

/// libgit2-backed implementation of the version-control primitives. The
/// repository is reopened per call; the working copy on disk is the only
/// state.
#[derive(Debug, Default)]
pub struct GitBackend;

impl GitBackend {
    pub fn new() -> Self {
        Self
    }

    fn open(workdir: &Path) -> Result<Repository> {
        Repository::open(workdir)
            .with_context(|| format!("failed to open repository at {}", workdir.display()))
    }

    fn read_commit(repo: &Repository, oid: Oid) -> Result<CommitInfo> {
        let commit = repo
            .find_commit(oid)
            .with_context(|| format!("commit {} not found", oid))?;
        let info = CommitInfo {
            sha: oid.to_string(),
            author: commit.author().name().unwrap_or("").to_string(),
            date: commit_time(&commit),
            message: commit.message().unwrap_or("").trim().to_string(),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
        };
        Ok(info)
    }
}

/// Commit timestamp with its original UTC offset preserved.
fn commit_time(commit: &git2::Commit) -> DateTime<FixedOffset> {
    let time = commit.time();
    let utc = Utc
        .timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_default();
    match FixedOffset::east_opt(time.offset_minutes() * 60) {
        Some(offset) => utc.with_timezone(&offset),
        None => utc.fixed_offset(),
    }
}

impl Vcs for GitBackend {
    fn clone_all_branches(&self, url: &str, dest: &Path) -> Result<()> {
        let mut fetch = FetchOptions::new();
        fetch.depth(CLONE_DEPTH);
        fetch.download_tags(AutotagOption::None);
        // libgit2 clones with the default refspec, which already covers
        // every branch (there is no --single-branch narrowing to undo).
        git2::build::RepoBuilder::new()
            .fetch_options(fetch)
            .clone(url, dest)
            .with_context(|| format!("clone of {} failed", url))?;
        Ok(())
    }

    fn fetch_prune(&self, workdir: &Path) -> Result<()> {
        let repo = Self::open(workdir)?;
        let mut remote = repo.find_remote("origin").context("origin remote missing")?;
        let mut fetch = FetchOptions::new();
        fetch.prune(FetchPrune::On);
        fetch.download_tags(AutotagOption::None);
        // An empty refspec list means the remote's configured refspecs.
        remote
            .fetch(&[] as &[&str], Some(&mut fetch), None)
            .context("fetch from origin failed")?;
        Ok(())
    }

    fn head_branch(&self, workdir: &Path) -> Result<Option<String>> {
        let repo = Self::open(workdir)?;
        if repo.head_detached()? {
            return Ok(None);
        }
        let head = repo.head()?;
        Ok(head.shorthand().map(|name| name.to_string()))
    }

    fn branch_refs(&self, workdir: &Path) -> Result<Vec<BranchRef>> {
        let repo = Self::open(workdir)?;
        let mut refs = Vec::new();
        for entry in repo.branches(None)? {
            let (branch, kind) = entry?;
            let name = match branch.name()? {
                Some(name) => name,
                None => continue, // non-UTF-8 ref name
            };
            let short = match kind {
                BranchType::Local => name.to_string(),
                BranchType::Remote => {
                    let stripped = name.split_once('/').map(|(_, rest)| rest).unwrap_or(name);
                    // The remote HEAD alias duplicates another branch's tip.
                    if stripped == "HEAD" {
                        continue;
                    }
                    stripped.to_string()
                }
            };
            let tip = branch.get().peel_to_commit()?.id().to_string();
            refs.push(BranchRef::new(short, tip));
        }
        Ok(refs)
    }

    fn recent_commits(
        &self,
        workdir: &Path,
        tip: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        let repo = Self::open(workdir)?;
        let mut walk = repo.revwalk()?;
        walk.set_sorting(Sort::TIME)?;
        match tip {
            Some(name) => {
                let object = repo
                    .revparse_single(name)
                    .with_context(|| format!("unknown revision {}", name))?;
                walk.push(object.id())?;
            }
            // No tip: the most recent commits across every ref.
            None => walk.push_glob("*")?,
        }

        let mut commits = Vec::new();
        for oid in walk {
            commits.push(Self::read_commit(&repo, oid?)?);
            if commits.len() >= limit {
                break;
            }
        }
        Ok(commits)
    }

    fn lookup_commit(&self, workdir: &Path, sha: &str) -> Result<CommitInfo> {
        let repo = Self::open(workdir)?;
        let oid = Oid::from_str(sha).with_context(|| format!("invalid commit id {}", sha))?;
        Self::read_commit(&repo, oid)
    }

    fn changed_files(&self, workdir: &Path, sha: &str, cap: usize) -> Result<Vec<String>> {
        let repo = Self::open(workdir)?;
        let commit = repo.find_commit(Oid::from_str(sha)?)?;
        let tree = commit.tree()?;
        // Diff against the first parent; a root commit diffs against the
        // empty tree.
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            if files.len() >= cap {
                break;
            }
            let path = delta.new_file().path().or_else(|| delta.old_file().path());
            if let Some(path) = path {
                files.push(path.to_string_lossy().into_owned());
            }
        }
        Ok(files)
    }
}
