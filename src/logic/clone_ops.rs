use crate::error::AppError;
use crate::model::{CloneReport, CommitSummary};
use crate::vcs::{Vcs, Workspace};

/// Upper bound on the commit history returned with a clone.
pub const HISTORY_LIMIT: usize = 50;

pub struct CloneCoordinator;

impl CloneCoordinator {
    /// Clone `url` into the workspace, replacing any previous checkout,
    /// and report the most recent commits of the default branch.
    pub fn clone_repository<V: Vcs>(
        vcs: &V,
        workspace: &Workspace,
        url: &str,
    ) -> Result<CloneReport, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::MissingUrl);
        }

        workspace
            .reset()
            .map_err(|e| AppError::Unexpected(anyhow::Error::new(e)))?;

        log::info!("Cloning {} into {}", url, workspace.path().display());
        vcs.clone_all_branches(url, workspace.path())
            .map_err(AppError::CloneFailed)?;

        // History comes from the branch HEAD points to. A detached HEAD is
        // unlikely straight after a clone, but falls back to scanning every
        // ref rather than failing.
        let head = vcs
            .head_branch(workspace.path())
            .map_err(AppError::Unexpected)?;
        let commits = match head.as_deref() {
            Some(branch) => vcs.recent_commits(workspace.path(), Some(branch), HISTORY_LIMIT),
            None => vcs.recent_commits(workspace.path(), None, HISTORY_LIMIT),
        }
        .map_err(AppError::Unexpected)?;

        let commit_history: Vec<CommitSummary> =
            commits.into_iter().map(CommitSummary::from).collect();
        log::info!("Cloned {} ({} commits reported)", url, commit_history.len());

        Ok(CloneReport {
            message: format!("Successfully cloned {}", url),
            commit_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::FakeVcs;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Workspace) {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path().join("checkout"));
        (tmp, workspace)
    }

    /// Linear history: c1 <- c2 <- c3, `main` at c3.
    fn linear_repo() -> FakeVcs {
        let mut vcs = FakeVcs::new();
        vcs.commit("c1", "Alice", "2024-01-01T10:00:00+00:00", "Initial commit", &[]);
        vcs.commit("c2", "Bob", "2024-01-02T10:00:00+00:00", "Add feature", &["c1"]);
        vcs.commit("c3", "Alice", "2024-01-03T10:00:00+00:00", "Fix feature", &["c2"]);
        vcs.branch("main", "c3");
        vcs
    }

    #[test]
    fn empty_url_is_rejected_before_touching_the_workspace() {
        let (_tmp, workspace) = workspace();
        let vcs = FakeVcs::new();

        let err = CloneCoordinator::clone_repository(&vcs, &workspace, "").unwrap_err();
        assert!(matches!(err, AppError::MissingUrl));
        let err = CloneCoordinator::clone_repository(&vcs, &workspace, "   ").unwrap_err();
        assert!(matches!(err, AppError::MissingUrl));
        assert!(!workspace.is_initialized());
    }

    #[test]
    fn clone_failure_surfaces_as_its_own_kind() {
        let (_tmp, workspace) = workspace();
        let mut vcs = FakeVcs::new();
        vcs.fail_clone = true;

        let err =
            CloneCoordinator::clone_repository(&vcs, &workspace, "https://example.com/missing.git")
                .unwrap_err();
        assert!(matches!(err, AppError::CloneFailed(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn linear_history_is_reported_newest_first() {
        let (_tmp, workspace) = workspace();
        let vcs = linear_repo();

        let report = CloneCoordinator::clone_repository(
            &vcs,
            &workspace,
            "https://example.com/org/repo.git",
        )
        .unwrap();

        assert_eq!(
            report.message,
            "Successfully cloned https://example.com/org/repo.git"
        );
        let shas: Vec<&str> = report.commit_history.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, ["c3", "c2", "c1"]);
        assert_eq!(report.commit_history[0].author, "Alice");
        assert_eq!(report.commit_history[0].message, "Fix feature");
        assert_eq!(report.commit_history[1].author, "Bob");
        assert_eq!(report.commit_history[1].message, "Add feature");
    }

    #[test]
    fn history_is_capped() {
        let (_tmp, workspace) = workspace();
        let mut vcs = FakeVcs::new();
        vcs.commit("c0", "Alice", "2024-01-01T00:00:00+00:00", "root", &[]);
        for i in 1..60 {
            let date = format!("2024-01-01T{:02}:{:02}:00+00:00", i / 60, i % 60);
            vcs.commit(
                &format!("c{}", i),
                "Alice",
                &date,
                &format!("change {}", i),
                &[&format!("c{}", i - 1)],
            );
        }
        vcs.branch("main", "c59");

        let report =
            CloneCoordinator::clone_repository(&vcs, &workspace, "https://example.com/big.git")
                .unwrap();

        assert_eq!(report.commit_history.len(), HISTORY_LIMIT);
        assert_eq!(report.commit_history[0].sha, "c59");
    }

    #[test]
    fn detached_head_falls_back_to_all_refs() {
        let (_tmp, workspace) = workspace();
        let mut vcs = FakeVcs::new();
        vcs.commit("c1", "Alice", "2024-01-01T10:00:00+00:00", "root", &[]);
        vcs.commit("c2", "Alice", "2024-01-02T10:00:00+00:00", "main work", &["c1"]);
        vcs.commit("f1", "Bob", "2024-01-03T10:00:00+00:00", "feature work", &["c1"]);
        vcs.branch("main", "c2");
        vcs.branch("feature", "f1");
        vcs.head = None;

        let report =
            CloneCoordinator::clone_repository(&vcs, &workspace, "https://example.com/repo.git")
                .unwrap();

        // Commits from both branches, still newest first.
        let shas: Vec<&str> = report.commit_history.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, ["f1", "c2", "c1"]);
    }

    #[test]
    fn clone_resets_the_workspace() {
        let (_tmp, workspace) = workspace();
        workspace.reset().unwrap();
        let stale = workspace.path().join("stale.txt");
        std::fs::write(&stale, "old checkout").unwrap();

        let vcs = linear_repo();
        CloneCoordinator::clone_repository(&vcs, &workspace, "https://example.com/repo.git")
            .unwrap();

        assert!(workspace.is_initialized());
        assert!(!stale.exists());
    }
}
