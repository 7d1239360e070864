use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Handle over the single fixed directory that holds the current checkout.
/// At most one checkout exists per process; starting a new clone wipes and
/// recreates the directory, replacing whatever was there. Concurrent
/// requests share it with no isolation ("last clone wins").
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Whether a checkout directory is present. This is the precondition
    /// for graph builds.
    pub fn is_initialized(&self) -> bool {
        self.root.exists()
    }

    /// Destroy any existing checkout and recreate an empty directory.
    pub fn reset(&self) -> io::Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        fs::create_dir_all(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn starts_uninitialized() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path().join("checkout"));
        assert!(!workspace.is_initialized());
    }

    #[test]
    fn reset_creates_the_directory() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path().join("checkout"));
        workspace.reset().unwrap();
        assert!(workspace.is_initialized());
    }

    #[test]
    fn reset_wipes_a_previous_checkout() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path().join("checkout"));
        workspace.reset().unwrap();
        let stale = workspace.path().join("stale.txt");
        fs::write(&stale, "leftover").unwrap();

        workspace.reset().unwrap();
        assert!(workspace.is_initialized());
        assert!(!stale.exists());
    }
}
