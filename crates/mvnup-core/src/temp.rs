//! Scoped cleanup for the staged download.

use std::path::{Path, PathBuf};

/// Deletes the guarded file when dropped, on success and failure alike.
///
/// Armed before the download starts, so the staged archive never outlives
/// the run regardless of which step failed.
#[derive(Debug)]
pub struct TempFileGuard {
    path: PathBuf,
}

impl TempFileGuard {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!("failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_guard_removes_file_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("staged.zip");
        std::fs::write(&path, b"payload").unwrap();

        {
            let _guard = TempFileGuard::new(path.clone());
            assert!(path.exists());
        }

        assert!(!path.exists());
    }

    #[test]
    fn test_guard_tolerates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("never-created.zip");

        let guard = TempFileGuard::new(path.clone());
        assert_eq!(guard.path(), path.as_path());
        drop(guard);

        assert!(!path.exists());
    }

    #[test]
    fn test_guard_removes_file_created_after_arming() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("staged.zip");

        {
            let _guard = TempFileGuard::new(path.clone());
            std::fs::write(&path, b"partial download").unwrap();
        }

        assert!(!path.exists());
    }
}
