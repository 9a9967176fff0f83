//! Guard against copying a directory into itself or one of its descendants

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SyncError};
use crate::scanner::{Entry, FileIdentity};

/// Detects directory copies that would recurse forever
///
/// Copying directory `d` into a location at or below `d` and then syncing
/// into it never terminates, because every level creates the next one.
#[derive(Debug)]
pub struct CycleGuard;

impl CycleGuard {
    /// Whether creating `candidate` inside `dest_root` would create a cycle
    ///
    /// Walks upward from `dest_root` one parent at a time, comparing each
    /// directory's identity to the candidate's. Reaching a directory that is
    /// its own parent means the filesystem root was reached without a match.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Scan`] if any directory on the way up cannot be
    /// resolved or stat'd.
    pub fn unsafe_to_copy(candidate: &Entry, dest_root: &Path) -> Result<bool> {
        let target = candidate.metadata().identity;

        let mut current =
            dunce::canonicalize(dest_root).map_err(|e| SyncError::scan(dest_root, e))?;
        let mut current_id = Self::identity(&current)?;

        if current_id == target {
            debug!("Source and destination are the same directory: {}", current.display());
            return Ok(true);
        }

        loop {
            let Some(parent) = current.parent() else {
                return Ok(false);
            };
            let parent_id = Self::identity(parent)?;

            if parent_id == current_id {
                return Ok(false);
            }
            if parent_id == target {
                debug!(
                    "{} lies inside {}: unsafe to copy a directory into its own subdirectory",
                    dest_root.display(),
                    parent.display()
                );
                return Ok(true);
            }

            current = parent.to_path_buf();
            current_id = parent_id;
        }
    }

    fn identity(path: &Path) -> Result<FileIdentity> {
        fs::metadata(path)
            .map(|metadata| FileIdentity::from(&metadata))
            .map_err(|e| SyncError::scan(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::EntryMetadata;
    use std::os::unix::fs as unix_fs;
    use tempfile::TempDir;

    fn dir_entry(path: &Path) -> Entry {
        let metadata = fs::symlink_metadata(path).unwrap();
        Entry::new(path.file_name().unwrap(), EntryMetadata::from(&metadata))
    }

    #[test]
    fn test_copy_into_itself_is_unsafe() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("d");
        fs::create_dir(&dir).unwrap();

        assert!(CycleGuard::unsafe_to_copy(&dir_entry(&dir), &dir).unwrap());
    }

    #[test]
    fn test_copy_into_descendant_is_unsafe() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("d");
        let deep = dir.join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();

        assert!(CycleGuard::unsafe_to_copy(&dir_entry(&dir), &deep).unwrap());
    }

    #[test]
    fn test_copy_into_sibling_is_safe() {
        let tmp = TempDir::new().unwrap();
        let left = tmp.path().join("left");
        let right = tmp.path().join("right");
        fs::create_dir(&left).unwrap();
        fs::create_dir(&right).unwrap();

        assert!(!CycleGuard::unsafe_to_copy(&dir_entry(&left), &right).unwrap());
    }

    #[test]
    fn test_copy_into_ancestor_is_safe() {
        let tmp = TempDir::new().unwrap();
        let child = tmp.path().join("child");
        fs::create_dir(&child).unwrap();

        assert!(!CycleGuard::unsafe_to_copy(&dir_entry(&child), tmp.path()).unwrap());
    }

    #[test]
    fn test_descendant_reached_through_symlink_is_unsafe() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("d");
        let inner = dir.join("inner");
        fs::create_dir_all(&inner).unwrap();
        let alias = tmp.path().join("alias");
        unix_fs::symlink(&inner, &alias).unwrap();

        assert!(CycleGuard::unsafe_to_copy(&dir_entry(&dir), &alias).unwrap());
    }

    #[test]
    fn test_missing_destination_is_error() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("d");
        fs::create_dir(&dir).unwrap();

        let result = CycleGuard::unsafe_to_copy(&dir_entry(&dir), &tmp.path().join("missing"));
        assert!(matches!(result, Err(SyncError::Scan { .. })));
    }
}
