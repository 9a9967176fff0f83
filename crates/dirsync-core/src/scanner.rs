//! Directory scanning
//!
//! This module turns one directory level into a [`Snapshot`]:
//! - [`Entry`]: a name plus metadata captured without following symlinks
//! - [`EntryCollection`]: a sorted, name-unique set of entries
//! - [`SnapshotBuilder`]: lists a directory and partitions it into files and subdirectories

mod collection;
mod entry;
mod snapshot;


use std::fs;
use std::path::Path;

pub use collection::EntryCollection;
pub use entry::{Entry, EntryKind, EntryMetadata, FileIdentity};
pub use snapshot::{Snapshot, SnapshotBuilder};

use crate::error::{Result, SyncError};

/// Check that `path` can be opened as a directory
///
/// # Errors
///
/// Returns [`SyncError::Scan`] if the path does not exist, is not a
/// directory, or cannot be listed.
pub fn open_root(path: &Path) -> Result<()> {
    fs::read_dir(path)
        .map(drop)
        .map_err(|e| SyncError::scan(path, e))
}
