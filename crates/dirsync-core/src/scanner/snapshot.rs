//! One-level directory snapshots

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::collection::EntryCollection;
use super::entry::{EntryKind, EntryMetadata};
use crate::config::{PathLimit, PatternMatcher};
use crate::error::{Result, SyncError};
use crate::replicator::STAGING_PREFIX;

/// Contents of one directory level, partitioned by kind
///
/// `files` holds regular files and symlinks (including symlinks to
/// directories); `subdirs` holds real subdirectories. A snapshot is owned by
/// the sync step that built it and dropped when that step returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Regular files and symlinks
    pub files: EntryCollection,
    /// Subdirectories
    pub subdirs: EntryCollection,
}

impl Snapshot {
    /// Empty snapshot, used for a side that could not be scanned
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            files: EntryCollection::new(),
            subdirs: EntryCollection::new(),
        }
    }

    /// Total number of entries on this level
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len() + self.subdirs.len()
    }

    /// Whether the level holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.subdirs.is_empty()
    }
}

/// Builds [`Snapshot`]s from the OS directory listing
#[derive(Debug, Clone, Copy)]
pub struct SnapshotBuilder<'a> {
    path_limit: PathLimit,
    matcher: Option<&'a PatternMatcher>,
}

impl<'a> SnapshotBuilder<'a> {
    /// Create a builder that enforces the given path limit
    #[must_use]
    pub const fn new(path_limit: PathLimit) -> Self {
        Self {
            path_limit,
            matcher: None,
        }
    }

    /// Leave out entries rejected by the ignore/include patterns
    #[must_use]
    pub const fn with_matcher(mut self, matcher: Option<&'a PatternMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Scan one level of `dir`
    ///
    /// `rel_dir` is the location of `dir` relative to the sync root and is
    /// only used for pattern matching. Entry status is read without following
    /// symlinks. Devices, FIFOs and sockets are skipped with a warning.
    /// Staging files of unfinished copies are never listed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Scan`] if the directory cannot be listed or an
    /// entry's status cannot be read. Entries that vanish between listing and
    /// status read are skipped instead.
    pub fn build(&self, dir: &Path, rel_dir: &Path) -> Result<Snapshot> {
        let listing = fs::read_dir(dir).map_err(|e| SyncError::scan(dir, e))?;
        let mut snapshot = Snapshot::empty();

        for dirent in listing {
            let dirent = dirent.map_err(|e| SyncError::scan(dir, e))?;
            let name = dirent.file_name();
            let path = dirent.path();

            if name.as_encoded_bytes().starts_with(STAGING_PREFIX.as_bytes()) {
                debug!("Skipping staging file {}", path.display());
                continue;
            }

            if let Err(e) = self.path_limit.check(&path) {
                warn!("Skipping entry: {e}");
                continue;
            }

            let metadata = match fs::symlink_metadata(&path) {
                Ok(metadata) => EntryMetadata::from(&metadata),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!("{} disappeared during scan, skipping", path.display());
                    continue;
                }
                Err(e) => return Err(SyncError::scan(&path, e)),
            };

            if let Some(matcher) = self.matcher {
                let is_dir = metadata.kind == EntryKind::Directory;
                if !matcher.should_include(&rel_dir.join(&name), is_dir) {
                    debug!("Ignoring {} (matches ignore pattern)", path.display());
                    continue;
                }
            }

            match metadata.kind {
                EntryKind::Directory => snapshot.subdirs.insert(&name, metadata),
                EntryKind::File | EntryKind::Symlink => snapshot.files.insert(&name, metadata),
                EntryKind::Other => {
                    warn!(
                        "Ignored unhandled file type {} in directory {}",
                        name.to_string_lossy(),
                        dir.display()
                    );
                }
            }
        }

        Ok(snapshot)
    }
}
