//! Applies planned actions to the filesystem

use std::ffi::OsString;
use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::actions::{Level, Side, SkipReason, SyncAction};
use super::{Conflict, SyncResult};
use crate::config::PathLimit;
use crate::error::SyncError;
use crate::replicator::MetadataReplicator;
use crate::scanner::{Entry, EntryKind, EntryMetadata};

/// Owner permission bits forced onto new directories until their metadata
/// is restored, so that the sync can write into them
const DIR_WRITE_BITS: u32 = 0o700;

/// A subdirectory pair to sync once the current level is done
#[derive(Debug)]
pub struct Descent {
    /// Subdirectory name, shared by both sides
    pub name: OsString,
    /// Metadata to reapply to each side after the subtree is synced
    pub restores: Vec<(PathBuf, EntryMetadata)>,
}

/// Executes sync actions, or only narrates them in dry-run mode
#[derive(Debug)]
pub struct FileOperationExecutor {
    dry_run: bool,
    replicator: MetadataReplicator,
    path_limit: PathLimit,
}

impl FileOperationExecutor {
    /// Create a new executor
    #[must_use]
    pub fn new(dry_run: bool, replicator: MetadataReplicator, path_limit: PathLimit) -> Self {
        Self {
            dry_run,
            replicator,
            path_limit,
        }
    }

    /// Execute one action and record its outcome
    ///
    /// Completed copies and directory creations are registered in the
    /// receiving side's snapshot. Returns the subdirectory to descend into,
    /// if the action calls for one.
    pub fn execute(
        &self,
        action: SyncAction,
        level: &mut Level<'_>,
        result: &mut SyncResult,
    ) -> Option<Descent> {
        let rel = level.rel.join(action.name());

        match action {
            SyncAction::Create { entry, from } => {
                self.copy_entry(&entry, from, level, result, true);
                None
            }
            SyncAction::Update { entry, from } => {
                self.copy_entry(&entry, from, level, result, false);
                None
            }
            SyncAction::CreateDir { entry, from } => self.create_dir(&entry, from, level, result),
            SyncAction::Descend { a, b } => {
                debug!("{} exists on both sides", rel.display());
                Some(Descent {
                    name: a.name().to_owned(),
                    restores: vec![
                        (level.a.join(a.name()), a.metadata().clone()),
                        (level.b.join(b.name()), b.metadata().clone()),
                    ],
                })
            }
            SyncAction::Skip { reason, .. } => {
                match reason {
                    SkipReason::Identical => debug!("{} is up to date", rel.display()),
                    SkipReason::DepthLimit => {
                        warn!("Not descending into {}: maximum depth reached", rel.display());
                    }
                }
                result.record_skip(reason);
                None
            }
            SyncAction::Conflict { kind, .. } => {
                warn!(
                    "Conflict at {}: {kind}. Leaving both sides unchanged",
                    rel.display()
                );
                result.conflicts.push(Conflict { path: rel, kind });
                None
            }
            SyncAction::Unsafe { entry } => {
                let source = level.a.join(entry.name());
                info!(
                    "Unsafe to copy {} into {}: it would be copied into itself",
                    source.display(),
                    level.b.display()
                );
                result.unsafe_dirs.push(source);
                None
            }
            SyncAction::Fail { error, .. } => {
                warn!("{error}");
                result.record_error(&error);
                None
            }
        }
    }

    fn copy_entry(
        &self,
        entry: &Entry,
        from: Side,
        level: &mut Level<'_>,
        result: &mut SyncResult,
        is_new: bool,
    ) {
        let source_dir = level.path(from);
        let dest_dir = level.path(from.other());
        let source = source_dir.join(entry.name());
        let dest = dest_dir.join(entry.name());

        if !self.within_limit(&dest, result) {
            return;
        }

        // Something appeared after the scan, or that side failed to scan
        if is_new && !self.dry_run && fs::symlink_metadata(&dest).is_ok() {
            let error = SyncError::copy(&dest, io::Error::from(io::ErrorKind::AlreadyExists));
            warn!("{error}");
            result.record_error(&error);
            return;
        }

        if self.dry_run {
            info!("[DRY RUN] Would copy {} to {}", source.display(), dest.display());
            if entry.kind() == EntryKind::File {
                result.bytes_copied += entry.metadata().len;
            }
        } else {
            info!("Copying {} to {}", source.display(), dest.display());
            match self.replicator.copy_content(source_dir, dest_dir, entry) {
                Ok(outcome) => {
                    result.bytes_copied += outcome.bytes;
                    if let Some(error) = outcome.metadata_error {
                        warn!("{error}");
                        result.record_error(&error);
                    }
                }
                Err(error) => {
                    warn!("{error}");
                    result.record_error(&error);
                    return;
                }
            }
        }

        if is_new {
            result.created += 1;
        } else {
            result.updated += 1;
        }
        level
            .snapshot_mut(from.other())
            .files
            .insert(entry.name(), entry.metadata().clone());
    }

    fn create_dir(
        &self,
        entry: &Entry,
        from: Side,
        level: &mut Level<'_>,
        result: &mut SyncResult,
    ) -> Option<Descent> {
        let dest = level.path(from.other()).join(entry.name());

        if !self.within_limit(&dest, result) {
            return None;
        }

        if self.dry_run {
            info!("[DRY RUN] Would create directory {}", dest.display());
        } else {
            info!("Creating directory {}", dest.display());
            if let Err(e) = DirBuilder::new()
                .mode(entry.metadata().mode | DIR_WRITE_BITS)
                .create(&dest)
            {
                let error = SyncError::copy(&dest, e);
                warn!("{error}");
                result.record_error(&error);
                return None;
            }
        }

        result.directories_created += 1;
        level
            .snapshot_mut(from.other())
            .subdirs
            .insert(entry.name(), entry.metadata().clone());

        Some(Descent {
            name: entry.name().to_owned(),
            restores: vec![(dest, entry.metadata().clone())],
        })
    }

    fn within_limit(&self, path: &Path, result: &mut SyncResult) -> bool {
        match self.path_limit.check(path) {
            Ok(()) => true,
            Err(error) => {
                warn!("{error}");
                result.record_error(&error);
                false
            }
        }
    }
}
