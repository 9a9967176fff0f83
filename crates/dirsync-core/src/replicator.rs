//! Content and metadata replication
//!
//! Regular files are streamed in fixed-size chunks into a temporary file in
//! the destination directory, which is then renamed over the destination
//! name. An existing symlink or read-only file at the destination is
//! replaced, never written through. Symlinks are recreated with the same
//! target; their timestamps are not replicated.
//!
//! Staging files are named with [`STAGING_PREFIX`] and skipped by the
//! scanner. An interrupted copy removes its staging file.

use std::fs::{self, File, Permissions};
use std::io::{self, Read, Write};
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::Path;

use filetime::{FileTime, set_file_times};
use tempfile::Builder;
use tracing::debug;

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::error::{Result, SyncError};
use crate::interrupt::Interrupt;
use crate::scanner::{Entry, EntryKind, EntryMetadata};

/// Name prefix of the temporary files copies are staged in
pub const STAGING_PREFIX: &str = ".dirsync-";

/// Outcome of a successful content copy
#[derive(Debug)]
pub struct CopyOutcome {
    /// Bytes of file content written (zero for symlinks)
    pub bytes: u64,
    /// Metadata failure that was recovered after the content landed
    pub metadata_error: Option<SyncError>,
}

/// Copies entries between directories and reapplies their metadata
#[derive(Debug, Clone)]
pub struct MetadataReplicator {
    buffer_size: usize,
    interrupt: Interrupt,
}

impl Default for MetadataReplicator {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl MetadataReplicator {
    /// Create a replicator that copies in chunks of `buffer_size` bytes
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            interrupt: Interrupt::default(),
        }
    }

    /// Abandon file copies between chunks once `interrupt` is requested
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Apply permission bits, then access and modification times, to `dest`
    ///
    /// Both updates are attempted even if the first one fails.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Metadata`] for the first update the filesystem rejected.
    pub fn copy_metadata(dest: &Path, metadata: &EntryMetadata) -> Result<()> {
        let chmod = fs::set_permissions(dest, Permissions::from_mode(metadata.mode));
        let utime = set_file_times(
            dest,
            FileTime::from_system_time(metadata.accessed),
            FileTime::from_system_time(metadata.modified),
        );

        chmod.and(utime).map_err(|e| SyncError::metadata(dest, e))
    }

    /// Copy `entry` from `source_dir` to the same name in `dest_dir`
    ///
    /// A failed metadata update is reported in the outcome, not as an error:
    /// the copied content is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Copy`] if the source cannot be read, the
    /// destination cannot be written, the entry is not a file or symlink, or
    /// the copy was interrupted. Nothing is left at the destination then.
    pub fn copy_content(&self, source_dir: &Path, dest_dir: &Path, entry: &Entry) -> Result<CopyOutcome> {
        let source = source_dir.join(entry.name());
        let dest = dest_dir.join(entry.name());

        match entry.kind() {
            EntryKind::Symlink => {
                Self::copy_symlink(&source, &dest)?;
                Ok(CopyOutcome {
                    bytes: 0,
                    metadata_error: None,
                })
            }
            EntryKind::File => {
                let bytes = self.copy_file(&source, dest_dir, &dest)?;
                let metadata_error = Self::copy_metadata(&dest, entry.metadata()).err();
                Ok(CopyOutcome {
                    bytes,
                    metadata_error,
                })
            }
            EntryKind::Directory | EntryKind::Other => Err(SyncError::copy(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file or symlink"),
            )),
        }
    }

    fn copy_symlink(source: &Path, dest: &Path) -> Result<()> {
        let target = fs::read_link(source).map_err(|e| SyncError::copy(source, e))?;
        debug!("Creating {} -> {}", dest.display(), target.display());

        if let Ok(existing) = fs::symlink_metadata(dest)
            && !existing.is_dir()
        {
            fs::remove_file(dest).map_err(|e| SyncError::copy(dest, e))?;
        }

        symlink(&target, dest).map_err(|e| SyncError::copy(dest, e))
    }

    fn copy_file(&self, source: &Path, dest_dir: &Path, dest: &Path) -> Result<u64> {
        let mut reader = File::open(source).map_err(|e| SyncError::copy(source, e))?;
        let mut staging = Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(dest_dir)
            .map_err(|e| SyncError::copy(dest, e))?;

        let mut buffer = vec![0; self.buffer_size.max(1)];
        let mut total: u64 = 0;

        loop {
            if self.interrupt.is_requested() {
                return Err(SyncError::copy(dest, io::Error::from(io::ErrorKind::Interrupted)));
            }

            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(SyncError::copy(source, e)),
            };

            staging
                .write_all(&buffer[..bytes_read])
                .map_err(|e| SyncError::copy(dest, e))?;
            total += bytes_read as u64;
        }

        staging.flush().map_err(|e| SyncError::copy(dest, e))?;
        staging
            .persist(dest)
            .map_err(|e| SyncError::copy(dest, e.error))?;

        Ok(total)
    }
}
