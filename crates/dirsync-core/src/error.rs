//! Error types for the sync engine
//!
//! Every error produced while a sync is running is recovered by the engine:
//! it is logged, counted in the [`SyncResult`](crate::sync::SyncResult) and
//! the sync carries on with the next entry or directory.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Failures raised while scanning, copying or replicating metadata
#[derive(Error, Debug)]
pub enum SyncError {
    /// A directory or one of its entries could not be listed or stat'd
    #[error("failed to scan {}: {source}", path.display())]
    Scan {
        /// Directory or entry being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file's content or a symlink's target could not be read or written
    #[error("failed to copy {}: {source}", path.display())]
    Copy {
        /// Path that failed to read or write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Permission bits or timestamps could not be applied
    #[error("failed to apply metadata to {}: {source}", path.display())]
    Metadata {
        /// Path whose metadata was being changed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A path would exceed the platform path-length limit
    #[error("path exceeds {limit} bytes: {}", path.display())]
    PathTooLong {
        /// The offending path
        path: PathBuf,
        /// Configured limit in bytes
        limit: usize,
    },
}

impl SyncError {
    pub(crate) fn scan(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn copy(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Copy {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn metadata(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    /// The path this error occurred at
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Scan { path, .. }
            | Self::Copy { path, .. }
            | Self::Metadata { path, .. }
            | Self::PathTooLong { path, .. } => path,
        }
    }

    /// Whether the underlying I/O error reports a missing path
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Scan { source, .. } | Self::Copy { source, .. } | Self::Metadata { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
            Self::PathTooLong { .. } => false,
        }
    }
}
