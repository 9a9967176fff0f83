//! Platform path-length limit

use std::path::Path;

use tracing::debug;

use crate::error::{Result, SyncError};

/// Maximum path length in bytes that the engine will build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLimit(usize);

impl PathLimit {
    /// Limit used when the platform does not report one
    pub const FALLBACK: usize = 1024;

    /// Use an explicit limit
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self(limit)
    }

    /// Ask the platform for `_PC_PATH_MAX` on the filesystem holding `path`
    #[must_use]
    pub fn query(path: &Path) -> Self {
        let reported = nix::unistd::pathconf(path, nix::unistd::PathconfVar::PATH_MAX);
        if let Err(e) = &reported {
            debug!("pathconf failed for {}: {e}", path.display());
        }
        Self::from_reported(reported.ok().flatten())
    }

    /// Use a limit reported by the platform, or [`Self::FALLBACK`] when
    /// there is none or it is not a positive size
    fn from_reported(reported: Option<nix::libc::c_long>) -> Self {
        match reported.and_then(|limit| usize::try_from(limit).ok()) {
            Some(limit) if limit > 0 => {
                debug!("Maximum path size is {limit}");
                Self(limit)
            }
            _ => {
                debug!(
                    "Could not determine maximum path size, retaining default of {}",
                    Self::FALLBACK
                );
                Self(Self::FALLBACK)
            }
        }
    }

    /// Limit in bytes
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Fail if `path` is longer than the limit
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::PathTooLong`] when the path exceeds the limit.
    pub fn check(self, path: &Path) -> Result<()> {
        if path.as_os_str().len() > self.0 {
            return Err(SyncError::PathTooLong {
                path: path.to_path_buf(),
                limit: self.0,
            });
        }
        Ok(())
    }
}

impl Default for PathLimit {
    fn default() -> Self {
        Self(Self::FALLBACK)
    }
}
