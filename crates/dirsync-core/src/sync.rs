//! Bidirectional synchronization engine
//!
//! Each directory level is synced in two passes per kind: files and symlinks
//! from Y against X, then from X against Y, followed by subdirectories in
//! the same order. Every pass first plans its actions from the two
//! snapshots, then executes them. Subdirectories are handled through an
//! explicit work stack rather than recursion.

mod actions;
mod executor;
mod orchestrator;
mod planner;
mod reporting;


use std::collections::BTreeMap;
use std::path::PathBuf;

pub use actions::{Level, Side, SkipReason, SyncAction};
pub use executor::{Descent, FileOperationExecutor};
pub use orchestrator::SyncEngine;
pub use planner::SyncPlanner;
pub use reporting::SyncReporter;

use crate::comparison::ConflictKind;
use crate::error::SyncError;

/// A divergence that was left unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Path relative to the sync roots
    pub path: PathBuf,
    /// What kind of divergence it is
    pub kind: ConflictKind,
}

/// Synchronization result with statistics
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    /// Files and symlinks copied to a side that lacked them
    pub created: usize,
    /// Files and symlinks copied over an older version
    pub updated: usize,
    /// Directories created
    pub directories_created: usize,
    /// Bytes of file content copied
    pub bytes_copied: u64,
    /// Entries left alone
    pub skipped: usize,
    /// Breakdown of `skipped` by reason
    pub skip_reasons: BTreeMap<SkipReason, usize>,
    /// Divergences left for the user
    pub conflicts: Vec<Conflict>,
    /// Directories the cycle guard refused to copy
    pub unsafe_dirs: Vec<PathBuf>,
    /// Recovered errors
    pub errors: Vec<String>,
    /// Whether the sync stopped early on request
    pub interrupted: bool,
}

impl SyncResult {
    /// Total operations performed
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.created + self.updated + self.directories_created
    }

    /// Whether sync was successful (no errors)
    ///
    /// Conflicts and unsafe directories do not count as errors.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Count a skipped entry
    pub fn record_skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        *self.skip_reasons.entry(reason).or_default() += 1;
    }

    /// Keep a recovered error for the summary
    pub fn record_error(&mut self, error: &SyncError) {
        self.errors.push(error.to_string());
    }
}
