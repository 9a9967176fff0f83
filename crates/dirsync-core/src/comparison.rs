//! Entry comparison and conflict detection
//!
//! This module decides, for one name present on the source side, what the
//! other side needs:
//! - Which side is newer via whole-second modification times
//! - Whether two symlinks point at the same target
//! - Which divergences are ambiguous and must be left for the user
//! - Whether a directory copy would recurse into itself ([`CycleGuard`])

mod cycle;
mod timestamp;

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use cycle::CycleGuard;
pub use timestamp::TimestampComparator;

use crate::error::{Result, SyncError};
use crate::scanner::{Entry, EntryKind};

/// Why a divergence was left unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// Same modification time, different sizes
    SizeMismatch {
        /// Size on the source side
        source_len: u64,
        /// Size on the destination side
        dest_len: u64,
    },
    /// Symlinks with different targets and the same modification time
    LinkTargets {
        /// Target on the source side
        source_target: PathBuf,
        /// Target on the destination side
        dest_target: PathBuf,
    },
    /// A symlink on one side and a regular file on the other, same modification time
    TypeMismatch,
    /// A directory on one side and a file or symlink on the other
    KindClash,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch {
                source_len,
                dest_len,
            } => write!(f, "same modification time, sizes {source_len} and {dest_len}"),
            Self::LinkTargets {
                source_target,
                dest_target,
            } => write!(
                f,
                "same modification time, links to {} and {}",
                source_target.display(),
                dest_target.display()
            ),
            Self::TypeMismatch => f.write_str("same modification time, symlink and regular file"),
            Self::KindClash => f.write_str("directory on one side, file on the other"),
        }
    }
}

/// Result of comparing one source entry against the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonResult {
    /// Only the source has this name
    SourceOnly,
    /// Considered identical (same time and size, or same link target)
    Identical,
    /// Source was modified later
    SourceNewer,
    /// Destination was modified later
    DestinationNewer,
    /// Both differ and neither can be preferred
    Conflict(ConflictKind),
}

/// Compares a source entry with its namesake on the destination side
#[derive(Debug)]
pub struct EntryComparator;

impl EntryComparator {
    /// Compare `source` (found in `source_dir`) against `dest` (in `dest_dir`)
    ///
    /// Entries sharing a filesystem identity are identical without further
    /// checks. Symlinks are compared by target first; only links with different
    /// targets fall back to modification times. A tie in either case is a
    /// conflict rather than a guess.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Copy`] if a symlink target cannot be read.
    pub fn compare(
        source_dir: &Path,
        source: &Entry,
        dest_dir: &Path,
        dest: Option<&Entry>,
    ) -> Result<ComparisonResult> {
        let Some(dest) = dest else {
            return Ok(ComparisonResult::SourceOnly);
        };

        let src_meta = source.metadata();
        let dst_meta = dest.metadata();

        // Same object, or an entry recorded from the copy just made
        if src_meta.identity == dst_meta.identity {
            return Ok(ComparisonResult::Identical);
        }

        let ordering = TimestampComparator::compare(src_meta.modified, dst_meta.modified);

        match (source.kind(), dest.kind()) {
            (EntryKind::Symlink, EntryKind::Symlink) => {
                let source_target = Self::read_target(&source_dir.join(source.name()))?;
                let dest_target = Self::read_target(&dest_dir.join(dest.name()))?;

                if source_target == dest_target {
                    return Ok(ComparisonResult::Identical);
                }
                Ok(Self::newer_side(ordering).unwrap_or(ComparisonResult::Conflict(
                    ConflictKind::LinkTargets {
                        source_target,
                        dest_target,
                    },
                )))
            }
            (a, b) if a != b => Ok(Self::newer_side(ordering)
                .unwrap_or(ComparisonResult::Conflict(ConflictKind::TypeMismatch))),
            _ => Ok(Self::newer_side(ordering).unwrap_or_else(|| {
                if src_meta.len == dst_meta.len {
                    ComparisonResult::Identical
                } else {
                    ComparisonResult::Conflict(ConflictKind::SizeMismatch {
                        source_len: src_meta.len,
                        dest_len: dst_meta.len,
                    })
                }
            })),
        }
    }

    fn newer_side(ordering: Ordering) -> Option<ComparisonResult> {
        match ordering {
            Ordering::Greater => Some(ComparisonResult::SourceNewer),
            Ordering::Less => Some(ComparisonResult::DestinationNewer),
            Ordering::Equal => None,
        }
    }

    fn read_target(link: &Path) -> Result<PathBuf> {
        fs::read_link(link).map_err(|e| SyncError::copy(link, e))
    }
}
