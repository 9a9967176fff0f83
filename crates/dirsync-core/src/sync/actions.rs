//! Sync action determination

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use crate::comparison::{ComparisonResult, ConflictKind};
use crate::error::SyncError;
use crate::scanner::{Entry, Snapshot};

/// One of the two directories in a pass
///
/// In each pass `A` is the side being iterated and `B` the side it is
/// compared against. Copies may still flow from `B` to `A` when `B` holds
/// the newer version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The iterated side
    A,
    /// The looked-up side
    B,
}

impl Side {
    /// The opposite side
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Why an entry was left alone without a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// Same modification time and size, or same symlink target
    Identical,
    /// Subdirectory below the configured maximum depth
    DepthLimit,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical => f.write_str("identical"),
            Self::DepthLimit => f.write_str("depth limit"),
        }
    }
}

/// Sync action to perform for one name on one directory level
#[derive(Debug)]
pub enum SyncAction {
    /// Copy a file or symlink the other side lacks
    Create {
        /// Entry on the source side
        entry: Entry,
        /// Side the entry is copied from
        from: Side,
    },
    /// Copy a newer file or symlink over the older one
    Update {
        /// Newer entry
        entry: Entry,
        /// Side holding the newer entry
        from: Side,
    },
    /// Create a subdirectory the other side lacks, then sync into it
    CreateDir {
        /// Subdirectory on the source side
        entry: Entry,
        /// Side the subdirectory is copied from
        from: Side,
    },
    /// Sync a subdirectory present on both sides
    Descend {
        /// Subdirectory on side A
        a: Entry,
        /// Subdirectory on side B
        b: Entry,
    },
    /// Nothing to do
    Skip {
        /// Entry left alone
        entry: Entry,
        /// Why it is left alone
        reason: SkipReason,
    },
    /// Divergence left for the user
    Conflict {
        /// Entry on side A
        entry: Entry,
        /// How the two sides diverge
        kind: ConflictKind,
    },
    /// Directory copy refused by the cycle guard
    Unsafe {
        /// Subdirectory on side A
        entry: Entry,
    },
    /// No decision could be made for this entry
    Fail {
        /// Entry on side A
        entry: Entry,
        /// Why no decision was possible
        error: SyncError,
    },
}

impl SyncAction {
    /// Name of the entry this action concerns
    #[must_use]
    pub fn name(&self) -> &OsStr {
        match self {
            Self::Create { entry, .. }
            | Self::Update { entry, .. }
            | Self::CreateDir { entry, .. }
            | Self::Descend { a: entry, .. }
            | Self::Skip { entry, .. }
            | Self::Conflict { entry, .. }
            | Self::Unsafe { entry }
            | Self::Fail { entry, .. } => entry.name(),
        }
    }

    /// Turn a file comparison into an action
    ///
    /// `source` lives on side A, `dest` (if any) on side B.
    #[must_use]
    pub fn resolve(source: &Entry, dest: Option<&Entry>, comparison: ComparisonResult) -> Self {
        match (comparison, dest) {
            (ComparisonResult::SourceOnly, _) | (ComparisonResult::SourceNewer, None) => {
                Self::Create {
                    entry: source.clone(),
                    from: Side::A,
                }
            }
            (ComparisonResult::SourceNewer, Some(_)) => Self::Update {
                entry: source.clone(),
                from: Side::A,
            },
            (ComparisonResult::DestinationNewer, Some(dest)) => Self::Update {
                entry: dest.clone(),
                from: Side::B,
            },
            (ComparisonResult::Identical | ComparisonResult::DestinationNewer, _) => Self::Skip {
                entry: source.clone(),
                reason: SkipReason::Identical,
            },
            (ComparisonResult::Conflict(kind), _) => Self::Conflict {
                entry: source.clone(),
                kind,
            },
        }
    }
}

/// The two directories of one pass and their snapshots
///
/// Passes over the same level swap `a` and `b`; the snapshots are borrowed
/// mutably so that completed copies can be recorded on the receiving side.
#[derive(Debug)]
pub struct Level<'l> {
    /// Path of side A
    pub a: &'l Path,
    /// Snapshot of side A
    pub a_snapshot: &'l mut Snapshot,
    /// Path of side B
    pub b: &'l Path,
    /// Snapshot of side B
    pub b_snapshot: &'l mut Snapshot,
    /// Location of this level relative to the sync roots
    pub rel: &'l Path,
}

impl Level<'_> {
    /// Directory on `side`
    #[must_use]
    pub const fn path(&self, side: Side) -> &Path {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    /// Snapshot on `side`, for recording what was written there
    pub fn snapshot_mut(&mut self, side: Side) -> &mut Snapshot {
        match side {
            Side::A => &mut *self.a_snapshot,
            Side::B => &mut *self.b_snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{EntryKind, EntryMetadata, FileIdentity};
    use std::time::SystemTime;

    fn entry(name: &str, ino: u64) -> Entry {
        Entry::new(
            name,
            EntryMetadata {
                kind: EntryKind::File,
                len: 1,
                modified: SystemTime::UNIX_EPOCH,
                accessed: SystemTime::UNIX_EPOCH,
                mode: 0o644,
                identity: FileIdentity { dev: 1, ino },
            },
        )
    }

    #[test]
    fn test_resolve_source_only() {
        let source = entry("a", 1);
        let action = SyncAction::resolve(&source, None, ComparisonResult::SourceOnly);
        assert!(matches!(action, SyncAction::Create { from: Side::A, .. }));
        assert_eq!(action.name(), "a");
    }

    #[test]
    fn test_resolve_destination_newer_copies_from_b() {
        let source = entry("a", 1);
        let dest = entry("a", 2);
        let action = SyncAction::resolve(&source, Some(&dest), ComparisonResult::DestinationNewer);

        match action {
            SyncAction::Update { entry, from } => {
                assert_eq!(from, Side::B);
                assert_eq!(entry.metadata().identity.ino, 2);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_resolve_identical_and_conflict() {
        let source = entry("a", 1);
        let dest = entry("a", 2);

        let action = SyncAction::resolve(&source, Some(&dest), ComparisonResult::Identical);
        assert!(matches!(action, SyncAction::Skip { reason: SkipReason::Identical, .. }));

        let action = SyncAction::resolve(
            &source,
            Some(&dest),
            ComparisonResult::Conflict(ConflictKind::TypeMismatch),
        );
        assert!(matches!(
            action,
            SyncAction::Conflict {
                kind: ConflictKind::TypeMismatch,
                ..
            }
        ));
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::A.other(), Side::B);
        assert_eq!(Side::B.other(), Side::A);
    }
}
