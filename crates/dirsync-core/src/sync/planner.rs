//! Diffing two snapshots into a list of actions
//!
//! Planning never touches the snapshots it reads, so the executor is free to
//! record completed copies in them afterwards.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use super::actions::{Level, Side, SkipReason, SyncAction};
use crate::comparison::{ConflictKind, CycleGuard, EntryComparator};
use crate::scanner::Entry;

/// Plans the file-level and directory-level passes for one level
#[derive(Debug)]
pub struct SyncPlanner;

impl SyncPlanner {
    /// Decide, for every file and symlink on side A, what side B needs
    ///
    /// Names in `settled` were already decided by the opposite pass and are
    /// left out.
    #[must_use]
    pub fn plan_files(level: &Level<'_>, settled: &HashSet<OsString>) -> Vec<SyncAction> {
        level
            .a_snapshot
            .files
            .iter()
            .filter(|entry| !settled.contains(entry.name()))
            .map(|entry| Self::plan_file(level, entry))
            .collect()
    }

    fn plan_file(level: &Level<'_>, source: &Entry) -> SyncAction {
        if level.b_snapshot.subdirs.contains(source.name()) {
            return SyncAction::Conflict {
                entry: source.clone(),
                kind: ConflictKind::KindClash,
            };
        }

        let dest = level.b_snapshot.files.find(source.name());
        match EntryComparator::compare(level.a, source, level.b, dest) {
            Ok(comparison) => SyncAction::resolve(source, dest, comparison),
            Err(error) => SyncAction::Fail {
                entry: source.clone(),
                error,
            },
        }
    }

    /// Decide, for every subdirectory on side A, whether to create it on
    /// side B and whether to descend into it
    ///
    /// `guard_root` is the directory the cycle guard ascends from: side B
    /// itself, or its nearest existing ancestor when B does not exist yet.
    /// With `descend` false every subdirectory is skipped.
    #[must_use]
    pub fn plan_dirs(
        level: &Level<'_>,
        guard_root: &Path,
        settled: &HashSet<OsString>,
        descend: bool,
    ) -> Vec<SyncAction> {
        level
            .a_snapshot
            .subdirs
            .iter()
            .filter(|entry| !Self::is_pseudo_entry(entry.name()))
            .filter(|entry| !settled.contains(entry.name()))
            .map(|entry| Self::plan_dir(level, guard_root, entry, descend))
            .collect()
    }

    fn plan_dir(level: &Level<'_>, guard_root: &Path, source: &Entry, descend: bool) -> SyncAction {
        if level.b_snapshot.files.contains(source.name()) {
            return SyncAction::Conflict {
                entry: source.clone(),
                kind: ConflictKind::KindClash,
            };
        }

        if !descend {
            return SyncAction::Skip {
                entry: source.clone(),
                reason: SkipReason::DepthLimit,
            };
        }

        if let Some(dest) = level.b_snapshot.subdirs.find(source.name()) {
            return SyncAction::Descend {
                a: source.clone(),
                b: dest.clone(),
            };
        }

        match CycleGuard::unsafe_to_copy(source, guard_root) {
            Ok(true) => SyncAction::Unsafe {
                entry: source.clone(),
            },
            Ok(false) => SyncAction::CreateDir {
                entry: source.clone(),
                from: Side::A,
            },
            Err(error) => SyncAction::Fail {
                entry: source.clone(),
                error,
            },
        }
    }

    fn is_pseudo_entry(name: &OsStr) -> bool {
        name == "." || name == ".."
    }
}
