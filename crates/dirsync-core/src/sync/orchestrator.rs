//! Sync orchestration - coordinates the sync workflow

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::actions::Level;
use super::executor::{Descent, FileOperationExecutor};
use super::planner::SyncPlanner;
use super::SyncResult;
use crate::config::{Config, ConfigValidator, PathLimit, PatternMatcher};
use crate::interrupt::Interrupt;
use crate::replicator::MetadataReplicator;
use crate::scanner::{EntryMetadata, Snapshot, SnapshotBuilder};

/// A directory pair waiting to be synced
#[derive(Debug)]
struct PendingPair {
    x: PathBuf,
    y: PathBuf,
    rel: PathBuf,
    depth: usize,
}

/// Work stack item
///
/// A `Restore` for a subdirectory is pushed below the `Sync` of that same
/// subdirectory, so it runs once the whole subtree is done.
#[derive(Debug)]
enum Task {
    Sync(PendingPair),
    Restore {
        path: PathBuf,
        metadata: EntryMetadata,
    },
}

/// Main sync engine
#[derive(Debug)]
pub struct SyncEngine {
    config: Config,
    matcher: Option<PatternMatcher>,
    path_limit: PathLimit,
    interrupt: Interrupt,
    executor: FileOperationExecutor,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// Compiles the ignore/include patterns and resolves the path-length
    /// limit, querying the platform unless the config overrides it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or a pattern does not compile.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        ConfigValidator::validate(&config)?;

        let matcher = if config.ignore.is_empty() && config.include.is_empty() {
            None
        } else {
            Some(PatternMatcher::with_patterns(&config.ignore, &config.include)?)
        };

        let path_limit = config
            .max_path_len
            .map_or_else(|| PathLimit::query(Path::new("/")), PathLimit::new);

        let interrupt = Interrupt::default();
        let executor = Self::executor(&config, path_limit, &interrupt);

        Ok(Self {
            config,
            matcher,
            path_limit,
            interrupt,
            executor,
        })
    }

    /// Stop between actions, and abandon copies in progress, once
    /// `interrupt` is requested
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.executor = Self::executor(&self.config, self.path_limit, &interrupt);
        self.interrupt = interrupt;
        self
    }

    fn executor(
        config: &Config,
        path_limit: PathLimit,
        interrupt: &Interrupt,
    ) -> FileOperationExecutor {
        FileOperationExecutor::new(
            config.dry_run,
            MetadataReplicator::new(config.buffer_size()).with_interrupt(interrupt.clone()),
            path_limit,
        )
    }

    /// Configuration the engine was built with
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Path-length limit in effect
    #[must_use]
    pub const fn path_limit(&self) -> PathLimit {
        self.path_limit
    }

    /// Synchronize the trees rooted at `x` and `y` in both directions
    ///
    /// Never fails as a whole: every error is logged, recorded in the
    /// result, and the sync carries on with the rest of the trees. Once
    /// the interrupt is requested no further entry is touched, but the
    /// metadata of directories already entered is still restored.
    pub fn sync(&self, x: &Path, y: &Path) -> SyncResult {
        let mut result = SyncResult::default();
        let mut stack = vec![Task::Sync(PendingPair {
            x: x.to_path_buf(),
            y: y.to_path_buf(),
            rel: PathBuf::new(),
            depth: 0,
        })];

        while let Some(task) = stack.pop() {
            match task {
                Task::Sync(pair) => {
                    if !self.stop_requested(&mut result) {
                        self.sync_level(&pair, &mut stack, &mut result);
                    }
                }
                Task::Restore { path, metadata } => self.restore(&path, &metadata, &mut result),
            }
        }

        result
    }

    fn sync_level(&self, pair: &PendingPair, stack: &mut Vec<Task>, result: &mut SyncResult) {
        debug!("Syncing {} with {}", pair.x.display(), pair.y.display());

        let mut x_snapshot = self.snapshot(&pair.x, &pair.rel, result);
        let mut y_snapshot = self.snapshot(&pair.y, &pair.rel, result);

        // Shared by all four passes, so a name is decided once per level
        let mut settled = HashSet::new();
        self.sync_files(
            &mut Level {
                a: &pair.y,
                a_snapshot: &mut y_snapshot,
                b: &pair.x,
                b_snapshot: &mut x_snapshot,
                rel: &pair.rel,
            },
            &mut settled,
            result,
        );
        self.sync_files(
            &mut Level {
                a: &pair.x,
                a_snapshot: &mut x_snapshot,
                b: &pair.y,
                b_snapshot: &mut y_snapshot,
                rel: &pair.rel,
            },
            &mut settled,
            result,
        );

        let mut descents = self.sync_dirs(
            &mut Level {
                a: &pair.y,
                a_snapshot: &mut y_snapshot,
                b: &pair.x,
                b_snapshot: &mut x_snapshot,
                rel: &pair.rel,
            },
            &mut settled,
            pair.depth,
            result,
        );
        descents.extend(self.sync_dirs(
            &mut Level {
                a: &pair.x,
                a_snapshot: &mut x_snapshot,
                b: &pair.y,
                b_snapshot: &mut y_snapshot,
                rel: &pair.rel,
            },
            &mut settled,
            pair.depth,
            result,
        ));

        descents.sort_by(|a, b| a.name.cmp(&b.name));
        for descent in descents.into_iter().rev() {
            for (path, metadata) in descent.restores {
                stack.push(Task::Restore { path, metadata });
            }
            stack.push(Task::Sync(PendingPair {
                x: pair.x.join(&descent.name),
                y: pair.y.join(&descent.name),
                rel: pair.rel.join(&descent.name),
                depth: pair.depth + 1,
            }));
        }
    }

    /// File-level pass: copy files and symlinks between the two sides of
    /// `level`, iterating side A
    ///
    /// Names decided here are added to `settled` so the opposite pass over
    /// the same level leaves them alone.
    pub fn sync_files(
        &self,
        level: &mut Level<'_>,
        settled: &mut HashSet<OsString>,
        result: &mut SyncResult,
    ) {
        for action in SyncPlanner::plan_files(level, settled) {
            if self.stop_requested(result) {
                break;
            }
            settled.insert(action.name().to_owned());
            self.executor.execute(action, level, result);
        }
    }

    /// Directory-level pass: create subdirectories of side A missing on
    /// side B and collect the subdirectory pairs to descend into
    ///
    /// `depth` is the depth of `level` below the sync roots.
    pub fn sync_dirs(
        &self,
        level: &mut Level<'_>,
        settled: &mut HashSet<OsString>,
        depth: usize,
        result: &mut SyncResult,
    ) -> Vec<Descent> {
        let descend = self.config.max_depth.is_none_or(|max| depth < max);
        let guard_root = Self::existing_ancestor(level.b).to_path_buf();

        let mut descents = Vec::new();
        for action in SyncPlanner::plan_dirs(level, &guard_root, settled, descend) {
            if self.stop_requested(result) {
                break;
            }
            settled.insert(action.name().to_owned());
            descents.extend(self.executor.execute(action, level, result));
        }
        descents
    }

    fn stop_requested(&self, result: &mut SyncResult) -> bool {
        if !self.interrupt.is_requested() {
            return false;
        }
        if !result.interrupted {
            warn!("Interrupted, stopping the sync");
            result.interrupted = true;
        }
        true
    }

    fn snapshot(&self, dir: &Path, rel: &Path, result: &mut SyncResult) -> Snapshot {
        let builder = SnapshotBuilder::new(self.path_limit).with_matcher(self.matcher.as_ref());

        match builder.build(dir, rel) {
            Ok(snapshot) => snapshot,
            Err(e) if self.config.dry_run && e.is_not_found() => {
                debug!("{} does not exist yet", dir.display());
                Snapshot::empty()
            }
            Err(e) => {
                warn!("{e}. Continuing with an empty listing");
                result.record_error(&e);
                Snapshot::empty()
            }
        }
    }

    fn restore(&self, path: &Path, metadata: &EntryMetadata, result: &mut SyncResult) {
        if self.config.dry_run {
            return;
        }
        if let Err(e) = MetadataReplicator::copy_metadata(path, metadata) {
            warn!("{e}");
            result.record_error(&e);
        }
    }

    /// `path` itself, or the closest ancestor that exists in dry-run mode
    fn existing_ancestor(path: &Path) -> &Path {
        path.ancestors()
            .find(|ancestor| ancestor.exists())
            .unwrap_or(path)
    }
}
