//! Configuration types and structures

use serde::{Deserialize, Serialize};

/// Default chunk size for streamed file copies
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Engine configuration
///
/// Loaded from TOML files and overridden by command-line flags; passed to
/// the engine explicitly instead of living in process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Gitignore-style patterns left out of the sync on both sides
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Patterns that re-include paths matched by `ignore`
    #[serde(default)]
    pub include: Vec<String>,

    /// Plan and narrate without writing anything
    #[serde(default)]
    pub dry_run: bool,

    /// Narrate every decision
    #[serde(default)]
    pub verbose: bool,

    /// Maximum directory depth to descend below the roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Chunk size in bytes for streamed copies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_size: Option<usize>,

    /// Override for the platform path-length limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_path_len: Option<usize>,
}

impl Config {
    /// Effective copy chunk size
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE)
    }
}
