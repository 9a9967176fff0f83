//! Configuration file parsing, merging, and pattern matching
//!
//! This module handles:
//! - Config file discovery from multiple locations
//! - TOML parsing with serde
//! - Config merging with precedence rules
//! - Gitignore-style pattern matching
//! - Validation and error reporting
//! - The platform path-length limit

mod discovery;
mod limits;
mod merge;
mod patterns;
mod types;
mod validation;


pub use discovery::{ConfigDiscovery, ConfigFiles, PROJECT_CONFIG_NAME};
pub use limits::PathLimit;
pub use merge::ConfigMerger;
pub use patterns::PatternMatcher;
pub use types::{Config, DEFAULT_BUFFER_SIZE};
pub use validation::ConfigValidator;

/// Coordinates discovery, parsing, merging, and validation
#[derive(Debug)]
pub struct ConfigManager;

impl ConfigManager {
    /// Load and merge configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if config files are invalid or cannot be read.
    pub fn load(cli_config_path: Option<&std::path::Path>) -> anyhow::Result<Config> {
        let config_files = ConfigDiscovery::discover(cli_config_path);
        Self::load_files(&config_files)
    }

    /// Merge and validate an explicit set of config files
    ///
    /// # Errors
    ///
    /// Returns an error if config files are invalid or cannot be read.
    pub fn load_files(files: &ConfigFiles) -> anyhow::Result<Config> {
        let merged = ConfigMerger::merge(files)?;
        ConfigValidator::validate(&merged)?;
        Ok(merged)
    }
}
