//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Arrays** (ignore, include): additive, values from all files are combined
//! - **Booleans** (`dry_run`, verbose): OR, any file that enables a flag enables it
//! - **Optional scalars** (`max_depth`, `buffer_size`, `max_path_len`): a value in a
//!   higher-precedence file replaces one from a lower-precedence file

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::discovery::ConfigFiles;
use super::types::Config;

/// Configuration merger
#[derive(Debug)]
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge config files, lowest precedence first: global, project, CLI
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> anyhow::Result<Config> {
        let mut merged = Config::default();

        for path in [&files.global, &files.project, &files.cli]
            .into_iter()
            .flatten()
        {
            Self::merge_into(&mut merged, path)?;
        }

        Ok(merged)
    }

    /// Load and merge a single config file into the existing config
    fn merge_into(base: &mut Config, path: &Path) -> anyhow::Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Self::overlay(base, config);
        Ok(())
    }

    /// Apply `top` over `base`
    pub fn overlay(base: &mut Config, top: Config) {
        base.ignore.extend(top.ignore);
        base.include.extend(top.include);

        base.dry_run |= top.dry_run;
        base.verbose |= top.verbose;

        base.max_depth = top.max_depth.or(base.max_depth);
        base.buffer_size = top.buffer_size.or(base.buffer_size);
        base.max_path_len = top.max_path_len.or(base.max_path_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_merge_empty_config() {
        let config = ConfigMerger::merge(&ConfigFiles::default()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_merge_single_config() {
        let tmp = TempDir::new().unwrap();
        let config_file = tmp.path().join("config.toml");
        fs::write(
            &config_file,
            r#"
ignore = ["*.tmp", "*.log"]
verbose = true
"#,
        )
        .unwrap();

        let files = ConfigFiles {
            project: Some(config_file),
            ..ConfigFiles::default()
        };
        let config = ConfigMerger::merge(&files).unwrap();

        assert_eq!(config.ignore.len(), 2);
        assert!(config.verbose);
    }

    #[test]
    fn test_merge_precedence() {
        let tmp = TempDir::new().unwrap();

        let global = tmp.path().join("global.toml");
        fs::write(&global, "ignore = [\"*.tmp\"]\nmax_depth = 3\nbuffer_size = 1024").unwrap();

        let cli = tmp.path().join("cli.toml");
        fs::write(&cli, "ignore = [\"*.log\"]\nmax_depth = 10").unwrap();

        let files = ConfigFiles {
            cli: Some(cli),
            project: None,
            global: Some(global),
        };
        let config = ConfigMerger::merge(&files).unwrap();

        // Arrays combine, scalars from the higher-precedence file win
        assert_eq!(config.ignore, ["*.tmp", "*.log"]);
        assert_eq!(config.max_depth, Some(10));
        assert_eq!(config.buffer_size, Some(1024));
    }

    #[test]
    fn test_merge_boolean_or() {
        let tmp = TempDir::new().unwrap();

        let global = tmp.path().join("global.toml");
        fs::write(&global, "dry_run = true").unwrap();

        let project = tmp.path().join("project.toml");
        fs::write(&project, "dry_run = false").unwrap();

        let files = ConfigFiles {
            cli: None,
            project: Some(project),
            global: Some(global),
        };
        let config = ConfigMerger::merge(&files).unwrap();

        assert!(config.dry_run);
    }

    #[test]
    fn test_merge_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let broken = tmp.path().join("broken.toml");
        fs::write(&broken, "ignore = [").unwrap();

        let files = ConfigFiles {
            cli: Some(broken),
            ..ConfigFiles::default()
        };
        let err = ConfigMerger::merge(&files).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_merge_missing_file() {
        let tmp = TempDir::new().unwrap();
        let files = ConfigFiles {
            cli: Some(tmp.path().join("missing.toml")),
            ..ConfigFiles::default()
        };
        let err = ConfigMerger::merge(&files).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
