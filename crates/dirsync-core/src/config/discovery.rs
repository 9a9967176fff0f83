//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

/// Project config file name, searched from the current directory upwards
pub const PROJECT_CONFIG_NAME: &str = ".dirsync.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project config (.dirsync.toml)
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

/// Config file discovery
#[derive(Debug)]
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// A CLI path that does not exist is kept so that loading reports it,
    /// rather than silently falling back to other files.
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        let project = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::find_file(&cwd, PROJECT_CONFIG_NAME));

        ConfigFiles {
            cli: cli_path.map(Path::to_path_buf),
            project,
            global: Self::find_global_config(),
        }
    }

    /// Find a config file in `start` or one of its ancestors
    pub fn find_file(start: &Path, name: &str) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Find global config in XDG config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("dirsync").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_cli_config() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("custom.toml");
        fs::write(&cli_config, "# config").unwrap();

        let files = ConfigDiscovery::discover(Some(&cli_config));
        assert_eq!(files.cli, Some(cli_config));
    }

    #[test]
    fn test_discover_without_cli_config() {
        let files = ConfigDiscovery::discover(None);
        // project and global may or may not exist depending on test environment
        assert!(files.cli.is_none());
    }

    #[test]
    fn test_find_file_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(PROJECT_CONFIG_NAME), "dry_run = true").unwrap();

        let found = ConfigDiscovery::find_file(&nested, PROJECT_CONFIG_NAME);
        assert_eq!(found, Some(tmp.path().join(PROJECT_CONFIG_NAME)));
    }

    #[test]
    fn test_find_file_ignores_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("not-a-config.toml")).unwrap();

        assert!(ConfigDiscovery::find_file(tmp.path(), "not-a-config.toml").is_none());
    }
}
