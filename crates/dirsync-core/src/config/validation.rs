//! Configuration validation and error reporting

use super::types::Config;

/// Configuration validator
#[derive(Debug)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &Config) -> anyhow::Result<()> {
        for pattern in &config.ignore {
            if pattern.trim().is_empty() {
                anyhow::bail!("Ignore pattern cannot be empty");
            }
        }

        for pattern in &config.include {
            if pattern.trim().is_empty() {
                anyhow::bail!("Include pattern cannot be empty");
            }
        }

        if config.buffer_size == Some(0) {
            anyhow::bail!("buffer_size must be greater than zero");
        }

        if config.max_path_len == Some(0) {
            anyhow::bail!("max_path_len must be greater than zero");
        }

        if config.max_depth == Some(0) {
            anyhow::bail!("max_depth must be at least 1 (omit it for no limit)");
        }

        Ok(())
    }
}
