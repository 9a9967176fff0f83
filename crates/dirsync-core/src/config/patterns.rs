//! Gitignore-style pattern matching using the ignore crate

use std::path::Path;

use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Pattern matcher for entry inclusion/exclusion
#[derive(Debug)]
pub struct PatternMatcher {
    gitignore: Gitignore,
}

impl PatternMatcher {
    /// Build pattern matcher from ignore and include patterns
    ///
    /// Include patterns are added as negated ignores, so they re-include
    /// paths an ignore pattern matched.
    ///
    /// # Errors
    ///
    /// Returns an error if patterns are invalid.
    pub fn with_patterns(
        ignore_patterns: &[String],
        include_patterns: &[String],
    ) -> anyhow::Result<Self> {
        let mut builder = GitignoreBuilder::new("");

        for pattern in ignore_patterns {
            builder
                .add_line(None, pattern)
                .with_context(|| format!("Invalid ignore pattern: '{pattern}'"))?;
        }

        for pattern in include_patterns {
            builder
                .add_line(None, &format!("!{pattern}"))
                .with_context(|| format!("Invalid include pattern: '{pattern}'"))?;
        }

        let gitignore = builder.build().context("Failed to compile patterns")?;

        Ok(Self { gitignore })
    }

    /// Check if a path relative to the sync roots should be synced
    #[must_use]
    pub fn should_include(&self, path: &Path, is_dir: bool) -> bool {
        !self
            .gitignore
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }
}
