use std::path::PathBuf;

use clap::Parser;
use dirsync_core::Config;

/// Bidirectional directory synchronization
///
/// After a run both directories hold the union of their files and
/// subdirectories. Where a file differs, the version with the later
/// modification time is copied over the other. Nothing is ever deleted.
#[derive(Parser, Debug)]
#[command(name = "dirsync")]
#[command(about, long_about, version)]
pub struct Cli {
    /// Narrate every decision on standard output
    #[arg(short = 'o', long)]
    pub verbose: bool,

    /// Preview changes without executing (dry-run)
    #[arg(long)]
    pub dry_run: bool,

    /// Use specific config file
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Leave paths matching this gitignore-style pattern out of the sync
    #[arg(long, value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Sync paths matching this pattern even if an ignore pattern matches
    #[arg(long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Do not descend more than N directory levels below the roots
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// First directory
    pub dir1: PathBuf,

    /// Second directory
    pub dir2: PathBuf,
}

impl Cli {
    /// Config holding only what was given on the command line
    pub fn overrides(&self) -> Config {
        Config {
            ignore: self.ignore.clone(),
            include: self.include.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose,
            max_depth: self.max_depth,
            ..Config::default()
        }
    }
}
