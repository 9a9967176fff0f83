//! Log output for the engine's decisions

use std::io::IsTerminal;

use anyhow::Context;
use tracing::Level;

/// Install the global subscriber writing to standard output
///
/// Verbose mode shows every decision. A dry run shows what would be
/// written. Otherwise only errors pass, and the engine emits none.
pub fn init(verbose: bool, dry_run: bool) -> anyhow::Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else if dry_run {
        Level::INFO
    } else {
        Level::ERROR
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(std::io::stdout)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}
