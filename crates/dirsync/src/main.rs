mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use dirsync_core::config::{ConfigManager, ConfigMerger};
use dirsync_core::{Config, Interrupt, SyncEngine, SyncReporter, scanner};

/// Standard exit code for SIGINT
const INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    // First Ctrl+C stops the sync after cleaning up, a second one exits at once
    let interrupt = Interrupt::new();
    let handle = interrupt.clone();
    ctrlc::set_handler(move || {
        if handle.request() {
            std::process::exit(i32::from(INTERRUPTED));
        }
        eprintln!("\n\nInterrupted by user (Ctrl+C), stopping");
    })
    .context("Failed to set Ctrl+C handler")?;

    let mut config = if cli.no_config {
        Config::default()
    } else {
        ConfigManager::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    ConfigMerger::overlay(&mut config, cli.overrides());

    logging::init(config.verbose, config.dry_run)?;

    for dir in [&cli.dir1, &cli.dir2] {
        scanner::open_root(dir).with_context(|| {
            format!(
                "Cannot open {} as a directory. Run `dirsync -h` for usage",
                dir.display()
            )
        })?;
    }

    let engine = SyncEngine::new(config)
        .context("Invalid configuration")?
        .with_interrupt(interrupt);
    let result = engine.sync(&cli.dir1, &cli.dir2);

    if engine.config().verbose || engine.config().dry_run {
        println!("{}", SyncReporter::generate_summary(&result));
    }

    if result.interrupted {
        return Ok(ExitCode::from(INTERRUPTED));
    }
    Ok(ExitCode::SUCCESS)
}
