//! docs-sync CLI
//!
//! Synchronizes the `docs/` tree of a home repository with every configured
//! destination repository.

mod cli;
mod commands;
mod error;
mod logging;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::Cli;
use error::Result;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the run fully succeeded.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "docs-sync", &mut std::io::stdout());
        return Ok(true);
    }

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(?cli, "Parsed arguments");

    let cwd = std::env::current_dir()?;
    commands::run_sync(&cwd, &cli)
}
