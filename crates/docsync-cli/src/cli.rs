//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;
use docsync_core::Manifest;

/// docs-sync - Keep a shared docs/ tree consistent across repositories
///
/// Each destination repository owns docs/<name>/; everything else under
/// docs/ comes from the home repository.
///
/// Examples:
///   docs-sync                  # Sync every configured repository
///   docs-sync billing          # Sync only acme/billing
///   docs-sync --no-push --json # Commit locally and print a JSON report
#[derive(Parser, Debug)]
#[command(name = "docs-sync")]
#[command(author, version, about)]
pub struct Cli {
    /// Sync only this repository (short name or owner/name)
    pub repo: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Home repository (defaults to the repository containing the current directory)
    #[arg(long, value_name = "PATH")]
    pub home: Option<PathBuf>,

    /// Configuration file (.toml, .json, .yaml)
    #[arg(long, value_name = "PATH", env = "DOCS_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Branch to sync in every repository
    #[arg(long)]
    pub branch: Option<String>,

    /// Directory caching working clones
    #[arg(long, value_name = "PATH")]
    pub clone_dir: Option<PathBuf>,

    /// Base URL for clone URLs ({remote}/{owner}/{name}.git)
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Commit in destination repositories without pushing
    #[arg(long)]
    pub no_push: bool,

    /// Output the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Command-line layer of the settings.
    pub fn overrides(&self) -> Manifest {
        Manifest {
            repos: None,
            branch: self.branch.clone(),
            clone_dir: self.clone_dir.clone(),
            remote: self.remote.clone(),
            home: None,
        }
    }
}
