//! Sync command implementation

use std::path::Path;

use colored::Colorize;

use docsync_core::{
    HomeCommit, Outcome, PullKind, SettingsResolver, SyncEngine, SyncOptions, SyncReport,
};
use docsync_git::Git2Client;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Run a sync from the home repository containing `cwd` (or `--home`).
///
/// Returns whether every repository and the home commit succeeded.
pub fn run_sync(cwd: &Path, cli: &Cli) -> Result<bool> {
    let start = cli.home.as_deref().unwrap_or(cwd);
    let home = docsync_git::discover(start).map_err(|_| {
        CliError::user(format!(
            "{} is not inside a git repository (use --home to point at the home repository)",
            start.display()
        ))
    })?;

    let mut resolver = SettingsResolver::new(&home);
    if let Some(config) = &cli.config {
        resolver = resolver.with_config_file(config);
    }
    let settings = resolver.resolve(&cli.overrides())?;

    let options = SyncOptions {
        push: !cli.no_push,
        ..SyncOptions::default()
    };
    let engine = SyncEngine::new(Git2Client::new(), &home, settings, options)?;

    if !cli.json {
        println!(
            "{} Syncing docs from {} ({} repositories)",
            "=>".blue().bold(),
            engine.sync_set().home().cyan(),
            engine.sync_set().destinations().len()
        );
    }

    let report = engine.run(cli.repo.as_deref())?;

    if cli.json {
        println!("{}", report.to_json());
    } else {
        print!("{}", render(&report));
    }

    Ok(report.success())
}

/// Human-readable summary: one line per repository, the tally, the home commit.
pub fn render(report: &SyncReport) -> String {
    let mut lines = Vec::new();

    for repo in &report.repos {
        let line = match &repo.outcome {
            Outcome::Synced {
                commit,
                pushed,
                push_attempts,
            } => {
                let detail = if !pushed {
                    format!("{}, not pushed", short(commit))
                } else if *push_attempts > 1 {
                    format!("{}, pushed after {push_attempts} attempts", short(commit))
                } else {
                    short(commit).to_string()
                };
                format!("{} {} ({})", "SYNCED".green().bold(), repo.repo, detail.dimmed())
            }
            Outcome::Skipped => format!(
                "{} {} ({})",
                "SKIPPED".yellow().bold(),
                repo.repo,
                "no changes".dimmed()
            ),
            Outcome::Failed { stage, error } => format!(
                "{} {}: {} failed: {}",
                "FAILED".red().bold(),
                repo.repo,
                stage,
                error
            ),
        };
        lines.push(format!("   {line}"));

        if repo.restored > 0 {
            lines.push(format!(
                "      {} restored {} file(s) of docs/{} from history",
                "+".green(),
                repo.restored,
                repo.short_name
            ));
        }
        lines.extend(repo.loose.iter().map(|entry| {
            format!(
                "      {} moved docs/{} to docs/{}/{}",
                "+".green(),
                entry,
                repo.short_name,
                entry
            )
        }));
    }

    lines.extend(
        report
            .pulls
            .iter()
            .filter(|pull| pull.kind == PullKind::Owned)
            .map(|pull| {
                format!(
                    "   {} pulled {} file(s) from docs/{}",
                    "<=".blue(),
                    pull.files,
                    pull.repo
                )
            }),
    );

    let tally = &report.tally;
    lines.push(String::new());
    lines.push(format!(
        "Synced: {}  Skipped: {}  Failed: {}",
        tally.synced, tally.skipped, tally.failed
    ));

    lines.push(match &report.home_commit {
        HomeCommit::NotNeeded => format!("{} nothing pulled", "Home:".bold()),
        HomeCommit::Committed { commit } => format!(
            "{} committed pulled docs ({})",
            "Home:".bold(),
            short(commit)
        ),
        HomeCommit::Failed { error } => {
            format!("{} {} {}", "Home:".bold(), "commit failed:".red().bold(), error)
        }
    });

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn short(commit: &str) -> &str {
    &commit[..commit.len().min(7)]
}
