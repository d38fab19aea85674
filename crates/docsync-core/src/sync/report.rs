//! Run reports

use chrono::{DateTime, Utc};
use docsync_fs::MirrorStats;
use serde::Serialize;

use crate::home::Pulled;

/// The step of a repository pass that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Acquire,
    Recover,
    PullBack,
    CollectLoose,
    Mirror,
    Commit,
    Push,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Acquire => "acquire",
            Stage::Recover => "recover",
            Stage::PullBack => "pull back",
            Stage::CollectLoose => "collect loose docs",
            Stage::Mirror => "mirror",
            Stage::Commit => "commit",
            Stage::Push => "push",
        };
        f.write_str(name)
    }
}

/// Final state of one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A commit was created (and pushed, unless pushing is disabled)
    Synced {
        commit: String,
        pushed: bool,
        push_attempts: u32,
    },
    /// Nothing under `docs/` changed
    Skipped,
    /// The pass stopped at `stage`
    Failed { stage: Stage, error: String },
}

/// What a pass did to one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReport {
    /// `owner/name`
    pub repo: String,
    pub short_name: String,
    pub outcome: Outcome,
    /// Files restored from history into the owned subtree
    pub restored: usize,
    /// Files pulled back into home from the owned subtree
    pub pulled: usize,
    /// Loose entries promoted into the owned subtree
    pub loose: Vec<String>,
    pub mirror: MirrorStats,
}

impl RepoReport {
    pub fn new(repo: String, short_name: String) -> Self {
        Self {
            repo,
            short_name,
            outcome: Outcome::Skipped,
            restored: 0,
            pulled: 0,
            loose: Vec::new(),
            mirror: MirrorStats::default(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

/// Result of committing pulled content in the home repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HomeCommit {
    /// Nothing was pulled, or the pulls produced no change
    NotNeeded,
    Committed { commit: String },
    Failed { error: String },
}

/// Counts of repository outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Everything a run did.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub home: String,
    pub branch: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub repos: Vec<RepoReport>,
    pub pulls: Vec<Pulled>,
    pub home_commit: HomeCommit,
    pub tally: Tally,
}

impl SyncReport {
    pub fn new(
        home: String,
        branch: String,
        started_at: DateTime<Utc>,
        repos: Vec<RepoReport>,
        pulls: Vec<Pulled>,
        home_commit: HomeCommit,
    ) -> Self {
        let tally = repos.iter().fold(Tally::default(), |mut tally, repo| {
            match repo.outcome {
                Outcome::Synced { .. } => tally.synced += 1,
                Outcome::Skipped => tally.skipped += 1,
                Outcome::Failed { .. } => tally.failed += 1,
            }
            tally
        });

        Self {
            home,
            branch,
            started_at,
            finished_at: Utc::now(),
            repos,
            pulls,
            home_commit,
            tally,
        }
    }

    /// True when no repository failed and the home commit did not fail.
    pub fn success(&self) -> bool {
        self.tally.failed == 0 && !matches!(self.home_commit, HomeCommit::Failed { .. })
    }

    /// Report for `short_name`, if it was part of the run.
    pub fn repo(&self, short_name: &str) -> Option<&RepoReport> {
        self.repos.iter().find(|r| r.short_name == short_name)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
