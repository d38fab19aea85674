//! One repository's pass: acquire, recover, pull back, collect, mirror, publish

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use docsync_fs::{NormalizedPath, SyncPath};
use docsync_git::{FastForward, VcsClient};

use super::report::{Outcome, RepoReport, Stage};
use super::retry::{RetryPolicy, retry};
use crate::Error;
use crate::home::HomeDocs;
use crate::repository::RepositoryRef;

/// Run-wide values every pass reads.
#[derive(Debug)]
pub(crate) struct PassContext<'a> {
    pub branch: &'a str,
    pub remote: &'a str,
    pub clone_dir: &'a Path,
    pub home_name: &'a str,
    /// Configured short names plus the home short name
    pub short_names: &'a BTreeSet<String>,
    pub push: bool,
    pub retry: RetryPolicy,
}

/// Start of every destination commit the engine writes.
pub(crate) const SYNC_COMMIT_PREFIX: &str = "docs: sync from ";

impl PassContext<'_> {
    fn commit_message(&self) -> String {
        format!("{SYNC_COMMIT_PREFIX}{}", self.home_name)
    }
}

struct StageError {
    stage: Stage,
    error: String,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, StageError>;
}

impl<T, E: Into<Error>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, StageError> {
        self.map_err(|e| StageError {
            stage,
            error: e.into().to_string(),
        })
    }
}

/// Sync one destination. Never fails: errors end up in the report.
pub(crate) fn run<V: VcsClient + ?Sized>(
    vcs: &V,
    ctx: &PassContext<'_>,
    repo: &RepositoryRef,
    home: &mut HomeDocs,
) -> RepoReport {
    let mut report = RepoReport::new(repo.full_name(), repo.short_name().to_string());

    let pass = Pass {
        vcs,
        ctx,
        repo,
        workdir: ctx.clone_dir.join(repo.short_name()),
    };

    if let Err(StageError { stage, error }) = pass.execute(home, &mut report) {
        tracing::warn!(repo = %repo, %stage, %error, "Repository failed");
        report.outcome = Outcome::Failed { stage, error };
    }
    report
}

struct Pass<'a, V: ?Sized> {
    vcs: &'a V,
    ctx: &'a PassContext<'a>,
    repo: &'a RepositoryRef,
    workdir: PathBuf,
}

impl<V: VcsClient + ?Sized> Pass<'_, V> {
    fn short(&self) -> &str {
        self.repo.short_name()
    }

    fn docs(&self) -> PathBuf {
        self.workdir.join(SyncPath::Docs.as_str())
    }

    fn owned(&self) -> PathBuf {
        self.docs().join(self.short())
    }

    fn execute(&self, home: &mut HomeDocs, report: &mut RepoReport) -> Result<(), StageError> {
        self.acquire().at(Stage::Acquire)?;
        report.restored = self.recover().at(Stage::Recover)?;
        report.pulled = home
            .pull_owned(self.short(), &self.owned())
            .at(Stage::PullBack)?;
        report.loose = self.collect_loose(home).at(Stage::CollectLoose)?;
        report.mirror = self.mirror(home).at(Stage::Mirror)?;
        report.outcome = self.publish()?;
        Ok(())
    }

    /// Step 1: clone, or refresh the cached clone to the remote tip.
    fn acquire(&self) -> docsync_git::Result<()> {
        let branch = self.ctx.branch;

        if self.workdir.join(SyncPath::GitDir.as_str()).exists() {
            self.vcs.fetch(&self.workdir, branch)?;
            self.vcs.checkout_branch(&self.workdir, branch)?;
            if self.vcs.fast_forward(&self.workdir, branch)? == FastForward::Diverged {
                tracing::info!(repo = %self.repo, "Cached clone diverged, resetting to remote");
            }
            // Also clears untracked leftovers of an interrupted run.
            self.vcs.hard_reset(&self.workdir, branch)?;
        } else {
            let url = self.repo.clone_url(self.ctx.remote);
            tracing::info!(repo = %self.repo, %url, "Cloning");
            self.vcs.clone_repo(&url, &self.workdir, branch)?;
        }
        Ok(())
    }

    /// Step 2: restore `docs/<short>` from history when it is missing.
    fn recover(&self) -> Result<usize, Error> {
        if self.owned().exists() {
            return Ok(0);
        }

        let path = format!("{}/{}", SyncPath::Docs, self.short());
        let Some(commit) = self.vcs.last_commit_touching(&self.workdir, &path)? else {
            tracing::debug!(repo = %self.repo, "No history for owned docs");
            return Ok(0);
        };

        let files = self.vcs.restore_path(&self.workdir, &commit.id, &path)?;
        if files > 0 {
            tracing::info!(
                repo = %self.repo,
                commit = commit.short_id(),
                date = %commit.timestamp.format("%Y-%m-%d"),
                files,
                "Recovered owned docs from history"
            );
        }
        Ok(files)
    }

    /// Step 4: promote top-level entries nobody owns into `docs/<short>/`.
    fn collect_loose(&self, home: &mut HomeDocs) -> Result<Vec<String>, Error> {
        let known: BTreeSet<String> = self
            .ctx
            .short_names
            .iter()
            .cloned()
            .chain(home.top_level_names()?)
            .collect();

        let docs = self.docs();
        let mut promoted = Vec::new();

        for entry in docsync_fs::list_entries(&docs)? {
            if known.contains(&entry) {
                continue;
            }
            if self.written_by_sync(&entry)? {
                tracing::debug!(repo = %self.repo, %entry, "Stale shared docs, left for the mirror");
                continue;
            }

            let source = docs.join(&entry);
            home.adopt_loose(self.short(), &entry, &source)?;
            docsync_fs::move_entry(&source, &self.owned().join(&entry))?;

            tracing::info!(repo = %self.repo, %entry, "Promoted loose docs");
            promoted.push(entry);
        }
        Ok(promoted)
    }

    /// The last commit touching `docs/<entry>` came from a sync: the entry is
    /// shared content that home has since removed, not a loose doc.
    fn written_by_sync(&self, entry: &str) -> docsync_git::Result<bool> {
        let path = format!("{}/{}", SyncPath::Docs, entry);
        Ok(self
            .vcs
            .last_commit_touching(&self.workdir, &path)?
            .is_some_and(|commit| commit.summary.starts_with(SYNC_COMMIT_PREFIX)))
    }

    /// Step 5: make the destination's `docs/` match home, except its own subtree.
    fn mirror(&self, home: &HomeDocs) -> Result<docsync_fs::MirrorStats, Error> {
        let excludes = [NormalizedPath::new(self.short())];
        let stats = docsync_fs::mirror(home.docs_dir(), &self.docs(), &excludes)?;
        tracing::debug!(
            repo = %self.repo,
            written = stats.written,
            removed = stats.removed,
            "Mirrored home docs"
        );
        Ok(stats)
    }

    /// Step 6: commit `docs/` and push with retry.
    fn publish(&self) -> Result<Outcome, StageError> {
        let docs = SyncPath::Docs.as_str();
        self.vcs.stage(&self.workdir, docs).at(Stage::Commit)?;

        let Some(commit) = self
            .vcs
            .commit(&self.workdir, &self.ctx.commit_message())
            .at(Stage::Commit)?
        else {
            tracing::info!(repo = %self.repo, "No changes");
            return Ok(Outcome::Skipped);
        };

        if !self.ctx.push {
            tracing::info!(repo = %self.repo, %commit, "Committed, push disabled");
            return Ok(Outcome::Synced {
                commit,
                pushed: false,
                push_attempts: 0,
            });
        }

        let outcome = retry(
            &self.ctx.retry,
            "push",
            || self.vcs.push(&self.workdir, self.ctx.branch),
            is_permanent,
        );

        match outcome.result {
            Ok(()) => {
                tracing::info!(repo = %self.repo, %commit, attempts = outcome.attempts, "Pushed");
                Ok(Outcome::Synced {
                    commit,
                    pushed: true,
                    push_attempts: outcome.attempts,
                })
            }
            Err(e) => Err(StageError {
                stage: Stage::Push,
                error: format!("{e} (after {} attempts)", outcome.attempts),
            }),
        }
    }
}

fn is_permanent(error: &docsync_git::Error) -> bool {
    matches!(
        error,
        docsync_git::Error::RemoteNotFound { .. }
            | docsync_git::Error::BranchNotFound { .. }
            | docsync_git::Error::NotAWorkingTree { .. }
    )
}
