//! git2-backed implementation of [`VcsClient`]

use std::path::Path;

use crate::helpers;
use crate::history::{self, CommitInfo};
use crate::provider::{FastForward, VcsClient};
use crate::Result;

/// Talks to repositories through libgit2.
///
/// Stateless: each call opens the working tree it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Client;

impl Git2Client {
    pub fn new() -> Self {
        Self
    }
}

impl VcsClient for Git2Client {
    fn clone_repo(&self, url: &str, path: &Path, branch: &str) -> Result<()> {
        if path.exists() {
            docsync_fs::io::remove_path(path)?;
        }
        helpers::clone(url, path, branch)?;
        tracing::debug!(url, path = %path.display(), branch, "Cloned repository");
        Ok(())
    }

    fn fetch(&self, workdir: &Path, branch: &str) -> Result<()> {
        let repo = helpers::open(workdir)?;
        helpers::fetch(&repo, branch)?;
        tracing::debug!(path = %workdir.display(), branch, "Fetched");
        Ok(())
    }

    fn checkout_branch(&self, workdir: &Path, branch: &str) -> Result<()> {
        let repo = helpers::open(workdir)?;
        helpers::checkout_branch(&repo, branch)
    }

    fn fast_forward(&self, workdir: &Path, branch: &str) -> Result<FastForward> {
        let repo = helpers::open(workdir)?;
        let outcome = helpers::fast_forward(&repo, branch)?;
        tracing::debug!(path = %workdir.display(), branch, ?outcome, "Fast-forward");
        Ok(outcome)
    }

    fn hard_reset(&self, workdir: &Path, branch: &str) -> Result<()> {
        let repo = helpers::open(workdir)?;
        helpers::hard_reset(&repo, branch)?;
        tracing::debug!(path = %workdir.display(), branch, "Hard reset to remote tip");
        Ok(())
    }

    fn stage(&self, workdir: &Path, pathspec: &str) -> Result<()> {
        let repo = helpers::open(workdir)?;
        helpers::stage(&repo, pathspec)
    }

    fn commit(&self, workdir: &Path, message: &str) -> Result<Option<String>> {
        let repo = helpers::open(workdir)?;
        let oid = helpers::commit(&repo, message)?;
        if let Some(oid) = &oid {
            tracing::debug!(path = %workdir.display(), commit = %oid, "Committed");
        }
        Ok(oid.map(|oid| oid.to_string()))
    }

    fn push(&self, workdir: &Path, branch: &str) -> Result<()> {
        let repo = helpers::open(workdir)?;
        helpers::push(&repo, branch)?;
        tracing::debug!(path = %workdir.display(), branch, "Pushed");
        Ok(())
    }

    fn last_commit_touching(&self, workdir: &Path, path: &str) -> Result<Option<CommitInfo>> {
        let repo = helpers::open(workdir)?;
        history::last_commit_touching(&repo, path)
    }

    fn restore_path(&self, workdir: &Path, commit: &str, path: &str) -> Result<usize> {
        let repo = helpers::open(workdir)?;
        history::restore_path(&repo, commit, path, workdir)
    }

    fn origin_url(&self, workdir: &Path) -> Result<Option<String>> {
        let repo = helpers::open(workdir)?;
        helpers::origin_url(&repo)
    }
}
