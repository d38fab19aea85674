//! Version-control capability interface

use std::path::Path;

use crate::Result;
use crate::history::CommitInfo;

/// Result of fast-forwarding a local branch to its remote-tracking tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastForward {
    /// Local branch already at the remote tip
    UpToDate,
    /// Local branch moved forward to the remote tip
    FastForwarded,
    /// Local branch diverged from or is ahead of the remote tip
    Diverged,
}

/// The version-control operations the sync engine consumes.
///
/// Every method takes the working tree it operates on, so one client serves
/// all repositories of a run. The remote is always `origin`.
pub trait VcsClient {
    /// Clone `url` into `path`, checking out `branch`.
    fn clone_repo(&self, url: &str, path: &Path, branch: &str) -> Result<()>;

    /// Fetch `branch` from `origin` into `refs/remotes/origin/<branch>`.
    fn fetch(&self, workdir: &Path, branch: &str) -> Result<()>;

    /// Check out the local `branch`, creating it from the remote-tracking
    /// branch when it does not exist.
    fn checkout_branch(&self, workdir: &Path, branch: &str) -> Result<()>;

    /// Fast-forward the checked-out `branch` to `origin/<branch>` if possible.
    fn fast_forward(&self, workdir: &Path, branch: &str) -> Result<FastForward>;

    /// Hard-reset the working tree to `origin/<branch>`, dropping local
    /// commits, modifications, and untracked files.
    fn hard_reset(&self, workdir: &Path, branch: &str) -> Result<()>;

    /// Stage every change (additions, edits, deletions) under `pathspec`.
    fn stage(&self, workdir: &Path, pathspec: &str) -> Result<()>;

    /// Commit the index if it differs from HEAD. Returns the new commit id,
    /// or `None` when there is nothing to commit.
    fn commit(&self, workdir: &Path, message: &str) -> Result<Option<String>>;

    /// Push the local `branch` to `origin/<branch>`.
    fn push(&self, workdir: &Path, branch: &str) -> Result<()>;

    /// Most recent commit reachable from HEAD whose tree differs from its
    /// first parent at `path`.
    fn last_commit_touching(&self, workdir: &Path, path: &str) -> Result<Option<CommitInfo>>;

    /// Restore `path` into the working tree from `commit`, falling back to
    /// its first parent when the commit removed the path. Returns the number
    /// of files written.
    fn restore_path(&self, workdir: &Path, commit: &str, path: &str) -> Result<usize>;

    /// URL of `origin`, if configured.
    fn origin_url(&self, workdir: &Path) -> Result<Option<String>>;
}
