//! Shared git2 helper functions
//!
//! Each function takes an open [`Repository`] and performs one step of the
//! clone/fetch/reset/commit/push cycle against the `origin` remote.

use std::path::{Path, PathBuf};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    BranchType, Commit, ErrorCode, IndexAddOption, Oid, PushOptions, RemoteCallbacks, Repository,
    ResetType, Signature,
};

use crate::provider::FastForward;
use crate::{Error, Result};

/// Name of the only remote the sync engine talks to.
pub const ORIGIN: &str = "origin";

const FALLBACK_NAME: &str = "docs-sync";
const FALLBACK_EMAIL: &str = "docs-sync@localhost";

/// Open the repository whose working tree is `workdir`.
pub fn open(workdir: &Path) -> Result<Repository> {
    Repository::open(workdir).map_err(|e| match e.code() {
        ErrorCode::NotFound => Error::NotAWorkingTree {
            path: workdir.to_path_buf(),
        },
        _ => Error::Git(e),
    })
}

/// Locate the working-tree root of the repository containing `path`.
pub fn discover(path: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(path).map_err(|_| Error::NotAWorkingTree {
        path: path.to_path_buf(),
    })?;
    let workdir = repo.workdir().ok_or_else(|| Error::NotAWorkingTree {
        path: path.to_path_buf(),
    })?;
    Ok(docsync_fs::canonicalize(workdir)?)
}

/// Clone `url` into `path` with `branch` checked out.
pub fn clone(url: &str, path: &Path, branch: &str) -> Result<Repository> {
    RepoBuilder::new()
        .branch(branch)
        .clone(url, path)
        .map_err(|e| Error::CloneFailed {
            url: url.to_string(),
            message: e.message().to_string(),
        })
}

/// Fetch `branch` from origin into its remote-tracking ref.
pub fn fetch(repo: &Repository, branch: &str) -> Result<()> {
    let mut remote = find_origin(repo)?;
    let refspec = format!("+refs/heads/{branch}:refs/remotes/{ORIGIN}/{branch}");

    remote
        .fetch(&[&refspec], None, None)
        .map_err(|e| Error::FetchFailed {
            remote: remote.url().unwrap_or(ORIGIN).to_string(),
            branch: branch.to_string(),
            message: e.message().to_string(),
        })
}

/// The commit at `refs/remotes/origin/<branch>`.
pub fn remote_tip<'r>(repo: &'r Repository, branch: &str) -> Result<Commit<'r>> {
    let refname = format!("refs/remotes/{ORIGIN}/{branch}");
    let reference = repo
        .find_reference(&refname)
        .map_err(|_| Error::BranchNotFound {
            name: format!("{ORIGIN}/{branch}"),
        })?;
    Ok(reference.peel_to_commit()?)
}

/// Switch HEAD to the local `branch`, creating it at the remote tip if needed.
pub fn checkout_branch(repo: &Repository, branch: &str) -> Result<()> {
    if repo.find_branch(branch, BranchType::Local).is_err() {
        let tip = remote_tip(repo, branch)?;
        repo.branch(branch, &tip, false)?;
    }

    repo.set_head(&format!("refs/heads/{branch}"))?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
    Ok(())
}

/// Move the local `branch` to the remote tip when that is a fast-forward.
///
/// A local branch that is ahead of the remote reports [`FastForward::Diverged`]
/// as well: the remote tip is authoritative.
pub fn fast_forward(repo: &Repository, branch: &str) -> Result<FastForward> {
    let tip = remote_tip(repo, branch)?;
    let head = repo.head()?.peel_to_commit()?;

    if head.id() == tip.id() {
        return Ok(FastForward::UpToDate);
    }

    let annotated = repo.find_annotated_commit(tip.id())?;
    let (analysis, _) = repo.merge_analysis(&[&annotated])?;

    if !analysis.is_fast_forward() {
        return Ok(FastForward::Diverged);
    }

    let refname = format!("refs/heads/{branch}");
    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(tip.id(), &format!("docs-sync: fast-forward to {}", tip.id()))?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

    Ok(FastForward::FastForwarded)
}

/// Reset the checked-out branch, index, and working tree to the remote tip.
pub fn hard_reset(repo: &Repository, branch: &str) -> Result<()> {
    let tip = remote_tip(repo, branch)?;
    let mut checkout = CheckoutBuilder::default();
    checkout.force().remove_untracked(true);

    repo.reset(tip.as_object(), ResetType::Hard, Some(&mut checkout))?;
    Ok(())
}

/// Stage additions, modifications, and deletions under `pathspec`.
pub fn stage(repo: &Repository, pathspec: &str) -> Result<()> {
    let mut index = repo.index()?;
    index.add_all([pathspec].iter(), IndexAddOption::DEFAULT, None)?;
    index.update_all([pathspec].iter(), None)?;
    index.write()?;
    Ok(())
}

/// Commit the current index onto HEAD unless its tree matches HEAD's.
pub fn commit(repo: &Repository, message: &str) -> Result<Option<Oid>> {
    let mut index = repo.index()?;
    let tree_id = index.write_tree()?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    if parent.as_ref().is_some_and(|p| p.tree_id() == tree_id) {
        return Ok(None);
    }

    let tree = repo.find_tree(tree_id)?;
    let signature = signature(repo)?;
    let parents: Vec<&Commit<'_>> = parent.iter().collect();

    let oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?;
    Ok(Some(oid))
}

/// Push the local `branch` to the same branch on origin.
///
/// A transport failure is [`Error::PushFailed`]; a reference update the
/// remote refused is [`Error::PushRejected`].
pub fn push(repo: &Repository, branch: &str) -> Result<()> {
    let mut remote = find_origin(repo)?;
    let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
    let mut rejection: Option<String> = None;

    {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.push_update_reference(|refname, status| {
            if let Some(message) = status {
                rejection = Some(format!("{refname}: {message}"));
            }
            Ok(())
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        remote
            .push(&[&refspec], Some(&mut options))
            .map_err(|e| Error::PushFailed {
                message: e.message().to_string(),
            })?;
    }

    match rejection {
        Some(message) => Err(Error::PushRejected { message }),
        None => Ok(()),
    }
}

/// URL of origin, or `None` when the repository has no origin remote.
pub fn origin_url(repo: &Repository) -> Result<Option<String>> {
    match repo.find_remote(ORIGIN) {
        Ok(remote) => Ok(remote.url().map(str::to_string)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn find_origin(repo: &Repository) -> Result<git2::Remote<'_>> {
    repo.find_remote(ORIGIN).map_err(|_| Error::RemoteNotFound {
        name: ORIGIN.to_string(),
    })
}

fn signature(repo: &Repository) -> Result<Signature<'static>> {
    match repo.signature() {
        Ok(signature) => Ok(signature.to_owned()),
        Err(_) => Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?),
    }
}
