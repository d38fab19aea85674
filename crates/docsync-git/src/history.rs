//! History search and path restoration.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{Commit, ErrorCode, ObjectType, Oid, Repository, Tree, TreeWalkMode, TreeWalkResult};

use crate::Result;

/// Information about a single commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit id
    pub id: String,

    /// First line of the commit message
    pub summary: String,

    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    fn from_commit(commit: &Commit<'_>) -> Self {
        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_default();

        Self {
            id: commit.id().to_string(),
            summary: commit.summary().unwrap_or("").to_string(),
            timestamp,
        }
    }

    /// Abbreviated id for log lines.
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(7)]
    }
}

/// Find the most recent commit reachable from HEAD that changed `path`.
///
/// A commit changed `path` when the entry at `path` in its tree differs from
/// the entry in its first parent (added, modified, or removed). An unborn
/// HEAD has no history and yields `None`.
pub fn last_commit_touching(repo: &Repository, path: &str) -> Result<Option<CommitInfo>> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let tip = head.peel_to_commit()?;

    let mut revwalk = repo.revwalk()?;
    revwalk.push(tip.id())?;
    revwalk.set_sorting(git2::Sort::TIME | git2::Sort::TOPOLOGICAL)?;

    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        let current = entry_id(&commit.tree()?, path)?;
        let previous = match commit.parent(0) {
            Ok(parent) => entry_id(&parent.tree()?, path)?,
            Err(_) => None,
        };

        if current != previous {
            return Ok(Some(CommitInfo::from_commit(&commit)));
        }
    }

    Ok(None)
}

/// Write `path` from `commit` (or its first parent) into `workdir`.
///
/// Returns the number of files written; zero when neither commit has the path.
pub fn restore_path(repo: &Repository, commit: &str, path: &str, workdir: &Path) -> Result<usize> {
    let commit = repo.find_commit(Oid::from_str(commit)?)?;
    let candidates = [Some(commit.clone()), commit.parent(0).ok()];

    for candidate in candidates.into_iter().flatten() {
        let tree = candidate.tree()?;
        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => return Err(e.into()),
        };

        let target = workdir.join(path);
        let written = match entry.kind() {
            Some(ObjectType::Blob) => {
                let blob = repo.find_blob(entry.id())?;
                docsync_fs::io::write_atomic(&target, blob.content())?;
                1
            }
            Some(ObjectType::Tree) => write_tree(repo, &repo.find_tree(entry.id())?, &target)?,
            _ => 0,
        };

        tracing::debug!(
            commit = %candidate.id(),
            path,
            files = written,
            "Restored path from history"
        );
        return Ok(written);
    }

    Ok(0)
}

fn entry_id(tree: &Tree<'_>, path: &str) -> Result<Option<Oid>> {
    match tree.get_path(Path::new(path)) {
        Ok(entry) => Ok(Some(entry.id())),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_tree(repo: &Repository, tree: &Tree<'_>, target: &Path) -> Result<usize> {
    let mut blobs = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(ObjectType::Blob)
            && let Some(name) = entry.name()
        {
            blobs.push((format!("{root}{name}"), entry.id()));
        }
        TreeWalkResult::Ok
    })?;

    for (rel, id) in &blobs {
        let blob = repo.find_blob(*id)?;
        docsync_fs::io::write_atomic(&target.join(rel), blob.content())?;
    }
    Ok(blobs.len())
}
