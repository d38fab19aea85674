//! git2 fixtures for sync scenarios.
//!
//! All repositories use `main` as their initial branch and carry a local
//! identity, so commits never depend on the machine's git config.
//!
//! # Panics
//! Every function panics with a descriptive message when a git or
//! filesystem operation fails.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use git2::build::RepoBuilder;
use git2::{IndexAddOption, ObjectType, Oid, Repository, RepositoryInitOptions, Signature, TreeWalkMode, TreeWalkResult};
use tempfile::TempDir;

/// Branch every fixture repository starts on.
pub const MAIN: &str = "main";

fn init_options(bare: bool) -> RepositoryInitOptions {
    let mut opts = RepositoryInitOptions::new();
    opts.bare(bare).initial_head(MAIN);
    opts
}

fn configure_identity(repo: &Repository, path: &Path) {
    let mut config = repo
        .config()
        .unwrap_or_else(|e| panic!("init_repo: no config for {}: {e}", path.display()));
    config
        .set_str("user.name", "Test User")
        .unwrap_or_else(|e| panic!("init_repo: failed to set user.name: {e}"));
    config
        .set_str("user.email", "test@test.com")
        .unwrap_or_else(|e| panic!("init_repo: failed to set user.email: {e}"));
}

/// Initialise a working repository on `main` with a test identity.
pub fn init_repo(path: &Path) -> Repository {
    let repo = Repository::init_opts(path, &init_options(false)).unwrap_or_else(|e| {
        panic!("init_repo: failed to init repository at {}: {e}", path.display())
    });
    configure_identity(&repo, path);
    repo
}

/// Initialise an empty bare repository on `main`.
pub fn init_bare(path: &Path) -> Repository {
    Repository::init_opts(path, &init_options(true)).unwrap_or_else(|e| {
        panic!("init_bare: failed to init bare repository at {}: {e}", path.display())
    })
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("write_file: failed to create {}: {e}", parent.display()));
    }
    fs::write(&path, content)
        .unwrap_or_else(|e| panic!("write_file: failed to write {}: {e}", path.display()));
}

/// Remove the file or directory at `root/rel`.
pub fn remove(root: &Path, rel: &str) {
    let path = root.join(rel);
    let result = if path.is_dir() {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };
    result.unwrap_or_else(|e| panic!("remove: failed to remove {}: {e}", path.display()));
}

/// Stage everything in the working tree (including deletions) and commit.
pub fn commit_all(workdir: &Path, message: &str) -> Oid {
    let repo = Repository::open(workdir)
        .unwrap_or_else(|e| panic!("commit_all: failed to open {}: {e}", workdir.display()));
    let mut index = repo.index().unwrap_or_else(|e| panic!("commit_all: no index: {e}"));
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap_or_else(|e| panic!("commit_all: add_all failed: {e}"));
    index
        .update_all(["*"].iter(), None)
        .unwrap_or_else(|e| panic!("commit_all: update_all failed: {e}"));
    index
        .write()
        .unwrap_or_else(|e| panic!("commit_all: index write failed: {e}"));
    let tree_id = index
        .write_tree()
        .unwrap_or_else(|e| panic!("commit_all: write_tree failed: {e}"));
    let tree = repo.find_tree(tree_id).unwrap_or_else(|e| panic!("commit_all: {e}"));

    let signature = Signature::now("Test User", "test@test.com")
        .unwrap_or_else(|e| panic!("commit_all: bad signature: {e}"));
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_all: commit failed: {e}"))
}

/// Create a bare remote at `<base>/<owner>/<name>.git` whose `main` branch
/// holds `files` (relative path, content).
///
/// The layout matches the clone URL pattern `{remote}/{owner}/{name}.git`.
pub fn bare_remote(base: &Path, owner: &str, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let bare_path = base.join(owner).join(format!("{name}.git"));
    init_bare(&bare_path);

    let seed = TempDir::new().unwrap_or_else(|e| panic!("bare_remote: tempdir failed: {e}"));
    let repo = init_repo(seed.path());
    for (rel, content) in files {
        write_file(seed.path(), rel, content);
    }
    if files.is_empty() {
        write_file(seed.path(), "README.md", &format!("# {name}"));
    }
    commit_all(seed.path(), "Initial commit");

    let url = bare_path.to_string_lossy().into_owned();
    let mut remote = repo
        .remote("origin", &url)
        .unwrap_or_else(|e| panic!("bare_remote: failed to add origin: {e}"));
    remote
        .push(&["refs/heads/main:refs/heads/main"], None)
        .unwrap_or_else(|e| panic!("bare_remote: seed push failed: {e}"));

    bare_path
}

/// Clone `remote`, apply `writes` and `deletes`, commit, and push back.
///
/// Simulates a collaborator pushing to a destination repository.
pub fn commit_to_remote(
    remote: &Path,
    writes: &[(&str, &str)],
    deletes: &[&str],
    message: &str,
) -> Oid {
    let work = TempDir::new().unwrap_or_else(|e| panic!("commit_to_remote: tempdir failed: {e}"));
    let url = remote.to_string_lossy().into_owned();
    let repo = RepoBuilder::new()
        .branch(MAIN)
        .clone(&url, work.path())
        .unwrap_or_else(|e| panic!("commit_to_remote: clone of {url} failed: {e}"));
    configure_identity(&repo, work.path());

    for (rel, content) in writes {
        write_file(work.path(), rel, content);
    }
    for rel in deletes {
        remove(work.path(), rel);
    }
    let oid = commit_all(work.path(), message);

    let mut origin = repo
        .find_remote("origin")
        .unwrap_or_else(|e| panic!("commit_to_remote: no origin: {e}"));
    origin
        .push(&["refs/heads/main:refs/heads/main"], None)
        .unwrap_or_else(|e| panic!("commit_to_remote: push failed: {e}"));
    oid
}

/// Commit id at `refs/heads/<branch>` of the repository at `path`.
pub fn branch_tip(path: &Path, branch: &str) -> Oid {
    let repo = Repository::open(path)
        .unwrap_or_else(|e| panic!("branch_tip: failed to open {}: {e}", path.display()));
    repo.refname_to_id(&format!("refs/heads/{branch}"))
        .unwrap_or_else(|e| panic!("branch_tip: no branch {branch}: {e}"))
}

/// Number of commits reachable from `refs/heads/<branch>`.
pub fn commit_count(path: &Path, branch: &str) -> usize {
    let repo = Repository::open(path)
        .unwrap_or_else(|e| panic!("commit_count: failed to open {}: {e}", path.display()));
    let mut revwalk = repo.revwalk().unwrap_or_else(|e| panic!("commit_count: {e}"));
    revwalk
        .push_ref(&format!("refs/heads/{branch}"))
        .unwrap_or_else(|e| panic!("commit_count: no branch {branch}: {e}"));
    revwalk.count()
}

/// Every file at the tip of `branch` as relative path -> content.
///
/// Works for bare and non-bare repositories alike.
pub fn read_branch(path: &Path, branch: &str) -> BTreeMap<String, String> {
    let repo = Repository::open(path)
        .unwrap_or_else(|e| panic!("read_branch: failed to open {}: {e}", path.display()));
    let tree = repo
        .find_reference(&format!("refs/heads/{branch}"))
        .and_then(|r| r.peel_to_tree())
        .unwrap_or_else(|e| panic!("read_branch: no tree for {branch}: {e}"));

    let mut files = BTreeMap::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            let name = entry.name().unwrap_or_default();
            if let Ok(blob) = repo.find_blob(entry.id()) {
                let content = String::from_utf8_lossy(blob.content()).into_owned();
                files.insert(format!("{root}{name}"), content);
            }
        }
        TreeWalkResult::Ok
    })
    .unwrap_or_else(|e| panic!("read_branch: tree walk failed: {e}"));
    files
}

/// Files under `docs/` at the tip of `branch`, keyed relative to `docs/`.
pub fn read_docs(path: &Path, branch: &str) -> BTreeMap<String, String> {
    read_branch(path, branch)
        .into_iter()
        .filter_map(|(rel, content)| {
            rel.strip_prefix("docs/")
                .map(|rest| (rest.to_string(), content))
        })
        .collect()
}
