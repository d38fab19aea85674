//! [`SyncFixture`] builder for docs-sync scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// Owner segment used for every fixture remote.
pub const OWNER: &str = "acme";

/// A temporary home repository plus bare destination remotes.
///
/// Layout under one temp dir:
///
/// ```text
/// home/              working repository with docs/
/// remotes/acme/*.git bare destination repositories
/// clones/            clone directory for the sync run
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use docsync_test_utils::repo::SyncFixture;
///
/// let fixture = SyncFixture::new("platform");
/// fixture.home_write("docs/index.md", "# Index");
/// fixture.home_commit("Add index");
/// fixture.add_remote("billing", &[("docs/billing/guide.md", "owned")]);
/// ```
pub struct SyncFixture {
    temp_dir: TempDir,
    home_name: String,
}

impl SyncFixture {
    /// Create the layout with an empty home repository named `home_name`.
    ///
    /// The home's origin points at a URL ending in `<home_name>.git`, which
    /// is never contacted.
    pub fn new(home_name: &str) -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("SyncFixture: tempdir: {e}"));
        let home = temp_dir.path().join("home");
        let repo = git::init_repo(&home);
        repo.remote(
            "origin",
            &format!("https://example.invalid/{OWNER}/{home_name}.git"),
        )
        .unwrap_or_else(|e| panic!("SyncFixture: failed to add origin: {e}"));
        fs::create_dir_all(temp_dir.path().join("remotes").join(OWNER))
            .unwrap_or_else(|e| panic!("SyncFixture: failed to create remotes dir: {e}"));

        Self {
            temp_dir,
            home_name: home_name.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Short name of the home repository.
    pub fn home_name(&self) -> &str {
        &self.home_name
    }

    /// Working tree of the home repository.
    pub fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    /// Base URL for clone URLs (`{remote_base}/{owner}/{name}.git`).
    pub fn remote_base(&self) -> PathBuf {
        self.root().join("remotes")
    }

    /// Clone directory for sync runs.
    pub fn clone_dir(&self) -> PathBuf {
        self.root().join("clones")
    }

    /// Path of the bare remote for `name`.
    pub fn remote(&self, name: &str) -> PathBuf {
        self.remote_base().join(OWNER).join(format!("{name}.git"))
    }

    /// `owner/name` for a destination.
    pub fn full_name(&self, name: &str) -> String {
        format!("{OWNER}/{name}")
    }

    /// Create a bare destination remote seeded with `files`.
    pub fn add_remote(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        git::bare_remote(&self.remote_base(), OWNER, name, files)
    }

    pub fn home_write(&self, rel: &str, content: &str) {
        git::write_file(&self.home(), rel, content);
    }

    pub fn home_remove(&self, rel: &str) {
        git::remove(&self.home(), rel);
    }

    pub fn home_commit(&self, message: &str) -> git2::Oid {
        git::commit_all(&self.home(), message)
    }

    /// Read a file from the home working tree.
    pub fn home_read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.home().join(rel)).ok()
    }

    /// Files under the home `docs/` at the tip of `main`.
    pub fn home_docs(&self) -> BTreeMap<String, String> {
        git::read_docs(&self.home(), git::MAIN)
    }

    /// Files under `docs/` at the tip of the destination's `main`.
    pub fn remote_docs(&self, name: &str) -> BTreeMap<String, String> {
        git::read_docs(&self.remote(name), git::MAIN)
    }

    /// Every file at the tip of the destination's `main`.
    pub fn remote_files(&self, name: &str) -> BTreeMap<String, String> {
        git::read_branch(&self.remote(name), git::MAIN)
    }

    /// Push a collaborator commit to the destination `name`.
    pub fn push_to_remote(
        &self,
        name: &str,
        writes: &[(&str, &str)],
        deletes: &[&str],
        message: &str,
    ) -> git2::Oid {
        git::commit_to_remote(&self.remote(name), writes, deletes, message)
    }

    /// Commits on the destination's `main`.
    pub fn remote_commit_count(&self, name: &str) -> usize {
        git::commit_count(&self.remote(name), git::MAIN)
    }
}
