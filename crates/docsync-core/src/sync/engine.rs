//! SyncEngine implementation
//!
//! The engine validates the run's inputs, takes the clone-directory lock,
//! runs one pass per destination in configured order, and finally commits
//! whatever was pulled into the home repository.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use docsync_fs::{RunLock, SyncPath};
use docsync_git::VcsClient;

use super::pass::{self, PassContext};
use super::report::{HomeCommit, SyncReport};
use super::retry::RetryPolicy;
use crate::config::Settings;
use crate::home::HomeDocs;
use crate::repository::{SyncSet, short_name_from_url};
use crate::{Error, Result};

/// Commit message for pulled content in the home repository.
pub const HOME_COMMIT_MESSAGE: &str = "docs: pull owned docs from destination repositories";

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Push destination commits. When false, commits stay local.
    pub push: bool,
    /// Retry policy for pushes
    pub retry: RetryPolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            push: true,
            retry: RetryPolicy::default(),
        }
    }
}

/// Engine synchronizing the home `docs/` tree with every destination.
pub struct SyncEngine<V> {
    vcs: V,
    home_root: PathBuf,
    sync_set: SyncSet,
    settings: Settings,
    options: SyncOptions,
}

impl<V: VcsClient> SyncEngine<V> {
    /// Create an engine for the home repository at `home_root`.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error when the home is not a git
    /// repository or the repository list is invalid. Nothing touches the
    /// network here.
    pub fn new(vcs: V, home_root: &Path, settings: Settings, options: SyncOptions) -> Result<Self> {
        let home_root = docsync_fs::canonicalize(home_root).map_err(|_| Error::HomeNotRepository {
            path: home_root.to_path_buf(),
        })?;
        let home = resolve_home_name(&vcs, &home_root, settings.home.as_deref())?;
        let sync_set = SyncSet::new(&home, &settings.repos)?;

        tracing::debug!(
            home = %home,
            destinations = sync_set.destinations().len(),
            branch = %settings.branch,
            "Sync engine ready"
        );

        Ok(Self {
            vcs,
            home_root,
            sync_set,
            settings,
            options,
        })
    }

    pub fn sync_set(&self) -> &SyncSet {
        &self.sync_set
    }

    pub fn home_root(&self) -> &Path {
        &self.home_root
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Sync every destination, or only the one matching `filter`.
    ///
    /// # Errors
    ///
    /// Only run-level problems are errors: an unknown filter or a held lock.
    /// Per-repository failures are reported in the returned [`SyncReport`].
    pub fn run(&self, filter: Option<&str>) -> Result<SyncReport> {
        let started_at = Utc::now();
        let selected = self.sync_set.select(filter)?;
        let _lock = RunLock::acquire(&self.settings.clone_dir)?;

        let short_names: BTreeSet<String> = self.sync_set.short_names();
        let ctx = PassContext {
            branch: &self.settings.branch,
            remote: &self.settings.remote,
            clone_dir: &self.settings.clone_dir,
            home_name: self.sync_set.home(),
            short_names: &short_names,
            push: self.options.push,
            retry: self.options.retry,
        };

        let mut home = HomeDocs::new(&self.home_root);
        let mut repos = Vec::with_capacity(selected.len());

        for repo in selected {
            tracing::info!(repo = %repo, "Syncing");
            repos.push(pass::run(&self.vcs, &ctx, repo, &mut home));
        }

        let home_commit = if home.has_pulled() {
            self.commit_home()
        } else {
            HomeCommit::NotNeeded
        };

        Ok(SyncReport::new(
            self.sync_set.home().to_string(),
            self.settings.branch.clone(),
            started_at,
            repos,
            home.into_pulls(),
            home_commit,
        ))
    }

    /// Step 7: commit pulled content in the home repository. Never pushed.
    fn commit_home(&self) -> HomeCommit {
        let result = self
            .vcs
            .stage(&self.home_root, SyncPath::Docs.as_str())
            .and_then(|()| self.vcs.commit(&self.home_root, HOME_COMMIT_MESSAGE));

        match result {
            Ok(Some(commit)) => {
                tracing::info!(%commit, "Committed pulled docs in home repository");
                HomeCommit::Committed { commit }
            }
            Ok(None) => HomeCommit::NotNeeded,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to commit home repository");
                HomeCommit::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Home short name: explicit setting, else the origin URL, else the
/// directory name.
fn resolve_home_name<V: VcsClient>(vcs: &V, home_root: &Path, explicit: Option<&str>) -> Result<String> {
    let origin = vcs.origin_url(home_root).map_err(|e| match e {
        docsync_git::Error::NotAWorkingTree { .. } => Error::HomeNotRepository {
            path: home_root.to_path_buf(),
        },
        other => Error::Git(other),
    })?;

    if let Some(name) = explicit.map(str::trim).filter(|name| !name.is_empty()) {
        return Ok(name.to_string());
    }

    origin
        .as_deref()
        .and_then(short_name_from_url)
        .or_else(|| {
            home_root
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .ok_or_else(|| Error::InvalidSetting {
            key: "home".into(),
            message: format!("cannot derive a name for {}", home_root.display()),
        })
}
