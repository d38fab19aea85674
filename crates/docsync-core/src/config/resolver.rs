//! Settings resolution with layered merge
//!
//! The `SettingsResolver` merges, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. Config file (`.docs-sync.toml` in the home root, or an explicit path)
//! 3. Environment (`DOCS_SYNC_*`)
//! 4. Command-line overrides

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use docsync_fs::{ConfigStore, SyncPath};
use serde::Serialize;

use super::manifest::Manifest;
use crate::{Error, Result};

/// Default target branch.
pub const DEFAULT_BRANCH: &str = "main";

/// Default base for clone URLs.
pub const DEFAULT_REMOTE: &str = "https://github.com";

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Configured `owner/name` entries, in order
    pub repos: Vec<String>,

    /// Branch synced in every repository
    pub branch: String,

    /// Directory caching working clones
    pub clone_dir: PathBuf,

    /// Base URL for clone URLs
    pub remote: String,

    /// Home short name, when set explicitly
    pub home: Option<String>,
}

/// Default clone directory: `<temp>/docs-sync`.
pub fn default_clone_dir() -> PathBuf {
    std::env::temp_dir().join("docs-sync")
}

enum EnvSource {
    Process,
    Fixed(HashMap<String, String>),
}

/// Resolves [`Settings`] for a home repository.
pub struct SettingsResolver {
    home_root: PathBuf,
    config_path: Option<PathBuf>,
    env: EnvSource,
}

impl SettingsResolver {
    /// Resolver reading `.docs-sync.toml` from `home_root` and the process
    /// environment.
    pub fn new(home_root: impl Into<PathBuf>) -> Self {
        Self {
            home_root: home_root.into(),
            config_path: None,
            env: EnvSource::Process,
        }
    }

    /// Read this file instead of the default one. It must exist.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Replace the process environment with a fixed map (for tests).
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = EnvSource::Fixed(env);
        self
    }

    /// The config file that will be read, if any.
    pub fn config_file(&self) -> Result<Option<PathBuf>> {
        match &self.config_path {
            Some(path) if path.is_file() => Ok(Some(path.clone())),
            Some(path) => Err(Error::ConfigNotFound { path: path.clone() }),
            None => {
                let default = self.home_root.join(SyncPath::ConfigFile.as_str());
                Ok(default.is_file().then_some(default))
            }
        }
    }

    /// Merge every layer and validate the result.
    pub fn resolve(&self, overrides: &Manifest) -> Result<Settings> {
        let mut manifest = Manifest::default();

        if let Some(path) = self.config_file()? {
            tracing::debug!(path = %path.display(), "Loading config file");
            let file: Manifest = ConfigStore::new().load(&path)?;
            manifest.merge(&file);
        } else {
            tracing::debug!("No config file found, skipping");
        }

        let env = match &self.env {
            EnvSource::Process => std::env::vars().collect(),
            EnvSource::Fixed(env) => env.clone(),
        };
        manifest.merge(&Manifest::from_env(&env));
        manifest.merge(overrides);

        self.finish(manifest)
    }

    fn finish(&self, manifest: Manifest) -> Result<Settings> {
        let repos = manifest
            .repos
            .map(|list| list.entries())
            .filter(|entries| !entries.is_empty())
            .ok_or(Error::MissingRepos)?;

        let branch = manifest.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        if branch.trim().is_empty() || branch.contains(char::is_whitespace) {
            return Err(Error::InvalidSetting {
                key: "branch".into(),
                message: format!("'{branch}' is not a branch name"),
            });
        }

        let clone_dir = manifest.clone_dir.unwrap_or_else(default_clone_dir);
        let clone_dir = absolutize(&self.home_root, &clone_dir);

        Ok(Settings {
            repos,
            branch,
            clone_dir,
            remote: manifest.remote.unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            home: manifest.home,
        })
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
