//! One layer of configuration
//!
//! A `Manifest` holds the settings read from a single source: the config
//! file, the environment, or command-line overrides. Layers are merged with
//! later layers overriding earlier ones.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Repository list as written in a config file.
///
/// Accepts the comma-separated form shared with `DOCS_SYNC_REPOS` as well as
/// a native list:
///
/// ```toml
/// repos = "acme/billing, acme/api"
/// # or
/// repos = ["acme/billing", "acme/api"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepoList {
    Csv(String),
    List(Vec<String>),
}

impl RepoList {
    /// Entries in order, trimmed, empties removed.
    pub fn entries(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            RepoList::Csv(csv) => csv.split(',').collect(),
            RepoList::List(list) => list.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Settings from a single source. Absent keys leave lower layers in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub repos: Option<RepoList>,

    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub clone_dir: Option<PathBuf>,

    #[serde(default)]
    pub remote: Option<String>,

    #[serde(default)]
    pub home: Option<String>,
}

/// Environment variable names, one per setting.
pub const ENV_REPOS: &str = "DOCS_SYNC_REPOS";
pub const ENV_BRANCH: &str = "DOCS_SYNC_BRANCH";
pub const ENV_CLONE_DIR: &str = "DOCS_SYNC_CLONE_DIR";
pub const ENV_REMOTE: &str = "DOCS_SYNC_REMOTE";
pub const ENV_HOME: &str = "DOCS_SYNC_HOME";

impl Manifest {
    /// Build a layer from environment variables. Empty values count as unset.
    pub fn from_env(env: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            env.get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            repos: get(ENV_REPOS).map(RepoList::Csv),
            branch: get(ENV_BRANCH),
            clone_dir: get(ENV_CLONE_DIR).map(PathBuf::from),
            remote: get(ENV_REMOTE),
            home: get(ENV_HOME),
        }
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: &Manifest) {
        if other.repos.is_some() {
            self.repos.clone_from(&other.repos);
        }
        if other.branch.is_some() {
            self.branch.clone_from(&other.branch);
        }
        if other.clone_dir.is_some() {
            self.clone_dir.clone_from(&other.clone_dir);
        }
        if other.remote.is_some() {
            self.remote.clone_from(&other.remote);
        }
        if other.home.is_some() {
            self.home.clone_from(&other.home);
        }
    }
}
