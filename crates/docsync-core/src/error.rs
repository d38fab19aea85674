//! Error types for docsync-core

use std::path::PathBuf;

/// Result type for docsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docsync-core operations
///
/// Every variant here is fatal to a run. Failures inside a single
/// repository's pass are recorded in the report instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No repository list in any configuration source
    #[error("No repositories configured (set `repos` in the config file or DOCS_SYNC_REPOS)")]
    MissingRepos,

    /// Malformed `owner/name` entry
    #[error("Invalid repository '{entry}': {reason}")]
    InvalidRepository { entry: String, reason: String },

    /// Two entries share a short name
    #[error("Repositories '{first}' and '{second}' share the short name '{short_name}'")]
    DuplicateShortName {
        short_name: String,
        first: String,
        second: String,
    },

    /// Filter argument matches no configured repository
    #[error("Repository '{filter}' is not in the configured repository list")]
    UnknownRepository { filter: String },

    /// Home directory is not inside a git working tree
    #[error("Home {path} is not a git repository")]
    HomeNotRepository { path: PathBuf },

    /// Explicit configuration file does not exist
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// A setting has an unusable value
    #[error("Invalid setting '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    /// Filesystem error from docsync-fs
    #[error(transparent)]
    Fs(#[from] docsync_fs::Error),

    /// Version-control error from docsync-git
    #[error(transparent)]
    Git(#[from] docsync_git::Error),
}
