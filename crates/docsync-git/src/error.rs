//! Error types for docsync-git

use std::path::PathBuf;

/// Result type for docsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] docsync_fs::Error),

    #[error("Failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Failed to fetch '{branch}' from {remote}: {message}")]
    FetchFailed {
        remote: String,
        branch: String,
        message: String,
    },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Push rejected by remote: {message}")]
    PushRejected { message: String },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Branch '{name}' not found")]
    BranchNotFound { name: String },

    #[error("{path} is not inside a git working tree")]
    NotAWorkingTree { path: PathBuf },
}
