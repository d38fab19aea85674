//! Well-known file and directory names.

use std::path::Path;

/// Standard paths the sync engine reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPath {
    /// The `docs` directory synchronized across repositories
    Docs,
    /// The `.git` directory (marks an existing working clone)
    GitDir,
    /// Run lock inside the clone directory
    LockFile,
    /// Default configuration file in the home repository root
    ConfigFile,
}

impl SyncPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::GitDir => ".git",
            Self::LockFile => ".docs-sync.lock",
            Self::ConfigFile => ".docs-sync.toml",
        }
    }
}

impl AsRef<Path> for SyncPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SyncPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SyncPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
