//! Filesystem primitives for docs-sync
//!
//! Provides normalized relative paths, atomic writes, content snapshots of
//! documentation trees, and the exclusion-aware mirror the sync engine is
//! built on.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod lock;
pub mod mirror;
pub mod path;
pub mod tree;

pub use config::ConfigStore;
pub use constants::SyncPath;
pub use error::{Error, Result};
pub use lock::RunLock;
pub use mirror::{MirrorStats, list_entries, merge_tree, mirror, move_entry};
pub use path::NormalizedPath;
pub use tree::DocTree;

/// Canonicalize a path without the Windows `\\?\` prefix.
pub fn canonicalize(path: &std::path::Path) -> Result<std::path::PathBuf> {
    dunce::canonicalize(path).map_err(|e| Error::io(path, e))
}
