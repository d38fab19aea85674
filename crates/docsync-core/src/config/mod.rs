//! Settings resolution
//!
//! Settings are merged from these sources (later sources override earlier):
//!
//! 1. **Defaults** - branch `main`, remote `https://github.com`, clone dir
//!    `<temp>/docs-sync`
//! 2. **Config file** - `.docs-sync.toml` in the home root, or `--config`
//!    (`.toml`, `.json`, `.yaml`/`.yml`)
//! 3. **Environment** - `DOCS_SYNC_REPOS`, `DOCS_SYNC_BRANCH`,
//!    `DOCS_SYNC_CLONE_DIR`, `DOCS_SYNC_REMOTE`, `DOCS_SYNC_HOME`
//! 4. **Command line** - explicit flags
//!
//! # Example
//!
//! ```ignore
//! use docsync_core::config::{Manifest, SettingsResolver};
//!
//! let settings = SettingsResolver::new("/path/to/home").resolve(&Manifest::default())?;
//! println!("Syncing {} repositories on {}", settings.repos.len(), settings.branch);
//! ```

mod manifest;
mod resolver;

pub use manifest::{
    ENV_BRANCH, ENV_CLONE_DIR, ENV_HOME, ENV_REMOTE, ENV_REPOS, Manifest, RepoList,
};
pub use resolver::{DEFAULT_BRANCH, DEFAULT_REMOTE, Settings, SettingsResolver, default_clone_dir};
