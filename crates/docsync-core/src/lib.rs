//! Core sync engine for docs-sync
//!
//! Keeps a `docs/` tree consistent across a home repository and a list of
//! destination repositories. Each destination owns `docs/<short_name>/`;
//! everything else under `docs/` is the shared region, authored in home.
//!
//! # Architecture
//!
//! ```text
//!                  docsync-cli
//!                       |
//!                  docsync-core
//!                   /        \
//!           docsync-fs    docsync-git
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docsync_core::{Manifest, SettingsResolver, SyncEngine, SyncOptions};
//! use docsync_git::Git2Client;
//!
//! let settings = SettingsResolver::new(home).resolve(&Manifest::default())?;
//! let engine = SyncEngine::new(Git2Client::new(), home, settings, SyncOptions::default())?;
//! let report = engine.run(None)?;
//! ```

pub mod config;
pub mod error;
pub mod home;
pub mod repository;
pub mod sync;

pub use config::{Manifest, RepoList, Settings, SettingsResolver};
pub use error::{Error, Result};
pub use home::{HomeDocs, PullKind, Pulled};
pub use repository::{RepositoryRef, SyncSet};
pub use sync::{
    HomeCommit, Outcome, RepoReport, RetryPolicy, Stage, SyncEngine, SyncOptions, SyncReport,
    Tally,
};
