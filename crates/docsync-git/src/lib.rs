//! Version control for docs-sync
//!
//! The sync engine only sees the [`VcsClient`] trait; [`Git2Client`] is the
//! libgit2 implementation used in production and in tests against bare
//! remotes on the local filesystem.

pub mod client;
pub mod error;
pub mod helpers;
pub mod history;
pub mod provider;

pub use client::Git2Client;
pub use error::{Error, Result};
pub use helpers::discover;
pub use history::CommitInfo;
pub use provider::{FastForward, VcsClient};
