//! Shared test utilities for the docs-sync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git2 fixtures: working repositories, bare remotes, commits
//! - [`repo`]: [`SyncFixture`](repo::SyncFixture) builder wiring a home
//!   repository to a set of bare destination remotes

pub mod git;
pub mod repo;
