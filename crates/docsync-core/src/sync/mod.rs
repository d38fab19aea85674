//! Synchronization of the home `docs/` tree with destination repositories
//!
//! - [`SyncEngine`] drives a run: lock, one pass per destination, home commit
//! - the per-repository pass lives in `pass`
//! - [`SyncReport`] records every outcome
//! - [`RetryPolicy`] bounds push retries

mod engine;
mod pass;
mod report;
mod retry;

pub use engine::{HOME_COMMIT_MESSAGE, SyncEngine, SyncOptions};
pub use report::{HomeCommit, Outcome, RepoReport, Stage, SyncReport, Tally};
pub use retry::{Attempts, RetryPolicy, retry};
