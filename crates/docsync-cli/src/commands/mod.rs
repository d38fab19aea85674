//! Command implementations for docsync-cli

pub mod sync;

pub use sync::run_sync;
