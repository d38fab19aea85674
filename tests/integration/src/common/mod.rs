//! Shared setup for the end-to-end sync tests.

#![allow(dead_code)]

use docsync_core::{RetryPolicy, Settings, SyncEngine, SyncOptions, SyncReport};
use docsync_git::Git2Client;
use docsync_test_utils::repo::SyncFixture;

/// Settings pointing `repos` at the fixture's bare remotes.
pub fn settings(fixture: &SyncFixture, repos: &[&str]) -> Settings {
    Settings {
        repos: repos.iter().map(|name| fixture.full_name(name)).collect(),
        branch: "main".into(),
        clone_dir: fixture.clone_dir(),
        remote: fixture.remote_base().to_string_lossy().into_owned(),
        home: None,
    }
}

pub fn engine(fixture: &SyncFixture, repos: &[&str]) -> SyncEngine<Git2Client> {
    let options = SyncOptions {
        push: true,
        retry: RetryPolicy::immediate(4),
    };
    SyncEngine::new(
        Git2Client::new(),
        &fixture.home(),
        settings(fixture, repos),
        options,
    )
    .unwrap_or_else(|e| panic!("engine: {e}"))
}

/// Run a full sync over `repos`.
pub fn sync(fixture: &SyncFixture, repos: &[&str]) -> SyncReport {
    engine(fixture, repos)
        .run(None)
        .unwrap_or_else(|e| panic!("sync: {e}"))
}

/// Home repository with a small shared region committed.
pub fn home_with_shared_docs() -> SyncFixture {
    let fixture = SyncFixture::new("platform");
    fixture.home_write("docs/index.md", "# Platform docs");
    fixture.home_write("docs/guides/onboarding.md", "Welcome");
    fixture.home_commit("Add shared docs");
    fixture
}
