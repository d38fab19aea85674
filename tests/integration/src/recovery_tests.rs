//! Recovery of a destination's owned subtree from its git history.

mod common;

use common::{home_with_shared_docs, sync};
use docsync_core::Outcome;
use docsync_git::{Git2Client, VcsClient};
use pretty_assertions::assert_eq;

/// Reproduces an old sync that mirrored home without excluding the
/// destination's own subtree, wiping `docs/billing` on the remote.
#[test]
fn subtree_wiped_by_unguarded_mirror_is_restored() {
    let fixture = home_with_shared_docs();
    fixture.add_remote(
        "billing",
        &[
            ("docs/billing/guide.md", "How billing works"),
            ("docs/billing/faq.md", "Questions"),
        ],
    );

    let client = Git2Client::new();
    let scratch = fixture.root().join("scratch");
    let url = fixture.remote("billing").to_string_lossy().into_owned();
    client.clone_repo(&url, &scratch, "main").unwrap();
    docsync_fs::mirror(&fixture.home().join("docs"), &scratch.join("docs"), &[]).unwrap();
    client.stage(&scratch, "docs").unwrap();
    client.commit(&scratch, "Sync docs").unwrap().unwrap();
    client.push(&scratch, "main").unwrap();
    assert!(!fixture.remote_docs("billing").contains_key("billing/guide.md"));

    let report = sync(&fixture, &["billing"]);

    assert!(report.success());
    let billing = report.repo("billing").unwrap();
    assert_eq!(billing.restored, 2);
    assert!(matches!(billing.outcome, Outcome::Synced { .. }));

    let remote = fixture.remote_docs("billing");
    assert_eq!(remote.get("billing/guide.md").map(String::as_str), Some("How billing works"));
    assert_eq!(remote.get("billing/faq.md").map(String::as_str), Some("Questions"));
    assert_eq!(
        fixture.home_docs().get("billing/faq.md").map(String::as_str),
        Some("Questions")
    );
}

#[test]
fn deleted_subtree_is_restored_at_its_latest_content() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "v1")]);
    sync(&fixture, &["billing"]);

    fixture.push_to_remote("billing", &[("docs/billing/guide.md", "v2")], &[], "Edit guide");
    fixture.push_to_remote("billing", &[], &["docs/billing/guide.md"], "Drop guide");

    let report = sync(&fixture, &["billing"]);

    assert_eq!(report.repo("billing").unwrap().restored, 1);
    assert_eq!(
        fixture.remote_docs("billing").get("billing/guide.md").map(String::as_str),
        Some("v2")
    );
}

#[test]
fn destination_without_owned_history_is_not_an_error() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("README.md", "# Billing")]);

    let report = sync(&fixture, &["billing"]);

    assert!(report.success());
    let billing = report.repo("billing").unwrap();
    assert_eq!(billing.restored, 0);
    assert_eq!(billing.pulled, 0);

    let remote = fixture.remote_docs("billing");
    assert_eq!(remote.get("index.md").map(String::as_str), Some("# Platform docs"));
    assert!(!remote.keys().any(|k| k.starts_with("billing/")));
}

#[test]
fn present_subtree_is_left_alone() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "current")]);

    let report = sync(&fixture, &["billing"]);

    assert_eq!(report.repo("billing").unwrap().restored, 0);
    assert_eq!(
        fixture.remote_docs("billing").get("billing/guide.md").map(String::as_str),
        Some("current")
    );
}
