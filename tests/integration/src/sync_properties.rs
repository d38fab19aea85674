//! End-to-end properties of a sync run: ownership, mirroring, loose-doc
//! promotion, idempotence, failure isolation, and filtering.

mod common;

use common::{engine, home_with_shared_docs, sync};
use docsync_core::{HomeCommit, Outcome, PullKind, Stage};
use pretty_assertions::assert_eq;

fn is_skipped(outcome: &Outcome) -> bool {
    matches!(outcome, Outcome::Skipped)
}

fn is_synced(outcome: &Outcome) -> bool {
    matches!(outcome, Outcome::Synced { pushed: true, .. })
}

#[test]
fn owned_subtree_survives_a_pass_when_home_lacks_it() {
    let fixture = home_with_shared_docs();
    fixture.add_remote(
        "billing",
        &[
            ("docs/billing/guide.md", "How billing works"),
            ("docs/billing/api/invoices.md", "GET /invoices"),
        ],
    );

    let report = sync(&fixture, &["billing"]);

    assert!(report.success());
    let remote = fixture.remote_docs("billing");
    assert_eq!(remote.get("billing/guide.md").map(String::as_str), Some("How billing works"));
    assert_eq!(remote.get("billing/api/invoices.md").map(String::as_str), Some("GET /invoices"));
    assert_eq!(remote.get("index.md").map(String::as_str), Some("# Platform docs"));
    assert_eq!(
        fixture.home_docs().get("billing/api/invoices.md").map(String::as_str),
        Some("GET /invoices")
    );
}

#[test]
fn home_copy_never_overwrites_destination_subtree() {
    let fixture = home_with_shared_docs();
    fixture.home_write("docs/billing/secret.md", "stale home copy");
    fixture.home_write("docs/billing/home-only.md", "only in home");
    fixture.home_commit("Stale billing copy");
    fixture.add_remote("billing", &[("docs/billing/secret.md", "authoritative")]);

    let report = sync(&fixture, &["billing"]);

    assert!(report.success());
    let remote = fixture.remote_docs("billing");
    assert_eq!(remote.get("billing/secret.md").map(String::as_str), Some("authoritative"));
    assert!(!remote.contains_key("billing/home-only.md"));

    let home = fixture.home_docs();
    assert_eq!(home.get("billing/secret.md").map(String::as_str), Some("authoritative"));
    assert_eq!(home.get("billing/home-only.md").map(String::as_str), Some("only in home"));
}

#[test]
fn shared_region_is_mirrored_destructively() {
    let fixture = home_with_shared_docs();
    fixture.add_remote(
        "billing",
        &[
            ("docs/billing/guide.md", "owned"),
            ("docs/guides/outdated.md", "removed upstream long ago"),
            ("docs/index.md", "old index"),
        ],
    );

    let report = sync(&fixture, &["billing"]);

    assert!(report.success());
    let remote = fixture.remote_docs("billing");
    assert_eq!(remote.get("index.md").map(String::as_str), Some("# Platform docs"));
    assert_eq!(remote.get("guides/onboarding.md").map(String::as_str), Some("Welcome"));
    assert!(!remote.contains_key("guides/outdated.md"));
    assert!(report.repo("billing").unwrap().mirror.removed >= 1);
}

#[test]
fn files_outside_docs_are_untouched() {
    let fixture = home_with_shared_docs();
    fixture.add_remote(
        "billing",
        &[("docs/billing/guide.md", "owned"), ("src/lib.rs", "pub fn bill() {}")],
    );

    sync(&fixture, &["billing"]);

    let files = fixture.remote_files("billing");
    assert_eq!(files.get("src/lib.rs").map(String::as_str), Some("pub fn bill() {}"));
}

#[test]
fn loose_docs_are_promoted_into_owned_subtree() {
    let fixture = home_with_shared_docs();
    fixture.add_remote(
        "billing",
        &[
            ("docs/billing/guide.md", "owned"),
            ("docs/random-notes/todo.md", "write more docs"),
            ("docs/changelog.md", "v1"),
        ],
    );

    let report = sync(&fixture, &["billing"]);

    assert!(report.success());
    assert_eq!(
        report.repo("billing").unwrap().loose,
        vec!["changelog.md".to_string(), "random-notes".to_string()]
    );

    let home = fixture.home_docs();
    assert_eq!(
        home.get("billing/random-notes/todo.md").map(String::as_str),
        Some("write more docs")
    );
    assert_eq!(home.get("billing/changelog.md").map(String::as_str), Some("v1"));
    assert!(!home.contains_key("random-notes/todo.md"));

    let remote = fixture.remote_docs("billing");
    assert_eq!(
        remote.get("billing/random-notes/todo.md").map(String::as_str),
        Some("write more docs")
    );
    assert!(!remote.contains_key("random-notes/todo.md"));
    assert!(!remote.contains_key("changelog.md"));

    assert!(report.pulls.iter().any(|p| p.kind
        == PullKind::Loose {
            entry: "random-notes".into()
        }));
}

#[test]
fn loose_entry_merges_into_existing_owned_entry() {
    let fixture = home_with_shared_docs();
    fixture.add_remote(
        "billing",
        &[
            ("docs/billing/notes/a.md", "a"),
            ("docs/notes/b.md", "b"),
        ],
    );

    sync(&fixture, &["billing"]);

    let remote = fixture.remote_docs("billing");
    assert!(remote.contains_key("billing/notes/a.md"));
    assert!(remote.contains_key("billing/notes/b.md"));
    assert!(!remote.contains_key("notes/b.md"));
}

#[test]
fn other_destinations_subtrees_are_not_loose() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "billing")]);
    fixture.add_remote(
        "api",
        &[("docs/api/reference.md", "api"), ("docs/billing/guide.md", "stale copy")],
    );

    let report = sync(&fixture, &["billing", "api"]);

    assert!(report.success());
    assert!(report.repo("api").unwrap().loose.is_empty());
    assert_eq!(
        fixture.remote_docs("api").get("billing/guide.md").map(String::as_str),
        Some("billing")
    );
    assert_eq!(
        fixture.home_docs().get("api/reference.md").map(String::as_str),
        Some("api")
    );
}

#[test]
fn second_pass_without_changes_is_a_no_op() {
    let fixture = home_with_shared_docs();
    fixture.add_remote(
        "billing",
        &[
            ("docs/billing/guide.md", "owned"),
            ("docs/random-notes/todo.md", "loose"),
        ],
    );

    let first = sync(&fixture, &["billing"]);
    assert!(is_synced(&first.repo("billing").unwrap().outcome));
    assert!(matches!(first.home_commit, HomeCommit::Committed { .. }));
    let commits = fixture.remote_commit_count("billing");

    let second = sync(&fixture, &["billing"]);

    assert!(second.success());
    assert!(is_skipped(&second.repo("billing").unwrap().outcome));
    assert_eq!(second.home_commit, HomeCommit::NotNeeded);
    assert!(second.pulls.is_empty());
    assert_eq!(fixture.remote_commit_count("billing"), commits);
}

#[test]
fn runs_converge_across_multiple_destinations() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "billing")]);
    fixture.add_remote("api", &[("docs/api/reference.md", "api")]);
    let repos = ["billing", "api"];

    sync(&fixture, &repos);

    // billing ran before api's docs reached home, so it catches up once.
    let second = sync(&fixture, &repos);
    assert!(is_synced(&second.repo("billing").unwrap().outcome));
    assert!(is_skipped(&second.repo("api").unwrap().outcome));
    assert!(fixture.remote_docs("billing").contains_key("api/reference.md"));

    let third = sync(&fixture, &repos);
    assert_eq!(third.tally.skipped, 2);
    assert_eq!(third.home_commit, HomeCommit::NotNeeded);
}

#[test]
fn destination_edits_flow_back_on_later_runs() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "v1")]);
    sync(&fixture, &["billing"]);

    fixture.push_to_remote(
        "billing",
        &[("docs/billing/guide.md", "v2")],
        &[],
        "Update guide",
    );
    let report = sync(&fixture, &["billing"]);

    assert_eq!(report.repo("billing").unwrap().pulled, 1);
    assert!(matches!(report.home_commit, HomeCommit::Committed { .. }));
    assert_eq!(
        fixture.home_docs().get("billing/guide.md").map(String::as_str),
        Some("v2")
    );
}

#[test]
fn one_failing_repository_does_not_stop_the_run() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "billing")]);
    fixture.add_remote("api", &[("docs/api/reference.md", "api")]);

    let report = sync(&fixture, &["billing", "ghost", "api"]);

    assert_eq!(report.tally.failed, 1);
    assert_eq!(report.tally.synced, 2);
    assert!(!report.success());
    assert_eq!(
        report
            .repos
            .iter()
            .map(|r| r.short_name.as_str())
            .collect::<Vec<_>>(),
        vec!["billing", "ghost", "api"]
    );
    assert!(matches!(
        report.repo("ghost").unwrap().outcome,
        Outcome::Failed {
            stage: Stage::Acquire,
            ..
        }
    ));
    assert!(fixture.remote_docs("api").contains_key("billing/guide.md"));
    assert!(fixture.home_docs().contains_key("api/reference.md"));
}

#[test]
fn filter_processes_only_the_named_repository() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "billing")]);
    fixture.add_remote("api", &[("docs/api/reference.md", "api")]);

    let report = engine(&fixture, &["billing", "api"])
        .run(Some("acme/api"))
        .unwrap();

    assert_eq!(report.repos.len(), 1);
    assert_eq!(report.repos[0].short_name, "api");
    assert_eq!(report.tally.failed, 0);
    assert_eq!(fixture.remote_commit_count("billing"), 1);
    assert!(!fixture.clone_dir().join("billing").exists());
}

#[test]
fn filtered_run_still_treats_unselected_names_as_owned() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "billing")]);
    fixture.add_remote(
        "api",
        &[("docs/api/reference.md", "api"), ("docs/billing/guide.md", "billing")],
    );

    let report = engine(&fixture, &["billing", "api"])
        .run(Some("api"))
        .unwrap();

    assert!(report.repo("api").unwrap().loose.is_empty());
}

#[test]
fn repository_listing_home_is_not_a_destination() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "billing")]);

    let report = sync(&fixture, &["platform", "billing"]);

    assert_eq!(report.repos.len(), 1);
    assert_eq!(report.repos[0].short_name, "billing");
}

#[test]
fn shared_file_deleted_in_home_is_deleted_downstream() {
    let fixture = home_with_shared_docs();
    fixture.home_write("docs/old-guide.md", "retired soon");
    fixture.home_commit("Add old guide");
    fixture.add_remote("billing", &[("docs/billing/guide.md", "billing")]);
    sync(&fixture, &["billing"]);
    assert!(fixture.remote_docs("billing").contains_key("old-guide.md"));

    fixture.home_remove("docs/old-guide.md");
    fixture.home_commit("Retire old guide");
    let report = sync(&fixture, &["billing"]);

    let billing = report.repo("billing").unwrap();
    assert!(billing.loose.is_empty());
    assert!(is_synced(&billing.outcome));
    let remote = fixture.remote_docs("billing");
    assert!(!remote.contains_key("old-guide.md"));
    assert!(!remote.contains_key("billing/old-guide.md"));
    assert!(!fixture.home_docs().contains_key("billing/old-guide.md"));
    assert_eq!(report.home_commit, HomeCommit::NotNeeded);
}

#[test]
fn loose_doc_added_after_a_sync_is_still_promoted() {
    let fixture = home_with_shared_docs();
    fixture.add_remote("billing", &[("docs/billing/guide.md", "billing")]);
    sync(&fixture, &["billing"]);

    fixture.push_to_remote("billing", &[("docs/runbook.md", "page me")], &[], "Add runbook");
    let report = sync(&fixture, &["billing"]);

    assert_eq!(report.repo("billing").unwrap().loose, vec!["runbook.md".to_string()]);
    assert_eq!(
        fixture.remote_docs("billing").get("billing/runbook.md").map(String::as_str),
        Some("page me")
    );
    assert!(!fixture.remote_docs("billing").contains_key("runbook.md"));
}
