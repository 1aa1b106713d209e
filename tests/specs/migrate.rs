// SPDX-License-Identifier: MIT

//! Legacy ticket-id migration specs (§4.7 Migration, §8 scenario 5):
//! dry-run default, collision abort, and idempotent re-run.

use crate::support::Project;

fn inited() -> Project {
    let p = Project::empty();
    p.git_init();
    p.kd().args(&["init"]).passes();
    p
}

const LEGACY_TICKET: &str = "---\n\
id: kin-c3d4\n\
status: open\n\
deps: []\n\
links: []\n\
created: 2026-01-01T00:00:00Z\n\
type: task\n\
priority: 2\n\
---\n\
# Legacy ticket\n";

#[test]
fn migrate_dry_run_does_not_touch_the_filesystem() {
    let p = inited();
    p.file(".kd/backlog/tickets/kin-c3d4.md", LEGACY_TICKET);

    p.kd().args(&["migrate", "ticket-ids"]).passes().stdout_has("kin-c3d4 -> c3d4");

    assert!(p.exists(".kd/backlog/tickets/kin-c3d4.md"), "dry run must not rename anything");
    assert!(!p.exists(".kd/backlog/tickets/c3d4.md"));
}

#[test]
fn migrate_apply_renames_and_rewrites_frontmatter() {
    let p = inited();
    p.file(".kd/backlog/tickets/kin-c3d4.md", LEGACY_TICKET);

    p.kd().args(&["migrate", "ticket-ids", "--apply"]).passes().stdout_has("Migrated 1 ticket(s)");

    assert!(!p.exists(".kd/backlog/tickets/kin-c3d4.md"));
    let text = p.read(".kd/backlog/tickets/c3d4.md");
    assert!(text.contains("id: c3d4"), "frontmatter id should be rewritten: {text}");
}

/// Running `--apply` a second time is a no-op: nothing legacy-shaped is
/// left to migrate.
#[test]
fn migrate_apply_twice_is_idempotent() {
    let p = inited();
    p.file(".kd/backlog/tickets/kin-c3d4.md", LEGACY_TICKET);
    p.kd().args(&["migrate", "ticket-ids", "--apply"]).passes();

    p.kd().args(&["migrate", "ticket-ids", "--apply"]).passes().stdout_has("Nothing to migrate");
}

/// §8 scenario 5: a pre-existing bare-hex file collides with the rewrite
/// target. The whole migration must abort before touching anything.
#[test]
fn migrate_aborts_on_collision_with_zero_changes() {
    let p = inited();
    p.file(".kd/backlog/tickets/kin-a1b2.md", LEGACY_TICKET.replace("c3d4", "a1b2").as_str());
    p.file(".kd/backlog/tickets/a1b2.md", "---\nid: a1b2\nstatus: open\n---\n# Already here\n");

    p.kd().args(&["migrate", "ticket-ids", "--apply"]).fails();

    assert!(p.exists(".kd/backlog/tickets/kin-a1b2.md"), "no rename should have happened");
    let untouched = p.read(".kd/backlog/tickets/a1b2.md");
    assert!(untouched.contains("Already here"), "existing file must be untouched: {untouched}");
}
