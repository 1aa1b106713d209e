// SPDX-License-Identifier: MIT

//! Branch lifecycle specs (§4.10, §8): idempotent `start`, `done --force`
//! gating, and empty-slug rejection.

use crate::support::Project;

fn inited() -> Project {
    let p = Project::empty();
    p.git_init();
    p.kd().args(&["init"]).passes();
    p
}

#[test]
fn repeated_start_is_idempotent() {
    let p = inited();
    p.kd().args(&["start", "feature-x"]).passes().stdout_has("Started branch");
    p.kd().args(&["start", "feature-x"]).passes().stdout_has("Started branch");
    assert!(p.exists(".kd/branches/feature-x/state.json"));
}

/// §6.2: a branch name that normalizes to the empty string must fail
/// rather than writing into the branches root.
#[test]
fn start_with_name_that_normalizes_empty_fails() {
    let p = inited();
    p.kd().args(&["start", "---"]).fails();
    let branches_dir = p.path().join(".kd/branches");
    let entries = std::fs::read_dir(&branches_dir).map(|it| it.count()).unwrap_or(0);
    assert_eq!(entries, 0, "start must not create any directory for an empty slug");
}

/// §8 invariant 6 / scenario 6: `done` refuses while tickets remain open,
/// with no state mutation, unless `--force` is given.
#[test]
fn done_refuses_with_open_tickets_unless_forced() {
    let p = inited();
    p.checkout("feature-open");
    p.kd().args(&["start", "feature-open"]).passes();
    p.kd().args(&["tk", "create", "Unfinished work"]).passes();

    p.kd().args(&["done", "feature-open"]).fails();
    let state_before = p.read(".kd/branches/feature-open/state.json");
    assert!(state_before.contains("\"active\""), "branch should still be active: {state_before}");

    p.kd().args(&["done", "feature-open", "--force"]).passes().stdout_has("marked done");
    let state_after = p.read(".kd/branches/feature-open/state.json");
    assert!(state_after.contains("\"done\""), "branch should be done: {state_after}");
}

#[test]
fn done_succeeds_once_every_ticket_is_closed() {
    let p = inited();
    p.checkout("feature-clean");
    p.kd().args(&["start", "feature-clean"]).passes();
    let id = p.kd().args(&["tk", "create", "Only thing"]).passes().created_ticket_id();
    p.kd().args(&["tk", "close", &id]).passes();

    p.kd().args(&["done", "feature-clean"]).passes().stdout_has("marked done");
}
