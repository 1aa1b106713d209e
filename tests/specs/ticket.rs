// SPDX-License-Identifier: MIT

//! Ticket graph specs (§4.7, §8): create/close dependency chains, append-
//! only deps, id shape, and short-id ambiguity.

use crate::support::Project;

fn new_branch(name: &str) -> Project {
    let p = Project::empty();
    p.git_init();
    p.kd().args(&["init"]).passes();
    p.checkout(name);
    p
}

/// §8 end-to-end scenario 1: ticket create/close dependency chain.
#[test]
fn ready_set_tracks_closing_a_dependency() {
    let p = new_branch("feature-f");

    let a = p.kd().args(&["tk", "create", "A"]).passes().created_ticket_id();
    let b = p.kd().args(&["tk", "create", "B"]).passes().created_ticket_id();
    p.kd().args(&["tk", "dep", &b, &a]).passes();

    let ready = p.kd().args(&["tk", "ready"]).passes();
    let ready_out = ready.stdout().to_string();
    assert!(ready_out.contains(&a), "ready set should contain {a}, got: {ready_out}");
    assert!(!ready_out.contains(&b), "ready set should not yet contain {b}, got: {ready_out}");

    p.kd().args(&["tk", "close", &a]).passes().stdout_has(&format!("Ticket {a} closed"));

    let ready2 = p.kd().args(&["tk", "ready"]).passes();
    let ready2_out = ready2.stdout().to_string();
    assert!(ready2_out.contains(&b), "ready set should contain {b} once {a} is closed, got: {ready2_out}");
}

/// §8 invariant 5: `tk dep a b` then `tk dep a c` leaves both deps present.
#[test]
fn add_dep_appends_without_overwriting_prior_deps() {
    let p = new_branch("feature-deps");

    let a = p.kd().args(&["tk", "create", "A"]).passes().created_ticket_id();
    let b = p.kd().args(&["tk", "create", "B"]).passes().created_ticket_id();
    let c = p.kd().args(&["tk", "create", "C"]).passes().created_ticket_id();

    p.kd().args(&["tk", "dep", &a, &b]).passes();
    p.kd().args(&["tk", "dep", &a, &c]).passes();

    let text = p.read(&format!(".kd/branches/feature-deps/tickets/{a}.md"));
    let deps_line = text.lines().find(|l| l.starts_with("deps:")).expect("deps field present");
    assert!(deps_line.contains(&b), "deps line lost {b}: {deps_line}");
    assert!(deps_line.contains(&c), "deps line lost {c}: {deps_line}");
}

/// §3 invariant: generated ticket ids are exactly 4 lowercase hex chars
/// and equal the file's stem (§8 invariant 2).
#[test]
fn created_ticket_id_is_four_lowercase_hex_chars_matching_filename() {
    let p = new_branch("feature-ids");
    let id = p.kd().args(&["tk", "create", "Anything"]).passes().created_ticket_id();

    assert_eq!(id.len(), 4, "ticket id {id:?} should be 4 chars");
    assert!(id.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()), "ticket id {id:?} should be lowercase hex");
    assert!(p.exists(&format!(".kd/branches/feature-ids/tickets/{id}.md")));
}

/// `tk close` on an unknown id fails with a nonzero exit rather than
/// silently no-op'ing.
#[test]
fn closing_an_unknown_ticket_fails() {
    let p = new_branch("feature-missing");
    p.kd().args(&["tk", "close", "dead"]).fails();
}

/// §4.7 `find`: an ambiguous short-id prefix lists every candidate rather
/// than picking one silently.
#[test]
fn ambiguous_prefix_lookup_lists_every_candidate() {
    let p = new_branch("feature-ambiguous");
    let a = p.kd().args(&["tk", "create", "A"]).passes().created_ticket_id();
    let b = p.kd().args(&["tk", "create", "B"]).passes().created_ticket_id();

    // Exercise the ambiguous branch only when the random ids happen to
    // share a one-character prefix; otherwise just confirm each resolves.
    let shared_prefix = &a[..1];
    if b.starts_with(shared_prefix) {
        p.kd().args(&["tk", "show", shared_prefix]).fails();
    } else {
        p.kd().args(&["tk", "show", &a]).passes().stdout_has(&a);
        p.kd().args(&["tk", "show", &b]).passes().stdout_has(&b);
    }
}
