use super::*;
use crate::ticket_store::{TicketScope, TicketStore};
use kingdom_core::TicketType;
use tempfile::tempdir;

#[test]
fn start_is_idempotent_and_normalizes_the_name() {
    let tmp = tempdir().unwrap();
    let lifecycle = BranchLifecycle::new(KdPaths::new(tmp.path()));
    let a = lifecycle.start("Feature X", "2026-01-01T00:00:00Z").unwrap();
    assert_eq!(a.normalized_name, "feature-x");
    assert_eq!(a.name, "Feature X");

    let b = lifecycle.start("Feature X", "2026-01-02T00:00:00Z").unwrap();
    assert_eq!(b.created_at, a.created_at, "re-starting must not reset created_at");
}

#[test]
fn start_rejects_a_name_that_normalizes_to_empty() {
    let tmp = tempdir().unwrap();
    let lifecycle = BranchLifecycle::new(KdPaths::new(tmp.path()));
    assert!(lifecycle.start("!!!", "2026-01-01T00:00:00Z").is_err());
}

#[test]
fn done_refuses_open_tickets_unless_forced() {
    let tmp = tempdir().unwrap();
    let paths = KdPaths::new(tmp.path());
    let lifecycle = BranchLifecycle::new(paths.clone());
    lifecycle.start("Feature X", "2026-01-01T00:00:00Z").unwrap();

    let tickets = TicketStore::new(paths.clone());
    tickets.create(TicketScope::Branch("feature-x".into()), "A", TicketType::Task, 2, vec![], "t0").unwrap();

    assert!(lifecycle.done("feature-x", false, "2026-01-02T00:00:00Z").is_err());
    let done = lifecycle.done("feature-x", true, "2026-01-02T00:00:00Z").unwrap();
    assert!(done.status.is_done());
    assert_eq!(done.done_at.as_deref(), Some("2026-01-02T00:00:00Z"));
}

#[test]
fn done_succeeds_without_force_when_all_tickets_closed() {
    let tmp = tempdir().unwrap();
    let paths = KdPaths::new(tmp.path());
    let lifecycle = BranchLifecycle::new(paths.clone());
    lifecycle.start("Feature X", "2026-01-01T00:00:00Z").unwrap();

    let tickets = TicketStore::new(paths.clone());
    let a = tickets.create(TicketScope::Branch("feature-x".into()), "A", TicketType::Task, 2, vec![], "t0").unwrap();
    tickets.close(a.id.as_str()).unwrap();

    let done = lifecycle.done("feature-x", false, "2026-01-02T00:00:00Z").unwrap();
    assert!(done.status.is_done());
}

#[test]
fn status_reports_ticket_counts_and_peasant_sessions() {
    let tmp = tempdir().unwrap();
    let paths = KdPaths::new(tmp.path());
    let lifecycle = BranchLifecycle::new(paths.clone());
    lifecycle.start("Feature X", "2026-01-01T00:00:00Z").unwrap();

    let tickets = TicketStore::new(paths.clone());
    tickets.create(TicketScope::Branch("feature-x".into()), "A", TicketType::Task, 2, vec![], "t0").unwrap();
    tickets.create(TicketScope::Branch("feature-x".into()), "B", TicketType::Task, 2, vec![], "t0").unwrap();

    std::fs::create_dir_all(paths.branch_peasants_dir("feature-x")).unwrap();
    std::fs::write(paths.peasant_session_path("feature-x", "peasant-aa11"), "{}").unwrap();

    let summary = lifecycle.status("feature-x").unwrap();
    assert_eq!(summary.ticket_counts[&"open"], 2);
    assert_eq!(summary.peasant_sessions, vec!["peasant-aa11".to_string()]);
}

#[test]
fn done_then_start_reactivates_the_branch() {
    let tmp = tempdir().unwrap();
    let paths = KdPaths::new(tmp.path());
    let lifecycle = BranchLifecycle::new(paths);
    lifecycle.start("Feature X", "2026-01-01T00:00:00Z").unwrap();
    let done = lifecycle.done("feature-x", true, "2026-01-02T00:00:00Z").unwrap();
    assert!(done.status.is_done());

    let restarted = lifecycle.start("Feature X", "2026-01-03T00:00:00Z").unwrap();
    assert!(!restarted.status.is_done());
    assert!(restarted.done_at.is_none());
}
