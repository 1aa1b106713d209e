use super::*;

#[test]
fn new_branch_is_active_and_unapproved() {
    let b = Branch::new("Add Login", "add-login", "2026-01-01T00:00:00Z");
    assert_eq!(b.status, BranchStatus::Active);
    assert!(!b.design_approved);
    assert!(b.session.is_none());
    assert!(b.done_at.is_none());
}

#[test]
fn round_trips_through_json() {
    let b = Branch::builder().name("Add Login").normalized_name("add-login").build();
    let json = serde_json::to_string(&b).unwrap();
    let back: Branch = serde_json::from_str(&json).unwrap();
    assert_eq!(back.name, b.name);
    assert_eq!(back.normalized_name, b.normalized_name);
}

#[test]
fn done_status_is_done() {
    assert!(BranchStatus::Done.is_done());
    assert!(!BranchStatus::Active.is_done());
}
