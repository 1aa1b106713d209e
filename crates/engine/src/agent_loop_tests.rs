use super::*;
use kingdom_adapters::agent::AgentResponse;
use kingdom_adapters::test_support::FakeAdapter;
use kingdom_core::TicketType;
use kingdom_storage::branch_lifecycle::BranchLifecycle;
use kingdom_storage::paths::KdPaths;
use kingdom_storage::ticket_store::TicketScope;
use tempfile::tempdir;

fn setup() -> (tempfile::TempDir, KdPaths, TicketId) {
    let tmp = tempdir().unwrap();
    let paths = KdPaths::new(tmp.path());
    let lifecycle = BranchLifecycle::new(paths.clone());
    lifecycle.init().unwrap();
    lifecycle.start("feature-x", "2026-01-01T00:00:00Z").unwrap();

    let store = TicketStore::new(paths.clone());
    let ticket = store
        .create(TicketScope::Branch("feature-x".into()), "Do thing", TicketType::Task, 2, vec![], "2026-01-01T00:00:00Z")
        .unwrap();
    (tmp, paths, ticket.id)
}

#[tokio::test]
async fn run_closes_the_ticket_when_the_agent_replies_complete() {
    let (_tmp, paths, ticket_id) = setup();
    let adapter = Arc::new(FakeAdapter::new("codex", AgentResponse::ok("all done\nCOMPLETE", None)));
    let harness = AgentLoop::new(paths.clone(), "feature-x", adapter, Duration::from_secs(5));

    let outcome = harness.run(&ticket_id, "2026-01-01T00:01:00Z").await.unwrap();
    assert_eq!(outcome, AgentLoopOutcome::Completed);

    let store = TicketStore::new(paths);
    let located = store.find(ticket_id.as_str()).unwrap();
    assert_eq!(located.ticket.status, kingdom_core::TicketStatus::Closed);
}

#[tokio::test]
async fn run_blocks_after_exhausting_the_bounded_iteration_count() {
    let (_tmp, paths, ticket_id) = setup();
    let adapter = Arc::new(FakeAdapter::new("codex", AgentResponse::ok("still working", None)));
    let harness = AgentLoop::new(paths.clone(), "feature-x", adapter, Duration::from_secs(5));

    let outcome = harness.run(&ticket_id, "2026-01-01T00:01:00Z").await.unwrap();
    assert_eq!(outcome, AgentLoopOutcome::Blocked);

    let store = TicketStore::new(paths.clone());
    let located = store.find(ticket_id.as_str()).unwrap();
    assert_eq!(located.ticket.status, kingdom_core::TicketStatus::Open);

    let thread_store = ThreadStore::new(paths);
    let thread_id = kingdom_core::ThreadId::work(&ticket_id);
    let messages = thread_store.list("feature-x", &thread_id).unwrap();
    assert_eq!(messages.iter().filter(|m| m.from == "assistant").count(), MAX_ITERATIONS as usize);
}

#[tokio::test]
async fn run_feeds_new_king_messages_into_later_prompts() {
    let (_tmp, paths, ticket_id) = setup();
    let adapter = Arc::new(FakeAdapter::new("codex", AgentResponse::ok("COMPLETE", None)));
    let harness = AgentLoop::new(paths.clone(), "feature-x", adapter, Duration::from_secs(5));

    let thread_store = ThreadStore::new(paths.clone());
    thread_store.create_or_resume_work_thread("feature-x", &ticket_id, "2026-01-01T00:00:30Z").unwrap();
    let thread_id = kingdom_core::ThreadId::work(&ticket_id);
    thread_store
        .append("feature-x", &thread_id, "king", "assistant", "use approach B".to_string(), None, "2026-01-01T00:00:45Z")
        .unwrap();

    let prompt = harness.build_prompt(&ticket_id, 0).unwrap();
    assert!(prompt.contains("use approach B"));

    let outcome = harness.run(&ticket_id, "2026-01-01T00:01:00Z").await.unwrap();
    assert_eq!(outcome, AgentLoopOutcome::Completed);
}
