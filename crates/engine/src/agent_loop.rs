// SPDX-License-Identifier: MIT

//! The single-ticket execution harness (§4.9): build a prompt from the
//! ticket and design, invoke the adapter once per iteration (the harness
//! itself is the retry layer, not [`kingdom_adapters::query::query`]'s
//! built-in retry policy), and loop until a `COMPLETE` sentinel appears or
//! a bounded iteration count is exhausted.

use kingdom_adapters::{query, AgentAdapter};
use kingdom_core::{KdError, TicketId};
use kingdom_storage::{KdPaths, ThreadStore, TicketStore};
use std::sync::Arc;
use std::time::Duration;

/// Documented, not spec-pinned (§4.9): a circuit breaker against a ticket
/// that never converges, scaled up from the teacher's own step-visit
/// breaker since a single ticket may reasonably take more turns than one
/// job step.
pub const MAX_ITERATIONS: u32 = 40;

const COMPLETE_SENTINEL: &str = "COMPLETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentLoopOutcome {
    Completed,
    Blocked,
}

pub struct AgentLoop {
    paths: KdPaths,
    branch: String,
    adapter: Arc<dyn AgentAdapter>,
    timeout: Duration,
}

impl AgentLoop {
    pub fn new(paths: KdPaths, branch: impl Into<String>, adapter: Arc<dyn AgentAdapter>, timeout: Duration) -> Self {
        Self { paths, branch: branch.into(), adapter, timeout }
    }

    fn build_prompt(&self, ticket_id: &TicketId, worklog_since: usize) -> Result<String, KdError> {
        let ticket_store = TicketStore::new(self.paths.clone());
        let located = ticket_store.find(ticket_id.as_str())?;

        let design_path = self.paths.branch_design_path(&self.branch);
        let design = kingdom_core::file_store::read_text(&design_path)?.unwrap_or_default();

        let thread_store = ThreadStore::new(self.paths.clone());
        let thread_id = kingdom_core::ThreadId::work(ticket_id);
        let messages = thread_store.list(&self.branch, &thread_id)?;
        let new_king_messages: Vec<_> =
            messages.iter().skip(worklog_since).filter(|m| m.from == "king").map(|m| m.body.clone()).collect();

        let mut prompt = String::new();
        if !design.is_empty() {
            prompt.push_str("## Design\n\n");
            prompt.push_str(&design);
            prompt.push_str("\n\n");
        }
        prompt.push_str(&format!("## Ticket {}: {}\n\n{}\n\n", located.ticket.id, located.ticket.title, located.ticket.body));
        if !new_king_messages.is_empty() {
            prompt.push_str("## New instructions\n\n");
            for m in new_king_messages {
                prompt.push_str(&m);
                prompt.push('\n');
            }
        }
        prompt.push_str(&format!(
            "\nReply with the literal line `{COMPLETE_SENTINEL}` once every acceptance criterion is satisfied."
        ));
        Ok(prompt)
    }

    /// §4.9: run the loop for one ticket, up to [`MAX_ITERATIONS`].
    pub async fn run(&self, ticket_id: &TicketId, now: &str) -> Result<AgentLoopOutcome, KdError> {
        let thread_store = ThreadStore::new(self.paths.clone());
        let thread_id = kingdom_core::ThreadId::work(ticket_id);
        thread_store.create_or_resume_work_thread(&self.branch, ticket_id, now)?;

        let mut seen = thread_store.list(&self.branch, &thread_id)?.len();
        for iteration in 0..MAX_ITERATIONS {
            tracing::debug!(ticket = %ticket_id, iteration, "agent loop iteration");
            let prompt = self.build_prompt(ticket_id, seen)?;
            seen = thread_store.list(&self.branch, &thread_id)?.len();

            let response = query::query(&*self.adapter, &prompt, self.timeout, None, None, 0).await;
            if let Some(err) = &response.error {
                let (kind, detail) = err.split_once(':').map(|(k, d)| (k, d.trim())).unwrap_or((err.as_str(), ""));
                thread_store.append(
                    &self.branch,
                    &thread_id,
                    "assistant",
                    "king",
                    kingdom_core::thread::error_sentinel(kind, detail),
                    None,
                    now,
                )?;
                continue;
            }

            let completed = response.text.lines().any(|l| l.trim() == COMPLETE_SENTINEL);
            thread_store.append(&self.branch, &thread_id, "assistant", "king", response.text.clone(), None, now)?;

            if completed {
                let ticket_store = TicketStore::new(self.paths.clone());
                ticket_store.close(ticket_id.as_str())?;
                tracing::info!(ticket = %ticket_id, "agent loop completed");
                return Ok(AgentLoopOutcome::Completed);
            }
        }
        tracing::warn!(ticket = %ticket_id, max_iterations = MAX_ITERATIONS, "agent loop blocked, iteration budget exhausted");
        Ok(AgentLoopOutcome::Blocked)
    }
}

#[cfg(test)]
#[path = "agent_loop_tests.rs"]
mod tests;
