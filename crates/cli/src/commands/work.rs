// SPDX-License-Identifier: MIT

//! `kd work <ticket>`: run the single-ticket execution harness directly.
//!
//! This is what [`kingdom_engine::Peasant::start`] re-invokes the current
//! binary with inside a worker's worktree (§4.8, §4.9) — it is also safe
//! to run by hand for a ticket in "hand" mode.

use crate::context::Context;
use crate::exit_error::ExitError;
use kingdom_core::TicketId;
use kingdom_engine::{AgentLoop, AgentLoopOutcome};
use std::time::Duration;

/// Backend driving the work harness. Mirrors
/// [`kingdom_engine::peasant::Peasant::start`]'s session bookkeeping, which
/// records every worker as a `"codex"` agent (§4.8) — work and peasant
/// sessions agree on one backend rather than letting each ticket pick its
/// own.
const WORK_BACKEND: &str = "codex";

pub async fn handle(ticket: &str, now: &str) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let branch = ctx.branch(None)?;
    let ticket_id: TicketId = ticket
        .parse()
        .map_err(|e: kingdom_core::id::InvalidTicketId| ExitError::new(1, e.to_string()))?;

    let registry = kingdom_adapters::registry::default_registry();
    let adapter = registry
        .get(WORK_BACKEND)
        .ok_or_else(|| ExitError::new(1, format!("no adapter registered for backend {WORK_BACKEND:?}")))?
        .clone();

    let timeout = Duration::from_secs(ctx.config.council.timeout);
    let harness = AgentLoop::new(ctx.paths.clone(), branch, adapter, timeout);
    match harness.run(&ticket_id, now).await? {
        AgentLoopOutcome::Completed => {
            println!("Ticket {ticket_id} completed");
            Ok(())
        }
        AgentLoopOutcome::Blocked => Err(ExitError::new(1, format!("ticket {ticket_id} blocked after exhausting iterations"))),
    }
}
