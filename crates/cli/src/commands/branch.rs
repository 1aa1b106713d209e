// SPDX-License-Identifier: MIT

//! `kd start <branch>`, `kd status`, `kd done` (§4.10).

use crate::color;
use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};
use kingdom_storage::BranchLifecycle;
use serde::Serialize;

pub fn start(branch: &str, now: &str) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let lifecycle = BranchLifecycle::new(ctx.paths.clone());
    let b = lifecycle.start(branch, now)?;
    println!("Started branch {} ({})", b.name, b.normalized_name);
    Ok(())
}

#[derive(Serialize)]
struct StatusView {
    branch: String,
    open: usize,
    in_progress: usize,
    closed: usize,
    peasant_sessions: Vec<String>,
}

pub fn status(branch: Option<&str>, format: OutputFormat) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let normalized = ctx.branch(branch)?;
    let lifecycle = BranchLifecycle::new(ctx.paths.clone());
    let summary = lifecycle.status(&normalized)?;
    let view = StatusView {
        branch: summary.branch.name.clone(),
        open: *summary.ticket_counts.get("open").unwrap_or(&0),
        in_progress: *summary.ticket_counts.get("in_progress").unwrap_or(&0),
        closed: *summary.ticket_counts.get("closed").unwrap_or(&0),
        peasant_sessions: summary.peasant_sessions,
    };
    format_or_json(format, &view, || {
        println!("{} {}", color::header("Branch:"), view.branch);
        println!(
            "{} {} open, {} in progress, {} closed",
            color::header("Tickets:"),
            view.open,
            view.in_progress,
            view.closed
        );
        if view.peasant_sessions.is_empty() {
            println!("{}", color::muted("No active peasant sessions"));
        } else {
            println!("{} {}", color::header("Peasant sessions:"), view.peasant_sessions.join(", "));
        }
    })
    .map_err(ExitError::from)
}

pub fn done(branch: Option<&str>, force: bool, now: &str) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let normalized = ctx.branch(branch)?;
    let lifecycle = BranchLifecycle::new(ctx.paths.clone());
    let b = lifecycle.done(&normalized, force, now)?;
    println!("Branch {} marked done", b.name);
    Ok(())
}
