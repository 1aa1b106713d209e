// SPDX-License-Identifier: MIT

//! `kd peasant start|status|logs|stop|clean|sync|msg|read|review` (§4.8).

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, handle_list, OutputFormat};
use clap::{Args, Subcommand, ValueEnum};
use kingdom_core::PeasantMode;
use kingdom_engine::Peasant;
use kingdom_storage::ThreadStore;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct PeasantArgs {
    #[command(subcommand)]
    pub command: PeasantCommand,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum ModeArg {
    Worktree,
    Hand,
}

impl From<ModeArg> for PeasantMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Worktree => PeasantMode::Worktree,
            ModeArg::Hand => PeasantMode::Hand,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum PeasantCommand {
    /// Spawn a detached worker on a ticket
    Start {
        ticket: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Worktree)]
        mode: ModeArg,
        /// Do not auto-pull the ticket out of the backlog first
        #[arg(long)]
        no_pull: bool,
    },
    /// List recorded sessions and their liveness
    Status {},
    /// Print a session's work thread
    Logs { session: String },
    /// Terminate a session's worker process
    Stop { session: String },
    /// Remove a session's record (and worktree)
    Clean { session: String },
    /// Pull upstream changes into a worktree-mode session's checkout
    Sync { session: String },
    /// Send a message into a session's work thread
    Msg { session: String, body: String },
    /// Print a session's full work thread
    Read { session: String },
    /// Review a session's latest work, optionally relaunching on rejection
    Review {
        session: String,
        #[arg(long)]
        reject: bool,
    },
}

#[derive(Serialize)]
struct SessionView {
    name: String,
    ticket: String,
    mode: &'static str,
    pid: u32,
    alive: bool,
    started_at: String,
}

fn mode_str(mode: PeasantMode) -> &'static str {
    match mode {
        PeasantMode::Worktree => "worktree",
        PeasantMode::Hand => "hand",
    }
}

pub fn handle(command: PeasantCommand, format: OutputFormat, now: &str) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let branch = ctx.branch(None)?;
    let peasant = Peasant::new(ctx.paths.clone(), branch.clone());

    match command {
        PeasantCommand::Start { ticket, mode, no_pull } => {
            let session = peasant.start(&ticket, mode.into(), !no_pull, now)?;
            println!("Started peasant session {} (pid {}) for ticket {}", session.name, session.pid, session.ticket_id);
        }
        PeasantCommand::Status {} => {
            let statuses = peasant.status()?;
            let views: Vec<SessionView> = statuses
                .iter()
                .map(|s| SessionView {
                    name: s.session.name.clone(),
                    ticket: s.session.ticket_id.to_string(),
                    mode: mode_str(s.session.mode),
                    pid: s.session.pid,
                    alive: s.alive,
                    started_at: s.session.started_at.clone(),
                })
                .collect();
            handle_list(format, &views, "No peasant sessions", |items, out| {
                for v in items {
                    let _ = writeln!(
                        out,
                        "{} [{}] ticket={} pid={} {}",
                        v.name,
                        if v.alive { "alive" } else { "dead" },
                        v.ticket,
                        v.pid,
                        v.mode
                    );
                }
            })?;
        }
        PeasantCommand::Logs { session } | PeasantCommand::Read { session } => {
            print_thread(&ctx, &branch, &peasant, &session, format)?;
        }
        PeasantCommand::Stop { session } => {
            peasant.stop(&session)?;
            println!("Stopped session {session}");
        }
        PeasantCommand::Clean { session } => {
            peasant.clean(&session)?;
            println!("Cleaned session {session}");
        }
        PeasantCommand::Sync { session } => {
            peasant.sync(&session)?;
            println!("Synced session {session}");
        }
        PeasantCommand::Msg { session, body } => {
            peasant.msg(&session, &body, now)?;
            println!("Message sent to session {session}");
        }
        PeasantCommand::Review { session, reject } => {
            if reject {
                let relaunched = peasant.review_reject(&session, now)?;
                println!("Rejected — relaunched session {} (pid {})", relaunched.name, relaunched.pid);
            } else {
                print_thread(&ctx, &branch, &peasant, &session, format)?;
            }
        }
    }
    Ok(())
}

fn print_thread(ctx: &Context, branch: &str, peasant: &Peasant, session_name: &str, format: OutputFormat) -> Result<(), ExitError> {
    let statuses = peasant.status()?;
    let session = statuses
        .into_iter()
        .map(|s| s.session)
        .find(|s| s.name == session_name)
        .ok_or_else(|| ExitError::new(2, format!("no peasant session named {session_name:?}")))?;
    let store = ThreadStore::new(ctx.paths.clone());
    let messages = store.list(branch, &session.thread_id)?;
    handle_list(format, &messages, "No messages yet", |msgs, out| {
        for m in msgs {
            let _ = writeln!(out, "[{:04}] {} -> {}:\n{}\n", m.sequence, m.from, m.to, m.body);
        }
    })?;
    Ok(())
}
