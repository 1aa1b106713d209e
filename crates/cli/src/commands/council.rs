// SPDX-License-Identifier: MIT

//! `kd council ask|show|list|status|watch|retry|reset` (§4.6).

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, handle_list, OutputFormat};
use clap::{Args, Subcommand};
use kingdom_core::ThreadId;
use kingdom_engine::Council;
use kingdom_storage::ThreadStore;
use serde::Serialize;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct CouncilArgs {
    #[command(subcommand)]
    pub command: CouncilCommand,
}

#[derive(Subcommand, Debug)]
pub enum CouncilCommand {
    /// Ask the council (or specific members) a question
    Ask {
        /// Prompt text. `@name` mentions override `--to`.
        prompt: String,
        /// Target member name, or "all" (default: all configured members)
        #[arg(long)]
        to: Option<String>,
        /// Resume a specific thread rather than the branch's current one
        #[arg(long)]
        thread: Option<String>,
        /// Start a fresh thread instead of resuming the current one
        #[arg(long)]
        new_thread: bool,
    },
    /// Show every message in a council thread
    Show {
        thread: String,
    },
    /// List council threads for the current branch
    List {},
    /// One-shot check of who has responded to the latest question
    Status {
        thread: String,
    },
    /// Poll until every expected member has responded, or timeout elapses
    Watch {
        thread: String,
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },
    /// Reissue the last question to members who haven't responded (or errored)
    Retry {
        thread: String,
    },
    /// Clear stored session ids for members (or all)
    Reset {
        member: Vec<String>,
    },
}

#[derive(Serialize)]
struct AskView {
    thread: String,
    responded: Vec<String>,
    errored: Vec<String>,
}

pub async fn handle(command: CouncilCommand, format: OutputFormat, now: &str) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let branch = ctx.branch(None)?;
    let members = ctx.council_members()?;
    let council = Council::new(ctx.paths.clone(), branch.clone(), members, 2, ctx.config.council.auto_commit);

    match command {
        CouncilCommand::Ask { prompt, to, thread, new_thread } => {
            let thread_id = thread.map(ThreadId::new);
            let outcome = council.ask(&prompt, to.as_deref(), thread_id, new_thread, now).await?;
            let view = AskView { thread: outcome.thread_id.to_string(), responded: outcome.responded, errored: outcome.errored };
            format_or_json(format, &view, || {
                println!("Thread {}", view.thread);
                println!("Responded: {}", if view.responded.is_empty() { "-".into() } else { view.responded.join(", ") });
                if !view.errored.is_empty() {
                    println!("Errored: {}", view.errored.join(", "));
                }
            })?;
        }
        CouncilCommand::Show { thread } => {
            let store = ThreadStore::new(ctx.paths.clone());
            let thread_id = ThreadId::new(thread);
            let messages = store.list(&branch, &thread_id)?;
            handle_list(format, &messages, "No messages in this thread", |msgs, out| {
                for m in msgs {
                    let _ = writeln!(out, "[{:04}] {} -> {}: {}", m.sequence, m.from, m.to, first_line(&m.body));
                }
            })?;
        }
        CouncilCommand::List {} => {
            let dir = ctx.paths.branch_threads_dir(&branch);
            let mut names = Vec::new();
            if dir.exists() {
                for entry in std::fs::read_dir(&dir).map_err(|e| ExitError::new(1, e.to_string()))?.filter_map(|e| e.ok()) {
                    if let Some(name) = entry.file_name().to_str().map(str::to_string) {
                        if name.starts_with("council-") {
                            names.push(name);
                        }
                    }
                }
            }
            names.sort();
            handle_list(format, &names, "No council threads yet", |items, out| {
                for n in items {
                    let _ = writeln!(out, "{n}");
                }
            })?;
        }
        CouncilCommand::Status { thread } => {
            let store = ThreadStore::new(ctx.paths.clone());
            let thread_id = ThreadId::new(thread);
            let meta = store.meta(&branch, &thread_id)?;
            let outcome = council.watch(&thread_id, &meta.members, Duration::from_secs(0)).await?;
            print_watch(&outcome, format)?;
        }
        CouncilCommand::Watch { thread, timeout_secs } => {
            let store = ThreadStore::new(ctx.paths.clone());
            let thread_id = ThreadId::new(thread);
            let meta = store.meta(&branch, &thread_id)?;
            let outcome = council.watch(&thread_id, &meta.members, Duration::from_secs(timeout_secs)).await?;
            print_watch(&outcome, format)?;
        }
        CouncilCommand::Retry { thread } => {
            let thread_id = ThreadId::new(thread);
            let outcome = council.retry(&thread_id, now).await?;
            let view = AskView { thread: outcome.thread_id.to_string(), responded: outcome.responded, errored: outcome.errored };
            format_or_json(format, &view, || {
                println!("Retried thread {}: {} responded, {} errored", view.thread, view.responded.len(), view.errored.len());
            })?;
        }
        CouncilCommand::Reset { member } => {
            let names = if member.is_empty() { None } else { Some(member) };
            council.reset(names.as_deref())?;
            println!("Council session(s) reset");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct WatchView {
    completed: Vec<String>,
    pending: Vec<String>,
}

fn print_watch(outcome: &kingdom_engine::WatchOutcome, format: OutputFormat) -> Result<(), ExitError> {
    let view = WatchView { completed: outcome.completed.clone(), pending: outcome.pending.clone() };
    format_or_json(format, &view, || {
        println!("Completed: {}", if view.completed.is_empty() { "-".into() } else { view.completed.join(", ") });
        println!("Pending: {}", if view.pending.is_empty() { "-".into() } else { view.pending.join(", ") });
        for (name, preview) in &outcome.previews {
            if !preview.is_empty() {
                println!("\n[{name}]\n{}", first_line(preview));
            }
        }
    })
    .map_err(ExitError::from)
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}
