// SPDX-License-Identifier: MIT

//! `kd tk list|show|create|start|close|reopen|move|edit|ready|pull|dep|undep|assign|unassign` (§4.7).

use crate::color;
use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, handle_list, OutputFormat};
use clap::{Args, Subcommand};
use kingdom_core::{Ticket, TicketType};
use kingdom_storage::ticket_store::{Located, TicketScope};
use kingdom_storage::TicketStore;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct TkArgs {
    #[command(subcommand)]
    pub command: TkCommand,
}

#[derive(Subcommand, Debug)]
pub enum TkCommand {
    /// List tickets in the current branch (or the backlog, with --backlog)
    List {
        #[arg(long)]
        backlog: bool,
    },
    /// Show a single ticket by id prefix
    Show { id: String },
    /// Create a new ticket in the backlog or the current branch
    Create {
        title: String,
        #[arg(long, default_value = "task")]
        r#type: String,
        #[arg(long, default_value_t = 2)]
        priority: u8,
        #[arg(long)]
        backlog: bool,
        #[arg(long = "dep")]
        deps: Vec<String>,
    },
    /// Mark a ticket in_progress
    Start { id: String },
    /// Close a ticket
    Close { id: String },
    /// Reopen a closed or in-progress ticket back to open
    Reopen { id: String },
    /// Move a ticket's file into a different branch's tickets/
    Move { id: String, target_branch: String },
    /// Open a ticket's file in $EDITOR
    Edit { id: String },
    /// List tickets in the current branch that are open with every dep closed
    Ready {},
    /// Pull a ticket from the backlog into the current branch
    Pull { id: String },
    /// Add a dependency
    Dep { id: String, dep: String },
    /// Remove a dependency
    Undep { id: String, dep: String },
    /// Assign a ticket to a peasant/agent name
    Assign { id: String, assignee: String },
    /// Clear a ticket's assignee
    Unassign { id: String },
}

#[derive(Serialize)]
struct TicketView {
    id: String,
    status: &'static str,
    #[serde(rename = "type")]
    ticket_type: &'static str,
    priority: u8,
    deps: Vec<String>,
    assignee: Option<String>,
    title: String,
}

impl From<&Ticket> for TicketView {
    fn from(t: &Ticket) -> Self {
        Self {
            id: t.id.to_string(),
            status: t.status.as_str(),
            ticket_type: t.ticket_type.as_str(),
            priority: t.priority,
            deps: t.deps.iter().map(|d| d.to_string()).collect(),
            assignee: t.assignee.clone(),
            title: t.title.clone(),
        }
    }
}

fn print_ticket_line(v: &TicketView, out: &mut dyn std::io::Write) {
    let deps = if v.deps.is_empty() { String::new() } else { color::muted(&format!(" deps=[{}]", v.deps.join(","))) };
    let assignee = v.assignee.as_deref().map(|a| format!(" @{a}")).unwrap_or_default();
    let _ = writeln!(
        out,
        "{} {}{assignee}{deps} {}",
        color::literal(&v.id),
        color::context(&format!("[{}] ({}, p{})", v.status, v.ticket_type, v.priority)),
        v.title
    );
}

pub fn handle(command: TkCommand, format: OutputFormat, now: &str) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let store = TicketStore::new(ctx.paths.clone());

    match command {
        TkCommand::List { backlog } => {
            let dir = if backlog { ctx.paths.backlog_tickets_dir() } else { ctx.paths.branch_tickets_dir(&ctx.branch(None)?) };
            let tickets = read_dir_tickets(&dir)?;
            let views: Vec<TicketView> = tickets.iter().map(TicketView::from).collect();
            handle_list(format, &views, "No tickets", |items, out| {
                for v in items {
                    print_ticket_line(v, out);
                }
            })?;
        }
        TkCommand::Show { id } => {
            let Located { ticket, scope, .. } = store.find(&id)?;
            let view = TicketView::from(&ticket);
            format_or_json(format, &view, || {
                print_ticket_line(&view, &mut std::io::stdout());
                println!("scope: {}", describe_scope(&scope));
                if !ticket.body.trim().is_empty() {
                    println!("\n{}", ticket.body);
                }
            })?;
        }
        TkCommand::Create { title, r#type, priority, backlog, deps } => {
            let ticket_type = TicketType::parse(&r#type)
                .ok_or_else(|| ExitError::new(1, format!("unknown ticket type {type_:?}", type_ = r#type)))?;
            let scope = if backlog { TicketScope::Backlog } else { TicketScope::Branch(ctx.branch(None)?) };
            let mut dep_ids = Vec::new();
            for d in &deps {
                dep_ids.push(store.find(d)?.ticket.id);
            }
            let ticket = store.create(scope, title, ticket_type, priority, dep_ids, now)?;
            println!("Created ticket {}", ticket.id);
        }
        TkCommand::Start { id } => {
            let t = store.start(&id)?;
            println!("Ticket {} started", t.id);
        }
        TkCommand::Close { id } => {
            let t = store.close(&id)?;
            println!("Ticket {} closed", t.id);
        }
        TkCommand::Reopen { id } => {
            let t = store.reopen(&id)?;
            println!("Ticket {} reopened", t.id);
        }
        TkCommand::Move { id, target_branch } => {
            let t = store.move_ticket(&id, &target_branch)?;
            println!("Ticket {} moved to branch {}", t.id, target_branch);
        }
        TkCommand::Edit { id } => {
            let Located { path, .. } = store.find(&id)?;
            run_editor(&path)?;
        }
        TkCommand::Ready {} => {
            let branch = ctx.branch(None)?;
            let tickets = store.ready(&branch)?;
            let views: Vec<TicketView> = tickets.iter().map(TicketView::from).collect();
            handle_list(format, &views, "No ready tickets", |items, out| {
                for v in items {
                    print_ticket_line(v, out);
                }
            })?;
        }
        TkCommand::Pull { id } => {
            let branch = ctx.branch(None)?;
            let t = store.move_ticket(&id, &branch)?;
            println!("Pulled ticket {} into branch {}", t.id, branch);
        }
        TkCommand::Dep { id, dep } => {
            let t = store.add_dep(&id, &dep)?;
            println!("Ticket {} now depends on {}", t.id, dep);
        }
        TkCommand::Undep { id, dep } => {
            let t = store.remove_dep(&id, &dep)?;
            println!("Ticket {} no longer depends on {}", t.id, dep);
        }
        TkCommand::Assign { id, assignee } => {
            let t = store.assign(&id, &assignee)?;
            println!("Ticket {} assigned to {}", t.id, assignee);
        }
        TkCommand::Unassign { id } => {
            let t = store.unassign(&id)?;
            println!("Ticket {} unassigned", t.id);
        }
    }
    Ok(())
}

fn describe_scope(scope: &TicketScope) -> String {
    match scope {
        TicketScope::Backlog => "backlog".to_string(),
        TicketScope::Branch(name) => format!("branch {name}"),
    }
}

fn read_dir_tickets(dir: &std::path::Path) -> Result<Vec<Ticket>, ExitError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| ExitError::new(1, e.to_string()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
        .collect();
    files.sort();
    let mut tickets = Vec::with_capacity(files.len());
    for path in files {
        let text = kingdom_core::file_store::read_text(&path)
            .map_err(|e| ExitError::new(1, e.to_string()))?
            .ok_or_else(|| ExitError::new(1, format!("{} disappeared while listing", path.display())))?;
        tickets.push(Ticket::from_markdown(&text).map_err(|e| ExitError::new(1, e.to_string()))?);
    }
    Ok(tickets)
}

/// Invoke `$EDITOR` on `path`, shell-splitting the variable so values like
/// `code --wait` work (§6.7).
fn run_editor(path: &std::path::Path) -> Result<(), ExitError> {
    let editor = std::env::var("EDITOR").map_err(|_| ExitError::new(1, "$EDITOR is not set"))?;
    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or_else(|| ExitError::new(1, "$EDITOR is empty"))?;
    let status = std::process::Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| ExitError::new(1, format!("failed to launch $EDITOR: {e}")))?;
    if !status.success() {
        return Err(ExitError::new(1, format!("$EDITOR exited with status {status}")));
    }
    Ok(())
}
