// SPDX-License-Identifier: MIT

//! `kd`: the Kingdom CLI — King-facing commands over a repository-local
//! `.kd/` workflow store (§2, §4).

mod color;
mod commands;
mod context;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use commands::council::CouncilCommand;
use commands::peasant::PeasantCommand;
use commands::tk::TkCommand;
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "kd",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Kingdom: orchestrate AI coding agents through a feature's lifecycle",
    styles = color::styles()
)]
struct Cli {
    /// Render list/show output as JSON instead of text
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize `.kd/` in the current repository
    Init,
    /// Start (or resume) a branch's Kingdom workflow
    Start {
        branch: String,
    },
    /// Show the current (or given) branch's status
    Status {
        branch: Option<String>,
    },
    /// Mark the current (or given) branch done
    Done {
        branch: Option<String>,
        #[arg(long)]
        force: bool,
    },
    /// Print the breakdown prompt for the current branch's design
    Breakdown {
        #[arg(long)]
        branch: Option<String>,
    },
    /// Check the repository and agent backends for common problems
    Doctor,
    /// Run the single-ticket execution harness directly
    Work {
        ticket: String,
    },
    /// Plan or apply the legacy ticket-id migration
    Migrate {
        #[arg(long)]
        apply: bool,
    },
    /// Per-branch design document
    Design {
        #[command(subcommand)]
        command: DesignCommand,
    },
    /// Ask the council, watch responses, and manage its sessions
    Council(commands::council::CouncilArgs),
    /// Ticket CRUD and graph queries
    Tk(commands::tk::TkArgs),
    /// Supervise peasant worker sessions
    Peasant(commands::peasant::PeasantArgs),
}

#[derive(Subcommand, Debug)]
enum DesignCommand {
    /// Show the current (or given) branch's design.md
    Show { branch: Option<String> },
    /// Mark the current (or given) branch's design approved
    Approve { branch: Option<String> },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("KD_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {}", err.message);
        std::process::exit(err.code);
    }
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    let now = now_rfc3339();
    tracing::debug!(command = ?cli.command, "dispatching command");
    match cli.command {
        Command::Init => commands::init::handle(),
        Command::Start { branch } => commands::branch::start(&branch, &now),
        Command::Status { branch } => commands::branch::status(branch.as_deref(), cli.format),
        Command::Done { branch, force } => commands::branch::done(branch.as_deref(), force, &now),
        Command::Breakdown { branch } => commands::breakdown::handle(branch.as_deref()),
        Command::Doctor => commands::doctor::handle(),
        Command::Work { ticket } => commands::work::handle(&ticket, &now).await,
        Command::Migrate { apply } => commands::migrate::handle(apply),
        Command::Design { command } => match command {
            DesignCommand::Show { branch } => commands::design::show(branch.as_deref()),
            DesignCommand::Approve { branch } => commands::design::approve(branch.as_deref()),
        },
        Command::Council(args) => {
            let command: CouncilCommand = args.command;
            commands::council::handle(command, cli.format, &now).await
        }
        Command::Tk(args) => {
            let command: TkCommand = args.command;
            commands::tk::handle(command, cli.format, &now)
        }
        Command::Peasant(args) => {
            let command: PeasantCommand = args.command;
            commands::peasant::handle(command, cli.format, &now)
        }
    }
}
