// SPDX-License-Identifier: MIT

//! `kd doctor`: a quick repository/environment health check — `.kd/`
//! presence, config validity, and whether each configured backend's CLI is
//! on `PATH`.

use crate::context::Context;
use crate::exit_error::ExitError;

fn binary_for_backend(backend: &str) -> Option<&'static str> {
    match backend {
        "claude" => Some("claude"),
        "codex" => Some("codex"),
        "cursor" => Some("cursor-agent"),
        _ => None,
    }
}

fn on_path(binary: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(binary).is_file()))
        .unwrap_or(false)
}

pub fn handle() -> Result<(), ExitError> {
    let mut problems = Vec::new();

    let ctx = match Context::load() {
        Ok(ctx) => ctx,
        Err(e) => {
            println!("✗ {}", e.message);
            return Err(e);
        }
    };
    println!("✓ repository root: {}", ctx.paths.root().display());
    println!("✓ config valid ({} council member(s))", ctx.config.council.members.len());

    if !kingdom_storage::git::is_git_repo(ctx.paths.root()) {
        problems.push("not a git work tree — worktree-mode peasants and ticket moves will fail".to_string());
    } else {
        println!("✓ git work tree detected");
    }

    for member in &ctx.config.council.members {
        match binary_for_backend(&member.backend) {
            Some(bin) if on_path(bin) => println!("✓ backend {:?} ({bin}) found on PATH", member.name),
            Some(bin) => problems.push(format!("backend {:?} ({bin}) not found on PATH", member.name)),
            None => problems.push(format!("member {:?} has unknown backend {:?}", member.name, member.backend)),
        }
    }

    if problems.is_empty() {
        println!("\nNo problems found.");
        Ok(())
    } else {
        for p in &problems {
            println!("✗ {p}");
        }
        Err(ExitError::new(1, format!("{} problem(s) found", problems.len())))
    }
}
