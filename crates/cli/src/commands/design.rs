// SPDX-License-Identifier: MIT

//! `kd design show|approve`: read/flip the per-branch `design.md` and its
//! approval flag.

use crate::context::Context;
use crate::exit_error::ExitError;
use kingdom_core::file_store;
use kingdom_storage::branches;

pub fn show(branch: Option<&str>) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let normalized = ctx.branch(branch)?;
    let b = branches::read_branch(&ctx.paths, &normalized)?;
    let path = ctx.paths.branch_design_path(&normalized);
    match file_store::read_text(&path).map_err(kingdom_core::KdError::from)? {
        Some(text) => print!("{text}"),
        None => println!("No design.md yet for branch {normalized}"),
    }
    println!(
        "\n[design {}]",
        if b.design_approved { "approved" } else { "pending approval" }
    );
    Ok(())
}

pub fn approve(branch: Option<&str>) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let normalized = ctx.branch(branch)?;
    let mut b = branches::read_branch(&ctx.paths, &normalized)?;
    b.design_approved = true;
    branches::write_branch(&ctx.paths, &b)?;
    println!("Design approved for branch {normalized}");
    Ok(())
}
