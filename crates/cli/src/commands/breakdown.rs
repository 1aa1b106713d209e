// SPDX-License-Identifier: MIT

//! `kd breakdown`: print a ticket-breakdown prompt built from the current
//! branch's `design.md`. Prints only — the operator feeds this to a
//! council member or agent by hand; this command never parses a response
//! or creates tickets itself.

use crate::context::Context;
use crate::exit_error::ExitError;
use kingdom_core::file_store;

pub fn handle(branch: Option<&str>) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let normalized = ctx.branch(branch)?;
    let design = file_store::read_text(&ctx.paths.branch_design_path(&normalized))
        .map_err(kingdom_core::KdError::from)?
        .unwrap_or_default();

    if design.trim().is_empty() {
        return Err(ExitError::new(1, format!("no design.md found for branch {normalized}; write one first")));
    }

    println!(
        "Break the following design into independent tickets. For each ticket, emit a markdown block with \
         frontmatter `id` (leave blank, one will be generated), `status: open`, `type`, `priority` (1-3), and \
         `deps` (a bracketed list of sibling ticket titles this one depends on, if any), followed by the ticket \
         body.\n\n## Design\n\n{design}"
    );
    Ok(())
}
