// SPDX-License-Identifier: MIT

//! `kd migrate ticket-ids [--apply]`: rewrite legacy `kin-xxxx` ticket ids
//! to bare 4-hex ids across the whole repo (§4.7 Migration).
//!
//! Dry-run by default: prints the plan without touching anything. `--apply`
//! performs the rewrites after the same collision check.

use crate::context::Context;
use crate::exit_error::ExitError;
use kingdom_storage::TicketStore;

pub fn handle(apply: bool) -> Result<(), ExitError> {
    let ctx = Context::load()?;
    let store = TicketStore::new(ctx.paths.clone());
    let plan = store.plan_migration()?;

    if plan.steps.is_empty() {
        println!("Nothing to migrate.");
        return Ok(());
    }

    for step in &plan.steps {
        println!("{} -> {}", step.old_id, step.new_id);
    }

    if apply {
        store.apply_migration(&plan)?;
        println!("\nMigrated {} ticket(s).", plan.steps.len());
    } else {
        println!("\n{} ticket(s) would be migrated. Re-run with --apply to perform the rewrite.", plan.steps.len());
    }
    Ok(())
}
