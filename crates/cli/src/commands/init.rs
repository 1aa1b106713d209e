// SPDX-License-Identifier: MIT

//! `kd init`: create the `.kd/` skeleton if absent (§4.10).

use crate::exit_error::ExitError;
use kingdom_storage::{BranchLifecycle, KdPaths};

pub fn handle() -> Result<(), ExitError> {
    let cwd = std::env::current_dir().map_err(|e| ExitError::new(1, e.to_string()))?;
    let paths = KdPaths::new(cwd);
    BranchLifecycle::new(paths.clone()).init()?;
    println!("Initialized .kd/ at {}", paths.kd_dir().display());
    Ok(())
}
