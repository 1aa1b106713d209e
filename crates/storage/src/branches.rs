// SPDX-License-Identifier: MIT

//! Shared branch-state read/write helpers used by both
//! [`crate::branch_lifecycle`] and [`crate::ticket_store`] (which needs to
//! know which branches are "done" to filter default ticket lookups, §4.7).

use crate::paths::KdPaths;
use kingdom_core::{Branch, KdError};

pub fn list_branch_names(paths: &KdPaths) -> Result<Vec<String>, KdError> {
    let dir = paths.branches_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

pub fn read_branch(paths: &KdPaths, normalized_name: &str) -> Result<Branch, KdError> {
    let path = paths.branch_state_path(normalized_name);
    kingdom_core::file_store::read_json(&path)?
        .ok_or_else(|| KdError::NotFound(format!("branch {normalized_name}")))
}

pub fn write_branch(paths: &KdPaths, branch: &Branch) -> Result<(), KdError> {
    let path = paths.branch_state_path(&branch.normalized_name);
    kingdom_core::file_store::write_json(&path, branch)?;
    Ok(())
}

/// All branch names, optionally including "done" branches (§4.10: listing
/// commands filter out done branches by default).
pub fn list_branches(paths: &KdPaths, include_done: bool) -> Result<Vec<Branch>, KdError> {
    let mut branches = Vec::new();
    for name in list_branch_names(paths)? {
        let branch = read_branch(paths, &name)?;
        if include_done || !branch.status.is_done() {
            branches.push(branch);
        }
    }
    Ok(branches)
}
