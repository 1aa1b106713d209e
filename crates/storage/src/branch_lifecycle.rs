// SPDX-License-Identifier: MIT

//! Branch lifecycle operations (§4.10): `init`, `start`, `status`, `done`.
//!
//! "Done" is a state-field flip on `Branch`, never a filesystem move — closed
//! branches keep their directory and tickets in place, just filtered out of
//! default listings (see [`crate::branches::list_branches`]).

use crate::branches;
use crate::git;
use crate::paths::KdPaths;
use kingdom_core::{branch_slug, Branch, KdError, TicketStatus};
use std::collections::HashMap;

pub struct BranchLifecycle {
    paths: KdPaths,
}

/// Summary returned by [`BranchLifecycle::status`].
#[derive(Debug)]
pub struct BranchStatusSummary {
    pub branch: Branch,
    pub ticket_counts: HashMap<&'static str, usize>,
    pub peasant_sessions: Vec<String>,
}

impl BranchLifecycle {
    pub fn new(paths: KdPaths) -> Self {
        Self { paths }
    }

    /// Create the `.kd/` skeleton (backlog + archive directories) if absent.
    /// Idempotent: calling `init` on an already-initialized repo is a no-op.
    pub fn init(&self) -> Result<(), KdError> {
        std::fs::create_dir_all(self.paths.backlog_tickets_dir())?;
        std::fs::create_dir_all(self.paths.archive_tickets_dir())?;
        std::fs::create_dir_all(self.paths.branches_dir())?;
        Ok(())
    }

    /// Normalize `name` and create its branch directory and `state.json` if
    /// they don't already exist. Calling `start` again on an existing,
    /// still-active branch just returns the existing record (§4.10
    /// idempotence); calling it on a "done" branch reactivates it.
    pub fn start(&self, name: &str, now: &str) -> Result<Branch, KdError> {
        let normalized = branch_slug::normalize(name)?;
        std::fs::create_dir_all(self.paths.branch_tickets_dir(&normalized))?;
        std::fs::create_dir_all(self.paths.branch_threads_dir(&normalized))?;
        std::fs::create_dir_all(self.paths.branch_sessions_dir(&normalized))?;
        std::fs::create_dir_all(self.paths.branch_worktrees_dir(&normalized))?;

        match branches::read_branch(&self.paths, &normalized) {
            Ok(mut existing) => {
                if existing.status.is_done() {
                    existing.status = kingdom_core::BranchStatus::Active;
                    existing.done_at = None;
                    branches::write_branch(&self.paths, &existing)?;
                }
                Ok(existing)
            }
            Err(KdError::NotFound(_)) => {
                let branch = Branch::new(name, &normalized, now);
                branches::write_branch(&self.paths, &branch)?;
                tracing::info!(branch = %normalized, "started branch");
                Ok(branch)
            }
            Err(e) => Err(e),
        }
    }

    pub fn status(&self, normalized_name: &str) -> Result<BranchStatusSummary, KdError> {
        let branch = branches::read_branch(&self.paths, normalized_name)?;
        let dir = self.paths.branch_tickets_dir(normalized_name);
        let mut ticket_counts = HashMap::from([("open", 0), ("in_progress", 0), ("closed", 0)]);
        for ticket in crate::ticket_store::read_all(&dir)? {
            let key = match ticket.status {
                TicketStatus::Open => "open",
                TicketStatus::InProgress => "in_progress",
                TicketStatus::Closed => "closed",
            };
            *ticket_counts.entry(key).or_insert(0) += 1;
        }

        let peasants_dir = self.paths.branch_peasants_dir(normalized_name);
        let mut peasant_sessions = Vec::new();
        if peasants_dir.exists() {
            for entry in std::fs::read_dir(&peasants_dir)?.filter_map(|e| e.ok()) {
                if let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) {
                    peasant_sessions.push(stem.to_string());
                }
            }
            peasant_sessions.sort();
        }

        Ok(BranchStatusSummary { branch, ticket_counts, peasant_sessions })
    }

    /// Flip a branch's status to done, clear its active session pointer, and
    /// remove any worktrees still checked out under it. Refuses unless
    /// `force` is set if any ticket in the branch is still open or
    /// in-progress. Never moves files or relocates tickets (§4.10).
    pub fn done(&self, normalized_name: &str, force: bool, now: &str) -> Result<Branch, KdError> {
        let dir = self.paths.branch_tickets_dir(normalized_name);
        let open_count = crate::ticket_store::read_all(&dir)?
            .iter()
            .filter(|t| t.status != TicketStatus::Closed)
            .count();
        if open_count > 0 && !force {
            return Err(KdError::Conflict(format!(
                "{open_count} ticket(s) still open or in progress in {normalized_name}; use --force to close anyway"
            )));
        }

        let mut branch = branches::read_branch(&self.paths, normalized_name)?;
        branch.status = kingdom_core::BranchStatus::Done;
        branch.done_at = Some(now.to_string());
        branch.session = None;
        branches::write_branch(&self.paths, &branch)?;

        let worktrees_dir = self.paths.branch_worktrees_dir(normalized_name);
        if worktrees_dir.exists() {
            for entry in std::fs::read_dir(&worktrees_dir)?.filter_map(|e| e.ok()) {
                let _ = git::worktree_remove(self.paths.root(), &entry.path());
            }
        }

        tracing::info!(branch = %normalized_name, forced = force, "branch marked done");
        Ok(branch)
    }
}

#[cfg(test)]
#[path = "branch_lifecycle_tests.rs"]
mod tests;
