// SPDX-License-Identifier: MIT

//! The [`Branch`] entity (§3, §6.1) — a named workstream, persisted as
//! `state.json` under `.kd/branches/<normalized_name>/`.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a branch. "Done" is a state-field flip, never a
/// filesystem relocation — see [`crate::KdError`] and §4.10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchStatus {
    Active,
    Done,
}

impl BranchStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, BranchStatus::Done)
    }
}

/// A named workstream. `name` is the original human-provided string and is
/// never mutated; `normalized_name` is the filesystem-safe slug used for the
/// directory name and git branch name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub normalized_name: String,
    pub status: BranchStatus,
    #[serde(default)]
    pub design_approved: bool,
    /// Name of the active peasant session tied to this branch, if any.
    #[serde(default)]
    pub session: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub done_at: Option<String>,
}

impl Branch {
    pub fn new(name: impl Into<String>, normalized_name: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            normalized_name: normalized_name.into(),
            status: BranchStatus::Active,
            design_approved: false,
            session: None,
            created_at: created_at.into(),
            done_at: None,
        }
    }
}

crate::builder! {
    pub struct BranchBuilder => Branch {
        into {
            name: String = "feature-x",
            normalized_name: String = "feature-x",
            created_at: String = "2026-01-01T00:00:00Z",
        }
        set {
            status: BranchStatus = BranchStatus::Active,
            design_approved: bool = false,
        }
        option {
            session: String = None,
            done_at: String = None,
        }
    }
}

#[cfg(test)]
#[path = "branch_tests.rs"]
mod tests;
