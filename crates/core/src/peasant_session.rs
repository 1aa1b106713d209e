// SPDX-License-Identifier: MIT

//! The [`PeasantSession`] entity (§3, §4.8) — a record of one live
//! detached worker process.

use crate::id::TicketId;
use crate::thread::ThreadId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeasantMode {
    Worktree,
    Hand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeasantSession {
    pub name: String,
    pub ticket_id: TicketId,
    pub agent: String,
    pub mode: PeasantMode,
    pub worktree_path: PathBuf,
    pub thread_id: ThreadId,
    pub pid: u32,
    pub started_at: String,
}

impl PeasantSession {
    /// Session name convention: `peasant-<ticket>` in worktree mode,
    /// `hand-<ticket>` in hand mode (§3, §4.8).
    pub fn session_name(ticket: &TicketId, mode: PeasantMode) -> String {
        match mode {
            PeasantMode::Worktree => format!("peasant-{ticket}"),
            PeasantMode::Hand => format!("hand-{ticket}"),
        }
    }

    pub fn is_hand(&self) -> bool {
        matches!(self.mode, PeasantMode::Hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_name_follows_mode_convention() {
        let t: TicketId = "a1b2".parse().unwrap();
        assert_eq!(PeasantSession::session_name(&t, PeasantMode::Worktree), "peasant-a1b2");
        assert_eq!(PeasantSession::session_name(&t, PeasantMode::Hand), "hand-a1b2");
    }
}
