// SPDX-License-Identifier: MIT

//! The [`AgentSession`] entity (§3) — a long-lived per-(member, branch)
//! resume token, persisted at `sessions/<member>.json`.

use crate::session::SessionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSession {
    pub member: String,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub pid: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

impl AgentSession {
    pub fn new(member: impl Into<String>, created_at: impl Into<String>) -> Self {
        let created_at = created_at.into();
        Self {
            member: member.into(),
            session_id: None,
            pid: None,
            created_at: created_at.clone(),
            updated_at: created_at,
        }
    }

    /// Replace (never append) the session id on a subsequent turn.
    pub fn set_session_id(&mut self, session_id: SessionId, updated_at: impl Into<String>) {
        self.session_id = Some(session_id);
        self.updated_at = updated_at.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_session_id_replaces_not_appends() {
        let mut s = AgentSession::new("codex", "2026-01-01T00:00:00Z");
        s.set_session_id(SessionId::new("turn-1"), "2026-01-01T00:01:00Z");
        s.set_session_id(SessionId::new("turn-2"), "2026-01-01T00:02:00Z");
        assert_eq!(s.session_id.as_ref().unwrap().as_str(), "turn-2");
        assert_eq!(s.updated_at, "2026-01-01T00:02:00Z");
    }
}
