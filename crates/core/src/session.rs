// SPDX-License-Identifier: MIT

//! Session identifier type for agent backend resume tokens (§3 `AgentSession`).
//!
//! A `SessionId` is the opaque resume token a backend CLI (Claude, Codex,
//! Cursor, ...) mints on its first reply to a member and returns again on
//! every subsequent turn. Kingdom persists it per `(member, branch)` so a
//! later `council ask`/`retry` can pass it back via the adapter's resume
//! flag and continue that backend's own multi-turn context — it names
//! nothing about how the backend executes the process on its end.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque resume token for one council member's backend session.
///
/// Minted by the backend (not by Kingdom) on first use and replaced, never
/// appended, on every later turn (§3 `AgentSession` lifecycle).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a new SessionId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this SessionId.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for SessionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SessionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
