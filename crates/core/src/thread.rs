// SPDX-License-Identifier: MIT

//! Thread and thread-message entities (§3, §6.4, §6.5) — an ordered,
//! append-only conversation, one file per message, sequenced by a 4-digit
//! filename prefix.

use crate::parsing::{Document, ParseError, Value};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A thread identifier: either `council-<4hex>` or `<ticket-id>-work`.
/// Kept as an opaque string rather than a parsed variant enum, since
/// nothing downstream needs to distinguish the two shapes structurally —
/// both resolve to the same directory-naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn council(suffix: impl fmt::Display) -> Self {
        Self(format!("council-{suffix}"))
    }

    pub fn work(ticket: impl fmt::Display) -> Self {
        Self(format!("{ticket}-work"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ThreadId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadKind {
    Council,
    Work,
}

/// `thread.json` contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMeta {
    pub members: Vec<String>,
    pub kind: ThreadKind,
    pub created_at: String,
}

/// One message envelope: `NNNN-<from>.md`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub sequence: u32,
    pub from: String,
    pub to: String,
    pub timestamp: String,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub completed: bool,
    pub body: String,
}

impl ThreadMessage {
    pub fn filename(&self) -> String {
        format!("{:04}-{}.md", self.sequence, self.from)
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new(self.body.clone());
        doc.set("from", self.from.clone());
        doc.set("to", self.to.clone());
        doc.set("timestamp", self.timestamp.clone());
        doc.set("sequence", self.sequence as i64);
        if self.error {
            doc.set("error", true);
        }
        if self.completed {
            doc.set("completed", true);
        }
        doc
    }

    pub fn from_document(doc: &Document) -> Result<Self, ThreadMessageError> {
        let from = doc.get_str("from").ok_or(ThreadMessageError::MissingField("from"))?.to_string();
        let to = doc.get_str("to").ok_or(ThreadMessageError::MissingField("to"))?.to_string();
        let timestamp =
            doc.get_str("timestamp").ok_or(ThreadMessageError::MissingField("timestamp"))?.to_string();
        let sequence = doc
            .get("sequence")
            .and_then(Value::as_int)
            .ok_or(ThreadMessageError::MissingField("sequence"))? as u32;
        let error = doc.get("error").and_then(Value::as_bool).unwrap_or(false);
        let completed = doc.get("completed").and_then(Value::as_bool).unwrap_or(false);
        Ok(ThreadMessage { sequence, from, to, timestamp, error, completed, body: doc.body.clone() })
    }

    /// Whether this message's body is the canonical error sentinel
    /// (`*Error: <kind>: <detail>*`) — the load-bearing marker retry logic
    /// and status classification match on (§6.5). Independent of the
    /// `error` frontmatter flag, which some call sites set redundantly.
    pub fn is_error_sentinel(&self) -> bool {
        error_kind(&self.body).is_some() || self.error
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThreadMessageError {
    #[error("frontmatter parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("missing required field {0:?}")]
    MissingField(&'static str),
}

/// Render the canonical error sentinel body: `*Error: <kind>: <detail>*`.
pub fn error_sentinel(kind: &str, detail: &str) -> String {
    format!("*Error: {kind}: {detail}*")
}

/// Render the canonical empty-response sentinel body.
pub fn empty_sentinel(member: &str) -> String {
    format!("*Empty response from {member}*")
}

/// Parse `*Error: <kind>: <detail>*` back into `(kind, detail)`, if `body`
/// is exactly that shape.
pub fn error_kind(body: &str) -> Option<(&str, &str)> {
    let inner = body.strip_prefix("*Error: ")?.strip_suffix('*')?;
    inner.split_once(": ")
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod tests;
