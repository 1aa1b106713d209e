// SPDX-License-Identifier: MIT

//! The [`Ticket`] entity (§3, §6.3) — a markdown-with-frontmatter file, one
//! per ticket, stored as `<id>.md` under a branch's `tickets/` directory or
//! under `backlog/tickets/`.

use crate::id::TicketId;
use crate::parsing::{Document, ParseError, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Task,
    Bug,
    Feature,
    Chore,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Task => "task",
            TicketType::Bug => "bug",
            TicketType::Feature => "feature",
            TicketType::Chore => "chore",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "task" => Some(Self::Task),
            "bug" => Some(Self::Bug),
            "feature" => Some(Self::Feature),
            "chore" => Some(Self::Chore),
            _ => None,
        }
    }
}

/// A unit of work. `deps` is an ordered, duplicate-forbidding set of ticket
/// ids; `body` is the markdown after the title heading (description,
/// acceptance criteria, optional worklog).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub status: TicketStatus,
    pub ticket_type: TicketType,
    pub priority: u8,
    #[serde(default)]
    pub deps: Vec<TicketId>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    pub created_at: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Error raised converting a parsed [`Document`] into a [`Ticket`].
#[derive(Debug, thiserror::Error)]
pub enum TicketDocError {
    #[error("frontmatter parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("missing required field {0:?}")]
    MissingField(&'static str),

    #[error("invalid ticket id: {0}")]
    InvalidId(#[from] crate::id::InvalidTicketId),

    #[error("invalid status {0:?}")]
    InvalidStatus(String),

    #[error("invalid type {0:?}")]
    InvalidType(String),

    #[error("missing title heading (expected a line starting with `# `)")]
    MissingTitle,
}

impl Ticket {
    /// Render as a markdown-with-frontmatter document. Field order matches
    /// §6.3: id, status, deps, links, created, type, priority, assignee.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new(format!("# {}\n\n{}", self.title, self.body));
        doc.set("id", self.id.as_str());
        doc.set("status", self.status.as_str());
        doc.set("deps", self.deps.iter().map(|d| d.as_str().to_string()).collect::<Vec<_>>());
        doc.set("links", self.links.clone());
        doc.set("created", self.created_at.clone());
        doc.set("type", self.ticket_type.as_str());
        doc.set("priority", self.priority as i64);
        if let Some(assignee) = &self.assignee {
            doc.set("assignee", assignee.clone());
        }
        doc
    }

    pub fn to_markdown(&self) -> String {
        crate::parsing::emit(&self.to_document())
    }

    /// Parse a ticket from its markdown-with-frontmatter source text.
    pub fn from_markdown(input: &str) -> Result<Self, TicketDocError> {
        let doc = crate::parsing::parse(input)?;
        Self::from_document(&doc)
    }

    pub fn from_document(doc: &Document) -> Result<Self, TicketDocError> {
        let id_str = doc.get_str("id").ok_or(TicketDocError::MissingField("id"))?;
        let id: TicketId = id_str.parse()?;

        let status_str = doc.get_str("status").ok_or(TicketDocError::MissingField("status"))?;
        let status = TicketStatus::parse(status_str)
            .ok_or_else(|| TicketDocError::InvalidStatus(status_str.to_string()))?;

        let type_str = doc.get_str("type").ok_or(TicketDocError::MissingField("type"))?;
        let ticket_type =
            TicketType::parse(type_str).ok_or_else(|| TicketDocError::InvalidType(type_str.to_string()))?;

        let priority = doc.get("priority").and_then(Value::as_int).unwrap_or(2).clamp(1, 3) as u8;

        let deps = doc
            .get("deps")
            .and_then(Value::as_list)
            .unwrap_or(&[])
            .iter()
            .map(|s| s.parse::<TicketId>())
            .collect::<Result<Vec<TicketId>, _>>()?;

        let links = doc.get("links").and_then(Value::as_list).unwrap_or(&[]).to_vec();
        let assignee = doc.get_str("assignee").map(str::to_string);
        let created_at =
            doc.get_str("created").ok_or(TicketDocError::MissingField("created"))?.to_string();

        let (title, body) = split_title(&doc.body)?;

        Ok(Ticket {
            id,
            status,
            ticket_type,
            priority,
            deps,
            links,
            assignee,
            created_at,
            title,
            body,
        })
    }

    /// True iff every entry in `deps` is present and closed in `closed_ids`.
    pub fn is_ready(&self, closed_ids: &std::collections::HashSet<TicketId>) -> bool {
        self.status == TicketStatus::Open && self.deps.iter().all(|d| closed_ids.contains(d))
    }
}

fn split_title(body: &str) -> Result<(String, String), TicketDocError> {
    let mut lines = body.lines();
    let first = lines.next().unwrap_or("");
    let title = first.strip_prefix("# ").ok_or(TicketDocError::MissingTitle)?.trim().to_string();
    let rest: String = lines.collect::<Vec<_>>().join("\n");
    let rest = rest.strip_prefix('\n').unwrap_or(&rest).to_string();
    Ok((title, rest))
}

crate::builder! {
    pub struct TicketBuilder => Ticket {
        into {
            title: String = "Do the thing",
            body: String = "",
            created_at: String = "2026-01-01T00:00:00Z",
        }
        set {
            status: TicketStatus = TicketStatus::Open,
            ticket_type: TicketType = TicketType::Task,
            priority: u8 = 2,
            deps: Vec<TicketId> = Vec::new(),
            links: Vec<String> = Vec::new(),
        }
        option {
            assignee: String = None,
        }
        computed {
            id: TicketId = TicketId::generate(),
        }
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
