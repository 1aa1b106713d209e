// SPDX-License-Identifier: MIT

//! The [`AgentAdapter`] trait (§4.4) — one implementation per backend CLI,
//! each supplying exactly command-building, response parsing, and stream
//! line decoding. The retry/timeout/stream-tee contract around these three
//! methods lives once in [`crate::query::query`], not per adapter.

use kingdom_core::process_env::sanitized_env;
use std::collections::HashMap;

/// Errors an adapter's own parsing/command-building can raise. These never
/// reach a caller directly — [`crate::query::query`] folds every kind into
/// an [`AgentResponse::error`] string classified against
/// [`kingdom_core::KdError`]'s retriable kinds.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("non-zero exit ({code}): {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl AdapterError {
    /// The `KdError` kind name this error classifies as, used to build the
    /// error sentinel body (`*Error: <Kind>: <detail>*`, §6.5) and to decide
    /// whether `query` retries.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AdapterError::CommandNotFound(_) => "CommandNotFound",
            AdapterError::NonZeroExit { .. } => "NonZeroExit",
            AdapterError::Parse(_) => "Parse",
        }
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, AdapterError::NonZeroExit { .. } | AdapterError::Parse(_))
    }
}

/// The result of a single completed subprocess invocation.
#[derive(Debug, Clone, Default)]
pub struct AgentResponse {
    pub text: String,
    pub session_id: Option<String>,
    pub error: Option<String>,
}

impl AgentResponse {
    pub fn ok(text: impl Into<String>, session_id: Option<String>) -> Self {
        Self { text: text.into(), session_id, error: None }
    }

    pub fn err(kind: &str, detail: impl Into<String>) -> Self {
        Self { text: String::new(), session_id: None, error: Some(format!("{kind}: {}", detail.into())) }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Inputs to [`AgentAdapter::build_command`]. A plain struct rather than a
/// long parameter list, since three of the four fields are optional.
#[derive(Debug, Clone, Default)]
pub struct CommandContext<'a> {
    pub prompt: &'a str,
    pub session_id: Option<&'a str>,
    pub streaming: bool,
    pub extra_prompt: Option<&'a str>,
}

/// One per-backend subprocess driver. Implementations are pure (no I/O) —
/// spawning, teeing, timing out, and retrying are all handled once by
/// [`crate::query::query`].
pub trait AgentAdapter: Send + Sync {
    /// The member-config-facing name used to look this adapter up in
    /// [`crate::registry::default_registry`] (`claude`, `codex`, `cursor`).
    fn name(&self) -> &'static str;

    /// System-level framing text prepended ahead of the operator's prompt,
    /// establishing the read-only-advisor posture every Council member
    /// takes (§4.6).
    fn preamble(&self) -> &'static str;

    /// Build the subprocess argv, including the binary name at index 0.
    fn build_command(&self, ctx: &CommandContext<'_>) -> Vec<String>;

    /// Parse a completed subprocess's full stdout into a response. Must
    /// recover whatever text it can from partial/invalid NDJSON lines
    /// rather than failing the whole parse, unless no text survives at all.
    fn parse_response(&self, stdout: &[u8]) -> Result<AgentResponse, AdapterError>;

    /// Given one line of NDJSON stream output, return the human-readable
    /// text fragment it carries, if any. Used only by stream-file tailers;
    /// never called on single-blob (non-streaming) output.
    fn extract_stream_text(&self, line: &str) -> Option<String>;
}

/// The sanitized environment every adapter's subprocess must spawn with
/// (§4.3) — a thin re-export so call sites don't need to reach into
/// `kingdom_core` directly.
pub fn subprocess_env() -> HashMap<String, String> {
    sanitized_env()
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
