// SPDX-License-Identifier: MIT

//! Cursor CLI adapter (§4.4).
//!
//! Cursor's agent CLI emits one `{"event": ..., "data": {...}}` object per
//! turn and resumes via `--chat-id`.

use crate::agent::{AdapterError, AgentAdapter, AgentResponse, CommandContext};

const PREAMBLE: &str = "You are a read-only advisor. Suggest changes; do not apply them.";

pub struct CursorAdapter;

impl AgentAdapter for CursorAdapter {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn preamble(&self) -> &'static str {
        PREAMBLE
    }

    fn build_command(&self, ctx: &CommandContext<'_>) -> Vec<String> {
        let mut argv = vec!["cursor-agent".to_string(), "--print".to_string(), "--output-format".to_string(), "json".to_string()];
        if let Some(session_id) = ctx.session_id {
            argv.push("--chat-id".to_string());
            argv.push(session_id.to_string());
        }
        let mut prompt = PREAMBLE.to_string();
        if let Some(extra) = ctx.extra_prompt {
            prompt.push('\n');
            prompt.push_str(extra);
        }
        prompt.push('\n');
        prompt.push_str(ctx.prompt);
        argv.push(prompt);
        argv
    }

    fn parse_response(&self, stdout: &[u8]) -> Result<AgentResponse, AdapterError> {
        let text = String::from_utf8_lossy(stdout);
        let mut last_text = String::new();
        let mut session_id = None;
        let mut saw_any_line = false;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(value) = serde_json::from_str::<serde_json::Value>(line) else { continue };
            saw_any_line = true;
            if let Some(id) = value.get("chat_id").and_then(|v| v.as_str()) {
                session_id = Some(id.to_string());
            }
            if value.get("event").and_then(|v| v.as_str()) == Some("result") {
                if let Some(t) = value.get("data").and_then(|d| d.get("text")).and_then(|v| v.as_str()) {
                    last_text = t.to_string();
                }
            }
        }
        if !saw_any_line {
            return Err(AdapterError::Parse("no valid JSON lines in cursor output".into()));
        }
        if last_text.is_empty() && session_id.is_none() {
            return Err(AdapterError::Parse("no result text recovered from cursor output".into()));
        }
        Ok(AgentResponse::ok(last_text, session_id))
    }

    fn extract_stream_text(&self, line: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(line).ok()?;
        match value.get("event").and_then(|v| v.as_str()) {
            Some("delta") => value.get("data").and_then(|d| d.get("text")).and_then(|v| v.as_str()).map(str::to_string),
            Some("result") => value.get("data").and_then(|d| d.get("text")).and_then(|v| v.as_str()).map(str::to_string),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
