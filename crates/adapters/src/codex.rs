// SPDX-License-Identifier: MIT

//! Codex CLI adapter (§4.4).
//!
//! Codex frames every event as `{"msg": {"type": ..., ...}}` rather than a
//! flat `type` field, and resumes a session positionally (`resume <id>`)
//! rather than via a flag — a different-enough shape from Claude's to keep
//! `parse_response`/`extract_stream_text` genuinely adapter-specific.

use crate::agent::{AdapterError, AgentAdapter, AgentResponse, CommandContext};

const PREAMBLE: &str = "You are a read-only advisor reviewing this change.";

pub struct CodexAdapter;

impl AgentAdapter for CodexAdapter {
    fn name(&self) -> &'static str {
        "codex"
    }

    fn preamble(&self) -> &'static str {
        PREAMBLE
    }

    fn build_command(&self, ctx: &CommandContext<'_>) -> Vec<String> {
        let mut argv = vec!["codex".to_string(), "exec".to_string(), "--json".to_string()];
        if let Some(session_id) = ctx.session_id {
            argv.push("resume".to_string());
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
            let Some(msg) = value.get("msg") else { continue };
            if let Some(id) = msg.get("session_id").and_then(|v| v.as_str()) {
                session_id = Some(id.to_string());
            }
            if msg.get("type").and_then(|v| v.as_str()) == Some("task_complete") {
                if let Some(t) = msg.get("last_agent_message").and_then(|v| v.as_str()) {
                    last_text = t.to_string();
                }
            }
        }
        if !saw_any_line {
            return Err(AdapterError::Parse("no valid JSON lines in codex output".into()));
        }
        if last_text.is_empty() && session_id.is_none() {
            return Err(AdapterError::Parse("no result text recovered from codex output".into()));
        }
        Ok(AgentResponse::ok(last_text, session_id))
    }

    fn extract_stream_text(&self, line: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(line).ok()?;
        let msg = value.get("msg")?;
        match msg.get("type").and_then(|v| v.as_str()) {
            Some("agent_message_delta") => msg.get("delta").and_then(|v| v.as_str()).map(str::to_string),
            Some("task_complete") => msg.get("last_agent_message").and_then(|v| v.as_str()).map(str::to_string),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "codex_tests.rs"]
mod tests;
