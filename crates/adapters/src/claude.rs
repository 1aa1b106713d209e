// SPDX-License-Identifier: MIT

//! Claude Code CLI adapter (§4.4).
//!
//! Non-streaming mode asks for a single final JSON blob
//! (`--output-format json`); streaming mode asks for one JSON object per
//! turn event (`--output-format stream-json`). Resuming a session passes
//! `--resume <id>`.

use crate::agent::{AdapterError, AgentAdapter, AgentResponse, CommandContext};

const PREAMBLE: &str =
    "You are a read-only advisor. Do not modify files outside your assigned worktree.";

pub struct ClaudeAdapter;

impl AgentAdapter for ClaudeAdapter {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn preamble(&self) -> &'static str {
        PREAMBLE
    }

    fn build_command(&self, ctx: &CommandContext<'_>) -> Vec<String> {
        let mut argv = vec!["claude".to_string(), "-p".to_string()];
        argv.push(if ctx.streaming { "--output-format=stream-json".to_string() } else { "--output-format=json".to_string() });
        if let Some(session_id) = ctx.session_id {
            argv.push("--resume".to_string());
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
            if let Some(id) = value.get("session_id").and_then(|v| v.as_str()) {
                session_id = Some(id.to_string());
            }
            if value.get("type").and_then(|v| v.as_str()) == Some("result") {
                if let Some(result) = value.get("result").and_then(|v| v.as_str()) {
                    last_text = result.to_string();
                }
            }
        }
        if !saw_any_line {
            return Err(AdapterError::Parse("no valid JSON lines in claude output".into()));
        }
        if last_text.is_empty() && session_id.is_none() {
            return Err(AdapterError::Parse("no result text recovered from claude output".into()));
        }
        Ok(AgentResponse::ok(last_text, session_id))
    }

    fn extract_stream_text(&self, line: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(line).ok()?;
        match value.get("type").and_then(|v| v.as_str()) {
            Some("content_block_delta") => {
                value.get("delta").and_then(|d| d.get("text")).and_then(|t| t.as_str()).map(str::to_string)
            }
            Some("result") => value.get("result").and_then(|v| v.as_str()).map(str::to_string),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
