// SPDX-License-Identifier: MIT

//! A scriptable in-process adapter for other crates' tests — no subprocess,
//! no network, deterministic responses. Not used by anything in this crate
//! itself.

use crate::agent::{AdapterError, AgentAdapter, AgentResponse, CommandContext};
use parking_lot::Mutex;

/// An adapter whose `parse_response` always returns a fixed scripted
/// response, regardless of what's passed to it. `build_command` records
/// every invocation for assertions.
pub struct FakeAdapter {
    name: &'static str,
    response: AgentResponse,
    calls: Mutex<Vec<String>>,
}

impl FakeAdapter {
    pub fn new(name: &'static str, response: AgentResponse) -> Self {
        Self { name, response, calls: Mutex::new(Vec::new()) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl AgentAdapter for FakeAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn preamble(&self) -> &'static str {
        "fake preamble"
    }

    fn build_command(&self, ctx: &CommandContext<'_>) -> Vec<String> {
        self.calls.lock().push(ctx.prompt.to_string());
        vec!["true".to_string()]
    }

    fn parse_response(&self, _stdout: &[u8]) -> Result<AgentResponse, AdapterError> {
        Ok(self.response.clone())
    }

    fn extract_stream_text(&self, line: &str) -> Option<String> {
        Some(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_adapter_records_calls_and_returns_scripted_response() {
        let adapter = FakeAdapter::new("fake", AgentResponse::ok("hi", None));
        let ctx = CommandContext { prompt: "hello", session_id: None, streaming: false, extra_prompt: None };
        adapter.build_command(&ctx);
        assert_eq!(adapter.call_count(), 1);
        let response = adapter.parse_response(b"").unwrap();
        assert_eq!(response.text, "hi");
    }
}
