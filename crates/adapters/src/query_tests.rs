use super::*;
use crate::agent::AdapterError;
use std::time::Duration;

struct EchoAdapter {
    script: &'static str,
}

impl AgentAdapter for EchoAdapter {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn preamble(&self) -> &'static str {
        ""
    }

    fn build_command(&self, _ctx: &CommandContext<'_>) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), self.script.to_string()]
    }

    fn parse_response(&self, stdout: &[u8]) -> Result<AgentResponse, AdapterError> {
        let text = String::from_utf8_lossy(stdout);
        let line = text.lines().next().unwrap_or("");
        if line.is_empty() {
            return Err(AdapterError::Parse("empty output".into()));
        }
        Ok(AgentResponse::ok(line.to_string(), None))
    }

    fn extract_stream_text(&self, line: &str) -> Option<String> {
        Some(line.to_string())
    }
}

#[tokio::test]
async fn query_returns_parsed_text_on_success() {
    let adapter = EchoAdapter { script: "echo hello" };
    let response = query(&adapter, "p", Duration::from_secs(5), None, None, 0).await;
    assert!(!response.is_error());
    assert_eq!(response.text, "hello");
}

#[tokio::test]
async fn query_retries_on_parse_failure_up_to_max_retries() {
    let adapter = EchoAdapter { script: "true" }; // produces no stdout -> parse error
    let response = query(&adapter, "p", Duration::from_secs(5), None, None, 2).await;
    assert!(response.is_error());
    assert!(response.error.as_deref().unwrap().starts_with("Parse"));
}

#[tokio::test]
async fn query_does_not_retry_command_not_found() {
    let adapter = EchoAdapter { script: "" };
    struct MissingBinary;
    impl AgentAdapter for MissingBinary {
        fn name(&self) -> &'static str {
            "missing"
        }
        fn preamble(&self) -> &'static str {
            ""
        }
        fn build_command(&self, _ctx: &CommandContext<'_>) -> Vec<String> {
            vec!["kingdom-definitely-not-a-real-binary".to_string()]
        }
        fn parse_response(&self, _stdout: &[u8]) -> Result<AgentResponse, AdapterError> {
            Ok(AgentResponse::default())
        }
        fn extract_stream_text(&self, _line: &str) -> Option<String> {
            None
        }
    }
    let _ = &adapter;
    let response = query(&MissingBinary, "p", Duration::from_secs(5), None, None, 5).await;
    assert!(response.error.as_deref().unwrap().starts_with("CommandNotFound"));
}

#[tokio::test]
async fn query_tees_stdout_to_stream_path_and_deletes_it_after() {
    let tmp = tempfile::tempdir().unwrap();
    let stream_path = tmp.path().join(".stream-echo.jsonl");
    let adapter = EchoAdapter { script: "echo tee-me" };
    let response = query(&adapter, "p", Duration::from_secs(5), None, Some(&stream_path), 0).await;
    assert!(!response.is_error());
    assert!(!stream_path.exists(), "stream file must be deleted once the attempt completes");
}
