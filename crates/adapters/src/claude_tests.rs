use super::*;

#[test]
fn build_command_includes_resume_flag_when_session_given() {
    let adapter = ClaudeAdapter;
    let ctx = CommandContext { prompt: "hi", session_id: Some("sess-1"), streaming: false, extra_prompt: None };
    let argv = adapter.build_command(&ctx);
    assert!(argv.contains(&"--resume".to_string()));
    assert!(argv.contains(&"sess-1".to_string()));
}

#[test]
fn build_command_omits_resume_flag_for_fresh_session() {
    let adapter = ClaudeAdapter;
    let ctx = CommandContext { prompt: "hi", session_id: None, streaming: false, extra_prompt: None };
    let argv = adapter.build_command(&ctx);
    assert!(!argv.contains(&"--resume".to_string()));
}

#[test]
fn parse_response_recovers_result_and_session_id() {
    let adapter = ClaudeAdapter;
    let stdout = br#"{"type":"system","session_id":"abc"}
{"type":"result","result":"done"}"#;
    let response = adapter.parse_response(stdout).unwrap();
    assert_eq!(response.text, "done");
    assert_eq!(response.session_id.as_deref(), Some("abc"));
}

#[test]
fn parse_response_skips_invalid_lines_without_failing() {
    let adapter = ClaudeAdapter;
    let stdout = b"not json\n{\"type\":\"result\",\"result\":\"ok\"}\n";
    let response = adapter.parse_response(stdout).unwrap();
    assert_eq!(response.text, "ok");
}

#[test]
fn parse_response_errors_when_nothing_recoverable() {
    let adapter = ClaudeAdapter;
    assert!(adapter.parse_response(b"not json at all").is_err());
}

#[test]
fn extract_stream_text_reads_content_block_delta() {
    let adapter = ClaudeAdapter;
    let line = r#"{"type":"content_block_delta","delta":{"text":"hel"}}"#;
    assert_eq!(adapter.extract_stream_text(line).as_deref(), Some("hel"));
}
