use super::*;

#[test]
fn build_command_resumes_positionally() {
    let adapter = CodexAdapter;
    let ctx = CommandContext { prompt: "hi", session_id: Some("sess-9"), streaming: false, extra_prompt: None };
    let argv = adapter.build_command(&ctx);
    let resume_idx = argv.iter().position(|a| a == "resume").unwrap();
    assert_eq!(argv[resume_idx + 1], "sess-9");
}

#[test]
fn parse_response_reads_nested_msg_envelope() {
    let adapter = CodexAdapter;
    let stdout = br#"{"msg":{"type":"agent_message_delta","delta":"par"}}
{"msg":{"type":"task_complete","last_agent_message":"done","session_id":"xyz"}}"#;
    let response = adapter.parse_response(stdout).unwrap();
    assert_eq!(response.text, "done");
    assert_eq!(response.session_id.as_deref(), Some("xyz"));
}

#[test]
fn parse_response_errors_on_garbage() {
    let adapter = CodexAdapter;
    assert!(adapter.parse_response(b"garbage").is_err());
}
