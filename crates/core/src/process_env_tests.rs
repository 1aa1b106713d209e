use super::*;

#[test]
fn sanitize_strips_all_known_markers() {
    let vars = vec![
        ("CLAUDECODE".to_string(), "1".to_string()),
        ("CLAUDE_CODE".to_string(), "1".to_string()),
        ("CODEX_SANDBOX".to_string(), "1".to_string()),
        ("CURSOR_TRACE_ID".to_string(), "abc".to_string()),
        ("PATH".to_string(), "/usr/bin".to_string()),
    ];
    let env = sanitize(vars);
    assert_eq!(env.get("PATH"), Some(&"/usr/bin".to_string()));
    for marker in NESTED_SESSION_MARKERS {
        assert!(!env.contains_key(*marker), "{marker} should be stripped");
    }
}

#[test]
fn sanitize_preserves_unrelated_variables() {
    let vars = vec![("HOME".to_string(), "/home/king".to_string())];
    let env = sanitize(vars);
    assert_eq!(env.get("HOME"), Some(&"/home/king".to_string()));
}
