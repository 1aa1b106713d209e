use super::*;

fn sample() -> ThreadMessage {
    ThreadMessage {
        sequence: 3,
        from: "codex".to_string(),
        to: "king".to_string(),
        timestamp: "2026-01-01T00:00:00Z".to_string(),
        error: false,
        completed: false,
        body: "all good".to_string(),
    }
}

#[test]
fn filename_is_four_digit_prefixed() {
    assert_eq!(sample().filename(), "0003-codex.md");
}

#[test]
fn round_trips_through_document() {
    let m = sample();
    let doc = m.to_document();
    let back = ThreadMessage::from_document(&doc).unwrap();
    assert_eq!(back.sequence, m.sequence);
    assert_eq!(back.from, m.from);
    assert_eq!(back.to, m.to);
    assert_eq!(back.body, m.body);
}

#[test]
fn error_sentinel_round_trips() {
    let body = error_sentinel("Timeout", "300s");
    assert_eq!(body, "*Error: Timeout: 300s*");
    assert_eq!(error_kind(&body), Some(("Timeout", "300s")));
}

#[test]
fn empty_sentinel_is_not_an_error_kind() {
    let body = empty_sentinel("codex");
    assert_eq!(body, "*Empty response from codex*");
    assert_eq!(error_kind(&body), None);
}

#[test]
fn is_error_sentinel_matches_literal_body_shape() {
    let mut m = sample();
    m.body = error_sentinel("NonZeroExit", "exit 1");
    assert!(m.is_error_sentinel());

    let m = sample();
    assert!(!m.is_error_sentinel());
}

#[test]
fn thread_id_shapes() {
    assert_eq!(ThreadId::council("a1b2").as_str(), "council-a1b2");
    assert_eq!(ThreadId::work("a1b2").as_str(), "a1b2-work");
}
