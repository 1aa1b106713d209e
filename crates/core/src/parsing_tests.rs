use super::*;
use yare::parameterized;

#[parameterized(
    bool_true = { "true", Value::Bool(true) },
    bool_false = { "false", Value::Bool(false) },
    plain_int = { "3", Value::Int(3) },
    negative_looking_string = { "-3", Value::String("-3".to_string()) },
    leading_zero_preserved = { "0817", Value::String("0817".to_string()) },
    single_zero_is_int = { "0", Value::Int(0) },
    quoted_string = { "\"0817\"", Value::String("0817".to_string()) },
    bare_string = { "open", Value::String("open".to_string()) },
)]
fn parse_scalar_matches_policy(input: &str, expected: Value) {
    assert_eq!(parse_scalar(input), expected);
}

#[test]
fn parse_scalar_list() {
    let v = parse_scalar("[a1b2, c3d4]");
    assert_eq!(v, Value::List(vec!["a1b2".to_string(), "c3d4".to_string()]));
}

#[test]
fn parse_scalar_empty_list() {
    assert_eq!(parse_scalar("[]"), Value::List(vec![]));
}

#[test]
fn parse_full_document_with_frontmatter() {
    let input = "---\nid: 0817\nstatus: open\ndeps: [a1b2, c3d4]\npriority: 1\n---\n# Title\n\nBody text.\n";
    let doc = parse(input).unwrap();
    assert_eq!(doc.get_str("id"), Some("0817"));
    assert_eq!(doc.get_str("status"), Some("open"));
    assert_eq!(doc.get("deps").unwrap().as_list(), Some(&["a1b2".to_string(), "c3d4".to_string()][..]));
    assert_eq!(doc.get("priority").unwrap().as_int(), Some(1));
    assert_eq!(doc.body, "# Title\n\nBody text.\n");
}

#[test]
fn parse_document_without_frontmatter() {
    let doc = parse("just a body\nwith two lines\n").unwrap();
    assert!(doc.fields.is_empty());
    assert_eq!(doc.body, "just a body\nwith two lines\n");
}

#[test]
fn parse_unterminated_frontmatter_is_error() {
    let err = parse("---\nid: 1\nno closing fence\n").unwrap_err();
    assert_eq!(err, ParseError::Unterminated);
}

#[test]
fn parse_malformed_line_is_error() {
    let err = parse("---\nnotakeyvalue\n---\nbody\n").unwrap_err();
    assert!(matches!(err, ParseError::MalformedLine(_)));
}

#[test]
fn emit_quotes_leading_zero_literal() {
    let mut doc = Document::new("");
    doc.set("id", "0817");
    let text = emit(&doc);
    assert!(text.contains("id: \"0817\""), "got: {text}");
}

#[test]
fn emit_quotes_all_digit_string_to_avoid_int_reinterpretation() {
    let mut doc = Document::new("");
    doc.set("note", "817");
    let text = emit(&doc);
    assert!(text.contains("note: \"817\""), "got: {text}");
}

#[test]
fn emit_does_not_quote_ordinary_strings() {
    let mut doc = Document::new("");
    doc.set("status", "open");
    let text = emit(&doc);
    assert!(text.contains("status: open\n"));
}

#[test]
fn round_trip_preserves_ticket_id_like_literal() {
    let mut doc = Document::new("body\n");
    doc.set("id", "0817");
    doc.set("priority", 2i64);
    doc.set("deps", vec!["a1b2".to_string()]);
    let text = emit(&doc);
    let reparsed = parse(&text).unwrap();
    assert_eq!(reparsed.get_str("id"), Some("0817"));
    assert_eq!(reparsed.get("priority").unwrap().as_int(), Some(2));
    assert_eq!(reparsed.body, "body\n");
}

proptest::proptest! {
    #[test]
    fn emit_then_parse_round_trips_string_values(s in "[a-zA-Z0-9_ -]{0,20}") {
        let mut doc = Document::new("body");
        doc.set("field", s.clone());
        let text = emit(&doc);
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(reparsed.get_str("field").map(|s| s.to_string()), Some(s));
    }
}
