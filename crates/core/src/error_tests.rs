use super::*;

#[test]
fn retriable_kinds() {
    assert!(KdError::Timeout("x".into()).is_retriable());
    assert!(KdError::NonZeroExit("x".into()).is_retriable());
    assert!(KdError::Parse("x".into()).is_retriable());
    assert!(!KdError::CommandNotFound("x".into()).is_retriable());
    assert!(!KdError::InvalidConfig("x".into()).is_retriable());
}

#[test]
fn exit_codes_match_taxonomy() {
    assert_eq!(KdError::NotFound("t".into()).exit_code(), 2);
    assert_eq!(KdError::Ambiguous("t".into()).exit_code(), 3);
    assert_eq!(KdError::Conflict("t".into()).exit_code(), 4);
    assert_eq!(KdError::Cycle("t".into()).exit_code(), 5);
    assert_eq!(KdError::InvalidConfig("t".into()).exit_code(), 6);
    assert_eq!(KdError::Timeout("t".into()).exit_code(), 1);
    assert_eq!(KdError::Io("t".into()).exit_code(), 1);
}

#[test]
fn kind_names_are_stable() {
    assert_eq!(KdError::NotFound("x".into()).kind_name(), "NotFound");
    assert_eq!(KdError::Parse("x".into()).kind_name(), "Parse");
}

#[test]
fn file_store_error_converts_to_kd_error() {
    let e: KdError = FileStoreError::NotFound("ticket.md".into()).into();
    assert!(matches!(e, KdError::NotFound(_)));

    let e: KdError = FileStoreError::Corrupt { path: "t.md".into(), detail: "bad".into() }.into();
    assert!(matches!(e, KdError::Parse(_)));
}
