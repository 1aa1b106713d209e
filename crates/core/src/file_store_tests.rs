use super::*;
use serde::Deserialize;
use tempfile::TempDir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Sample {
    name: String,
    count: u32,
}

#[test]
fn write_then_read_text_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("note.md");
    write_text(&path, "hello world").unwrap();
    assert_eq!(read_text(&path).unwrap(), Some("hello world".to_string()));
}

#[test]
fn read_text_absent_is_none_not_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.md");
    assert_eq!(read_text(&path).unwrap(), None);
}

#[test]
fn write_json_then_read_json_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("sample.json");
    let value = Sample { name: "a".to_string(), count: 3 };
    write_json(&path, &value).unwrap();
    let back: Option<Sample> = read_json(&path).unwrap();
    assert_eq!(back, Some(value));
}

#[test]
fn read_json_corrupt_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    write_text(&path, "{ not json").unwrap();
    let result: Result<Option<Sample>, _> = read_json(&path);
    assert!(matches!(result, Err(FileStoreError::Corrupt { .. })));
}

#[test]
fn write_leaves_no_tmp_file_behind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clean.txt");
    write_text(&path, "x").unwrap();
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "tmp files left behind: {leftovers:?}");
}

#[test]
fn concurrent_writes_use_distinct_tmp_paths() {
    let dir = TempDir::new().unwrap();
    let a = tmp_path_for(&dir.path().join("x"));
    let b = tmp_path_for(&dir.path().join("x"));
    assert_ne!(a, b);
}
