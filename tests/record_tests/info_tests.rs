//! Tests for the persisted record format
//!
//! These tests verify:
//! - Info document creation and JSON shape
//! - Parsing of valid, corrupt and foreign documents
//! - Base64 value encoding of the data file

use chrono::{TimeZone, Utc};
use multikv::record::{decode_value, encode_value, Info, FORMAT_VERSION, INFO_KIND};
use multikv::KvError;

// =============================================================================
// Info Tests
// =============================================================================

#[test]
fn test_new_info() {
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let info = Info::new("users/alice", now);

    assert_eq!(info.format_version, FORMAT_VERSION);
    assert_eq!(info.kind, INFO_KIND);
    assert_eq!(info.path, "users/alice");
    assert_eq!(info.created_at, now);
    assert_eq!(info.updated_at, now);
}

#[test]
fn test_info_bytes_roundtrip_keeps_timestamps() {
    let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let mut info = Info::new("k", created);
    info.touch(Utc::now());

    let parsed = Info::from_bytes("k/info", &info.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed, info);
}

#[test]
fn test_parse_document_written_by_hand() {
    let doc = br#"{
        "formatVersion": "1",
        "kind": "info",
        "path": "a/b",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-06-01T12:30:00.123456789Z"
    }"#;

    let info = Info::from_bytes("a/b/info", doc).unwrap();
    assert_eq!(info.path, "a/b");
    assert_eq!(info.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert!(info.updated_at > info.created_at);
}

#[test]
fn test_parse_go_style_document_with_offset() {
    let doc = br#"{
        "FormatVersion": "1",
        "Kind": "info",
        "Path": "k",
        "CreatedAt": "2021-01-01T10:00:00.123456789+01:00",
        "UpdatedAt": "2021-03-04T05:06:07-08:00"
    }"#;

    let info = Info::from_bytes("k/info", doc).unwrap();
    assert_eq!(info.format_version, FORMAT_VERSION);
    assert_eq!(info.kind, INFO_KIND);
    assert_eq!(info.path, "k");

    let created = Utc.with_ymd_and_hms(2021, 1, 1, 9, 0, 0).unwrap()
        + chrono::Duration::nanoseconds(123_456_789);
    assert_eq!(info.created_at, created);
    assert_eq!(info.updated_at, Utc.with_ymd_and_hms(2021, 3, 4, 13, 6, 7).unwrap());

    // Written back in the camelCase form
    let json: serde_json::Value = serde_json::from_slice(&info.to_bytes().unwrap()).unwrap();
    assert!(json.get("createdAt").is_some());
    assert!(json.get("CreatedAt").is_none());
}

#[test]
fn test_parse_invalid_json() {
    let err = Info::from_bytes("k/info", b"not json").unwrap_err();
    match err {
        KvError::Parse { path, .. } => assert_eq!(path, "k/info"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_parse_missing_field() {
    let doc = br#"{"formatVersion":"1","kind":"info","path":"k"}"#;
    assert!(Info::from_bytes("k/info", doc).unwrap_err().is_parse());
}

#[test]
fn test_parse_unknown_version_or_kind() {
    let future = br#"{"formatVersion":"2","kind":"info","path":"k",
        "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#;
    let foreign = br#"{"formatVersion":"1","kind":"other","path":"k",
        "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#;

    let err = Info::from_bytes("k/info", future).unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("unsupported format version"));

    let err = Info::from_bytes("k/info", foreign).unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("unexpected kind"));
}

// =============================================================================
// Data Codec Tests
// =============================================================================

#[test]
fn test_encode_value_is_standard_base64() {
    assert_eq!(encode_value(b"hello"), b"aGVsbG8=".to_vec());
    assert_eq!(encode_value(b"test"), b"dGVzdA==".to_vec());
}

#[test]
fn test_decode_value() {
    assert_eq!(decode_value("k/data", b"aGVsbG8=").unwrap(), b"hello".to_vec());
}

#[test]
fn test_decode_value_rejects_garbage() {
    let err = decode_value("k/data", b"aGVsbG8").unwrap_err();
    assert!(matches!(err, KvError::Decode { .. }));
}
