//! Tests for ObjectStoreBackend
//!
//! These tests verify:
//! - Writing and reading objects through the backend
//! - Prefix ("directory") deletion including nested prefixes
//! - Delimiter listing of objects and common prefixes
//! - Mapping of client errors (missing key, missing bucket, outage)

use std::sync::Arc;

use bytes::Bytes;
use multikv::backend::{Backend, InMemoryObjectClient, ObjectClient, ObjectStoreBackend};
use multikv::KvError;

// =============================================================================
// Helper Functions
// =============================================================================

const BUCKET: &str = "test";

fn setup_backend() -> (Arc<InMemoryObjectClient>, ObjectStoreBackend<InMemoryObjectClient>) {
    let client = Arc::new(InMemoryObjectClient::with_bucket(BUCKET));
    let backend = ObjectStoreBackend::new(Arc::clone(&client), BUCKET);
    (client, backend)
}

fn put_raw(client: &InMemoryObjectClient, key: &str) {
    client
        .put_object(BUCKET, key, Bytes::from_static(b"test"))
        .unwrap();
}

// =============================================================================
// Write/Read Tests
// =============================================================================

#[test]
fn test_write_file() {
    let (client, backend) = setup_backend();

    backend.write_file("svk-test-file", b"test").unwrap();
    assert_eq!(
        client.get_object(BUCKET, "svk-test-file").unwrap(),
        Bytes::from_static(b"test")
    );
}

#[test]
fn test_write_file_sub_dir() {
    let (client, backend) = setup_backend();

    backend.write_file("/svk-test-dir/test-file", b"test").unwrap();
    assert!(client.head_object(BUCKET, "svk-test-dir/test-file").is_ok());
    assert_eq!(backend.bucket(), BUCKET);
}

#[test]
fn test_read_file() {
    let (client, backend) = setup_backend();
    put_raw(&client, "svk-test-file");

    assert_eq!(backend.read_file("svk-test-file").unwrap(), b"test".to_vec());
}

#[test]
fn test_read_missing_file_is_not_found() {
    let (_client, backend) = setup_backend();
    assert!(backend.read_file("missing").unwrap_err().is_not_found());
}

#[test]
fn test_exist() {
    let (client, backend) = setup_backend();
    put_raw(&client, "dir/file");

    assert!(backend.exist("dir/file").unwrap());
    assert!(!backend.exist("dir/other").unwrap());
    // Prefixes have no existence of their own
    assert!(!backend.exist("dir").unwrap());
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_file() {
    let (client, backend) = setup_backend();
    put_raw(&client, "svk-test-file");

    backend.delete_file("svk-test-file").unwrap();
    assert!(client.head_object(BUCKET, "svk-test-file").is_err());
    assert!(backend.delete_file("svk-test-file").unwrap_err().is_not_found());
}

#[test]
fn test_delete_dir() {
    let (client, backend) = setup_backend();
    put_raw(&client, "svk-test-dir/a");
    put_raw(&client, "svk-test-dir/b");

    backend.delete_dir("svk-test-dir").unwrap();
    assert_eq!(client.object_count(BUCKET), 0);
}

#[test]
fn test_delete_dir_with_sub_dirs() {
    let (client, backend) = setup_backend();
    put_raw(&client, "svk-test-dir/a");
    put_raw(&client, "svk-test-dir/sub/b");
    put_raw(&client, "svk-test-dir/sub/deeper/c");
    put_raw(&client, "svk-test-dir-sibling/d");

    backend.delete_dir("svk-test-dir").unwrap();

    assert_eq!(client.object_count(BUCKET), 1);
    assert!(backend.exist("svk-test-dir-sibling/d").unwrap());
}

#[test]
fn test_delete_dir_missing_is_ok() {
    let (_client, backend) = setup_backend();
    backend.delete_dir("nothing/here").unwrap();
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_empty() {
    let (_client, backend) = setup_backend();
    assert!(backend.list_dir("svk-test-dir").unwrap().is_empty());
    assert!(backend.list_dir("").unwrap().is_empty());
}

#[test]
fn test_list_single() {
    let (client, backend) = setup_backend();
    put_raw(&client, "svk-test-dir/file");

    assert_eq!(backend.list_dir("svk-test-dir").unwrap(), vec!["file"]);
}

#[test]
fn test_list_multiple() {
    let (client, backend) = setup_backend();
    put_raw(&client, "svk-test-dir/file2");
    put_raw(&client, "svk-test-dir/file1");
    put_raw(&client, "svk-test-dir/sub/file3");
    put_raw(&client, "svk-test-dir/sub/file4");

    assert_eq!(
        backend.list_dir("svk-test-dir/").unwrap(),
        vec!["file1", "file2", "sub"]
    );
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[test]
fn test_missing_bucket_is_backend_error() {
    let client = Arc::new(InMemoryObjectClient::new());
    let backend = ObjectStoreBackend::new(client, "absent");

    match backend.write_file("k", b"v").unwrap_err() {
        KvError::Backend { op, path, message } => {
            assert_eq!(op, "write_file");
            assert_eq!(path, "k");
            assert!(message.contains("absent"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_outage_is_backend_error() {
    let (client, backend) = setup_backend();
    client.set_available(false);

    assert!(matches!(
        backend.exist("k").unwrap_err(),
        KvError::Backend { op: "exist", .. }
    ));
    assert!(matches!(
        backend.delete_dir("k").unwrap_err(),
        KvError::Backend { op: "delete_dir", .. }
    ));
    assert!(!backend.read_file("k").unwrap_err().is_not_found());
}

#[test]
fn test_empty_object_name_rejected() {
    let (_client, backend) = setup_backend();
    assert!(backend.write_file("/", b"v").is_err());
}
