//! Object client abstraction
//!
//! The minimal object API the backend needs from a storage service.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors reported by an object client
#[derive(Debug, Error)]
pub enum ObjectError {
    #[error("bucket '{0}' does not exist")]
    NoSuchBucket(String),

    #[error("object '{0}' does not exist")]
    NoSuchKey(String),

    #[error("checksum mismatch for '{key}': expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch { key: String, expected: u32, actual: u32 },

    #[error("object store unavailable: {0}")]
    Unavailable(String),
}

/// Attributes of a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Full object name
    pub key: String,
    pub size: u64,
    /// CRC32 of the object body
    pub crc32: u32,
    pub last_modified: DateTime<Utc>,
}

/// Result of a (possibly delimited) listing
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Objects directly matching the query, in lexicographic order
    pub objects: Vec<ObjectMeta>,
    /// Distinct prefixes up to and including the delimiter
    pub common_prefixes: Vec<String>,
}

/// Flat object storage operations scoped by bucket
pub trait ObjectClient: Send + Sync {
    /// Create or replace an object
    fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<ObjectMeta, ObjectError>;

    /// Fetch an object body
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, ObjectError>;

    /// Fetch object attributes without the body
    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMeta, ObjectError>;

    /// Remove an object (`NoSuchKey` when absent)
    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ObjectError>;

    /// List objects whose name starts with `prefix`
    ///
    /// With a delimiter, names containing the delimiter after the prefix are
    /// rolled up into `common_prefixes` instead of being returned as objects.
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<char>,
    ) -> Result<ListPage, ObjectError>;
}
