//! In-memory object client
//!
//! A process-local object store with the same listing and error semantics
//! as a hosted one. Used for tests and ephemeral stores.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use chrono::Utc;
use parking_lot::RwLock;

use super::client::{ListPage, ObjectClient, ObjectError, ObjectMeta};

/// A stored object body plus its attributes
#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    meta: ObjectMeta,
}

/// Object client holding all buckets in memory
///
/// ## Concurrency:
/// - `buckets`: RwLock (many concurrent readers, exclusive writer)
/// - `available`: atomic switch used to simulate an outage
#[derive(Debug)]
pub struct InMemoryObjectClient {
    buckets: RwLock<HashMap<String, BTreeMap<String, StoredObject>>>,
    available: AtomicBool,
}

impl InMemoryObjectClient {
    /// Create a client with no buckets
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Create a client with one empty bucket
    pub fn with_bucket(bucket: &str) -> Self {
        let client = Self::new();
        client.create_bucket(bucket);
        client
    }

    /// Create a bucket; existing buckets are left untouched
    pub fn create_bucket(&self, bucket: &str) {
        self.buckets
            .write()
            .entry(bucket.to_string())
            .or_default();
    }

    /// Number of objects in a bucket (0 for unknown buckets)
    pub fn object_count(&self, bucket: &str) -> usize {
        self.buckets.read().get(bucket).map_or(0, BTreeMap::len)
    }

    /// Make every following call fail with `Unavailable` (or recover)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ObjectError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ObjectError::Unavailable("service offline".to_string()))
        }
    }
}

impl Default for InMemoryObjectClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectClient for InMemoryObjectClient {
    fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<ObjectMeta, ObjectError> {
        self.check_available()?;

        let meta = ObjectMeta {
            key: key.to_string(),
            size: body.len() as u64,
            crc32: crc32fast::hash(&body),
            last_modified: Utc::now(),
        };

        let mut buckets = self.buckets.write();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| ObjectError::NoSuchBucket(bucket.to_string()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                body,
                meta: meta.clone(),
            },
        );

        Ok(meta)
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, ObjectError> {
        self.check_available()?;

        let buckets = self.buckets.read();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| ObjectError::NoSuchBucket(bucket.to_string()))?;
        let object = objects
            .get(key)
            .ok_or_else(|| ObjectError::NoSuchKey(key.to_string()))?;

        let actual = crc32fast::hash(&object.body);
        if actual != object.meta.crc32 {
            return Err(ObjectError::ChecksumMismatch {
                key: key.to_string(),
                expected: object.meta.crc32,
                actual,
            });
        }

        Ok(object.body.clone())
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMeta, ObjectError> {
        self.check_available()?;

        let buckets = self.buckets.read();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| ObjectError::NoSuchBucket(bucket.to_string()))?;
        objects
            .get(key)
            .map(|object| object.meta.clone())
            .ok_or_else(|| ObjectError::NoSuchKey(key.to_string()))
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ObjectError> {
        self.check_available()?;

        let mut buckets = self.buckets.write();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| ObjectError::NoSuchBucket(bucket.to_string()))?;
        objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ObjectError::NoSuchKey(key.to_string()))
    }

    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<char>,
    ) -> Result<ListPage, ObjectError> {
        self.check_available()?;

        let buckets = self.buckets.read();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| ObjectError::NoSuchBucket(bucket.to_string()))?;

        let mut page = ListPage::default();
        let matching = objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix));

        for (key, object) in matching {
            let rest = &key[prefix.len()..];
            let rolled_up = delimiter.and_then(|d| rest.find(d).map(|idx| idx + d.len_utf8()));

            match rolled_up {
                Some(end) => {
                    // Names sharing a prefix are contiguous in key order
                    let common = &key[..prefix.len() + end];
                    if page.common_prefixes.last().map(String::as_str) != Some(common) {
                        page.common_prefixes.push(common.to_string());
                    }
                }
                None => page.objects.push(object.meta.clone()),
            }
        }

        Ok(page)
    }
}
