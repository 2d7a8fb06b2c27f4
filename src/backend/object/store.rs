//! Object store backend
//!
//! Implements `Backend` on top of any `ObjectClient`.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::backend::Backend;
use crate::error::{KvError, Result};
use crate::path::SEPARATOR;

use super::client::{ObjectClient, ObjectError};

/// Backend storing each file as an object in one bucket
pub struct ObjectStoreBackend<C> {
    client: Arc<C>,
    bucket: String,
}

impl<C: ObjectClient> ObjectStoreBackend<C> {
    pub fn new(client: Arc<C>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Object name for a backend path
    fn object_name(path: &str) -> &str {
        path.trim_matches(SEPARATOR)
    }

    /// Listing prefix for a "directory" (`""` for the bucket root)
    fn dir_prefix(path: &str) -> String {
        let name = Self::object_name(path);
        if name.is_empty() {
            String::new()
        } else {
            format!("{}{}", name, SEPARATOR)
        }
    }

    fn map_err(op: &'static str, path: &str, err: ObjectError) -> KvError {
        match err {
            ObjectError::NoSuchKey(_) => KvError::NotFound(path.to_string()),
            other => KvError::backend(op, path, other),
        }
    }
}

impl<C: ObjectClient> Backend for ObjectStoreBackend<C> {
    fn exist(&self, path: &str) -> Result<bool> {
        match self.client.head_object(&self.bucket, Self::object_name(path)) {
            Ok(_) => Ok(true),
            Err(ObjectError::NoSuchKey(_)) => Ok(false),
            Err(e) => Err(KvError::backend("exist", path, e)),
        }
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        let prefix = Self::dir_prefix(path);
        let page = self
            .client
            .list_objects(&self.bucket, &prefix, Some(SEPARATOR))
            .map_err(|e| Self::map_err("list_dir", path, e))?;

        let files = page.objects.iter().map(|meta| &meta.key[prefix.len()..]);
        let dirs = page
            .common_prefixes
            .iter()
            .map(|p| p[prefix.len()..].trim_end_matches(SEPARATOR));

        let mut names: Vec<String> = files
            .chain(dirs)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        names.sort();

        trace!(path, entries = names.len(), "listed prefix");
        Ok(names)
    }

    fn delete_dir(&self, path: &str) -> Result<()> {
        let prefix = Self::dir_prefix(path);
        let page = self
            .client
            .list_objects(&self.bucket, &prefix, None)
            .map_err(|e| Self::map_err("delete_dir", path, e))?;

        let mut names: Vec<&str> = page.objects.iter().map(|meta| meta.key.as_str()).collect();
        let exact = Self::object_name(path);
        if !exact.is_empty() {
            names.push(exact);
        }

        let mut deleted = 0usize;
        for name in names {
            match self.client.delete_object(&self.bucket, name) {
                Ok(()) => deleted += 1,
                // Already gone (or never existed as an object of its own)
                Err(ObjectError::NoSuchKey(_)) => {}
                Err(e) => return Err(KvError::backend("delete_dir", path, e)),
            }
        }

        debug!(path, deleted, "deleted prefix");
        Ok(())
    }

    fn delete_file(&self, path: &str) -> Result<()> {
        self.client
            .delete_object(&self.bucket, Self::object_name(path))
            .map_err(|e| Self::map_err("delete_file", path, e))
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.client
            .get_object(&self.bucket, Self::object_name(path))
            .map(|body| body.to_vec())
            .map_err(|e| Self::map_err("read_file", path, e))
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let name = Self::object_name(path);
        if name.is_empty() {
            return Err(KvError::backend("write_file", path, "empty object name"));
        }

        self.client
            .put_object(&self.bucket, name, Bytes::copy_from_slice(data))
            .map(|_| ())
            .map_err(|e| Self::map_err("write_file", path, e))
    }
}
