//! Engine Module
//!
//! The KV engine: key-value semantics on top of a `Backend`.
//!
//! ## Responsibilities
//! - Translate Put/Get/GetInfo/Delete/List into backend file operations
//! - Maintain the per-key `info` document (createdAt kept, updatedAt bumped)
//! - Keep every path either a container of keys or a leaf holding a value
//!
//! ## Non-atomic Put
//! Put writes `info` and then `data`. A failure between the two leaves
//! `info` updated while `data` is stale or missing; the error names the
//! failing stage. Concurrent Puts to one key are not serialized.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::backend::{Backend, InMemoryObjectClient, LocalBackend, ObjectStoreBackend};
use crate::config::{BackendKind, Config};
use crate::error::{KvError, PutStage, Result};
use crate::path::{join, KeyPath};
use crate::record::{self, Info, DATA_FILE, INFO_FILE};

/// Kind of an immediate child returned by `Kv::list_entries`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Holds a value (`data` or `info` present)
    Leaf,
    /// Holds further keys
    Container,
}

/// An immediate child of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

/// Hierarchical key-value store over a backend
///
/// Holds no state besides the backend handle; every call is an independent
/// sequence of backend requests.
pub struct Kv<B> {
    backend: B,
}

impl Kv<Box<dyn Backend>> {
    /// Open a store on the backend selected by `config`
    pub fn open(config: Config) -> Result<Self> {
        let backend: Box<dyn Backend> = match &config.backend {
            BackendKind::Local => {
                let local = if config.create_root {
                    LocalBackend::create(&config.root_dir)?
                } else {
                    LocalBackend::new(&config.root_dir)?
                };
                Box::new(local)
            }
            BackendKind::Memory { bucket } => {
                if bucket.is_empty() {
                    return Err(KvError::Config("bucket name must not be empty".to_string()));
                }
                let client = Arc::new(InMemoryObjectClient::with_bucket(bucket));
                Box::new(ObjectStoreBackend::new(client, bucket.clone()))
            }
        };

        Ok(Self::new(backend))
    }
}

impl<B: Backend> Kv<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // =========================================================================
    // Public Operations
    // =========================================================================

    /// Write or update the value of a leaf
    ///
    /// Steps:
    /// 1. Refuse keys that would nest inside a leaf or replace a container
    /// 2. Load existing `info` (keep createdAt) or start a new one
    /// 3. Write `info`
    /// 4. Write base64 `data`
    pub fn put(&self, path: &str, value: &[u8]) -> Result<()> {
        let key = KeyPath::parse(path)?;
        key.require_key("Put")?;

        // Step 1: Container/leaf exclusivity
        self.check_placement(&key)?;

        // Step 2: Build the info document
        let info_path = key.join(INFO_FILE);
        let now = Utc::now();
        let info = match self.backend.read_file(&info_path) {
            Ok(bytes) => {
                let mut info = Info::from_bytes(&info_path, &bytes)
                    .map_err(|e| KvError::put_stage(PutStage::ParseInfo, key.as_str(), e))?;
                info.touch(now);
                info
            }
            Err(e) if e.is_not_found() => Info::new(key.as_str(), now),
            Err(e) => {
                warn!(key = %key, error = %e, "unreadable info, writing fresh metadata");
                Info::new(key.as_str(), now)
            }
        };
        let info_bytes = info
            .to_bytes()
            .map_err(|e| KvError::put_stage(PutStage::EncodeInfo, key.as_str(), e))?;

        // Step 3: info before data
        self.backend
            .write_file(&info_path, &info_bytes)
            .map_err(|e| KvError::put_stage(PutStage::WriteInfo, key.as_str(), e))?;

        // Step 4: data
        self.backend
            .write_file(&key.join(DATA_FILE), &record::encode_value(value))
            .map_err(|e| KvError::put_stage(PutStage::WriteData, key.as_str(), e))?;

        debug!(key = %key, bytes = value.len(), "put");
        Ok(())
    }

    /// Read the value of a leaf
    pub fn get(&self, path: &str) -> Result<Vec<u8>> {
        let key = KeyPath::parse(path)?;
        key.require_key("Get")?;

        let data_path = key.join(DATA_FILE);
        let stored = self.backend.read_file(&data_path)?;
        let value = record::decode_value(&data_path, &stored)?;

        debug!(key = %key, bytes = value.len(), "get");
        Ok(value)
    }

    /// Read the metadata of a leaf
    pub fn get_info(&self, path: &str) -> Result<Info> {
        let key = KeyPath::parse(path)?;
        key.require_key("GetInfo")?;

        let info_path = key.join(INFO_FILE);
        let bytes = self.backend.read_file(&info_path)?;
        Info::from_bytes(&info_path, &bytes)
    }

    /// Remove a key and everything below it
    ///
    /// Deleting a path that holds nothing succeeds.
    pub fn delete(&self, path: &str) -> Result<()> {
        let key = KeyPath::parse(path)?;
        key.require_key("Delete")?;

        self.backend.delete_dir(key.as_str())?;
        debug!(key = %key, "delete");
        Ok(())
    }

    /// Names of the immediate children of a container
    ///
    /// The empty path lists the root. A container that was never written
    /// lists as empty. Listing a leaf fails with `InvalidOperation`.
    pub fn list(&self, path: &str) -> Result<Vec<String>> {
        let dir = KeyPath::parse(path)?;
        let names = self.backend.list_dir(dir.as_str())?;

        // A leaf always has entries (its own files), so an empty listing
        // needs no leaf check
        if !names.is_empty() && self.is_leaf(dir.as_str())? {
            return Err(KvError::InvalidOperation(format!(
                "cannot list the contents of key '{}', use Get or GetInfo instead",
                dir
            )));
        }

        debug!(path = %dir, entries = names.len(), "list");
        Ok(names)
    }

    /// Immediate children of a container, each classified as leaf or container
    pub fn list_entries(&self, path: &str) -> Result<Vec<Entry>> {
        let dir = KeyPath::parse(path)?;
        let names = self.list(dir.as_str())?;

        names
            .into_iter()
            .map(|name| -> Result<Entry> {
                let kind = if self.is_leaf(&dir.join(&name))? {
                    EntryKind::Leaf
                } else {
                    EntryKind::Container
                };
                Ok(Entry { name, kind })
            })
            .collect()
    }

    /// Whether `path` is a leaf
    pub fn exists(&self, path: &str) -> Result<bool> {
        let key = KeyPath::parse(path)?;
        key.require_key("Exists")?;
        self.is_leaf(key.as_str())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// A path is a leaf when its `data` or `info` file exists
    fn is_leaf(&self, path: &str) -> Result<bool> {
        Ok(self.backend.exist(&join(path, DATA_FILE))?
            || self.backend.exist(&join(path, INFO_FILE))?)
    }

    /// Refuse a Put that would make a path both container and leaf
    fn check_placement(&self, key: &KeyPath) -> Result<()> {
        for ancestor in key.ancestors() {
            if self.is_leaf(ancestor.as_str())? {
                return Err(KvError::InvalidOperation(format!(
                    "cannot put '{}': ancestor '{}' holds a value",
                    key, ancestor
                )));
            }
        }

        let children = self.backend.list_dir(key.as_str())?;
        if children
            .iter()
            .any(|name| name != DATA_FILE && name != INFO_FILE)
        {
            return Err(KvError::InvalidOperation(format!(
                "cannot put '{}': it is a container of other keys",
                key
            )));
        }

        Ok(())
    }
}
