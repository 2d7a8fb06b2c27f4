//! Backend Module
//!
//! The storage capability the engine consumes.
//!
//! ## Responsibilities
//! - Address files by `/`-joined relative paths
//! - Report absent files as `KvError::NotFound`
//! - Wrap medium-specific failures with operation and path context
//!
//! ## Implementations
//! - `LocalBackend`: directories and files under a root directory
//! - `ObjectStoreBackend`: objects in a bucket; "directories" are shared
//!   key prefixes with no existence of their own
//!
//! Listing a path that was never written yields an empty list on every
//! backend, never `NotFound`.

mod local;
pub mod object;

pub use local::{LocalBackend, DIR_MODE, FILE_MODE};
pub use object::{InMemoryObjectClient, ObjectClient, ObjectError, ObjectStoreBackend};

use crate::error::Result;

/// Storage operations over hierarchical paths
///
/// Implementations must provide read-your-writes consistency per path.
pub trait Backend: Send + Sync {
    /// Whether a file exists at `path`
    fn exist(&self, path: &str) -> Result<bool>;

    /// Names of the immediate entries under `path`
    fn list_dir(&self, path: &str) -> Result<Vec<String>>;

    /// Remove `path` and everything below it; missing paths are not an error
    fn delete_dir(&self, path: &str) -> Result<()>;

    /// Remove a single file
    fn delete_file(&self, path: &str) -> Result<()>;

    /// Read a whole file (`KvError::NotFound` when absent)
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or replace a file, creating parent containers as needed
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn exist(&self, path: &str) -> Result<bool> {
        (**self).exist(path)
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        (**self).list_dir(path)
    }

    fn delete_dir(&self, path: &str) -> Result<()> {
        (**self).delete_dir(path)
    }

    fn delete_file(&self, path: &str) -> Result<()> {
        (**self).delete_file(path)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        (**self).read_file(path)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        (**self).write_file(path, data)
    }
}
