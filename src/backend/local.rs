//! Local filesystem backend
//!
//! Maps backend paths onto files below a root directory:
//! `users/alice/data` → `{root}/users/alice/data`.

use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{info, trace};

use crate::error::{KvError, Result};
use crate::path::SEPARATOR;

use super::Backend;

/// Permissions for files created by the backend (unix only)
pub const FILE_MODE: u32 = 0o640;

/// Permissions for directories created by the backend (unix only)
pub const DIR_MODE: u32 = 0o750;

/// Scratch file created and removed when opening a root
const WRITE_CHECK_FILE: &str = ".multikv-write-check";

/// Backend storing every file under a root directory
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Open a backend on an existing, writable directory
    ///
    /// Writability is checked by creating and removing a scratch file in
    /// the root, so ownership, group and ACL rules all apply.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        let metadata = fs::metadata(&root).map_err(|e| {
            KvError::Config(format!("cannot open root {}: {}", root.display(), e))
        })?;
        if !metadata.is_dir() {
            return Err(KvError::Config(format!(
                "root {} is not a directory",
                root.display()
            )));
        }
        check_writable(&root).map_err(|e| {
            KvError::Config(format!("root {} is not writable: {}", root.display(), e))
        })?;

        info!(root = %root.display(), "opened local backend");
        Ok(Self { root })
    }

    /// Create the root directory if needed, then open it
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Self::new(root)
    }

    /// Root directory of this backend
    pub fn root(&self) -> &Path {
        &self.root
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Resolve a backend path below the root, refusing anything that escapes it
    fn resolve(&self, op: &'static str, path: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for segment in path.split(SEPARATOR).filter(|s| !s.is_empty()) {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) => resolved.push(part),
                _ => {
                    return Err(KvError::backend(
                        op,
                        path,
                        format!("segment '{}' escapes the backend root", segment),
                    ))
                }
            }
        }
        Ok(resolved)
    }
}

/// NotFound stays NotFound; everything else becomes a backend error
fn map_io(op: &'static str, path: &str, err: std::io::Error) -> KvError {
    if err.kind() == ErrorKind::NotFound {
        KvError::NotFound(path.to_string())
    } else {
        KvError::backend(op, path, err)
    }
}

fn check_writable(root: &Path) -> std::io::Result<()> {
    let scratch = root.join(WRITE_CHECK_FILE);
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&scratch)?;
    fs::remove_file(&scratch)
}

fn create_dirs(dir: &Path) -> std::io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)
}

fn write_truncate(file: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    let mut handle = options.open(file)?;
    handle.write_all(data)
}

impl Backend for LocalBackend {
    fn exist(&self, path: &str) -> Result<bool> {
        let full = self.resolve("exist", path)?;
        match fs::metadata(&full) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(KvError::backend("exist", path, e)),
        }
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        let full = self.resolve("list_dir", path)?;

        let metadata = match fs::metadata(&full) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(KvError::backend("list_dir", path, e)),
        };
        if !metadata.is_dir() {
            return Err(KvError::backend("list_dir", path, "not a directory"));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&full).map_err(|e| KvError::backend("list_dir", path, e))? {
            let entry = entry.map_err(|e| KvError::backend("list_dir", path, e))?;
            let name = entry.file_name().into_string().map_err(|raw| {
                KvError::backend("list_dir", path, format!("non UTF-8 entry {:?}", raw))
            })?;
            names.push(name);
        }

        // Same order as a directory listing sorted by file name
        names.sort();
        trace!(path, entries = names.len(), "listed directory");
        Ok(names)
    }

    fn delete_dir(&self, path: &str) -> Result<()> {
        let full = self.resolve("delete_dir", path)?;

        // Deleting the root empties it but keeps the directory itself
        if full == self.root {
            for name in self.list_dir(path)? {
                self.delete_dir(&name)?;
            }
            return Ok(());
        }

        let result = match fs::symlink_metadata(&full) {
            Ok(m) if m.is_dir() => fs::remove_dir_all(&full),
            Ok(_) => fs::remove_file(&full),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KvError::backend("delete_dir", path, e)),
        }
    }

    fn delete_file(&self, path: &str) -> Result<()> {
        let full = self.resolve("delete_file", path)?;
        fs::remove_file(&full).map_err(|e| map_io("delete_file", path, e))
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve("read_file", path)?;
        fs::read(&full).map_err(|e| map_io("read_file", path, e))
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full = self.resolve("write_file", path)?;
        if full == self.root {
            return Err(KvError::backend("write_file", path, "cannot write the root"));
        }

        if let Some(parent) = full.parent() {
            create_dirs(parent).map_err(|e| KvError::backend("write_file", path, e))?;
        }
        write_truncate(&full, data).map_err(|e| KvError::backend("write_file", path, e))?;

        trace!(path, bytes = data.len(), "wrote file");
        Ok(())
    }
}
