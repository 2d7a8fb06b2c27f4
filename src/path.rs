//! Key paths
//!
//! Keys are slash-delimited hierarchical paths such as `users/alice`.
//! A `KeyPath` is the validated, normalized form handed to backends.
//!
//! ## Rules
//! - Leading and trailing `/` are ignored (`/a/b/` == `a/b`)
//! - Empty segments (`a//b`), `.` and `..` are rejected
//! - `data` and `info` are reserved: they name the files of a leaf
//! - The empty path is the root container

use std::fmt;

use crate::error::{KvError, Result};
use crate::record::{DATA_FILE, INFO_FILE};

/// Separator between key segments (and backend path components)
pub const SEPARATOR: char = '/';

/// A validated key path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    inner: String,
}

impl KeyPath {
    /// Parse and normalize a key path
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim_matches(SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        for segment in trimmed.split(SEPARATOR) {
            match segment {
                "" => {
                    return Err(KvError::InvalidOperation(format!(
                        "invalid key '{}': empty path segment",
                        raw
                    )))
                }
                "." | ".." => {
                    return Err(KvError::InvalidOperation(format!(
                        "invalid key '{}': relative segment '{}'",
                        raw, segment
                    )))
                }
                DATA_FILE | INFO_FILE => {
                    return Err(KvError::InvalidOperation(format!(
                        "invalid key '{}': '{}' is a reserved name",
                        raw, segment
                    )))
                }
                _ => {}
            }
        }

        Ok(Self {
            inner: trimmed.to_string(),
        })
    }

    /// The root container
    pub fn root() -> Self {
        Self {
            inner: String::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Append a single name below this path
    pub fn join(&self, name: &str) -> String {
        join(&self.inner, name)
    }

    /// Every proper ancestor, nearest to the root first
    ///
    /// `a/b/c` → `["a", "a/b"]`; the root itself is not included.
    pub fn ancestors(&self) -> Vec<KeyPath> {
        let mut out = Vec::new();
        for (idx, ch) in self.inner.char_indices() {
            if ch == SEPARATOR {
                out.push(KeyPath {
                    inner: self.inner[..idx].to_string(),
                });
            }
        }
        out
    }

    /// Fail with InvalidOperation when this is the root
    pub fn require_key(&self, op: &str) -> Result<()> {
        if self.is_root() {
            return Err(KvError::InvalidOperation(format!(
                "{} requires a non-empty key",
                op
            )));
        }
        Ok(())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

/// Join a backend path and a child name with `/`
pub fn join(base: &str, name: &str) -> String {
    let base = base.trim_end_matches(SEPARATOR);
    let name = name.trim_start_matches(SEPARATOR);
    if base.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        base.to_string()
    } else {
        format!("{}{}{}", base, SEPARATOR, name)
    }
}
