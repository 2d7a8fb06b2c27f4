//! Info document
//!
//! Per-key metadata stored as JSON in the `info` file:
//!
//! ```json
//! {
//!   "formatVersion": "1",
//!   "kind": "info",
//!   "path": "users/alice",
//!   "createdAt": "2024-01-01T00:00:00Z",
//!   "updatedAt": "2024-01-02T00:00:00Z"
//! }
//! ```
//!
//! Documents written with Go-style field names (`FormatVersion`, `CreatedAt`,
//! ...) and RFC 3339 timestamps carrying any UTC offset are read as well;
//! updates are always written back in the camelCase form.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::error::{KvError, Result};

/// Current format version written to new info documents
pub const FORMAT_VERSION: &str = "1";

/// Value of the `kind` field
pub const INFO_KIND: &str = "info";

/// Metadata of a leaf key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(alias = "FormatVersion")]
    pub format_version: String,
    #[serde(alias = "Kind")]
    pub kind: String,
    /// Key path this document belongs to
    #[serde(alias = "Path")]
    pub path: String,
    /// Set once, at the first Put
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// Refreshed by every Put
    #[serde(alias = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Info {
    /// Metadata for a key written for the first time
    pub fn new(path: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            kind: INFO_KIND.to_string(),
            path: path.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record an update at `now`, keeping `updated_at` non-decreasing
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }

    /// Serialize to the on-disk JSON form
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| KvError::Serialization(e.to_string()))
    }

    /// Parse an `info` file; `path` is the file path used for error context
    ///
    /// Fails with `KvError::Parse` when the document is not JSON, misses a
    /// field, or carries an unknown format version or kind.
    pub fn from_bytes(path: &str, bytes: &[u8]) -> Result<Self> {
        let parse_err = |source: serde_json::Error| KvError::Parse {
            path: path.to_string(),
            source,
        };

        let info: Info = serde_json::from_slice(bytes).map_err(parse_err)?;

        if info.format_version != FORMAT_VERSION {
            return Err(parse_err(serde_json::Error::custom(format!(
                "unsupported format version '{}'",
                info.format_version
            ))));
        }
        if info.kind != INFO_KIND {
            return Err(parse_err(serde_json::Error::custom(format!(
                "unexpected kind '{}'",
                info.kind
            ))));
        }

        Ok(info)
    }
}
