//! Error types for multikv
//!
//! Provides a unified error type for engine and backend operations.

use std::fmt;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for multikv operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// A `data`/`info` file (or any backend file) is absent
    #[error("Not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    /// The stored `info` document is not valid metadata
    #[error("failed to parse info file at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored `data` payload is not valid base64
    #[error("failed to decode data file at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// Failure reported by the storage medium (permission, network, quota)
    #[error("Backend error during {op} on '{path}': {message}")]
    Backend {
        op: &'static str,
        path: String,
        message: String,
    },

    /// A Put failed part-way; `stage` names the step that failed
    #[error("put '{path}' failed at {stage}: {source}")]
    Put {
        stage: PutStage,
        path: String,
        #[source]
        source: Box<KvError>,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The step of a Put that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutStage {
    /// Existing `info` could not be parsed
    ParseInfo,
    /// Updated `info` could not be serialized
    EncodeInfo,
    /// Writing `info` failed
    WriteInfo,
    /// Writing `data` failed (`info` is already updated)
    WriteData,
}

impl fmt::Display for PutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            PutStage::ParseInfo => "metadata parse",
            PutStage::EncodeInfo => "metadata encode",
            PutStage::WriteInfo => "metadata write",
            PutStage::WriteData => "data write",
        };
        f.write_str(stage)
    }
}

impl KvError {
    /// Build a backend error with operation and path context
    pub fn backend(op: &'static str, path: impl Into<String>, message: impl fmt::Display) -> Self {
        KvError::Backend {
            op,
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Wrap an error with the Put stage it came from
    pub(crate) fn put_stage(stage: PutStage, path: &str, source: KvError) -> Self {
        KvError::Put {
            stage,
            path: path.to_string(),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through Put stage wrappers
    pub fn root_cause(&self) -> &KvError {
        match self {
            KvError::Put { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The failing Put stage, if this error came from a Put
    pub fn put_stage_of(&self) -> Option<PutStage> {
        match self {
            KvError::Put { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root_cause(), KvError::NotFound(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.root_cause(), KvError::Parse { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self.root_cause(), KvError::Decode { .. })
    }

    pub fn is_invalid_operation(&self) -> bool {
        matches!(self.root_cause(), KvError::InvalidOperation(_))
    }
}
