//! # multikv
//!
//! A hierarchical key-value store over pluggable storage backends:
//! - Slash-delimited keys (`users/alice`) forming containers and leaves
//! - Per-key metadata (created/updated timestamps) kept next to the value
//! - Local filesystem and object-storage backends behind one trait
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Kv (engine)                          │
//! │        Put / Get / GetInfo / Delete / List / ListEntries     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  <key>/info   <key>/data
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Backend (trait)                          │
//! │   exist · list_dir · delete_dir · delete_file · read · write │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────┐
//!   │ LocalBackend│          │ObjectStoreBackend│
//!   │  (std::fs)  │          │ (ObjectClient)   │
//!   └─────────────┘          └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use multikv::{Config, Kv};
//!
//! let kv = Kv::open(Config::builder().root_dir("/tmp/kv").build())?;
//! kv.put("users/alice", b"hello")?;
//! assert_eq!(kv.get("users/alice")?, b"hello");
//! assert_eq!(kv.list("users")?, vec!["alice".to_string()]);
//! # Ok::<(), multikv::KvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod path;
pub mod record;
pub mod backend;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, PutStage, Result};
pub use config::{BackendKind, Config};
pub use backend::{Backend, LocalBackend, ObjectStoreBackend};
pub use engine::{Entry, EntryKind, Kv};
pub use record::Info;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of multikv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
