//! Object storage backend
//!
//! Object stores have a flat namespace: a "directory" is only a shared key
//! prefix. The backend maps hierarchical paths onto object names and uses
//! delimiter listing to recover one level of hierarchy.
//!
//! ```text
//! bucket
//! ├── users/alice/info      ← object
//! ├── users/alice/data      ← object
//! └── users/bob/data        ← object
//!
//! list_dir("users") → prefix "users/", delimiter "/"
//!                   → common prefixes ["users/alice/", "users/bob/"]
//!                   → ["alice", "bob"]
//! ```

mod client;
mod memory;
mod store;

pub use client::{ListPage, ObjectClient, ObjectError, ObjectMeta};
pub use memory::InMemoryObjectClient;
pub use store::ObjectStoreBackend;
