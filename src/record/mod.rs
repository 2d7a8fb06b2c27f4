//! Record Module
//!
//! The persisted form of a leaf key.
//!
//! ## Layout
//! For a key path `P` the engine writes exactly two files:
//! ```text
//! P/
//! ├── info    (JSON metadata document)
//! └── data    (base64 of the raw value)
//! ```
//! A missing `data` file means the leaf does not exist.

mod data;
mod info;

pub use data::{decode_value, encode_value};
pub use info::{Info, FORMAT_VERSION, INFO_KIND};

/// File name of the metadata document inside a leaf
pub const INFO_FILE: &str = "info";

/// File name of the encoded value inside a leaf
pub const DATA_FILE: &str = "data";
