//! Value codec
//!
//! Values are stored as standard (padded) base64 text so that every backend
//! can hold them as plain text objects.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{KvError, Result};

/// Encode a raw value for the `data` file
pub fn encode_value(value: &[u8]) -> Vec<u8> {
    STANDARD.encode(value).into_bytes()
}

/// Decode the contents of a `data` file back to the raw value
///
/// `path` is only used for error context.
pub fn decode_value(path: &str, stored: &[u8]) -> Result<Vec<u8>> {
    STANDARD.decode(stored).map_err(|source| KvError::Decode {
        path: path.to_string(),
        source,
    })
}
