//! Record encoding.
//!
//! Every stored record is a single JSON object. The store writes what
//! [`encode_change`] produces and reads it back with [`decode_change`];
//! nothing else touches the bytes.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, Result};

/// Encode a change to its stored form.
pub fn encode_change<C: Serialize + ?Sized>(change: &C) -> Result<Vec<u8>> {
    serde_json::to_vec(change).map_err(|e| CoreError::Encoding(e.to_string()))
}

/// Decode a change from its stored form.
///
/// Fields the target type does not know are ignored.
pub fn decode_change<C: DeserializeOwned>(bytes: &[u8]) -> Result<C> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::Decoding(e.to_string()))
}
