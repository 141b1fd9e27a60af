//! Versioned JSON encoding of changesets.
//!
//! Consumed by the summary layer, never by the engine's ingestion paths.

use crate::family::ChangeFamily;
use thiserror::Error;

/// Errors produced while encoding or decoding changesets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("unsupported codec version: {0}")]
    UnsupportedVersion(u32),

    #[error("malformed change payload: {0}")]
    Malformed(String),
}

/// A change family whose changesets have a JSON-compatible encoding.
pub trait ChangeCodec: ChangeFamily {
    /// Encode a changeset at the given format version.
    fn encode_json(
        &self,
        version: u32,
        change: &Self::Change,
    ) -> Result<serde_json::Value, CodecError>;

    /// Decode a changeset previously encoded at the given format version.
    fn decode_json(&self, version: u32, data: &serde_json::Value)
        -> Result<Self::Change, CodecError>;
}
