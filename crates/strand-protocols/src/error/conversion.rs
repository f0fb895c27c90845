//! Payload conversion errors.

use thiserror::Error;

/// A value could not be converted to or from a payload.
///
/// Kept distinct from transport errors so callers can tell a malformed
/// payload apart from a failed RPC.
#[derive(Debug, Error)]
pub enum DataConversionError {
    #[error("Failed to encode value: {0}")]
    Encoding(String),

    #[error("Failed to decode payload: {0}")]
    Decoding(String),

    #[error("Payload has no encoding metadata")]
    MissingEncoding,

    #[error("Unsupported payload encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Missing argument at index {index} (payload count {count})")]
    MissingArgument { index: usize, count: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
