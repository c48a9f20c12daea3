//! Error types for frame normalization and event decoding

use thiserror::Error;

/// Errors raised while normalizing frames or decoding payloads.
///
/// Decode errors are recoverable at message granularity: the registry catches
/// them and substitutes the raw fallback event, so they never reach the
/// receive loop.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Frame was not valid JSON
    #[error("failed to parse frame JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload had a different structure than the decoder expects
    #[error("unexpected payload shape for {topic}: expected {expected}")]
    UnexpectedShape {
        /// Topic being decoded
        topic: String,
        /// Description of the expected structure
        expected: &'static str,
    },

    /// A field the decoder cannot do without was absent or unparseable
    #[error("missing required field: {field}")]
    MissingField {
        /// The field that was missing
        field: &'static str,
    },
}
