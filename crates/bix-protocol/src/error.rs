//! Error types for wire encoding and decoding.

/// Errors that can occur while encoding or decoding protocol messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A message failed to serialize.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    /// An incoming frame did not match any expected message shape.
    #[error("malformed message: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Convenience alias for protocol results.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
