//! Protocol error types.

use thiserror::Error;

/// Errors produced while encoding or decoding channel events.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload did not have the shape its event requires.
    #[error("invalid payload for '{event}': {source}")]
    InvalidPayload {
        /// Event name.
        event: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Payload could not be serialized.
    #[error("unable to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// Event name is not part of the protocol.
    #[error("unknown event: {0}")]
    UnknownEvent(String),
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
