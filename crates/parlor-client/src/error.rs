//! Client error types.

use parlor_proto::ProtocolError;
use reqwest::StatusCode;
use thiserror::Error;

/// Client I/O errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body text, possibly empty.
        body: String,
    },

    /// socket.io handshake or emit failure.
    #[error("socket.io error: {0}")]
    Socket(Box<rust_socketio::Error>),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Event payload could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL could not be parsed or used as an API base.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The channel task has stopped.
    #[error("channel closed")]
    ChannelClosed,
}

impl From<rust_socketio::Error> for ClientError {
    fn from(error: rust_socketio::Error) -> Self {
        Self::Socket(Box::new(error))
    }
}

impl ClientError {
    /// Text to show the user.
    ///
    /// The server's response body is shown verbatim when there is one;
    /// otherwise `fallback` is used.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { body, .. } if !body.trim().is_empty() => body.trim().to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;
