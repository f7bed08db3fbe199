//! Error types for the BiDi runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the BiDi runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to establish the WebSocket connection to the driver.
    #[error("failed to connect to driver: {0}")]
    ConnectionFailed(String),

    /// The connection was closed while a command was outstanding, or a
    /// command was issued on a closed connection.
    #[error("connection closed")]
    ConnectionClosed,

    /// WebSocket-level error after the connection was established.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The driver sent something this client cannot make sense of.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Error response from the driver, with the stable error code preserved.
    #[error("{error}: {message}")]
    Remote {
        /// Stable error code (e.g. "invalid argument", "no such frame")
        error: String,
        /// Human-readable error message
        message: String,
        /// Stack trace from the driver, when available
        stacktrace: Option<String>,
    },

    /// Failed to launch or babysit the driver process.
    #[error("failed to launch driver: {0}")]
    LaunchFailed(String),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the stable error code if this is a Remote error.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Error::Remote { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns true if the underlying connection is gone.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Error::ConnectionClosed)
    }
}
