//! Transport errors.

use genai_live_core::LiveError;
use thiserror::Error;

/// Errors raised by a duplex transport.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The socket could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The peer closed the connection.
    #[error("Connection closed")]
    ConnectionClosed,

    /// A frame could not be written.
    #[error("Send error: {0}")]
    Send(String),

    /// A frame could not be read.
    #[error("Receive error: {0}")]
    Receive(String),

    /// Invalid handshake request (bad URL or header).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl StreamError {
    /// Whether the error means the peer went away.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }

    /// Create from any error.
    pub fn from_err<E: std::fmt::Display>(err: E) -> Self {
        Self::Connection(err.to_string())
    }
}

/// Result type for transport operations.
pub type StreamResult<T> = Result<T, StreamError>;

impl From<StreamError> for LiveError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::ConnectionClosed => LiveError::ConnectionClosed,
            other => LiveError::Connection(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StreamError::Send("broken pipe".into());
        assert_eq!(err.to_string(), "Send error: broken pipe");
    }

    #[test]
    fn test_into_live_error() {
        let err: LiveError = StreamError::ConnectionClosed.into();
        assert!(err.is_connection_closed());

        let err: LiveError = StreamError::Receive("reset".into()).into();
        assert!(matches!(err, LiveError::Connection(ref m) if m == "Receive error: reset"));
        assert!(err.is_fatal());
    }
}
