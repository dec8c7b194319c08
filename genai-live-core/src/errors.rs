//! Error types for genai-live.
//!
//! Every fallible operation in the workspace eventually reports a
//! [`LiveError`]. The variants mirror the failure taxonomy of a live session:
//! caller input that matches no known shape, input that matches a shape but
//! fails validation, protocol rules violated before anything is sent, inbound
//! frames that cannot be parsed, and connection-level failures.
//!
//! Nothing in this workspace retries on its own; retry policy belongs to the
//! caller, which can use [`LiveError::is_fatal`] to decide.

use thiserror::Error;

/// The main error type for genai-live operations.
#[derive(Error, Debug)]
pub enum LiveError {
    /// Caller input matched none of the recognized input shapes.
    #[error("Unsupported input type \"{type_name}\" or input content \"{value}\"")]
    InputShape {
        /// Outer type of the rejected input.
        type_name: String,
        /// Debug rendering of the rejected value.
        value: String,
    },

    /// Input matched a shape but failed structural validation.
    #[error("Invalid {shape}: {message} (value: {value})")]
    SchemaValidation {
        /// The shape the input was matched against.
        shape: &'static str,
        /// What was wrong with it.
        message: String,
        /// The offending value.
        value: String,
    },

    /// A protocol rule was violated before any frame was sent.
    #[error("Protocol invariant violated: {0}")]
    ProtocolInvariant(String),

    /// An inbound frame could not be parsed.
    #[error("Failed to parse frame: {message} (frame: {frame})")]
    FrameParse {
        /// Parser message.
        message: String,
        /// The raw frame, lossily decoded.
        frame: String,
    },

    /// Handshake or socket-open failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The connection was closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credentials could not be obtained.
    #[error("Credentials error: {0}")]
    Credentials(String),
}

/// Result type alias using [`LiveError`].
pub type LiveResult<T> = std::result::Result<T, LiveError>;

/// Message used when a function response lacks the id the Google AI
/// backend requires.
pub const FUNCTION_RESPONSE_REQUIRES_ID: &str = "FunctionResponse request must have an `id` field \
     from the response of a ToolCall.FunctionCalls in Google AI.";

impl LiveError {
    /// Create an input-shape error from a type name and the rendered value.
    pub fn input_shape(type_name: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self::InputShape {
            type_name: type_name.into(),
            value: value.to_string(),
        }
    }

    /// Create a schema validation error.
    pub fn schema(
        shape: &'static str,
        message: impl Into<String>,
        value: impl std::fmt::Display,
    ) -> Self {
        Self::SchemaValidation {
            shape,
            message: message.into(),
            value: value.to_string(),
        }
    }

    /// Error for a function response without an id on a dialect that needs one.
    pub fn missing_function_response_id() -> Self {
        Self::ProtocolInvariant(FUNCTION_RESPONSE_REQUIRES_ID.to_string())
    }

    /// Create a frame parse error from the raw frame bytes.
    pub fn frame_parse(message: impl Into<String>, frame: &[u8]) -> Self {
        Self::FrameParse {
            message: message.into(),
            frame: String::from_utf8_lossy(frame).into_owned(),
        }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error signals that the connection has closed.
    #[must_use]
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }

    /// Whether the session that produced this error is unusable afterwards.
    ///
    /// Input and frame errors leave the socket open; connection errors don't.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::ConnectionClosed)
    }
}
