//! # genai-live-core
//!
//! Core types, messages, and error handling for genai-live.
//!
//! This crate provides the foundational types used throughout the workspace:
//!
//! - **Messages**: Canonical, dialect-neutral client and server messages
//! - **Input**: The polymorphic [`LiveInput`] accepted by sessions
//! - **Normalization**: Resolving [`LiveInput`] into one [`ClientMessage`]
//! - **Settings**: The [`LiveConnectConfig`] sent during the setup handshake
//! - **Errors**: The [`LiveError`] taxonomy
//! - **Identifiers**: Session ids and per-owner id generators
//!
//! ## Feature Flags
//!
//! - `tracing-integration`: Enable tracing instrumentation
//! - `full`: Enable all optional features
//!
//! ## Example
//!
//! ```rust
//! use genai_live_core::{normalize, ClientMessage, Dialect, LiveError};
//! use serde_json::json;
//!
//! // Plain text becomes a user turn
//! let msg = normalize("Hello world!", true, Dialect::GoogleAi).unwrap();
//! assert_eq!(msg.kind(), "client_content");
//!
//! // A blob record becomes realtime input
//! let msg = normalize(json!({"data": [0, 1], "mime_type": "audio/pcm"}), false, Dialect::GoogleAi).unwrap();
//! assert!(matches!(msg, ClientMessage::RealtimeChunk(_)));
//!
//! // Google AI requires function response ids
//! let err = normalize(json!({"name": "f", "response": {}}), false, Dialect::GoogleAi).unwrap_err();
//! assert!(matches!(err, LiveError::ProtocolInvariant(_)));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod dialect;
pub mod errors;
pub mod identifier;
pub mod input;
pub mod messages;
pub mod normalize;
pub mod settings;

// Re-exports for convenience
pub use dialect::Dialect;
pub use errors::{LiveError, LiveResult, FUNCTION_RESPONSE_REQUIRES_ID};
pub use identifier::{generate_session_id, now_utc, IdGenerator};
pub use input::LiveInput;
pub use messages::{
    // Parts and turns
    Blob, Content, Part,
    // Client messages
    ClientContent, ClientMessage, FunctionResponse, RealtimeInput, ToolResponse,
    // Server messages
    FunctionCall, ServerContent, ServerMessage, ToolCall, ToolCallCancellation,
};
pub use normalize::{normalize, Normalizer};
pub use settings::{FunctionDeclaration, GenerationConfig, LiveConnectConfig, Modality, SpeechConfig, Tool};

/// Prelude module for common imports.
///
/// ```rust
/// use genai_live_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dialect::Dialect;
    pub use crate::errors::{LiveError, LiveResult};
    pub use crate::input::LiveInput;
    pub use crate::messages::{
        Blob, ClientContent, ClientMessage, Content, FunctionCall, FunctionResponse, Part,
        RealtimeInput, ServerContent, ServerMessage, ToolCall, ToolCallCancellation, ToolResponse,
    };
    pub use crate::normalize::{normalize, Normalizer};
    pub use crate::settings::{LiveConnectConfig, Modality, SpeechConfig, Tool};
}
