//! # genai-live - Gemini Live sessions for Rust
//!
//! genai-live is a client for the bidirectional Gemini Live API. It opens a
//! persistent WebSocket session against Google AI or Vertex AI, turns loosely
//! shaped input into canonical messages, and streams server turns back.
//!
//! ## Quick Start
//!
//! ```ignore
//! use genai_live::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = LiveClient::from_env()?
//!         .with_config(LiveConnectConfig::new().response_modalities(vec![Modality::Text]));
//!     let mut session = client.connect("gemini-2.0-flash-exp").await?;
//!
//!     session.send("What is the capital of France?", true).await?;
//!     let mut turn = session.receive();
//!     while let Some(message) = turn.next().await {
//!         if let Some(text) = message?.text() {
//!             print!("{}", text);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `websocket` | tokio-tungstenite transport and `connect` | ✅ |
//! | `tracing-integration` | Tracing in the core normalizer | ❌ |
//! | `full` | All features | ❌ |
//!
//! ## Architecture
//!
//! - [`genai_live_core`] - Canonical messages, settings, errors, normalization
//! - [`genai_live_models`] - Google AI and Vertex AI wire codecs
//! - [`genai_live_providers`] - Endpoints and credentials
//! - [`genai_live_streaming`] - Handshake, sessions, and duplex streaming

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod client;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Canonical messages, settings, errors, and normalization.
pub use genai_live_core as core;

/// Wire codecs.
pub use genai_live_models as models;

/// Endpoints and credentials.
pub use genai_live_providers as providers;

/// Sessions and streaming.
pub use genai_live_streaming as streaming;

// ============================================================================
// Flat Re-exports
// ============================================================================

// Errors
pub use genai_live_core::{LiveError, LiveResult};

// Messages
pub use genai_live_core::{
    Blob, ClientContent, ClientMessage, Content, FunctionCall, FunctionResponse, LiveInput, Part,
    RealtimeInput, ServerContent, ServerMessage, ToolCall, ToolCallCancellation, ToolResponse,
};

// Settings
pub use genai_live_core::{
    Dialect, FunctionDeclaration, GenerationConfig, LiveConnectConfig, Modality, SpeechConfig,
    Tool,
};

// Normalization
pub use genai_live_core::{normalize, Normalizer};

// Codecs
pub use genai_live_models::{codec_for, BoxedCodec, DialectCodec, GoogleAiCodec, VertexAiCodec};

// Providers
pub use genai_live_providers::{
    BoxedProvider, EnvToken, GoogleLiveProvider, LiveProvider, ProviderConfig, ProviderError,
    StaticToken, TokenSource, VertexLiveProvider,
};

// Streaming
pub use genai_live_streaming::{
    handshake, CoordinatedStream, CoordinatorConfig, Session, StreamCoordinator, StreamError,
};

#[cfg(feature = "websocket")]
#[cfg_attr(docsrs, doc(cfg(feature = "websocket")))]
pub use genai_live_streaming::connect;

// Client
pub use client::LiveClient;

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient prelude for common imports.
///
/// ```ignore
/// use genai_live::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::{Dialect, LiveError, LiveInput, LiveResult};

    // Messages
    pub use crate::core::{
        Blob, ClientMessage, Content, FunctionCall, FunctionResponse, Part, ServerMessage,
    };

    // Settings
    pub use crate::core::{LiveConnectConfig, Modality, SpeechConfig, Tool};

    // Providers
    pub use crate::providers::{
        GoogleLiveProvider, LiveProvider, StaticToken, TokenSource, VertexLiveProvider,
    };

    // Streaming
    pub use crate::streaming::{CoordinatedStream, Session, StreamCoordinator};

    // Client
    pub use crate::client::LiveClient;
}

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of genai-live.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;
        let _ = LiveConnectConfig::new().response_modalities(vec![Modality::Text]);
        let _: fn() -> &'static str = crate::version;
    }
}
