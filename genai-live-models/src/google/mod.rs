//! Google AI / Vertex AI live codecs.
//!
//! - [`GoogleAiCodec`]: the Generative Language backend (API key)
//! - [`VertexAiCodec`]: the Vertex AI backend (bearer token)
//!
//! ## Example
//!
//! ```rust
//! use genai_live_models::google::GoogleAiCodec;
//! use genai_live_models::DialectCodec;
//! use genai_live_core::LiveConnectConfig;
//!
//! let codec = GoogleAiCodec::new();
//! let setup = codec
//!     .encode_setup("gemini-2.0-flash-exp", &LiveConnectConfig::default())
//!     .unwrap();
//! assert_eq!(setup, r#"{"setup":{"model":"models/gemini-2.0-flash-exp"}}"#);
//! ```

pub mod codec;
pub mod types;
pub mod vertex;

// Re-exports
pub use codec::{GoogleAiCodec, VertexAiCodec};
pub use vertex::{model_resource_name, publisher_model_path};

/// Common live model names.
pub mod models {
    /// Gemini 2.0 Flash (experimental, live-capable)
    pub const GEMINI_2_FLASH_EXP: &str = "gemini-2.0-flash-exp";
    /// Gemini 2.0 Flash Live
    pub const GEMINI_2_FLASH_LIVE: &str = "gemini-2.0-flash-live-001";
}
