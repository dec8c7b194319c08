//! # genai-live-models
//!
//! Wire codecs for the live API.
//!
//! This crate translates the canonical messages of `genai-live-core` into the
//! frames each backend expects, and decodes server frames back:
//!
//! - **Google AI**: the Generative Language API, authenticated with an API key
//! - **Vertex AI**: Google Cloud's platform API, authenticated with a bearer token
//!
//! Pick a codec with [`codec_for`], or construct one from [`google`] directly.
//!
//! ## Example
//!
//! ```rust
//! use genai_live_models::{codec_for, DialectCodec};
//! use genai_live_core::{ClientMessage, Dialect};
//!
//! let codec = codec_for(Dialect::VertexAi);
//! let frame = codec.encode(&ClientMessage::text("Hello", true)).unwrap();
//! assert!(frame.starts_with(r#"{"client_content":"#));
//!
//! let msg = codec.decode(br#"{"serverContent": {"turnComplete": true}}"#).unwrap();
//! assert!(msg.is_turn_complete());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod codec;
pub mod google;

pub use codec::{codec_for, BoxedCodec, DialectCodec};
pub use google::{GoogleAiCodec, VertexAiCodec};
