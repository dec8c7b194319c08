//! The dialect codec trait.
//!
//! A [`DialectCodec`] translates canonical messages into one backend's wire
//! frames and back. A session picks its codec once, at construction, and
//! never branches on the dialect afterwards.

use std::fmt::Debug;
use std::sync::Arc;

use genai_live_core::{ClientMessage, Dialect, LiveConnectConfig, LiveResult, ServerMessage};

use crate::google::{GoogleAiCodec, VertexAiCodec};

/// Translates between canonical messages and one backend's wire format.
pub trait DialectCodec: Send + Sync + Debug {
    /// The dialect this codec speaks.
    fn dialect(&self) -> Dialect;

    /// Resolve a caller-supplied model name to the resource name the backend
    /// expects in the setup frame.
    fn resolve_model(&self, model: &str) -> String;

    /// Build the setup frame sent as the first message of a session.
    fn encode_setup(&self, model: &str, config: &LiveConnectConfig) -> LiveResult<String>;

    /// Encode a canonical client message as one text frame.
    fn encode(&self, message: &ClientMessage) -> LiveResult<String>;

    /// Decode one inbound frame.
    ///
    /// An empty frame decodes to [`ServerMessage::Unrecognized`] with a null
    /// payload; invalid JSON is a frame parse error.
    fn decode(&self, frame: &[u8]) -> LiveResult<ServerMessage>;
}

/// Shared codec handle.
pub type BoxedCodec = Arc<dyn DialectCodec>;

/// Default codec for a dialect.
///
/// The Vertex AI codec returned here does not scope model paths to a
/// project; providers that know their project build their own.
#[must_use]
pub fn codec_for(dialect: Dialect) -> BoxedCodec {
    match dialect {
        Dialect::GoogleAi => Arc::new(GoogleAiCodec::new()),
        Dialect::VertexAi => Arc::new(VertexAiCodec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_for_dialect() {
        assert_eq!(codec_for(Dialect::GoogleAi).dialect(), Dialect::GoogleAi);
        assert_eq!(codec_for(Dialect::VertexAi).dialect(), Dialect::VertexAi);
    }
}
