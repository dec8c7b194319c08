//! Entry point for opening live sessions.
//!
//! # Examples
//!
//! ```rust,ignore
//! use genai_live::LiveClient;
//!
//! // Google AI or Vertex AI, depending on GOOGLE_GENAI_USE_VERTEXAI
//! let client = LiveClient::from_env()?;
//! let mut session = client.connect("gemini-2.0-flash-exp").await?;
//! ```
//!
//! ```rust,ignore
//! // Provider picked from the model string
//! let (client, model) = LiveClient::infer("vertex:gemini-2.0-flash-exp")?;
//! let session = client.connect(&model).await?;
//! ```

use std::sync::Arc;

use genai_live_core::{Dialect, LiveConnectConfig, LiveResult};
use genai_live_providers::{BoxedProvider, LiveProvider};
use genai_live_streaming::CoordinatorConfig;

#[cfg(feature = "websocket")]
use bytes::Bytes;
#[cfg(feature = "websocket")]
use futures::Stream;
#[cfg(feature = "websocket")]
use genai_live_streaming::{CoordinatedStream, Session, StreamCoordinator};

/// Opens live sessions against one provider.
#[derive(Debug, Clone)]
pub struct LiveClient {
    provider: BoxedProvider,
    config: LiveConnectConfig,
    coordinator: CoordinatorConfig,
}

impl LiveClient {
    /// Create a client for a provider.
    pub fn new(provider: impl LiveProvider + 'static) -> Self {
        Self::from_provider(Arc::new(provider))
    }

    /// Create a client for a shared provider.
    pub fn from_provider(provider: BoxedProvider) -> Self {
        Self {
            provider,
            config: LiveConnectConfig::default(),
            coordinator: CoordinatorConfig::default(),
        }
    }

    /// Create a client from environment variables.
    ///
    /// Uses Vertex AI when `GOOGLE_GENAI_USE_VERTEXAI` is `true` or `1`,
    /// and Google AI otherwise.
    pub fn from_env() -> LiveResult<Self> {
        Ok(Self::from_provider(genai_live_providers::provider_from_env()?))
    }

    /// Pick a provider from a model string such as `vertex:gemini-2.0-flash-exp`.
    ///
    /// Returns the client and the model name without its prefix.
    pub fn infer(model: &str) -> LiveResult<(Self, String)> {
        let (provider, model) = genai_live_providers::from_env().resolve(model)?;
        Ok((Self::from_provider(provider), model))
    }

    /// Default connection settings for [`connect`](Self::connect).
    #[must_use]
    pub fn with_config(mut self, config: LiveConnectConfig) -> Self {
        self.config = config;
        self
    }

    /// Settings for streams started with [`start_stream`](Self::start_stream).
    #[must_use]
    pub fn with_coordinator_config(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator = config;
        self
    }

    /// The provider in use.
    pub fn provider(&self) -> &BoxedProvider {
        &self.provider
    }

    /// Wire dialect of the provider.
    pub fn dialect(&self) -> Dialect {
        self.provider.dialect()
    }

    /// Default connection settings.
    pub fn config(&self) -> &LiveConnectConfig {
        &self.config
    }

    /// Open a session with the default settings.
    #[cfg(feature = "websocket")]
    pub async fn connect(&self, model: &str) -> LiveResult<Session> {
        self.connect_with(model, &self.config).await
    }

    /// Open a session with explicit settings.
    #[cfg(feature = "websocket")]
    pub async fn connect_with(
        &self,
        model: &str,
        config: &LiveConnectConfig,
    ) -> LiveResult<Session> {
        genai_live_streaming::connect(self.provider.as_ref(), model, Some(config)).await
    }

    /// Open a session and stream `source` into it as realtime input.
    #[cfg(feature = "websocket")]
    pub async fn start_stream<S>(
        &self,
        model: &str,
        source: S,
        mime_type: impl Into<String>,
    ) -> LiveResult<CoordinatedStream>
    where
        S: Stream<Item = Bytes> + Send + 'static,
    {
        let session = self.connect(model).await?;
        Ok(StreamCoordinator::new(self.coordinator.clone()).spawn(session, source, mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use genai_live_core::LiveError;
    use genai_live_providers::{GoogleLiveProvider, StaticToken, VertexLiveProvider};
    use genai_live_streaming::{handshake, MemoryTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_client_from_provider() {
        let client = LiveClient::new(GoogleLiveProvider::new("key"))
            .with_config(LiveConnectConfig::new().temperature(0.2));
        assert_eq!(client.dialect(), Dialect::GoogleAi);
        assert_eq!(client.provider().name(), "google");
        assert!(client.config().generation_config.is_some());

        let client = LiveClient::new(
            VertexLiveProvider::new("proj", "us-central1").with_token_source(StaticToken::new("t")),
        );
        assert_eq!(client.dialect(), Dialect::VertexAi);
    }

    #[test]
    fn test_from_env_selects_dialect() {
        std::env::set_var("GOOGLE_API_KEY", "test-key");
        std::env::set_var("VERTEX_PROJECT", "test-project");

        std::env::remove_var("GOOGLE_GENAI_USE_VERTEXAI");
        assert_eq!(LiveClient::from_env().unwrap().dialect(), Dialect::GoogleAi);

        std::env::set_var("GOOGLE_GENAI_USE_VERTEXAI", "true");
        assert_eq!(LiveClient::from_env().unwrap().dialect(), Dialect::VertexAi);

        let (client, model) = LiveClient::infer("google:gemini-2.0-flash-exp").unwrap();
        assert_eq!(client.dialect(), Dialect::GoogleAi);
        assert_eq!(model, "gemini-2.0-flash-exp");

        let (client, _) = LiveClient::infer("gemini-2.0-flash-exp").unwrap();
        assert_eq!(client.dialect(), Dialect::VertexAi);

        std::env::remove_var("GOOGLE_GENAI_USE_VERTEXAI");
        std::env::remove_var("GOOGLE_API_KEY");
        std::env::remove_var("VERTEX_PROJECT");

        assert!(matches!(
            LiveClient::infer("openai:gpt-4o"),
            Err(LiveError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_conversation_over_memory_transport() {
        let (transport, mut peer) = MemoryTransport::pair();
        peer.push(json!({"setupComplete": {}}).to_string());

        let provider = GoogleLiveProvider::new("key");
        let mut session = handshake(transport, provider.codec(), "gemini-2.0-flash-exp", None)
            .await
            .unwrap();
        let _setup = peer.next_sent().await.unwrap();

        session.send("What's the weather in Paris?", true).await.unwrap();
        peer.push(
            json!({"toolCall": {"functionCalls": [
                {"id": "call-1", "name": "get_weather", "args": {"city": "Paris"}}
            ]}})
            .to_string(),
        );

        let call = session.receive_one().await.unwrap().unwrap();
        let calls = call.function_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id.as_deref(), Some("call-1"));

        session
            .send(
                json!({"name": "get_weather", "response": {"temp_c": 18}, "id": "call-1"}),
                false,
            )
            .await
            .unwrap();
        peer.push(
            json!({"serverContent": {
                "modelTurn": {"parts": [{"text": "18°C in Paris."}]},
                "turnComplete": true
            }})
            .to_string(),
        );

        let turn: Vec<_> = session.receive().collect().await;
        assert_eq!(turn.len(), 1);
        assert_eq!(
            turn[0].as_ref().unwrap().text().as_deref(),
            Some("18°C in Paris.")
        );

        let tool_frame: serde_json::Value =
            serde_json::from_str(&peer.sent()[2]).unwrap();
        assert_eq!(
            tool_frame,
            json!({"tool_response": {"function_responses": [
                {"name": "get_weather", "response": {"temp_c": 18}, "id": "call-1"}
            ]}})
        );

        session.close().await.unwrap();
        assert!(peer.is_closed());
    }
}
