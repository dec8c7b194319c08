//! Connection setup.
//!
//! Opening a session is a two-step exchange: the client sends a `setup`
//! frame naming the model and its configuration, then waits for the server
//! to acknowledge it. Only then is a [`Session`] handed out.

use genai_live_core::{LiveConnectConfig, LiveError, LiveResult, ServerMessage};
use genai_live_models::BoxedCodec;
use tracing::{debug, info, warn};

use crate::session::Session;
use crate::transport::LiveTransport;

#[cfg(feature = "websocket")]
use crate::websocket::{WebSocketConfig, WebSocketTransport};
#[cfg(feature = "websocket")]
use genai_live_providers::LiveProvider;

/// Resolve the provider's endpoint, open a WebSocket, and run the handshake.
///
/// Credential and configuration problems keep their own error kinds; every
/// failure after that is a [`LiveError::Connection`].
#[cfg(feature = "websocket")]
pub async fn connect(
    provider: &dyn LiveProvider,
    model: &str,
    config: Option<&LiveConnectConfig>,
) -> LiveResult<Session> {
    let endpoint = provider.endpoint().await?;
    info!(
        provider = provider.name(),
        url = %endpoint.redacted_url(),
        model,
        "Opening live connection"
    );

    let transport = WebSocketTransport::connect(&WebSocketConfig::from(endpoint))
        .await
        .map_err(|e| LiveError::connection(format!("failed to open socket: {}", e)))?;

    handshake(transport, provider.codec(), model, config).await
}

/// Run the setup exchange over an already-open transport.
pub async fn handshake<T: LiveTransport>(
    transport: T,
    codec: BoxedCodec,
    model: &str,
    config: Option<&LiveConnectConfig>,
) -> LiveResult<Session> {
    let default_config = LiveConnectConfig::default();
    let setup = codec.encode_setup(model, config.unwrap_or(&default_config))?;
    debug!(dialect = %codec.dialect(), setup = %setup, "Sending setup");

    let (mut sink, mut source) = transport.into_split();
    sink.send_text(setup)
        .await
        .map_err(|e| LiveError::connection(format!("failed to send setup: {}", e)))?;

    let frame = match source.next_frame().await {
        Some(Ok(frame)) => frame,
        Some(Err(e)) => {
            return Err(LiveError::connection(format!(
                "failed to read setup acknowledgement: {}",
                e
            )))
        }
        None => {
            return Err(LiveError::connection(
                "connection closed before setup acknowledgement",
            ))
        }
    };

    let ack = codec
        .decode(&frame)
        .map_err(|e| LiveError::connection(format!("malformed setup acknowledgement: {}", e)))?;
    match &ack {
        ServerMessage::SetupComplete => {}
        ServerMessage::Unrecognized(payload) if !payload.is_object() => {
            return Err(LiveError::connection(format!(
                "malformed setup acknowledgement: {}",
                String::from_utf8_lossy(&frame)
            )))
        }
        other => warn!(ack = ?other, "Unexpected setup acknowledgement"),
    }
    info!(ack = %String::from_utf8_lossy(&frame), "Live session established");

    let model = codec.resolve_model(model);
    Ok(Session::new(codec, model, sink, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use crate::transport::MemoryTransport;
    use genai_live_core::{Dialect, Modality};
    use genai_live_models::codec_for;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{json, Value as JsonValue};

    #[tokio::test]
    async fn test_handshake_sends_setup_first() {
        let (transport, mut peer) = MemoryTransport::pair();
        peer.push(json!({"setupComplete": {}}).to_string());

        let config = LiveConnectConfig::new().response_modalities(vec![Modality::Text]);
        let session = handshake(
            transport,
            codec_for(Dialect::GoogleAi),
            "gemini-2.0-flash-exp",
            Some(&config),
        )
        .await
        .unwrap();

        let setup: JsonValue = serde_json::from_str(&peer.next_sent().await.unwrap()).unwrap();
        assert_eq!(
            setup,
            json!({
                "setup": {
                    "model": "models/gemini-2.0-flash-exp",
                    "generationConfig": {"responseModalities": ["TEXT"]}
                }
            })
        );
        assert_eq!(session.model(), "models/gemini-2.0-flash-exp");
        assert_eq!(session.dialect(), Dialect::GoogleAi);
        assert!(session.is_open());
    }

    #[tokio::test]
    async fn test_vertex_setup_defaults_to_audio() {
        let (transport, mut peer) = MemoryTransport::pair();
        peer.push(json!({"setupComplete": {}}).to_string());

        handshake(transport, codec_for(Dialect::VertexAi), "gemini-2.0-flash-exp", None)
            .await
            .unwrap();

        let setup: JsonValue = serde_json::from_str(&peer.next_sent().await.unwrap()).unwrap();
        assert_eq!(
            setup["setup"]["generationConfig"]["responseModalities"],
            json!(["AUDIO"])
        );
    }

    #[tokio::test]
    async fn test_closed_before_ack_is_connection_error() {
        let (transport, mut peer) = MemoryTransport::pair();
        peer.hang_up();

        let err = handshake(transport, codec_for(Dialect::GoogleAi), "m", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LiveError::Connection(_)));
    }

    #[tokio::test]
    async fn test_malformed_ack_is_connection_error() {
        let (transport, peer) = MemoryTransport::pair();
        peer.push("<html>502</html>");

        let err = handshake(transport, codec_for(Dialect::GoogleAi), "m", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LiveError::Connection(ref m) if m.contains("malformed")));
    }

    #[tokio::test]
    async fn test_transport_error_before_ack() {
        let (transport, peer) = MemoryTransport::pair();
        peer.push_error(StreamError::Receive("reset by peer".into()));

        let err = handshake(transport, codec_for(Dialect::GoogleAi), "m", None)
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[rstest]
    #[case("")]
    #[case("42")]
    #[case("null")]
    #[case("[1,2]")]
    #[case("\"error\"")]
    #[tokio::test]
    async fn test_non_object_ack_is_connection_error(#[case] ack: &str) {
        let (transport, peer) = MemoryTransport::pair();
        peer.push(ack);

        let err = handshake(transport, codec_for(Dialect::GoogleAi), "m", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LiveError::Connection(ref m) if m.contains("malformed")));
    }

    #[tokio::test]
    async fn test_other_ack_is_accepted() {
        let (transport, peer) = MemoryTransport::pair();
        peer.push("{}");

        let session = handshake(transport, codec_for(Dialect::GoogleAi), "m", None)
            .await
            .unwrap();
        assert!(session.is_open());
    }
}
