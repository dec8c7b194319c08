//! WebSocket transport.
//!
//! ## Example
//!
//! ```ignore
//! use genai_live_streaming::websocket::{WebSocketConfig, WebSocketTransport};
//!
//! let config = WebSocketConfig::new("wss://example.com/ws").with_auth(token);
//! let transport = WebSocketTransport::connect(&config).await?;
//! let (sink, source) = transport.into_split();
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use genai_live_providers::LiveEndpoint;
use tokio::net::TcpStream;
use std::io::ErrorKind;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream as TungsteniteStream};
use tracing::{debug, warn};

use crate::error::{StreamError, StreamResult};
use crate::transport::{BoxedFrameSink, BoxedFrameSource, FrameSink, FrameSource, LiveTransport};

type WsStream = TungsteniteStream<MaybeTlsStream<TcpStream>>;

/// WebSocket connection configuration.
#[derive(Clone)]
pub struct WebSocketConfig {
    /// WebSocket URL.
    pub url: String,
    /// Extra headers for the opening handshake.
    pub headers: Vec<(String, String)>,
}

impl WebSocketConfig {
    /// Create a new WebSocket config with the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set authorization header.
    #[must_use]
    pub fn with_auth(self, token: impl Into<String>) -> Self {
        self.with_header("Authorization", format!("Bearer {}", token.into()))
    }
}

impl std::fmt::Debug for WebSocketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let url = self.url.split('?').next().unwrap_or_default();
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("WebSocketConfig")
            .field("url", &url)
            .field("headers", &header_names)
            .finish()
    }
}

impl From<LiveEndpoint> for WebSocketConfig {
    fn from(endpoint: LiveEndpoint) -> Self {
        Self {
            url: endpoint.url,
            headers: endpoint.headers,
        }
    }
}

/// A connected WebSocket.
pub struct WebSocketTransport {
    inner: WsStream,
}

impl WebSocketTransport {
    /// Connect to a WebSocket endpoint.
    pub async fn connect(config: &WebSocketConfig) -> StreamResult<Self> {
        let mut request = config
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| StreamError::InvalidRequest(e.to_string()))?;

        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| StreamError::InvalidRequest(format!("header {}: {}", key, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| StreamError::InvalidRequest(format!("header {}: {}", key, e)))?;
            request.headers_mut().insert(name, value);
        }

        let (inner, response) = connect_async(request).await.map_err(StreamError::from_err)?;
        debug!(status = %response.status(), "WebSocket connected");

        Ok(Self { inner })
    }
}

impl LiveTransport for WebSocketTransport {
    fn into_split(self) -> (BoxedFrameSink, BoxedFrameSource) {
        // Both halves share the socket through a BiLock.
        let (sink, stream) = self.inner.split();
        (
            Box::new(WebSocketSink { inner: sink }),
            Box::new(WebSocketSource { inner: stream }),
        )
    }
}

struct WebSocketSink {
    inner: SplitSink<WsStream, WsMessage>,
}

#[async_trait]
impl FrameSink for WebSocketSink {
    async fn send_text(&mut self, frame: String) -> StreamResult<()> {
        self.inner
            .send(WsMessage::Text(frame))
            .await
            .map_err(|e| map_ws_error(e, StreamError::Send))
    }

    async fn close(&mut self) -> StreamResult<()> {
        match self.inner.close().await {
            Ok(()) => Ok(()),
            Err(e) if is_closed_error(&e) => Ok(()),
            Err(e) => Err(StreamError::Connection(e.to_string())),
        }
    }
}

struct WebSocketSource {
    inner: SplitStream<WsStream>,
}

#[async_trait]
impl FrameSource for WebSocketSource {
    async fn next_frame(&mut self) -> Option<StreamResult<Bytes>> {
        loop {
            match self.inner.next().await? {
                Ok(WsMessage::Text(text)) => return Some(Ok(Bytes::from(text))),
                Ok(WsMessage::Binary(data)) => return Some(Ok(Bytes::from(data))),
                Ok(WsMessage::Close(frame)) => {
                    match frame {
                        Some(frame) if frame.code != CloseCode::Normal => {
                            warn!(code = %frame.code, reason = %frame.reason, "Server closed the connection");
                        }
                        _ => debug!("Server closed the connection"),
                    }
                    return None;
                }
                // Pings are answered by tungstenite on the next write.
                Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) | Ok(WsMessage::Frame(_)) => {
                    continue
                }
                Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => return None,
                Err(e) => return Some(Err(map_ws_error(e, StreamError::Receive))),
            }
        }
    }
}

/// Whether the error means the peer is gone, cleanly or not.
fn is_closed_error(err: &WsError) -> bool {
    match err {
        WsError::ConnectionClosed
        | WsError::AlreadyClosed
        | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => true,
        WsError::Io(io) => matches!(
            io.kind(),
            ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::BrokenPipe
                | ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}

fn map_ws_error(err: WsError, other: fn(String) -> StreamError) -> StreamError {
    if is_closed_error(&err) {
        debug!(error = %err, "Connection closed");
        return StreamError::ConnectionClosed;
    }
    other(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_config() {
        let config = WebSocketConfig::new("wss://example.com/stream?key=secret")
            .with_auth("token123")
            .with_header("x-goog-user-project", "proj");

        assert_eq!(config.url, "wss://example.com/stream?key=secret");
        assert!(config
            .headers
            .iter()
            .any(|(k, v)| k == "Authorization" && v == "Bearer token123"));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("token123"));
    }

    #[test]
    fn test_config_from_endpoint() {
        let endpoint = LiveEndpoint::new("wss://host/ws").with_bearer("t");
        let config = WebSocketConfig::from(endpoint);
        assert_eq!(config.url, "wss://host/ws");
        assert_eq!(config.headers.len(), 1);
    }

    #[test]
    fn test_map_ws_error() {
        assert!(map_ws_error(WsError::ConnectionClosed, StreamError::Send).is_closed());
        assert!(matches!(
            map_ws_error(WsError::Utf8, StreamError::Receive),
            StreamError::Receive(_)
        ));
    }

    #[rstest]
    #[case(WsError::AlreadyClosed)]
    #[case(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake))]
    #[case(WsError::Io(std::io::Error::from(ErrorKind::ConnectionReset)))]
    #[case(WsError::Io(std::io::Error::from(ErrorKind::ConnectionAborted)))]
    #[case(WsError::Io(std::io::Error::from(ErrorKind::BrokenPipe)))]
    #[case(WsError::Io(std::io::Error::from(ErrorKind::UnexpectedEof)))]
    fn test_abrupt_close_maps_to_closed(#[case] err: WsError) {
        assert!(map_ws_error(err, StreamError::Receive).is_closed());
    }

    #[rstest]
    #[case(WsError::Io(std::io::Error::from(ErrorKind::PermissionDenied)))]
    #[case(WsError::Protocol(ProtocolError::HandshakeIncomplete))]
    fn test_other_errors_stay_receive_errors(#[case] err: WsError) {
        assert!(matches!(
            map_ws_error(err, StreamError::Receive),
            StreamError::Receive(_)
        ));
    }

    /// Accept one WebSocket handshake, then drop the TCP stream without a close frame.
    async fn abrupt_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            drop(ws);
        });
        format!("ws://{}/ws", addr)
    }

    #[tokio::test]
    async fn test_dropped_socket_ends_coordinated_stream_quietly() {
        use crate::coordinator::StreamCoordinator;
        use crate::session::Session;
        use genai_live_core::Dialect;
        use genai_live_models::codec_for;

        let url = abrupt_server().await;
        let transport = WebSocketTransport::connect(&WebSocketConfig::new(url))
            .await
            .unwrap();
        let (sink, source) = transport.into_split();
        let session = Session::new(codec_for(Dialect::GoogleAi), "models/m".into(), sink, source);

        let mut replies =
            StreamCoordinator::start(session, futures::stream::pending::<Bytes>(), "audio/pcm");
        let next = tokio::time::timeout(std::time::Duration::from_secs(5), replies.next())
            .await
            .unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_header() {
        let config = WebSocketConfig::new("ws://127.0.0.1:9/ws").with_header("bad header", "v");
        let result = WebSocketTransport::connect(&config).await;
        assert!(matches!(result, Err(StreamError::InvalidRequest(_))));
    }
}
