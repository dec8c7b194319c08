//! Feed a continuous byte source into a session while draining replies.
//!
//! Two tasks share one session: a sender pulls chunks from the source and
//! sends each as realtime input, and a receiver reads server messages and
//! forwards them to the caller. When the source runs dry the sender cancels
//! the shared stop token; the receiver drops its in-flight read and settles.
//! If the server goes away first, the receiver fires the token instead.
//! There is no ordering between an outbound chunk and any inbound message.
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use genai_live_streaming::StreamCoordinator;
//!
//! let mut replies = StreamCoordinator::start(session, audio_chunks, "audio/pcm");
//! while let Some(message) = replies.next().await {
//!     println!("{:?}", message?.text());
//! }
//! let session = replies.finish().await?;
//! ```

use bytes::Bytes;
use futures::{Stream, StreamExt};
use genai_live_core::{Blob, ClientMessage, LiveError, LiveResult, ServerMessage};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::session::{Session, SessionReceiver, SessionSender};

/// Coordinator settings.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Messages buffered between the receiver task and the caller.
    pub channel_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
        }
    }
}

impl CoordinatorConfig {
    /// Set the channel capacity (at least 1).
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

/// Runs the sender and receiver tasks for one session.
#[derive(Debug, Clone, Default)]
pub struct StreamCoordinator {
    config: CoordinatorConfig,
}

impl StreamCoordinator {
    /// Create a coordinator with the given settings.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    /// Start streaming with default settings.
    pub fn start<S>(session: Session, source: S, mime_type: impl Into<String>) -> CoordinatedStream
    where
        S: Stream<Item = Bytes> + Send + 'static,
    {
        Self::default().spawn(session, source, mime_type)
    }

    /// Start streaming `source` into `session`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<S>(
        &self,
        session: Session,
        source: S,
        mime_type: impl Into<String>,
    ) -> CoordinatedStream
    where
        S: Stream<Item = Bytes> + Send + 'static,
    {
        debug!(session_id = %session.id(), "Starting coordinated stream");
        let (sender, receiver) = session.split();
        let stop = CancellationToken::new();
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));

        let send_task = tokio::spawn(send_loop(
            sender,
            source,
            mime_type.into(),
            tx.clone(),
            stop.clone(),
        ));
        let recv_task = tokio::spawn(receive_loop(receiver, tx, stop.clone()));

        CoordinatedStream {
            inner: ReceiverStream::new(rx),
            _cancel_on_drop: stop.clone().drop_guard(),
            stop,
            send_task,
            recv_task,
        }
    }
}

async fn send_loop<S>(
    mut sender: SessionSender,
    source: S,
    mime_type: String,
    tx: mpsc::Sender<LiveResult<ServerMessage>>,
    stop: CancellationToken,
) -> SessionSender
where
    S: Stream<Item = Bytes> + Send,
{
    let mut source = std::pin::pin!(source);
    let mut sent = 0usize;

    loop {
        let chunk = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            chunk = source.next() => chunk,
        };
        let Some(chunk) = chunk else {
            debug!(session_id = %sender.session_id(), chunks = sent, "Source exhausted");
            break;
        };

        let message = ClientMessage::realtime(Blob::new(chunk, mime_type.clone()));
        if let Err(err) = sender.send_message(&message).await {
            if !err.is_connection_closed() {
                warn!(session_id = %sender.session_id(), error = %err, "Failed to send chunk");
                let _ = tx.send(Err(err)).await;
            }
            break;
        }
        sent += 1;
        tokio::task::yield_now().await;
    }

    stop.cancel();
    sender
}

async fn receive_loop(
    mut receiver: SessionReceiver,
    tx: mpsc::Sender<LiveResult<ServerMessage>>,
    stop: CancellationToken,
) -> SessionReceiver {
    loop {
        let result = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            result = receiver.receive_one() => result,
        };

        match result {
            Ok(Some(message)) => {
                if tx.send(Ok(message)).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) if err.is_connection_closed() => {
                debug!(session_id = %receiver.session_id(), "Connection closed while receiving");
                break;
            }
            Err(err) => {
                let fatal = err.is_fatal();
                if tx.send(Err(err)).await.is_err() || fatal {
                    break;
                }
            }
        }
        tokio::task::yield_now().await;
    }

    // Nothing more will arrive; stop feeding a connection nobody reads.
    stop.cancel();
    receiver
}

pin_project! {
    /// Server messages produced while a source is streamed into a session.
    ///
    /// Ends once both tasks have settled. Dropping it stops both tasks.
    pub struct CoordinatedStream {
        #[pin]
        inner: ReceiverStream<LiveResult<ServerMessage>>,
        stop: CancellationToken,
        _cancel_on_drop: DropGuard,
        send_task: JoinHandle<SessionSender>,
        recv_task: JoinHandle<SessionReceiver>,
    }
}

impl CoordinatedStream {
    /// Stop both tasks without waiting for the source to run dry.
    pub fn abort(&self) {
        self.stop.cancel();
    }

    /// Whether the stop signal has fired.
    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Wait for both tasks to settle and get the session back.
    ///
    /// Undelivered messages are discarded. Waits for the source to run dry
    /// unless [`abort`](Self::abort) was called first.
    pub async fn finish(self) -> LiveResult<Session> {
        let Self {
            inner,
            stop: _,
            _cancel_on_drop: guard,
            send_task,
            recv_task,
        } = self;
        let _ = guard.disarm();
        drop(inner);

        let sender = send_task
            .await
            .map_err(|e| LiveError::connection(format!("sender task failed: {}", e)))?;
        let receiver = recv_task
            .await
            .map_err(|e| LiveError::connection(format!("receiver task failed: {}", e)))?;
        Session::reunite(sender, receiver)
    }
}

impl Stream for CoordinatedStream {
    type Item = LiveResult<ServerMessage>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use crate::transport::{LiveTransport, MemoryPeer, MemoryTransport};
    use genai_live_core::Dialect;
    use genai_live_models::codec_for;
    use serde_json::{json, Value as JsonValue};
    use tokio_stream::wrappers::UnboundedReceiverStream;

    fn session() -> (Session, MemoryPeer) {
        let (transport, peer) = MemoryTransport::pair();
        let (sink, source) = transport.into_split();
        let session = Session::new(codec_for(Dialect::GoogleAi), "models/test".into(), sink, source);
        (session, peer)
    }

    fn turn_complete_frame(text: &str) -> String {
        json!({
            "serverContent": {
                "modelTurn": {"role": "model", "parts": [{"text": text}]},
                "turnComplete": true
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_three_chunks_one_reply() {
        let (session, mut peer) = session();
        let (chunks, source) = mpsc::unbounded_channel::<Bytes>();
        let mut replies =
            StreamCoordinator::start(session, UnboundedReceiverStream::new(source), "audio/pcm");

        chunks.send(Bytes::from_static(b"one")).unwrap();
        chunks.send(Bytes::from_static(b"two")).unwrap();
        peer.next_sent().await.unwrap();
        peer.next_sent().await.unwrap();

        peer.push(turn_complete_frame("heard you"));
        let reply = replies.next().await.unwrap().unwrap();
        assert!(reply.is_turn_complete());
        assert_eq!(reply.text().as_deref(), Some("heard you"));

        chunks.send(Bytes::from_static(b"three")).unwrap();
        drop(chunks);

        assert!(replies.next().await.is_none());
        assert!(replies.is_stopped());

        let session = replies.finish().await.unwrap();
        assert!(session.is_open());

        let sent: Vec<JsonValue> = peer
            .sent()
            .iter()
            .map(|frame| serde_json::from_str(frame).unwrap())
            .collect();
        assert_eq!(sent.len(), 3);
        assert_eq!(
            sent[2],
            json!({"realtime_input": {"media_chunks": [{"data": "dGhyZWU=", "mime_type": "audio/pcm"}]}})
        );
    }

    #[tokio::test]
    async fn test_server_close_ends_quietly() {
        let (session, mut peer) = session();
        let (_chunks, source) = mpsc::unbounded_channel::<Bytes>();
        let mut replies =
            StreamCoordinator::start(session, UnboundedReceiverStream::new(source), "audio/pcm");

        peer.push_error(StreamError::ConnectionClosed);
        peer.hang_up();

        let first = tokio::time::timeout(std::time::Duration::from_secs(5), replies.next())
            .await
            .unwrap();
        assert!(first.is_none());

        replies.abort();
        let session = replies.finish().await.unwrap();
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_parse_error_is_forwarded_and_receiving_continues() {
        let (session, peer) = session();
        let (_chunks, source) = mpsc::unbounded_channel::<Bytes>();
        let mut replies =
            StreamCoordinator::start(session, UnboundedReceiverStream::new(source), "audio/pcm");

        peer.push("not json");
        peer.push(turn_complete_frame("ok"));

        assert!(matches!(
            replies.next().await,
            Some(Err(LiveError::FrameParse { .. }))
        ));
        assert!(replies.next().await.unwrap().unwrap().is_turn_complete());

        replies.abort();
        replies.finish().await.unwrap();
    }

    #[tokio::test]
    async fn test_abort_cancels_in_flight_read() {
        let (session, _peer) = session();
        let mut replies =
            StreamCoordinator::start(session, futures::stream::pending::<Bytes>(), "audio/pcm");

        replies.abort();
        assert!(replies.next().await.is_none());
        let session = replies.finish().await.unwrap();
        assert!(session.is_open());
    }

    #[test]
    fn test_config_capacity_floor() {
        let config = CoordinatorConfig::default().with_channel_capacity(0);
        assert_eq!(config.channel_capacity, 1);
    }
}
