//! Duplex frame transports.
//!
//! A live session talks to the server through two halves: a [`FrameSink`]
//! that writes text frames and a [`FrameSource`] that reads inbound frames.
//! The WebSocket transport lives in [`crate::websocket`]; [`MemoryTransport`]
//! is an in-process stand-in used by tests.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::{StreamError, StreamResult};

/// Write half of a transport.
#[async_trait]
pub trait FrameSink: Send {
    /// Send one text frame.
    async fn send_text(&mut self, frame: String) -> StreamResult<()>;

    /// Close the connection.
    async fn close(&mut self) -> StreamResult<()>;
}

/// Read half of a transport.
///
/// `next_frame` must be cancel-safe: dropping the future before it completes
/// must not lose a frame that was already read from the socket.
#[async_trait]
pub trait FrameSource: Send {
    /// Next data frame, or `None` once the connection has closed.
    async fn next_frame(&mut self) -> Option<StreamResult<Bytes>>;
}

/// Boxed write half.
pub type BoxedFrameSink = Box<dyn FrameSink>;
/// Boxed read half.
pub type BoxedFrameSource = Box<dyn FrameSource>;

/// A connected duplex transport.
pub trait LiveTransport: Send {
    /// Split into independent write and read halves.
    fn into_split(self) -> (BoxedFrameSink, BoxedFrameSource);
}

/// In-memory transport for testing.
///
/// Frames the client sends are recorded and forwarded to the paired
/// [`MemoryPeer`]; frames the peer pushes are delivered to the client.
pub struct MemoryTransport {
    outbound: mpsc::UnboundedSender<String>,
    inbound: mpsc::UnboundedReceiver<StreamResult<Bytes>>,
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

/// The server side of a [`MemoryTransport`].
pub struct MemoryPeer {
    outbound: mpsc::UnboundedReceiver<String>,
    inbound: Option<mpsc::UnboundedSender<StreamResult<Bytes>>>,
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryTransport {
    /// Create a connected transport and its peer.
    pub fn pair() -> (Self, MemoryPeer) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));

        let transport = Self {
            outbound: outbound_tx,
            inbound: inbound_rx,
            sent: Arc::clone(&sent),
            closed: Arc::clone(&closed),
        };
        let peer = MemoryPeer {
            outbound: outbound_rx,
            inbound: Some(inbound_tx),
            sent,
            closed,
        };
        (transport, peer)
    }
}

impl LiveTransport for MemoryTransport {
    fn into_split(self) -> (BoxedFrameSink, BoxedFrameSource) {
        let sink = MemorySink {
            outbound: self.outbound,
            sent: self.sent,
            closed: self.closed,
        };
        let source = MemorySource {
            inbound: self.inbound,
        };
        (Box::new(sink), Box::new(source))
    }
}

struct MemorySink {
    outbound: mpsc::UnboundedSender<String>,
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl FrameSink for MemorySink {
    async fn send_text(&mut self, frame: String) -> StreamResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StreamError::ConnectionClosed);
        }
        self.sent.lock().push(frame.clone());
        self.outbound
            .send(frame)
            .map_err(|_| StreamError::ConnectionClosed)
    }

    async fn close(&mut self) -> StreamResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct MemorySource {
    inbound: mpsc::UnboundedReceiver<StreamResult<Bytes>>,
}

#[async_trait]
impl FrameSource for MemorySource {
    async fn next_frame(&mut self) -> Option<StreamResult<Bytes>> {
        self.inbound.recv().await
    }
}

impl MemoryPeer {
    /// Deliver a frame to the client.
    pub fn push(&self, frame: impl Into<String>) {
        self.push_result(Ok(Bytes::from(frame.into())));
    }

    /// Deliver a transport error to the client.
    pub fn push_error(&self, err: StreamError) {
        self.push_result(Err(err));
    }

    fn push_result(&self, frame: StreamResult<Bytes>) {
        if let Some(inbound) = &self.inbound {
            // Ignored once the client has dropped its source.
            let _ = inbound.send(frame);
        }
    }

    /// End the inbound direction; the client's next read returns `None`.
    pub fn hang_up(&mut self) {
        self.inbound = None;
    }

    /// Wait for the next frame the client sends.
    pub async fn next_sent(&mut self) -> Option<String> {
        self.outbound.recv().await
    }

    /// Every frame the client has sent so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Whether the client closed its side.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport_roundtrip() {
        let (transport, mut peer) = MemoryTransport::pair();
        let (mut sink, mut source) = transport.into_split();

        sink.send_text("hello".into()).await.unwrap();
        assert_eq!(peer.next_sent().await.as_deref(), Some("hello"));
        assert_eq!(peer.sent(), vec!["hello".to_string()]);

        peer.push("{\"setupComplete\":{}}");
        let frame = source.next_frame().await.unwrap().unwrap();
        assert_eq!(&frame[..], b"{\"setupComplete\":{}}");
    }

    #[tokio::test]
    async fn test_memory_transport_close() {
        let (transport, peer) = MemoryTransport::pair();
        let (mut sink, _source) = transport.into_split();
        assert!(!peer.is_closed());

        sink.close().await.unwrap();
        assert!(peer.is_closed());
        assert!(matches!(
            sink.send_text("late".into()).await,
            Err(StreamError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_memory_peer_hang_up() {
        let (transport, mut peer) = MemoryTransport::pair();
        let (_sink, mut source) = transport.into_split();

        peer.push_error(StreamError::Receive("reset".into()));
        assert!(matches!(
            source.next_frame().await,
            Some(Err(StreamError::Receive(_)))
        ));

        peer.hang_up();
        assert!(source.next_frame().await.is_none());
    }
}
