//! Live sessions.
//!
//! A [`Session`] owns one negotiated connection. Every `send` writes exactly
//! one frame; [`Session::receive`] reads until the server ends its turn.
//! The codec is picked when the session is created, so nothing here branches
//! on the dialect.

use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use genai_live_core::{
    generate_session_id, now_utc, Blob, ClientMessage, Dialect, FunctionResponse, IdGenerator,
    LiveError, LiveInput, LiveResult, Normalizer, ServerMessage, ToolResponse,
};
use genai_live_models::BoxedCodec;
use tracing::debug;

use crate::transport::{BoxedFrameSink, BoxedFrameSource};

/// An open live session.
///
/// Not safe for more than one sender and one receiver at a time; use
/// [`split`](Self::split) to hand the halves to separate tasks.
pub struct Session {
    sender: SessionSender,
    receiver: SessionReceiver,
}

impl Session {
    pub(crate) fn new(
        codec: BoxedCodec,
        model: String,
        sink: BoxedFrameSink,
        source: BoxedFrameSource,
    ) -> Self {
        let id = generate_session_id();
        Self {
            sender: SessionSender {
                id: id.clone(),
                model,
                normalizer: Normalizer::new(codec.dialect()),
                codec: codec.clone(),
                sink: Some(sink),
                ids: IdGenerator::with_prefix(id.clone()),
                created_at: now_utc(),
            },
            receiver: SessionReceiver {
                id,
                codec,
                source: Some(source),
            },
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.sender.id
    }

    /// Model resource name sent in the setup frame.
    pub fn model(&self) -> &str {
        &self.sender.model
    }

    /// When the handshake completed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.sender.created_at
    }

    /// Wire dialect of this session.
    pub fn dialect(&self) -> Dialect {
        self.sender.codec.dialect()
    }

    /// Whether both directions are still open.
    pub fn is_open(&self) -> bool {
        self.sender.is_open() && self.receiver.is_open()
    }

    /// Next id from the session's own generator.
    pub fn next_id(&self) -> String {
        self.sender.next_id()
    }

    /// Normalize `input` and send it as one frame.
    ///
    /// `end_of_turn` only matters for content input.
    pub async fn send(&mut self, input: impl Into<LiveInput>, end_of_turn: bool) -> LiveResult<()> {
        self.sender.send(input, end_of_turn).await
    }

    /// Send an already-canonical message.
    pub async fn send_message(&mut self, message: &ClientMessage) -> LiveResult<()> {
        self.sender.send_message(message).await
    }

    /// Send a user text turn.
    pub async fn send_text(&mut self, text: impl Into<String>, end_of_turn: bool) -> LiveResult<()> {
        self.sender.send_text(text, end_of_turn).await
    }

    /// Send one realtime media chunk.
    pub async fn send_realtime(&mut self, blob: Blob) -> LiveResult<()> {
        self.sender.send_realtime(blob).await
    }

    /// Answer tool calls.
    pub async fn send_tool_response(
        &mut self,
        responses: impl IntoIterator<Item = FunctionResponse>,
    ) -> LiveResult<()> {
        self.sender.send_tool_response(responses).await
    }

    /// Messages up to and including the next turn-complete message.
    ///
    /// Call again for the following turn.
    pub fn receive(&mut self) -> BoxStream<'_, LiveResult<ServerMessage>> {
        self.receiver.receive()
    }

    /// Read exactly one message; `None` once the connection has closed.
    pub async fn receive_one(&mut self) -> LiveResult<Option<ServerMessage>> {
        self.receiver.receive_one().await
    }

    /// Close the connection. Safe to call more than once.
    pub async fn close(&mut self) -> LiveResult<()> {
        self.receiver.source = None;
        self.sender.close().await
    }

    /// Split into independent halves.
    pub fn split(self) -> (SessionSender, SessionReceiver) {
        (self.sender, self.receiver)
    }

    /// Put halves from [`split`](Self::split) back together.
    pub fn reunite(sender: SessionSender, receiver: SessionReceiver) -> LiveResult<Self> {
        if sender.id != receiver.id {
            return Err(LiveError::ProtocolInvariant(format!(
                "cannot reunite halves of sessions {} and {}",
                sender.id, receiver.id
            )));
        }
        Ok(Self { sender, receiver })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.sender.id)
            .field("model", &self.sender.model)
            .field("dialect", &self.dialect())
            .field("created_at", &self.sender.created_at)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Write half of a [`Session`].
pub struct SessionSender {
    id: String,
    model: String,
    codec: BoxedCodec,
    normalizer: Normalizer,
    sink: Option<BoxedFrameSink>,
    ids: IdGenerator,
    created_at: DateTime<Utc>,
}

impl SessionSender {
    /// Session identifier.
    pub fn session_id(&self) -> &str {
        &self.id
    }

    /// Whether this half can still send.
    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Next id from the session's own generator.
    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    /// Normalize `input` and send it as one frame.
    pub async fn send(&mut self, input: impl Into<LiveInput>, end_of_turn: bool) -> LiveResult<()> {
        let message = self.normalizer.normalize(input, end_of_turn)?;
        self.send_message(&message).await
    }

    /// Encode and send an already-canonical message.
    pub async fn send_message(&mut self, message: &ClientMessage) -> LiveResult<()> {
        let frame = self.codec.encode(message)?;
        let sink = self.sink.as_mut().ok_or(LiveError::ConnectionClosed)?;
        debug!(session_id = %self.id, kind = message.kind(), bytes = frame.len(), "Sending frame");
        sink.send_text(frame).await.map_err(LiveError::from)
    }

    /// Send a user text turn.
    pub async fn send_text(&mut self, text: impl Into<String>, end_of_turn: bool) -> LiveResult<()> {
        self.send_message(&ClientMessage::text(text, end_of_turn))
            .await
    }

    /// Send one realtime media chunk.
    pub async fn send_realtime(&mut self, blob: Blob) -> LiveResult<()> {
        self.send(blob, false).await
    }

    /// Answer tool calls.
    pub async fn send_tool_response(
        &mut self,
        responses: impl IntoIterator<Item = FunctionResponse>,
    ) -> LiveResult<()> {
        let message = ClientMessage::ToolResponse(ToolResponse::new(responses.into_iter().collect()));
        let message = self.normalizer.revalidate(message)?;
        self.send_message(&message).await
    }

    /// Close the connection.
    pub async fn close(&mut self) -> LiveResult<()> {
        if let Some(mut sink) = self.sink.take() {
            debug!(session_id = %self.id, "Closing session");
            if let Err(err) = sink.close().await {
                if !err.is_closed() {
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }
}

/// Read half of a [`Session`].
pub struct SessionReceiver {
    id: String,
    codec: BoxedCodec,
    source: Option<BoxedFrameSource>,
}

impl SessionReceiver {
    /// Session identifier.
    pub fn session_id(&self) -> &str {
        &self.id
    }

    /// Whether this half can still receive.
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Read exactly one message; `None` once the connection has closed.
    ///
    /// A frame that fails to parse is an error but leaves the connection
    /// open. Cancel-safe.
    pub async fn receive_one(&mut self) -> LiveResult<Option<ServerMessage>> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        match source.next_frame().await {
            Some(Ok(frame)) => {
                let message = self.codec.decode(&frame)?;
                debug!(
                    session_id = %self.id,
                    turn_complete = message.is_turn_complete(),
                    "Received message"
                );
                Ok(Some(message))
            }
            Some(Err(err)) => {
                if err.is_closed() {
                    self.source = None;
                }
                Err(err.into())
            }
            None => {
                debug!(session_id = %self.id, "Connection closed by server");
                self.source = None;
                Ok(None)
            }
        }
    }

    /// Messages up to and including the next turn-complete message.
    ///
    /// The stream also ends on an error or when the connection closes.
    pub fn receive(&mut self) -> BoxStream<'_, LiveResult<ServerMessage>> {
        stream::unfold(Some(self), |state| async move {
            let Some(receiver) = state else {
                return None;
            };
            match receiver.receive_one().await {
                Ok(Some(message)) => {
                    let next = if message.is_turn_complete() {
                        None
                    } else {
                        Some(receiver)
                    };
                    Some((Ok(message), next))
                }
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
        .boxed()
    }
}
