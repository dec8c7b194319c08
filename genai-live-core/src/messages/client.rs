//! Client-to-server messages.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::content::Content;
use super::parts::Blob;

/// The result of a function call, sent back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Name of the function that was called.
    pub name: String,
    /// Response payload.
    pub response: JsonValue,
    /// Id of the originating call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl FunctionResponse {
    /// Create a function response without an id.
    pub fn new(name: impl Into<String>, response: JsonValue) -> Self {
        Self {
            name: name.into(),
            response,
            id: None,
        }
    }

    /// Set the id of the originating call.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Whether the response carries a non-empty id.
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Incremental conversation update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientContent {
    /// Turns to append to the conversation.
    #[serde(default)]
    pub turns: Vec<Content>,
    /// Whether the model should start generating after these turns.
    #[serde(default)]
    pub turn_complete: bool,
}

impl ClientContent {
    /// Create a content update.
    pub fn new(turns: Vec<Content>, turn_complete: bool) -> Self {
        Self {
            turns,
            turn_complete,
        }
    }
}

/// Realtime media chunks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealtimeInput {
    /// The chunks, in order.
    #[serde(default)]
    pub media_chunks: Vec<Blob>,
}

impl RealtimeInput {
    /// Create realtime input from chunks.
    pub fn new(media_chunks: Vec<Blob>) -> Self {
        Self { media_chunks }
    }

    /// Realtime input carrying one chunk.
    pub fn single(blob: Blob) -> Self {
        Self::new(vec![blob])
    }
}

/// Responses to one or more tool calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// The responses.
    #[serde(default)]
    pub function_responses: Vec<FunctionResponse>,
}

impl ToolResponse {
    /// Create a tool response.
    pub fn new(function_responses: Vec<FunctionResponse>) -> Self {
        Self { function_responses }
    }
}

/// A canonical, dialect-neutral client message.
///
/// Each variant becomes exactly one outbound frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Conversation turns.
    #[serde(rename = "client_content")]
    ContentUpdate(ClientContent),
    /// Streamed media.
    #[serde(rename = "realtime_input")]
    RealtimeChunk(RealtimeInput),
    /// Tool call results.
    #[serde(rename = "tool_response")]
    ToolResponse(ToolResponse),
}

impl ClientMessage {
    /// Single user text turn.
    pub fn text(text: impl Into<String>, turn_complete: bool) -> Self {
        Self::ContentUpdate(ClientContent::new(vec![Content::user(text)], turn_complete))
    }

    /// Single realtime chunk.
    pub fn realtime(blob: Blob) -> Self {
        Self::RealtimeChunk(RealtimeInput::single(blob))
    }

    /// Wire key of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ContentUpdate(_) => "client_content",
            Self::RealtimeChunk(_) => "realtime_input",
            Self::ToolResponse(_) => "tool_response",
        }
    }
}

impl From<ClientContent> for ClientMessage {
    fn from(content: ClientContent) -> Self {
        Self::ContentUpdate(content)
    }
}

impl From<RealtimeInput> for ClientMessage {
    fn from(input: RealtimeInput) -> Self {
        Self::RealtimeChunk(input)
    }
}

impl From<ToolResponse> for ClientMessage {
    fn from(response: ToolResponse) -> Self {
        Self::ToolResponse(response)
    }
}
