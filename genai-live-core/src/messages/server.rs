//! Server-to-client messages.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::content::Content;
use super::parts::Part;

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Call id, echoed back in the matching response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name.
    pub name: String,
    /// Arguments.
    #[serde(default)]
    pub args: JsonValue,
}

/// Incremental model output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerContent {
    /// Content generated so far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_turn: Option<Content>,
    /// Set when the model finished its turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_complete: Option<bool>,
    /// Set when generation was interrupted by client input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted: Option<bool>,
}

/// Function calls the client should execute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// The calls.
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
}

/// Previously issued calls the client should abandon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallCancellation {
    /// Ids of the cancelled calls.
    #[serde(default)]
    pub ids: Vec<String>,
}

/// A canonical, dialect-neutral server message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerMessage {
    /// Model output.
    ServerContent(ServerContent),
    /// Tool call request.
    ToolCall(ToolCall),
    /// Tool call cancellation.
    ToolCallCancellation(ToolCallCancellation),
    /// Handshake acknowledgement.
    SetupComplete,
    /// A frame with none of the known keys, kept verbatim.
    Unrecognized(JsonValue),
}

impl ServerMessage {
    /// Whether this message ends the model's turn.
    #[must_use]
    pub fn is_turn_complete(&self) -> bool {
        matches!(
            self,
            Self::ServerContent(ServerContent {
                turn_complete: Some(true),
                ..
            })
        )
    }

    /// Whether this message reports an interruption.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            Self::ServerContent(ServerContent {
                interrupted: Some(true),
                ..
            })
        )
    }

    /// Model turn, if this is server content carrying one.
    #[must_use]
    pub fn model_turn(&self) -> Option<&Content> {
        match self {
            Self::ServerContent(content) => content.model_turn.as_ref(),
            _ => None,
        }
    }

    /// Concatenated text of the model turn.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.model_turn().and_then(Content::text)
    }

    /// Inline data chunks of the model turn, e.g. audio.
    #[must_use]
    pub fn data(&self) -> Vec<Bytes> {
        self.model_turn()
            .map(|turn| {
                turn.parts
                    .iter()
                    .filter_map(Part::as_blob)
                    .map(|blob| blob.data.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Function calls, if this is a tool call.
    #[must_use]
    pub fn function_calls(&self) -> &[FunctionCall] {
        match self {
            Self::ToolCall(call) => &call.function_calls,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::parts::Part;

    #[test]
    fn test_turn_complete_requires_explicit_true() {
        let done = ServerMessage::ServerContent(ServerContent {
            turn_complete: Some(true),
            ..Default::default()
        });
        let not_done = ServerMessage::ServerContent(ServerContent {
            turn_complete: Some(false),
            ..Default::default()
        });
        assert!(done.is_turn_complete());
        assert!(!not_done.is_turn_complete());
        assert!(!ServerMessage::ServerContent(ServerContent::default()).is_turn_complete());
        assert!(!ServerMessage::SetupComplete.is_turn_complete());
    }

    #[test]
    fn test_text_and_data() {
        let msg = ServerMessage::ServerContent(ServerContent {
            model_turn: Some(Content::model_parts(vec![
                Part::text("Hi"),
                Part::bytes(vec![1u8, 2, 3], "audio/pcm"),
            ])),
            ..Default::default()
        });
        assert_eq!(msg.text().as_deref(), Some("Hi"));
        assert_eq!(msg.data(), vec![Bytes::from_static(&[1, 2, 3])]);
    }

    #[test]
    fn test_function_calls() {
        let msg = ServerMessage::ToolCall(ToolCall {
            function_calls: vec![FunctionCall {
                id: Some("c1".into()),
                name: "lookup".into(),
                args: serde_json::json!({"q": "x"}),
            }],
        });
        assert_eq!(msg.function_calls().len(), 1);
        assert!(ServerMessage::SetupComplete.function_calls().is_empty());
    }
}
