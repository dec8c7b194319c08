//! Caller input shapes.
//!
//! [`LiveInput`] is everything a session's `send` accepts before
//! normalization. Most callers never name it: the `From` impls let
//! strings, blobs, turns, JSON values and canonical messages be passed
//! directly.

use serde_json::Value as JsonValue;
use std::fmt;

use crate::messages::{
    Blob, ClientContent, ClientMessage, Content, FunctionResponse, Part, RealtimeInput,
    ToolResponse,
};

/// Polymorphic caller input.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveInput {
    /// No input; sends an empty completed turn.
    Empty,
    /// Plain text.
    Text(String),
    /// A typed blob.
    Blob(Blob),
    /// A typed content part.
    Part(Part),
    /// A typed turn.
    Content(Content),
    /// A typed function response.
    FunctionResponse(FunctionResponse),
    /// Duck-typed JSON record or list.
    Json(JsonValue),
    /// A heterogeneous list.
    List(Vec<LiveInput>),
    /// An already-canonical message.
    Message(ClientMessage),
    /// An already-canonical content update.
    ClientContent(ClientContent),
    /// Already-canonical realtime input.
    RealtimeInput(RealtimeInput),
    /// An already-canonical tool response.
    ToolResponse(ToolResponse),
}

impl LiveInput {
    /// Name of the outer shape, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "str",
            Self::Blob(_) => "Blob",
            Self::Part(_) => "Part",
            Self::Content(_) => "Content",
            Self::FunctionResponse(_) => "FunctionResponse",
            Self::Json(value) => json_type_name(value),
            Self::List(_) => "list",
            Self::Message(_) => "ClientMessage",
            Self::ClientContent(_) => "ClientContent",
            Self::RealtimeInput(_) => "RealtimeInput",
            Self::ToolResponse(_) => "ToolResponse",
        }
    }
}

/// JSON type name as reported in errors.
pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "int",
        JsonValue::String(_) => "str",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "dict",
    }
}

impl fmt::Display for LiveInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Json(value) => write!(f, "{}", value),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            other => write!(f, "{:?}", other),
        }
    }
}

impl Default for LiveInput {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<()> for LiveInput {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<&str> for LiveInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for LiveInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for LiveInput {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<Blob> for LiveInput {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Part> for LiveInput {
    fn from(part: Part) -> Self {
        Self::Part(part)
    }
}

impl From<Content> for LiveInput {
    fn from(content: Content) -> Self {
        Self::Content(content)
    }
}

impl From<FunctionResponse> for LiveInput {
    fn from(response: FunctionResponse) -> Self {
        Self::FunctionResponse(response)
    }
}

impl From<JsonValue> for LiveInput {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<ClientMessage> for LiveInput {
    fn from(message: ClientMessage) -> Self {
        Self::Message(message)
    }
}

impl From<ClientContent> for LiveInput {
    fn from(content: ClientContent) -> Self {
        Self::ClientContent(content)
    }
}

impl From<RealtimeInput> for LiveInput {
    fn from(input: RealtimeInput) -> Self {
        Self::RealtimeInput(input)
    }
}

impl From<ToolResponse> for LiveInput {
    fn from(response: ToolResponse) -> Self {
        Self::ToolResponse(response)
    }
}

impl<T: Into<LiveInput>> From<Vec<T>> for LiveInput {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<LiveInput>> From<Option<T>> for LiveInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}
