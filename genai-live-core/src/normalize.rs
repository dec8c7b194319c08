//! Input normalization.
//!
//! Turns any [`LiveInput`] into exactly one canonical [`ClientMessage`] or a
//! typed error. Resolution is first-match-wins, in this order:
//!
//! 1. Empty input: an empty completed turn.
//! 2. A single string: one user text turn.
//! 3. A record with a `data` field: a blob, sent as realtime input.
//! 4. A record with `name` and `response`: a single function response.
//! 5. A list containing any function-response record: a tool response.
//! 6. A list containing any string or content part: one content update.
//! 7. A list of blobs: realtime input.
//! 8. Already-canonical values, re-validated.
//! 9. Anything else is rejected.
//!
//! Normalization is pure: the same input, flag and dialect always produce the
//! same result.

use serde_json::{Map, Value as JsonValue};

use crate::dialect::Dialect;
use crate::errors::{LiveError, LiveResult};
use crate::input::{json_type_name, LiveInput};
use crate::messages::{
    Blob, ClientContent, ClientMessage, Content, FunctionResponse, Part, RealtimeInput,
    ToolResponse,
};

// Conditional tracing - use no-op macros when tracing feature is disabled
#[cfg(feature = "tracing-integration")]
use tracing::{debug, info};

#[cfg(not(feature = "tracing-integration"))]
macro_rules! debug { ($($arg:tt)*) => {} }
#[cfg(not(feature = "tracing-integration"))]
macro_rules! info { ($($arg:tt)*) => {} }

type JsonMap = Map<String, JsonValue>;

/// Normalize caller input for a dialect.
///
/// ```rust
/// use genai_live_core::{normalize, ClientMessage, Dialect};
///
/// let msg = normalize("Hello world!", true, Dialect::GoogleAi).unwrap();
/// match msg {
///     ClientMessage::ContentUpdate(content) => {
///         assert_eq!(content.turns.len(), 1);
///         assert!(content.turn_complete);
///     }
///     other => panic!("unexpected message: {other:?}"),
/// }
/// ```
pub fn normalize(
    input: impl Into<LiveInput>,
    end_of_turn: bool,
    dialect: Dialect,
) -> LiveResult<ClientMessage> {
    Normalizer::new(dialect).normalize(input, end_of_turn)
}

/// Normalizer bound to one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    dialect: Dialect,
}

/// A list element, classified once.
enum Element {
    Text(String),
    Part(Part),
    Content(Content),
    Blob(Blob),
    FunctionResponse(FunctionResponse),
    Record(JsonMap),
    Other(LiveInput),
}

impl Element {
    fn classify(input: LiveInput) -> Self {
        match input {
            LiveInput::Text(text) | LiveInput::Json(JsonValue::String(text)) => Self::Text(text),
            LiveInput::Part(part) => Self::Part(part),
            LiveInput::Content(content) => Self::Content(content),
            LiveInput::Blob(blob) => Self::Blob(blob),
            LiveInput::FunctionResponse(response) => Self::FunctionResponse(response),
            LiveInput::Json(JsonValue::Object(map)) => Self::Record(map),
            other => Self::Other(other),
        }
    }

    fn is_tool_response(&self) -> bool {
        match self {
            Self::FunctionResponse(_) => true,
            Self::Record(map) => is_function_response_record(map),
            _ => false,
        }
    }

    fn is_content(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Part(_) | Self::Content(_))
    }

    fn is_blob(&self) -> bool {
        match self {
            Self::Blob(_) => true,
            Self::Record(map) => map.contains_key("data"),
            _ => false,
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Part(part) => format!("{:?}", part),
            Self::Content(content) => format!("{:?}", content),
            Self::Blob(blob) => format!("{:?}", blob),
            Self::FunctionResponse(response) => format!("{:?}", response),
            Self::Record(map) => JsonValue::Object(map.clone()).to_string(),
            Self::Other(input) => input.to_string(),
        }
    }
}

fn is_function_response_record(map: &JsonMap) -> bool {
    map.contains_key("name") && map.contains_key("response")
}

impl Normalizer {
    /// Create a normalizer for a dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// The dialect this normalizer validates for.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Normalize caller input into one canonical message.
    pub fn normalize(
        &self,
        input: impl Into<LiveInput>,
        end_of_turn: bool,
    ) -> LiveResult<ClientMessage> {
        let input = input.into();

        if is_empty(&input) {
            info!("No input provided. Assume it is the end of turn.");
            return Ok(ClientMessage::ContentUpdate(ClientContent::new(Vec::new(), true)));
        }

        let type_name = input.type_name();
        let message = match input {
            LiveInput::Text(text) | LiveInput::Json(JsonValue::String(text)) => {
                ClientMessage::text(text, end_of_turn)
            }
            LiveInput::Json(JsonValue::Object(map)) => self.normalize_record(map)?,
            LiveInput::Blob(blob) => {
                ClientMessage::RealtimeChunk(RealtimeInput::single(validate_blob(blob)?))
            }
            LiveInput::FunctionResponse(response) => ClientMessage::ToolResponse(
                ToolResponse::new(vec![self.check_function_response(response)?]),
            ),
            LiveInput::Part(_) | LiveInput::Content(_) => {
                self.normalize_list(type_name, vec![input], end_of_turn)?
            }
            LiveInput::List(items) => self.normalize_list(type_name, items, end_of_turn)?,
            LiveInput::Json(JsonValue::Array(values)) => self.normalize_list(
                type_name,
                values.into_iter().map(LiveInput::Json).collect(),
                end_of_turn,
            )?,
            LiveInput::Message(message) => self.revalidate(message)?,
            LiveInput::ClientContent(content) => ClientMessage::ContentUpdate(content),
            LiveInput::RealtimeInput(realtime) => {
                self.revalidate(ClientMessage::RealtimeChunk(realtime))?
            }
            LiveInput::ToolResponse(response) => {
                self.revalidate(ClientMessage::ToolResponse(response))?
            }
            other => return Err(LiveError::input_shape(type_name, other)),
        };

        debug!(kind = message.kind(), dialect = %self.dialect, "Normalized input");
        Ok(message)
    }

    /// Re-check an already-canonical message.
    pub fn revalidate(&self, message: ClientMessage) -> LiveResult<ClientMessage> {
        match message {
            ClientMessage::ContentUpdate(content) => Ok(ClientMessage::ContentUpdate(content)),
            ClientMessage::RealtimeChunk(realtime) => {
                let media_chunks = realtime
                    .media_chunks
                    .into_iter()
                    .map(validate_blob)
                    .collect::<LiveResult<Vec<_>>>()?;
                Ok(ClientMessage::RealtimeChunk(RealtimeInput::new(media_chunks)))
            }
            ClientMessage::ToolResponse(response) => {
                let function_responses = response
                    .function_responses
                    .into_iter()
                    .map(|r| self.check_function_response(r))
                    .collect::<LiveResult<Vec<_>>>()?;
                Ok(ClientMessage::ToolResponse(ToolResponse::new(
                    function_responses,
                )))
            }
        }
    }

    /// Apply the dialect's id rule. Empty ids count as missing.
    fn check_function_response(
        &self,
        mut response: FunctionResponse,
    ) -> LiveResult<FunctionResponse> {
        if !response.has_id() {
            if self.dialect.requires_function_response_id() {
                return Err(LiveError::missing_function_response_id());
            }
            response.id = None;
        }
        Ok(response)
    }

    fn normalize_record(&self, map: JsonMap) -> LiveResult<ClientMessage> {
        if map.contains_key("data") {
            let blob = blob_from_record(map)?;
            return Ok(ClientMessage::RealtimeChunk(RealtimeInput::single(blob)));
        }

        if is_function_response_record(&map) {
            if self.dialect.requires_function_response_id() && !map.contains_key("id") {
                return Err(LiveError::missing_function_response_id());
            }
            let response = self.function_response_from_record(map)?;
            return Ok(ClientMessage::ToolResponse(ToolResponse::new(vec![response])));
        }

        if map.contains_key("turns") || map.contains_key("content") {
            return content_update_from_record(map);
        }

        if map.contains_key("media_chunks") {
            let value = JsonValue::Object(map);
            let realtime: RealtimeInput = serde_json::from_value(value.clone())
                .map_err(|e| LiveError::schema("RealtimeInput", e.to_string(), &value))?;
            return self.revalidate(ClientMessage::RealtimeChunk(realtime));
        }

        if map.contains_key("function_responses") {
            let value = JsonValue::Object(map);
            let response: ToolResponse = serde_json::from_value(value.clone())
                .map_err(|e| LiveError::schema("ToolResponse", e.to_string(), &value))?;
            return self.revalidate(ClientMessage::ToolResponse(response));
        }

        Err(LiveError::input_shape("dict", JsonValue::Object(map)))
    }

    fn function_response_from_record(&self, map: JsonMap) -> LiveResult<FunctionResponse> {
        let value = JsonValue::Object(map);
        let response: FunctionResponse = serde_json::from_value(value.clone())
            .map_err(|e| LiveError::schema("FunctionResponse", e.to_string(), &value))?;
        self.check_function_response(response)
    }

    fn normalize_list(
        &self,
        type_name: &'static str,
        items: Vec<LiveInput>,
        end_of_turn: bool,
    ) -> LiveResult<ClientMessage> {
        let elements: Vec<Element> = items.into_iter().map(Element::classify).collect();

        if elements.iter().any(Element::is_tool_response) {
            return self.tool_response_from_elements(elements);
        }

        if elements.iter().any(Element::is_content) {
            return Ok(content_update_from_elements(elements, end_of_turn));
        }

        if elements.iter().any(Element::is_blob) {
            return realtime_from_elements(elements);
        }

        let rendered = elements
            .iter()
            .map(Element::render)
            .collect::<Vec<_>>()
            .join(", ");
        Err(LiveError::input_shape(type_name, format!("[{}]", rendered)))
    }

    fn tool_response_from_elements(&self, elements: Vec<Element>) -> LiveResult<ClientMessage> {
        let mut function_responses = Vec::new();
        for element in elements {
            match element {
                Element::FunctionResponse(response) => {
                    function_responses.push(self.check_function_response(response)?);
                }
                Element::Record(map) => {
                    function_responses.push(self.function_response_from_record(map)?);
                }
                _ => {}
            }
        }
        Ok(ClientMessage::ToolResponse(ToolResponse::new(
            function_responses,
        )))
    }
}

fn is_empty(input: &LiveInput) -> bool {
    match input {
        LiveInput::Empty => true,
        LiveInput::Text(text) => text.is_empty(),
        LiveInput::List(items) => items.is_empty(),
        LiveInput::Json(value) => match value {
            JsonValue::Null => true,
            JsonValue::String(s) => s.is_empty(),
            JsonValue::Array(items) => items.is_empty(),
            JsonValue::Object(map) => map.is_empty(),
            _ => false,
        },
        _ => false,
    }
}

fn validate_blob(blob: Blob) -> LiveResult<Blob> {
    if blob.mime_type.trim().is_empty() {
        return Err(LiveError::schema(
            "Blob",
            "mime_type must be a non-empty string",
            format!("{:?}", blob),
        ));
    }
    Ok(blob)
}

fn blob_from_record(map: JsonMap) -> LiveResult<Blob> {
    let value = JsonValue::Object(map);
    let blob: Blob = serde_json::from_value(value.clone())
        .map_err(|e| LiveError::schema("Blob", e.to_string(), &value))?;
    validate_blob(blob)
}

fn content_update_from_record(map: JsonMap) -> LiveResult<ClientMessage> {
    let turn_complete = match map.get("turn_complete") {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(flag)) => *flag,
        Some(other) => {
            return Err(LiveError::schema(
                "ClientContent",
                format!("turn_complete must be a bool, got {}", json_type_name(other)),
                JsonValue::Object(map.clone()),
            ))
        }
    };

    let raw_turns = map
        .get("turns")
        .or_else(|| map.get("content"))
        .cloned()
        .unwrap_or(JsonValue::Null);
    let turns = match raw_turns {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::Array(_) => serde_json::from_value::<Vec<Content>>(raw_turns),
        single => serde_json::from_value::<Content>(single).map(|c| vec![c]),
    }
    .map_err(|e| LiveError::schema("ClientContent", e.to_string(), JsonValue::Object(map)))?;

    Ok(ClientMessage::ContentUpdate(ClientContent::new(
        turns,
        turn_complete,
    )))
}

/// Collect parts into user turns. Typed turns stand alone; untyped records
/// and anything else that is not a content part are dropped.
fn content_update_from_elements(elements: Vec<Element>, end_of_turn: bool) -> ClientMessage {
    let mut turns = Vec::new();
    let mut pending: Vec<Part> = Vec::new();

    for element in elements {
        match element {
            Element::Text(text) => pending.push(Part::text(text)),
            Element::Part(part) => pending.push(part),
            Element::Blob(blob) => pending.push(Part::inline_data(blob)),
            Element::Content(content) => {
                if !pending.is_empty() {
                    turns.push(Content::user_parts(std::mem::take(&mut pending)));
                }
                turns.push(content);
            }
            Element::FunctionResponse(_) | Element::Record(_) | Element::Other(_) => {}
        }
    }
    if !pending.is_empty() {
        turns.push(Content::user_parts(pending));
    }

    ClientMessage::ContentUpdate(ClientContent::new(turns, end_of_turn))
}

fn realtime_from_elements(elements: Vec<Element>) -> LiveResult<ClientMessage> {
    let media_chunks = elements
        .into_iter()
        .map(|element| match element {
            Element::Blob(blob) => validate_blob(blob),
            Element::Record(map) => blob_from_record(map),
            other => Err(LiveError::schema(
                "Blob",
                "every element of a media list must be a blob",
                other.render(),
            )),
        })
        .collect::<LiveResult<Vec<_>>>()?;
    Ok(ClientMessage::RealtimeChunk(RealtimeInput::new(media_chunks)))
}
