//! Live API wire types.
//!
//! Request and response frames exchanged with the bidi-generate-content
//! service. Part and config payloads are camelCase; client frame envelopes
//! (`client_content`, `realtime_input`, `tool_response`) are snake_case.
//! Server frames are accepted in either case.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ============================================================================
// Setup Types
// ============================================================================

/// The first frame of every session.
#[derive(Debug, Clone, Serialize)]
pub struct SetupFrame {
    /// Setup payload.
    pub setup: Setup,
}

/// Setup payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    /// Resolved model resource name.
    pub model: String,
    /// Generation configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// System instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Tool definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GoogleTool>>,
}

/// Generation configuration.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Top-p.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u64>,
    /// Max output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    /// Candidate count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,
    /// Presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    /// Output modalities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    /// Speech configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

/// Speech configuration.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Voice selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_config: Option<VoiceConfig>,
    /// Language code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// Voice selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// A prebuilt voice.
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

/// A prebuilt voice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    /// Voice name.
    pub voice_name: String,
}

/// Tool definition.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleTool {
    /// Function declarations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_declarations: Option<Vec<FunctionDeclaration>>,
    /// Code execution tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_execution: Option<CodeExecution>,
    /// Google Search grounding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

/// Function declaration.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    /// Function name.
    pub name: String,
    /// Function description.
    pub description: String,
    /// Parameter schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonValue>,
}

/// Code execution tool config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExecution {}

/// Google Search tool config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSearch {}

// ============================================================================
// Content Types
// ============================================================================

/// Content (turn) in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Role: "user" or "model".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Text content.
    Text {
        /// The text.
        text: String,
    },
    /// Inline binary data.
    InlineData {
        /// The blob data.
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: Blob,
    },
    /// Function call from model.
    FunctionCall {
        /// The function call.
        #[serde(rename = "functionCall", alias = "function_call")]
        function_call: FunctionCall,
    },
    /// Function response to model.
    FunctionResponse {
        /// The function response.
        #[serde(rename = "functionResponse", alias = "function_response")]
        function_response: FunctionResponse,
    },
    /// Executable code (from code execution).
    ExecutableCode {
        /// The code.
        #[serde(rename = "executableCode", alias = "executable_code")]
        executable_code: ExecutableCode,
    },
    /// Code execution result.
    CodeExecutionResult {
        /// The result.
        #[serde(rename = "codeExecutionResult", alias = "code_execution_result")]
        code_execution_result: CodeExecutionResult,
    },
    /// Any other part, passed through unchanged.
    Other(JsonValue),
}

/// Binary blob data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIME type.
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    /// Base64-encoded data.
    pub data: String,
}

/// Function call from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Call id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name.
    pub name: String,
    /// Function arguments.
    #[serde(default)]
    pub args: JsonValue,
}

/// Function response to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Call id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name.
    pub name: String,
    /// Response data.
    pub response: JsonValue,
}

/// Executable code from code execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutableCode {
    /// Programming language.
    pub language: String,
    /// The code.
    pub code: String,
}

/// Result of code execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExecutionResult {
    /// Execution outcome.
    pub outcome: String,
    /// Output text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

// ============================================================================
// Client Frames
// ============================================================================

/// A client frame after setup. Exactly one key is present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientFrame {
    /// Conversation turns.
    ClientContent(ClientContent),
    /// Streamed media.
    RealtimeInput(RealtimeInput),
    /// Tool call results.
    ToolResponse(ToolResponse),
}

/// Conversation turns.
#[derive(Debug, Clone, Serialize)]
pub struct ClientContent {
    /// Turns.
    pub turns: Vec<Content>,
    /// Whether the model should respond now.
    pub turn_complete: bool,
}

/// Streamed media.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeInput {
    /// Media chunks.
    pub media_chunks: Vec<MediaChunk>,
}

/// One media chunk.
#[derive(Debug, Clone, Serialize)]
pub struct MediaChunk {
    /// Base64-encoded data.
    pub data: String,
    /// MIME type.
    pub mime_type: String,
}

/// Tool call results.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    /// Responses.
    pub function_responses: Vec<FunctionResponse>,
}

// ============================================================================
// Server Frames
// ============================================================================

/// A server frame. At most one field is expected to be set.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServerFrame {
    /// Handshake acknowledgement.
    #[serde(default, alias = "setup_complete")]
    pub setup_complete: Option<JsonValue>,
    /// Model output.
    #[serde(default, alias = "server_content")]
    pub server_content: Option<ServerContent>,
    /// Tool call request.
    #[serde(default, alias = "tool_call")]
    pub tool_call: Option<ToolCall>,
    /// Tool call cancellation.
    #[serde(default, alias = "tool_call_cancellation")]
    pub tool_call_cancellation: Option<ToolCallCancellation>,
}

/// Model output.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    /// Model turn.
    #[serde(default, alias = "model_turn")]
    pub model_turn: Option<Content>,
    /// Turn complete flag.
    #[serde(default, alias = "turn_complete")]
    pub turn_complete: Option<bool>,
    /// Interrupted flag.
    #[serde(default)]
    pub interrupted: Option<bool>,
}

/// Tool call request.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    /// Function calls.
    #[serde(default, alias = "function_calls")]
    pub function_calls: Vec<FunctionCall>,
}

/// Tool call cancellation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ToolCallCancellation {
    /// Cancelled call ids.
    #[serde(default)]
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_part_serializes_camel_case() {
        let part = Part::InlineData {
            inline_data: Blob {
                mime_type: "audio/pcm".into(),
                data: "AAE=".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({"inlineData": {"mimeType": "audio/pcm", "data": "AAE="}})
        );
    }

    #[test]
    fn test_server_frame_accepts_both_cases() {
        let camel: ServerFrame =
            serde_json::from_value(json!({"serverContent": {"turnComplete": true}})).unwrap();
        let snake: ServerFrame =
            serde_json::from_value(json!({"server_content": {"turn_complete": true}})).unwrap();
        assert_eq!(camel.server_content.unwrap().turn_complete, Some(true));
        assert_eq!(snake.server_content.unwrap().turn_complete, Some(true));
    }

    #[test]
    fn test_client_frame_envelope_is_snake_case() {
        let frame = ClientFrame::RealtimeInput(RealtimeInput {
            media_chunks: vec![MediaChunk {
                data: "AAE=".into(),
                mime_type: "audio/pcm".into(),
            }],
        });
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"realtime_input": {"media_chunks": [{"data": "AAE=", "mime_type": "audio/pcm"}]}})
        );
    }
}
