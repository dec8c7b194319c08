//! Google AI and Vertex AI codecs.
//!
//! Both backends share one frame layout; they differ in model naming, in the
//! default output modality, and in whether function responses need ids.

use base64::Engine;
use genai_live_core::messages::{
    self as canonical, ClientMessage, ServerMessage,
};
use genai_live_core::{Dialect, LiveConnectConfig, LiveError, LiveResult};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::types::*;
use super::vertex::model_resource_name;
use crate::codec::DialectCodec;

/// Per-backend differences in how canonical messages are framed.
#[derive(Debug)]
struct WireRules {
    /// Modalities requested when the caller names none.
    default_modalities: Option<&'static [&'static str]>,
    /// Whether every function response must carry a non-empty id.
    requires_function_response_id: bool,
}

const GOOGLE_AI_RULES: WireRules = WireRules {
    default_modalities: None,
    requires_function_response_id: true,
};

const VERTEX_AI_RULES: WireRules = WireRules {
    default_modalities: Some(&["AUDIO"]),
    requires_function_response_id: false,
};

/// Codec for the Google AI (Generative Language) backend.
#[derive(Debug, Clone, Default)]
pub struct GoogleAiCodec;

impl GoogleAiCodec {
    /// Create a new codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DialectCodec for GoogleAiCodec {
    fn dialect(&self) -> Dialect {
        Dialect::GoogleAi
    }

    fn resolve_model(&self, model: &str) -> String {
        if model.starts_with("models/") || model.starts_with("tunedModels/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        }
    }

    fn encode_setup(&self, model: &str, config: &LiveConnectConfig) -> LiveResult<String> {
        encode_setup(self.resolve_model(model), config, &GOOGLE_AI_RULES)
    }

    fn encode(&self, message: &ClientMessage) -> LiveResult<String> {
        encode_message(message, &GOOGLE_AI_RULES)
    }

    fn decode(&self, frame: &[u8]) -> LiveResult<ServerMessage> {
        decode_frame(frame)
    }
}

/// Codec for the Vertex AI backend.
#[derive(Debug, Clone, Default)]
pub struct VertexAiCodec {
    project: Option<String>,
    location: Option<String>,
}

impl VertexAiCodec {
    /// Create a codec that leaves publisher paths unscoped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope publisher model paths to a project and location.
    #[must_use]
    pub fn with_resource(mut self, project: impl Into<String>, location: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self.location = Some(location.into());
        self
    }
}

impl DialectCodec for VertexAiCodec {
    fn dialect(&self) -> Dialect {
        Dialect::VertexAi
    }

    fn resolve_model(&self, model: &str) -> String {
        model_resource_name(model, self.project.as_deref(), self.location.as_deref())
    }

    fn encode_setup(&self, model: &str, config: &LiveConnectConfig) -> LiveResult<String> {
        encode_setup(self.resolve_model(model), config, &VERTEX_AI_RULES)
    }

    fn encode(&self, message: &ClientMessage) -> LiveResult<String> {
        encode_message(message, &VERTEX_AI_RULES)
    }

    fn decode(&self, frame: &[u8]) -> LiveResult<ServerMessage> {
        decode_frame(frame)
    }
}

// ============================================================================
// Encoding
// ============================================================================

fn encode_setup(model: String, config: &LiveConnectConfig, rules: &WireRules) -> LiveResult<String> {
    let frame = SetupFrame {
        setup: Setup {
            model,
            generation_config: convert_generation_config(config, rules),
            system_instruction: config.system_instruction.as_ref().map(convert_content),
            tools: config
                .tools
                .as_ref()
                .map(|tools| tools.iter().map(convert_tool).collect()),
        },
    };
    Ok(serde_json::to_string(&frame)?)
}

/// Merge sampling parameters, modalities, and speech settings into one
/// `generationConfig`. Fields set here never overwrite each other.
fn convert_generation_config(
    config: &LiveConnectConfig,
    rules: &WireRules,
) -> Option<GenerationConfig> {
    let mut generation = config.generation_config.as_ref().map(|g| GenerationConfig {
        temperature: g.temperature,
        top_p: g.top_p,
        top_k: g.top_k,
        max_output_tokens: g.max_output_tokens,
        candidate_count: g.candidate_count,
        presence_penalty: g.presence_penalty,
        frequency_penalty: g.frequency_penalty,
        seed: g.seed,
        stop_sequences: g.stop_sequences.clone(),
        ..Default::default()
    });

    let modalities: Option<Vec<String>> = match &config.response_modalities {
        Some(modalities) => Some(modalities.iter().map(|m| m.as_str().to_string()).collect()),
        None => rules
            .default_modalities
            .map(|defaults| defaults.iter().map(|m| m.to_string()).collect()),
    };
    if let Some(modalities) = modalities {
        generation.get_or_insert_with(Default::default).response_modalities = Some(modalities);
    }

    if let Some(speech) = &config.speech_config {
        generation.get_or_insert_with(Default::default).speech_config = Some(SpeechConfig {
            voice_config: speech.voice_name.as_ref().map(|name| VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: name.clone(),
                },
            }),
            language_code: speech.language_code.clone(),
        });
    }

    generation
}

fn convert_tool(tool: &genai_live_core::Tool) -> GoogleTool {
    GoogleTool {
        function_declarations: if tool.function_declarations.is_empty() {
            None
        } else {
            Some(
                tool.function_declarations
                    .iter()
                    .map(|decl| FunctionDeclaration {
                        name: decl.name.clone(),
                        description: decl.description.clone(),
                        parameters: decl.parameters.clone(),
                    })
                    .collect(),
            )
        },
        code_execution: tool.code_execution.then_some(CodeExecution {}),
        google_search: tool.google_search.then_some(GoogleSearch {}),
    }
}

fn convert_content(content: &canonical::Content) -> Content {
    Content {
        role: content.role.clone(),
        parts: content.parts.iter().map(convert_part).collect(),
    }
}

fn convert_part(part: &canonical::Part) -> Part {
    match part {
        canonical::Part::Text { text } => Part::Text { text: text.clone() },
        canonical::Part::InlineData { inline_data } => Part::InlineData {
            inline_data: Blob {
                mime_type: inline_data.mime_type.clone(),
                data: inline_data.to_base64(),
            },
        },
        canonical::Part::FunctionCall { function_call } => Part::FunctionCall {
            function_call: FunctionCall {
                id: function_call.id.clone(),
                name: function_call.name.clone(),
                args: function_call.args.clone(),
            },
        },
        canonical::Part::FunctionResponse { function_response } => Part::FunctionResponse {
            function_response: convert_function_response(function_response),
        },
        canonical::Part::ExecutableCode { executable_code } => Part::ExecutableCode {
            executable_code: ExecutableCode {
                language: executable_code.language.clone(),
                code: executable_code.code.clone(),
            },
        },
        canonical::Part::CodeExecutionResult {
            code_execution_result,
        } => Part::CodeExecutionResult {
            code_execution_result: CodeExecutionResult {
                outcome: code_execution_result.outcome.clone(),
                output: code_execution_result.output.clone(),
            },
        },
        canonical::Part::Other(value) => Part::Other(value.clone()),
    }
}

/// Empty ids are dropped rather than sent.
fn convert_function_response(response: &canonical::FunctionResponse) -> FunctionResponse {
    FunctionResponse {
        id: response.id.clone().filter(|id| !id.is_empty()),
        name: response.name.clone(),
        response: response.response.clone(),
    }
}

fn encode_message(message: &ClientMessage, rules: &WireRules) -> LiveResult<String> {
    let frame = match message {
        ClientMessage::ContentUpdate(content) => ClientFrame::ClientContent(ClientContent {
            turns: content.turns.iter().map(convert_content).collect(),
            turn_complete: content.turn_complete,
        }),
        ClientMessage::RealtimeChunk(realtime) => ClientFrame::RealtimeInput(RealtimeInput {
            media_chunks: realtime
                .media_chunks
                .iter()
                .map(|blob| MediaChunk {
                    data: blob.to_base64(),
                    mime_type: blob.mime_type.clone(),
                })
                .collect(),
        }),
        ClientMessage::ToolResponse(response) => {
            if rules.requires_function_response_id
                && response.function_responses.iter().any(|r| !r.has_id())
            {
                return Err(LiveError::missing_function_response_id());
            }
            ClientFrame::ToolResponse(ToolResponse {
                function_responses: response
                    .function_responses
                    .iter()
                    .map(convert_function_response)
                    .collect(),
            })
        }
    };
    Ok(serde_json::to_string(&frame)?)
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_frame(frame: &[u8]) -> LiveResult<ServerMessage> {
    if frame.iter().all(u8::is_ascii_whitespace) {
        return Ok(ServerMessage::Unrecognized(JsonValue::Null));
    }

    let value: JsonValue = serde_json::from_slice(frame)
        .map_err(|e| LiveError::frame_parse(format!("Failed to parse response: {}", e), frame))?;
    if !value.is_object() {
        warn!(frame = %value, "Ignoring non-object server frame");
        return Ok(ServerMessage::Unrecognized(value));
    }

    let parsed: ServerFrame = serde_json::from_value(value.clone())
        .map_err(|e| LiveError::frame_parse(e.to_string(), frame))?;

    if let Some(content) = parsed.server_content {
        let model_turn = content
            .model_turn
            .map(|turn| restore_content(turn, frame))
            .transpose()?;
        return Ok(ServerMessage::ServerContent(canonical::ServerContent {
            model_turn,
            turn_complete: content.turn_complete,
            interrupted: content.interrupted,
        }));
    }

    if let Some(call) = parsed.tool_call {
        return Ok(ServerMessage::ToolCall(canonical::ToolCall {
            function_calls: call
                .function_calls
                .into_iter()
                .map(restore_function_call)
                .collect(),
        }));
    }

    if let Some(cancellation) = parsed.tool_call_cancellation {
        return Ok(ServerMessage::ToolCallCancellation(
            canonical::ToolCallCancellation {
                ids: cancellation.ids,
            },
        ));
    }

    if parsed.setup_complete.is_some() {
        return Ok(ServerMessage::SetupComplete);
    }

    debug!(frame = %value, "Unrecognized server frame");
    Ok(ServerMessage::Unrecognized(value))
}

fn restore_content(content: Content, frame: &[u8]) -> LiveResult<canonical::Content> {
    let parts = content
        .parts
        .into_iter()
        .map(|part| restore_part(part, frame))
        .collect::<LiveResult<Vec<_>>>()?;
    Ok(canonical::Content {
        role: content.role,
        parts,
    })
}

fn restore_part(part: Part, frame: &[u8]) -> LiveResult<canonical::Part> {
    Ok(match part {
        Part::Text { text } => canonical::Part::Text { text },
        Part::InlineData { inline_data } => {
            let data = base64::engine::general_purpose::STANDARD
                .decode(&inline_data.data)
                .map_err(|e| LiveError::frame_parse(format!("Invalid inline data: {}", e), frame))?;
            canonical::Part::inline_data(canonical::Blob::new(data, inline_data.mime_type))
        }
        Part::FunctionCall { function_call } => canonical::Part::FunctionCall {
            function_call: restore_function_call(function_call),
        },
        Part::FunctionResponse { function_response } => canonical::Part::FunctionResponse {
            function_response: canonical::FunctionResponse {
                name: function_response.name,
                response: function_response.response,
                id: function_response.id,
            },
        },
        Part::ExecutableCode { executable_code } => canonical::Part::ExecutableCode {
            executable_code: canonical::ExecutableCode {
                language: executable_code.language,
                code: executable_code.code,
            },
        },
        Part::CodeExecutionResult {
            code_execution_result,
        } => canonical::Part::CodeExecutionResult {
            code_execution_result: canonical::CodeExecutionResult {
                outcome: code_execution_result.outcome,
                output: code_execution_result.output,
            },
        },
        Part::Other(value) => canonical::Part::Other(value),
    })
}

fn restore_function_call(call: FunctionCall) -> canonical::FunctionCall {
    canonical::FunctionCall {
        id: call.id,
        name: call.name,
        args: call.args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use genai_live_core::messages::{
        Blob as CanonicalBlob, ClientContent as CanonicalClientContent, Content as CanonicalContent,
        FunctionResponse as CanonicalFunctionResponse, RealtimeInput as CanonicalRealtimeInput,
        ToolResponse as CanonicalToolResponse,
    };
    use genai_live_core::settings::{FunctionDeclaration as Decl, Modality, Tool};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn to_json(s: &str) -> JsonValue {
        serde_json::from_str(s).unwrap()
    }

    #[rstest]
    #[case("gemini-2.0-flash-exp", "models/gemini-2.0-flash-exp")]
    #[case("models/gemini-2.0-flash-exp", "models/gemini-2.0-flash-exp")]
    #[case("tunedModels/my-tune", "tunedModels/my-tune")]
    fn test_google_ai_model_names(#[case] model: &str, #[case] expected: &str) {
        assert_eq!(GoogleAiCodec::new().resolve_model(model), expected);
    }

    #[test]
    fn test_vertex_model_names() {
        let codec = VertexAiCodec::new().with_resource("proj", "us-central1");
        assert_eq!(
            codec.resolve_model("gemini-2.0-flash-exp"),
            "projects/proj/locations/us-central1/publishers/google/models/gemini-2.0-flash-exp"
        );
    }

    #[test]
    fn test_setup_minimal_google_ai() {
        let setup = GoogleAiCodec::new()
            .encode_setup("gemini-2.0-flash-exp", &LiveConnectConfig::default())
            .unwrap();
        assert_eq!(
            to_json(&setup),
            json!({"setup": {"model": "models/gemini-2.0-flash-exp"}})
        );
    }

    #[test]
    fn test_setup_vertex_defaults_to_audio() {
        let setup = VertexAiCodec::new()
            .encode_setup("gemini-2.0-flash-exp", &LiveConnectConfig::default())
            .unwrap();
        assert_eq!(
            to_json(&setup),
            json!({"setup": {
                "model": "publishers/google/models/gemini-2.0-flash-exp",
                "generationConfig": {"responseModalities": ["AUDIO"]}
            }})
        );
    }

    #[test]
    fn test_setup_merges_generation_config() {
        let config = LiveConnectConfig::new()
            .temperature(0.3)
            .response_modalities(vec![Modality::Text])
            .voice("Puck")
            .system_instruction("Be brief.")
            .tool(Tool::functions(vec![Decl::new(
                "lookup",
                "Look something up",
                json!({"type": "object"}),
            )]))
            .tool(Tool::google_search());

        let setup = GoogleAiCodec::new().encode_setup("m", &config).unwrap();
        assert_eq!(
            to_json(&setup),
            json!({"setup": {
                "model": "models/m",
                "generationConfig": {
                    "temperature": 0.3,
                    "responseModalities": ["TEXT"],
                    "speechConfig": {"voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Puck"}}}
                },
                "systemInstruction": {"role": "user", "parts": [{"text": "Be brief."}]},
                "tools": [
                    {"functionDeclarations": [{
                        "name": "lookup",
                        "description": "Look something up",
                        "parameters": {"type": "object"}
                    }]},
                    {"googleSearch": {}}
                ]
            }})
        );
    }

    #[test]
    fn test_vertex_audio_default_merges_into_generation_config() {
        let config = LiveConnectConfig::new().temperature(0.4).max_output_tokens(256);
        let setup = VertexAiCodec::new().encode_setup("m", &config).unwrap();
        assert_eq!(
            to_json(&setup)["setup"]["generationConfig"],
            json!({
                "temperature": 0.4,
                "maxOutputTokens": 256,
                "responseModalities": ["AUDIO"]
            })
        );
    }

    #[test]
    fn test_google_ai_adds_no_default_modalities() {
        let config = LiveConnectConfig::new().temperature(0.4);
        let setup = GoogleAiCodec::new().encode_setup("m", &config).unwrap();
        assert_eq!(
            to_json(&setup)["setup"]["generationConfig"],
            json!({"temperature": 0.4})
        );
    }

    #[test]
    fn test_wire_rules_follow_dialect() {
        assert_eq!(
            GOOGLE_AI_RULES.requires_function_response_id,
            Dialect::GoogleAi.requires_function_response_id()
        );
        assert_eq!(
            VERTEX_AI_RULES.requires_function_response_id,
            Dialect::VertexAi.requires_function_response_id()
        );
    }

    #[test]
    fn test_vertex_keeps_explicit_modalities() {
        let config = LiveConnectConfig::new().response_modalities(vec![Modality::Text]);
        let setup = VertexAiCodec::new().encode_setup("m", &config).unwrap();
        assert_eq!(
            to_json(&setup)["setup"]["generationConfig"]["responseModalities"],
            json!(["TEXT"])
        );
    }

    #[test]
    fn test_encode_content() {
        let msg = ClientMessage::ContentUpdate(CanonicalClientContent::new(
            vec![CanonicalContent::user_parts(vec![
                canonical::Part::text("look"),
                canonical::Part::bytes(vec![0u8, 1], "image/png"),
            ])],
            true,
        ));
        let frame = GoogleAiCodec::new().encode(&msg).unwrap();
        assert_eq!(
            to_json(&frame),
            json!({"client_content": {
                "turns": [{"role": "user", "parts": [
                    {"text": "look"},
                    {"inlineData": {"mimeType": "image/png", "data": "AAE="}}
                ]}],
                "turn_complete": true
            }})
        );
    }

    #[test]
    fn test_encode_realtime() {
        let msg = ClientMessage::RealtimeChunk(CanonicalRealtimeInput::single(CanonicalBlob::new(
            vec![0u8, 1],
            "audio/pcm",
        )));
        let frame = VertexAiCodec::new().encode(&msg).unwrap();
        assert_eq!(
            to_json(&frame),
            json!({"realtime_input": {"media_chunks": [{"data": "AAE=", "mime_type": "audio/pcm"}]}})
        );
    }

    #[test]
    fn test_encode_tool_response_id_rule() {
        let msg = ClientMessage::ToolResponse(CanonicalToolResponse::new(vec![
            CanonicalFunctionResponse::new("f", json!({"ok": true})),
        ]));

        let err = GoogleAiCodec::new().encode(&msg).unwrap_err();
        assert!(matches!(err, LiveError::ProtocolInvariant(_)));

        let frame = VertexAiCodec::new().encode(&msg).unwrap();
        assert_eq!(
            to_json(&frame),
            json!({"tool_response": {"function_responses": [{"name": "f", "response": {"ok": true}}]}})
        );
    }

    #[test]
    fn test_encode_tool_response_with_id() {
        let msg = ClientMessage::ToolResponse(CanonicalToolResponse::new(vec![
            CanonicalFunctionResponse::new("f", json!({})).with_id("call-1"),
        ]));
        let frame = GoogleAiCodec::new().encode(&msg).unwrap();
        assert_eq!(
            to_json(&frame)["tool_response"]["function_responses"][0]["id"],
            json!("call-1")
        );
    }

    #[test]
    fn test_decode_server_content() {
        let frame = br#"{"serverContent": {"modelTurn": {"role": "model", "parts": [
            {"text": "Hi"}, {"inlineData": {"mimeType": "audio/pcm", "data": "AQI="}}
        ]}, "turnComplete": true}}"#;
        let msg = GoogleAiCodec::new().decode(frame).unwrap();
        assert!(msg.is_turn_complete());
        assert_eq!(msg.text().as_deref(), Some("Hi"));
        assert_eq!(msg.data(), vec![Bytes::from_static(&[1, 2])]);
        match msg {
            ServerMessage::ServerContent(content) => assert_eq!(content.interrupted, None),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_decode_snake_case_keys() {
        let frame = br#"{"server_content": {"turn_complete": false, "interrupted": true}}"#;
        let msg = VertexAiCodec::new().decode(frame).unwrap();
        assert!(!msg.is_turn_complete());
        assert!(msg.is_interrupted());
    }

    #[test]
    fn test_decode_tool_call() {
        let frame = br#"{"toolCall": {"functionCalls": [{"id": "c1", "name": "lookup", "args": {"q": "rust"}}]}}"#;
        let msg = GoogleAiCodec::new().decode(frame).unwrap();
        assert_eq!(
            msg.function_calls(),
            &[canonical::FunctionCall {
                id: Some("c1".into()),
                name: "lookup".into(),
                args: json!({"q": "rust"}),
            }]
        );
    }

    #[test]
    fn test_decode_tool_call_cancellation() {
        let frame = br#"{"toolCallCancellation": {"ids": ["c1", "c2"]}}"#;
        let msg = GoogleAiCodec::new().decode(frame).unwrap();
        assert_eq!(
            msg,
            ServerMessage::ToolCallCancellation(canonical::ToolCallCancellation {
                ids: vec!["c1".into(), "c2".into()]
            })
        );
    }

    #[test]
    fn test_decode_setup_complete() {
        let msg = VertexAiCodec::new().decode(br#"{"setupComplete": {}}"#).unwrap();
        assert_eq!(msg, ServerMessage::SetupComplete);
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"  \n".as_slice())]
    fn test_decode_empty_frame(#[case] frame: &[u8]) {
        let msg = GoogleAiCodec::new().decode(frame).unwrap();
        assert_eq!(msg, ServerMessage::Unrecognized(JsonValue::Null));
    }

    #[test]
    fn test_decode_unknown_keys() {
        let msg = GoogleAiCodec::new().decode(br#"{"usageMetadata": {}}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unrecognized(json!({"usageMetadata": {}})));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = GoogleAiCodec::new().decode(b"{not json").unwrap_err();
        match err {
            LiveError::FrameParse { frame, .. } => assert_eq!(frame, "{not json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_bad_inline_data() {
        let frame = br#"{"serverContent": {"modelTurn": {"parts": [{"inlineData": {"mimeType": "audio/pcm", "data": "***"}}]}}}"#;
        let err = GoogleAiCodec::new().decode(frame).unwrap_err();
        assert!(matches!(err, LiveError::FrameParse { .. }));
    }

    #[test]
    fn test_decode_absent_fields_stay_none() {
        let msg = GoogleAiCodec::new().decode(br#"{"serverContent": {}}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::ServerContent(canonical::ServerContent::default())
        );
    }
}
