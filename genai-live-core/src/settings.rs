//! Live connection settings.
//!
//! [`LiveConnectConfig`] is the dialect-neutral description of what the setup
//! handshake asks for. It deserializes from JSON so it can be loaded from a
//! configuration file; the codecs translate it into each backend's schema.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::messages::Content;

/// Output modality requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Text output.
    Text,
    /// Image output.
    Image,
    /// Audio output.
    Audio,
}

impl Modality {
    /// Wire name of the modality.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Audio => "AUDIO",
        }
    }
}

/// Sampling parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Top-p (nucleus) sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u64>,
    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    /// Number of candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,
    /// Presence penalty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Frequency penalty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Random seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Stop sequences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl GenerationConfig {
    /// Create empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set temperature.
    #[must_use]
    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set top-p.
    #[must_use]
    pub fn top_p(mut self, p: f64) -> Self {
        self.top_p = Some(p);
        self
    }

    /// Set top-k.
    #[must_use]
    pub fn top_k(mut self, k: u64) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Set max output tokens.
    #[must_use]
    pub fn max_output_tokens(mut self, max: u64) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    /// Set seed.
    #[must_use]
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set stop sequences.
    #[must_use]
    pub fn stop_sequences(mut self, stops: Vec<String>) -> Self {
        self.stop_sequences = Some(stops);
        self
    }
}

/// Speech output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Name of a prebuilt voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<String>,
    /// BCP-47 language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl SpeechConfig {
    /// Speech config using a prebuilt voice.
    pub fn voice(name: impl Into<String>) -> Self {
        Self {
            voice_name: Some(name.into()),
            language_code: None,
        }
    }
}

/// A function the model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    /// Function name.
    pub name: String,
    /// Description shown to the model.
    #[serde(default)]
    pub description: String,
    /// JSON schema of the parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonValue>,
}

impl FunctionDeclaration {
    /// Create a function declaration.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: JsonValue,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Some(parameters),
        }
    }
}

/// A tool made available for the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Function declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_declarations: Vec<FunctionDeclaration>,
    /// Enable the code execution tool.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub code_execution: bool,
    /// Enable Google Search grounding.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub google_search: bool,
}

impl Tool {
    /// Tool with function declarations.
    pub fn functions(declarations: Vec<FunctionDeclaration>) -> Self {
        Self {
            function_declarations: declarations,
            ..Default::default()
        }
    }

    /// Code execution tool.
    #[must_use]
    pub fn code_execution() -> Self {
        Self {
            code_execution: true,
            ..Default::default()
        }
    }

    /// Google Search tool.
    #[must_use]
    pub fn google_search() -> Self {
        Self {
            google_search: true,
            ..Default::default()
        }
    }
}

/// Configuration for a live connection.
///
/// ```rust
/// use genai_live_core::settings::{LiveConnectConfig, Modality};
///
/// let config = LiveConnectConfig::new()
///     .response_modalities(vec![Modality::Text])
///     .system_instruction("Answer briefly.")
///     .temperature(0.4);
/// assert!(config.generation_config.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveConnectConfig {
    /// Sampling parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// Requested output modalities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<Modality>>,
    /// Speech output settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
    /// System instruction.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "instruction_serde::deserialize"
    )]
    pub system_instruction: Option<Content>,
    /// Tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

impl LiveConnectConfig {
    /// Create empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generation config, replacing any previous one.
    #[must_use]
    pub fn generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Set temperature on the generation config.
    #[must_use]
    pub fn temperature(mut self, temp: f64) -> Self {
        self.generation_config = Some(self.generation_config.unwrap_or_default().temperature(temp));
        self
    }

    /// Set max output tokens on the generation config.
    #[must_use]
    pub fn max_output_tokens(mut self, max: u64) -> Self {
        self.generation_config =
            Some(self.generation_config.unwrap_or_default().max_output_tokens(max));
        self
    }

    /// Set response modalities.
    #[must_use]
    pub fn response_modalities(mut self, modalities: Vec<Modality>) -> Self {
        self.response_modalities = Some(modalities);
        self
    }

    /// Set speech config.
    #[must_use]
    pub fn speech_config(mut self, config: SpeechConfig) -> Self {
        self.speech_config = Some(config);
        self
    }

    /// Set a prebuilt voice.
    #[must_use]
    pub fn voice(self, name: impl Into<String>) -> Self {
        self.speech_config(SpeechConfig::voice(name))
    }

    /// Set the system instruction.
    ///
    /// A plain string becomes a single-part user turn.
    #[must_use]
    pub fn system_instruction(mut self, instruction: impl Into<Content>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Add a tool.
    #[must_use]
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }
}

/// Accepts a system instruction as either a string or a content object.
mod instruction_serde {
    use serde::{Deserialize, Deserializer};

    use crate::messages::Content;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Instruction {
        Text(String),
        Content(Content),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Content>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(
            Option::<Instruction>::deserialize(deserializer)?.map(|instruction| match instruction {
                Instruction::Text(text) => Content::user(text),
                Instruction::Content(content) => content,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder_merges_generation_config() {
        let config = LiveConnectConfig::new()
            .temperature(0.5)
            .max_output_tokens(128);
        let gen = config.generation_config.unwrap();
        assert_eq!(gen.temperature, Some(0.5));
        assert_eq!(gen.max_output_tokens, Some(128));
    }

    #[test]
    fn test_system_instruction_from_string() {
        let config = LiveConnectConfig::new().system_instruction("Be terse.");
        let instruction = config.system_instruction.unwrap();
        assert_eq!(instruction.role(), Some("user"));
        assert_eq!(instruction.text().as_deref(), Some("Be terse."));
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: LiveConnectConfig = serde_json::from_value(json!({
            "response_modalities": ["TEXT"],
            "speech_config": {"voice_name": "Kore"},
            "system_instruction": "You are a pirate.",
            "tools": [{"google_search": true}],
            "generation_config": {"temperature": 0.2}
        }))
        .unwrap();

        assert_eq!(config.response_modalities, Some(vec![Modality::Text]));
        assert_eq!(config.speech_config, Some(SpeechConfig::voice("Kore")));
        assert_eq!(
            config.system_instruction,
            Some(Content::user("You are a pirate."))
        );
        assert_eq!(config.tools, Some(vec![Tool::google_search()]));
    }

    #[test]
    fn test_missing_instruction_stays_none() {
        let config: LiveConnectConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, LiveConnectConfig::default());
    }
}
