//! Content parts.
//!
//! A [`Part`] is one element of a turn: text, inline binary data, or (in model
//! turns) a function call or code-execution artifact.

use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::client::FunctionResponse;
use super::server::FunctionCall;

/// Binary blob with a MIME type.
///
/// On the wire `data` is base64; when deserializing, a JSON array of bytes
/// is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// The raw bytes.
    #[serde(with = "base64_serde")]
    pub data: Bytes,
    /// MIME type, e.g. `audio/pcm`.
    #[serde(alias = "mimeType")]
    pub mime_type: String,
}

impl Blob {
    /// Create a new blob.
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Get the data as a base64 string.
    #[must_use]
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Check if the blob is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the data in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Code emitted by the model's code-execution tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutableCode {
    /// Programming language.
    pub language: String,
    /// The code.
    pub code: String,
}

/// Result of running [`ExecutableCode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExecutionResult {
    /// Execution outcome.
    pub outcome: String,
    /// Output text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// One element of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Text content.
    Text {
        /// The text.
        text: String,
    },
    /// Inline binary data.
    InlineData {
        /// The blob.
        #[serde(alias = "inlineData")]
        inline_data: Blob,
    },
    /// Function call from the model.
    FunctionCall {
        /// The call.
        #[serde(alias = "functionCall")]
        function_call: FunctionCall,
    },
    /// Function response to the model.
    FunctionResponse {
        /// The response.
        #[serde(alias = "functionResponse")]
        function_response: FunctionResponse,
    },
    /// Executable code.
    ExecutableCode {
        /// The code.
        #[serde(alias = "executableCode")]
        executable_code: ExecutableCode,
    },
    /// Code execution result.
    CodeExecutionResult {
        /// The result.
        #[serde(alias = "codeExecutionResult")]
        code_execution_result: CodeExecutionResult,
    },
    /// A part shape this crate does not model, kept verbatim.
    Other(JsonValue),
}

impl Part {
    /// Create a text part.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }

    /// Create an inline data part.
    pub fn inline_data(blob: Blob) -> Self {
        Self::InlineData { inline_data: blob }
    }

    /// Create an inline data part from bytes and a MIME type.
    pub fn bytes(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self::inline_data(Blob::new(data, mime_type))
    }

    /// Get the text if this is a text part.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Get the blob if this is an inline data part.
    #[must_use]
    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }
}

impl From<Blob> for Part {
    fn from(blob: Blob) -> Self {
        Part::inline_data(blob)
    }
}

impl From<&str> for Part {
    fn from(s: &str) -> Self {
        Part::text(s)
    }
}

impl From<String> for Part {
    fn from(s: String) -> Self {
        Part::text(s)
    }
}

/// Serde helper for base64 encoding of blob data.
mod base64_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Encoded {
        Base64(String),
        Raw(Vec<u8>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Encoded::deserialize(deserializer)? {
            Encoded::Base64(s) => STANDARD
                .decode(s)
                .map(Bytes::from)
                .map_err(serde::de::Error::custom),
            Encoded::Raw(raw) => Ok(Bytes::from(raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_part_text() {
        let part = Part::text("Hello");
        assert_eq!(part.as_text(), Some("Hello"));
        assert!(part.as_blob().is_none());
    }

    #[test]
    fn test_blob_serializes_as_base64() {
        let blob = Blob::new(b"hi".to_vec(), "audio/pcm");
        let value = serde_json::to_value(&blob).unwrap();
        assert_eq!(value, json!({"data": "aGk=", "mime_type": "audio/pcm"}));
    }

    #[test]
    fn test_blob_accepts_byte_array_and_camel_case() {
        let blob: Blob =
            serde_json::from_value(json!({"data": [104, 105], "mimeType": "audio/pcm"})).unwrap();
        assert_eq!(blob.data.as_ref(), b"hi");
        assert_eq!(blob.mime_type, "audio/pcm");
    }

    #[test]
    fn test_blob_rejects_bad_base64() {
        let result: Result<Blob, _> =
            serde_json::from_value(json!({"data": "***", "mime_type": "audio/pcm"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_part_deserialize_variants() {
        let text: Part = serde_json::from_value(json!({"text": "hi"})).unwrap();
        assert_eq!(text.as_text(), Some("hi"));

        let data: Part = serde_json::from_value(
            json!({"inlineData": {"data": "aGk=", "mimeType": "audio/pcm"}}),
        )
        .unwrap();
        assert_eq!(data.as_blob().map(|b| b.len()), Some(2));

        let unknown: Part = serde_json::from_value(json!({"videoMetadata": {}})).unwrap();
        assert!(matches!(unknown, Part::Other(_)));
    }
}
