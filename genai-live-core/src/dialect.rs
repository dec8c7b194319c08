//! Backend wire dialects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two backend wire-format variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Google AI (Generative Language API), authenticated with an API key.
    #[default]
    GoogleAi,
    /// Vertex AI, authenticated with a bearer token under a project/location.
    VertexAi,
}

impl Dialect {
    /// Whether function responses must carry the id of the originating call.
    #[must_use]
    pub fn requires_function_response_id(&self) -> bool {
        matches!(self, Self::GoogleAi)
    }

    /// Short system name, as used in logs.
    #[must_use]
    pub fn system(&self) -> &'static str {
        match self {
            Self::GoogleAi => "google",
            Self::VertexAi => "google-vertex",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.system())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "google-ai" | "google-gla" | "gemini" | "mldev" => Ok(Self::GoogleAi),
            "google-vertex" | "vertex" | "vertex-ai" | "vertexai" => Ok(Self::VertexAi),
            _ => Err(format!("Unknown dialect: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_requirement() {
        assert!(Dialect::GoogleAi.requires_function_response_id());
        assert!(!Dialect::VertexAi.requires_function_response_id());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("gemini".parse::<Dialect>(), Ok(Dialect::GoogleAi));
        assert_eq!("Vertex".parse::<Dialect>(), Ok(Dialect::VertexAi));
        assert!("bedrock".parse::<Dialect>().is_err());
    }
}
