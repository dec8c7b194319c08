//! Conversation turns.

use serde::{Deserialize, Serialize};

use super::parts::Part;

/// Role label for user turns.
pub const ROLE_USER: &str = "user";
/// Role label for model turns.
pub const ROLE_MODEL: &str = "model";

/// One speaker's contribution: an ordered list of parts plus a role.
///
/// The role is optional because server frames may omit it; turns built by
/// this crate always set one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Role: "user" or "model".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::user_parts(vec![Part::text(text)])
    }

    /// Create a model turn with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self::model_parts(vec![Part::text(text)])
    }

    /// Create a user turn with parts.
    pub fn user_parts(parts: Vec<Part>) -> Self {
        Self {
            role: Some(ROLE_USER.to_string()),
            parts,
        }
    }

    /// Create a model turn with parts.
    pub fn model_parts(parts: Vec<Part>) -> Self {
        Self {
            role: Some(ROLE_MODEL.to_string()),
            parts,
        }
    }

    /// Get the role, if set.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Concatenated text of all text parts, or `None` if there are none.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self.parts.iter().filter_map(Part::as_text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    /// Check if the turn has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::user(s)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::user(s)
    }
}
