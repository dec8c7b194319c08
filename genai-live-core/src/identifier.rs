//! ID generation utilities.
//!
//! Session ids are random; sequence ids come from an [`IdGenerator`] owned by
//! whoever needs uniqueness (usually a session), never from process-global
//! state.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Generate a unique session ID.
///
/// # Example
///
/// ```rust
/// use genai_live_core::identifier::generate_session_id;
///
/// let id = generate_session_id();
/// assert!(id.starts_with("live_"));
/// assert_eq!(id.len(), 37);
/// ```
#[must_use]
pub fn generate_session_id() -> String {
    format!("live_{}", Uuid::new_v4().simple())
}

/// Get the current UTC timestamp.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Monotonically increasing id counter.
///
/// Each generator counts independently, so two sessions never share a
/// sequence.
///
/// ```rust
/// use genai_live_core::identifier::IdGenerator;
///
/// let ids = IdGenerator::with_prefix("blob");
/// assert_eq!(ids.next_id(), "blob-1");
/// assert_eq!(ids.next_id(), "blob-2");
/// ```
#[derive(Debug)]
pub struct IdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl IdGenerator {
    /// Create a generator whose ids are `"{prefix}-{n}"`.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Next raw sequence number, starting at 1.
    pub fn next_value(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Next formatted id.
    pub fn next_id(&self) -> String {
        format!("{}-{}", self.prefix, self.next_value())
    }

    /// How many ids have been handed out.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::with_prefix("id")
    }
}
