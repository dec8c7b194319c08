//! Canonical message model.
//!
//! Dialect-neutral message types exchanged with the live service:
//!
//! - **Parts and turns**: [`Part`], [`Blob`], [`Content`]
//! - **Client messages**: [`ClientMessage`] and its payloads
//! - **Server messages**: [`ServerMessage`] and its payloads
//!
//! ## Example
//!
//! ```rust
//! use genai_live_core::messages::{ClientMessage, Content, ClientContent};
//!
//! let msg = ClientMessage::ContentUpdate(ClientContent::new(
//!     vec![Content::user("Hello!")],
//!     true,
//! ));
//! assert_eq!(msg.kind(), "client_content");
//! ```

pub mod client;
pub mod content;
pub mod parts;
pub mod server;

pub use client::{ClientContent, ClientMessage, FunctionResponse, RealtimeInput, ToolResponse};
pub use content::{Content, ROLE_MODEL, ROLE_USER};
pub use parts::{Blob, CodeExecutionResult, ExecutableCode, Part};
pub use server::{FunctionCall, ServerContent, ServerMessage, ToolCall, ToolCallCancellation};
