//! # genai-live-streaming
//!
//! Live sessions for genai-live.
//!
//! This crate owns the connection side of the workspace: opening a socket,
//! running the setup handshake, sending canonical messages as frames, and
//! reading server messages back until a turn completes.
//!
//! ## Core Concepts
//!
//! - **[`connect`]** / **[`handshake`]**: Negotiate a session
//! - **[`Session`]**: Send input, receive turns, close
//! - **[`StreamCoordinator`]**: Stream a byte source in while draining replies
//! - **[`LiveTransport`]**: The duplex frame transport seam
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use genai_live_providers::GoogleLiveProvider;
//! use genai_live_streaming::connect;
//!
//! let provider = GoogleLiveProvider::from_env()?;
//! let mut session = connect(&provider, "gemini-2.0-flash-exp", None).await?;
//!
//! session.send("Hello!", true).await?;
//! let mut turn = session.receive();
//! while let Some(message) = turn.next().await {
//!     if let Some(text) = message?.text() {
//!         print!("{}", text);
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `websocket` (default): the tokio-tungstenite transport and [`connect`]

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod coordinator;
pub mod error;
pub mod negotiator;
pub mod session;
pub mod transport;

#[cfg(feature = "websocket")]
#[cfg_attr(docsrs, doc(cfg(feature = "websocket")))]
pub mod websocket;

// Re-exports
pub use coordinator::{CoordinatedStream, CoordinatorConfig, StreamCoordinator};
pub use error::{StreamError, StreamResult};
pub use negotiator::handshake;
pub use session::{Session, SessionReceiver, SessionSender};
pub use transport::{
    BoxedFrameSink, BoxedFrameSource, FrameSink, FrameSource, LiveTransport, MemoryPeer,
    MemoryTransport,
};

#[cfg(feature = "websocket")]
pub use negotiator::connect;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConfig, WebSocketTransport};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::coordinator::{CoordinatedStream, StreamCoordinator};
    pub use crate::error::{StreamError, StreamResult};
    pub use crate::negotiator::handshake;
    pub use crate::session::Session;
    pub use crate::transport::LiveTransport;

    #[cfg(feature = "websocket")]
    pub use crate::negotiator::connect;
}
