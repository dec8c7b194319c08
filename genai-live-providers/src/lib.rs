//! Live API providers for genai-live.
//!
//! A provider knows where a backend's socket lives and how to authenticate
//! against it:
//!
//! - **Google AI** - API key in the socket URL query
//! - **Vertex AI** - bearer token in the handshake headers
//!
//! ## Example
//!
//! ```rust,ignore
//! use genai_live_providers::{LiveProvider, VertexLiveProvider, StaticToken};
//!
//! let provider = VertexLiveProvider::new("my-project", "us-central1")
//!     .with_token_source(StaticToken::new(token));
//! let endpoint = provider.endpoint().await?;
//! ```
//!
//! ## Environment
//!
//! [`provider_from_env`] picks Vertex AI when `GOOGLE_GENAI_USE_VERTEXAI` is
//! `true` or `1`, and Google AI otherwise.

mod credentials;
mod google;
mod provider;
mod registry;
mod vertex;

pub use credentials::{EnvToken, StaticToken, TokenSource, DEFAULT_TOKEN_VAR};
pub use google::GoogleLiveProvider;
pub use provider::*;
pub use registry::ProviderRegistry;
pub use vertex::VertexLiveProvider;

use std::sync::Arc;

/// Variable that switches [`provider_from_env`] to Vertex AI.
pub const USE_VERTEX_VAR: &str = "GOOGLE_GENAI_USE_VERTEXAI";

/// Whether the environment asks for Vertex AI.
pub fn use_vertex_from_env() -> bool {
    std::env::var(USE_VERTEX_VAR)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false)
}

/// Build the provider selected by the environment.
pub fn provider_from_env() -> Result<BoxedProvider, ProviderError> {
    if use_vertex_from_env() {
        Ok(Arc::new(VertexLiveProvider::from_env()?))
    } else {
        Ok(Arc::new(GoogleLiveProvider::from_env()?))
    }
}

/// Create a provider registry configured from environment variables.
///
/// Every backend whose configuration is present is registered; the one
/// selected by [`provider_from_env`] is registered first and becomes the
/// default.
pub fn from_env() -> ProviderRegistry {
    let registry = ProviderRegistry::new();
    let google = GoogleLiveProvider::from_env().map(|p| Arc::new(p) as BoxedProvider);
    let vertex = VertexLiveProvider::from_env().map(|p| Arc::new(p) as BoxedProvider);

    let ordered = if use_vertex_from_env() {
        [vertex, google]
    } else {
        [google, vertex]
    };
    for provider in ordered.into_iter().flatten() {
        registry.register(provider);
    }
    registry
}
