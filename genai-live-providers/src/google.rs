//! Google AI (Generative Language API) live provider.

use crate::provider::{websocket_base, LiveEndpoint, LiveProvider, ProviderConfig, ProviderError};
use async_trait::async_trait;
use genai_live_core::Dialect;
use genai_live_models::{BoxedCodec, GoogleAiCodec};
use std::sync::Arc;
use url::Url;

/// Default socket host for Google AI.
pub const DEFAULT_BASE_URL: &str = "wss://generativelanguage.googleapis.com";
/// Default API version for Google AI.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Google AI live provider, authenticated with an API key.
#[derive(Clone)]
pub struct GoogleLiveProvider {
    api_key: String,
    base_url: String,
    api_version: String,
}

impl GoogleLiveProvider {
    /// Create a new Google AI provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Create from configuration.
    pub fn from_config(config: ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .ok_or(ProviderError::MissingApiKey("GOOGLE_API_KEY"))?;
        let base_url = match config.base_url {
            Some(url) => websocket_base(&url)?,
            None => DEFAULT_BASE_URL.to_string(),
        };
        Ok(Self {
            api_key,
            base_url,
            api_version: config
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }

    /// Create from environment variables.
    ///
    /// Reads `GOOGLE_API_KEY`, `GOOGLE_BASE_URL` and `GOOGLE_API_VERSION`.
    pub fn from_env() -> Result<Self, ProviderError> {
        let config = ProviderConfig::from_env("GOOGLE");
        Self::from_config(config)
    }

    /// Override the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ProviderError> {
        self.base_url = websocket_base(url)?;
        Ok(self)
    }

    fn socket_url(&self) -> Result<Url, ProviderError> {
        let raw = format!(
            "{}/ws/google.ai.generativelanguage.{}.GenerativeService.BidiGenerateContent",
            self.base_url, self.api_version
        );
        let mut url = Url::parse(&raw).map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl std::fmt::Debug for GoogleLiveProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleLiveProvider")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LiveProvider for GoogleLiveProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn dialect(&self) -> Dialect {
        Dialect::GoogleAi
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn codec(&self) -> BoxedCodec {
        Arc::new(GoogleAiCodec::new())
    }

    async fn endpoint(&self) -> Result<LiveEndpoint, ProviderError> {
        Ok(LiveEndpoint::new(self.socket_url()?))
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn aliases(&self) -> &[&str] {
        &["google-ai", "gemini"]
    }
}
