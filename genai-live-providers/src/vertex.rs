//! Vertex AI live provider.

use crate::credentials::{EnvToken, TokenSource};
use crate::provider::{
    env_var, websocket_base, LiveEndpoint, LiveProvider, ProviderConfig, ProviderError,
};
use async_trait::async_trait;
use genai_live_core::Dialect;
use genai_live_models::{BoxedCodec, VertexAiCodec};
use std::sync::Arc;

/// Region used when none is configured.
pub const DEFAULT_LOCATION: &str = "us-central1";
/// Default API version for Vertex AI.
pub const DEFAULT_API_VERSION: &str = "v1beta1";

/// Vertex AI live provider, authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct VertexLiveProvider {
    project: String,
    location: String,
    base_url: String,
    api_version: String,
    token_source: Arc<dyn TokenSource>,
}

impl VertexLiveProvider {
    /// Create a new Vertex AI provider.
    ///
    /// Tokens are read from `GOOGLE_OAUTH_ACCESS_TOKEN` unless a source is
    /// supplied with [`with_token_source`](Self::with_token_source).
    pub fn new(project: impl Into<String>, location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            project: project.into(),
            base_url: default_base_url(&location),
            location,
            api_version: DEFAULT_API_VERSION.to_string(),
            token_source: Arc::new(EnvToken::default()),
        }
    }

    /// Create from configuration.
    pub fn from_config(config: ProviderConfig) -> Result<Self, ProviderError> {
        let project = config
            .project
            .ok_or_else(|| ProviderError::MissingConfig("VERTEX_PROJECT".into()))?;
        let mut provider = Self::new(
            project,
            config.region.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        );
        if let Some(url) = config.base_url {
            provider.base_url = websocket_base(&url)?;
        }
        if let Some(version) = config.api_version {
            provider.api_version = version;
        }
        Ok(provider)
    }

    /// Create from environment variables.
    ///
    /// The project comes from `VERTEX_PROJECT`, `GOOGLE_CLOUD_PROJECT` or
    /// `GCLOUD_PROJECT`; the region from `VERTEX_REGION`,
    /// `GOOGLE_CLOUD_LOCATION` or `GOOGLE_CLOUD_REGION`.
    pub fn from_env() -> Result<Self, ProviderError> {
        let mut config = ProviderConfig::from_env("VERTEX");
        if config.project.is_none() {
            config.project = env_var("GOOGLE_CLOUD_PROJECT").or_else(|| env_var("GCLOUD_PROJECT"));
        }
        if config.region.is_none() {
            config.region =
                env_var("GOOGLE_CLOUD_LOCATION").or_else(|| env_var("GOOGLE_CLOUD_REGION"));
        }
        Self::from_config(config)
    }

    /// Use a different token source.
    #[must_use]
    pub fn with_token_source(mut self, source: impl TokenSource + 'static) -> Self {
        self.token_source = Arc::new(source);
        self
    }

    /// Override the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Get the project ID.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Get the location.
    pub fn location(&self) -> &str {
        &self.location
    }

    fn socket_url(&self) -> String {
        format!(
            "{}/ws/google.cloud.aiplatform.{}.LlmBidiService/BidiGenerateContent",
            self.base_url, self.api_version
        )
    }
}

fn default_base_url(location: &str) -> String {
    format!("wss://{}-aiplatform.googleapis.com", location)
}

#[async_trait]
impl LiveProvider for VertexLiveProvider {
    fn name(&self) -> &str {
        "google-vertex"
    }

    fn dialect(&self) -> Dialect {
        Dialect::VertexAi
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn codec(&self) -> BoxedCodec {
        Arc::new(VertexAiCodec::new().with_resource(&self.project, &self.location))
    }

    async fn endpoint(&self) -> Result<LiveEndpoint, ProviderError> {
        let token = self
            .token_source
            .token()
            .await
            .map_err(|e| ProviderError::Credentials(e.to_string()))?;
        Ok(LiveEndpoint::new(self.socket_url()).with_bearer(token))
    }

    fn is_configured(&self) -> bool {
        !self.project.is_empty()
    }

    fn aliases(&self) -> &[&str] {
        &["vertex", "vertexai"]
    }
}
