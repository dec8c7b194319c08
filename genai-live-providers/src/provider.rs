//! Provider trait and common configuration.
//!
//! A provider represents one live backend: where its socket lives, how to
//! authenticate, and which codec speaks its dialect.

use async_trait::async_trait;
use genai_live_core::{Dialect, LiveError};
use genai_live_models::BoxedCodec;
use std::sync::Arc;
use url::Url;

/// Provider trait - provides authenticated access to a live endpoint.
///
/// Providers handle:
/// - Authentication (API keys, bearer tokens)
/// - Base URLs, API versions, and the socket path
/// - Choosing the codec for their dialect
#[async_trait]
pub trait LiveProvider: Send + Sync + std::fmt::Debug {
    /// Provider name (e.g., "google", "google-vertex").
    fn name(&self) -> &str;

    /// Wire dialect spoken by this backend.
    fn dialect(&self) -> Dialect;

    /// WebSocket base URL (scheme and host).
    fn base_url(&self) -> &str;

    /// API version used in the socket path.
    fn api_version(&self) -> &str;

    /// Codec for this backend.
    fn codec(&self) -> BoxedCodec;

    /// Resolve the socket URL and headers, fetching credentials if needed.
    async fn endpoint(&self) -> Result<LiveEndpoint, ProviderError>;

    /// Check if the provider is configured (has credentials).
    fn is_configured(&self) -> bool {
        true
    }

    /// Get alternate names for this provider.
    fn aliases(&self) -> &[&str] {
        &[]
    }
}

/// Type alias for boxed providers.
pub type BoxedProvider = Arc<dyn LiveProvider>;

/// A resolved socket endpoint.
#[derive(Clone)]
pub struct LiveEndpoint {
    /// Socket URL, possibly carrying an API key in its query.
    pub url: String,
    /// Extra handshake headers.
    pub headers: Vec<(String, String)>,
}

impl LiveEndpoint {
    /// Create an endpoint with no extra headers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set a bearer authorization header.
    #[must_use]
    pub fn with_bearer(self, token: impl AsRef<str>) -> Self {
        self.with_header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// The URL without its query string, safe to log.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        match self.url.split_once('?') {
            Some((path, _)) => path.to_string(),
            None => self.url.clone(),
        }
    }
}

impl std::fmt::Debug for LiveEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("LiveEndpoint")
            .field("url", &self.redacted_url())
            .field("headers", &header_names)
            .finish()
    }
}

/// Common configuration for providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// API key for authentication.
    pub api_key: Option<String>,
    /// Custom base URL.
    pub base_url: Option<String>,
    /// API version.
    pub api_version: Option<String>,
    /// Project ID (Vertex AI).
    pub project: Option<String>,
    /// Region/location (Vertex AI).
    pub region: Option<String>,
}

impl ProviderConfig {
    /// Create a new empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set project.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Load from environment variables with given prefix.
    ///
    /// Looks for:
    /// - `{PREFIX}_API_KEY`
    /// - `{PREFIX}_BASE_URL`
    /// - `{PREFIX}_API_VERSION`
    /// - `{PREFIX}_PROJECT`
    /// - `{PREFIX}_REGION`
    pub fn from_env(prefix: &str) -> Self {
        Self {
            api_key: env_var(&format!("{}_API_KEY", prefix)),
            base_url: env_var(&format!("{}_BASE_URL", prefix)),
            api_version: env_var(&format!("{}_API_VERSION", prefix)),
            project: env_var(&format!("{}_PROJECT", prefix)),
            region: env_var(&format!("{}_REGION", prefix)),
        }
    }
}

/// Read a non-empty environment variable.
pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Normalize a base URL to a WebSocket scheme without a trailing slash.
///
/// `https` becomes `wss` and `http` becomes `ws`.
pub fn websocket_base(base_url: &str) -> Result<String, ProviderError> {
    let mut url =
        Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(ProviderError::InvalidUrl(format!(
                "unsupported scheme '{}' in {}",
                other, base_url
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| ProviderError::InvalidUrl(base_url.to_string()))?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Provider error types.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Missing API key.
    #[error("Missing API key: {0}")]
    MissingApiKey(&'static str),

    /// Missing required configuration.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Unknown provider prefix.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Invalid endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Credentials could not be obtained.
    #[error("Credentials error: {0}")]
    Credentials(String),
}

impl From<ProviderError> for LiveError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Credentials(message) => LiveError::Credentials(message),
            other => LiveError::Configuration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_provider_config_builder() {
        let config = ProviderConfig::new()
            .with_api_key("key-test")
            .with_base_url("https://api.example.com")
            .with_api_version("v1alpha")
            .with_project("proj")
            .with_region("europe-west4");

        assert_eq!(config.api_key, Some("key-test".to_string()));
        assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
        assert_eq!(config.api_version, Some("v1alpha".to_string()));
        assert_eq!(config.project, Some("proj".to_string()));
        assert_eq!(config.region, Some("europe-west4".to_string()));
    }

    #[test]
    fn test_provider_config_from_env() {
        // Set env vars for test
        std::env::set_var("TEST_LIVE_PROVIDER_API_KEY", "test-key");
        std::env::set_var("TEST_LIVE_PROVIDER_BASE_URL", "https://test.com");
        std::env::set_var("TEST_LIVE_PROVIDER_API_VERSION", "");

        let config = ProviderConfig::from_env("TEST_LIVE_PROVIDER");

        assert_eq!(config.api_key, Some("test-key".to_string()));
        assert_eq!(config.base_url, Some("https://test.com".to_string()));
        assert_eq!(config.api_version, None);

        // Clean up
        std::env::remove_var("TEST_LIVE_PROVIDER_API_KEY");
        std::env::remove_var("TEST_LIVE_PROVIDER_BASE_URL");
        std::env::remove_var("TEST_LIVE_PROVIDER_API_VERSION");
    }

    #[rstest]
    #[case("https://example.com", "wss://example.com")]
    #[case("http://localhost:8080/", "ws://localhost:8080")]
    #[case("wss://example.com/", "wss://example.com")]
    fn test_websocket_base(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(websocket_base(input).unwrap(), expected);
    }

    #[test]
    fn test_websocket_base_rejects_other_schemes() {
        assert!(matches!(
            websocket_base("ftp://example.com"),
            Err(ProviderError::InvalidUrl(_))
        ));
        assert!(websocket_base("not a url").is_err());
    }

    #[test]
    fn test_endpoint_debug_hides_secrets() {
        let endpoint = LiveEndpoint::new("wss://host/ws/path?key=secret").with_bearer("token");
        let debug = format!("{:?}", endpoint);
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("token\""));
        assert!(debug.contains("Authorization"));
        assert_eq!(endpoint.redacted_url(), "wss://host/ws/path");
    }

    #[test]
    fn test_error_conversion() {
        let err: LiveError = ProviderError::MissingApiKey("GOOGLE_API_KEY").into();
        assert!(matches!(err, LiveError::Configuration(_)));
        let err: LiveError = ProviderError::Credentials("expired".into()).into();
        assert!(matches!(err, LiveError::Credentials(_)));
    }
}
