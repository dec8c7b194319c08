//! Bearer token sources for Vertex AI.
//!
//! Acquiring tokens from an identity provider is the application's job; this
//! module only defines the seam and two simple sources.

use async_trait::async_trait;

use crate::provider::env_var;

/// Environment variable read by [`EnvToken::default`].
pub const DEFAULT_TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Something that can hand out a bearer token.
///
/// Called once per connection attempt; implementations may cache and refresh.
#[async_trait]
pub trait TokenSource: Send + Sync + std::fmt::Debug {
    /// Get a current access token.
    async fn token(&self) -> anyhow::Result<String>;
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Read from the given variable.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// The variable name.
    #[must_use]
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VAR)
    }
}

#[async_trait]
impl TokenSource for EnvToken {
    async fn token(&self) -> anyhow::Result<String> {
        env_var(&self.var).ok_or_else(|| anyhow::anyhow!("{} is not set", self.var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let source = StaticToken::new("abc");
        assert_eq!(source.token().await.unwrap(), "abc");
        assert_eq!(format!("{:?}", source), "StaticToken(..)");
    }

    #[tokio::test]
    async fn test_env_token() {
        std::env::set_var("TEST_LIVE_TOKEN_PRESENT", "from-env");
        let source = EnvToken::new("TEST_LIVE_TOKEN_PRESENT");
        assert_eq!(source.token().await.unwrap(), "from-env");
        std::env::remove_var("TEST_LIVE_TOKEN_PRESENT");

        let missing = EnvToken::new("TEST_LIVE_TOKEN_MISSING");
        let err = missing.token().await.unwrap_err();
        assert!(err.to_string().contains("TEST_LIVE_TOKEN_MISSING"));
    }
}
