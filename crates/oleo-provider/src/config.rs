//! REST provider configuration.

use crate::error::{ProviderError, ProviderResult};

/// Configuration for [`RestCredentialProvider`](crate::RestCredentialProvider).
#[derive(Clone)]
pub struct RestProviderConfig {
    /// Base URL of the identity API (e.g. "https://identity.example.com/v1").
    pub base_url: String,

    /// API key sent as the `key` query parameter on every request.
    pub api_key: String,

    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl RestProviderConfig {
    /// Create a configuration with default timeouts.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.base_url.is_empty() {
            return Err(ProviderError::invalid_response(
                "provider base_url must not be empty",
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ProviderError::invalid_response(format!(
                "provider base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.api_key.is_empty() {
            return Err(ProviderError::invalid_response(
                "provider api_key must not be empty",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for RestProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}
