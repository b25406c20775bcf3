//! Client configuration.
//!
//! Everything the client needs for its lifetime lives in [`ClientConfig`]:
//! the API key, the optional webhook secret and the service base URL. Once
//! built the config is immutable; [`crate::ConversionClient`] takes it by
//! value and never hands out a mutable reference.
//!
//! Per-conversion knobs (poll interval, timeout, destination) are not here;
//! they belong to [`crate::ConversionRequest`] and [`crate::AwaitOptions`].

use crate::error::{Html2PdfError, Result};
use std::fmt;

/// Production endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.html2pdfconverter.com";

/// Environment variable read by [`ClientConfig::from_env`] for the API key.
pub const ENV_API_KEY: &str = "HTML2PDF_API_KEY";
/// Environment variable read by [`ClientConfig::from_env`] for the webhook secret.
pub const ENV_WEBHOOK_SECRET: &str = "HTML2PDF_WEBHOOK_SECRET";
/// Environment variable read by [`ClientConfig::from_env`] for the base URL.
pub const ENV_BASE_URL: &str = "HTML2PDF_BASE_URL";

/// Configuration for a [`crate::ConversionClient`].
///
/// # Example
/// ```rust
/// use html2pdf_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .api_key("my-key")
///     .webhook_secret("whsec")
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url(), "https://api.html2pdfconverter.com");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    webhook_secret: Option<String>,
    base_url: String,
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Shortcut for a config with only an API key and every other field defaulted.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Load the config from `HTML2PDF_API_KEY`, `HTML2PDF_WEBHOOK_SECRET`
    /// and `HTML2PDF_BASE_URL`.
    ///
    /// Fails with [`Html2PdfError::MissingApiKey`] when the key is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(key) = lookup(ENV_API_KEY) {
            builder = builder.api_key(key);
        }
        if let Some(secret) = lookup(ENV_WEBHOOK_SECRET).filter(|s| !s.is_empty()) {
            builder = builder.webhook_secret(secret);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|s| !s.is_empty()) {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Html2PdfError::MissingApiKey);
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    webhook_secret: Option<String>,
    base_url: Option<String>,
}

impl ClientConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Secret shared with the service, required only by
    /// [`crate::ConversionClient::verify_webhook`].
    pub fn webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Override the service endpoint (staging, self-hosted, test server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig> {
        let config = ClientConfig {
            api_key: self.api_key.unwrap_or_default(),
            webhook_secret: self.webhook_secret,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };
        config.validate()?;
        Ok(config)
    }
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_api_key_fails() {
        let err = ClientConfig::builder().build().unwrap_err();
        assert!(matches!(err, Html2PdfError::MissingApiKey));
    }

    #[test]
    fn empty_api_key_fails() {
        assert!(matches!(
            ClientConfig::new("").unwrap_err(),
            Html2PdfError::MissingApiKey
        ));
        assert!(matches!(
            ClientConfig::new("   ").unwrap_err(),
            Html2PdfError::MissingApiKey
        ));
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::new("test-key").unwrap();
        assert_eq!(config.api_key(), "test-key");
        assert_eq!(config.webhook_secret(), None);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn from_lookup_reads_all_vars() {
        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, "k"),
            (ENV_WEBHOOK_SECRET, "s"),
            (ENV_BASE_URL, "http://localhost:9000"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_key(), "k");
        assert_eq!(config.webhook_secret(), Some("s"));
        assert_eq!(config.base_url(), "http://localhost:9000");
    }

    #[test]
    fn from_lookup_without_key_fails() {
        let err = ClientConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, Html2PdfError::MissingApiKey));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = ClientConfig::builder()
            .api_key("super-secret-key")
            .webhook_secret("whsec-123")
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("super-secret-key"), "got: {dbg}");
        assert!(!dbg.contains("whsec-123"), "got: {dbg}");
        assert!(dbg.contains(DEFAULT_BASE_URL));
    }
}
