//! Feedback provider configuration.

use serde::{Deserialize, Serialize};

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default generative model.
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

/// Default REST endpoint for model calls.
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

/// Default request timeout in seconds.
fn default_timeout_seconds() -> u64 {
    30
}

/// Settings for the remote feedback provider.
///
/// Without an API key no remote call is attempted and the provider answers
/// with its "unconfigured" fallbacks.
///
/// # Example
///
/// ```
/// use lockin::feedback::FeedbackConfig;
///
/// let config = FeedbackConfig::default();
/// assert!(!config.is_configured());
/// assert_eq!(config.model, "gemini-2.5-flash");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackConfig {
    /// API credential. Never written out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Model name used in the request path.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the models endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl FeedbackConfig {
    /// Sets the API key. Blank keys are treated as absent.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Overrides the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the endpoint base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the timeout in seconds.
    pub fn set_timeout(&mut self, seconds: u64) {
        self.timeout_seconds = seconds;
    }

    /// Returns the usable API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Returns true if remote calls will be attempted.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedbackConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        let config = FeedbackConfig::default().with_api_key(Some("   ".to_string()));
        assert!(!config.is_configured());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_key_is_configured() {
        let config = FeedbackConfig::default().with_api_key(Some("abc".to_string()));
        assert!(config.is_configured());
        assert_eq!(config.api_key(), Some("abc"));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = FeedbackConfig::default().with_api_key(Some("secret".to_string()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_deserialize_empty_json_uses_defaults() {
        let config: FeedbackConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FeedbackConfig::default());
    }

    #[test]
    fn test_builders() {
        let mut config = FeedbackConfig::default()
            .with_model("gemini-pro")
            .with_base_url("http://localhost:1234");
        config.set_timeout(3);
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.timeout_seconds, 3);
    }
}
