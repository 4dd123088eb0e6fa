//! Requester profile and configuration
//!
//! A [`RequestProfile`] supplies the two per-requester customizations the
//! pipeline needs: a label prefixed to every diagnostic event, and headers
//! merged into every request. [`RequesterConfig`] is the stock profile.

use crate::error::ConfigError;
use apireq_transport::HttpTransportConfig;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Label used when none is configured.
pub const DEFAULT_LOG_LABEL: &str = "apireq";

/// Per-requester customization consumed by the pipeline.
///
/// The request pipeline is implemented once against this trait, so a new
/// kind of requester only has to say how it labels its logs and which
/// headers it sends.
///
/// # Example
///
/// ```
/// use apireq::RequestProfile;
/// use std::collections::HashMap;
///
/// #[derive(Debug)]
/// struct BillingApi;
///
/// impl RequestProfile for BillingApi {
///     fn log_label(&self) -> &str {
///         "billing"
///     }
///
///     fn headers(&self) -> HashMap<String, String> {
///         HashMap::from([("accept".to_string(), "application/json".to_string())])
///     }
/// }
/// ```
pub trait RequestProfile: Send + Sync + fmt::Debug {
    /// Label attached to every diagnostic event of this requester.
    fn log_label(&self) -> &str;

    /// Headers merged into every request. These win over the request's own
    /// headers on a (case-insensitive) name collision.
    fn headers(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

/// Stock requester configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterConfig {
    /// Label attached to every diagnostic event
    pub log_label: String,

    /// Headers merged into every request
    pub default_headers: HashMap<String, String>,

    /// Settings for the default HTTP transport
    pub transport: HttpTransportConfig,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            log_label: DEFAULT_LOG_LABEL.to_string(),
            default_headers: HashMap::new(),
            transport: HttpTransportConfig::default(),
        }
    }
}

impl RequesterConfig {
    /// Create a builder.
    pub fn builder() -> RequesterConfigBuilder {
        RequesterConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    /// This will look for:
    /// - `APIREQ_LOG_LABEL` for the log label
    /// - `APIREQ_TIMEOUT` for the request timeout (in seconds)
    /// - `APIREQ_CONNECT_TIMEOUT` for the connect timeout (in seconds)
    /// - `APIREQ_USER_AGENT` for a default `user-agent` header
    ///
    /// Values that fail to parse are ignored and the default is kept.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, ConfigError> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut builder = Self::builder();

        if let Ok(label) = env::var("APIREQ_LOG_LABEL") {
            builder = builder.log_label(label);
        }

        if let Ok(timeout_str) = env::var("APIREQ_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        if let Ok(timeout_str) = env::var("APIREQ_CONNECT_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            builder = builder.connect_timeout(Duration::from_secs(timeout_secs));
        }

        if let Ok(user_agent) = env::var("APIREQ_USER_AGENT") {
            builder = builder.default_header("user-agent", user_agent)?;
        }

        Ok(builder.build())
    }
}

impl RequestProfile for RequesterConfig {
    fn log_label(&self) -> &str {
        &self.log_label
    }

    fn headers(&self) -> HashMap<String, String> {
        self.default_headers.clone()
    }
}

/// Builder for creating RequesterConfig with a fluent API.
#[derive(Debug, Default)]
pub struct RequesterConfigBuilder {
    config: RequesterConfig,
}

impl RequesterConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log label.
    pub fn log_label(mut self, label: impl Into<String>) -> Self {
        self.config.log_label = label.into();
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let key = key.into();
        let value = value.into();

        let name: http::HeaderName = key
            .parse()
            .map_err(|_| ConfigError::InvalidHeaderName(key.clone()))?;
        http::HeaderValue::from_str(&value)
            .map_err(|_| ConfigError::InvalidHeaderValue(key.clone()))?;

        // HeaderName is lowercase, which keeps the map free of case-variant duplicates.
        self.config
            .default_headers
            .insert(name.as_str().to_string(), value);
        Ok(self)
    }

    /// Set the request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.transport.timeout = timeout;
        self
    }

    /// Set the connect timeout of the default transport.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.transport.connect_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RequesterConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RequesterConfig::default();
        assert_eq!(config.log_label(), DEFAULT_LOG_LABEL);
        assert!(config.headers().is_empty());
        assert_eq!(config.transport, HttpTransportConfig::default());
    }

    #[test]
    fn test_config_builder() {
        let config = RequesterConfig::builder()
            .log_label("[Weather]")
            .default_header("X-Client", "apireq-tests")
            .unwrap()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build();

        assert_eq!(config.log_label(), "[Weather]");
        assert_eq!(
            config.headers().get("x-client").map(String::as_str),
            Some("apireq-tests")
        );
        assert_eq!(config.transport.timeout, Duration::from_secs(5));
        assert_eq!(config.transport.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let err = RequesterConfig::builder()
            .default_header("bad header", "v")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName(_)));

        let err = RequesterConfig::builder()
            .default_header("x-ok", "line\nbreak")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderValue(_)));
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("APIREQ_LOG_LABEL", Some("[Env]")),
                ("APIREQ_TIMEOUT", Some("12")),
                ("APIREQ_CONNECT_TIMEOUT", Some("not-a-number")),
                ("APIREQ_USER_AGENT", Some("apireq/0.1")),
            ],
            || {
                let config = RequesterConfig::from_env().unwrap();
                assert_eq!(config.log_label, "[Env]");
                assert_eq!(config.transport.timeout, Duration::from_secs(12));
                assert_eq!(
                    config.transport.connect_timeout,
                    HttpTransportConfig::default().connect_timeout
                );
                assert_eq!(
                    config.default_headers.get("user-agent").map(String::as_str),
                    Some("apireq/0.1")
                );
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars_unset(
            [
                "APIREQ_LOG_LABEL",
                "APIREQ_TIMEOUT",
                "APIREQ_CONNECT_TIMEOUT",
                "APIREQ_USER_AGENT",
            ],
            || {
                let config = RequesterConfig::from_env().unwrap();
                assert_eq!(config, RequesterConfig::default());
            },
        );
    }
}
