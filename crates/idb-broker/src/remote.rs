//! Remote attribute source.
//!
//! The reference policy is an HTTP GET against a configured base URL, keyed
//! on the attempt's identity fields, returning a JSON document from which a
//! single configured field is read. The source sits behind the
//! [`RemoteSource`] trait so deployments can swap the transport or the
//! lookup policy without touching the resolution engine.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::coerce::coerce;
use crate::context::BrokeredContext;
use crate::error::{BrokerError, BrokerResult};
use crate::value::AttributeValue;

/// Default connection-establishment timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default budget for acquiring a pooled connection.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
/// Default socket read timeout.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(15);
/// Default field read out of the response document.
const DEFAULT_VALUE_POINTER: &str = "/company/name";

/// A source of externally-held attribute data.
///
/// Implementations must fail with a typed error rather than stall: the
/// resolver treats any error as "no value" for the attempt, and the
/// federation flow must not block on a slow source.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetches the attribute value for the given attempt.
    ///
    /// Returns `Ok(None)` when the source holds no usable value.
    ///
    /// ## Errors
    ///
    /// Returns transport, timeout, or payload errors; the caller logs them
    /// and continues the attempt without a value.
    async fn fetch(&self, context: &BrokeredContext) -> BrokerResult<Option<AttributeValue>>;
}

/// Configuration for the HTTP remote source.
#[derive(Debug, Clone)]
pub struct RemoteSourceConfig {
    /// Base URL the lookup key is appended to.
    pub base_url: Url,

    /// JSON pointer selecting the field to read from the response.
    pub value_pointer: String,

    /// Connection-establishment timeout.
    pub connect_timeout: Duration,

    /// Budget for acquiring a pooled connection; folded into the overall
    /// per-call deadline.
    pub request_timeout: Duration,

    /// Socket read timeout.
    pub read_timeout: Duration,
}

impl RemoteSourceConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> RemoteSourceConfigBuilder {
        RemoteSourceConfigBuilder::new()
    }

    /// Total wall-clock budget for one fetch.
    #[must_use]
    pub fn total_budget(&self) -> Duration {
        self.connect_timeout + self.request_timeout + self.read_timeout
    }
}

/// Builder for [`RemoteSourceConfig`].
#[derive(Debug)]
pub struct RemoteSourceConfigBuilder {
    base_url: Option<String>,
    value_pointer: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    read_timeout: Duration,
}

impl RemoteSourceConfigBuilder {
    /// Creates a builder with the default timeouts and field pointer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: None,
            value_pointer: DEFAULT_VALUE_POINTER.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the JSON pointer read from the response.
    #[must_use]
    pub fn value_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.value_pointer = pointer.into();
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the connection-acquisition budget.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Builds the configuration.
    ///
    /// ## Errors
    ///
    /// Returns `BrokerError::Configuration` when the base URL is missing or
    /// unparseable, the pointer is malformed, or a timeout is zero.
    pub fn build(self) -> BrokerResult<RemoteSourceConfig> {
        let raw = self
            .base_url
            .ok_or_else(|| BrokerError::config("remote source base URL is required"))?;
        let base_url = Url::parse(&raw)
            .map_err(|e| BrokerError::config(format!("invalid remote source base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BrokerError::config(
                "remote source base URL cannot carry path segments",
            ));
        }

        if !self.value_pointer.starts_with('/') {
            return Err(BrokerError::config(format!(
                "value pointer '{}' must start with '/'",
                self.value_pointer
            )));
        }

        for (name, timeout) in [
            ("connect", self.connect_timeout),
            ("request", self.request_timeout),
            ("read", self.read_timeout),
        ] {
            if timeout.is_zero() {
                return Err(BrokerError::config(format!(
                    "{name} timeout must be finite and non-zero"
                )));
            }
        }

        Ok(RemoteSourceConfig {
            base_url,
            value_pointer: self.value_pointer,
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
            read_timeout: self.read_timeout,
        })
    }
}

impl Default for RemoteSourceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP implementation of [`RemoteSource`].
pub struct HttpRemoteSource {
    config: RemoteSourceConfig,
    client: reqwest::Client,
}

impl HttpRemoteSource {
    /// Creates a source with a client enforcing the configured timeouts.
    ///
    /// ## Errors
    ///
    /// Returns `BrokerError::Internal` when the HTTP client cannot be built.
    pub fn new(config: RemoteSourceConfig) -> BrokerResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()
            .map_err(|e| BrokerError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Returns the source configuration.
    #[must_use]
    pub const fn config(&self) -> &RemoteSourceConfig {
        &self.config
    }

    /// Composes the lookup URL for an attempt.
    ///
    /// The lookup key is the asserted email when present, else the proposed
    /// username, appended as a percent-encoded path segment.
    fn lookup_url(&self, context: &BrokeredContext) -> BrokerResult<Url> {
        let key = context
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .unwrap_or(&context.username);

        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BrokerError::config("remote source base URL cannot carry path segments"))?
            .pop_if_empty()
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch(&self, context: &BrokeredContext) -> BrokerResult<Option<AttributeValue>> {
        let url = self.lookup_url(context)?;
        tracing::debug!(flow = %context.flow_id, url = %url, "fetching remote attribute data");

        let request = async {
            let response = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?
                .error_for_status()?;
            response.json::<serde_json::Value>().await
        };

        let budget = self.config.total_budget();
        let document = match tokio::time::timeout(budget, request).await {
            Err(_) => {
                return Err(BrokerError::timeout(format!(
                    "remote fetch exceeded the {}ms budget",
                    budget.as_millis()
                )))
            }
            Ok(Err(transport)) => return Err(transport.into()),
            Ok(Ok(document)) => document,
        };

        let Some(node) = document.pointer(&self.config.value_pointer) else {
            tracing::warn!(
                flow = %context.flow_id,
                pointer = %self.config.value_pointer,
                "no usable data found in the response"
            );
            return Ok(None);
        };

        Ok(coerce(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base_url: &str) -> HttpRemoteSource {
        let config = RemoteSourceConfig::builder()
            .base_url(base_url)
            .build()
            .unwrap();
        HttpRemoteSource::new(config).unwrap()
    }

    #[test]
    fn builder_applies_defaults() {
        let config = RemoteSourceConfig::builder()
            .base_url("https://directory.example.com/users")
            .build()
            .unwrap();

        assert_eq!(config.value_pointer, "/company/name");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.read_timeout, Duration::from_secs(15));
        assert_eq!(config.total_budget(), Duration::from_secs(23));
    }

    #[test]
    fn builder_rejects_bad_input() {
        assert!(RemoteSourceConfig::builder().build().is_err());

        assert!(RemoteSourceConfig::builder()
            .base_url("not a url")
            .build()
            .is_err());

        assert!(RemoteSourceConfig::builder()
            .base_url("https://directory.example.com")
            .value_pointer("company.name")
            .build()
            .is_err());

        assert!(RemoteSourceConfig::builder()
            .base_url("https://directory.example.com")
            .connect_timeout(Duration::ZERO)
            .build()
            .is_err());
    }

    #[test]
    fn lookup_url_prefers_email() {
        let source = source("https://directory.example.com/users");
        let context = BrokeredContext::new("corporate-oidc", "ext-123", "jdoe")
            .with_email("jdoe@example.com");

        let url = source.lookup_url(&context).unwrap();
        assert_eq!(
            url.as_str(),
            "https://directory.example.com/users/jdoe@example.com"
        );
    }

    #[test]
    fn lookup_url_falls_back_to_username() {
        let source = source("https://directory.example.com/users/");
        let context = BrokeredContext::new("corporate-oidc", "ext-123", "jdoe");

        let url = source.lookup_url(&context).unwrap();
        assert_eq!(url.as_str(), "https://directory.example.com/users/jdoe");
    }

    #[test]
    fn lookup_url_encodes_reserved_characters() {
        let source = source("https://directory.example.com/users");
        let context = BrokeredContext::new("corporate-oidc", "ext-123", "j doe/../admin");

        let url = source.lookup_url(&context).unwrap();
        assert_eq!(
            url.as_str(),
            "https://directory.example.com/users/j%20doe%2F..%2Fadmin"
        );
    }
}
