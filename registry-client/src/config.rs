use std::time::Duration;

use quota_gate::RateLimit;
use quota_gate::TimeUnit;
use serde::Deserialize;
use serde::Deserializer;

use crate::ClientError;

/// Relative path of the document creation endpoint.
pub const DEFAULT_PATH: &str = "documents/create";

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

/// Everything needed to build a [`RegistryClient`](crate::RegistryClient).
///
/// Deserializes from e.g.
///
/// ```json
/// {
///   "base_url": "http://localhost:8080/",
///   "rate": { "time_unit": "MINUTES", "request_limit": 10 },
///   "request_timeout_ms": 5000
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    base_url: String,
    #[serde(default = "default_path")]
    path: String,
    rate: RateLimit,
    #[serde(default, rename = "request_timeout_ms", deserialize_with = "millis")]
    request_timeout: Option<Duration>,
    #[serde(default)]
    bearer_token: Option<String>,
}

impl ClientConfig {
    /// A client for `base_url` admitting `request_limit` submissions per `time_unit`.
    pub fn new(
        base_url: impl Into<String>,
        time_unit: TimeUnit,
        request_limit: usize,
    ) -> Result<Self, ClientError> {
        Ok(Self::with_rate(
            base_url,
            RateLimit::new(time_unit, request_limit)?,
        ))
    }

    pub fn with_rate(base_url: impl Into<String>, rate: RateLimit) -> Self {
        Self {
            base_url: base_url.into(),
            path: default_path(),
            rate,
            request_timeout: None,
            bearer_token: None,
        }
    }

    /// Override the endpoint path, relative to the base url.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Bound each HTTP exchange. The admission wait is never subject to this timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Send `Authorization: Bearer <token>` with every submission.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn rate(&self) -> RateLimit {
        self.rate
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}
