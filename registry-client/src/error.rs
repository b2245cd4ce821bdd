use quota_gate::ConfigurationError;

/// Why a submission could not be delivered after admission was granted.
///
/// Transports box these into a `tower::BoxError`; the client recovers them for the
/// [`Outcome::TransportFailure`](crate::Outcome::TransportFailure) it hands back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The document could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// The transport gave up waiting for the registry.
    #[error("request to registry timed out")]
    Timeout,

    /// No connection to the registry could be established.
    #[error("failed to connect to registry: {0}")]
    Connect(String),

    /// The exchange broke down after the connection was made.
    #[error("network error: {0}")]
    Network(String),

    /// Any other failure raised inside the transport stack.
    ///
    /// The string contains the `Display` representation of the original error.
    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Errors raised while building a client. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("invalid registry base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
