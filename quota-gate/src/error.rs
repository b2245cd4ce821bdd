use std::time::Duration;

/// Invalid rate-limit parameters.
///
/// These are detected when a [`RateLimit`](crate::RateLimit) is built, before any gate exists,
/// and are never worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("request limit must be a positive integer")]
    ZeroLimit,

    #[error("rate limit window must be a positive duration")]
    ZeroWindow,

    #[error("rate limit window of {0:?} cannot be represented in nanoseconds")]
    WindowTooLong(Duration),

    #[error("unknown time unit: {0}")]
    UnknownTimeUnit(String),
}
