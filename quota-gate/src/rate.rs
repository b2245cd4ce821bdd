use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::ConfigurationError;

/// The unit a request limit is expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// The length of one unit.
    pub const fn duration(self) -> Duration {
        match self {
            Self::Nanoseconds => Duration::from_nanos(1),
            Self::Microseconds => Duration::from_micros(1),
            Self::Milliseconds => Duration::from_millis(1),
            Self::Seconds => Duration::from_secs(1),
            Self::Minutes => Duration::from_secs(60),
            Self::Hours => Duration::from_secs(60 * 60),
            Self::Days => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// How many minutes one unit spans, possibly fractional.
    pub fn as_minutes(self) -> f64 {
        self.duration().as_secs_f64() / 60.0
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Nanoseconds => "NANOSECONDS",
            Self::Microseconds => "MICROSECONDS",
            Self::Milliseconds => "MILLISECONDS",
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both "minutes" and "minute".
        let unit = s.trim().to_ascii_uppercase();
        let unit = unit.strip_suffix('S').unwrap_or(&unit);
        match unit {
            "NANOSECOND" => Ok(Self::Nanoseconds),
            "MICROSECOND" => Ok(Self::Microseconds),
            "MILLISECOND" => Ok(Self::Milliseconds),
            "SECOND" => Ok(Self::Seconds),
            "MINUTE" => Ok(Self::Minutes),
            "HOUR" => Ok(Self::Hours),
            "DAY" => Ok(Self::Days),
            _ => Err(ConfigurationError::UnknownTimeUnit(s.to_string())),
        }
    }
}

/// A validated admission rate: `request_limit` admissions per `window`.
///
/// Deserializes from `{ "time_unit": "MINUTES", "request_limit": 10 }` and runs the same
/// validation as [`RateLimit::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRateLimit")]
pub struct RateLimit {
    window: Duration,
    request_limit: NonZeroUsize,
    refill_interval: Duration,
}

#[derive(Deserialize)]
struct RawRateLimit {
    time_unit: TimeUnit,
    request_limit: usize,
}

impl TryFrom<RawRateLimit> for RateLimit {
    type Error = ConfigurationError;

    fn try_from(raw: RawRateLimit) -> Result<Self, Self::Error> {
        Self::new(raw.time_unit, raw.request_limit)
    }
}

impl RateLimit {
    /// `request_limit` admissions per one `time_unit`.
    pub fn new(time_unit: TimeUnit, request_limit: usize) -> Result<Self, ConfigurationError> {
        Self::per(time_unit.duration(), request_limit)
    }

    /// `request_limit` admissions per arbitrary `window`.
    pub fn per(window: Duration, request_limit: usize) -> Result<Self, ConfigurationError> {
        let request_limit = NonZeroUsize::new(request_limit).ok_or(ConfigurationError::ZeroLimit)?;
        if window.is_zero() {
            return Err(ConfigurationError::ZeroWindow);
        }
        let window_ns: u64 = window
            .as_nanos()
            .try_into()
            .map_err(|_| ConfigurationError::WindowTooLong(window))?;

        // Round up so the effective rate never exceeds the nominal one. A limit finer than
        // one nanosecond per token is clamped to 1ns.
        let refill_ns = window_ns.div_ceil(request_limit.get() as u64).max(1);

        Ok(Self {
            window,
            request_limit,
            refill_interval: Duration::from_nanos(refill_ns),
        })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn request_limit(&self) -> NonZeroUsize {
        self.request_limit
    }

    /// Time needed to accrue a single token.
    pub fn refill_interval(&self) -> Duration {
        self.refill_interval
    }

    /// Nominal refill rate in tokens per minute.
    pub fn per_minute(&self) -> f64 {
        self.request_limit.get() as f64 * 60.0 / self.window.as_secs_f64()
    }
}
