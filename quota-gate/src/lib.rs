//! # quota-gate
//!
//! `quota-gate` provides a single, shareable admission gate that enforces
//! "at most N operations per window" across any number of concurrent callers.
//!
//! ## Core Philosophy
//!
//! Callers queue rather than fail. [`QuotaGate::acquire`] suspends the calling task until an
//! admission unit is available, consumes exactly one, and returns. The token count itself is a
//! single atomic updated with a Compare-And-Swap (CAS) loop, so refill and deduction happen as
//! one step and no two callers can ever take the same token.
//!
//! ## Key Concepts
//!
//! * **Starts Empty**: A new gate holds no tokens. The first admission happens one refill
//!   interval (`window / limit`) after construction.
//! * **Lazy Refill**: Tokens are credited at the moment of the request, so there is no
//!   background worker thread or timer.
//! * **FIFO Waiters**: Suspended callers are admitted in arrival order. Dropping a pending
//!   `acquire` future abandons the attempt without spending a token.
//! * **Injectable Clock**: The [`Clock`] trait lets tests drive time deterministically.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use quota_gate::QuotaGate;
//! use quota_gate::TimeUnit;
//!
//! # async fn run() -> Result<(), quota_gate::ConfigurationError> {
//! let gate = Arc::new(QuotaGate::new(TimeUnit::Minutes, 10)?);
//!
//! gate.acquire().await;
//! // One admission unit spent; perform the guarded call here.
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

mod clock;
mod error;
mod gate;
mod rate;

pub use clock::Clock;
pub use clock::MonotonicClock;
pub use clock::TokioClock;
pub use error::ConfigurationError;
pub use gate::QuotaGate;
pub use rate::RateLimit;
pub use rate::TimeUnit;

/// Reasons why an admission attempt might not succeed immediately.
#[derive(Debug, PartialEq)]
pub enum Reason {
    /// No token is available yet. One will have accrued after `retry_after`.
    Exhausted { retry_after: Duration },
}
