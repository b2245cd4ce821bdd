use std::fmt::Debug;
use std::time::Duration;

/// A monotonic time source for a [`QuotaGate`](crate::QuotaGate).
///
/// Readings are offsets from a fixed anchor chosen by the clock. They must never go backwards.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Time elapsed since the clock's anchor.
    fn elapsed(&self) -> Duration;
}

/// The default clock, backed by `quanta`.
///
/// Use [`MonotonicClock::with_clock`] together with `quanta::Clock::mock()` to control time
/// by hand in tests.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    clock: quanta::Clock,
    /// A fixed point in time (TSC tick) to calculate deltas from.
    anchor: quanta::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::with_clock(quanta::Clock::new())
    }

    pub fn with_clock(clock: quanta::Clock) -> Self {
        let anchor = clock.now();
        Self { clock, anchor }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn elapsed(&self) -> Duration {
        self.clock.now().duration_since(self.anchor)
    }
}

/// A clock that follows the tokio timer.
///
/// Under `tokio::time::pause()` this clock freezes and auto-advances together with
/// `tokio::time::sleep`, which makes waits through [`QuotaGate::acquire`](crate::QuotaGate::acquire)
/// fully deterministic.
#[derive(Debug, Clone)]
pub struct TokioClock {
    anchor: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            anchor: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    #[inline]
    fn elapsed(&self) -> Duration {
        self.anchor.elapsed()
    }
}
