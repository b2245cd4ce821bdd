use std::ops::ControlFlow;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use opentelemetry::global;
use opentelemetry::metrics::Counter;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::Clock;
use crate::ConfigurationError;
use crate::MonotonicClock;
use crate::RateLimit;
use crate::Reason;
use crate::TimeUnit;

/// Tokens the bucket can bank while idle.
const BURST: u64 = 1;

#[derive(Clone, Debug)]
struct GateMetrics {
    admitted: Counter<u64>,
    early_wake: Counter<u64>,
}

/// A continuous (greedy) token bucket shared by every caller that must respect one quota.
///
/// Instead of storing a token count next to a refill timestamp, the bucket keeps a single
/// value: the instant (in nanoseconds on its clock) at which it would hold zero tokens. The
/// tokens available at `now` are `min(capacity, (now - empty_at) / refill_interval)`. Taking a
/// token moves `empty_at` forward by one refill interval, so credit and debit are one CAS.
///
/// The bucket holds at most one token. A burst of `b` tokens followed by steady refill lets a
/// trailing window see `b + limit - 1` admissions, so only `b = 1` keeps every window of the
/// configured length at or below the limit, however long the gate sat idle.
#[derive(Debug)]
pub struct QuotaGate {
    rate: RateLimit,
    refill_ns: u64,
    /// `BURST * refill_ns`: how far `empty_at` may trail `now`.
    burst_ns: u64,
    empty_at: AtomicU64,
    clock: Box<dyn Clock>,
    /// Held by the one waiter currently sleeping for the next token. Tokio's mutex is fair,
    /// so queued waiters are admitted in arrival order.
    waiters: Mutex<()>,
    instruments: GateMetrics,
}

impl QuotaGate {
    /// A gate admitting `request_limit` callers per `time_unit`.
    pub fn new(time_unit: TimeUnit, request_limit: usize) -> Result<Self, ConfigurationError> {
        RateLimit::new(time_unit, request_limit).map(Self::from_rate)
    }

    pub fn from_rate(rate: RateLimit) -> Self {
        Self::with_clock(rate, MonotonicClock::new())
    }

    pub fn with_clock(rate: RateLimit, clock: impl Clock) -> Self {
        let meter = global::meter("quota_gate");
        let instruments = GateMetrics {
            admitted: meter.u64_counter("admitted").build(),
            early_wake: meter.u64_counter("early_wake").build(),
        };

        let refill_ns = rate.refill_interval().as_nanos() as u64;
        // The bucket starts empty: no burst credit until tokens accrue.
        let now = clock.elapsed().as_nanos() as u64;

        Self {
            rate,
            refill_ns,
            burst_ns: BURST.saturating_mul(refill_ns),
            empty_at: AtomicU64::new(now),
            clock: Box::new(clock),
            waiters: Mutex::new(()),
            instruments,
        }
    }

    pub fn rate(&self) -> &RateLimit {
        &self.rate
    }

    /// Maximum number of tokens the bucket can hold.
    pub fn capacity(&self) -> usize {
        BURST as usize
    }

    /// Whole tokens available right now.
    pub fn available(&self) -> usize {
        let now = self.now_ns();
        let empty_at = self.empty_at.load(Ordering::Acquire);
        let accrued = now.saturating_sub(empty_at) / self.refill_ns;
        accrued.min(BURST) as usize
    }

    /// Attempts to take a single token without waiting.
    ///
    /// # Errors
    ///
    /// Returns `Reason::Exhausted` with the time until the next token accrues if the bucket
    /// is empty.
    #[inline]
    pub fn try_acquire(&self) -> ControlFlow<Reason> {
        let now = self.now_ns();

        loop {
            let empty_at = self.empty_at.load(Ordering::Acquire);

            // Credit accrued since the bucket was last empty, capped at capacity.
            let base = empty_at.max(now.saturating_sub(self.burst_ns));
            let next = base.saturating_add(self.refill_ns);

            if next > now {
                return ControlFlow::Break(Reason::Exhausted {
                    retry_after: Duration::from_nanos(next - now),
                });
            }

            if self
                .empty_at
                .compare_exchange_weak(empty_at, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                self.instruments.admitted.add(1, &[]);
                return ControlFlow::Continue(());
            }
        }
    }

    /// Suspends until a token is available, then consumes it.
    ///
    /// Dropping the returned future before it completes leaves the bucket untouched and
    /// releases this caller's place in the waiter queue.
    pub async fn acquire(&self) {
        let _turn = self.waiters.lock().await;
        let mut woken = false;

        loop {
            let ControlFlow::Break(Reason::Exhausted { retry_after }) = self.try_acquire() else {
                return;
            };

            if woken {
                // The timer fired but the token is not there yet. Wait again.
                self.instruments.early_wake.add(1, &[]);
                tracing::debug!(?retry_after, "admission wait interrupted before token accrued");
            } else {
                tracing::trace!(?retry_after, "waiting for admission");
            }

            sleep(retry_after).await;
            woken = true;
        }
    }

    #[inline]
    fn now_ns(&self) -> u64 {
        self.clock.elapsed().as_nanos() as u64
    }
}
