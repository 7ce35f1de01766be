//! Sliding-window rate limiter for external pricing calls.
//!
//! Bounds the number of calls issued within any trailing window of fixed
//! length (true sliding, not fixed-bucket). The limiter records the
//! timestamps of the most recent admitted calls; admission succeeds
//! immediately while fewer than `max_calls` of them fall inside the trailing
//! window, and otherwise suspends the caller until the oldest in-window
//! timestamp ages out.
//!
//! Only calls that actually reach the external service are admitted through
//! here; cache hits never consume quota.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::errors::PricingError;

/// Default call quota per window (the public CoinGecko allowance).
const DEFAULT_MAX_CALLS: usize = 30;

/// Default window length.
const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default admission deadline.
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(180);

/// Rate limiter configuration.
///
/// The quota (`max_calls` per `window`) is deployment-specific, not part of
/// the algorithm's contract; `max_wait` bounds how long a single admission
/// may suspend before surfacing as an error.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum calls admitted within any trailing window.
    pub max_calls: usize,
    /// Window length.
    pub window: Duration,
    /// Deadline for one admission; exceeding it is an operational failure.
    pub max_wait: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: DEFAULT_MAX_CALLS,
            window: DEFAULT_WINDOW,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

/// Sliding-window admission gate.
///
/// State is owned by the instance; independent instances can run with
/// independent quotas, and tests can construct one with a deterministic
/// window. Thread-safe: a suspended `admit` blocks only its caller.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    /// Timestamps of the most recent admitted calls, oldest first.
    admitted: Mutex<VecDeque<Instant>>,
    config: RateLimitConfig,
}

impl SlidingWindowLimiter {
    /// Create a limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            admitted: Mutex::new(VecDeque::with_capacity(config.max_calls)),
            config,
        }
    }

    /// Lock the admitted-timestamps mutex, recovering from poison if
    /// necessary.
    ///
    /// For rate limiting it is safe to recover from a poisoned mutex since
    /// the worst case is slightly incorrect rate limiting, which is better
    /// than panicking.
    fn lock_admitted(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        self.admitted.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Drop timestamps that have aged out of the trailing window.
    fn prune(admitted: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while admitted
            .front()
            .is_some_and(|t| now.duration_since(*t) >= window)
        {
            admitted.pop_front();
        }
    }

    /// Wait until a call is permitted, then record it and return.
    ///
    /// Suspends the calling task (and only it) while the quota is
    /// exhausted. Returns `PricingError::AdmitDeadline` once the cumulative
    /// suspension would exceed the configured `max_wait`.
    pub async fn admit(&self) -> Result<(), PricingError> {
        let start = Instant::now();

        loop {
            let wait = {
                let mut admitted = self.lock_admitted();
                let now = Instant::now();
                Self::prune(&mut admitted, now, self.config.window);

                if admitted.len() < self.config.max_calls {
                    admitted.push_back(now);
                    return Ok(());
                }

                // Quota exhausted: wait for the oldest in-window call to
                // age out. With a zero quota there is nothing to wait for.
                match admitted.front() {
                    Some(oldest) => self.config.window - now.duration_since(*oldest),
                    None => {
                        return Err(PricingError::AdmitDeadline {
                            waited: start.elapsed(),
                        })
                    }
                }
            };

            if start.elapsed() + wait > self.config.max_wait {
                return Err(PricingError::AdmitDeadline {
                    waited: start.elapsed(),
                });
            }

            debug!("Rate limiter: waiting {:?} for quota", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Try to admit a call without waiting.
    ///
    /// Returns true if the call was admitted, false if rate limited.
    pub fn try_admit(&self) -> bool {
        let mut admitted = self.lock_admitted();
        let now = Instant::now();
        Self::prune(&mut admitted, now, self.config.window);

        if admitted.len() < self.config.max_calls {
            admitted.push_back(now);
            true
        } else {
            false
        }
    }

    /// Number of calls that could be admitted right now without waiting.
    pub fn available(&self) -> usize {
        let mut admitted = self.lock_admitted();
        Self::prune(&mut admitted, Instant::now(), self.config.window);
        self.config.max_calls.saturating_sub(admitted.len())
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
