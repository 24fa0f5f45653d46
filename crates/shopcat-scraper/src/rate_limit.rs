//! Minimum-interval throttling between storefront requests.

use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum delay between consecutive calls to [`RateLimiter::wait`].
///
/// The first call never blocks. Each later call suspends until at least
/// `delay` has passed since the previous call returned. A zero delay turns
/// the limiter into a no-op.
///
/// `wait` takes `&mut self`, so one limiter serves one fetch loop at a time.
/// Concurrent runs each build their own.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter from a delay in (possibly fractional) seconds.
    ///
    /// Negative, NaN and infinite delays are treated as zero.
    #[must_use]
    pub fn new(delay_secs: f64) -> Self {
        let delay = if delay_secs.is_finite() && delay_secs > 0.0 {
            Duration::try_from_secs_f64(delay_secs).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };
        Self { delay, last: None }
    }

    #[must_use]
    pub fn from_millis(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Suspends until the configured delay has elapsed since the last call.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let ready_at = last + self.delay;
            if Instant::now() < ready_at {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last = Some(Instant::now());
    }
}
