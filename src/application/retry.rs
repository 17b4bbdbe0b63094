//! Caller-side retry with exponential backoff.
//!
//! [`TradeNetworkSolver`](super::TradeNetworkSolver) never retries on its
//! own. Callers that want resilience against transient optimizer failures
//! wrap `solve()` with [`RetryPolicy::run`], which only retries errors for
//! which [`Error::is_retryable`] holds.

use std::time::Duration;

use futures_util::future::BoxFuture;
use rand::Rng;
use tracing::warn;

use crate::error::{Error, Result};

/// Backoff parameters for retrying a fallible operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay,
            backoff_multiplier: backoff_multiplier.max(1.0),
        }
    }

    /// Single attempt, no retries.
    #[must_use]
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO, 1.0)
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Base delay before retry number `retry` (1-based), without jitter.
    #[must_use]
    pub fn base_delay(&self, retry: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .powi(i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX));
        let millis = (self.initial_delay.as_millis() as f64 * factor)
            .min(self.max_delay.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }

    /// Delay before retry number `retry`, with up to 20% random jitter.
    fn delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        let jitter_range_ms = (base.as_millis() as u64) / 5;
        if jitter_range_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_range_ms))
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `operation` receives `state` mutably on every attempt so it can borrow
    /// a solver across retries.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once
    /// `max_attempts` is reached.
    pub async fn run<S, T, F>(&self, state: &mut S, mut operation: F) -> Result<T>
    where
        F: for<'a> FnMut(&'a mut S) -> BoxFuture<'a, Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation(state).await {
                Err(err) if self.should_retry(&err, attempt) => {
                    let delay = self.delay(attempt);
                    warn!(
                        error = %err,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    fn should_retry(&self, err: &Error, attempt: u32) -> bool {
        err.is_retryable() && attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000), Duration::from_millis(30_000), 2.0)
    }
}
