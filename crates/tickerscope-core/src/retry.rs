//! Retry decorator with exponential backoff and jitter.
//!
//! Only [`FetchError::Transport`] failures are retried; an unknown symbol
//! will not become known by asking again.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::fetcher::{FetchFuture, FetchedSeries, MarketDataFetcher};
use crate::{FetchError, Period, Symbol};

/// Upper bound on total attempts regardless of configuration.
pub const MAX_ATTEMPTS_CAP: u32 = 5;

/// Backoff strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed {
        delay: Duration,
    },
    /// `base * factor^retry`, capped at `max`, optionally with +/- 50% jitter.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(200),
            factor: 2.0,
            max: Duration::from_secs(3),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `retry` (0-based).
    pub fn delay(self, retry: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(retry.min(i32::MAX as u32) as i32);
                let seconds = (base.as_secs_f64() * scale).min(max.as_secs_f64());
                let delay = Duration::try_from_secs_f64(seconds.max(0.0))
                    .unwrap_or(max)
                    .min(max);

                if !jitter {
                    return delay;
                }

                let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                let spread = delay_ms / 2;
                let offset = fastrand::u64(0..=spread.saturating_mul(2));
                Duration::from_millis(delay_ms.saturating_add(offset).saturating_sub(spread))
            }
        }
    }
}

/// How many times to call the provider and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    /// A single attempt.
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryPolicy {
    /// Total attempts, clamped to `1..=MAX_ATTEMPTS_CAP`.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS_CAP),
            backoff: Backoff::default(),
        }
    }

    pub fn no_retry() -> Self {
        Self::new(1)
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Whether `error` after attempt number `attempt` (1-based) warrants another try.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        error.is_transient() && attempt < self.max_attempts
    }
}

/// Wraps a fetcher and retries transient failures according to a [`RetryPolicy`].
#[derive(Clone)]
pub struct RetryingFetcher {
    inner: Arc<dyn MarketDataFetcher>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new(inner: Arc<dyn MarketDataFetcher>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn fetch_with_retry(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<FetchedSeries, FetchError> {
        let mut attempt = 1;
        loop {
            match self.inner.fetch(symbol, period).await {
                Err(error) if self.policy.should_retry(&error, attempt) => {
                    let delay = self.policy.backoff.delay(attempt - 1);
                    warn!(
                        %symbol,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "retrying fetch"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

impl MarketDataFetcher for RetryingFetcher {
    fn fetch<'a>(&'a self, symbol: &'a Symbol, period: Period) -> FetchFuture<'a> {
        Box::pin(self.fetch_with_retry(symbol, period))
    }
}
