//! Deadline decorator for a [`MarketDataFetcher`].

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::fetcher::{FetchFuture, MarketDataFetcher};
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::{FetchError, Period, Symbol};

/// Fails a fetch with [`FetchError::Transport`] if it does not finish in time.
///
/// The inner future is dropped on expiry, which cancels any in-flight request.
#[derive(Clone)]
pub struct TimeoutFetcher {
    inner: Arc<dyn MarketDataFetcher>,
    timeout: Duration,
}

impl TimeoutFetcher {
    pub fn new(inner: Arc<dyn MarketDataFetcher>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn with_default_timeout(inner: Arc<dyn MarketDataFetcher>) -> Self {
        Self::new(inner, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl MarketDataFetcher for TimeoutFetcher {
    fn fetch<'a>(&'a self, symbol: &'a Symbol, period: Period) -> FetchFuture<'a> {
        Box::pin(async move {
            match tokio::time::timeout(self.timeout, self.inner.fetch(symbol, period)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let timeout_ms = self.timeout.as_millis() as u64;
                    warn!(%symbol, %period, timeout_ms, "fetch timed out");
                    Err(FetchError::transport(format!(
                        "request timed out after {timeout_ms} ms"
                    )))
                }
            }
        })
    }
}
