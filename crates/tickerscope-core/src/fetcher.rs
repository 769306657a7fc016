//! Market data fetch contract.
//!
//! [`MarketDataFetcher`] is the single seam between the pipeline and an
//! external provider. Implementations perform exactly one provider
//! round-trip per call and keep no state between calls. Retry, timeout
//! and caching are layered on as wrappers (see [`crate::retry`],
//! [`crate::timeout`] and [`crate::cache`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerscope_core::{MarketDataFetcher, Period, ReqwestHttpClient, Symbol, YahooFetcher};
//!
//! let fetcher = YahooFetcher::new(Arc::new(ReqwestHttpClient::new()));
//! let symbol = Symbol::parse("AAPL")?;
//! let fetched = fetcher.fetch(&symbol, Period::OneYear).await?;
//! println!("{} points", fetched.series.len());
//! ```

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{FetchError, Fundamentals, HistoricalSeries, InstrumentMeta, Period, Symbol};

/// Boxed future returned by [`MarketDataFetcher::fetch`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FetchedSeries, FetchError>> + Send + 'a>>;

/// Boxed future returned by [`FundamentalsFetcher::fundamentals`].
pub type FundamentalsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Fundamentals, FetchError>> + Send + 'a>>;

/// Typed result of one provider call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchedSeries {
    pub series: HistoricalSeries,
    pub instrument: InstrumentMeta,
    /// Provider rows discarded as malformed.
    pub dropped_rows: usize,
}

impl FetchedSeries {
    pub fn new(series: HistoricalSeries, instrument: InstrumentMeta) -> Self {
        Self {
            series,
            instrument,
            dropped_rows: 0,
        }
    }
}

/// Provider fetch contract.
///
/// # Errors
///
/// - [`FetchError::UnknownSymbol`] when the provider explicitly reports the symbol as unknown
/// - [`FetchError::Transport`] for timeouts, connection failures, non-2xx statuses and
///   unusable payloads
///
/// An empty history is a success, not an error.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one instance is shared by all
/// concurrent pipeline runs.
pub trait MarketDataFetcher: Send + Sync {
    fn fetch<'a>(&'a self, symbol: &'a Symbol, period: Period) -> FetchFuture<'a>;
}

/// Company profile and key statistics lookup.
///
/// Separate from [`MarketDataFetcher`]: an analysis never waits on it, and
/// it is one extra provider round-trip when a caller asks for it. Errors
/// are classified the same way as for [`MarketDataFetcher::fetch`].
pub trait FundamentalsFetcher: Send + Sync {
    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> FundamentalsFuture<'a>;
}
