//! # Tickerscope Core
//!
//! Ticker validation, daily market data fetch and metric derivation.
//!
//! ## Overview
//!
//! This crate provides everything behind a single stock lookup:
//!
//! - **Symbol validation** that normalizes user input before any network call
//! - **Provider fetch contract** with a Yahoo Finance chart adapter
//! - **Fundamentals lookup** (company profile, key statistics) as a separate call
//! - **Fetch decorators** for timeout, retry and caching
//! - **Pure metric derivation** (changes, extremes, moving averages, returns)
//! - **Locale-independent formatting** for currency and percentages
//! - **Analysis pipeline** tying the above together into one result per request
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo Finance) |
//! | [`cache`] | TTL cache decorator |
//! | [`chart`] | Chart-ready series projections |
//! | [`config`] | Pipeline configuration |
//! | [`domain`] | Domain models (Symbol, Period, PricePoint, HistoricalSeries, Fundamentals) |
//! | [`error`] | Error types and user-facing error kinds |
//! | [`fetcher`] | Market data and fundamentals fetch traits |
//! | [`format`] | Currency and percent formatting |
//! | [`http_client`] | HTTP client abstraction |
//! | [`metrics`] | Derived metrics |
//! | [`pipeline`] | Request orchestration |
//! | [`retry`] | Retry decorator with backoff |
//! | [`timeout`] | Deadline decorator |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerscope_core::{AnalysisPipeline, Period, PipelineConfig, YahooFetcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = AnalysisPipeline::new(Arc::new(YahooFetcher::default()), PipelineConfig::default());
//!     let result = pipeline.run(" aapl ", Period::OneYear).await;
//!     println!("{:?}: {:?}", result.status(), result.metrics().latest_close);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ AnalysisPipeline│────▶│ Symbol::parse    │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Retry / Timeout │────▶│ YahooFetcher     │
//! │ / Cache         │     │ (HttpClient)     │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ metrics::derive │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! `AnalysisPipeline::run` always returns a result; failures surface as a
//! structured [`ErrorKind`] with a user-facing message:
//!
//! ```rust
//! use tickerscope_core::ErrorKind;
//!
//! fn describe(kind: ErrorKind, input: &str) -> String {
//!     match kind {
//!         ErrorKind::TransportError => format!("{} (retryable)", kind.user_message(input)),
//!         _ => kind.user_message(input),
//!     }
//! }
//! # assert!(describe(ErrorKind::EmptySymbol, "").contains("symbol"));
//! ```

pub mod adapters;
pub mod cache;
pub mod chart;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod http_client;
pub mod metrics;
pub mod pipeline;
pub mod retry;
pub mod timeout;

// Adapter implementations
pub use adapters::YahooFetcher;

// Fetch decorators
pub use cache::CachingFetcher;
pub use retry::{Backoff, RetryPolicy, RetryingFetcher};
pub use timeout::TimeoutFetcher;

// Chart projections
pub use chart::{ChartData, ChartSeries};

pub use config::PipelineConfig;

// Domain models
pub use domain::{
    validate, validate_currency_code, CompanyProfile, Fundamentals, HistoricalSeries,
    InstrumentMeta, KeyStatistics, Period, PricePoint, Symbol,
};

// Error types
pub use error::{ErrorKind, FetchError, FormatError, ValidationError};

// Fetch contract
pub use fetcher::{
    FetchFuture, FetchedSeries, FundamentalsFetcher, FundamentalsFuture, MarketDataFetcher,
};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Metrics
pub use metrics::{derive, DatedValue, DerivedMetrics, MovingAverage};

// Pipeline
pub use pipeline::{AnalysisPipeline, AnalysisResult, AnalysisStatus, PipelineStage};
