//! # Domain Models
//!
//! Canonical domain types for tickerscope.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, upper-cased ticker |
//! | [`Period`] | Lookback window (1mo .. 5y) |
//! | [`PricePoint`] | One daily OHLCV observation |
//! | [`HistoricalSeries`] | Strictly date-ordered price points |
//! | [`InstrumentMeta`] | Currency, exchange, name and quote ranges reported with the chart |
//! | [`Fundamentals`] | Company profile and key statistics |
//!
//! ## Validation
//!
//! Invariants are enforced at construction time:
//!
//! ```rust
//! use tickerscope_core::{PricePoint, Symbol, ValidationError};
//! use time::macros::date;
//!
//! let symbol = Symbol::parse(" brk.b ").unwrap();
//! assert_eq!(symbol.as_str(), "BRK.B");
//!
//! // high below close is rejected
//! let invalid = PricePoint::new(date!(2024 - 01 - 02), 10.0, 11.0, 9.0, 12.0, 100);
//! assert!(matches!(invalid, Err(ValidationError::InvalidPricePoint { .. })));
//! ```

mod models;
mod period;
mod symbol;

pub(crate) use models::iso_date;
pub use models::{
    validate_currency_code, CompanyProfile, Fundamentals, HistoricalSeries, InstrumentMeta,
    KeyStatistics, PricePoint,
};
pub use period::Period;
pub use symbol::{validate, Symbol};
