//! Provider adapters implementing [`MarketDataFetcher`](crate::MarketDataFetcher).

pub mod yahoo;

pub use yahoo::YahooFetcher;
