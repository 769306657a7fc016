//! In-memory caching of successful fetches.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::fetcher::{FetchFuture, FetchedSeries, MarketDataFetcher};
use crate::{FetchError, Period, Symbol};

/// Five minutes; daily bars do not move faster than that.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

type CacheKey = (Symbol, Period);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: FetchedSeries,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<CacheKey, CacheEntry>,
}

impl CacheInner {
    fn get(&self, key: &CacheKey) -> Option<FetchedSeries> {
        self.map
            .get(key)
            .filter(|entry| Instant::now() <= entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    /// Inserts `value` and evicts every entry that has already expired.
    fn put(&mut self, key: CacheKey, value: FetchedSeries, ttl: Duration) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.expires_at > now);
        self.map.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    fn clear_expired(&mut self) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.expires_at > now);
    }
}

/// Serves repeated `(symbol, period)` requests from memory for `ttl`.
///
/// Failures are never cached. A zero TTL disables caching entirely.
#[derive(Clone)]
pub struct CachingFetcher {
    inner: Arc<dyn MarketDataFetcher>,
    store: Arc<RwLock<CacheInner>>,
    ttl: Duration,
}

impl CachingFetcher {
    pub fn new(inner: Arc<dyn MarketDataFetcher>, ttl: Duration) -> Self {
        Self {
            inner,
            store: Arc::new(RwLock::new(CacheInner::default())),
            ttl,
        }
    }

    pub fn with_default_ttl(inner: Arc<dyn MarketDataFetcher>) -> Self {
        Self::new(inner, DEFAULT_TTL)
    }

    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero()
    }

    /// Entries currently held, including expired ones not yet evicted.
    ///
    /// Expired entries are evicted on the next insert or by [`Self::clear_expired`].
    pub async fn len(&self) -> usize {
        self.store.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear_expired(&self) {
        self.store.write().await.clear_expired();
    }

    pub async fn clear(&self) {
        self.store.write().await.map.clear();
    }

    async fn fetch_cached(&self, symbol: &Symbol, period: Period) -> Result<FetchedSeries, FetchError> {
        if self.is_disabled() {
            return self.inner.fetch(symbol, period).await;
        }

        let key = (symbol.clone(), period);
        if let Some(hit) = self.store.read().await.get(&key) {
            debug!(%symbol, %period, "cache hit");
            return Ok(hit);
        }

        let fetched = self.inner.fetch(symbol, period).await?;
        self.store.write().await.put(key, fetched.clone(), self.ttl);
        Ok(fetched)
    }
}

impl MarketDataFetcher for CachingFetcher {
    fn fetch<'a>(&'a self, symbol: &'a Symbol, period: Period) -> FetchFuture<'a> {
        Box::pin(self.fetch_cached(symbol, period))
    }
}
