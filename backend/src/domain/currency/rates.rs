//! Exchange rate lookup with a time-boxed cache and static fallback rates.

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::domain::clock::Clock;
use shared::CurrencyCode;

/// Rates relative to a base currency, keyed by currency code
pub type RateTable = HashMap<String, f64>;

/// How long fetched rates stay fresh
pub const RATE_CACHE_TTL_MINUTES: i64 = 60;

/// Fetches live rates from an external provider
#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> anyhow::Result<RateTable>;
}

/// Cache of rate tables keyed by base currency code
pub trait RateCache: Send + Sync {
    /// Returns the cached table for `base` if it is still fresh at `now`
    fn get(&self, base: &str, now: NaiveDateTime) -> Option<RateTable>;

    fn set(&self, base: &str, rates: RateTable, fetched_at: NaiveDateTime);
}

#[derive(Debug, Clone)]
struct CachedRates {
    rates: RateTable,
    fetched_at: NaiveDateTime,
}

/// Process-wide in-memory cache guarded by a read/write lock
pub struct InMemoryRateCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedRates>>,
}

impl InMemoryRateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRateCache {
    fn default() -> Self {
        Self::new(Duration::minutes(RATE_CACHE_TTL_MINUTES))
    }
}

impl RateCache for InMemoryRateCache {
    fn get(&self, base: &str, now: NaiveDateTime) -> Option<RateTable> {
        let entries = self.entries.read().ok()?;
        let cached = entries.get(base)?;
        if now - cached.fetched_at < self.ttl {
            Some(cached.rates.clone())
        } else {
            None
        }
    }

    fn set(&self, base: &str, rates: RateTable, fetched_at: NaiveDateTime) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(base.to_string(), CachedRates { rates, fetched_at });
            }
            Err(_) => warn!("Rate cache lock poisoned; dropping fresh rates for {}", base),
        }
    }
}

/// Static rates relative to PHP, used whenever the provider is unreachable
pub fn fallback_rates() -> RateTable {
    [
        (CurrencyCode::Php, 1.0),
        (CurrencyCode::Usd, 0.018),
        (CurrencyCode::Eur, 0.016),
        (CurrencyCode::Gbp, 0.014),
        (CurrencyCode::Jpy, 2.6),
        (CurrencyCode::Aud, 0.027),
        (CurrencyCode::Cad, 0.024),
        (CurrencyCode::Sgd, 0.024),
    ]
    .into_iter()
    .map(|(code, rate)| (code.as_str().to_string(), rate))
    .collect()
}

/// Serves rate tables from the cache, falling back to the fetcher and then
/// to the static table. Never fails.
#[derive(Clone)]
pub struct RateSource {
    fetcher: Arc<dyn RateFetcher>,
    cache: Arc<dyn RateCache>,
    clock: Arc<dyn Clock>,
}

impl RateSource {
    pub fn new(
        fetcher: Arc<dyn RateFetcher>,
        cache: Arc<dyn RateCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fetcher,
            cache,
            clock,
        }
    }

    pub async fn get_rates(&self, base: &str) -> RateTable {
        let now = self.clock.now();
        if let Some(rates) = self.cache.get(base, now) {
            debug!("Using cached exchange rates for {}", base);
            return rates;
        }

        match self.fetcher.fetch_rates(base).await {
            Ok(rates) => {
                info!("Fetched {} exchange rates for base {}", rates.len(), base);
                self.cache.set(base, rates.clone(), now);
                rates
            }
            Err(e) => {
                warn!("Exchange rate fetch for {} failed, using fallback rates: {:#}", base, e);
                fallback_rates()
            }
        }
    }
}
