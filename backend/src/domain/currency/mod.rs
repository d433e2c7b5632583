//! Currency rates and conversion.
//!
//! Amounts are converted through the base currency (PHP). Rate lookups never
//! fail: an unreachable provider degrades to static fallback rates and a
//! missing rate leaves the amount unconverted.

pub mod converter;
pub mod rates;

pub use converter::{convert_with_rates, format_amount, round_currency, CurrencyConverter};
pub use rates::{
    fallback_rates, InMemoryRateCache, RateCache, RateFetcher, RateSource, RateTable,
    RATE_CACHE_TTL_MINUTES,
};
