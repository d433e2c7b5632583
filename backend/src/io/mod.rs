//! # IO Layer
//!
//! Everything that crosses the process boundary: the RPC-style REST surface
//! and the HTTP client for the exchange rate provider.

pub mod exchange_rate_client;
pub mod rest;

pub use exchange_rate_client::ExchangeRateClient;
