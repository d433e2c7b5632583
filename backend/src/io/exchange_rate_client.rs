//! HTTP client for the exchange rate provider.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::currency::{RateFetcher, RateTable};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of `GET {base_url}/{base}`
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: String,
    #[serde(default)]
    date: Option<String>,
    rates: HashMap<String, f64>,
}

pub struct ExchangeRateClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ExchangeRateClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build exchange rate HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            http_client,
        })
    }

    fn latest_url(&self, base: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), base)
    }
}

/// Keeps only finite, positive rates
fn into_rate_table(response: LatestRatesResponse) -> RateTable {
    response
        .rates
        .into_iter()
        .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
        .collect()
}

#[async_trait]
impl RateFetcher for ExchangeRateClient {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
        let url = self.latest_url(base);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()?;

        let body: LatestRatesResponse = response
            .json()
            .await
            .context("Exchange rate response was not valid JSON")?;
        debug!(
            "Rate provider returned {} rates for {} dated {}",
            body.rates.len(),
            body.base,
            body.date.as_deref().unwrap_or("unknown")
        );

        let rates = into_rate_table(body);
        if rates.is_empty() {
            anyhow::bail!("Exchange rate response for {} contained no rates", base);
        }
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_url_joins_base() {
        let client = ExchangeRateClient::new("https://rates.example.com/v4/latest/").unwrap();
        assert_eq!(client.latest_url("PHP"), "https://rates.example.com/v4/latest/PHP");
    }

    #[test]
    fn test_response_decoding_drops_unusable_rates() {
        let body: LatestRatesResponse = serde_json::from_str(
            r#"{"base": "PHP", "date": "2024-02-16", "rates": {"PHP": 1, "USD": 0.0178, "XXX": 0}}"#,
        )
        .unwrap();
        let rates = into_rate_table(body);

        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get("USD"), Some(&0.0178));
        assert!(!rates.contains_key("XXX"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        // Port 9 (discard) on loopback refuses connections
        let client = ExchangeRateClient::new("http://127.0.0.1:9").unwrap();
        assert!(client.fetch_rates("PHP").await.is_err());
    }
}
