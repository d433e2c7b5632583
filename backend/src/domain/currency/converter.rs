//! Converts amounts between the base currency and display currencies.

use tracing::warn;

use super::rates::{RateSource, RateTable};
use shared::{CurrencyCode, BASE_CURRENCY};

/// Rounds to two decimal places, halves away from zero
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Renders an amount with its currency symbol, e.g. `₱1,250.50`
pub fn format_amount(amount: f64, currency: CurrencyCode) -> String {
    let decimals = currency.decimals();
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (formatted, None),
    };

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    match fraction {
        Some(f) => format!("{}{}{}.{}", sign, currency.symbol(), grouped, f),
        None => format!("{}{}{}", sign, currency.symbol(), grouped),
    }
}

/// Converts `amount` using a rate table relative to the base currency.
/// A missing rate leaves the amount unconverted.
pub fn convert_with_rates(
    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
    rates: &RateTable,
) -> f64 {
    if from == to {
        return amount;
    }

    let mut value = amount;
    if from != BASE_CURRENCY {
        match rates.get(from.as_str()) {
            Some(rate) if *rate > 0.0 => value /= rate,
            _ => {
                warn!("No exchange rate for {}; leaving amount unconverted", from);
                return amount;
            }
        }
    }
    if to != BASE_CURRENCY {
        match rates.get(to.as_str()) {
            Some(rate) => value *= rate,
            None => {
                warn!("No exchange rate for {}; leaving amount unconverted", to);
                return amount;
            }
        }
    }

    round_currency(value)
}

#[derive(Clone)]
pub struct CurrencyConverter {
    rate_source: RateSource,
}

impl CurrencyConverter {
    pub fn new(rate_source: RateSource) -> Self {
        Self { rate_source }
    }

    pub async fn convert(&self, amount: f64, from: CurrencyCode, to: CurrencyCode) -> f64 {
        if from == to {
            return amount;
        }
        let rates = self.rate_source.get_rates(BASE_CURRENCY.as_str()).await;
        convert_with_rates(amount, from, to, &rates)
    }

    /// Converts every amount with a single rate lookup
    pub async fn convert_batch(
        &self,
        amounts: &[f64],
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Vec<f64> {
        if from == to {
            return amounts.to_vec();
        }
        let rates = self.rate_source.get_rates(BASE_CURRENCY.as_str()).await;
        amounts
            .iter()
            .map(|amount| convert_with_rates(*amount, from, to, &rates))
            .collect()
    }

    /// Converts `(amount, currency)` pairs of mixed source currencies into `to`
    pub async fn convert_mixed(&self, items: &[(f64, CurrencyCode)], to: CurrencyCode) -> Vec<f64> {
        if items.iter().all(|(_, from)| *from == to) {
            return items.iter().map(|(amount, _)| *amount).collect();
        }
        let rates = self.rate_source.get_rates(BASE_CURRENCY.as_str()).await;
        items
            .iter()
            .map(|(amount, from)| convert_with_rates(*amount, *from, to, &rates))
            .collect()
    }
}
