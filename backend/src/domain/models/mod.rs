//! Domain entities as stored, including the owning `user_id` that the
//! public DTOs leave out.

pub mod expense;
pub mod income;
pub mod preferences;
pub mod quick_amount;
pub mod session;

pub use expense::Expense;
pub use income::Income;
pub use preferences::Preferences;
pub use quick_amount::QuickAmountPreset;
pub use session::Session;

use chrono::NaiveDateTime;

use crate::domain::error::DomainError;
use crate::domain::time_window::parse_flexible_datetime;

pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Amount must be a positive number")]
    NonPositiveAmount,
    #[error("Amount is too large")]
    AmountTooLarge,
    #[error("Monthly salary cannot be negative")]
    NegativeSalary,
    #[error("Description is too long (max {} characters)", MAX_DESCRIPTION_LENGTH)]
    DescriptionTooLong,
    #[error("Recurring income requires a recurring frequency")]
    MissingFrequency,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::Validation(err.to_string())
    }
}

pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }
    Ok(())
}

/// Trims the description; blank becomes `None`
pub fn normalize_description(description: Option<String>) -> Result<Option<String>, ValidationError> {
    let trimmed = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if let Some(d) = &trimmed {
        if d.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooLong);
        }
    }
    Ok(trimmed)
}

/// Resolves the optional date a caller sent, defaulting to `now`
pub fn parse_entry_date(raw: Option<&str>, now: NaiveDateTime) -> Result<NaiveDateTime, ValidationError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(now),
        Some(raw) => parse_flexible_datetime(raw).ok_or_else(|| ValidationError::InvalidDate(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.01).is_ok());
        assert_eq!(validate_amount(0.0), Err(ValidationError::NonPositiveAmount));
        assert_eq!(validate_amount(-5.0), Err(ValidationError::NonPositiveAmount));
        assert_eq!(validate_amount(f64::NAN), Err(ValidationError::NonPositiveAmount));
        assert_eq!(validate_amount(MAX_AMOUNT * 2.0), Err(ValidationError::AmountTooLarge));
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(None), Ok(None));
        assert_eq!(normalize_description(Some("   ".to_string())), Ok(None));
        assert_eq!(
            normalize_description(Some("  Lunch ".to_string())),
            Ok(Some("Lunch".to_string()))
        );
        assert_eq!(
            normalize_description(Some("x".repeat(MAX_DESCRIPTION_LENGTH + 1))),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    #[test]
    fn test_parse_entry_date() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_entry_date(None, now), Ok(now));
        assert_eq!(parse_entry_date(Some("  "), now), Ok(now));
        assert_eq!(
            parse_entry_date(Some("2024-02-10"), now),
            Ok(chrono::NaiveDate::from_ymd_opt(2024, 2, 10).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_entry_date(Some("yesterday"), now),
            Err(ValidationError::InvalidDate("yesterday".to_string()))
        );
    }
}
