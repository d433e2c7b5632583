// Repository modules
pub mod data_reset_repository;
pub mod expense_repository;
pub mod income_repository;
pub mod preferences_repository;
pub mod quick_amount_repository;
pub mod session_repository;

pub use data_reset_repository::{DataResetRepository, ResetCounts};
pub use expense_repository::ExpenseRepository;
pub use income_repository::IncomeRepository;
pub use preferences_repository::PreferencesRepository;
pub use quick_amount_repository::QuickAmountRepository;
pub use session_repository::SessionRepository;

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

/// Reads a TEXT column and parses it into one of the shared wire enums
pub(crate) fn enum_column<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    Ok(raw.parse::<T>()?)
}
