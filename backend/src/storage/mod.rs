//! # Storage Module
//!
//! SQLite persistence through SQLx. `DbConnection` owns the pool and the
//! schema; one repository per table maps rows to domain models. Every
//! statement touching user data filters on `user_id`.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    DataResetRepository, ExpenseRepository, IncomeRepository, PreferencesRepository,
    QuickAmountRepository, ResetCounts, SessionRepository,
};
