//! # Domain Module
//!
//! Business rules for the expense tracker. Services validate input, apply the
//! rules and talk to the storage repositories; they never see HTTP types.
//!
//! Date-sensitive logic takes "today" from an injected [`clock::Clock`] and
//! routes all calendar arithmetic through [`time_window`].

pub mod clock;
pub mod commands;
pub mod currency;
pub mod data_reset_service;
pub mod error;
pub mod expense_service;
pub mod income_service;
pub mod models;
pub mod preferences_service;
pub mod quick_amount_service;
pub mod recurring_income;
pub mod reports;
pub mod reset_range;
pub mod session_service;
pub mod time_window;

pub use data_reset_service::DataResetService;
pub use error::{DomainError, DomainResult};
pub use expense_service::ExpenseService;
pub use income_service::IncomeService;
pub use preferences_service::PreferencesService;
pub use quick_amount_service::QuickAmountService;
pub use session_service::SessionService;
