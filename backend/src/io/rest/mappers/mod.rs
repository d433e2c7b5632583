//! Translation between the public DTOs in `shared` and domain types.

pub mod data_reset_mapper;
pub mod expense_mapper;
pub mod income_mapper;
pub mod preferences_mapper;
pub mod quick_amount_mapper;

pub use data_reset_mapper::DataResetMapper;
pub use expense_mapper::ExpenseMapper;
pub use income_mapper::IncomeMapper;
pub use preferences_mapper::PreferencesMapper;
pub use quick_amount_mapper::QuickAmountMapper;
