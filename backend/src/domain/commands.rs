//! Domain-level command types.
//!
//! Services take these instead of the public DTOs from `shared`; the REST
//! mappers translate between the two. Dates stay as the raw strings the
//! caller sent and are parsed by the service that owns the rule.

pub mod expenses {
    use shared::{CurrencyCode, ExpenseCategory};

    #[derive(Debug, Clone)]
    pub struct CreateExpenseCommand {
        pub amount: f64,
        pub category: ExpenseCategory,
        pub description: Option<String>,
        pub date: Option<String>,
        /// Falls back to the user's preferred currency
        pub currency_code: Option<CurrencyCode>,
    }

    /// Fields left `None` keep their stored value
    #[derive(Debug, Clone)]
    pub struct UpdateExpenseCommand {
        pub id: String,
        pub amount: Option<f64>,
        pub category: Option<ExpenseCategory>,
        pub description: Option<String>,
        pub date: Option<String>,
        pub currency_code: Option<CurrencyCode>,
    }
}

pub mod income {
    use crate::domain::models::Income;
    use chrono::NaiveDate;
    use shared::{CurrencyCode, IncomeType, RecurringFrequency};

    #[derive(Debug, Clone)]
    pub struct CreateIncomeCommand {
        pub amount: f64,
        pub income_type: IncomeType,
        pub description: Option<String>,
        pub date: Option<String>,
        pub is_recurring: bool,
        pub recurring_frequency: Option<RecurringFrequency>,
        pub currency_code: Option<CurrencyCode>,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateIncomeCommand {
        pub id: String,
        pub amount: Option<f64>,
        pub income_type: Option<IncomeType>,
        pub description: Option<String>,
        pub date: Option<String>,
        pub is_recurring: Option<bool>,
        pub recurring_frequency: Option<RecurringFrequency>,
        pub currency_code: Option<CurrencyCode>,
    }

    /// Month selector for the monthly summary; `None` means the current month
    #[derive(Debug, Clone, Default)]
    pub struct MonthlyIncomeQuery {
        pub year: Option<i32>,
        pub month: Option<u32>,
    }

    #[derive(Debug, Clone)]
    pub struct MonthlyIncomeResult {
        pub year: i32,
        pub month: u32,
        pub total: f64,
        pub currency_code: CurrencyCode,
        pub monthly_salary: f64,
        pub entries: Vec<Income>,
    }

    /// Outcome of an explicit generation request
    #[derive(Debug, Clone)]
    pub struct GenerateRecurringResult {
        pub income: Option<Income>,
        pub next_date: NaiveDate,
        pub message: String,
    }
}

pub mod preferences {
    use shared::{ColorScheme, CurrencyCode};

    #[derive(Debug, Clone, Default)]
    pub struct UpdatePreferencesCommand {
        pub monthly_salary: Option<f64>,
        pub currency_code: Option<CurrencyCode>,
        pub color_scheme: Option<ColorScheme>,
    }
}

pub mod quick_amounts {
    use shared::{CurrencyCode, ExpenseCategory};

    #[derive(Debug, Clone)]
    pub struct CreatePresetCommand {
        pub category: ExpenseCategory,
        pub amount: f64,
        pub currency_code: Option<CurrencyCode>,
        pub description: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct UpdatePresetCommand {
        pub id: String,
        pub category: Option<ExpenseCategory>,
        pub amount: Option<f64>,
        pub currency_code: Option<CurrencyCode>,
        pub description: Option<String>,
    }
}

pub mod data_reset {
    use crate::domain::time_window::DateRange;

    #[derive(Debug, Clone)]
    pub struct ResetResult {
        pub expenses_deleted: u64,
        pub income_deleted: u64,
        /// `None` for a full reset
        pub range: Option<DateRange>,
        pub success_message: String,
    }
}
