use chrono::NaiveDateTime;
use shared::{CurrencyCode, IncomeType, RecurringFrequency};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub income_type: IncomeType,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub currency_code: CurrencyCode,
    pub created_at: NaiveDateTime,
}

impl Income {
    pub fn generate_id() -> String {
        format!("income::{}", Uuid::new_v4())
    }

    /// Description used for generated entries when the template has none
    pub fn default_recurring_description(income_type: IncomeType) -> String {
        format!("Recurring {}", income_type)
    }
}
