use shared::{CurrencyCode, ExpenseCategory};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct QuickAmountPreset {
    pub id: String,
    pub user_id: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub currency_code: CurrencyCode,
    pub description: Option<String>,
}

impl QuickAmountPreset {
    pub fn generate_id() -> String {
        format!("preset::{}", Uuid::new_v4())
    }
}
