use chrono::NaiveDateTime;
use shared::{CurrencyCode, ExpenseCategory};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub currency_code: CurrencyCode,
    pub created_at: NaiveDateTime,
}

impl Expense {
    pub fn generate_id() -> String {
        format!("expense::{}", Uuid::new_v4())
    }
}
