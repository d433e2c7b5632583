use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::enum_column;
use crate::domain::models::Expense;
use crate::domain::time_window::DateRange;
use crate::storage::connection::DbConnection;

const EXPENSE_COLUMNS: &str =
    "id, user_id, amount, category, description, date, currency_code, created_at";

/// Repository for expense rows
#[derive(Clone)]
pub struct ExpenseRepository {
    db: DbConnection,
}

impl ExpenseRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Expense> {
        Ok(Expense {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            amount: row.try_get("amount")?,
            category: enum_column(row, "category")?,
            description: row.try_get("description")?,
            date: row.try_get("date")?,
            currency_code: enum_column(row, "currency_code")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn map_rows(rows: Vec<SqliteRow>) -> Result<Vec<Expense>> {
        rows.iter().map(Self::map_row).collect()
    }

    pub async fn store_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, user_id, amount, category, description, date, currency_code, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.user_id)
        .bind(expense.amount)
        .bind(expense.category.as_str())
        .bind(&expense.description)
        .bind(expense.date)
        .bind(expense.currency_code.as_str())
        .bind(expense.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
            EXPENSE_COLUMNS
        ))
        .bind(expense_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// All of a user's expenses, newest first
    pub async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? ORDER BY date DESC, created_at DESC",
            EXPENSE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Self::map_rows(rows)
    }

    /// Expenses dated inside `range`, newest first
    pub async fn list_expenses_in_range(&self, user_id: &str, range: DateRange) -> Result<Vec<Expense>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM expenses
            WHERE user_id = ? AND date >= ? AND date < ?
            ORDER BY date DESC, created_at DESC
            "#,
            EXPENSE_COLUMNS
        ))
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.db.pool())
        .await?;

        Self::map_rows(rows)
    }

    pub async fn list_recent_expenses(&self, user_id: &str, limit: u32) -> Result<Vec<Expense>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? ORDER BY date DESC, created_at DESC LIMIT ?",
            EXPENSE_COLUMNS
        ))
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        Self::map_rows(rows)
    }

    /// Returns false when no row with that id belongs to the user
    pub async fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET amount = ?, category = ?, description = ?, date = ?, currency_code = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(expense.amount)
        .bind(expense.category.as_str())
        .bind(&expense.description)
        .bind(expense.date)
        .bind(expense.currency_code.as_str())
        .bind(&expense.id)
        .bind(&expense.user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND user_id = ?")
            .bind(expense_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
