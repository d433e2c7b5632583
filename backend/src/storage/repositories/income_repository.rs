use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::enum_column;
use crate::domain::models::Income;
use crate::domain::time_window::DateRange;
use crate::storage::connection::DbConnection;
use shared::RecurringFrequency;

const INCOME_COLUMNS: &str = "id, user_id, amount, income_type, description, date, \
     is_recurring, recurring_frequency, currency_code, created_at";

/// Repository for income rows, including recurring templates
#[derive(Clone)]
pub struct IncomeRepository {
    db: DbConnection,
}

impl IncomeRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Income> {
        let frequency: Option<String> = row.try_get("recurring_frequency")?;
        let recurring_frequency = frequency
            .map(|raw| raw.parse::<RecurringFrequency>())
            .transpose()?;

        Ok(Income {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            amount: row.try_get("amount")?,
            income_type: enum_column(row, "income_type")?,
            description: row.try_get("description")?,
            date: row.try_get("date")?,
            is_recurring: row.try_get("is_recurring")?,
            recurring_frequency,
            currency_code: enum_column(row, "currency_code")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn map_rows(rows: Vec<SqliteRow>) -> Result<Vec<Income>> {
        rows.iter().map(Self::map_row).collect()
    }

    pub async fn store_income(&self, income: &Income) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO income (id, user_id, amount, income_type, description, date,
                                is_recurring, recurring_frequency, currency_code, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&income.id)
        .bind(&income.user_id)
        .bind(income.amount)
        .bind(income.income_type.as_str())
        .bind(&income.description)
        .bind(income.date)
        .bind(income.is_recurring)
        .bind(income.recurring_frequency.map(|f| f.as_str()))
        .bind(income.currency_code.as_str())
        .bind(income.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn get_income(&self, user_id: &str, income_id: &str) -> Result<Option<Income>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM income WHERE id = ? AND user_id = ?",
            INCOME_COLUMNS
        ))
        .bind(income_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// All of a user's income, newest first
    pub async fn list_income(&self, user_id: &str) -> Result<Vec<Income>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM income WHERE user_id = ? ORDER BY date DESC, created_at DESC",
            INCOME_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Self::map_rows(rows)
    }

    pub async fn list_income_in_range(&self, user_id: &str, range: DateRange) -> Result<Vec<Income>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM income
            WHERE user_id = ? AND date >= ? AND date < ?
            ORDER BY date DESC, created_at DESC
            "#,
            INCOME_COLUMNS
        ))
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.db.pool())
        .await?;

        Self::map_rows(rows)
    }

    /// Every recurring row (templates and generated entries), oldest first
    pub async fn list_recurring_income(&self, user_id: &str) -> Result<Vec<Income>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM income
            WHERE user_id = ? AND is_recurring = 1
            ORDER BY date ASC, created_at ASC
            "#,
            INCOME_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Self::map_rows(rows)
    }

    /// Inserts a generated recurring entry unless a recurring row with the
    /// same type and amount already exists inside `month`. The check and the
    /// insert share one transaction. Returns whether a row was inserted.
    pub async fn insert_generated_if_absent(&self, income: &Income, month: DateRange) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        let existing: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM income
            WHERE user_id = ? AND income_type = ? AND amount = ? AND is_recurring = 1
              AND date >= ? AND date < ?
            "#,
        )
        .bind(&income.user_id)
        .bind(income.income_type.as_str())
        .bind(income.amount)
        .bind(month.start)
        .bind(month.end)
        .fetch_one(&mut *tx)
        .await?;

        if existing > 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO income (id, user_id, amount, income_type, description, date,
                                is_recurring, recurring_frequency, currency_code, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&income.id)
        .bind(&income.user_id)
        .bind(income.amount)
        .bind(income.income_type.as_str())
        .bind(&income.description)
        .bind(income.date)
        .bind(income.is_recurring)
        .bind(income.recurring_frequency.map(|f| f.as_str()))
        .bind(income.currency_code.as_str())
        .bind(income.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn update_income(&self, income: &Income) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE income
            SET amount = ?, income_type = ?, description = ?, date = ?,
                is_recurring = ?, recurring_frequency = ?, currency_code = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(income.amount)
        .bind(income.income_type.as_str())
        .bind(&income.description)
        .bind(income.date)
        .bind(income.is_recurring)
        .bind(income.recurring_frequency.map(|f| f.as_str()))
        .bind(income.currency_code.as_str())
        .bind(&income.id)
        .bind(&income.user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_income(&self, user_id: &str, income_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM income WHERE id = ? AND user_id = ?")
            .bind(income_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time_window::month_range;
    use chrono::{NaiveDate, NaiveDateTime};
    use shared::{CurrencyCode, IncomeType};

    async fn setup_test() -> IncomeRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        IncomeRepository::new(db)
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn salary(user_id: &str, date: NaiveDateTime, recurring: bool) -> Income {
        Income {
            id: Income::generate_id(),
            user_id: user_id.to_string(),
            amount: 30000.0,
            income_type: IncomeType::Salary,
            description: None,
            date,
            is_recurring: recurring,
            recurring_frequency: recurring.then_some(RecurringFrequency::Monthly),
            currency_code: CurrencyCode::Php,
            created_at: date,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_income_round_trips_frequency() {
        let repo = setup_test().await;
        let stored = salary("user-1", midnight(2024, 1, 15), true);
        repo.store_income(&stored).await.unwrap();

        let fetched = repo.get_income("user-1", &stored.id).await.unwrap();
        assert_eq!(fetched, Some(stored));
    }

    #[tokio::test]
    async fn test_list_recurring_only_returns_recurring_rows() {
        let repo = setup_test().await;
        repo.store_income(&salary("user-1", midnight(2024, 2, 15), true)).await.unwrap();
        repo.store_income(&salary("user-1", midnight(2024, 1, 15), true)).await.unwrap();
        repo.store_income(&salary("user-1", midnight(2024, 1, 20), false)).await.unwrap();
        repo.store_income(&salary("user-2", midnight(2024, 1, 15), true)).await.unwrap();

        let recurring = repo.list_recurring_income("user-1").await.unwrap();
        assert_eq!(recurring.len(), 2);
        assert_eq!(recurring[0].date, midnight(2024, 1, 15));
        assert_eq!(recurring[1].date, midnight(2024, 2, 15));
    }

    #[tokio::test]
    async fn test_insert_generated_if_absent_is_idempotent_per_month() {
        let repo = setup_test().await;
        let month = month_range(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        let first = salary("user-1", midnight(2024, 2, 15), true);
        assert!(repo.insert_generated_if_absent(&first, month).await.unwrap());

        let duplicate = salary("user-1", midnight(2024, 2, 20), true);
        assert!(!repo.insert_generated_if_absent(&duplicate, month).await.unwrap());

        // A different user is unaffected
        let other_user = salary("user-2", midnight(2024, 2, 15), true);
        assert!(repo.insert_generated_if_absent(&other_user, month).await.unwrap());

        assert_eq!(repo.list_income("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_recurring_row_does_not_block_generation() {
        let repo = setup_test().await;
        repo.store_income(&salary("user-1", midnight(2024, 2, 1), false)).await.unwrap();

        let month = month_range(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let generated = salary("user-1", midnight(2024, 2, 15), true);
        assert!(repo.insert_generated_if_absent(&generated, month).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete_income() {
        let repo = setup_test().await;
        let mut stored = salary("user-1", midnight(2024, 1, 15), false);
        repo.store_income(&stored).await.unwrap();

        stored.is_recurring = true;
        stored.recurring_frequency = Some(RecurringFrequency::EndMonth);
        stored.description = Some("Payroll".to_string());
        assert!(repo.update_income(&stored).await.unwrap());
        assert_eq!(repo.get_income("user-1", &stored.id).await.unwrap(), Some(stored.clone()));

        assert!(!repo.delete_income("user-2", &stored.id).await.unwrap());
        assert!(repo.delete_income("user-1", &stored.id).await.unwrap());
        assert!(repo.get_income("user-1", &stored.id).await.unwrap().is_none());
    }
}
