use anyhow::Result;

use crate::domain::time_window::DateRange;
use crate::storage::connection::DbConnection;

/// Rows removed by a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetCounts {
    pub expenses_deleted: u64,
    pub income_deleted: u64,
}

/// Bulk deletes spanning several tables. Each reset is one transaction.
#[derive(Clone)]
pub struct DataResetRepository {
    db: DbConnection,
}

impl DataResetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Deletes the user's expenses and income dated inside `range`
    pub async fn reset_range(&self, user_id: &str, range: DateRange) -> Result<ResetCounts> {
        let mut tx = self.db.pool().begin().await?;

        let expenses = sqlx::query("DELETE FROM expenses WHERE user_id = ? AND date >= ? AND date < ?")
            .bind(user_id)
            .bind(range.start)
            .bind(range.end)
            .execute(&mut *tx)
            .await?;

        let income = sqlx::query("DELETE FROM income WHERE user_id = ? AND date >= ? AND date < ?")
            .bind(user_id)
            .bind(range.start)
            .bind(range.end)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ResetCounts {
            expenses_deleted: expenses.rows_affected(),
            income_deleted: income.rows_affected(),
        })
    }

    /// Deletes every expense and income row and zeroes the monthly salary.
    /// Currency and colour preferences survive.
    pub async fn reset_all(&self, user_id: &str) -> Result<ResetCounts> {
        let mut tx = self.db.pool().begin().await?;

        let expenses = sqlx::query("DELETE FROM expenses WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let income = sqlx::query("DELETE FROM income WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE user_preferences SET monthly_salary = 0, updated_at = CURRENT_TIMESTAMP WHERE user_id = ?",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ResetCounts {
            expenses_deleted: expenses.rows_affected(),
            income_deleted: income.rows_affected(),
        })
    }
}
