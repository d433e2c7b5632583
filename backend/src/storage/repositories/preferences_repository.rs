use anyhow::Result;
use sqlx::Row;

use super::enum_column;
use crate::domain::models::Preferences;
use crate::storage::connection::DbConnection;

/// One preferences row per user, created on first write
#[derive(Clone)]
pub struct PreferencesRepository {
    db: DbConnection,
}

impl PreferencesRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn get_preferences(&self, user_id: &str) -> Result<Option<Preferences>> {
        let row = sqlx::query(
            "SELECT user_id, monthly_salary, currency_code, color_scheme FROM user_preferences WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(Preferences {
                user_id: row.try_get("user_id")?,
                monthly_salary: row.try_get("monthly_salary")?,
                currency_code: enum_column(&row, "currency_code")?,
                color_scheme: enum_column(&row, "color_scheme")?,
            })),
            None => Ok(None),
        }
    }

    pub async fn upsert_preferences(&self, preferences: &Preferences) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, monthly_salary, currency_code, color_scheme, updated_at)
            VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(user_id) DO UPDATE SET
                monthly_salary = excluded.monthly_salary,
                currency_code = excluded.currency_code,
                color_scheme = excluded.color_scheme,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&preferences.user_id)
        .bind(preferences.monthly_salary)
        .bind(preferences.currency_code.as_str())
        .bind(preferences.color_scheme.as_str())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
