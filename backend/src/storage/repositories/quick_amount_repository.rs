use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::enum_column;
use crate::domain::models::QuickAmountPreset;
use crate::storage::connection::DbConnection;

#[derive(Clone)]
pub struct QuickAmountRepository {
    db: DbConnection,
}

impl QuickAmountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<QuickAmountPreset> {
        Ok(QuickAmountPreset {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            category: enum_column(row, "category")?,
            amount: row.try_get("amount")?,
            currency_code: enum_column(row, "currency_code")?,
            description: row.try_get("description")?,
        })
    }

    pub async fn store_preset(&self, preset: &QuickAmountPreset) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quick_amount_presets (id, user_id, category, amount, currency_code, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&preset.id)
        .bind(&preset.user_id)
        .bind(preset.category.as_str())
        .bind(preset.amount)
        .bind(preset.currency_code.as_str())
        .bind(&preset.description)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn get_preset(&self, user_id: &str, preset_id: &str) -> Result<Option<QuickAmountPreset>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, category, amount, currency_code, description
            FROM quick_amount_presets
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(preset_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// Presets in the order they were created
    pub async fn list_presets(&self, user_id: &str) -> Result<Vec<QuickAmountPreset>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, category, amount, currency_code, description
            FROM quick_amount_presets
            WHERE user_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    pub async fn update_preset(&self, preset: &QuickAmountPreset) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE quick_amount_presets
            SET category = ?, amount = ?, currency_code = ?, description = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(preset.category.as_str())
        .bind(preset.amount)
        .bind(preset.currency_code.as_str())
        .bind(&preset.description)
        .bind(&preset.id)
        .bind(&preset.user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_preset(&self, user_id: &str, preset_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quick_amount_presets WHERE id = ? AND user_id = ?")
            .bind(preset_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CurrencyCode, ExpenseCategory};

    async fn setup_test() -> QuickAmountRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        QuickAmountRepository::new(db)
    }

    fn preset(user_id: &str, amount: f64) -> QuickAmountPreset {
        QuickAmountPreset {
            id: QuickAmountPreset::generate_id(),
            user_id: user_id.to_string(),
            category: ExpenseCategory::Transportation,
            amount,
            currency_code: CurrencyCode::Php,
            description: Some("Jeepney".to_string()),
        }
    }

    #[tokio::test]
    async fn test_presets_list_in_creation_order() {
        let repo = setup_test().await;
        let first = preset("user-1", 13.0);
        let second = preset("user-1", 50.0);
        repo.store_preset(&first).await.unwrap();
        repo.store_preset(&second).await.unwrap();
        repo.store_preset(&preset("user-2", 99.0)).await.unwrap();

        let presets = repo.list_presets("user-1").await.unwrap();
        assert_eq!(presets, vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_and_delete_are_owner_scoped() {
        let repo = setup_test().await;
        let mut stored = preset("user-1", 13.0);
        repo.store_preset(&stored).await.unwrap();

        stored.amount = 15.0;
        stored.description = None;
        assert!(repo.update_preset(&stored).await.unwrap());
        assert_eq!(repo.get_preset("user-1", &stored.id).await.unwrap(), Some(stored.clone()));

        assert!(repo.get_preset("user-2", &stored.id).await.unwrap().is_none());
        assert!(!repo.delete_preset("user-2", &stored.id).await.unwrap());
        assert!(repo.delete_preset("user-1", &stored.id).await.unwrap());
        assert!(repo.list_presets("user-1").await.unwrap().is_empty());
    }
}
