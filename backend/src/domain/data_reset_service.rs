use tracing::{info, warn};

use crate::domain::commands::data_reset::ResetResult;
use crate::domain::error::DomainResult;
use crate::domain::reset_range::resolve_range;
use crate::storage::{DataResetRepository, ResetCounts};
use shared::ResetPeriod;

fn summary(counts: ResetCounts, scope: &str) -> String {
    format!(
        "Deleted {} expenses and {} income entries {}",
        counts.expenses_deleted, counts.income_deleted, scope
    )
}

#[derive(Clone)]
pub struct DataResetService {
    data_reset_repository: DataResetRepository,
}

impl DataResetService {
    pub fn new(data_reset_repository: DataResetRepository) -> Self {
        Self {
            data_reset_repository,
        }
    }

    /// Removes all of the user's expenses and income and zeroes the monthly
    /// salary. Currency and theme preferences are kept.
    pub async fn reset_everything(&self, user_id: &str) -> DomainResult<ResetResult> {
        warn!("Resetting all data for {}", user_id);
        let counts = self.data_reset_repository.reset_all(user_id).await?;
        info!(
            "Full reset for {} removed {} expenses and {} income entries",
            user_id, counts.expenses_deleted, counts.income_deleted
        );

        Ok(ResetResult {
            expenses_deleted: counts.expenses_deleted,
            income_deleted: counts.income_deleted,
            range: None,
            success_message: summary(counts, "and reset the monthly salary"),
        })
    }

    /// Removes the user's records dated inside the period named by `token`.
    /// The token is validated before anything is deleted.
    pub async fn reset_by_time_period(&self, user_id: &str, period: ResetPeriod, token: &str) -> DomainResult<ResetResult> {
        let range = resolve_range(period, token)?;
        info!(
            "Resetting {} {} for {} ({} .. {})",
            period, token, user_id, range.start, range.end
        );
        let counts = self.data_reset_repository.reset_range(user_id, range).await?;

        Ok(ResetResult {
            expenses_deleted: counts.expenses_deleted,
            income_deleted: counts.income_deleted,
            range: Some(range),
            success_message: summary(counts, &format!("from {} {}", period, token.trim())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::domain::models::Expense;
    use crate::storage::{DbConnection, ExpenseRepository};
    use chrono::NaiveDate;
    use shared::{CurrencyCode, ExpenseCategory};

    async fn seed(db: &DbConnection, day: NaiveDate) {
        let at = day.and_hms_opt(12, 0, 0).unwrap();
        ExpenseRepository::new(db.clone())
            .store_expense(&Expense {
                id: Expense::generate_id(),
                user_id: "user-1".to_string(),
                amount: 20.0,
                category: ExpenseCategory::Food,
                description: None,
                date: at,
                currency_code: CurrencyCode::Php,
                created_at: at,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_by_month_reports_counts_and_range() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        seed(&db, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()).await;
        seed(&db, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap()).await;
        let service = DataResetService::new(DataResetRepository::new(db.clone()));

        let result = service
            .reset_by_time_period("user-1", ResetPeriod::Month, "2024-03")
            .await
            .unwrap();
        assert_eq!(result.expenses_deleted, 1);
        assert_eq!(result.income_deleted, 0);
        assert_eq!(
            result.range.map(|r| r.start.date()),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            result.success_message,
            "Deleted 1 expenses and 0 income entries from month 2024-03"
        );
        assert_eq!(ExpenseRepository::new(db).list_expenses("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_token_deletes_nothing() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        seed(&db, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()).await;
        let service = DataResetService::new(DataResetRepository::new(db.clone()));

        let err = service
            .reset_by_time_period("user-1", ResetPeriod::Year, "last year")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(ExpenseRepository::new(db).list_expenses("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_everything() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        seed(&db, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).await;
        seed(&db, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()).await;
        let service = DataResetService::new(DataResetRepository::new(db));

        let result = service.reset_everything("user-1").await.unwrap();
        assert_eq!(result.expenses_deleted, 2);
        assert!(result.range.is_none());
    }
}
