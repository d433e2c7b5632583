//! Recurring income scheduling.
//!
//! Recurring income rows double as templates. Rows sharing
//! `(income_type, amount, frequency)` form one series; the earliest row names
//! the series and the latest row date is its last occurrence. Reading the
//! status of a user's series generates any entry that has fallen due, one
//! period per series per call.
//!
//! Generation is idempotent per calendar month: an entry is only inserted
//! when no recurring row with the same type and amount exists in the month of
//! the next occurrence. The check and the insert share a transaction.

use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::clock::Clock;
use crate::domain::commands::income::GenerateRecurringResult;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::Income;
use crate::domain::time_window::{add_months, days_in_month, last_of_month, midnight, month_range};
use crate::storage::IncomeRepository;
use shared::{IncomeType, RecurringFrequency};

/// Day of the month a `mid_month` income lands on: 15 in 30-day months,
/// 16 in 31-day months
pub fn mid_month_day(year: i32, month: u32) -> u32 {
    (days_in_month(year, month) + 1) / 2
}

/// The next occurrence of a series whose latest entry is dated `last_date`
pub fn next_occurrence(frequency: RecurringFrequency, last_date: NaiveDate, today: NaiveDate) -> NaiveDate {
    match frequency {
        RecurringFrequency::Monthly => add_months(last_date, 1),
        RecurringFrequency::Yearly => add_months(last_date, 12),
        RecurringFrequency::MidMonth => {
            let day = mid_month_day(today.year(), today.month());
            today.with_day(day).unwrap_or(today)
        }
        RecurringFrequency::EndMonth => last_of_month(today),
    }
}

pub fn is_due(
    frequency: RecurringFrequency,
    last_date: NaiveDate,
    next_date: NaiveDate,
    today: NaiveDate,
) -> bool {
    match frequency {
        RecurringFrequency::Monthly | RecurringFrequency::Yearly => today >= next_date,
        RecurringFrequency::MidMonth | RecurringFrequency::EndMonth => {
            today >= next_date && last_date < next_date
        }
    }
}

/// One recurring series: the template it started from and its latest date
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringSeries {
    pub template: Income,
    pub frequency: RecurringFrequency,
    pub last_date: NaiveDate,
}

impl RecurringSeries {
    fn matches(&self, income_type: IncomeType, amount: f64, frequency: RecurringFrequency) -> bool {
        self.template.income_type == income_type
            && self.template.amount == amount
            && self.frequency == frequency
    }
}

/// Groups recurring rows into series, in order of first appearance.
/// Rows without a frequency are skipped.
pub fn group_series(rows: &[Income]) -> Vec<RecurringSeries> {
    let mut series: Vec<RecurringSeries> = Vec::new();

    for row in rows.iter().filter(|r| r.is_recurring) {
        let Some(frequency) = row.recurring_frequency else {
            continue;
        };
        let date = row.date.date();

        match series
            .iter_mut()
            .find(|s| s.matches(row.income_type, row.amount, frequency))
        {
            Some(existing) => {
                if date < existing.template.date.date() {
                    existing.template = row.clone();
                }
                if date > existing.last_date {
                    existing.last_date = date;
                }
            }
            None => series.push(RecurringSeries {
                template: row.clone(),
                frequency,
                last_date: date,
            }),
        }
    }

    series
}

/// Status of a single series as returned to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStatus {
    pub series: RecurringSeries,
    pub next_date: NaiveDate,
    pub is_due: bool,
    pub generated: bool,
}

#[derive(Clone)]
pub struct RecurringIncomeScheduler {
    income_repository: IncomeRepository,
    clock: Arc<dyn Clock>,
}

impl RecurringIncomeScheduler {
    pub fn new(income_repository: IncomeRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            income_repository,
            clock,
        }
    }

    /// Builds the entry that would be generated for `series` on `next_date`
    fn entry_for(&self, series: &RecurringSeries, next_date: NaiveDate) -> Income {
        let template = &series.template;
        Income {
            id: Income::generate_id(),
            user_id: template.user_id.clone(),
            amount: template.amount,
            income_type: template.income_type,
            description: Some(
                template
                    .description
                    .clone()
                    .unwrap_or_else(|| Income::default_recurring_description(template.income_type)),
            ),
            date: midnight(next_date),
            is_recurring: true,
            recurring_frequency: Some(series.frequency),
            currency_code: template.currency_code,
            created_at: self.clock.now(),
        }
    }

    async fn generate(&self, series: &RecurringSeries, next_date: NaiveDate) -> DomainResult<Option<Income>> {
        let entry = self.entry_for(series, next_date);
        let inserted = self
            .income_repository
            .insert_generated_if_absent(&entry, month_range(next_date))
            .await?;

        if inserted {
            info!(
                "Generated recurring {} income {} for {} on {}",
                entry.income_type, entry.id, entry.user_id, next_date
            );
            Ok(Some(entry))
        } else {
            debug!(
                "Recurring {} income for {} already present in the month of {}",
                entry.income_type, entry.user_id, next_date
            );
            Ok(None)
        }
    }

    /// Reports every series of the user and generates the due ones
    pub async fn list_due_and_schedule(&self, user_id: &str, today: NaiveDate) -> DomainResult<Vec<SeriesStatus>> {
        let rows = self.income_repository.list_recurring_income(user_id).await?;
        let mut statuses = Vec::new();

        for series in group_series(&rows) {
            let next_date = next_occurrence(series.frequency, series.last_date, today);
            let due = is_due(series.frequency, series.last_date, next_date, today);
            let generated = if due {
                self.generate(&series, next_date).await?.is_some()
            } else {
                false
            };

            statuses.push(SeriesStatus {
                series,
                next_date,
                is_due: due,
                generated,
            });
        }

        Ok(statuses)
    }

    /// Generates the next occurrence of the series containing `income_id`
    /// whether or not it is due yet
    pub async fn generate_for(
        &self,
        user_id: &str,
        income_id: &str,
        today: NaiveDate,
    ) -> DomainResult<GenerateRecurringResult> {
        let income = self
            .income_repository
            .get_income(user_id, income_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Income".to_string()))?;

        let frequency = match (income.is_recurring, income.recurring_frequency) {
            (true, Some(frequency)) => frequency,
            _ => return Err(DomainError::validation("Income is not recurring")),
        };

        let rows = self.income_repository.list_recurring_income(user_id).await?;
        let series = group_series(&rows)
            .into_iter()
            .find(|s| s.matches(income.income_type, income.amount, frequency))
            .ok_or_else(|| DomainError::NotFound("Recurring income".to_string()))?;

        let next_date = next_occurrence(series.frequency, series.last_date, today);
        let generated = self.generate(&series, next_date).await?;
        let message = match &generated {
            Some(_) => format!("Generated {} income for {}", income.income_type, next_date),
            None => format!(
                "{} income for {} already exists",
                income.income_type,
                next_date.format("%B %Y")
            ),
        };

        Ok(GenerateRecurringResult {
            income: generated,
            next_date,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::storage::DbConnection;
    use chrono::NaiveDateTime;
    use shared::CurrencyCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recurring(user_id: &str, amount: f64, frequency: RecurringFrequency, on: NaiveDate) -> Income {
        let at: NaiveDateTime = midnight(on);
        Income {
            id: Income::generate_id(),
            user_id: user_id.to_string(),
            amount,
            income_type: IncomeType::Salary,
            description: None,
            date: at,
            is_recurring: true,
            recurring_frequency: Some(frequency),
            currency_code: CurrencyCode::Php,
            created_at: at,
        }
    }

    async fn setup_test(today: NaiveDate) -> (RecurringIncomeScheduler, IncomeRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = IncomeRepository::new(db);
        let clock = Arc::new(FixedClock::at_midnight(today));
        (RecurringIncomeScheduler::new(repo.clone(), clock), repo)
    }

    #[test]
    fn test_mid_month_day() {
        assert_eq!(mid_month_day(2024, 4), 15);
        assert_eq!(mid_month_day(2024, 3), 16);
        assert_eq!(mid_month_day(2024, 2), 15);
        assert_eq!(mid_month_day(2023, 2), 14);
    }

    #[test]
    fn test_next_occurrence_per_frequency() {
        let today = date(2024, 2, 16);
        assert_eq!(
            next_occurrence(RecurringFrequency::Monthly, date(2024, 1, 15), today),
            date(2024, 2, 15)
        );
        assert_eq!(
            next_occurrence(RecurringFrequency::Monthly, date(2024, 1, 31), today),
            date(2024, 2, 29)
        );
        assert_eq!(
            next_occurrence(RecurringFrequency::Yearly, date(2024, 2, 29), today),
            date(2025, 2, 28)
        );
        assert_eq!(
            next_occurrence(RecurringFrequency::MidMonth, date(2024, 1, 16), today),
            date(2024, 2, 15)
        );
        assert_eq!(
            next_occurrence(RecurringFrequency::EndMonth, date(2024, 1, 31), today),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn test_due_rules() {
        let mid = RecurringFrequency::MidMonth;
        // April has 30 days, so mid-month is the 15th
        assert!(!is_due(mid, date(2024, 3, 16), date(2024, 4, 15), date(2024, 4, 14)));
        assert!(is_due(mid, date(2024, 3, 16), date(2024, 4, 15), date(2024, 4, 15)));
        // Already paid this period
        assert!(!is_due(mid, date(2024, 4, 15), date(2024, 4, 15), date(2024, 4, 20)));

        let monthly = RecurringFrequency::Monthly;
        assert!(is_due(monthly, date(2024, 1, 15), date(2024, 2, 15), date(2024, 2, 15)));
        assert!(!is_due(monthly, date(2024, 1, 15), date(2024, 2, 15), date(2024, 2, 14)));
    }

    #[test]
    fn test_group_series_tracks_earliest_template_and_latest_date() {
        let jan = recurring("user-1", 30000.0, RecurringFrequency::Monthly, date(2024, 1, 15));
        let feb = recurring("user-1", 30000.0, RecurringFrequency::Monthly, date(2024, 2, 15));
        let other = recurring("user-1", 5000.0, RecurringFrequency::EndMonth, date(2024, 1, 31));

        let series = group_series(&[feb.clone(), jan.clone(), other.clone()]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].template.id, jan.id);
        assert_eq!(series[0].last_date, date(2024, 2, 15));
        assert_eq!(series[1].template.id, other.id);
    }

    #[tokio::test]
    async fn test_monthly_series_generates_once() {
        let today = date(2024, 2, 16);
        let (scheduler, repo) = setup_test(today).await;
        let template = recurring("user-1", 30000.0, RecurringFrequency::Monthly, date(2024, 1, 15));
        repo.store_income(&template).await.unwrap();

        let first = scheduler.list_due_and_schedule("user-1", today).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].next_date, date(2024, 2, 15));
        assert!(first[0].is_due);
        assert!(first[0].generated);

        let rows = repo.list_recurring_income("user-1").await.unwrap();
        assert_eq!(rows.len(), 2);
        let generated = &rows[1];
        assert_eq!(generated.date, midnight(date(2024, 2, 15)));
        assert_eq!(generated.description.as_deref(), Some("Recurring salary"));
        assert!(generated.is_recurring);

        let second = scheduler.list_due_and_schedule("user-1", today).await.unwrap();
        assert_eq!(second[0].next_date, date(2024, 3, 15));
        assert!(!second[0].is_due);
        assert!(!second[0].generated);
        assert_eq!(repo.list_recurring_income("user-1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_catch_up_is_one_period_per_call() {
        let today = date(2024, 4, 20);
        let (scheduler, repo) = setup_test(today).await;
        repo.store_income(&recurring("user-1", 1000.0, RecurringFrequency::Monthly, date(2024, 1, 10)))
            .await
            .unwrap();

        scheduler.list_due_and_schedule("user-1", today).await.unwrap();
        assert_eq!(repo.list_recurring_income("user-1").await.unwrap().len(), 2);

        scheduler.list_due_and_schedule("user-1", today).await.unwrap();
        scheduler.list_due_and_schedule("user-1", today).await.unwrap();
        let dates: Vec<NaiveDate> = repo
            .list_recurring_income("user-1")
            .await
            .unwrap()
            .iter()
            .map(|r| r.date.date())
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 10), date(2024, 2, 10), date(2024, 3, 10), date(2024, 4, 10)]
        );
    }

    #[tokio::test]
    async fn test_mid_month_waits_for_its_day() {
        let (scheduler, repo) = setup_test(date(2024, 3, 15)).await;
        repo.store_income(&recurring("user-1", 800.0, RecurringFrequency::MidMonth, date(2024, 2, 15)))
            .await
            .unwrap();

        // March has 31 days: mid-month is the 16th
        let before = scheduler.list_due_and_schedule("user-1", date(2024, 3, 15)).await.unwrap();
        assert_eq!(before[0].next_date, date(2024, 3, 16));
        assert!(!before[0].is_due);

        let on_day = scheduler.list_due_and_schedule("user-1", date(2024, 3, 16)).await.unwrap();
        assert!(on_day[0].generated);
    }

    #[tokio::test]
    async fn test_generate_for_ignores_due_date_but_stays_idempotent() {
        let today = date(2024, 2, 1);
        let (scheduler, repo) = setup_test(today).await;
        let template = recurring("user-1", 30000.0, RecurringFrequency::Monthly, date(2024, 1, 15));
        repo.store_income(&template).await.unwrap();

        let result = scheduler.generate_for("user-1", &template.id, today).await.unwrap();
        assert_eq!(result.next_date, date(2024, 2, 15));
        assert!(result.income.is_some());

        // The series has advanced, and March is still free
        let again = scheduler.generate_for("user-1", &template.id, today).await.unwrap();
        assert_eq!(again.next_date, date(2024, 3, 15));
        assert!(again.income.is_some());
    }

    #[tokio::test]
    async fn test_generate_for_rejects_unknown_and_one_off_income() {
        let today = date(2024, 2, 1);
        let (scheduler, repo) = setup_test(today).await;

        let err = scheduler.generate_for("user-1", "income::missing", today).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let mut one_off = recurring("user-1", 10.0, RecurringFrequency::Monthly, date(2024, 1, 1));
        one_off.is_recurring = false;
        one_off.recurring_frequency = None;
        repo.store_income(&one_off).await.unwrap();
        let err = scheduler.generate_for("user-1", &one_off.id, today).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_identical_type_and_amount_series_share_the_month_guard() {
        let today = date(2024, 2, 29);
        let (scheduler, repo) = setup_test(today).await;
        repo.store_income(&recurring("user-1", 500.0, RecurringFrequency::Monthly, date(2024, 1, 5)))
            .await
            .unwrap();
        repo.store_income(&recurring("user-1", 500.0, RecurringFrequency::EndMonth, date(2024, 1, 31)))
            .await
            .unwrap();

        let statuses = scheduler.list_due_and_schedule("user-1", today).await.unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| s.is_due));
        assert_eq!(statuses.iter().filter(|s| s.generated).count(), 1);
    }
}
