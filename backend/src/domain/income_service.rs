//! Income management, the monthly summary and recurring income status.

use chrono::{Datelike, Duration, NaiveDate};
use std::sync::Arc;
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::commands::income::{
    CreateIncomeCommand, GenerateRecurringResult, MonthlyIncomeQuery, MonthlyIncomeResult,
    UpdateIncomeCommand,
};
use crate::domain::currency::{round_currency, CurrencyConverter};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{
    normalize_description, parse_entry_date, validate_amount, Income, ValidationError,
};
use crate::domain::preferences_service::PreferencesService;
use crate::domain::recurring_income::{RecurringIncomeScheduler, SeriesStatus};
use crate::domain::time_window::{midnight, month_range, DateRange};
use crate::storage::IncomeRepository;
use shared::RecurringFrequency;

/// Frequency is kept only on recurring income
fn resolve_frequency(
    is_recurring: bool,
    frequency: Option<RecurringFrequency>,
) -> Result<Option<RecurringFrequency>, ValidationError> {
    match (is_recurring, frequency) {
        (true, None) => Err(ValidationError::MissingFrequency),
        (true, Some(frequency)) => Ok(Some(frequency)),
        (false, _) => Ok(None),
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

#[derive(Clone)]
pub struct IncomeService {
    income_repository: IncomeRepository,
    preferences_service: PreferencesService,
    converter: CurrencyConverter,
    scheduler: RecurringIncomeScheduler,
    clock: Arc<dyn Clock>,
}

impl IncomeService {
    pub fn new(
        income_repository: IncomeRepository,
        preferences_service: PreferencesService,
        converter: CurrencyConverter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let scheduler = RecurringIncomeScheduler::new(income_repository.clone(), clock.clone());
        Self {
            income_repository,
            preferences_service,
            converter,
            scheduler,
            clock,
        }
    }

    pub async fn add_income(&self, user_id: &str, command: CreateIncomeCommand) -> DomainResult<Income> {
        validate_amount(command.amount)?;
        let recurring_frequency = resolve_frequency(command.is_recurring, command.recurring_frequency)?;
        let description = normalize_description(command.description)?;
        let now = self.clock.now();
        let date = parse_entry_date(command.date.as_deref(), now)?;

        let currency_code = match command.currency_code {
            Some(code) => code,
            None => self.preferences_service.get_preferences(user_id).await?.currency_code,
        };

        let income = Income {
            id: Income::generate_id(),
            user_id: user_id.to_string(),
            amount: command.amount,
            income_type: command.income_type,
            description,
            date,
            is_recurring: command.is_recurring,
            recurring_frequency,
            currency_code,
            created_at: now,
        };

        self.income_repository.store_income(&income).await?;
        info!(
            "Added {} income {} of {} {} for {} (recurring: {})",
            income.income_type, income.id, income.amount, income.currency_code, user_id, income.is_recurring
        );
        Ok(income)
    }

    pub async fn list_income(&self, user_id: &str) -> DomainResult<Vec<Income>> {
        Ok(self.income_repository.list_income(user_id).await?)
    }

    /// Income between two `YYYY-MM-DD` dates, both inclusive
    pub async fn income_by_date(&self, user_id: &str, start_date: &str, end_date: &str) -> DomainResult<Vec<Income>> {
        let start = parse_day(start_date)?;
        let end = parse_day(end_date)?;
        if end < start {
            return Err(DomainError::validation("end_date must not be before start_date"));
        }

        let range = DateRange {
            start: midnight(start),
            end: midnight(end + Duration::days(1)),
        };
        Ok(self.income_repository.list_income_in_range(user_id, range).await?)
    }

    /// Entries of one calendar month with their total in the user's currency
    pub async fn monthly_income(&self, user_id: &str, query: MonthlyIncomeQuery) -> DomainResult<MonthlyIncomeResult> {
        let today = self.clock.today();
        let year = query.year.unwrap_or(today.year());
        let month = query.month.unwrap_or(today.month());
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DomainError::validation(format!("Invalid month: {}-{}", year, month)))?;

        let entries = self
            .income_repository
            .list_income_in_range(user_id, month_range(first))
            .await?;
        let preferences = self.preferences_service.get_preferences(user_id).await?;

        let amounts: Vec<_> = entries.iter().map(|i| (i.amount, i.currency_code)).collect();
        let converted = self
            .converter
            .convert_mixed(&amounts, preferences.currency_code)
            .await;

        Ok(MonthlyIncomeResult {
            year,
            month,
            total: round_currency(converted.iter().sum()),
            currency_code: preferences.currency_code,
            monthly_salary: preferences.monthly_salary,
            entries,
        })
    }

    pub async fn update_income(&self, user_id: &str, command: UpdateIncomeCommand) -> DomainResult<Income> {
        let mut income = self
            .income_repository
            .get_income(user_id, &command.id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Income".to_string()))?;

        if let Some(amount) = command.amount {
            validate_amount(amount)?;
            income.amount = amount;
        }
        if let Some(income_type) = command.income_type {
            income.income_type = income_type;
        }
        if command.description.is_some() {
            income.description = normalize_description(command.description)?;
        }
        if let Some(raw) = command.date.as_deref() {
            income.date = parse_entry_date(Some(raw), income.date)?;
        }
        if let Some(currency_code) = command.currency_code {
            income.currency_code = currency_code;
        }
        let is_recurring = command.is_recurring.unwrap_or(income.is_recurring);
        let frequency = command.recurring_frequency.or(income.recurring_frequency);
        income.recurring_frequency = resolve_frequency(is_recurring, frequency)?;
        income.is_recurring = is_recurring;

        if !self.income_repository.update_income(&income).await? {
            return Err(DomainError::NotFound("Income".to_string()));
        }
        info!("Updated income {} for {}", income.id, user_id);
        Ok(income)
    }

    pub async fn delete_income(&self, user_id: &str, income_id: &str) -> DomainResult<()> {
        if !self.income_repository.delete_income(user_id, income_id).await? {
            return Err(DomainError::NotFound("Income".to_string()));
        }
        info!("Deleted income {} for {}", income_id, user_id);
        Ok(())
    }

    /// Status of every recurring series. Due entries are generated first.
    pub async fn recurring_status(&self, user_id: &str) -> DomainResult<Vec<SeriesStatus>> {
        self.scheduler.list_due_and_schedule(user_id, self.clock.today()).await
    }

    pub async fn generate_recurring(&self, user_id: &str, income_id: &str) -> DomainResult<GenerateRecurringResult> {
        self.scheduler
            .generate_for(user_id, income_id, self.clock.today())
            .await
    }
}
