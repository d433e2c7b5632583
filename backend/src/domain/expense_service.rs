//! Expense management: CRUD, the today/recent views and reports.

use chrono::Duration;
use std::sync::Arc;
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::commands::expenses::{CreateExpenseCommand, UpdateExpenseCommand};
use crate::domain::currency::CurrencyConverter;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{normalize_description, parse_entry_date, validate_amount, Expense};
use crate::domain::preferences_service::PreferencesService;
use crate::domain::reports::{build_report, report_window_start, ReportEntry};
use crate::domain::time_window::{day_range, midnight, DateRange};
use crate::storage::ExpenseRepository;
use shared::{ExpenseReport, ReportPeriod};

pub const DEFAULT_RECENT_LIMIT: u32 = 5;
pub const MAX_RECENT_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct ExpenseService {
    expense_repository: ExpenseRepository,
    preferences_service: PreferencesService,
    converter: CurrencyConverter,
    clock: Arc<dyn Clock>,
}

impl ExpenseService {
    pub fn new(
        expense_repository: ExpenseRepository,
        preferences_service: PreferencesService,
        converter: CurrencyConverter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            expense_repository,
            preferences_service,
            converter,
            clock,
        }
    }

    pub async fn add_expense(&self, user_id: &str, command: CreateExpenseCommand) -> DomainResult<Expense> {
        validate_amount(command.amount)?;
        let description = normalize_description(command.description)?;
        let now = self.clock.now();
        let date = parse_entry_date(command.date.as_deref(), now)?;

        let currency_code = match command.currency_code {
            Some(code) => code,
            None => self.preferences_service.get_preferences(user_id).await?.currency_code,
        };

        let expense = Expense {
            id: Expense::generate_id(),
            user_id: user_id.to_string(),
            amount: command.amount,
            category: command.category,
            description,
            date,
            currency_code,
            created_at: now,
        };

        self.expense_repository.store_expense(&expense).await?;
        info!(
            "Added {} expense {} of {} {} for {}",
            expense.category, expense.id, expense.amount, expense.currency_code, user_id
        );
        Ok(expense)
    }

    pub async fn list_expenses(&self, user_id: &str) -> DomainResult<Vec<Expense>> {
        Ok(self.expense_repository.list_expenses(user_id).await?)
    }

    pub async fn today_expenses(&self, user_id: &str) -> DomainResult<Vec<Expense>> {
        let today = day_range(self.clock.today());
        Ok(self.expense_repository.list_expenses_in_range(user_id, today).await?)
    }

    /// Most recent expenses; the limit defaults to 5 and is capped at 50
    pub async fn recent_expenses(&self, user_id: &str, limit: Option<u32>) -> DomainResult<Vec<Expense>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, MAX_RECENT_LIMIT);
        Ok(self.expense_repository.list_recent_expenses(user_id, limit).await?)
    }

    pub async fn update_expense(&self, user_id: &str, command: UpdateExpenseCommand) -> DomainResult<Expense> {
        let mut expense = self
            .expense_repository
            .get_expense(user_id, &command.id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Expense".to_string()))?;

        if let Some(amount) = command.amount {
            validate_amount(amount)?;
            expense.amount = amount;
        }
        if let Some(category) = command.category {
            expense.category = category;
        }
        if command.description.is_some() {
            expense.description = normalize_description(command.description)?;
        }
        if let Some(raw) = command.date.as_deref() {
            expense.date = parse_entry_date(Some(raw), expense.date)?;
        }
        if let Some(currency_code) = command.currency_code {
            expense.currency_code = currency_code;
        }

        if !self.expense_repository.update_expense(&expense).await? {
            return Err(DomainError::NotFound("Expense".to_string()));
        }
        info!("Updated expense {} for {}", expense.id, user_id);
        Ok(expense)
    }

    pub async fn delete_expense(&self, user_id: &str, expense_id: &str) -> DomainResult<()> {
        if !self.expense_repository.delete_expense(user_id, expense_id).await? {
            return Err(DomainError::NotFound("Expense".to_string()));
        }
        info!("Deleted expense {} for {}", expense_id, user_id);
        Ok(())
    }

    /// Builds a report in the user's preferred currency
    pub async fn report(&self, user_id: &str, period: ReportPeriod) -> DomainResult<ExpenseReport> {
        let today = self.clock.today();
        let range = DateRange {
            start: midnight(report_window_start(period, today)),
            end: midnight(today + Duration::days(1)),
        };
        let expenses = self.expense_repository.list_expenses_in_range(user_id, range).await?;
        let currency_code = self.preferences_service.get_preferences(user_id).await?.currency_code;

        let amounts: Vec<_> = expenses.iter().map(|e| (e.amount, e.currency_code)).collect();
        let converted = self.converter.convert_mixed(&amounts, currency_code).await;

        let entries: Vec<ReportEntry> = expenses
            .iter()
            .zip(converted)
            .map(|(expense, amount)| ReportEntry {
                date: expense.date.date(),
                amount,
                category: expense.category,
            })
            .collect();

        Ok(build_report(period, &entries, today, currency_code))
    }
}
