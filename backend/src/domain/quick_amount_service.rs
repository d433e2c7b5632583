use tracing::info;

use crate::domain::commands::expenses::CreateExpenseCommand;
use crate::domain::commands::quick_amounts::{CreatePresetCommand, UpdatePresetCommand};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::expense_service::ExpenseService;
use crate::domain::models::{normalize_description, validate_amount, Expense, QuickAmountPreset};
use crate::domain::preferences_service::PreferencesService;
use crate::storage::QuickAmountRepository;

/// Saved one-click expense templates
#[derive(Clone)]
pub struct QuickAmountService {
    quick_amount_repository: QuickAmountRepository,
    preferences_service: PreferencesService,
    expense_service: ExpenseService,
}

impl QuickAmountService {
    pub fn new(
        quick_amount_repository: QuickAmountRepository,
        preferences_service: PreferencesService,
        expense_service: ExpenseService,
    ) -> Self {
        Self {
            quick_amount_repository,
            preferences_service,
            expense_service,
        }
    }

    pub async fn list_presets(&self, user_id: &str) -> DomainResult<Vec<QuickAmountPreset>> {
        Ok(self.quick_amount_repository.list_presets(user_id).await?)
    }

    pub async fn create_preset(&self, user_id: &str, command: CreatePresetCommand) -> DomainResult<QuickAmountPreset> {
        validate_amount(command.amount)?;
        let description = normalize_description(command.description)?;
        let currency_code = match command.currency_code {
            Some(code) => code,
            None => self.preferences_service.get_preferences(user_id).await?.currency_code,
        };

        let preset = QuickAmountPreset {
            id: QuickAmountPreset::generate_id(),
            user_id: user_id.to_string(),
            category: command.category,
            amount: command.amount,
            currency_code,
            description,
        };
        self.quick_amount_repository.store_preset(&preset).await?;
        info!("Created quick amount preset {} for {}", preset.id, user_id);
        Ok(preset)
    }

    pub async fn update_preset(&self, user_id: &str, command: UpdatePresetCommand) -> DomainResult<QuickAmountPreset> {
        let mut preset = self.find_preset(user_id, &command.id).await?;

        if let Some(amount) = command.amount {
            validate_amount(amount)?;
            preset.amount = amount;
        }
        if let Some(category) = command.category {
            preset.category = category;
        }
        if let Some(currency_code) = command.currency_code {
            preset.currency_code = currency_code;
        }
        if command.description.is_some() {
            preset.description = normalize_description(command.description)?;
        }

        if !self.quick_amount_repository.update_preset(&preset).await? {
            return Err(DomainError::NotFound("Quick amount preset".to_string()));
        }
        Ok(preset)
    }

    pub async fn delete_preset(&self, user_id: &str, preset_id: &str) -> DomainResult<()> {
        if !self.quick_amount_repository.delete_preset(user_id, preset_id).await? {
            return Err(DomainError::NotFound("Quick amount preset".to_string()));
        }
        info!("Deleted quick amount preset {} for {}", preset_id, user_id);
        Ok(())
    }

    /// Records an expense copied from the preset, dated `date` or now
    pub async fn quick_add(&self, user_id: &str, preset_id: &str, date: Option<String>) -> DomainResult<Expense> {
        let preset = self.find_preset(user_id, preset_id).await?;
        self.expense_service
            .add_expense(
                user_id,
                CreateExpenseCommand {
                    amount: preset.amount,
                    category: preset.category,
                    description: preset.description,
                    date,
                    currency_code: Some(preset.currency_code),
                },
            )
            .await
    }

    async fn find_preset(&self, user_id: &str, preset_id: &str) -> DomainResult<QuickAmountPreset> {
        self.quick_amount_repository
            .get_preset(user_id, preset_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Quick amount preset".to_string()))
    }
}
