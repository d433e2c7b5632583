use crate::domain::commands::quick_amounts::{CreatePresetCommand, UpdatePresetCommand};
use crate::domain::currency::format_amount;
use crate::domain::models::QuickAmountPreset as DomainPreset;
use shared::{CreateQuickAmountRequest, QuickAmountPreset, UpdateQuickAmountRequest};

pub struct QuickAmountMapper;

impl QuickAmountMapper {
    /// Button label shown by the dashboard, e.g. `₱150.00 food`
    pub fn label(domain: &DomainPreset) -> String {
        format!("{} {}", format_amount(domain.amount, domain.currency_code), domain.category)
    }

    pub fn to_dto(domain: DomainPreset) -> QuickAmountPreset {
        let label = Self::label(&domain);
        QuickAmountPreset {
            id: domain.id,
            category: domain.category,
            amount: domain.amount,
            currency_code: domain.currency_code,
            description: domain.description,
            label,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainPreset>) -> Vec<QuickAmountPreset> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_create_command(request: CreateQuickAmountRequest) -> CreatePresetCommand {
        CreatePresetCommand {
            category: request.category,
            amount: request.amount,
            currency_code: request.currency_code,
            description: request.description,
        }
    }

    pub fn to_update_command(request: UpdateQuickAmountRequest) -> UpdatePresetCommand {
        UpdatePresetCommand {
            id: request.id,
            category: request.category,
            amount: request.amount,
            currency_code: request.currency_code,
            description: request.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CurrencyCode, ExpenseCategory};

    #[test]
    fn test_label_uses_currency_format() {
        let preset = DomainPreset {
            id: "preset::1".to_string(),
            user_id: "user-1".to_string(),
            category: ExpenseCategory::Food,
            amount: 150.0,
            currency_code: CurrencyCode::Php,
            description: None,
        };
        assert_eq!(QuickAmountMapper::to_dto(preset).label, "₱150.00 food");
    }
}
