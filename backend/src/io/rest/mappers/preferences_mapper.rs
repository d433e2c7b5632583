use crate::domain::commands::preferences::UpdatePreferencesCommand;
use crate::domain::models::Preferences;
use shared::{UpdatePreferencesRequest, UserPreferences};

pub struct PreferencesMapper;

impl PreferencesMapper {
    pub fn to_dto(domain: Preferences) -> UserPreferences {
        UserPreferences {
            monthly_salary: domain.monthly_salary,
            currency_code: domain.currency_code,
            color_scheme: domain.color_scheme,
        }
    }

    pub fn to_update_command(request: UpdatePreferencesRequest) -> UpdatePreferencesCommand {
        UpdatePreferencesCommand {
            monthly_salary: request.monthly_salary,
            currency_code: request.currency_code,
            color_scheme: request.color_scheme,
        }
    }
}
