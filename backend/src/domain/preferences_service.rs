use tracing::info;

use crate::domain::commands::preferences::UpdatePreferencesCommand;
use crate::domain::error::DomainResult;
use crate::domain::models::{Preferences, ValidationError, MAX_AMOUNT};
use crate::storage::PreferencesRepository;

#[derive(Clone)]
pub struct PreferencesService {
    preferences_repository: PreferencesRepository,
}

impl PreferencesService {
    pub fn new(preferences_repository: PreferencesRepository) -> Self {
        Self {
            preferences_repository,
        }
    }

    /// Stored preferences, or the defaults when the user never saved any
    pub async fn get_preferences(&self, user_id: &str) -> DomainResult<Preferences> {
        Ok(self
            .preferences_repository
            .get_preferences(user_id)
            .await?
            .unwrap_or_else(|| Preferences::defaults_for(user_id)))
    }

    pub async fn update_preferences(
        &self,
        user_id: &str,
        command: UpdatePreferencesCommand,
    ) -> DomainResult<Preferences> {
        if let Some(salary) = command.monthly_salary {
            if !salary.is_finite() || salary < 0.0 {
                return Err(ValidationError::NegativeSalary.into());
            }
            if salary > MAX_AMOUNT {
                return Err(ValidationError::AmountTooLarge.into());
            }
        }

        let mut preferences = self.get_preferences(user_id).await?;
        if let Some(salary) = command.monthly_salary {
            preferences.monthly_salary = salary;
        }
        if let Some(currency_code) = command.currency_code {
            preferences.currency_code = currency_code;
        }
        if let Some(color_scheme) = command.color_scheme {
            preferences.color_scheme = color_scheme;
        }

        self.preferences_repository.upsert_preferences(&preferences).await?;
        info!(
            "Updated preferences for {}: currency {}, theme {}",
            user_id, preferences.currency_code, preferences.color_scheme
        );
        Ok(preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::storage::DbConnection;
    use shared::{ColorScheme, CurrencyCode};

    async fn setup_test() -> PreferencesService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        PreferencesService::new(PreferencesRepository::new(db))
    }

    #[tokio::test]
    async fn test_defaults_when_never_saved() {
        let service = setup_test().await;
        let prefs = service.get_preferences("user-1").await.unwrap();
        assert_eq!(prefs, Preferences::defaults_for("user-1"));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let service = setup_test().await;
        service
            .update_preferences(
                "user-1",
                UpdatePreferencesCommand {
                    monthly_salary: Some(45000.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = service
            .update_preferences(
                "user-1",
                UpdatePreferencesCommand {
                    color_scheme: Some(ColorScheme::Rose),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.monthly_salary, 45000.0);
        assert_eq!(updated.currency_code, CurrencyCode::Php);
        assert_eq!(updated.color_scheme, ColorScheme::Rose);
        assert_eq!(service.get_preferences("user-1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_negative_salary_is_rejected() {
        let service = setup_test().await;
        let err = service
            .update_preferences(
                "user-1",
                UpdatePreferencesCommand {
                    monthly_salary: Some(-1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
