use shared::{ColorScheme, CurrencyCode};

#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub user_id: String,
    pub monthly_salary: f64,
    pub currency_code: CurrencyCode,
    pub color_scheme: ColorScheme,
}

impl Preferences {
    /// Values used until the user saves preferences for the first time
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            monthly_salary: 0.0,
            currency_code: CurrencyCode::Php,
            color_scheme: ColorScheme::Violet,
        }
    }
}
