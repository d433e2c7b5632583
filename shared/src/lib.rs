use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a wire string does not name a known enum variant
#[derive(Debug, Clone, PartialEq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Declares a closed enum with a fixed wire string per variant, plus
/// `as_str`, `ALL`, `Display` and `FromStr`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Currencies the dashboard can display. Amounts are stored in the
    /// currency they were entered in and converted through PHP.
    CurrencyCode, "currency code" {
        Php => "PHP",
        Usd => "USD",
        Eur => "EUR",
        Gbp => "GBP",
        Jpy => "JPY",
        Aud => "AUD",
        Cad => "CAD",
        Sgd => "SGD",
    }
}

/// The currency all conversions route through
pub const BASE_CURRENCY: CurrencyCode = CurrencyCode::Php;

impl CurrencyCode {
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Php => "₱",
            CurrencyCode::Usd => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Gbp => "£",
            CurrencyCode::Jpy => "¥",
            CurrencyCode::Aud => "A$",
            CurrencyCode::Cad => "C$",
            CurrencyCode::Sgd => "S$",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurrencyCode::Php => "Philippine Peso",
            CurrencyCode::Usd => "US Dollar",
            CurrencyCode::Eur => "Euro",
            CurrencyCode::Gbp => "British Pound",
            CurrencyCode::Jpy => "Japanese Yen",
            CurrencyCode::Aud => "Australian Dollar",
            CurrencyCode::Cad => "Canadian Dollar",
            CurrencyCode::Sgd => "Singapore Dollar",
        }
    }

    /// Number of minor-unit digits shown when formatting
    pub fn decimals(&self) -> usize {
        match self {
            CurrencyCode::Jpy => 0,
            _ => 2,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        BASE_CURRENCY
    }
}

wire_enum! {
    /// Fixed set of expense categories
    ExpenseCategory, "expense category" {
        Transportation => "transportation",
        Food => "food",
        Bills => "bills",
        Entertainment => "entertainment",
        Shopping => "shopping",
        Healthcare => "healthcare",
        Education => "education",
        Travel => "travel",
        Groceries => "groceries",
        Utilities => "utilities",
        Others => "others",
    }
}

wire_enum! {
    IncomeType, "income type" {
        Salary => "salary",
        Freelance => "freelance",
        Investment => "investment",
        Bonus => "bonus",
        Other => "other",
    }
}

wire_enum! {
    /// How often a recurring income repeats
    RecurringFrequency, "recurring frequency" {
        Monthly => "monthly",
        MidMonth => "mid_month",
        EndMonth => "end_month",
        Yearly => "yearly",
    }
}

wire_enum! {
    ColorScheme, "color scheme" {
        Violet => "violet",
        Blue => "blue",
        Green => "green",
        Orange => "orange",
        Rose => "rose",
        Slate => "slate",
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Violet
    }
}

wire_enum! {
    /// Granularity of an expense report
    ReportPeriod, "report period" {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Category => "category",
    }
}

wire_enum! {
    /// Scope of a bulk data reset
    ResetPeriod, "reset period" {
        Week => "week",
        Month => "month",
        Year => "year",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    /// Local wall-clock timestamp of the expense
    pub date: NaiveDateTime,
    pub currency_code: CurrencyCode,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub amount: f64,
    pub income_type: IncomeType,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub is_recurring: bool,
    /// Present iff `is_recurring`
    pub recurring_frequency: Option<RecurringFrequency>,
    pub currency_code: CurrencyCode,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAmountPreset {
    pub id: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub currency_code: CurrencyCode,
    pub description: Option<String>,
    /// Display label such as "₱150.00 food"
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub monthly_salary: f64,
    pub currency_code: CurrencyCode,
    pub color_scheme: ColorScheme,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            monthly_salary: 0.0,
            currency_code: CurrencyCode::default(),
            color_scheme: ColorScheme::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddExpenseRequest {
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    /// ISO date or datetime; defaults to now
    pub date: Option<String>,
    /// Defaults to the user's preferred currency
    pub currency_code: Option<CurrencyCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    pub id: String,
    pub amount: Option<f64>,
    pub category: Option<ExpenseCategory>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub currency_code: Option<CurrencyCode>,
}

/// Body of every delete procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// One time bucket of a trailing report window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBucket {
    pub label: String,
    pub start_date: NaiveDate,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: ExpenseCategory,
    pub total: f64,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReport {
    pub period: ReportPeriod,
    /// Currency every amount in the report is expressed in
    pub currency_code: CurrencyCode,
    pub total: f64,
    /// Percentage change of the most recent window against the one before it
    pub trend_percentage: f64,
    pub buckets: Vec<ReportBucket>,
    pub categories: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddIncomeRequest {
    pub amount: f64,
    pub income_type: IncomeType,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub currency_code: Option<CurrencyCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateIncomeRequest {
    pub id: String,
    pub amount: Option<f64>,
    pub income_type: Option<IncomeType>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub currency_code: Option<CurrencyCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncomeSummary {
    pub year: i32,
    pub month: u32,
    /// Sum of the month's entries in the user's preferred currency
    pub total: f64,
    pub currency_code: CurrencyCode,
    pub monthly_salary: f64,
    pub entries: Vec<Income>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringIncomeStatus {
    pub recurring_income_id: String,
    pub income_type: IncomeType,
    pub amount: f64,
    pub frequency: RecurringFrequency,
    pub last_date: NaiveDate,
    pub next_date: NaiveDate,
    pub is_due: bool,
    /// True when this call inserted the entry for `next_date`
    pub generated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRecurringIncomeRequest {
    pub income_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRecurringIncomeResponse {
    /// The new entry, or `None` when one already exists for that month
    pub income: Option<Income>,
    pub next_date: NaiveDate,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdatePreferencesRequest {
    pub monthly_salary: Option<f64>,
    pub currency_code: Option<CurrencyCode>,
    pub color_scheme: Option<ColorScheme>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateQuickAmountRequest {
    pub category: ExpenseCategory,
    pub amount: f64,
    pub currency_code: Option<CurrencyCode>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQuickAmountRequest {
    pub id: String,
    pub category: Option<ExpenseCategory>,
    pub amount: Option<f64>,
    pub currency_code: Option<CurrencyCode>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAddRequest {
    pub preset_id: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetByTimePeriodRequest {
    pub period: ResetPeriod,
    /// `YYYY-Www`, `YYYY-MM` or `YYYY` depending on `period`
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub expenses_deleted: u64,
    pub income_deleted: u64,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub success_message: String,
}

/// Query string of `expense.getRecentExpenses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GetRecentExpensesInput {
    pub limit: Option<u32>,
}

/// Query string of `expense.getReport`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetReportInput {
    pub period: ReportPeriod,
}

/// Query string of `income.getMonthlyIncome`; omitted parts mean the current month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GetMonthlyIncomeInput {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Query string of `income.getIncomeByDate`; both dates are inclusive `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetIncomeByDateInput {
    pub start_date: String,
    pub end_date: String,
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
