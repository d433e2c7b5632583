use crate::domain::commands::income::{
    CreateIncomeCommand, GenerateRecurringResult, MonthlyIncomeQuery, MonthlyIncomeResult,
    UpdateIncomeCommand,
};
use crate::domain::models::Income as DomainIncome;
use crate::domain::recurring_income::SeriesStatus;
use shared::{
    AddIncomeRequest, GenerateRecurringIncomeResponse, GetMonthlyIncomeInput, Income,
    MonthlyIncomeSummary, RecurringIncomeStatus, UpdateIncomeRequest,
};

pub struct IncomeMapper;

impl IncomeMapper {
    pub fn to_dto(domain: DomainIncome) -> Income {
        Income {
            id: domain.id,
            amount: domain.amount,
            income_type: domain.income_type,
            description: domain.description,
            date: domain.date,
            is_recurring: domain.is_recurring,
            recurring_frequency: domain.recurring_frequency,
            currency_code: domain.currency_code,
            created_at: domain.created_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainIncome>) -> Vec<Income> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_create_command(request: AddIncomeRequest) -> CreateIncomeCommand {
        CreateIncomeCommand {
            amount: request.amount,
            income_type: request.income_type,
            description: request.description,
            date: request.date,
            is_recurring: request.is_recurring,
            recurring_frequency: request.recurring_frequency,
            currency_code: request.currency_code,
        }
    }

    pub fn to_update_command(request: UpdateIncomeRequest) -> UpdateIncomeCommand {
        UpdateIncomeCommand {
            id: request.id,
            amount: request.amount,
            income_type: request.income_type,
            description: request.description,
            date: request.date,
            is_recurring: request.is_recurring,
            recurring_frequency: request.recurring_frequency,
            currency_code: request.currency_code,
        }
    }

    pub fn to_monthly_query(input: GetMonthlyIncomeInput) -> MonthlyIncomeQuery {
        MonthlyIncomeQuery {
            year: input.year,
            month: input.month,
        }
    }

    pub fn to_monthly_summary(result: MonthlyIncomeResult) -> MonthlyIncomeSummary {
        MonthlyIncomeSummary {
            year: result.year,
            month: result.month,
            total: result.total,
            currency_code: result.currency_code,
            monthly_salary: result.monthly_salary,
            entries: Self::to_dto_list(result.entries),
        }
    }

    pub fn to_status_list(statuses: Vec<SeriesStatus>) -> Vec<RecurringIncomeStatus> {
        statuses
            .into_iter()
            .map(|status| RecurringIncomeStatus {
                recurring_income_id: status.series.template.id,
                income_type: status.series.template.income_type,
                amount: status.series.template.amount,
                frequency: status.series.frequency,
                last_date: status.series.last_date,
                next_date: status.next_date,
                is_due: status.is_due,
                generated: status.generated,
            })
            .collect()
    }

    pub fn to_generate_response(result: GenerateRecurringResult) -> GenerateRecurringIncomeResponse {
        GenerateRecurringIncomeResponse {
            income: result.income.map(Self::to_dto),
            next_date: result.next_date,
            message: result.message,
        }
    }
}
