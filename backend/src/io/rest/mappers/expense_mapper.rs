use crate::domain::commands::expenses::{CreateExpenseCommand, UpdateExpenseCommand};
use crate::domain::models::Expense as DomainExpense;
use shared::{AddExpenseRequest, Expense, UpdateExpenseRequest};

pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn to_dto(domain: DomainExpense) -> Expense {
        Expense {
            id: domain.id,
            amount: domain.amount,
            category: domain.category,
            description: domain.description,
            date: domain.date,
            currency_code: domain.currency_code,
            created_at: domain.created_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainExpense>) -> Vec<Expense> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_create_command(request: AddExpenseRequest) -> CreateExpenseCommand {
        CreateExpenseCommand {
            amount: request.amount,
            category: request.category,
            description: request.description,
            date: request.date,
            currency_code: request.currency_code,
        }
    }

    pub fn to_update_command(request: UpdateExpenseRequest) -> UpdateExpenseCommand {
        UpdateExpenseCommand {
            id: request.id,
            amount: request.amount,
            category: request.category,
            description: request.description,
            date: request.date,
            currency_code: request.currency_code,
        }
    }
}
