//! `expense.*` procedures

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::{mappers::ExpenseMapper, respond, ApiError, AuthUser};
use crate::AppState;
use shared::{
    AddExpenseRequest, DeleteRequest, DeleteResponse, GetRecentExpensesInput, GetReportInput,
    UpdateExpenseRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/expense.addExpense", post(add_expense))
        .route("/expense.getAllExpenses", get(get_all_expenses))
        .route("/expense.getTodayExpenses", get(get_today_expenses))
        .route("/expense.getRecentExpenses", get(get_recent_expenses))
        .route("/expense.getReport", get(get_report))
        .route("/expense.updateExpense", post(update_expense))
        .route("/expense.deleteExpense", post(delete_expense))
}

pub async fn add_expense(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<AddExpenseRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("expense.addExpense user={} amount={}", user.user_id(), request.amount);

    let command = ExpenseMapper::to_create_command(request);
    let result = state
        .expense_service
        .add_expense(user.user_id(), command)
        .await
        .map(ExpenseMapper::to_dto);
    Ok(respond("expense.addExpense", result))
}

pub async fn get_all_expenses(State(state): State<AppState>, user: AuthUser) -> Response {
    info!("expense.getAllExpenses user={}", user.user_id());
    let result = state
        .expense_service
        .list_expenses(user.user_id())
        .await
        .map(ExpenseMapper::to_dto_list);
    respond("expense.getAllExpenses", result)
}

pub async fn get_today_expenses(State(state): State<AppState>, user: AuthUser) -> Response {
    info!("expense.getTodayExpenses user={}", user.user_id());
    let result = state
        .expense_service
        .today_expenses(user.user_id())
        .await
        .map(ExpenseMapper::to_dto_list);
    respond("expense.getTodayExpenses", result)
}

pub async fn get_recent_expenses(
    State(state): State<AppState>,
    user: AuthUser,
    input: Result<Query<GetRecentExpensesInput>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(input) = input?;
    info!("expense.getRecentExpenses user={} limit={:?}", user.user_id(), input.limit);

    let result = state
        .expense_service
        .recent_expenses(user.user_id(), input.limit)
        .await
        .map(ExpenseMapper::to_dto_list);
    Ok(respond("expense.getRecentExpenses", result))
}

pub async fn get_report(
    State(state): State<AppState>,
    user: AuthUser,
    input: Result<Query<GetReportInput>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(input) = input?;
    info!("expense.getReport user={} period={}", user.user_id(), input.period);

    let result = state.expense_service.report(user.user_id(), input.period).await;
    Ok(respond("expense.getReport", result))
}

pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateExpenseRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("expense.updateExpense user={} id={}", user.user_id(), request.id);

    let command = ExpenseMapper::to_update_command(request);
    let result = state
        .expense_service
        .update_expense(user.user_id(), command)
        .await
        .map(ExpenseMapper::to_dto);
    Ok(respond("expense.updateExpense", result))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("expense.deleteExpense user={} id={}", user.user_id(), request.id);

    let result = state
        .expense_service
        .delete_expense(user.user_id(), &request.id)
        .await
        .map(|()| DeleteResponse { success: true });
    Ok(respond("expense.deleteExpense", result))
}
