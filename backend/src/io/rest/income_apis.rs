//! `income.*` procedures, including recurring income generation

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

use super::{mappers::IncomeMapper, respond, ApiError, AuthUser};
use crate::AppState;
use shared::{
    AddIncomeRequest, DeleteRequest, DeleteResponse, GenerateRecurringIncomeRequest,
    GetIncomeByDateInput, GetMonthlyIncomeInput, UpdateIncomeRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/income.addIncome", post(add_income))
        .route("/income.getAllIncome", get(get_all_income))
        .route("/income.getMonthlyIncome", get(get_monthly_income))
        .route("/income.getIncomeByDate", get(get_income_by_date))
        .route("/income.updateIncome", post(update_income))
        .route("/income.deleteIncome", post(delete_income))
        .route("/income.getRecurringIncomeStatus", get(get_recurring_income_status))
        .route("/income.generateRecurringIncome", post(generate_recurring_income))
}

pub async fn add_income(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<AddIncomeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!(
        "income.addIncome user={} type={} recurring={}",
        user.user_id(),
        request.income_type,
        request.is_recurring
    );

    let command = IncomeMapper::to_create_command(request);
    let result = state
        .income_service
        .add_income(user.user_id(), command)
        .await
        .map(IncomeMapper::to_dto);
    Ok(respond("income.addIncome", result))
}

pub async fn get_all_income(State(state): State<AppState>, user: AuthUser) -> Response {
    info!("income.getAllIncome user={}", user.user_id());
    let result = state
        .income_service
        .list_income(user.user_id())
        .await
        .map(IncomeMapper::to_dto_list);
    respond("income.getAllIncome", result)
}

pub async fn get_monthly_income(
    State(state): State<AppState>,
    user: AuthUser,
    input: Result<Query<GetMonthlyIncomeInput>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(input) = input?;
    info!(
        "income.getMonthlyIncome user={} year={:?} month={:?}",
        user.user_id(),
        input.year,
        input.month
    );

    let result = state
        .income_service
        .monthly_income(user.user_id(), IncomeMapper::to_monthly_query(input))
        .await
        .map(IncomeMapper::to_monthly_summary);
    Ok(respond("income.getMonthlyIncome", result))
}

pub async fn get_income_by_date(
    State(state): State<AppState>,
    user: AuthUser,
    input: Result<Query<GetIncomeByDateInput>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(input) = input?;
    info!(
        "income.getIncomeByDate user={} {}..={}",
        user.user_id(),
        input.start_date,
        input.end_date
    );

    let result = state
        .income_service
        .income_by_date(user.user_id(), &input.start_date, &input.end_date)
        .await
        .map(IncomeMapper::to_dto_list);
    Ok(respond("income.getIncomeByDate", result))
}

pub async fn update_income(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateIncomeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("income.updateIncome user={} id={}", user.user_id(), request.id);

    let command = IncomeMapper::to_update_command(request);
    let result = state
        .income_service
        .update_income(user.user_id(), command)
        .await
        .map(IncomeMapper::to_dto);
    Ok(respond("income.updateIncome", result))
}

pub async fn delete_income(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("income.deleteIncome user={} id={}", user.user_id(), request.id);

    let result = state
        .income_service
        .delete_income(user.user_id(), &request.id)
        .await
        .map(|()| DeleteResponse { success: true });
    Ok(respond("income.deleteIncome", result))
}

pub async fn get_recurring_income_status(State(state): State<AppState>, user: AuthUser) -> Response {
    info!("income.getRecurringIncomeStatus user={}", user.user_id());
    let result = state
        .income_service
        .recurring_status(user.user_id())
        .await
        .map(IncomeMapper::to_status_list);
    respond("income.getRecurringIncomeStatus", result)
}

pub async fn generate_recurring_income(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<GenerateRecurringIncomeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!(
        "income.generateRecurringIncome user={} income_id={}",
        user.user_id(),
        request.income_id
    );

    let result = state
        .income_service
        .generate_recurring(user.user_id(), &request.income_id)
        .await
        .map(IncomeMapper::to_generate_response);
    Ok(respond("income.generateRecurringIncome", result))
}
