//! `quickAmounts.*` procedures: preset buttons and one-tap expense entry

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::{
    mappers::{ExpenseMapper, QuickAmountMapper},
    respond, ApiError, AuthUser,
};
use crate::AppState;
use shared::{
    CreateQuickAmountRequest, DeleteRequest, DeleteResponse, QuickAddRequest,
    UpdateQuickAmountRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quickAmounts.getAll", get(get_all))
        .route("/quickAmounts.create", post(create))
        .route("/quickAmounts.update", post(update))
        .route("/quickAmounts.delete", post(delete))
        .route("/quickAmounts.quickAdd", post(quick_add))
}

pub async fn get_all(State(state): State<AppState>, user: AuthUser) -> Response {
    info!("quickAmounts.getAll user={}", user.user_id());
    let result = state
        .quick_amount_service
        .list_presets(user.user_id())
        .await
        .map(QuickAmountMapper::to_dto_list);
    respond("quickAmounts.getAll", result)
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateQuickAmountRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!(
        "quickAmounts.create user={} category={} amount={}",
        user.user_id(),
        request.category,
        request.amount
    );

    let result = state
        .quick_amount_service
        .create_preset(user.user_id(), QuickAmountMapper::to_create_command(request))
        .await
        .map(QuickAmountMapper::to_dto);
    Ok(respond("quickAmounts.create", result))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateQuickAmountRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("quickAmounts.update user={} id={}", user.user_id(), request.id);

    let result = state
        .quick_amount_service
        .update_preset(user.user_id(), QuickAmountMapper::to_update_command(request))
        .await
        .map(QuickAmountMapper::to_dto);
    Ok(respond("quickAmounts.update", result))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("quickAmounts.delete user={} id={}", user.user_id(), request.id);

    let result = state
        .quick_amount_service
        .delete_preset(user.user_id(), &request.id)
        .await
        .map(|()| DeleteResponse { success: true });
    Ok(respond("quickAmounts.delete", result))
}

pub async fn quick_add(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<QuickAddRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("quickAmounts.quickAdd user={} preset={}", user.user_id(), request.preset_id);

    let result = state
        .quick_amount_service
        .quick_add(user.user_id(), &request.preset_id, request.date)
        .await
        .map(ExpenseMapper::to_dto);
    Ok(respond("quickAmounts.quickAdd", result))
}
