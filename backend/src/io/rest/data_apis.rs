//! `data.*` procedures: bulk deletion of a user's records

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use super::{mappers::DataResetMapper, respond, ApiError, AuthUser};
use crate::AppState;
use shared::ResetByTimePeriodRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/data.resetEverything", post(reset_everything))
        .route("/data.resetByTimePeriod", post(reset_by_time_period))
}

pub async fn reset_everything(State(state): State<AppState>, user: AuthUser) -> Response {
    warn!("data.resetEverything user={}", user.user_id());
    let result = state
        .data_reset_service
        .reset_everything(user.user_id())
        .await
        .map(DataResetMapper::to_response);
    respond("data.resetEverything", result)
}

pub async fn reset_by_time_period(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ResetByTimePeriodRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!(
        "data.resetByTimePeriod user={} period={} token={}",
        user.user_id(),
        request.period,
        request.token
    );

    let result = state
        .data_reset_service
        .reset_by_time_period(user.user_id(), request.period, &request.token)
        .await
        .map(DataResetMapper::to_response);
    Ok(respond("data.resetByTimePeriod", result))
}
