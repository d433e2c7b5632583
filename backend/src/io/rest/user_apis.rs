//! `user.*` procedures: display preferences

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::{mappers::PreferencesMapper, respond, ApiError, AuthUser};
use crate::AppState;
use shared::UpdatePreferencesRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user.getPreferences", get(get_preferences))
        .route("/user.updatePreferences", post(update_preferences))
}

pub async fn get_preferences(State(state): State<AppState>, user: AuthUser) -> Response {
    info!("user.getPreferences user={}", user.user_id());
    let result = state
        .preferences_service
        .get_preferences(user.user_id())
        .await
        .map(PreferencesMapper::to_dto);
    respond("user.getPreferences", result)
}

pub async fn update_preferences(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdatePreferencesRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    info!("user.updatePreferences user={} request={:?}", user.user_id(), request);

    let result = state
        .preferences_service
        .update_preferences(user.user_id(), PreferencesMapper::to_update_command(request))
        .await
        .map(PreferencesMapper::to_dto);
    Ok(respond("user.updatePreferences", result))
}
