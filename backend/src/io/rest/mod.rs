//! # RPC Interface Layer
//!
//! Exposes the dashboard procedures as `/<router>.<procedure>` routes. Each
//! handler extracts the authenticated user, maps the request DTO into a
//! domain command, calls the service and maps the result back.
//!
//! Queries are `GET` with query-string input; mutations are `POST` with a
//! JSON body.

pub mod data_apis;
pub mod error;
pub mod expense_apis;
pub mod extract;
pub mod income_apis;
pub mod mappers;
pub mod quick_amount_apis;
pub mod route_guard;
pub mod user_apis;

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::{DomainError, DomainResult};
use crate::AppState;
pub use error::ApiError;
pub use extract::AuthUser;

/// All RPC routers merged; mounted under `/api/trpc`
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(expense_apis::router())
        .merge(income_apis::router())
        .merge(user_apis::router())
        .merge(quick_amount_apis::router())
        .merge(data_apis::router())
        .fallback(unknown_procedure)
}

async fn unknown_procedure(uri: Uri) -> ApiError {
    warn!("Unknown procedure: {}", uri.path());
    ApiError::NotFound(format!("Unknown procedure {}", uri.path().trim_start_matches('/')))
}

/// Renders a service result as `200` JSON or the mapped error
pub(crate) fn respond<T: Serialize>(procedure: &str, result: DomainResult<T>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            if !matches!(e, DomainError::Storage(_)) {
                error!("{} failed: {}", procedure, e);
            }
            ApiError::from(e).into_response()
        }
    }
}
