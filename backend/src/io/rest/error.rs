use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::domain::DomainError;
use shared::ErrorResponse;

/// Error returned by every RPC handler, rendered as `{"error": message}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Unauthorized => ApiError::Unauthorized,
            DomainError::Validation(message) => ApiError::BadRequest(message),
            not_found @ DomainError::NotFound(_) => ApiError::NotFound(not_found.to_string()),
            DomainError::Storage(source) => {
                error!("Storage failure: {:#}", source);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED, "Unauthorized"),
            (DomainError::validation("Amount must be a positive number"), StatusCode::BAD_REQUEST, "Amount must be a positive number"),
            (DomainError::NotFound("Expense".to_string()), StatusCode::NOT_FOUND, "Expense not found"),
            (DomainError::Storage(anyhow::anyhow!("disk I/O error")), StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        ];

        for (domain, status, message) in cases {
            let api = ApiError::from(domain);
            assert_eq!(api.status(), status);
            assert_eq!(api.to_string(), message);
        }
    }
}
