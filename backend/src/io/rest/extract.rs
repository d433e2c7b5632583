use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::error::ApiError;
use crate::domain::models::Session;

/// The authenticated caller, as placed in the request by the route guard
#[derive(Debug, Clone)]
pub struct AuthUser(pub Session);

impl AuthUser {
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .filter(|session| session.is_authenticated)
            .cloned()
            .map(AuthUser)
            .ok_or(ApiError::Unauthorized)
    }
}
