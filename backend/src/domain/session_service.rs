use std::sync::Arc;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::error::DomainResult;
use crate::domain::models::Session;
use crate::storage::SessionRepository;

/// Resolves session tokens issued by the external auth provider
#[derive(Clone)]
pub struct SessionService {
    session_repository: SessionRepository,
    clock: Arc<dyn Clock>,
}

impl SessionService {
    pub fn new(session_repository: SessionRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            session_repository,
            clock,
        }
    }

    /// The authenticated session for `token`, if it exists and has not expired
    pub async fn resolve(&self, token: &str) -> DomainResult<Option<Session>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        let session = self
            .session_repository
            .find_active_session(token, self.clock.now())
            .await?;
        if session.is_none() {
            debug!("No active session for presented token");
        }
        Ok(session)
    }
}
