use anyhow::Result;
use chrono::NaiveDateTime;

use crate::domain::models::Session;
use crate::storage::connection::DbConnection;

/// Read access to sessions issued by the auth provider
#[derive(Clone)]
pub struct SessionRepository {
    db: DbConnection,
}

impl SessionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Looks up an unexpired session by token
    pub async fn find_active_session(&self, token: &str, now: NaiveDateTime) -> Result<Option<Session>> {
        let user_id: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM sessions WHERE token = ? AND expires_at > ?")
                .bind(token)
                .bind(now)
                .fetch_optional(self.db.pool())
                .await?;

        Ok(user_id.map(Session::authenticated))
    }

    /// Records a session. The auth provider owns this table; the server only
    /// writes to it when seeding local or test data.
    pub async fn store_session(&self, token: &str, user_id: &str, expires_at: NaiveDateTime) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)
            ON CONFLICT(token) DO UPDATE SET user_id = excluded.user_id, expires_at = excluded.expires_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 16).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_active_session_is_found() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = SessionRepository::new(db);
        repo.store_session("tok-1", "user-1", noon() + Duration::hours(1)).await.unwrap();

        let session = repo.find_active_session("tok-1", noon()).await.unwrap();
        assert_eq!(session, Some(Session::authenticated("user-1")));
        assert!(repo.find_active_session("unknown", noon()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = SessionRepository::new(db);
        repo.store_session("tok-1", "user-1", noon()).await.unwrap();

        assert!(repo.find_active_session("tok-1", noon()).await.unwrap().is_none());
    }
}
