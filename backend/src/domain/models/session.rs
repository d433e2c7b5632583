/// What this service knows about a caller's session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub is_authenticated: bool,
}

impl Session {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_authenticated: true,
        }
    }
}
