//! Runtime configuration read from the environment (and an optional `.env`).

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "sqlite:expense_tracker.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_STATIC_DIR: &str = "../frontend/dist";
pub const DEFAULT_RATE_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Settings for the external auth collaborator. When absent the route guard
/// lets every request through.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    /// Name of the cookie carrying the session token
    pub session_cookie: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Public origin of the dashboard, used for CORS
    pub base_url: String,
    pub static_dir: PathBuf,
    pub rate_api_url: String,
    pub auth: Option<AuthConfig>,
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_addr_raw = get("EXPENSE_TRACKER_BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid EXPENSE_TRACKER_BIND_ADDR: {}", bind_addr_raw))?;

        let auth = lookup("EXPENSE_TRACKER_SESSION_COOKIE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|session_cookie| AuthConfig { session_cookie });

        Ok(Self {
            database_url: get("EXPENSE_TRACKER_DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr,
            base_url: get("EXPENSE_TRACKER_BASE_URL", DEFAULT_BASE_URL),
            static_dir: PathBuf::from(get("EXPENSE_TRACKER_STATIC_DIR", DEFAULT_STATIC_DIR)),
            rate_api_url: get("EXPENSE_TRACKER_RATE_API_URL", DEFAULT_RATE_API_URL),
            auth,
        })
    }
}
