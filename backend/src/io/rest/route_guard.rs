//! Per-request access control in front of every route.
//!
//! The decision itself is the pure [`decide`]; [`route_guard`] wires it into
//! axum, resolves the session and stores it in the request extensions.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

use super::error::ApiError;
use crate::config::AuthConfig;
use crate::domain::SessionService;

pub const PROTECTED_PAGE_PREFIXES: &[&str] = &["/dashboard", "/expenses", "/reports", "/settings", "/profile"];
pub const PROTECTED_API_PREFIX: &str = "/api/trpc";
pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/dashboard";

const STATIC_PREFIXES: &[&str] = &["/assets/", "/static/", "/_next/"];
const STATIC_EXTENSIONS: &[&str] = &[
    ".js", ".css", ".map", ".ico", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".woff", ".woff2", ".txt",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    PassThrough,
    Redirect(String),
    Unauthorized,
}

pub fn is_static_asset(path: &str) -> bool {
    path == "/favicon.ico"
        || STATIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn login_redirect(path: &str) -> String {
    format!("{}?redirectTo={}", LOGIN_PATH, urlencoding::encode(path))
}

pub fn decide(path: &str, has_session: bool) -> GuardDecision {
    if is_static_asset(path) {
        return GuardDecision::PassThrough;
    }

    if path == "/" {
        let target = if has_session { HOME_PATH } else { LOGIN_PATH };
        return GuardDecision::Redirect(target.to_string());
    }

    if has_session {
        if path == LOGIN_PATH {
            return GuardDecision::Redirect(HOME_PATH.to_string());
        }
        return GuardDecision::PassThrough;
    }

    if PROTECTED_PAGE_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return GuardDecision::Redirect(login_redirect(path));
    }
    if path.starts_with(PROTECTED_API_PREFIX) {
        return GuardDecision::Unauthorized;
    }
    GuardDecision::PassThrough
}

/// Session token from the configured cookie, else from a bearer token
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
    })
}

#[derive(Clone)]
pub struct GuardState {
    pub auth: Option<AuthConfig>,
    pub sessions: SessionService,
}

pub async fn route_guard(State(guard): State<GuardState>, mut request: Request, next: Next) -> Response {
    let Some(auth) = guard.auth.as_ref() else {
        return next.run(request).await;
    };

    let path = request.uri().path().to_string();
    if is_static_asset(&path) {
        return next.run(request).await;
    }

    let session = match session_token(request.headers(), &auth.session_cookie) {
        Some(token) => match guard.sessions.resolve(&token).await {
            Ok(session) => session,
            Err(e) => {
                // Fail open: an auth-check error never blocks the user
                error!("Session lookup for {} failed, passing request through: {}", path, e);
                return next.run(request).await;
            }
        },
        None => None,
    };

    match decide(&path, session.is_some()) {
        GuardDecision::PassThrough => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        GuardDecision::Redirect(target) => Redirect::temporary(&target).into_response(),
        GuardDecision::Unauthorized => ApiError::Unauthorized.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_root_redirects_by_session() {
        assert_eq!(decide("/", true), GuardDecision::Redirect("/dashboard".to_string()));
        assert_eq!(decide("/", false), GuardDecision::Redirect("/login".to_string()));
    }

    #[test]
    fn test_protected_pages_redirect_to_login_with_return_path() {
        assert_eq!(
            decide("/dashboard", false),
            GuardDecision::Redirect("/login?redirectTo=%2Fdashboard".to_string())
        );
        assert_eq!(
            decide("/settings/profile", false),
            GuardDecision::Redirect("/login?redirectTo=%2Fsettings%2Fprofile".to_string())
        );
        assert_eq!(decide("/reports", true), GuardDecision::PassThrough);
    }

    #[test]
    fn test_protected_api_is_unauthorized_without_session() {
        assert_eq!(decide("/api/trpc/expense.getAllExpenses", false), GuardDecision::Unauthorized);
        assert_eq!(decide("/api/trpc", false), GuardDecision::Unauthorized);
        assert_eq!(decide("/api/trpc/expense.getAllExpenses", true), GuardDecision::PassThrough);
    }

    #[test]
    fn test_login_page() {
        assert_eq!(decide("/login", true), GuardDecision::Redirect("/dashboard".to_string()));
        assert_eq!(decide("/login", false), GuardDecision::PassThrough);
    }

    #[test]
    fn test_other_paths_and_assets_pass_through() {
        assert_eq!(decide("/health", false), GuardDecision::PassThrough);
        assert_eq!(decide("/assets/app.js", false), GuardDecision::PassThrough);
        assert_eq!(decide("/dashboard/chart.png", false), GuardDecision::PassThrough);
        assert!(is_static_asset("/favicon.ico"));
        assert!(!is_static_asset("/expenses"));
    }

    #[test]
    fn test_protected_prefixes_match_without_segment_boundary() {
        assert_eq!(
            decide("/dashboards-archive", false),
            GuardDecision::Redirect("/login?redirectTo=%2Fdashboards-archive".to_string())
        );
        assert_eq!(
            decide("/expenses2024", false),
            GuardDecision::Redirect("/login?redirectTo=%2Fexpenses2024".to_string())
        );
        assert_eq!(decide("/api/trpcx", false), GuardDecision::Unauthorized);
        assert_eq!(decide("/dashboards-archive", true), GuardDecision::PassThrough);
    }

    #[test]
    fn test_session_token_sources() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; et-session=abc123"));
        assert_eq!(session_token(&headers, "et-session"), Some("abc123".to_string()));
        assert_eq!(session_token(&headers, "other"), None);

        let mut bearer = HeaderMap::new();
        bearer.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok-9"));
        assert_eq!(session_token(&bearer, "et-session"), Some("tok-9".to_string()));
    }
}
