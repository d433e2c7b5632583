//! # Expense Tracker Backend
//!
//! Server for the personal expense dashboard. The crate is layered:
//!
//! ```text
//! IO Layer (RPC routes, route guard, exchange rate client)
//!     ↓
//! Domain Layer (services, reports, recurring income, currency)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```
//!
//! [`initialize_backend`] wires the services together and [`create_router`]
//! assembles the axum application around them.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::currency::{CurrencyConverter, InMemoryRateCache, RateFetcher, RateSource};
use crate::domain::{
    DataResetService, ExpenseService, IncomeService, PreferencesService, QuickAmountService,
    SessionService,
};
use crate::io::rest::route_guard::{route_guard, GuardState};
use crate::io::ExchangeRateClient;
use crate::storage::{
    DataResetRepository, DbConnection, ExpenseRepository, IncomeRepository, PreferencesRepository,
    QuickAmountRepository, SessionRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub expense_service: ExpenseService,
    pub income_service: IncomeService,
    pub preferences_service: PreferencesService,
    pub quick_amount_service: QuickAmountService,
    pub data_reset_service: DataResetService,
    pub session_service: SessionService,
}

/// Wire every service on top of an open database
pub fn build_state(db: DbConnection, fetcher: Arc<dyn RateFetcher>, clock: Arc<dyn Clock>) -> AppState {
    let rate_source = RateSource::new(fetcher, Arc::new(InMemoryRateCache::default()), clock.clone());
    let converter = CurrencyConverter::new(rate_source);

    let preferences_service = PreferencesService::new(PreferencesRepository::new(db.clone()));
    let expense_service = ExpenseService::new(
        ExpenseRepository::new(db.clone()),
        preferences_service.clone(),
        converter.clone(),
        clock.clone(),
    );
    let income_service = IncomeService::new(
        IncomeRepository::new(db.clone()),
        preferences_service.clone(),
        converter,
        clock.clone(),
    );
    let quick_amount_service = QuickAmountService::new(
        QuickAmountRepository::new(db.clone()),
        preferences_service.clone(),
        expense_service.clone(),
    );
    let data_reset_service = DataResetService::new(DataResetRepository::new(db.clone()));
    let session_service = SessionService::new(SessionRepository::new(db), clock);

    AppState {
        expense_service,
        income_service,
        preferences_service,
        quick_amount_service,
        data_reset_service,
        session_service,
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Using exchange rate provider {}", config.rate_api_url);
    let fetcher = ExchangeRateClient::new(config.rate_api_url.clone())?;

    info!("Setting up application state");
    Ok(build_state(db, Arc::new(fetcher), Arc::new(SystemClock)))
}

/// Create the Axum router with all routes configured
pub fn create_router(state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .base_url
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.base_url))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let guard = GuardState {
        auth: config.auth.clone(),
        sessions: state.session_service.clone(),
    };

    let dashboard = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    Ok(Router::new()
        .route("/health", get(health))
        .nest("/api/trpc", io::rest::router())
        .fallback_service(dashboard)
        .layer(middleware::from_fn_with_state(guard, route_guard))
        .layer(cors)
        .with_state(state))
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::domain::clock::FixedClock;
    use crate::domain::currency::rates::test_support::{table, StubFetcher};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use tower::ServiceExt;

    const COOKIE: &str = "et-session";
    const TOKEN: &str = "token-alice";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn test_config(auth: bool) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            base_url: "http://localhost:8080".to_string(),
            static_dir: PathBuf::from("does-not-exist"),
            rate_api_url: "http://127.0.0.1:9".to_string(),
            auth: auth.then(|| AuthConfig {
                session_cookie: COOKIE.to_string(),
            }),
        }
    }

    async fn setup_test(auth: bool) -> (Router, DbConnection) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        SessionRepository::new(db.clone())
            .store_session(TOKEN, "alice", now() + chrono::Duration::days(1))
            .await
            .unwrap();

        let fetcher = Arc::new(StubFetcher::returning(table(&[("PHP", 1.0), ("USD", 0.02)])));
        let state = build_state(db.clone(), fetcher, Arc::new(FixedClock::new(now())));
        let router = create_router(state, &test_config(auth)).unwrap();
        (router, db)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_cookie(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, format!("{}={}", COOKIE, TOKEN))
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, format!("{}={}", COOKIE, TOKEN))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_unauthenticated_dashboard_redirects_to_login() {
        let (app, _db) = setup_test(true).await;
        let response = app.oneshot(get("/dashboard")).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login?redirectTo=%2Fdashboard");
    }

    #[tokio::test]
    async fn test_unauthenticated_rpc_is_rejected() {
        let (app, _db) = setup_test(true).await;
        let response = app.oneshot(get("/api/trpc/expense.getAllExpenses")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({"error": "Unauthorized"}));
    }

    #[tokio::test]
    async fn test_authenticated_root_redirects_to_dashboard() {
        let (app, _db) = setup_test(true).await;
        let response = app.oneshot(with_cookie("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_health_is_not_guarded() {
        let (app, _db) = setup_test(true).await;
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_expense_then_list_with_bearer_token() {
        let (app, _db) = setup_test(true).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/trpc/expense.addExpense",
                r#"{"amount": 250.0, "category": "food", "description": "Lunch"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = json_body(response).await;
        assert_eq!(created["currency_code"], "PHP");
        assert!(created.get("user_id").is_none());

        let request = Request::builder()
            .uri("/api/trpc/expense.getAllExpenses")
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let listed = json_body(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let (app, _db) = setup_test(true).await;

        let malformed = app
            .clone()
            .oneshot(post_json("/api/trpc/expense.addExpense", "{not json"))
            .await
            .unwrap();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let unknown_category = app
            .clone()
            .oneshot(post_json(
                "/api/trpc/expense.addExpense",
                r#"{"amount": 5.0, "category": "gadgets"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(unknown_category.status(), StatusCode::BAD_REQUEST);

        let negative = app
            .oneshot(post_json(
                "/api/trpc/expense.addExpense",
                r#"{"amount": -5.0, "category": "food"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(negative.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(negative).await,
            json!({"error": "Amount must be a positive number"})
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_expense_is_not_found() {
        let (app, _db) = setup_test(true).await;
        let response = app
            .oneshot(post_json("/api/trpc/expense.deleteExpense", r#"{"id": "expense::missing"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({"error": "Expense not found"}));
    }

    #[tokio::test]
    async fn test_reset_with_malformed_token_is_bad_request() {
        let (app, _db) = setup_test(true).await;
        let response = app
            .oneshot(post_json(
                "/api/trpc/data.resetByTimePeriod",
                r#"{"period": "month", "token": "2024-13"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_category_report_over_query_string() {
        let (app, _db) = setup_test(true).await;
        for body in [
            r#"{"amount": 10.0, "category": "food", "date": "2024-03-01"}"#,
            r#"{"amount": 5.0, "category": "food", "date": "2024-03-02"}"#,
            r#"{"amount": 25.0, "category": "travel", "date": "2024-03-03"}"#,
        ] {
            let response = app
                .clone()
                .oneshot(post_json("/api/trpc/expense.addExpense", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(with_cookie("/api/trpc/expense.getReport?period=category"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = json_body(response).await;
        assert_eq!(report["period"], "category");
        assert_eq!(report["total"], 40.0);
        assert_eq!(report["categories"][0]["category"], "travel");
        assert_eq!(report["categories"][0]["percentage"], 62.5);
        assert_eq!(report["categories"][1]["percentage"], 37.5);
    }

    #[tokio::test]
    async fn test_unknown_procedure_is_not_found() {
        let (app, _db) = setup_test(true).await;
        let response = app.oneshot(with_cookie("/api/trpc/expense.nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_lookup_failure_fails_open() {
        let (app, db) = setup_test(true).await;
        db.pool().close().await;

        // The token can no longer be resolved; the page is served, not redirected
        let page = app.clone().oneshot(with_cookie("/dashboard")).await.unwrap();
        assert_ne!(page.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(page.headers().get(header::LOCATION).is_none());

        // Procedures still see no session
        let rpc = app
            .clone()
            .oneshot(with_cookie("/api/trpc/expense.getAllExpenses"))
            .await
            .unwrap();
        assert_eq!(rpc.status(), StatusCode::UNAUTHORIZED);

        let health = app.oneshot(with_cookie("/health")).await.unwrap();
        assert_eq!(health.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_without_auth_config_rpcs_still_need_a_session() {
        let (app, _db) = setup_test(false).await;

        let page = app.clone().oneshot(get("/dashboard")).await.unwrap();
        assert_ne!(page.status(), StatusCode::TEMPORARY_REDIRECT);

        let rpc = app.oneshot(with_cookie("/api/trpc/expense.getAllExpenses")).await.unwrap();
        assert_eq!(rpc.status(), StatusCode::UNAUTHORIZED);
    }
}
