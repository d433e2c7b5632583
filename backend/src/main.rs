use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use expense_tracker_backend::config::AppConfig;
use expense_tracker_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    if config.auth.is_none() {
        warn!("EXPENSE_TRACKER_SESSION_COOKIE is not set; route guard disabled and every RPC will be rejected");
    }

    let state = initialize_backend(&config).await?;
    let app = create_router(state, &config)?;

    info!("Serving dashboard from {}", config.static_dir.display());
    info!("Starting server on {}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
