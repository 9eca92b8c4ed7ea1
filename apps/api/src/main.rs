//! # Stockroom API
//!
//! HTTP server for the inventory backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom API Server                             │
//! │                                                                         │
//! │  Client ───► HTTP (8000) ───► require_auth ───► Handlers ───► SQLite   │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                                           InventoryWorkflow             │
//! │                                        (stock + ledger/sale/return)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use stockroom_api::{build_router, AppState, ServerConfig};
use stockroom_db::Database;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stockroom=info,tower_http=info")),
        )
        .with_target(true)
        .init();

    info!("Starting Stockroom API server...");

    // Load configuration
    let config = ServerConfig::load().context("Failed to load configuration")?;
    let addr = config.socket_addr()?;
    if config.uses_dev_secret() {
        warn!("STOCKROOM_JWT_SECRET is not set; using the development secret");
    }
    info!(
        %addr,
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    // Open database (runs migrations)
    let db = Database::new(config.db_config())
        .await
        .context("Failed to open database")?;

    // Create shared state
    let state = Arc::new(AppState::new(db.clone(), config));
    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
