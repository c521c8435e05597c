//! # Prequote API Server
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  init_tracing()                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppConfig::load()  ← defaults, PREQUOTE_CONFIG file, PREQUOTE_* env    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new()    ← creates the file, runs migrations                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppState::new()    ← loads the catalog, starts refresh listeners       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  axum::serve(..).with_graceful_shutdown(Ctrl-C / SIGTERM)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use prequote_api::config::AppConfig;
use prequote_api::state::AppState;
use prequote_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prequote_api::init_tracing();

    info!("Starting Prequote API server...");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    info!(
        db = %db_path.display(),
        port = config.port,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&db_path)
            .max_connections(config.db_max_connections)
            .change_feed_capacity(config.change_feed_capacity),
    )
    .await
    .context("Failed to open database")?;

    let state = AppState::new(db.clone(), config.export_settings(), config.max_body_bytes).await?;

    let addr = config.bind_address()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, prequote_api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
