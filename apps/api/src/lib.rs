//! # Prequote API
//!
//! HTTP/JSON surface over the pre-quotation workspace.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET     /health                                                        │
//! │  GET     /api/clients                 POST  /api/clients                │
//! │  GET|PUT|DELETE /api/clients/{id}                                       │
//! │  GET     /api/quotations              POST  /api/quotations             │
//! │  GET|PUT|DELETE /api/quotations/{id}                                    │
//! │  POST    /api/quotations/{id}/line-items                                │
//! │  GET     /api/quotations/{id}/pricing POST  /api/pricing                │
//! │  GET     /api/quotations/{id}/export?lang=xx                            │
//! │  GET     /api/events                  (server-sent events)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::handlers::{clients, events, export, health, line_items, pricing, quotations};
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/clients", get(clients::list).post(clients::create))
        .route(
            "/api/clients/{id}",
            get(clients::get).put(clients::update).delete(clients::delete),
        )
        .route("/api/quotations", get(quotations::list).post(quotations::create))
        .route(
            "/api/quotations/{id}",
            get(quotations::get)
                .put(quotations::update)
                .delete(quotations::delete),
        )
        .route("/api/quotations/{id}/line-items", post(line_items::apply))
        .route("/api/quotations/{id}/pricing", get(pricing::saved))
        .route("/api/quotations/{id}/export", get(export::export))
        .route("/api/pricing", post(pricing::draft))
        .route("/api/events", get(events::events))
        .layer(DefaultBodyLimit::max(state.body_limit))
        .with_state(state)
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,prequote=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

// =============================================================================
// Router Tests
// =============================================================================
