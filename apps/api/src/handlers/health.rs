//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::state::AppState;

/// Health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"unavailable"`
    pub status: String,
    pub database: bool,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub version: String,
}

/// `GET /health`
///
/// 200 when the database answers and every migration is applied, 503 otherwise.
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (total, applied) = state.db.migration_status().await.unwrap_or((0, 0));
    let healthy = database && total == applied;

    let response = HealthResponse {
        status: if healthy { "ok" } else { "unavailable" }.to_string(),
        database,
        migrations_total: total,
        migrations_applied: applied,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
