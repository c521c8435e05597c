//! # Client Handlers
//!
//! ```text
//! GET    /api/clients        → catalog snapshot, ordered by name
//! POST   /api/clients        → 201 + stored client
//! GET    /api/clients/{id}   → fresh read
//! PUT    /api/clients/{id}   → full-record upsert (creates with this id if absent)
//! DELETE /api/clients/{id}   → 204; quotations keep their client snapshot
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use prequote_core::{Client, ClientInput};
use tracing::{info, instrument};

use super::RequestLanguage;
use crate::error::{Action, ApiError, ApiResult, DbResultExt};
use crate::state::AppState;

/// `GET /api/clients`
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<Client>> {
    Json(state.catalog.clients().to_vec())
}

/// `POST /api/clients`
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Json(input): Json<ClientInput>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = state
        .db
        .clients()
        .create(&input)
        .await
        .localized(lang, Action::Save)?;

    info!(id = %client.id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// `GET /api/clients/{id}`
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    state
        .db
        .clients()
        .get(&id)
        .await
        .localized(lang, Action::Load)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(lang))
}

/// `PUT /api/clients/{id}`
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
    Json(input): Json<ClientInput>,
) -> ApiResult<Json<Client>> {
    let clients = state.db.clients();
    let id = clients
        .upsert(Some(&id), &input)
        .await
        .localized(lang, Action::Save)?;

    clients
        .get(&id)
        .await
        .localized(lang, Action::Load)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(lang))
}

/// `DELETE /api/clients/{id}`
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .db
        .clients()
        .delete(&id)
        .await
        .localized(lang, Action::Delete)?;

    info!(id = %id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
