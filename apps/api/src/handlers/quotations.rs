//! # Quotation Handlers
//!
//! ```text
//! GET    /api/quotations        → catalog snapshot, newest first
//! POST   /api/quotations        → reconcile MOQ pairs, create, 201
//! GET    /api/quotations/{id}   → fresh read
//! PUT    /api/quotations/{id}   → reconcile MOQ pairs, full-record upsert
//! DELETE /api/quotations/{id}   → 204, line items go with it
//! ```
//!
//! ## Save Flow
//! ```text
//! QuotationInput (JSON, numbers already normalized)
//!      │
//!      ▼
//! items.reconcile()  ← legacy payloads paired, orphans dropped
//!      │
//!      ▼
//! repository create/update  ← validates, writes in one transaction
//!      │
//!      ├── Err → localized message, nothing stored
//!      └── Ok  → change event → catalog re-fetch
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use prequote_core::{Language, Quotation, QuotationInput};
use tracing::{info, instrument};

use super::{today, RequestLanguage};
use crate::error::{Action, ApiError, ApiResult, DbResultExt};
use crate::state::AppState;

/// `GET /api/quotations`
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<Quotation>> {
    Json(state.catalog.quotations().to_vec())
}

/// `POST /api/quotations`
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Json(mut input): Json<QuotationInput>,
) -> ApiResult<(StatusCode, Json<Quotation>)> {
    reconcile(&mut input);

    let quotation = state
        .db
        .quotations()
        .create(&input, today())
        .await
        .localized(lang, Action::Save)?;

    info!(id = %quotation.id, code = %quotation.code, "Quotation created");
    Ok((StatusCode::CREATED, Json(quotation)))
}

/// `GET /api/quotations/{id}`
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
) -> ApiResult<Json<Quotation>> {
    load(&state, &id, lang).await.map(Json)
}

/// `PUT /api/quotations/{id}`
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
    Json(mut input): Json<QuotationInput>,
) -> ApiResult<Json<Quotation>> {
    reconcile(&mut input);

    let id = state
        .db
        .quotations()
        .upsert(Some(&id), &input, today())
        .await
        .localized(lang, Action::Save)?;

    load(&state, &id, lang).await.map(Json)
}

/// `DELETE /api/quotations/{id}`
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .db
        .quotations()
        .delete(&id)
        .await
        .localized(lang, Action::Delete)?;

    info!(id = %id, "Quotation deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Reads a stored quotation or fails with a localized 404.
pub(crate) async fn load(state: &AppState, id: &str, lang: Language) -> ApiResult<Quotation> {
    state
        .db
        .quotations()
        .get(id)
        .await
        .localized(lang, Action::Load)?
        .ok_or_else(|| ApiError::not_found(lang))
}

/// Repairs the MOQ pairing of an incoming record before it is validated.
fn reconcile(input: &mut QuotationInput) {
    let repaired = input.items.reconcile();
    if !repaired.is_empty() {
        info!(
            repaired = repaired.len(),
            issues = ?repaired,
            "Repaired MOQ linkage before save"
        );
    }
}
