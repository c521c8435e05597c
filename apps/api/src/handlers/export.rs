//! # Export Handler
//!
//! `GET /api/quotations/{id}/export?lang=xx` returns the quotation as a PDF.
//!
//! ```text
//! load quotation ──► project(layout) ──► render(PDF bytes) ──► attachment
//!                     prequote-core        prequote-pdf
//!                     (language, pages)    (blocking pool)
//! ```
//!
//! `lang` overrides the language stored on the quotation for this download
//! only.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use prequote_core::export::project;
use prequote_core::Language;
use serde::Deserialize;
use tracing::{info, instrument};

use super::quotations::load;
use super::{today, RequestLanguage};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub lang: Option<String>,
}

/// `GET /api/quotations/{id}/export`
#[instrument(skip(state))]
pub async fn export(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let override_language = query
        .lang
        .as_deref()
        .map(str::parse::<Language>)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let quotation = load(&state, &id, lang).await?;
    let options = state.export.options(today()).language(override_language);
    let layout = project(&quotation, &options)?;

    let export = state.export.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        prequote_pdf::render(&layout, &export.fonts).map(|bytes| (layout.file_name, bytes))
    })
    .await
    .map_err(|e| ApiError::internal(format!("Export task failed: {e}")))?;
    let (file_name, bytes) = rendered?;

    info!(id = %id, file = %file_name, bytes = bytes.len(), "Quotation exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
