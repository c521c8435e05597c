//! # Pricing Handlers
//!
//! Price breakdowns with every amount rounded to cents. The same engine
//! feeds the export, so the figures here match the PDF.

use axum::extract::{Path, State};
use axum::Json;
use prequote_core::pricing::{price_line_items, price_quotation, PriceBreakdown};
use prequote_core::QuotationInput;
use tracing::instrument;

use super::quotations::load;
use super::RequestLanguage;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/quotations/{id}/pricing`
#[instrument(skip(state))]
pub async fn saved(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<String>,
) -> ApiResult<Json<PriceBreakdown>> {
    let quotation = load(&state, &id, lang).await?;
    Ok(Json(price_quotation(&quotation)?.rounded()))
}

/// `POST /api/pricing`
///
/// Prices an unsaved draft. A zero quantity tier is a validation error.
#[instrument(skip(input))]
pub async fn draft(Json(input): Json<QuotationInput>) -> ApiResult<Json<PriceBreakdown>> {
    let breakdown = price_line_items(&input.items, &input.quantities, &input.margins)?;
    Ok(Json(breakdown.rounded()))
}
