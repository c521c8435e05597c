//! # HTTP Handlers
//!
//! One module per resource. Handlers stay thin: decode the request, call
//! into prequote-core / prequote-db, map errors.
//!
//! ## Module Organization
//! ```text
//! handlers/
//! ├── health.rs       ← GET /health
//! ├── clients.rs      ← /api/clients CRUD
//! ├── quotations.rs   ← /api/quotations CRUD (reconcile, then save)
//! ├── line_items.rs   ← one Line-Item Store command, then save
//! ├── pricing.rs      ← saved and draft price breakdowns
//! ├── export.rs       ← PDF download
//! └── events.rs       ← change feed as server-sent events
//! ```

pub mod clients;
pub mod events;
pub mod export;
pub mod health;
pub mod line_items;
pub mod pricing;
pub mod quotations;

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use chrono::{NaiveDate, Utc};
use prequote_core::Language;

/// Language for user-facing error messages, from `Accept-Language`.
///
/// The first supported tag wins; anything else falls back to Portuguese.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestLanguage(pub Language);

impl RequestLanguage {
    /// Picks the first supported language of an `Accept-Language` value.
    pub fn parse(header: &str) -> Self {
        header
            .split(',')
            .filter_map(|tag| tag.split(';').next())
            .find_map(|tag| tag.parse::<Language>().ok())
            .map(RequestLanguage)
            .unwrap_or_default()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestLanguage {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(RequestLanguage::parse)
            .unwrap_or_default())
    }
}

/// Date used for new codes and export footers.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_language() {
        assert_eq!(RequestLanguage::parse("en-GB,en;q=0.9").0, Language::En);
        assert_eq!(RequestLanguage::parse("de-DE, fr;q=0.8").0, Language::Fr);
        assert_eq!(RequestLanguage::parse("de-DE").0, Language::Pt);
        assert_eq!(RequestLanguage::parse("").0, Language::Pt);
    }
}
