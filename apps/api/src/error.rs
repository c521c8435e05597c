//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Prequote                               │
//! │                                                                         │
//! │  Handler  Result<T, ApiError>                                          │
//! │     │                                                                   │
//! │     ├── CoreError::Validation ──────────► 400 VALIDATION_ERROR         │
//! │     ├── CoreError::InvalidImage ────────► 400 VALIDATION_ERROR         │
//! │     ├── CoreError::PriceOutOfRange ─────► 400 VALIDATION_ERROR         │
//! │     ├── CoreError::Linkage ─────────────► 422 LINKAGE_ERROR            │
//! │     ├── CoreError::*NotFound ───────────► 404 NOT_FOUND                │
//! │     ├── DbError (+ request language) ───► localized message            │
//! │     │      NotFound ──► 404   Rejected ──► as CoreError                │
//! │     │      anything else ──► 500 DATABASE_ERROR, details logged        │
//! │     └── PdfError ───────────────────────► 500 EXPORT_ERROR             │
//! │                                                                         │
//! │  Body: { "code": "NOT_FOUND", "message": "Registo não encontrado." }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence failures never carry SQL or driver text to the client; the
//! message comes from the language pack of the request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use prequote_core::i18n::pack;
use prequote_core::{CoreError, Language};
use prequote_db::DbError;
use prequote_pdf::PdfError;
use serde::{Deserialize, Serialize};

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Validation error: quantities[0] must be positive"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// MOQ pairing is inconsistent or a derived field was edited (422)
    LinkageError,

    /// Database operation failed (500)
    DatabaseError,

    /// PDF could not be produced (500)
    ExportError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::LinkageError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError | ErrorCode::ExportError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// What the failed persistence call was doing; picks the localized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Save,
    Delete,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error in the request language.
    pub fn not_found(language: Language) -> Self {
        ApiError::new(ErrorCode::NotFound, pack(language).not_found)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Converts a persistence failure into a localized error.
    ///
    /// ## Arguments
    /// * `err` - The database error
    /// * `language` - Language of the request
    /// * `action` - What was being attempted
    pub fn persistence(err: DbError, language: Language, action: Action) -> Self {
        let texts = pack(language);
        match err {
            DbError::NotFound { .. } => ApiError::not_found(language),
            DbError::Rejected(core) => ApiError::from(core),
            DbError::ForeignKeyViolation { .. } | DbError::UniqueViolation { .. } => {
                tracing::warn!(error = %err, ?action, "Write conflicts with stored data");
                ApiError::new(ErrorCode::ValidationError, texts.save_failed)
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, ?action, "Persistence operation failed");
                let message = match action {
                    Action::Load => texts.load_failed,
                    Action::Save => texts.save_failed,
                    Action::Delete => texts.delete_failed,
                };
                ApiError::new(ErrorCode::DatabaseError, message)
            }
        }
    }
}

/// Attaches the request language and action to database results.
pub trait DbResultExt<T> {
    fn localized(self, language: Language, action: Action) -> ApiResult<T>;
}

impl<T> DbResultExt<T> for Result<T, DbError> {
    fn localized(self, language: Language, action: Action) -> ApiResult<T> {
        self.map_err(|e| ApiError::persistence(e, language, action))
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ComponentNotFound(_) | CoreError::DevelopmentNotFound(_) => {
                ApiError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::Linkage(_) | CoreError::MoqFieldReadOnly { .. } => {
                ApiError::new(ErrorCode::LinkageError, err.to_string())
            }
            CoreError::InvalidImage { .. }
            | CoreError::PriceOutOfRange { .. }
            | CoreError::Validation(_) => {
                ApiError::validation(err.to_string())
            }
        }
    }
}

/// Converts PDF errors to API errors.
impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        tracing::error!(error = %err, "PDF rendering failed");
        ApiError::new(ErrorCode::ExportError, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
