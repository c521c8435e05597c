//! # Error Types
//!
//! Domain-specific error types for prequote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  prequote-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── LinkageIssue     - One MOQ pairing defect (detection output)      │
//! │                                                                         │
//! │  prequote-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (apps/api)                                                │
//! │  └── ApiError         - What the client sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Component id is not part of the line items.
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// Development id is not part of the line items.
    #[error("Development not found: {0}")]
    DevelopmentNotFound(String),

    /// The line items break the MOQ pairing rule.
    ///
    /// ## When This Occurs
    /// Saving a quotation whose components and developments disagree:
    /// ```text
    /// Component "Zipper" { has_moq: true, moq_development_id: None }
    ///      │
    ///      ▼
    /// check_linkage() → [MissingMoqDevelopment]
    ///      │
    ///      ▼
    /// Linkage([..]) → save rejected, nothing written
    /// ```
    #[error("MOQ linkage is inconsistent: {}", describe_issues(.0))]
    Linkage(Vec<LinkageIssue>),

    /// Attempt to edit a field the MOQ rule owns on a generated development.
    #[error("{field} of MOQ development {id} is derived from its component")]
    MoqFieldReadOnly { id: String, field: String },

    /// A tier figure does not fit in a decimal.
    #[error("Prices at quantity {quantity} exceed the supported range")]
    PriceOutOfRange { quantity: u32 },

    /// Article image payload could not be decoded.
    #[error("Invalid article image: {reason}")]
    InvalidImage { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn describe_issues(issues: &[LinkageIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Linkage Issue
// =============================================================================

/// A single defect in the component ↔ MOQ development pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkageIssue {
    /// Component has `has_moq` set but no development is paired with it.
    #[error("component {component_id} has MOQ enabled but no MOQ development")]
    MissingMoqDevelopment { component_id: String },

    /// MOQ development whose source component is absent or not flagged.
    #[error("MOQ development {development_id} has no source component")]
    OrphanMoqDevelopment { development_id: String },

    /// Component points at a development that does not exist or does not point back.
    #[error("component {component_id} references development {development_id} which does not link back")]
    DanglingReference {
        component_id: String,
        development_id: String,
    },

    /// Component without `has_moq` still holds a pairing.
    #[error("component {component_id} has MOQ disabled but is still paired")]
    UnflaggedPair { component_id: String },

    /// Two MOQ developments claim the same component.
    #[error("component {component_id} is claimed by more than one MOQ development")]
    DuplicatePair { component_id: String },

    /// Paired development description is not "MOQ - " + component description.
    #[error("MOQ development {development_id} description is out of sync")]
    StaleDescription { development_id: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
