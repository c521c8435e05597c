//! # prequote-core: Pure Quotation Logic for Prequote
//!
//! This crate holds everything that turns a quotation's line items into
//! numbers and a printable document. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Prequote Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api)                          │   │
//! │  │   clients, quotations, line-item commands, pricing, export      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ prequote-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │line_items │  │  export   │  │   │
//! │  │   │ Quotation │  │ subtotal  │  │ MOQ link  │  │  layout   │  │   │
//! │  │   │ Component │  │ margins   │  │ cascades  │  │  i18n     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                  │                                │                     │
//! │  ┌───────────────▼──────────────┐  ┌──────────────▼──────────────┐     │
//! │  │  prequote-db (SQLite)        │  │  prequote-pdf (printpdf)    │     │
//! │  └──────────────────────────────┘  └─────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Component, Development, Quotation)
//! - [`money`] - Decimal money with display rounding
//! - [`pricing`] - Subtotals, MOQ amortization and margin-adjusted prices
//! - [`line_items`] - Line-item store enforcing the MOQ linkage rule
//! - [`codes`] - Quotation code and reference formatting
//! - [`i18n`] - Language packs for exported documents
//! - [`export`] - Document layout projection
//! - [`validation`] - Input normalization and validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use prequote_core::pricing::{line_total, unit_price_with_margin};
//! use prequote_core::{Component, Quantity};
//! use rust_decimal::Decimal;
//!
//! let zipper = Component::new("Zipper", "YKK", Decimal::new(25, 1), Decimal::from(4));
//! assert_eq!(line_total(&zipper), Decimal::from(10));
//!
//! let price = unit_price_with_margin(
//!     &[zipper],
//!     &[],
//!     Quantity::new(100).unwrap(),
//!     Decimal::from(30),
//! );
//! assert_eq!(price, Decimal::from(13));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codes;
pub mod error;
pub mod export;
pub mod i18n;
pub mod line_items;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, LinkageIssue, ValidationError};
pub use line_items::LineItems;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of quantity/margin tiers on every quotation.
pub const TIER_COUNT: usize = 3;

/// Quantities a new quotation starts from.
pub const DEFAULT_QUANTITIES: [u32; TIER_COUNT] = [100, 250, 500];

/// Margins (percent) a new quotation starts from, index-paired with
/// [`DEFAULT_QUANTITIES`].
pub const DEFAULT_MARGINS: [i64; TIER_COUNT] = [30, 25, 20];

/// Prefix of every system-generated MOQ development description.
pub const MOQ_PREFIX: &str = "MOQ - ";
