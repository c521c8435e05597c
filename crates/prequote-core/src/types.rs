//! # Domain Types
//!
//! Core domain types used throughout Prequote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────────────────────┐   │
//! │  │     Client      │        │             Quotation                │   │
//! │  │  ─────────────  │  copy  │  ──────────────────────────────────  │   │
//! │  │  id (UUID)      │───────►│  code  PC2503003 / reference         │   │
//! │  │  name           │        │  client: ClientDetails (by value)    │   │
//! │  │  brand, refs    │        │  items: LineItems                    │   │
//! │  └─────────────────┘        │   ├── components:   Vec<Component>   │   │
//! │                             │   └── developments: Vec<Development> │   │
//! │                             │  quantities [3] ◄─ index-paired ─►   │   │
//! │                             │  margins    [3]                      │   │
//! │                             │  language  pt | en | fr | es         │   │
//! │                             └──────────────────────────────────────┘   │
//! │                                                                         │
//! │  Component ◄── moq_development_id / source_component_id ──► Development │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has a UUID v4 `id`. Quotations additionally carry the
//! human-readable `code` and `reference` assigned by the persistence layer.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::line_items::LineItems;
use crate::validation::{
    lenient_count, lenient_decimal, lenient_margins, lenient_quantities, ValidationResult,
};
use crate::{DEFAULT_MARGINS, DEFAULT_QUANTITIES, MOQ_PREFIX, TIER_COUNT};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Client
// =============================================================================

/// A customer the company quotes for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. The only required field.
    pub name: String,

    pub brand: Option<String>,
    pub email: Option<String>,

    /// Our internal reference for this client.
    pub our_ref: Option<String>,

    /// The client's own reference for us.
    pub client_ref: Option<String>,

    pub description: Option<String>,

    /// Sample size agreed with the client (free text, e.g. "M").
    pub sample_size: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Editable client fields (create and full-record update).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientInput {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub our_ref: Option<String>,
    #[serde(default)]
    pub client_ref: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sample_size: Option<String>,
}

/// Client data frozen onto a quotation.
///
/// ## Snapshot Pattern
/// A quotation keeps the client details it was printed with, even if the
/// client record is edited or deleted later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientDetails {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub our_ref: Option<String>,
    #[serde(default)]
    pub client_ref: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sample_size: Option<String>,
}

impl From<&Client> for ClientDetails {
    fn from(c: &Client) -> Self {
        ClientDetails {
            name: c.name.clone(),
            brand: c.brand.clone(),
            email: c.email.clone(),
            our_ref: c.our_ref.clone(),
            client_ref: c.client_ref.clone(),
            description: c.description.clone(),
            sample_size: c.sample_size.clone(),
        }
    }
}

// =============================================================================
// Component
// =============================================================================

/// A material line item.
///
/// `unit_price` and `consumption` are normalized on input: anything
/// non-numeric, negative or above `MAX_INPUT_VALUE` becomes 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Component {
    #[serde(default = "new_id")]
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub supplier: String,

    /// Price per consumption unit.
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "string")]
    pub unit_price: Decimal,

    /// Units consumed per produced piece.
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "string")]
    pub consumption: Decimal,

    /// Whether a minimum order quantity clause applies.
    #[serde(default)]
    pub has_moq: bool,

    /// The generated MOQ development, while `has_moq` is set.
    #[serde(default)]
    pub moq_development_id: Option<String>,

    /// Deprecated; superseded by the paired development. Never priced.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub moq_quantity: Option<Decimal>,

    /// Deprecated; superseded by the paired development. Never priced.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub moq_cost: Option<Decimal>,
}

impl Component {
    /// Creates a component without MOQ.
    pub fn new(
        description: impl Into<String>,
        supplier: impl Into<String>,
        unit_price: Decimal,
        consumption: Decimal,
    ) -> Self {
        Component {
            id: new_id(),
            description: description.into(),
            supplier: supplier.into(),
            unit_price: unit_price.max(Decimal::ZERO),
            consumption: consumption.max(Decimal::ZERO),
            has_moq: false,
            moq_development_id: None,
            moq_quantity: None,
            moq_cost: None,
        }
    }
}

// =============================================================================
// Development
// =============================================================================

/// An extra, non-material cost line (tooling, setup, MOQ amortization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Development {
    #[serde(default = "new_id")]
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "string")]
    pub cost: Decimal,

    #[serde(default)]
    pub supplier: Option<String>,

    /// Generated by the MOQ rule from a component.
    #[serde(default)]
    pub is_from_moq: bool,

    /// The component this MOQ development belongs to.
    #[serde(default)]
    pub source_component_id: Option<String>,

    /// Units the MOQ cost is spread over. 0 means unset.
    #[serde(default, deserialize_with = "lenient_count")]
    pub moq_quantity: u32,

    /// Fold the amortized cost into the per-unit subtotal.
    #[serde(default)]
    pub include_in_subtotal: bool,

    /// List this line in the exported document.
    #[serde(default = "default_show_in_pdf")]
    pub show_in_pdf: bool,
}

fn default_show_in_pdf() -> bool {
    true
}

impl Development {
    /// Creates a manual (non-MOQ) development.
    ///
    /// Defaults: not folded into the subtotal, visible in the export.
    pub fn new(description: impl Into<String>, cost: Decimal) -> Self {
        Development {
            id: new_id(),
            description: description.into(),
            cost: cost.max(Decimal::ZERO),
            supplier: None,
            is_from_moq: false,
            source_component_id: None,
            moq_quantity: 0,
            include_in_subtotal: false,
            show_in_pdf: true,
        }
    }

    /// Creates the MOQ development generated when `component` turns MOQ on.
    pub fn moq_for(component: &Component) -> Self {
        Development {
            id: new_id(),
            description: moq_description(&component.description),
            cost: Decimal::ZERO,
            supplier: Some(component.supplier.clone()),
            is_from_moq: true,
            source_component_id: Some(component.id.clone()),
            moq_quantity: 0,
            include_in_subtotal: false,
            show_in_pdf: true,
        }
    }

    /// Whether the amortized MOQ cost enters the per-unit subtotal.
    #[inline]
    pub fn is_amortized(&self) -> bool {
        self.is_from_moq && self.include_in_subtotal
    }
}

/// Display description of the MOQ development for a component.
///
/// ## Example
/// ```rust
/// use prequote_core::types::moq_description;
///
/// assert_eq!(moq_description("Zipper"), "MOQ - Zipper");
/// ```
pub fn moq_description(component_description: &str) -> String {
    format!("{}{}", MOQ_PREFIX, component_description)
}

// =============================================================================
// Quantity
// =============================================================================

/// A strictly positive production quantity.
///
/// Every price that divides by a quantity takes this type, so a zero tier
/// is rejected when it is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// ## Returns
    /// * `Ok(Quantity)` - `value` is at least 1
    /// * `Err(ValidationError::MustBePositive)` - `value` is 0
    pub fn new(value: u32) -> ValidationResult<Self> {
        NonZeroU32::new(value)
            .map(Quantity)
            .ok_or_else(|| ValidationError::MustBePositive {
                field: "quantity".to_string(),
            })
    }

    #[inline]
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0.get())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Language
// =============================================================================

/// Output language of an exported quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
    Fr,
    Es,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::Pt, Language::En, Language::Fr, Language::Es];

    /// Two-letter code as stored.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    /// Accepts a bare code or a locale tag (`pt-PT`, `en_GB`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == primary)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "language".to_string(),
                allowed: Language::ALL.iter().map(|l| l.code().to_string()).collect(),
            })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Quotation
// =============================================================================

/// A saved pre-quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quotation {
    pub id: String,

    /// `PC` + yy + mm + 3-digit sequence, e.g. `PC2503003`.
    pub code: String,

    /// yy + mm + dd + 3-digit sequence, e.g. `250314003`.
    pub reference: String,

    /// Issue date printed on the document.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Client record this was created from, if it still exists.
    pub client_id: Option<String>,

    pub client: ClientDetails,

    /// Article picture as a data URL or bare base64.
    pub article_image: Option<String>,

    #[serde(flatten)]
    pub items: LineItems,

    pub quantities: [u32; TIER_COUNT],

    #[ts(type = "[string, string, string]")]
    pub margins: [Decimal; TIER_COUNT],

    pub language: Language,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Editable quotation fields (create and full-record update).
///
/// Numeric fields are normalized while deserializing; omitted tiers start
/// from the default quantities and margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationInput {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client: ClientDetails,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub article_image: Option<String>,

    #[serde(flatten)]
    pub items: LineItems,

    #[serde(default = "default_quantities", deserialize_with = "lenient_quantities")]
    pub quantities: [u32; TIER_COUNT],

    #[serde(default = "default_margins", deserialize_with = "lenient_margins")]
    #[ts(type = "[string, string, string]")]
    pub margins: [Decimal; TIER_COUNT],

    #[serde(default)]
    pub language: Language,
}

fn default_quantities() -> [u32; TIER_COUNT] {
    DEFAULT_QUANTITIES
}

fn default_margins() -> [Decimal; TIER_COUNT] {
    DEFAULT_MARGINS.map(Decimal::from)
}

impl Default for QuotationInput {
    fn default() -> Self {
        QuotationInput {
            client_id: None,
            client: ClientDetails::default(),
            date: None,
            article_image: None,
            items: LineItems::default(),
            quantities: default_quantities(),
            margins: default_margins(),
            language: Language::default(),
        }
    }
}

impl From<&Quotation> for QuotationInput {
    fn from(q: &Quotation) -> Self {
        QuotationInput {
            client_id: q.client_id.clone(),
            client: q.client.clone(),
            date: Some(q.date),
            article_image: q.article_image.clone(),
            items: q.items.clone(),
            quantities: q.quantities,
            margins: q.margins,
            language: q.language,
        }
    }
}

/// The three (quantity, margin) tiers of a quotation, index-paired.
///
/// ## Returns
/// * `Err(ValidationError::MustBePositive)` - some quantity is 0
pub fn tiers(
    quantities: &[u32; TIER_COUNT],
    margins: &[Decimal; TIER_COUNT],
) -> ValidationResult<[(Quantity, Decimal); TIER_COUNT]> {
    let mut out = [(Quantity(NonZeroU32::MIN), Decimal::ZERO); TIER_COUNT];
    for (i, slot) in out.iter_mut().enumerate() {
        let quantity =
            Quantity::new(quantities[i]).map_err(|_| ValidationError::MustBePositive {
                field: format!("quantities[{}]", i),
            })?;
        *slot = (quantity, margins[i]);
    }
    Ok(out)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_rejects_zero() {
        assert!(Quantity::new(0).is_err());
        assert_eq!(Quantity::new(250).unwrap().get(), 250);
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("pt".parse::<Language>().unwrap(), Language::Pt);
        assert_eq!("en-GB".parse::<Language>().unwrap(), Language::En);
        assert_eq!("FR".parse::<Language>().unwrap(), Language::Fr);
        assert!("de".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Pt);
    }

    #[test]
    fn test_new_development_defaults() {
        let dev = Development::new("Mould", Decimal::from(150));
        assert!(!dev.is_from_moq);
        assert!(!dev.include_in_subtotal);
        assert!(dev.show_in_pdf);
        assert_eq!(dev.moq_quantity, 0);
    }

    #[test]
    fn test_development_json_defaults_match_constructor() {
        let dev: Development =
            serde_json::from_str(r#"{"description":"Mould","cost":"150"}"#).unwrap();
        assert!(!dev.include_in_subtotal);
        assert!(dev.show_in_pdf);
        assert!(!dev.id.is_empty());
    }

    #[test]
    fn test_component_input_is_normalized() {
        let c: Component = serde_json::from_str(
            r#"{"description":"Thread","supplier":"Coats","unit_price":"abc","consumption":-3}"#,
        )
        .unwrap();
        assert_eq!(c.unit_price, Decimal::ZERO);
        assert_eq!(c.consumption, Decimal::ZERO);
    }

    #[test]
    fn test_quotation_input_defaults_tiers() {
        let input: QuotationInput = serde_json::from_str(r#"{"client":{"name":"Acme"}}"#).unwrap();
        assert_eq!(input.quantities, [100, 250, 500]);
        assert_eq!(input.margins, [30, 25, 20].map(Decimal::from));
        assert_eq!(input.language, Language::Pt);
        assert!(input.items.components.is_empty());
    }

    #[test]
    fn test_tiers_reports_zero_index() {
        let err = tiers(&[100, 0, 500], &[Decimal::ZERO; 3]).unwrap_err();
        assert_eq!(err.to_string(), "quantities[1] must be positive");
    }
}
