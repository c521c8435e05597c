//! # Pricing Engine
//!
//! Pure functions turning line items, quantities and margins into prices.
//!
//! ## Computation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Price of one quantity tier q                         │
//! │                                                                         │
//! │  Σ unit_price × consumption            (materials, per piece)           │
//! │        +                                                                │
//! │  Σ cost × moq_quantity / q             (MOQ developments with          │
//! │                                          include_in_subtotal)           │
//! │        =                                                                │
//! │  subtotal(q) ─────────► × q ─────────► quantity_total(q)                │
//! │        │                                                                │
//! │        └──► × (1 + margin/100) ─────► unit_price_with_margin(q, m)      │
//! │                                                                         │
//! │  Every other development is reported once as development_flat_total.   │
//! │  Nothing is rounded here; Money rounds when displayed.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Division only ever happens by a [`Quantity`], which cannot be zero.
//! [`price_line_items`] evaluates the same rules with checked arithmetic and
//! reports a tier that leaves the decimal range as
//! [`CoreError::PriceOutOfRange`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::line_items::LineItems;
use crate::money::Money;
use crate::types::{tiers, Component, Development, Quantity, Quotation};
use crate::TIER_COUNT;

// =============================================================================
// Primitive Rules
// =============================================================================

/// `unit_price × consumption`, unrounded.
#[inline]
pub fn line_total(component: &Component) -> Decimal {
    component.unit_price * component.consumption
}

/// Sum of all line totals.
pub fn materials_total(components: &[Component]) -> Decimal {
    components.iter().map(line_total).sum()
}

/// MOQ cost carried by each piece at quantity `quantity`.
///
/// ## Returns
/// `cost × moq_quantity / quantity` for an MOQ development folded into the
/// subtotal with a MOQ quantity set, otherwise 0.
///
/// ## Example
/// ```rust
/// use prequote_core::pricing::moq_cost_per_unit;
/// use prequote_core::{Development, Quantity};
/// use rust_decimal::Decimal;
///
/// let mut dev = Development::new("MOQ - Zipper", Decimal::from(100));
/// dev.is_from_moq = true;
/// dev.include_in_subtotal = true;
/// dev.moq_quantity = 500;
///
/// let per_unit = moq_cost_per_unit(&dev, Quantity::new(100).unwrap());
/// assert_eq!(per_unit, Decimal::from(500));
/// ```
pub fn moq_cost_per_unit(development: &Development, quantity: Quantity) -> Decimal {
    if development.is_amortized() && development.moq_quantity > 0 {
        moq_extra_cost(development) / quantity.as_decimal()
    } else {
        Decimal::ZERO
    }
}

/// The full MOQ outlay of a development: `cost × moq_quantity`.
#[inline]
pub fn moq_extra_cost(development: &Development) -> Decimal {
    development.cost * Decimal::from(development.moq_quantity)
}

/// Per-piece cost before margin at quantity `quantity`.
pub fn subtotal(components: &[Component], developments: &[Development], quantity: Quantity) -> Decimal {
    let amortized: Decimal = developments
        .iter()
        .filter(|d| d.is_amortized())
        .map(|d| moq_cost_per_unit(d, quantity))
        .sum();
    materials_total(components) + amortized
}

/// Sum of the development costs not folded into the subtotal.
pub fn development_flat_total(developments: &[Development]) -> Decimal {
    developments
        .iter()
        .filter(|d| !d.is_amortized())
        .map(|d| d.cost)
        .sum()
}

/// `subtotal(q) × q`.
pub fn quantity_total(
    components: &[Component],
    developments: &[Development],
    quantity: Quantity,
) -> Decimal {
    subtotal(components, developments, quantity) * quantity.as_decimal()
}

/// `1 + margin / 100`.
#[inline]
pub fn margin_multiplier(margin: Decimal) -> Decimal {
    Decimal::ONE + margin / Decimal::ONE_HUNDRED
}

/// Quoted price per piece: `quantity_total(q) × (1 + margin/100) / q`.
pub fn unit_price_with_margin(
    components: &[Component],
    developments: &[Development],
    quantity: Quantity,
    margin: Decimal,
) -> Decimal {
    quantity_total(components, developments, quantity) * margin_multiplier(margin)
        / quantity.as_decimal()
}

// =============================================================================
// Breakdown
// =============================================================================

/// Computed figures for one (quantity, margin) tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceTier {
    pub quantity: u32,

    #[ts(type = "string")]
    pub margin: Decimal,

    /// Per-piece cost before margin.
    pub subtotal: Money,

    /// `subtotal × quantity`.
    pub quantity_total: Money,

    /// Per-piece price after margin.
    pub unit_price_with_margin: Money,

    /// `quantity_total × (1 + margin/100)`.
    pub total_with_margin: Money,
}

/// Every figure shown for a quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub materials_total: Money,
    pub development_flat_total: Money,
    pub tiers: Vec<PriceTier>,
}

impl PriceBreakdown {
    /// Copy with every amount rounded to cents, for transport.
    pub fn rounded(&self) -> PriceBreakdown {
        let r = |m: Money| Money::new(m.rounded());
        PriceBreakdown {
            materials_total: r(self.materials_total),
            development_flat_total: r(self.development_flat_total),
            tiers: self
                .tiers
                .iter()
                .map(|t| PriceTier {
                    quantity: t.quantity,
                    margin: t.margin,
                    subtotal: r(t.subtotal),
                    quantity_total: r(t.quantity_total),
                    unit_price_with_margin: r(t.unit_price_with_margin),
                    total_with_margin: r(t.total_with_margin),
                })
                .collect(),
        }
    }
}

/// Prices a set of line items at the three tiers.
///
/// ## Errors
/// * `Validation(MustBePositive)` - a quantity tier is 0
/// * `PriceOutOfRange` - a tier figure overflows `Decimal`
pub fn price_line_items(
    items: &LineItems,
    quantities: &[u32; TIER_COUNT],
    margins: &[Decimal; TIER_COUNT],
) -> CoreResult<PriceBreakdown> {
    let tiers = tiers(quantities, margins)?;
    let (components, developments) = (&items.components, &items.developments);

    let out_of_range = |quantity: Quantity| CoreError::PriceOutOfRange {
        quantity: quantity.get(),
    };
    let materials = checked_materials_total(components).ok_or_else(|| out_of_range(tiers[0].0))?;
    let flat = developments
        .iter()
        .filter(|d| !d.is_amortized())
        .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(d.cost))
        .ok_or_else(|| out_of_range(tiers[0].0))?;

    let priced = tiers
        .iter()
        .map(|&(quantity, margin)| {
            checked_tier(materials, developments, quantity, margin).ok_or_else(|| out_of_range(quantity))
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(PriceBreakdown {
        materials_total: Money::new(materials),
        development_flat_total: Money::new(flat),
        tiers: priced,
    })
}

fn checked_materials_total(components: &[Component]) -> Option<Decimal> {
    components.iter().try_fold(Decimal::ZERO, |acc, c| {
        acc.checked_add(c.unit_price.checked_mul(c.consumption)?)
    })
}

/// One tier with every step checked; `None` when a figure overflows.
fn checked_tier(
    materials: Decimal,
    developments: &[Development],
    quantity: Quantity,
    margin: Decimal,
) -> Option<PriceTier> {
    let q = quantity.as_decimal();
    let amortized = developments
        .iter()
        .filter(|d| d.is_amortized() && d.moq_quantity > 0)
        .try_fold(Decimal::ZERO, |acc, d| {
            let outlay = d.cost.checked_mul(Decimal::from(d.moq_quantity))?;
            acc.checked_add(outlay.checked_div(q)?)
        })?;

    let subtotal = materials.checked_add(amortized)?;
    let total = subtotal.checked_mul(q)?;
    let multiplier = Decimal::ONE.checked_add(margin.checked_div(Decimal::ONE_HUNDRED)?)?;
    let total_with_margin = total.checked_mul(multiplier)?;
    let unit_price = total_with_margin.checked_div(q)?;

    Some(PriceTier {
        quantity: quantity.get(),
        margin,
        subtotal: Money::new(subtotal),
        quantity_total: Money::new(total),
        unit_price_with_margin: Money::new(unit_price),
        total_with_margin: Money::new(total_with_margin),
    })
}

/// Prices a saved quotation.
pub fn price_quotation(quotation: &Quotation) -> CoreResult<PriceBreakdown> {
    price_line_items(&quotation.items, &quotation.quantities, &quotation.margins)
}

// =============================================================================
// Unit Tests
// =============================================================================
