//! # Money Module
//!
//! Provides the `Money` type for euro amounts on quotations.
//!
//! ## Why Decimal, Unrounded?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ROUND ONCE, AT THE EDGE                                                │
//! │                                                                         │
//! │  Unit prices carry fractions of a cent (0.0375 €/cm of thread) and      │
//! │  MOQ costs are amortized over 100/250/500 pieces:                      │
//! │                                                                         │
//! │    50.00 € / 3 tiers … rounded at every step → tiers drift apart        │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal, exact base-10                              │
//! │    • every intermediate value stays unrounded                           │
//! │    • rounding to 2 dp happens only in Display / rounded()               │
//! │    • no f64 anywhere, so no 0.1 + 0.2 surprises                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use prequote_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let unit = Money::new(Decimal::new(125, 2)); // €1.25
//! let total = unit * Decimal::from(3);
//! assert_eq!(total.to_string(), "€3.75");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

/// Decimal places shown for every currency value.
pub const DISPLAY_SCALE: u32 = 2;

/// Currency symbol used on every exported document.
pub const CURRENCY_SYMBOL: &str = "€";

// =============================================================================
// Money Type
// =============================================================================

/// A euro amount kept at full precision.
///
/// ## Where Money is Used
/// ```text
/// Component.unit_price × consumption ──► line total ──┐
///                                                      ├──► subtotal(q)
/// Development.cost × moq_quantity / q ─────────────────┘        │
///                                                               ▼
///                                       subtotal(q) × (1 + margin/100)
///                                                               │
///                                                               ▼
///                                              Displayed as "€13.00"
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Zero euros.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the unrounded amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Rounds to two decimal places, midpoint away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use prequote_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::new(Decimal::new(12345, 3)); // 12.345
    /// assert_eq!(m.rounded(), Decimal::new(1235, 2));
    /// ```
    pub fn rounded(&self) -> Decimal {
        round_display(self.0)
    }
}

/// Rounds any decimal the way currency is displayed.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Formatting Helpers
// =============================================================================

/// Formats a percentage as its given value followed by `%`.
///
/// ## Example
/// ```rust
/// use prequote_core::money::format_percent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_percent(Decimal::from(30)), "30%");
/// assert_eq!(format_percent(Decimal::new(125, 1)), "12.5%");
/// ```
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.normalize())
}

/// Formats a plain decimal quantity without trailing zeros.
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded to cents with a leading euro sign.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{}{}{:.prec$}",
            sign,
            CURRENCY_SYMBOL,
            rounded.abs(),
            prec = DISPLAY_SCALE as usize
        )
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Multiplication by a factor (consumption, quantity, margin multiplier).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::new(Decimal::new(1250, 2)).to_string(), "€12.50");
        assert_eq!(Money::new(Decimal::from(13)).to_string(), "€13.00");
        assert_eq!(Money::new(Decimal::new(-1, 0)).to_string(), "-€1.00");
        assert_eq!(Money::zero().to_string(), "€0.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Money::new(Decimal::new(1005, 3)).to_string(), "€1.01");
        assert_eq!(Money::new(Decimal::new(-4, 3)).to_string(), "€0.00");
    }

    #[test]
    fn test_arithmetic_stays_unrounded() {
        let third = Money::new(Decimal::from(100) / Decimal::from(3));
        let back = third * Decimal::from(3);
        assert_eq!(back.rounded(), Decimal::from(100));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Decimal::new(150, 2), Decimal::new(250, 2)]
            .into_iter()
            .map(Money::new)
            .sum();
        assert_eq!(total.amount(), Decimal::from(4));
    }

    #[test]
    fn test_format_percent_and_quantity() {
        assert_eq!(format_percent(Decimal::new(2000, 2)), "20%");
        assert_eq!(format_percent(Decimal::ZERO), "0%");
        assert_eq!(format_quantity(Decimal::new(2500, 3)), "2.5");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(Decimal::new(1250, 2))).unwrap();
        assert_eq!(json, "\"12.50\"");
    }
}
