//! # Quotation Codes
//!
//! Formatting of the human-readable quotation identifiers.
//!
//! ```text
//! date 2025-03-14, sequence 3
//!      │
//!      ├──► code       PC 25 03 003      → "PC2503003"
//!      └──► reference     25 03 14 003   → "250314003"
//! ```
//!
//! The sequence number itself is allocated by the persistence layer from a
//! monotonic counter; these functions only format it.

use chrono::{Datelike, NaiveDate};

/// Prefix of every quotation code.
pub const CODE_PREFIX: &str = "PC";

/// `PC` + yy + mm + sequence (at least 3 digits).
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use prequote_core::codes::quotation_code;
///
/// let march = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
/// assert_eq!(quotation_code(march, 3), "PC2503003");
/// ```
pub fn quotation_code(date: NaiveDate, sequence: u32) -> String {
    format!(
        "{}{:02}{:02}{:03}",
        CODE_PREFIX,
        date.year().rem_euclid(100),
        date.month(),
        sequence
    )
}

/// yy + mm + dd + sequence (at least 3 digits).
pub fn quotation_reference(date: NaiveDate, sequence: u32) -> String {
    format!(
        "{:02}{:02}{:02}{:03}",
        date.year().rem_euclid(100),
        date.month(),
        date.day(),
        sequence
    )
}
