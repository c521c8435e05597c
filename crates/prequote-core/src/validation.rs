//! # Validation Module
//!
//! Input normalization and validation for Prequote.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (THIS MODULE, lenient_*)                     │
//! │  ├── "12,5" / "12.5" / 12.5  → 12.5                                    │
//! │  ├── "abc" / null / NaN      → 0                                       │
//! │  ├── negative                → 0                                       │
//! │  └── above MAX_INPUT_VALUE   → 0                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Save-time checks (THIS MODULE, validate_*)                   │
//! │  ├── client name required                                              │
//! │  ├── every quantity tier > 0                                           │
//! │  └── MOQ linkage consistent (line_items::check_linkage)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE(code) / UNIQUE(reference)                       │
//! │  └── Foreign keys with ON DELETE CASCADE for line items                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numbers never reach the pricing engine as NaN: the lenient
//! deserializers coerce anything unusable to zero. The input ceiling keeps
//! every single line product far inside `Decimal` range; the pricing
//! engine still uses checked arithmetic for the aggregated tiers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{tiers, ClientDetails, ClientInput, QuotationInput};
use crate::TIER_COUNT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;

/// Largest price, consumption, cost, margin or count accepted from input.
///
/// Anything above it is out of range and normalized to 0 like other
/// unusable numbers.
pub const MAX_INPUT_VALUE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

// =============================================================================
// Numeric Coercion
// =============================================================================

/// Coerces a loosely typed JSON value to a non-negative decimal.
///
/// ## Rules
/// - numbers and numeric strings parse (comma accepted as decimal separator)
/// - anything else, including negative values and values above
///   [`MAX_INPUT_VALUE`], becomes 0
///
/// ## Example
/// ```rust
/// use prequote_core::validation::coerce_decimal;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(coerce_decimal(&json!("2,5")), Decimal::new(25, 1));
/// assert_eq!(coerce_decimal(&json!("n/a")), Decimal::ZERO);
/// assert_eq!(coerce_decimal(&json!(-4)), Decimal::ZERO);
/// assert_eq!(coerce_decimal(&json!("79228162514264337593543950335")), Decimal::ZERO);
/// ```
pub fn coerce_decimal(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => parse_decimal_str(s),
        _ => None,
    };
    parsed
        .filter(|d| !d.is_sign_negative() && *d <= MAX_INPUT_VALUE)
        .unwrap_or(Decimal::ZERO)
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_str(&s.replace(',', ".")))
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Coerces a loosely typed JSON value to a whole count, truncating fractions.
pub fn coerce_count(value: &Value) -> u32 {
    coerce_decimal(value).trunc().to_u32().unwrap_or(0)
}

// =============================================================================
// Lenient Deserializers
// =============================================================================

/// `deserialize_with` for non-negative decimal fields.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_decimal(&value))
}

/// `deserialize_with` for whole-number counts.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

/// `deserialize_with` for the three quantity tiers.
///
/// Entries are coerced individually. A zero tier survives deserialization
/// and is rejected when the quotation is priced or saved.
pub fn lenient_quantities<'de, D>(deserializer: D) -> Result<[u32; TIER_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    let values = tier_values::<D>(Value::deserialize(deserializer)?)?;
    Ok(values.map(|v| coerce_count(&v)))
}

/// `deserialize_with` for the three margin tiers (percent).
pub fn lenient_margins<'de, D>(deserializer: D) -> Result<[Decimal; TIER_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    let values = tier_values::<D>(Value::deserialize(deserializer)?)?;
    Ok(values.map(|v| coerce_decimal(&v)))
}

fn tier_values<'de, D>(value: Value) -> Result<[Value; TIER_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    match value {
        Value::Array(items) => {
            let len = items.len();
            <[Value; TIER_COUNT]>::try_from(items)
                .map_err(|_| D::Error::invalid_length(len, &"exactly 3 tiers"))
        }
        other => Err(D::Error::custom(format!(
            "expected an array of 3 tiers, got {}",
            other
        ))),
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a client name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional email address (shape only).
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };
    let valid = email
        .split_once('@')
        .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        })
    }
}

/// Validates a client before it is written.
pub fn validate_client(input: &ClientInput) -> ValidationResult<()> {
    validate_client_name(&input.name)?;
    validate_email(input.email.as_deref())
}

fn validate_client_details(details: &ClientDetails) -> ValidationResult<()> {
    validate_client_name(&details.name)?;
    validate_email(details.email.as_deref())
}

/// Validates a quotation before it is written.
///
/// ## Checks
/// 1. Client snapshot has a name
/// 2. Every quantity tier is positive
/// 3. The MOQ pairing of the line items is consistent
/// 4. The article image, if any, decodes as a PNG or JPEG
pub fn validate_quotation(input: &QuotationInput) -> CoreResult<()> {
    validate_client_details(&input.client)?;
    tiers(&input.quantities, &input.margins)?;

    let issues = input.items.check_linkage();
    if !issues.is_empty() {
        return Err(CoreError::Linkage(issues));
    }

    if let Some(image) = &input.article_image {
        decode_image(image)?;
    }
    Ok(())
}

// =============================================================================
// Image Payloads
// =============================================================================

/// Formats the PDF renderer embeds.
const IMAGE_FORMATS: [ImageFormat; 2] = [ImageFormat::Png, ImageFormat::Jpeg];

/// Decodes an article image given as a `data:` URL or bare base64.
///
/// The bytes must decode as a PNG or JPEG picture, the same check the
/// renderer applies when it embeds them.
///
/// ## Returns
/// * `Ok(Vec<u8>)` - raw image bytes
/// * `Err(CoreError::InvalidImage)` - not base64, empty, or not a readable picture
pub fn decode_image(payload: &str) -> CoreResult<Vec<u8>> {
    let encoded = match payload.trim().strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| CoreError::InvalidImage {
                reason: "data URL has no payload".to_string(),
            })?,
        None => payload.trim(),
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CoreError::InvalidImage {
            reason: e.to_string(),
        })?;

    if bytes.is_empty() {
        return Err(CoreError::InvalidImage {
            reason: "image is empty".to_string(),
        });
    }

    let format = image::guess_format(&bytes)
        .ok()
        .filter(|f| IMAGE_FORMATS.contains(f))
        .ok_or_else(|| CoreError::InvalidImage {
            reason: "expected a PNG or JPEG picture".to_string(),
        })?;
    image::load_from_memory_with_format(&bytes, format).map_err(|e| CoreError::InvalidImage {
        reason: e.to_string(),
    })?;
    Ok(bytes)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_decimal() {
        assert_eq!(coerce_decimal(&json!(2.5)), Decimal::new(25, 1));
        assert_eq!(coerce_decimal(&json!("0.0375")), Decimal::new(375, 4));
        assert_eq!(coerce_decimal(&json!("1,25")), Decimal::new(125, 2));
        assert_eq!(coerce_decimal(&json!("")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!(null)), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!("-3")), Decimal::ZERO);
    }

    #[test]
    fn test_values_above_ceiling_become_zero() {
        assert_eq!(coerce_decimal(&json!("1000000000")), MAX_INPUT_VALUE);
        assert_eq!(coerce_decimal(&json!("1000000000.01")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!("79228162514264337593543950335")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!(1e300)), Decimal::ZERO);
        assert_eq!(coerce_count(&json!("99999999999")), 0);
    }

    #[test]
    fn test_coerce_count_truncates() {
        assert_eq!(coerce_count(&json!(250.9)), 250);
        assert_eq!(coerce_count(&json!("500")), 500);
        assert_eq!(coerce_count(&json!("lots")), 0);
    }

    #[derive(Debug, Deserialize)]
    struct Tiers {
        #[serde(deserialize_with = "lenient_quantities")]
        quantities: [u32; TIER_COUNT],
        #[serde(deserialize_with = "lenient_margins")]
        margins: [Decimal; TIER_COUNT],
    }

    #[test]
    fn test_lenient_tiers() {
        let t: Tiers = serde_json::from_value(json!({
            "quantities": ["100", 250, "x"],
            "margins": [30, "-5", "12.5"]
        }))
        .unwrap();
        assert_eq!(t.quantities, [100, 250, 0]);
        assert_eq!(t.margins, [Decimal::from(30), Decimal::ZERO, Decimal::new(125, 1)]);
    }

    #[test]
    fn test_tiers_must_have_three_entries() {
        let err = serde_json::from_value::<Tiers>(json!({
            "quantities": [100, 250],
            "margins": [30, 25, 20]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("exactly 3 tiers"));
    }

    #[test]
    fn test_validate_client_name() {
        assert!(validate_client_name("Acme Textiles").is_ok());
        assert!(validate_client_name("   ").is_err());
        assert!(validate_client_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(Some("buyer@acme.pt")).is_ok());
        assert!(validate_email(Some("buyer-at-acme")).is_err());
    }

    #[test]
    fn test_validate_quotation_rejects_zero_tier() {
        let mut input = QuotationInput::default();
        input.client.name = "Acme".to_string();
        input.quantities = [100, 250, 0];
        let err = validate_quotation(&input).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBePositive { .. })
        ));
    }

    /// A valid 1×1 PNG.
    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_image() {
        let bytes = decode_image(&format!("data:image/png;base64,{PIXEL_PNG}")).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        assert_eq!(decode_image(PIXEL_PNG).unwrap(), bytes);
        assert!(decode_image("data:image/png;base64").is_err());
        assert!(decode_image("***").is_err());
        assert!(decode_image("").is_err());
    }

    #[test]
    fn test_base64_that_is_not_a_picture_is_rejected() {
        let err = decode_image("data:image/png;base64,AQID").unwrap_err();
        assert!(matches!(err, CoreError::InvalidImage { .. }));

        // PNG signature followed by garbage
        let truncated = STANDARD.encode(b"\x89PNG\r\n\x1a\n\x00\x00");
        assert!(decode_image(&truncated).is_err());

        let mut input = QuotationInput::default();
        input.client.name = "Acme".to_string();
        input.article_image = Some("data:image/png;base64,AQID".to_string());
        assert!(matches!(
            validate_quotation(&input),
            Err(CoreError::InvalidImage { .. })
        ));

        input.article_image = Some(format!("data:image/png;base64,{PIXEL_PNG}"));
        assert!(validate_quotation(&input).is_ok());
    }
}
