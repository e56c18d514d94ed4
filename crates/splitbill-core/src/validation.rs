//! # Validation Module
//!
//! Input coercion and validation for edit forms.
//!
//! ## Two Kinds of Input
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Numeric fields (quantity, prices, fees)                               │
//! │  ├── Never rejected                                                    │
//! │  ├── Leading number is read ("12abc" → 12)                             │
//! │  └── Anything unreadable or above 2^53 - 1 becomes 0                   │
//! │                                                                         │
//! │  Names (people, items)                                                 │
//! │  ├── Trimmed                                                           │
//! │  └── Length and line-break checks → ValidationError                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_NAME_LEN, MAX_PERSON_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Coercion
// =============================================================================

/// Reads the number at the start of `text`, the way a lenient form field does.
///
/// Leading whitespace and a sign are accepted, then digits with at most one
/// decimal point. Returns `None` when no digit is found.
fn leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        }
    }

    if !has_digits {
        return None;
    }
    s[..end].parse().ok()
}

/// Coerces free-form amount input to money.
///
/// Fractions round to the nearest unit. Negative input, unreadable input and
/// values above [`Money::MAX_INPUT_UNITS`] become zero.
///
/// ## Example
/// ```rust
/// use splitbill_core::validation::coerce_amount;
///
/// assert_eq!(coerce_amount("25000").units(), 25_000);
/// assert_eq!(coerce_amount("12abc").units(), 12);
/// assert_eq!(coerce_amount("abc").units(), 0);
/// assert_eq!(coerce_amount("-500").units(), 0);
/// assert_eq!(coerce_amount("99999999999999999999").units(), 0);
/// ```
pub fn coerce_amount(text: &str) -> Money {
    Money::from_units(bounded_units(text, f64::round))
}

/// Coerces free-form quantity input to a whole, non-negative count.
///
/// Counts above [`Money::MAX_INPUT_UNITS`] are unreadable and become zero.
///
/// ## Example
/// ```rust
/// use splitbill_core::validation::coerce_quantity;
///
/// assert_eq!(coerce_quantity("3"), 3);
/// assert_eq!(coerce_quantity("2.9"), 2);
/// assert_eq!(coerce_quantity(""), 0);
/// ```
pub fn coerce_quantity(text: &str) -> i64 {
    bounded_units(text, f64::trunc)
}

/// Applies `to_whole` to the leading number, keeping it only when the result
/// lies in `0..=MAX_INPUT_UNITS`.
fn bounded_units(text: &str, to_whole: fn(f64) -> f64) -> i64 {
    match leading_number(text).map(to_whole) {
        Some(value) if value > 0.0 && value <= Money::MAX_INPUT_UNITS as f64 => value as i64,
        _ => 0,
    }
}

// =============================================================================
// Name Validators
// =============================================================================

/// Validates a person's display name.
///
/// ## Rules
/// - Trimmed; a blank name returns `None` (fall back to the default name)
/// - At most `MAX_PERSON_NAME_LEN` characters
/// - No line breaks or other control characters
pub fn validate_person_name(name: &str) -> ValidationResult<Option<String>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    check_name("person name", name, MAX_PERSON_NAME_LEN)?;
    Ok(Some(name.to_string()))
}

/// Validates an item name. Empty names are allowed.
///
/// ## Example
/// ```rust
/// use splitbill_core::validation::validate_item_name;
///
/// assert_eq!(validate_item_name("  Es kopi ").unwrap(), "Es kopi");
/// assert!(validate_item_name(&"A".repeat(300)).is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();
    check_name("item name", name, MAX_ITEM_NAME_LEN)?;
    Ok(name.to_string())
}

fn check_name(field: &str, name: &str, max: usize) -> ValidationResult<()> {
    if name.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain line breaks or control characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("42"), Some(42.0));
        assert_eq!(leading_number("  -3.5kg"), Some(-3.5));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("7."), Some(7.0));
        assert_eq!(leading_number("+"), None);
        assert_eq!(leading_number("x1"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("18000").units(), 18_000);
        assert_eq!(coerce_amount("1500.6").units(), 1_501);
        assert_eq!(coerce_amount("Rp5000").units(), 0);
        assert_eq!(coerce_amount("").units(), 0);
        assert_eq!(coerce_amount("-1").units(), 0);
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("10"), 10);
        assert_eq!(coerce_quantity("0"), 0);
        assert_eq!(coerce_quantity("-2"), 0);
        assert_eq!(coerce_quantity("two"), 0);
    }

    #[test]
    fn test_huge_numbers_are_unreadable() {
        assert_eq!(coerce_quantity("99999999999999999999"), 0);
        assert_eq!(coerce_amount("99999999999999999999").units(), 0);
        assert_eq!(coerce_amount("1e400").units(), 1);

        assert_eq!(coerce_quantity("9007199254740991"), Money::MAX_INPUT_UNITS);
        assert_eq!(coerce_quantity("9007199254740993"), 0);
    }

    #[test]
    fn test_validate_person_name() {
        assert_eq!(validate_person_name(" Budi ").unwrap(), Some("Budi".to_string()));
        assert_eq!(validate_person_name("   ").unwrap(), None);
        assert!(validate_person_name(&"B".repeat(51)).is_err());
        assert!(validate_person_name("Budi\nSanto").is_err());
    }

    #[test]
    fn test_validate_item_name() {
        assert_eq!(validate_item_name("").unwrap(), "");
        assert!(validate_item_name("Nasi\tGoreng").is_err());
    }
}
