//! Price token extraction.
//!
//! A price token is an optional leading `-`, the `Rp` marker (any case),
//! optional whitespace and a digit group that uses `.` or `,` as thousands
//! separators: `Rp50.000`, `-Rp40.000`, `rp 1,500`.

use std::sync::LazyLock;

use regex::Regex;

use crate::money::Money;

static PRICE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-?Rp\s*([0-9.,]+)").expect("price pattern is valid"));

/// A price found on a receipt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceToken {
    /// The amount with separators stripped, always non-negative.
    pub magnitude: Money,
    /// The magnitude, negated when the line contains a `-` anywhere.
    pub signed: Money,
}

/// Finds the first price token on a line.
///
/// The sign is lexical: any `-` on the line makes the value negative, not
/// only a `-` directly in front of `Rp`. Returns `None` when the line has no
/// price or the digit group holds no digits.
///
/// ## Example
/// ```rust
/// use splitbill_core::parser::find_price;
///
/// let price = find_price("Voucher Diskon -Rp40.000").unwrap();
/// assert_eq!(price.magnitude.units(), 40_000);
/// assert_eq!(price.signed.units(), -40_000);
///
/// assert!(find_price("Jl. Sudirman No. 5").is_none());
/// ```
pub fn find_price(line: &str) -> Option<PriceToken> {
    let caps = PRICE_TOKEN.captures(line)?;
    let magnitude = Money::from_units(parse_grouped_number(&caps[1])?);
    let signed = if line.contains('-') {
        Money::from_units(-magnitude.units())
    } else {
        magnitude
    };
    Some(PriceToken { magnitude, signed })
}

/// Parses a digit group such as `50.000` or `1,250` by dropping separators.
///
/// Groups above [`Money::MAX_INPUT_UNITS`] are treated as OCR noise.
pub fn parse_grouped_number(group: &str) -> Option<i64> {
    let digits: String = group.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits
        .parse()
        .ok()
        .filter(|value| *value <= Money::MAX_INPUT_UNITS)
}

/// Parses the digits of a quantity marker such as the `2` in `2x`.
///
/// Counts above [`Money::MAX_INPUT_UNITS`] are treated as OCR noise.
pub fn parse_count(digits: &str) -> Option<i64> {
    digits
        .parse()
        .ok()
        .filter(|value| (0..=Money::MAX_INPUT_UNITS).contains(value))
}
