//! Reading quantity and price out of a typed item name.
//!
//! When a user corrects an item's name, they often paste the whole OCR line
//! (`1 2x Nasi Rp50.000`). The quantity and price embedded in it are lifted
//! out and the remaining text becomes the name.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::price::{parse_count, parse_grouped_number};
use crate::money::Money;

static QUANTITY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)x").expect("quantity pattern is valid"));
static QUANTITY_MARKER_WITH_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9]+x\s*").expect("quantity pattern is valid"));
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\s+").expect("leading number pattern is valid"));
static PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Rp\s*([0-9.,]+)").expect("price pattern is valid"));

/// The pieces of a typed item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemNameEdit {
    /// Present when the text carried a `<digits>x` marker.
    pub quantity: Option<i64>,
    /// Present when the text carried an `Rp` amount (zero if it had no digits).
    pub total_price: Option<Money>,
    /// The text with the line number, quantity marker and price removed.
    pub name: String,
}

/// Splits a typed item name into quantity, price and the bare name.
///
/// The *last* `<digits>x` marker supplies the quantity, while only the
/// first marker is cut from the name.
///
/// ## Example
/// ```rust
/// use splitbill_core::parser::parse_item_name;
///
/// let edit = parse_item_name("1 2x Nasi Rp50.000");
/// assert_eq!(edit.quantity, Some(2));
/// assert_eq!(edit.total_price.map(|p| p.units()), Some(50_000));
/// assert_eq!(edit.name, "Nasi");
///
/// let plain = parse_item_name("Es teh manis");
/// assert_eq!(plain.quantity, None);
/// assert_eq!(plain.name, "Es teh manis");
/// ```
pub fn parse_item_name(text: &str) -> ItemNameEdit {
    let mut quantity = None;
    let mut name = text.to_string();

    if let Some(last) = QUANTITY_MARKER.captures_iter(text).last() {
        quantity = parse_count(&last[1]);
        let without_number = LEADING_NUMBER.replacen(text, 1, "");
        name = QUANTITY_MARKER_WITH_SPACE
            .replacen(&without_number, 1, "")
            .trim()
            .to_string();
    }

    let mut total_price = None;
    if let Some(caps) = PRICE.captures(text) {
        total_price = Some(Money::from_units(
            parse_grouped_number(&caps[1]).unwrap_or(0),
        ));
        name = PRICE.replacen(&name, 1, "").trim().to_string();
    }

    ItemNameEdit {
        quantity,
        total_price,
        name,
    }
}
