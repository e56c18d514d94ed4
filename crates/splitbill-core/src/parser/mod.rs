//! # Receipt Parser
//!
//! Turns raw OCR text into a [`ParsedReceipt`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       parse_receipt(raw_text)                           │
//! │                                                                         │
//! │  raw_text ──► lines (trimmed, non-empty)                                │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            find_price ── no price? ──► dropped (headers, addresses)     │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            classify ──── summary rule ──► Summary field                 │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            item line ──► LineItem { name, quantity, prices }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Points
//! - [`parse_receipt`] - the lenient grammar used on OCR output
//! - [`parse_pasted_receipt`] - the strict numbered-line grammar
//! - [`parse_item_name`] - quantity/price extraction from an edited name
//!
//! None of them can fail. The worst case is an empty result.

mod classify;
mod item_name;
mod paste;
mod price;

use std::sync::LazyLock;

use regex::Regex;

use crate::money::Money;
use crate::types::{LineItem, ParsedReceipt, Platform, Summary};

pub use classify::{classify, summary_rule, LineClass, SummaryRule, SUMMARY_RULES};
pub use item_name::{parse_item_name, ItemNameEdit};
pub use paste::{clean_item_name, parse_pasted_receipt, NAME_NOISE};
pub use price::{find_price, parse_count, parse_grouped_number, PriceToken};

/// Brand tokens per platform, checked in order against the lowercased text.
const PLATFORM_TOKENS: &[(Platform, &[&str])] = &[
    (Platform::GojekGoFood, &["gojek", "gofood"]),
    (Platform::ShopeeFood, &["shopee", "shopeefood"]),
];

static QUANTITY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)x").expect("quantity pattern is valid"));

/// Parses raw OCR text of a delivery receipt.
///
/// ## Example
/// ```rust
/// use splitbill_core::parser::parse_receipt;
/// use splitbill_core::Platform;
///
/// let receipt = parse_receipt("GoFood\n1 2x NasiBabat Rp50.000\nVoucher Diskon -Rp40.000\nRp61.000");
/// assert_eq!(receipt.platform, Platform::GojekGoFood);
/// assert_eq!(receipt.items[0].name, "NasiBabat");
/// assert_eq!(receipt.items[0].unit_price.units(), 25_000);
/// assert_eq!(receipt.summary.discount.unwrap().units(), 40_000);
/// assert_eq!(receipt.summary.total.unwrap().units(), 61_000);
/// ```
pub fn parse_receipt(raw_text: &str) -> ParsedReceipt {
    let mut items = Vec::new();
    let mut summary = Summary::default();

    for line in raw_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(price) = find_price(line) else {
            continue;
        };

        match summary_rule(line) {
            Some(rule) => (rule.apply)(&mut summary, price.signed),
            None => items.push(parse_item_line(line, price.magnitude)),
        }
    }

    ParsedReceipt {
        platform: detect_platform(raw_text),
        items,
        summary,
        raw_text: raw_text.to_string(),
    }
}

/// Detects the delivery platform from brand names anywhere in the text.
pub fn detect_platform(text: &str) -> Platform {
    let lower = text.to_lowercase();
    PLATFORM_TOKENS
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|t| lower.contains(t)))
        .map_or(Platform::Unknown, |(platform, _)| *platform)
}

/// Builds an item from a priced line that matched no summary rule.
///
/// The first whitespace token containing `<digits>x` is the quantity. The
/// name is everything between that token and the final token, which is taken
/// to be the price. Without a quantity token the quantity is 1 and the name is
/// every token but the last.
fn parse_item_line(line: &str, total_price: Money) -> LineItem {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let last = tokens.len().saturating_sub(1);

    let marker = tokens
        .iter()
        .enumerate()
        .find_map(|(i, token)| QUANTITY_TOKEN.captures(token).map(|caps| (i, caps)));

    let (quantity, name_tokens): (i64, &[&str]) = match marker {
        Some((index, caps)) => (
            parse_count(&caps[1]).unwrap_or(1),
            tokens.get(index + 1..last).unwrap_or(&[]),
        ),
        None => (1, &tokens[..last]),
    };

    LineItem::from_total(name_tokens.join(" "), quantity, total_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOFOOD_RECEIPT: &str = "\
gojek
Pesanan dari Warung Bu Sri
Jl. Kebon Jeruk No. 12
1 2x NasiBabat Rp50.000
1 1x Ayam rendang Rp18.000
Es kopi Rp7.000
Subtotal Pesanan (4 menu) Rp75.000
Voucher Diskon -Rp40.000
Biaya Pengiriman @ Rp0
Biaya Layanan © Rp1.000
Rp36.000
";

    #[test]
    fn test_item_with_quantity_marker() {
        let receipt = parse_receipt("1 2x NasiBabat Rp50.000");
        assert_eq!(receipt.items.len(), 1);
        let item = &receipt.items[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.name, "NasiBabat");
        assert_eq!(item.total_price.units(), 50_000);
        assert_eq!(item.unit_price.units(), 25_000);
    }

    #[test]
    fn test_discount_stored_as_magnitude() {
        let receipt = parse_receipt("Voucher Diskon -Rp40.000");
        assert_eq!(receipt.summary.discount, Some(Money::from_units(40_000)));
        assert!(receipt.items.is_empty());
    }

    #[test]
    fn test_zero_delivery_fee() {
        let receipt = parse_receipt("Biaya Pengiriman @ Rp0");
        assert_eq!(receipt.summary.delivery_fee, Some(Money::zero()));
    }

    #[test]
    fn test_bare_price_is_total() {
        let receipt = parse_receipt("Rp61.000");
        assert_eq!(receipt.summary.total, Some(Money::from_units(61_000)));
        assert!(receipt.items.is_empty());
    }

    #[test]
    fn test_labelled_total_becomes_item() {
        let receipt = parse_receipt("Total Rp61.000");
        assert_eq!(receipt.summary.total, None);
        assert_eq!(receipt.items[0].name, "Total");
        assert_eq!(receipt.items[0].quantity, 1);
    }

    #[test]
    fn test_full_receipt() {
        let receipt = parse_receipt(GOFOOD_RECEIPT);
        assert_eq!(receipt.platform, Platform::GojekGoFood);
        assert_eq!(receipt.items.len(), 3);
        assert_eq!(receipt.items[1].name, "Ayam rendang");
        assert_eq!(receipt.items[2].name, "Es kopi");
        assert_eq!(receipt.items[2].quantity, 1);
        assert_eq!(receipt.summary.subtotal, Some(Money::from_units(75_000)));
        assert_eq!(receipt.summary.service_fee, Some(Money::from_units(1_000)));
        assert_eq!(receipt.summary.total, Some(Money::from_units(36_000)));
        assert_eq!(receipt.raw_text, GOFOOD_RECEIPT);
    }

    #[test]
    fn test_lines_without_price_are_dropped() {
        let receipt = parse_receipt("Warung Bu Sri\n\n   \nTerima kasih!");
        assert!(receipt.items.is_empty());
        assert!(receipt.summary.is_empty());
        assert_eq!(receipt.platform, Platform::Unknown);
    }

    #[test]
    fn test_platform_detection_order() {
        assert_eq!(detect_platform("ShopeeFood"), Platform::ShopeeFood);
        assert_eq!(detect_platform("GOFOOD via shopee pay"), Platform::GojekGoFood);
        assert_eq!(detect_platform("grab"), Platform::Unknown);
    }

    #[test]
    fn test_zero_quantity_does_not_divide_by_zero() {
        let receipt = parse_receipt("1 0x Kerupuk Rp3.000");
        let item = &receipt.items[0];
        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit_price.units(), 3_000);
    }

    #[test]
    fn test_unit_price_rounds() {
        let receipt = parse_receipt("3x Teh Rp10.000");
        assert_eq!(receipt.items[0].unit_price.units(), 3_333);
        assert_eq!(receipt.items[0].total_price.units(), 10_000);
    }

    #[test]
    fn test_marker_as_last_token_leaves_empty_name() {
        let receipt = parse_receipt("Rp5.000 2x");
        // Starts with "rp", so this is the total rather than an item.
        assert!(receipt.items.is_empty());

        let receipt = parse_receipt("Nasi Rp5.000 2x");
        assert_eq!(receipt.items[0].quantity, 2);
        assert_eq!(receipt.items[0].name, "");
    }

    #[test]
    fn test_dash_in_item_name_keeps_positive_price() {
        let receipt = parse_receipt("1x Es teh-manis Rp5.000");
        assert_eq!(receipt.items[0].total_price.units(), 5_000);
        assert_eq!(receipt.items[0].name, "Es teh-manis");
    }

    #[test]
    fn test_later_summary_line_overwrites_earlier() {
        let receipt = parse_receipt("Rp10.000\nRp12.000");
        assert_eq!(receipt.summary.total, Some(Money::from_units(12_000)));
    }

    #[test]
    fn test_crlf_line_endings() {
        let receipt = parse_receipt("1 1x Bakso Rp15.000\r\nRp15.000\r\n");
        assert_eq!(receipt.items[0].name, "Bakso");
        assert_eq!(receipt.summary.total, Some(Money::from_units(15_000)));
    }

    #[test]
    fn test_oversized_numbers_are_ignored() {
        let receipt = parse_receipt(
            "A Rp9.000.000.000.000.000.000\n\
             B Rp9.000.000.000.000.000.000\n\
             99999999999999999999x Es teh Rp5.000",
        );
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Es teh");
        assert_eq!(receipt.items[0].quantity, 1);
    }
}
