//! Strict grammar for pasted receipt text.
//!
//! Used when a user pastes text to check how it parses. Item lines must
//! carry a numbered prefix before the quantity marker:
//!
//! ```text
//! 1 2x NasiBabat Rp50.000
//! (2) 1x Nasi ayam rendang Rp25.000
//! 8 1x Es kopi Rp7.000
//! ```
//!
//! Summary lines are returned as raw text rather than a typed `Summary`.

use std::sync::LazyLock;

use regex::Regex;

use super::price::{parse_count, parse_grouped_number};
use crate::money::Money;
use crate::types::{PastedItem, PastedReceipt};

/// Characters deleted from pasted item names.
///
/// These correct specific glyph misreads of the OCR engine the pasted text
/// comes from. The set is exact; do not extend it without real samples.
pub const NAME_NOISE: [char; 7] = ['I', 'K', ')', '(', '|', 'S', 'a'];

/// Symbols the OCR engine emits in fee lines (`Biaya Layanan © Rp1.000`).
const FEE_LINE_NOISE: [char; 3] = ['@', 'Â', '©'];

static MENU_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[0-9]+|\([0-9]+\))\s+([0-9]+)x\s+(.+?)\s+Rp([0-9.,]+)")
        .expect("menu pattern is valid")
});
static SUBTOTAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Subtotal.*?Rp[0-9.,]+").expect("subtotal pattern is valid")
});
static DISCOUNT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Voucher\s+)?Diskon\s+-Rp[0-9.,]+").expect("discount pattern is valid")
});
static DELIVERY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Biaya\s+Pengiriman.*?Rp[0-9.,]+").expect("delivery pattern is valid")
});
static SERVICE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Biaya\s+Layanan.*?Rp[0-9.,]+").expect("service pattern is valid")
});
static TOTAL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Rp[0-9.,]+$").expect("total pattern is valid"));

/// Parses pasted receipt text with the strict grammar.
///
/// ## Example
/// ```rust
/// use splitbill_core::parser::parse_pasted_receipt;
///
/// let pasted = parse_pasted_receipt("(2) 1x Es kopi Rp7.000\nBiaya Layanan © Rp1.000");
/// assert_eq!(pasted.items[0].quantity, 1);
/// assert_eq!(pasted.items[0].total_price.units(), 7_000);
/// assert_eq!(pasted.bills, vec!["Biaya Layanan  Rp1.000".to_string()]);
/// ```
pub fn parse_pasted_receipt(text: &str) -> PastedReceipt {
    let mut pasted = PastedReceipt::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(item) = parse_menu_line(line) {
            pasted.items.push(item);
            continue;
        }

        if SUBTOTAL_LINE.is_match(line) || DISCOUNT_LINE.is_match(line) {
            pasted.bills.push(line.to_string());
        } else if DELIVERY_LINE.is_match(line) || SERVICE_LINE.is_match(line) {
            pasted.bills.push(strip_chars(line, &FEE_LINE_NOISE).trim().to_string());
        } else if TOTAL_LINE.is_match(line)
            && !line.contains("Subtotal")
            && !line.contains("Biaya")
            && !line.contains("Diskon")
        {
            pasted.bills.push(line.to_string());
        }
    }

    pasted
}

fn parse_menu_line(line: &str) -> Option<PastedItem> {
    let caps = MENU_LINE.captures(line)?;
    let quantity = parse_count(&caps[1])?;
    let total_price = Money::from_units(parse_grouped_number(&caps[3])?);
    let name = clean_item_name(caps[2].trim());
    Some(PastedItem {
        quantity,
        name,
        total_price,
    })
}

/// Removes the OCR noise characters from an item name.
///
/// ## Example
/// ```rust
/// use splitbill_core::parser::clean_item_name;
///
/// assert_eq!(clean_item_name("(Nasi) Kuning|"), "Nsi uning");
/// ```
pub fn clean_item_name(name: &str) -> String {
    strip_chars(name, &NAME_NOISE).trim().to_string()
}

fn strip_chars(text: &str, chars: &[char]) -> String {
    text.chars().filter(|c| !chars.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
GoFood
1 2x NasiBabat Rp50.000
1 1x Ayam rendang Rp18.000
(2) 1x Nasi ayam rendang Rp25.000
8 1x Es kopi Rp7.000
Subtotal Pesanan (5 menu) Rp100.000
Voucher Diskon -Rp40.000
Biaya Pengiriman @ Rp0
Biaya Layanan Â© Rp1.000
Rp61.000
Terima kasih";

    #[test]
    fn test_items_with_numbered_prefix() {
        let pasted = parse_pasted_receipt(SAMPLE);
        assert_eq!(pasted.items.len(), 4);

        assert_eq!(pasted.items[0].quantity, 2);
        assert_eq!(pasted.items[0].total_price.units(), 50_000);
        assert_eq!(pasted.items[2].quantity, 1);
        assert_eq!(pasted.items[2].total_price.units(), 25_000);
    }

    #[test]
    fn test_name_cleanup_uses_exact_character_set() {
        let pasted = parse_pasted_receipt(SAMPLE);
        // 'a' is deleted, 'A' is kept.
        assert_eq!(pasted.items[0].name, "NsiBbt");
        assert_eq!(pasted.items[1].name, "Aym rendng");
        assert_eq!(pasted.items[3].name, "Es kopi");
        assert_eq!(clean_item_name("SIKa()|x"), "x");
    }

    #[test]
    fn test_bills_in_order_with_fee_cleanup() {
        let pasted = parse_pasted_receipt(SAMPLE);
        assert_eq!(
            pasted.bills,
            vec![
                "Subtotal Pesanan (5 menu) Rp100.000".to_string(),
                "Voucher Diskon -Rp40.000".to_string(),
                "Biaya Pengiriman  Rp0".to_string(),
                "Biaya Layanan  Rp1.000".to_string(),
                "Rp61.000".to_string(),
            ]
        );
    }

    #[test]
    fn test_item_without_prefix_is_not_an_item() {
        let pasted = parse_pasted_receipt("2x Nasi Rp10.000");
        assert!(pasted.items.is_empty());
        assert!(pasted.bills.is_empty());
    }

    #[test]
    fn test_total_line_must_be_only_a_price() {
        let pasted = parse_pasted_receipt("Total Rp61.000\nRp61.000 lunas");
        assert!(pasted.bills.is_empty());
    }

    #[test]
    fn test_discount_requires_negative_marker() {
        let pasted = parse_pasted_receipt("Diskon Rp5.000");
        assert!(pasted.bills.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_pasted_receipt(""), PastedReceipt::default());
    }
}
