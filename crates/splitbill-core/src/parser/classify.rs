//! Keyword classification of priced receipt lines.
//!
//! ## Precedence
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Rules are evaluated top to bottom; the first match wins.            │
//! │                                                                      │
//! │  1. "subtotal"                          → summary.subtotal = value   │
//! │  2. "diskon" | "discount" | "promo"     → summary.discount = |value| │
//! │  3. "pengiriman" | "ongkir"             → summary.delivery_fee       │
//! │  4. "layanan"                           → summary.service_fee        │
//! │  5. line starts with "rp"               → summary.total              │
//! │  -  nothing matched                     → item line                  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A line phrased `Total Rp61.000` matches none of the rules and becomes an
//! item line. Only a line that *begins* with the price is read as the total.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Summary;

/// What a priced line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineClass {
    Subtotal,
    Discount,
    DeliveryFee,
    ServiceFee,
    Total,
    Item,
}

/// One entry of the classification table.
pub struct SummaryRule {
    pub class: LineClass,
    /// Receives the lowercased line.
    pub matches: fn(&str) -> bool,
    /// Receives the signed line value.
    pub apply: fn(&mut Summary, Money),
}

/// The classification table, in precedence order.
pub static SUMMARY_RULES: &[SummaryRule] = &[
    SummaryRule {
        class: LineClass::Subtotal,
        matches: |line| line.contains("subtotal"),
        apply: |summary, value| summary.subtotal = Some(value),
    },
    SummaryRule {
        class: LineClass::Discount,
        matches: |line| contains_any(line, &["diskon", "discount", "promo"]),
        apply: |summary, value| summary.discount = Some(value.abs()),
    },
    SummaryRule {
        class: LineClass::DeliveryFee,
        matches: |line| contains_any(line, &["pengiriman", "ongkir"]),
        apply: |summary, value| summary.delivery_fee = Some(value),
    },
    SummaryRule {
        class: LineClass::ServiceFee,
        matches: |line| line.contains("layanan"),
        apply: |summary, value| summary.service_fee = Some(value),
    },
    SummaryRule {
        class: LineClass::Total,
        matches: |line| line.starts_with("rp"),
        apply: |summary, value| summary.total = Some(value),
    },
];

fn contains_any(line: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| line.contains(k))
}

/// Returns the first summary rule matching the line, or `None` for an item line.
pub fn summary_rule(line: &str) -> Option<&'static SummaryRule> {
    let lower = line.to_lowercase();
    SUMMARY_RULES.iter().find(|rule| (rule.matches)(&lower))
}

/// Classifies a priced line.
///
/// ## Example
/// ```rust
/// use splitbill_core::parser::{classify, LineClass};
///
/// assert_eq!(classify("Subtotal Pesanan (5 menu) Rp100.000"), LineClass::Subtotal);
/// assert_eq!(classify("Rp61.000"), LineClass::Total);
/// assert_eq!(classify("Total Rp61.000"), LineClass::Item);
/// ```
pub fn classify(line: &str) -> LineClass {
    summary_rule(line).map_or(LineClass::Item, |rule| rule.class)
}
