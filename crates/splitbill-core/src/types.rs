//! # Domain Types
//!
//! Core domain types shared by the parser, the allocation engine and the
//! bill session.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ParsedReceipt  │   │    LineItem     │   │     Person      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  platform       │──►│  name           │◄──│  id (UUID)      │       │
//! │  │  items          │   │  quantity       │   │  default_name   │       │
//! │  │  summary        │   │  unit_price     │   │  custom_name    │       │
//! │  │  raw_text       │   │  total_price    │   │  selections     │       │
//! │  └─────────────────┘   └─────────────────┘   │  {index → qty}  │       │
//! │                                               └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Summary      │   │    Charges      │                             │
//! │  │  (as printed)   │──►│  (as applied)   │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Index-as-Identity
//! Items have no id of their own. A person's selections point at items by
//! their position in the receipt's item list, so every operation that
//! removes an item must rewrite the selections (see
//! [`crate::session::BillSession::remove_item`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Platform
// =============================================================================

/// The delivery platform a receipt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Platform {
    #[serde(rename = "Gojek/GoFood")]
    GojekGoFood,
    #[serde(rename = "Shopee Food")]
    ShopeeFood,
    #[default]
    Unknown,
}

impl Platform {
    /// The label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::GojekGoFood => "Gojek/GoFood",
            Platform::ShopeeFood => "Shopee Food",
            Platform::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A single purchased product entry.
///
/// `total_price ≈ quantity × unit_price` is expected but not enforced:
/// the parser derives the unit price by rounded division, and manual edits
/// may set either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
}

impl LineItem {
    /// Creates an item from its line total, deriving the unit price.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::{LineItem, Money};
    ///
    /// let item = LineItem::from_total("NasiBabat", 2, Money::from_units(50_000));
    /// assert_eq!(item.unit_price.units(), 25_000);
    /// ```
    pub fn from_total(name: impl Into<String>, quantity: i64, total_price: Money) -> Self {
        LineItem {
            name: name.into(),
            quantity,
            unit_price: total_price.divide_by_quantity(quantity),
            total_price,
        }
    }

    /// Creates an item from its unit price.
    pub fn from_unit_price(name: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        LineItem {
            name: name.into(),
            quantity,
            unit_price,
            total_price: unit_price.multiply_quantity(quantity),
        }
    }

    /// Value of `qty` units of this item at its unit price.
    #[inline]
    pub fn value_of(&self, qty: i64) -> Money {
        self.unit_price.multiply_quantity(qty)
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Aggregate fields as printed on the receipt.
///
/// Every field is optional: a line that was never found stays `None`.
/// `discount` is stored as a positive magnitude even though the receipt
/// prints it as a negative amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub subtotal: Option<Money>,
    pub discount: Option<Money>,
    pub service_fee: Option<Money>,
    pub delivery_fee: Option<Money>,
    pub total: Option<Money>,
}

impl Summary {
    /// True when no summary line was recognised.
    pub fn is_empty(&self) -> bool {
        self.subtotal.is_none()
            && self.discount.is_none()
            && self.service_fee.is_none()
            && self.delivery_fee.is_none()
            && self.total.is_none()
    }
}

// =============================================================================
// Parsed Receipt
// =============================================================================

/// Output of the primary receipt parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ParsedReceipt {
    pub platform: Platform,
    pub items: Vec<LineItem>,
    pub summary: Summary,
    /// The unmodified input, kept for debugging and audit.
    pub raw_text: String,
}

// =============================================================================
// Pasted Receipt (strict grammar)
// =============================================================================

/// An item recognised by the strict paste grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PastedItem {
    pub quantity: i64,
    pub name: String,
    pub total_price: Money,
}

/// Output of the strict paste grammar.
///
/// `bills` holds the matched summary lines verbatim (after the fixed symbol
/// cleanup), in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PastedReceipt {
    pub items: Vec<PastedItem>,
    pub bills: Vec<String>,
}

// =============================================================================
// Person
// =============================================================================

/// Someone sharing the bill.
///
/// ## Selections
/// `selections` maps item index → claimed quantity. A zero claim is never
/// stored: absence is the canonical zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Opaque stable identifier (UUID v4).
    pub id: String,
    /// Name assigned on creation ("Orang 1", "Orang 2", ...).
    pub default_name: String,
    /// Name typed by the user, if any.
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub selections: BTreeMap<usize, i64>,
}

impl Person {
    /// Creates a person with a fresh id and no claims.
    pub fn new(default_name: impl Into<String>) -> Self {
        Person {
            id: Uuid::new_v4().to_string(),
            default_name: default_name.into(),
            custom_name: None,
            selections: BTreeMap::new(),
        }
    }

    /// The custom name if one was set, otherwise the default name.
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.default_name)
    }

    /// Quantity this person claims of the item at `index` (0 if none).
    #[inline]
    pub fn claim(&self, index: usize) -> i64 {
        self.selections.get(&index).copied().unwrap_or(0)
    }

    /// True when the person claims at least one unit of anything.
    #[inline]
    pub fn has_claims(&self) -> bool {
        !self.selections.is_empty()
    }
}

// =============================================================================
// Charges
// =============================================================================

/// The scalar inputs of the allocation engine.
///
/// ## Manual Total
/// A positive `manual_total` overrides the computed final total outright.
/// It exists because a receipt's printed total can disagree with the sum of
/// its parts; the printed number wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Charges {
    pub discount: Money,
    pub service_fee: Money,
    pub delivery_fee: Money,
    pub manual_total: Money,
}

impl Charges {
    /// Charges as printed on a parsed receipt; missing lines become zero.
    pub fn from_summary(summary: &Summary) -> Self {
        Charges {
            discount: summary.discount.unwrap_or_default().abs(),
            service_fee: summary.service_fee.unwrap_or_default(),
            delivery_fee: summary.delivery_fee.unwrap_or_default(),
            manual_total: summary.total.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_serializes_as_label() {
        let json = serde_json::to_string(&Platform::GojekGoFood).unwrap();
        assert_eq!(json, "\"Gojek/GoFood\"");
        let back: Platform = serde_json::from_str("\"Shopee Food\"").unwrap();
        assert_eq!(back, Platform::ShopeeFood);
        assert_eq!(Platform::default(), Platform::Unknown);
    }

    #[test]
    fn test_line_item_from_total() {
        let item = LineItem::from_total("Es kopi", 3, Money::from_units(21_000));
        assert_eq!(item.unit_price.units(), 7_000);
        assert_eq!(item.value_of(2).units(), 14_000);
    }

    #[test]
    fn test_line_item_from_unit_price() {
        let item = LineItem::from_unit_price("Es teh", 4, Money::from_units(5_000));
        assert_eq!(item.total_price.units(), 20_000);
    }

    #[test]
    fn test_person_display_name() {
        let mut person = Person::new("Orang 1");
        assert_eq!(person.display_name(), "Orang 1");
        person.custom_name = Some("Budi".to_string());
        assert_eq!(person.display_name(), "Budi");
    }

    #[test]
    fn test_person_ids_are_unique() {
        assert_ne!(Person::new("a").id, Person::new("a").id);
    }

    #[test]
    fn test_person_claim_defaults_to_zero() {
        let mut person = Person::new("Orang 1");
        assert_eq!(person.claim(3), 0);
        assert!(!person.has_claims());
        person.selections.insert(3, 2);
        assert_eq!(person.claim(3), 2);
        assert!(person.has_claims());
    }

    #[test]
    fn test_charges_from_summary() {
        let summary = Summary {
            discount: Some(Money::from_units(40_000)),
            delivery_fee: Some(Money::from_units(0)),
            total: Some(Money::from_units(61_000)),
            ..Summary::default()
        };
        let charges = Charges::from_summary(&summary);
        assert_eq!(charges.discount.units(), 40_000);
        assert!(charges.service_fee.is_zero());
        assert_eq!(charges.manual_total.units(), 61_000);
    }

    #[test]
    fn test_summary_is_empty() {
        assert!(Summary::default().is_empty());
        let summary = Summary {
            total: Some(Money::zero()),
            ..Summary::default()
        };
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_selection_keys_survive_json() {
        let mut person = Person::new("Orang 1");
        person.selections.insert(2, 1);
        let json = serde_json::to_string(&person).unwrap();
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(back.claim(2), 1);
    }
}
