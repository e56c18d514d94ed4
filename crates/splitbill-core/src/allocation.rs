//! # Allocation Engine
//!
//! Pure bill arithmetic over an item list, a set of people and the charges.
//!
//! ## Two Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AGGREGATE MODE (no per-person split)                                   │
//! │                                                                         │
//! │    items_total = Σ item.total_price                                     │
//! │    subtotal    = items_total − discount                                 │
//! │    final_total = manual_total > 0 ? manual_total                        │
//! │                                   : subtotal + service + delivery       │
//! │                                                                         │
//! │  PER-PERSON MODE                                                        │
//! │                                                                         │
//! │    person items  = Σ unit_price × claimed qty                           │
//! │    claimed value = Σ over EVERY person of the same                      │
//! │    discount      = discount × person items / claimed value   (prop.)    │
//! │    service fee   = service  × person items / claimed value   (prop.)    │
//! │    delivery fee  = delivery / people with at least one claim (even)     │
//! │    total         = items − discount + service + delivery                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Caching
//! Remaining quantities and the claimed-value denominator are recomputed on
//! every call. Any claim can change between two reads.
//!
//! ## No Normalisation
//! The sum of person totals is not forced to equal the aggregate final total.
//! It differs whenever the manual total override is active or some quantity
//! is unclaimed, and that difference is reported as-is.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Charges, LineItem, Person};

// =============================================================================
// Aggregate Totals
// =============================================================================

/// Whole-bill totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotals {
    pub items_total: Money,
    pub discount: Money,
    pub subtotal: Money,
    pub service_fee: Money,
    pub delivery_fee: Money,
    pub final_total: Money,
}

/// Computes the whole-bill totals.
///
/// ## Example
/// ```rust
/// use splitbill_core::allocation::aggregate_totals;
/// use splitbill_core::{Charges, LineItem, Money};
///
/// let items = vec![LineItem::from_total("Nasi", 2, Money::from_units(50_000))];
/// let charges = Charges {
///     discount: Money::from_units(10_000),
///     service_fee: Money::from_units(2_000),
///     delivery_fee: Money::from_units(5_000),
///     manual_total: Money::zero(),
/// };
///
/// let totals = aggregate_totals(&items, &charges);
/// assert_eq!(totals.subtotal.units(), 40_000);
/// assert_eq!(totals.final_total.units(), 47_000);
/// ```
pub fn aggregate_totals(items: &[LineItem], charges: &Charges) -> AggregateTotals {
    let items_total: Money = items.iter().map(|item| item.total_price).sum();
    let subtotal = items_total - charges.discount;
    let final_total = if charges.manual_total.is_positive() {
        charges.manual_total
    } else {
        subtotal + charges.service_fee + charges.delivery_fee
    };

    AggregateTotals {
        items_total,
        discount: charges.discount,
        subtotal,
        service_fee: charges.service_fee,
        delivery_fee: charges.delivery_fee,
        final_total,
    }
}

// =============================================================================
// Quantities
// =============================================================================

/// Total quantity of the item at `index` claimed by everyone.
pub fn claimed_quantity(people: &[Person], index: usize) -> i64 {
    people
        .iter()
        .fold(0i64, |sum, person| sum.saturating_add(person.claim(index)))
}

/// Quantity of the item at `index` nobody has claimed yet.
///
/// Never negative; zero for an index outside the item list.
pub fn remaining_quantity(items: &[LineItem], people: &[Person], index: usize) -> i64 {
    let Some(item) = items.get(index) else {
        return 0;
    };
    item.quantity
        .saturating_sub(claimed_quantity(people, index))
        .max(0)
}

/// Clamps a requested claim to what `person` may take of the item at `index`.
///
/// The limit is the remaining quantity plus whatever the person already
/// holds, so a person can always keep or lower their own claim.
///
/// ## Example
/// ```rust
/// use splitbill_core::allocation::clamp_claim;
/// use splitbill_core::{LineItem, Money, Person};
///
/// let items = vec![LineItem::from_total("Sate", 3, Money::from_units(30_000))];
/// let mut ani = Person::new("Ani");
/// ani.selections.insert(0, 2);
/// let budi = Person::new("Budi");
/// let people = vec![ani.clone(), budi.clone()];
///
/// assert_eq!(clamp_claim(&items, &people, &budi, 0, 5), 1);
/// assert_eq!(clamp_claim(&items, &people, &ani, 0, 5), 3);
/// assert_eq!(clamp_claim(&items, &people, &ani, 0, -1), 0);
/// ```
pub fn clamp_claim(
    items: &[LineItem],
    people: &[Person],
    person: &Person,
    index: usize,
    requested: i64,
) -> i64 {
    let limit = remaining_quantity(items, people, index).saturating_add(person.claim(index));
    requested.clamp(0, limit.max(0))
}

// =============================================================================
// Per-Person Breakdown
// =============================================================================

/// One claimed item on a person's tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClaimLine {
    pub item_index: usize,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub amount: Money,
}

/// What one person owes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PersonBreakdown {
    pub person_id: String,
    pub display_name: String,
    pub lines: Vec<ClaimLine>,
    pub items_total: Money,
    pub discount: Money,
    pub service_fee: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

/// Value of a person's claims at unit prices.
///
/// Claims on indices outside the item list count for nothing.
pub fn claimed_value(items: &[LineItem], person: &Person) -> Money {
    person
        .selections
        .iter()
        .filter_map(|(&index, &qty)| items.get(index).map(|item| item.value_of(qty)))
        .sum()
}

/// Computes what `person` owes.
///
/// Discount and service fee follow the person's share of the value claimed
/// by all of `people`; the delivery fee is split evenly between everyone with
/// at least one claim. With no claims anywhere every share is zero.
pub fn person_breakdown(
    items: &[LineItem],
    people: &[Person],
    charges: &Charges,
    person: &Person,
) -> PersonBreakdown {
    let lines: Vec<ClaimLine> = person
        .selections
        .iter()
        .filter_map(|(&index, &qty)| {
            items.get(index).map(|item| ClaimLine {
                item_index: index,
                name: item.name.clone(),
                quantity: qty,
                unit_price: item.unit_price,
                amount: item.value_of(qty),
            })
        })
        .collect();

    let items_total: Money = lines.iter().map(|line| line.amount).sum();
    let all_claimed: Money = people.iter().map(|p| claimed_value(items, p)).sum();
    let claimants = people.iter().filter(|p| p.has_claims()).count();

    let discount = charges.discount.proportion_of(items_total, all_claimed);
    let service_fee = charges.service_fee.proportion_of(items_total, all_claimed);
    let delivery_fee = if person.has_claims() {
        charges.delivery_fee.split_evenly(claimants)
    } else {
        Money::zero()
    };

    PersonBreakdown {
        person_id: person.id.clone(),
        display_name: person.display_name().to_string(),
        lines,
        items_total,
        discount,
        service_fee,
        delivery_fee,
        total: items_total - discount + service_fee + delivery_fee,
    }
}

// =============================================================================
// Per-Item Breakdown (aggregate mode)
// =============================================================================

/// One row of the aggregate-mode item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemBreakdown {
    pub item_index: usize,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
    /// This item's share of the discount, by line total.
    pub discount: Money,
    pub net_total: Money,
    /// Net total divided by quantity.
    pub per_unit: Money,
}

/// Spreads the discount over the items by line total.
///
/// Items with a zero quantity are left out of the table.
pub fn item_breakdowns(items: &[LineItem], discount: Money) -> Vec<ItemBreakdown> {
    let items_total: Money = items.iter().map(|item| item.total_price).sum();

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.quantity > 0)
        .map(|(index, item)| {
            let item_discount = discount.proportion_of(item.total_price, items_total);
            let net_total = item.total_price - item_discount;
            ItemBreakdown {
                item_index: index,
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
                discount: item_discount,
                net_total,
                per_unit: net_total.divide_by_quantity(item.quantity),
            }
        })
        .collect()
}

// =============================================================================
// Split Report
// =============================================================================

/// An item with quantity nobody has claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UnclaimedItem {
    pub item_index: usize,
    pub name: String,
    pub remaining: i64,
}

/// Everything a results screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SplitReport {
    pub totals: AggregateTotals,
    pub items: Vec<ItemBreakdown>,
    pub people: Vec<PersonBreakdown>,
    /// Σ person totals. Not normalised against `totals.final_total`.
    pub people_total: Money,
    pub unclaimed: Vec<UnclaimedItem>,
}

/// Builds the full report for a bill.
pub fn split_report(items: &[LineItem], people: &[Person], charges: &Charges) -> SplitReport {
    let breakdowns: Vec<PersonBreakdown> = people
        .iter()
        .map(|person| person_breakdown(items, people, charges, person))
        .collect();

    let unclaimed = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let remaining = remaining_quantity(items, people, index);
            (remaining > 0).then(|| UnclaimedItem {
                item_index: index,
                name: item.name.clone(),
                remaining,
            })
        })
        .collect();

    SplitReport {
        totals: aggregate_totals(items, charges),
        items: item_breakdowns(items, charges.discount),
        people_total: breakdowns.iter().map(|b| b.total).sum(),
        people: breakdowns,
        unclaimed,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
