//! # Bill Session
//!
//! The editable bill: items, people, their claims and the charges.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bill Session Operations                           │
//! │                                                                         │
//! │  User Action              Session Method              Invariant Work    │
//! │  ───────────              ──────────────              ──────────────    │
//! │                                                                         │
//! │  Claim stepper ─────────► set_person_item_quantity ─► clamp to limit    │
//! │                                                                         │
//! │  Edit quantity ─────────► edit_item(Quantity) ──────► trim claims       │
//! │                                                                         │
//! │  Delete item ───────────► remove_item ──────────────► re-index claims   │
//! │                                                                         │
//! │  Load document ─────────► from_document ────────────► replay claims     │
//! │                                                                         │
//! │  NOTE: After every call, for each item,                                 │
//! │        Σ claims ≤ quantity.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single-Writer
//! A session is not synchronised. Hosts that share one between threads wrap
//! it in a mutex and apply one mutation at a time.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::allocation::{self, AggregateTotals, ItemBreakdown, PersonBreakdown, SplitReport};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::parser::parse_item_name;
use crate::types::{Charges, LineItem, ParsedReceipt, Person};
use crate::validation::{coerce_amount, coerce_quantity, validate_item_name, validate_person_name};
use crate::{DEFAULT_PERSON_PREFIX, NEW_ITEM_NAME};

// =============================================================================
// Item Edits
// =============================================================================

/// A single field edit on an item, as typed into a form.
///
/// Numeric text is coerced, never rejected: unreadable input becomes zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ItemEdit {
    /// New name. A quantity marker or `Rp` amount inside it is applied too.
    Name(String),
    /// New quantity; the total follows at the current unit price.
    Quantity(String),
    /// New unit price; the total follows at the current quantity (or 1).
    UnitPrice(String),
    /// New total; the unit price follows when the quantity is positive.
    TotalPrice(String),
}

// =============================================================================
// Bill Session
// =============================================================================

/// The in-memory bill being split.
///
/// ## Invariants
/// - For every item, the claims of all people sum to at most its quantity
/// - Selections only point at existing items
/// - No selection stores a zero quantity
/// - Charges are never negative
#[derive(Debug, Clone)]
pub struct BillSession {
    items: Vec<LineItem>,
    people: Vec<Person>,
    charges: Charges,
    created_at: DateTime<Utc>,
}

impl Default for BillSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BillSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        BillSession {
            items: Vec::new(),
            people: Vec::new(),
            charges: Charges::default(),
            created_at: Utc::now(),
        }
    }

    /// Starts a session from a parsed receipt.
    ///
    /// The printed total becomes the manual total override. A line read as
    /// `0x` is loaded with quantity 1 so it can still be claimed.
    pub fn from_receipt(receipt: &ParsedReceipt) -> Self {
        let charges = Charges::from_summary(&receipt.summary);
        let items = receipt
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.quantity == 0 {
                    item.quantity = 1;
                }
                item
            })
            .collect();
        BillSession {
            items,
            people: Vec::new(),
            charges: Charges {
                discount: charges.discount,
                service_fee: charges.service_fee.non_negative(),
                delivery_fee: charges.delivery_fee.non_negative(),
                manual_total: charges.manual_total.non_negative(),
            },
            created_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn charges(&self) -> &Charges {
        &self.charges
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Looks up a person by id.
    pub fn person(&self, person_id: &str) -> CoreResult<&Person> {
        self.people
            .iter()
            .find(|p| p.id == person_id)
            .ok_or_else(|| CoreError::PersonNotFound(person_id.to_string()))
    }

    /// Looks up a person by id, falling back to a case-insensitive match on
    /// the display name.
    pub fn resolve_person(&self, key: &str) -> CoreResult<&Person> {
        self.person(key).or_else(|_| {
            self.people
                .iter()
                .find(|p| p.display_name().eq_ignore_ascii_case(key.trim()))
                .ok_or_else(|| CoreError::PersonNotFound(key.to_string()))
        })
    }

    fn person_position(&self, person_id: &str) -> CoreResult<usize> {
        self.people
            .iter()
            .position(|p| p.id == person_id)
            .ok_or_else(|| CoreError::PersonNotFound(person_id.to_string()))
    }

    fn check_item(&self, index: usize) -> CoreResult<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(CoreError::ItemNotFound {
                index,
                len: self.items.len(),
            })
        }
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Applies one field edit to the item at `index`.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::{BillSession, ItemEdit};
    ///
    /// let mut session = BillSession::new();
    /// session.add_item();
    /// session.edit_item(0, ItemEdit::Name("1 2x Nasi Rp50.000".into())).unwrap();
    ///
    /// let item = &session.items()[0];
    /// assert_eq!(item.name, "Nasi");
    /// assert_eq!(item.quantity, 2);
    /// assert_eq!(item.unit_price.units(), 25_000);
    /// ```
    pub fn edit_item(&mut self, index: usize, edit: ItemEdit) -> CoreResult<&LineItem> {
        self.check_item(index)?;
        let item = &mut self.items[index];

        match edit {
            ItemEdit::Name(text) => {
                let parsed = parse_item_name(&text);
                item.name = validate_item_name(&parsed.name)?;
                if let Some(quantity) = parsed.quantity {
                    item.quantity = quantity;
                }
                if let Some(total) = parsed.total_price {
                    item.total_price = total;
                    if item.quantity > 0 {
                        item.unit_price = total.divide_by_quantity(item.quantity);
                    }
                }
            }
            ItemEdit::Quantity(text) => {
                item.quantity = coerce_quantity(&text);
                item.total_price = item.unit_price.multiply_quantity(item.quantity);
            }
            ItemEdit::UnitPrice(text) => {
                item.unit_price = coerce_amount(&text);
                let quantity = if item.quantity == 0 { 1 } else { item.quantity };
                item.total_price = item.unit_price.multiply_quantity(quantity);
            }
            ItemEdit::TotalPrice(text) => {
                item.total_price = coerce_amount(&text);
                if item.quantity > 0 {
                    item.unit_price = item.total_price.divide_by_quantity(item.quantity);
                }
            }
        }

        self.trim_claims(index);
        Ok(&self.items[index])
    }

    /// Appends a blank item ("Item Baru", quantity 1, free).
    pub fn add_item(&mut self) -> &LineItem {
        self.items
            .push(LineItem::from_unit_price(NEW_ITEM_NAME, 1, Money::zero()));
        &self.items[self.items.len() - 1]
    }

    /// Removes the item at `index`.
    ///
    /// Claims on it are dropped and claims on later items move down one
    /// index, so every selection keeps pointing at the same product.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<LineItem> {
        self.check_item(index)?;
        let removed = self.items.remove(index);

        for person in &mut self.people {
            person.selections = std::mem::take(&mut person.selections)
                .into_iter()
                .filter(|&(i, _)| i != index)
                .map(|(i, qty)| if i > index { (i - 1, qty) } else { (i, qty) })
                .collect();
        }

        Ok(removed)
    }

    /// Lowers claims on `index` until they fit its quantity.
    ///
    /// The most recently added person gives up units first.
    fn trim_claims(&mut self, index: usize) {
        let quantity = self.items[index].quantity.max(0);
        let mut excess = allocation::claimed_quantity(&self.people, index) - quantity;

        for person in self.people.iter_mut().rev() {
            if excess <= 0 {
                break;
            }
            let held = person.claim(index);
            if held == 0 {
                continue;
            }
            let give_up = held.min(excess);
            if held == give_up {
                person.selections.remove(&index);
            } else {
                person.selections.insert(index, held - give_up);
            }
            excess -= give_up;
        }
    }

    // -------------------------------------------------------------------------
    // People
    // -------------------------------------------------------------------------

    /// Adds a person named "Orang N".
    pub fn add_person(&mut self) -> &Person {
        self.add_person_with_prefix(DEFAULT_PERSON_PREFIX)
    }

    /// Adds a person named "`prefix` N", N being the new head count.
    pub fn add_person_with_prefix(&mut self, prefix: &str) -> &Person {
        let name = format!("{} {}", prefix, self.people.len() + 1);
        self.people.push(Person::new(name));
        &self.people[self.people.len() - 1]
    }

    /// Removes a person and everything they claimed.
    pub fn remove_person(&mut self, person_id: &str) -> CoreResult<Person> {
        let position = self.person_position(person_id)?;
        Ok(self.people.remove(position))
    }

    /// Sets or clears (blank name) a person's custom name.
    pub fn rename_person(&mut self, person_id: &str, name: &str) -> CoreResult<&Person> {
        let custom_name = validate_person_name(name)?;
        let position = self.person_position(person_id)?;
        self.people[position].custom_name = custom_name;
        Ok(&self.people[position])
    }

    /// Sets how many units of an item a person claims.
    ///
    /// The request is clamped to `[0, remaining + current claim]` and the
    /// applied value is returned. Zero removes the selection.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::{parse_receipt, BillSession};
    ///
    /// let mut session = BillSession::from_receipt(&parse_receipt("3x Sate Rp30.000"));
    /// let ani = session.add_person().id.clone();
    /// let budi = session.add_person().id.clone();
    ///
    /// assert_eq!(session.set_person_item_quantity(&ani, 0, 2).unwrap(), 2);
    /// assert_eq!(session.set_person_item_quantity(&budi, 0, 5).unwrap(), 1);
    /// assert_eq!(session.remaining_quantity(0), 0);
    /// ```
    pub fn set_person_item_quantity(
        &mut self,
        person_id: &str,
        item_index: usize,
        requested: i64,
    ) -> CoreResult<i64> {
        let position = self.person_position(person_id)?;
        self.check_item(item_index)?;

        let applied = allocation::clamp_claim(
            &self.items,
            &self.people,
            &self.people[position],
            item_index,
            requested,
        );

        let selections = &mut self.people[position].selections;
        if applied == 0 {
            selections.remove(&item_index);
        } else {
            selections.insert(item_index, applied);
        }
        Ok(applied)
    }

    // -------------------------------------------------------------------------
    // Charges
    // -------------------------------------------------------------------------

    pub fn set_discount(&mut self, amount: Money) {
        self.charges.discount = amount.non_negative();
    }

    pub fn set_service_fee(&mut self, amount: Money) {
        self.charges.service_fee = amount.non_negative();
    }

    pub fn set_delivery_fee(&mut self, amount: Money) {
        self.charges.delivery_fee = amount.non_negative();
    }

    /// Sets the manual total override. Zero turns the override off.
    pub fn set_manual_total(&mut self, amount: Money) {
        self.charges.manual_total = amount.non_negative();
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn remaining_quantity(&self, index: usize) -> i64 {
        allocation::remaining_quantity(&self.items, &self.people, index)
    }

    pub fn aggregate_totals(&self) -> AggregateTotals {
        allocation::aggregate_totals(&self.items, &self.charges)
    }

    pub fn person_breakdown(&self, person_id: &str) -> CoreResult<PersonBreakdown> {
        let person = self.person(person_id)?;
        Ok(allocation::person_breakdown(
            &self.items,
            &self.people,
            &self.charges,
            person,
        ))
    }

    pub fn item_breakdowns(&self) -> Vec<ItemBreakdown> {
        allocation::item_breakdowns(&self.items, self.charges.discount)
    }

    pub fn split_report(&self) -> SplitReport {
        allocation::split_report(&self.items, &self.people, &self.charges)
    }

    // -------------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------------

    /// Snapshot of the session as a serialisable document.
    pub fn to_document(&self) -> SessionDocument {
        SessionDocument {
            created_at: self.created_at,
            items: self.items.clone(),
            people: self.people.clone(),
            charges: self.charges,
        }
    }

    /// Rebuilds a session from a document.
    ///
    /// Stored claims are replayed through [`Self::set_person_item_quantity`]
    /// in document order, so a hand-edited file that over-claims an item
    /// comes back clamped and claims on missing items are dropped. A person
    /// whose id repeats an earlier one gets a fresh id and keeps their claims.
    pub fn from_document(document: SessionDocument) -> Self {
        let SessionDocument {
            created_at,
            items,
            people,
            charges,
        } = document;

        let mut session = BillSession {
            items,
            people: Vec::with_capacity(people.len()),
            charges: Charges::default(),
            created_at,
        };
        session.set_discount(charges.discount);
        session.set_service_fee(charges.service_fee);
        session.set_delivery_fee(charges.delivery_fee);
        session.set_manual_total(charges.manual_total);

        let mut claims = Vec::new();
        let mut seen_ids = HashSet::new();
        for mut person in people {
            if !seen_ids.insert(person.id.clone()) {
                person.id = Uuid::new_v4().to_string();
                seen_ids.insert(person.id.clone());
            }
            let selections = std::mem::take(&mut person.selections);
            claims.push((person.id.clone(), selections));
            session.people.push(person);
        }

        for (person_id, selections) in claims {
            for (index, qty) in selections {
                // Missing items have nothing to claim.
                let _ = session.set_person_item_quantity(&person_id, index, qty);
            }
        }

        session
    }

    /// Reads a session from its JSON document form.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let document: SessionDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    /// Writes the session as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }
}

// =============================================================================
// Session Document
// =============================================================================

/// Serialisable form of a [`BillSession`].
///
/// Documents are not trusted: load them with [`BillSession::from_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub charges: Charges,
}

// =============================================================================
// Unit Tests
// =============================================================================
