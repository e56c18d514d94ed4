//! Session commands: claims, item and people edits, charges, report.
//!
//! Every mutating command loads the session file, applies exactly one
//! operation under the session lock, and writes the file back.

use std::path::Path;

use serde::Serialize;
use splitbill_core::validation::coerce_amount;
use splitbill_core::{AggregateTotals, Charges, ItemEdit, LineItem, Person};
use tracing::debug;

use super::render::render_report;
use super::CommandContext;
use crate::cli::ItemField;
use crate::error::ApiResult;
use crate::state::{ConfigState, SessionState};

// =============================================================================
// Command Outputs
// =============================================================================

/// Result of a claim update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOutcome {
    pub person_id: String,
    pub display_name: String,
    pub item_index: usize,
    pub item_name: String,
    pub requested: i64,
    /// The claim after clamping.
    pub applied: i64,
    /// Units of the item still unclaimed.
    pub remaining: i64,
}

/// An item together with its position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedItem {
    pub index: usize,
    #[serde(flatten)]
    pub item: LineItem,
}

/// Charges after an update, with the totals they produce.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargesOutcome {
    pub charges: Charges,
    pub totals: AggregateTotals,
}

/// Raw charge values from the command line. `None` leaves a charge as is.
#[derive(Debug, Clone, Default)]
pub struct ChargeUpdate {
    pub discount: Option<String>,
    pub service_fee: Option<String>,
    pub delivery_fee: Option<String>,
    pub manual_total: Option<String>,
}

fn render_item(item: &IndexedItem, config: &ConfigState) -> String {
    format!(
        "Item {}: {} {}x @ {} = {}",
        item.index,
        item.item.name,
        item.item.quantity,
        config.format_currency(item.item.unit_price),
        config.format_currency(item.item.total_price)
    )
}

fn render_person(person: &Person, _config: &ConfigState) -> String {
    format!("{} ({})", person.display_name(), person.id)
}

// =============================================================================
// Claims
// =============================================================================

/// Sets one person's claim on one item.
pub fn cmd_claim(
    path: &Path,
    person: &str,
    item: usize,
    qty: i64,
    ctx: &CommandContext,
) -> ApiResult<String> {
    let state = SessionState::load(path)?;

    let outcome = state.with_session_mut(|session| -> ApiResult<ClaimOutcome> {
        let target = session.resolve_person(person)?;
        let person_id = target.id.clone();
        let display_name = target.display_name().to_string();

        let applied = session.set_person_item_quantity(&person_id, item, qty)?;
        Ok(ClaimOutcome {
            person_id,
            display_name,
            item_index: item,
            item_name: session.items()[item].name.clone(),
            requested: qty,
            applied,
            remaining: session.remaining_quantity(item),
        })
    })?;

    debug!(
        person = %outcome.person_id,
        item,
        requested = qty,
        applied = outcome.applied,
        "Claim updated"
    );
    state.save(path)?;

    ctx.render(&outcome, |o, _| {
        let mut text = format!(
            "{} now takes {}x {} ({} left)",
            o.display_name, o.applied, o.item_name, o.remaining
        );
        if o.applied != o.requested {
            text.push_str(&format!(" [requested {}, clamped]", o.requested));
        }
        text
    })
}

// =============================================================================
// Items
// =============================================================================

/// Edits one field of an item.
pub fn cmd_edit(
    path: &Path,
    item: usize,
    field: ItemField,
    value: String,
    ctx: &CommandContext,
) -> ApiResult<String> {
    let edit = match field {
        ItemField::Name => ItemEdit::Name(value),
        ItemField::Quantity => ItemEdit::Quantity(value),
        ItemField::UnitPrice => ItemEdit::UnitPrice(value),
        ItemField::TotalPrice => ItemEdit::TotalPrice(value),
    };

    let state = SessionState::load(path)?;
    let edited = state.with_session_mut(|session| {
        session.edit_item(item, edit).map(|edited| IndexedItem {
            index: item,
            item: edited.clone(),
        })
    })?;
    debug!(item, ?field, "Item edited");
    state.save(path)?;

    ctx.render(&edited, render_item)
}

/// Appends a blank item.
pub fn cmd_add_item(path: &Path, ctx: &CommandContext) -> ApiResult<String> {
    let state = SessionState::load(path)?;
    let added = state.with_session_mut(|session| {
        let item = session.add_item().clone();
        IndexedItem {
            index: session.items().len() - 1,
            item,
        }
    });
    state.save(path)?;

    ctx.render(&added, render_item)
}

/// Removes an item; claims on later items are re-indexed.
pub fn cmd_remove_item(path: &Path, item: usize, ctx: &CommandContext) -> ApiResult<String> {
    let state = SessionState::load(path)?;
    let removed = state.with_session_mut(|session| session.remove_item(item))?;
    debug!(item, name = %removed.name, "Item removed");
    state.save(path)?;

    let removed = IndexedItem {
        index: item,
        item: removed,
    };
    ctx.render(&removed, |r, config| format!("Removed {}", render_item(r, config)))
}

// =============================================================================
// People
// =============================================================================

pub fn cmd_add_person(path: &Path, ctx: &CommandContext) -> ApiResult<String> {
    let state = SessionState::load(path)?;
    let person = state.with_session_mut(|session| {
        session
            .add_person_with_prefix(&ctx.config.person_name_prefix)
            .clone()
    });
    state.save(path)?;

    ctx.render(&person, render_person)
}

/// Removes a person; their claims go back to the pool.
pub fn cmd_remove_person(path: &Path, person: &str, ctx: &CommandContext) -> ApiResult<String> {
    let state = SessionState::load(path)?;
    let removed = state.with_session_mut(|session| -> ApiResult<Person> {
        let id = session.resolve_person(person)?.id.clone();
        Ok(session.remove_person(&id)?)
    })?;
    state.save(path)?;

    ctx.render(&removed, |p, config| format!("Removed {}", render_person(p, config)))
}

pub fn cmd_rename_person(
    path: &Path,
    person: &str,
    name: &str,
    ctx: &CommandContext,
) -> ApiResult<String> {
    let state = SessionState::load(path)?;
    let renamed = state.with_session_mut(|session| -> ApiResult<Person> {
        let id = session.resolve_person(person)?.id.clone();
        Ok(session.rename_person(&id, name)?.clone())
    })?;
    state.save(path)?;

    ctx.render(&renamed, render_person)
}

// =============================================================================
// Charges & Report
// =============================================================================

/// Sets any of the four charges. Values are coerced like form input.
pub fn cmd_charges(path: &Path, update: ChargeUpdate, ctx: &CommandContext) -> ApiResult<String> {
    let state = SessionState::load(path)?;
    let outcome = state.with_session_mut(|session| {
        if let Some(text) = &update.discount {
            session.set_discount(coerce_amount(text));
        }
        if let Some(text) = &update.service_fee {
            session.set_service_fee(coerce_amount(text));
        }
        if let Some(text) = &update.delivery_fee {
            session.set_delivery_fee(coerce_amount(text));
        }
        if let Some(text) = &update.manual_total {
            session.set_manual_total(coerce_amount(text));
        }
        ChargesOutcome {
            charges: *session.charges(),
            totals: session.aggregate_totals(),
        }
    });
    state.save(path)?;

    ctx.render(&outcome, |o, config| {
        format!(
            "Discount {}, service fee {}, delivery fee {}, total {}",
            config.format_currency(o.charges.discount),
            config.format_currency(o.charges.service_fee),
            config.format_currency(o.charges.delivery_fee),
            config.format_currency(o.totals.final_total)
        )
    })
}

/// Prints the full split.
pub fn cmd_report(path: &Path, ctx: &CommandContext) -> ApiResult<String> {
    let state = SessionState::load(path)?;
    let report = state.with_session(|session| session.split_report());
    ctx.render(&report, render_report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::OutputFormat;
    use splitbill_core::{parse_receipt, BillSession};
    use tempfile::TempDir;

    fn setup() -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = BillSession::from_receipt(&parse_receipt(
            "1 2x Martabak Rp60.000\n1 1x Es teh Rp5.000\nBiaya Layanan Rp2.000",
        ));
        session.add_person();
        session.add_person();
        SessionState::new(session).save(&path).unwrap();
        (dir, path)
    }

    fn text() -> CommandContext {
        CommandContext::new(ConfigState::default(), Some(OutputFormat::Text))
    }

    fn json() -> CommandContext {
        CommandContext::new(ConfigState::default(), Some(OutputFormat::Json))
    }

    fn load(path: &Path) -> BillSession {
        SessionState::load(path)
            .unwrap()
            .with_session(|s| s.clone())
    }

    #[test]
    fn test_claim_by_name_is_clamped_and_saved() {
        let (_dir, path) = setup();
        let out = cmd_claim(&path, "orang 1", 0, 5, &text()).unwrap();
        assert!(out.contains("Orang 1 now takes 2x Martabak (0 left)"));
        assert!(out.contains("clamped"));

        let session = load(&path);
        assert_eq!(session.people()[0].claim(0), 2);
        assert_eq!(session.remaining_quantity(0), 0);
    }

    #[test]
    fn test_claim_unknown_person() {
        let (_dir, path) = setup();
        let err = cmd_claim(&path, "Siapa", 0, 1, &text()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_claim_unknown_item_leaves_file_untouched() {
        let (_dir, path) = setup();
        let before = std::fs::read_to_string(&path).unwrap();
        let err = cmd_claim(&path, "Orang 1", 7, 1, &text()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_edit_quantity_trims_claims() {
        let (_dir, path) = setup();
        cmd_claim(&path, "Orang 1", 0, 1, &text()).unwrap();
        cmd_claim(&path, "Orang 2", 0, 1, &text()).unwrap();

        let out = cmd_edit(&path, 0, ItemField::Quantity, "1".into(), &json()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["index"], 0);
        assert_eq!(value["totalPrice"], 30_000);

        let session = load(&path);
        assert_eq!(session.people()[0].claim(0), 1);
        assert_eq!(session.people()[1].claim(0), 0);
    }

    #[test]
    fn test_add_and_remove_item() {
        let (_dir, path) = setup();
        let out = cmd_add_item(&path, &text()).unwrap();
        assert!(out.starts_with("Item 2: Item Baru 1x"));

        cmd_claim(&path, "Orang 2", 1, 1, &text()).unwrap();
        cmd_remove_item(&path, 0, &text()).unwrap();

        let session = load(&path);
        assert_eq!(session.items().len(), 2);
        assert_eq!(session.items()[0].name, "Es teh");
        assert_eq!(session.people()[1].claim(0), 1);
    }

    #[test]
    fn test_people_commands() {
        let (_dir, path) = setup();
        cmd_add_person(&path, &text()).unwrap();
        cmd_rename_person(&path, "Orang 3", "Citra", &text()).unwrap();
        cmd_remove_person(&path, "Orang 1", &text()).unwrap();

        let session = load(&path);
        let names: Vec<&str> = session.people().iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["Orang 2", "Citra"]);
    }

    #[test]
    fn test_rename_too_long_is_validation_error() {
        let (_dir, path) = setup();
        let err = cmd_rename_person(&path, "Orang 1", &"n".repeat(80), &text()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_charges_coerce_input() {
        let (_dir, path) = setup();
        let update = ChargeUpdate {
            discount: Some("10000".into()),
            delivery_fee: Some("-5".into()),
            manual_total: Some("abc".into()),
            ..ChargeUpdate::default()
        };
        let out = cmd_charges(&path, update, &json()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["charges"]["discount"], 10_000);
        assert_eq!(value["charges"]["deliveryFee"], 0);
        assert_eq!(value["charges"]["serviceFee"], 2_000);
        assert_eq!(value["totals"]["finalTotal"], 65_000 - 10_000 + 2_000);
    }

    #[test]
    fn test_report_json() {
        let (_dir, path) = setup();
        cmd_claim(&path, "Orang 1", 0, 2, &text()).unwrap();
        cmd_claim(&path, "Orang 2", 1, 1, &text()).unwrap();

        let out = cmd_report(&path, &json()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["people"][0]["serviceFee"], 1_846);
        assert_eq!(value["people"][1]["serviceFee"], 154);
        assert_eq!(value["peopleTotal"], 67_000);
        assert_eq!(value["unclaimed"].as_array().unwrap().len(), 0);
    }
}
