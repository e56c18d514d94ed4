//! Plain-text rendering of command results.
//!
//! JSON output needs nothing here: it is the serde form of the same values.

use splitbill_core::allocation::PersonBreakdown;
use splitbill_core::{LineItem, ParsedReceipt, PastedReceipt, SplitReport};

use crate::state::ConfigState;

/// Item table: index, name, quantity, unit price, line total.
fn item_rows(items: &[LineItem], config: &ConfigState) -> Vec<String> {
    if items.is_empty() {
        return vec!["  (no items)".to_string()];
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "  {:>3}  {:<28} {:>4}x {:>12} {:>12}",
                index,
                item.name,
                item.quantity,
                config.format_currency(item.unit_price),
                config.format_currency(item.total_price),
            )
        })
        .collect()
}

fn labelled(label: &str, value: String) -> String {
    format!("  {:<20} {:>14}", label, value)
}

pub fn render_receipt(receipt: &ParsedReceipt, config: &ConfigState) -> String {
    let mut lines = vec![format!("Platform: {}", receipt.platform), String::new()];
    lines.push("Items".to_string());
    lines.extend(item_rows(&receipt.items, config));
    lines.push(String::new());
    lines.push("Summary".to_string());

    let summary = &receipt.summary;
    let fields = [
        ("Subtotal", summary.subtotal),
        ("Discount", summary.discount),
        ("Delivery fee", summary.delivery_fee),
        ("Service fee", summary.service_fee),
        ("Total", summary.total),
    ];
    for (label, value) in fields {
        let shown = value.map_or_else(|| "-".to_string(), |v| config.format_currency(v));
        lines.push(labelled(label, shown));
    }

    lines.join("\n")
}

pub fn render_pasted(receipt: &PastedReceipt, config: &ConfigState) -> String {
    let mut lines = vec!["Items".to_string()];
    if receipt.items.is_empty() {
        lines.push("  (no items)".to_string());
    }
    for item in &receipt.items {
        lines.push(format!(
            "  {:>4}x {:<28} {:>12}",
            item.quantity,
            item.name,
            config.format_currency(item.total_price)
        ));
    }

    lines.push(String::new());
    lines.push("Bill lines".to_string());
    if receipt.bills.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(receipt.bills.iter().map(|bill| format!("  {}", bill)));

    lines.join("\n")
}

fn person_block(person: &PersonBreakdown, config: &ConfigState) -> Vec<String> {
    let mut lines = vec![format!("{}  ({})", person.display_name, person.person_id)];
    if person.lines.is_empty() {
        lines.push("  nothing claimed".to_string());
        return lines;
    }

    for line in &person.lines {
        lines.push(format!(
            "  {:>3}  {:>3}x {:<24} {:>12}",
            line.item_index,
            line.quantity,
            line.name,
            config.format_currency(line.amount)
        ));
    }
    lines.push(labelled("Items", config.format_currency(person.items_total)));
    lines.push(labelled("Discount", config.format_currency(-person.discount)));
    lines.push(labelled("Service fee", config.format_currency(person.service_fee)));
    lines.push(labelled("Delivery fee", config.format_currency(person.delivery_fee)));
    lines.push(labelled("Pays", config.format_currency(person.total)));
    lines
}

pub fn render_report(report: &SplitReport, config: &ConfigState) -> String {
    let totals = &report.totals;
    let computed = totals.subtotal + totals.service_fee + totals.delivery_fee;

    let mut lines = vec!["Items".to_string()];
    if report.items.is_empty() {
        lines.push("  (no items)".to_string());
    }
    for row in &report.items {
        lines.push(format!(
            "  {:>3}  {:<28} {:>4}x {:>12} {:>12}  net {:>12} ({} each)",
            row.item_index,
            row.name,
            row.quantity,
            config.format_currency(row.unit_price),
            config.format_currency(row.total_price),
            config.format_currency(row.net_total),
            config.format_currency(row.per_unit),
        ));
    }

    lines.push(String::new());
    lines.push("Bill".to_string());
    lines.push(labelled("Items total", config.format_currency(totals.items_total)));
    lines.push(labelled("Discount", config.format_currency(-totals.discount)));
    lines.push(labelled("Subtotal", config.format_currency(totals.subtotal)));
    lines.push(labelled("Service fee", config.format_currency(totals.service_fee)));
    lines.push(labelled("Delivery fee", config.format_currency(totals.delivery_fee)));
    if totals.final_total == computed {
        lines.push(labelled("Total", config.format_currency(totals.final_total)));
    } else {
        lines.push(labelled("Total (printed)", config.format_currency(totals.final_total)));
        lines.push(labelled("Total (computed)", config.format_currency(computed)));
    }

    for person in &report.people {
        lines.push(String::new());
        lines.extend(person_block(person, config));
    }

    lines.push(String::new());
    lines.push(labelled("Everyone pays", config.format_currency(report.people_total)));

    if !report.unclaimed.is_empty() {
        lines.push(String::new());
        lines.push("Unclaimed".to_string());
        for item in &report.unclaimed {
            lines.push(format!(
                "  {:>3}  {:<28} {:>4} left",
                item.item_index, item.name, item.remaining
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitbill_core::{parse_pasted_receipt, parse_receipt, BillSession};

    #[test]
    fn test_render_receipt_shows_missing_fields() {
        let receipt = parse_receipt("gofood\n1 2x NasiBabat Rp50.000\nRp61.000");
        let text = render_receipt(&receipt, &ConfigState::default());
        assert!(text.contains("Platform: Gojek/GoFood"));
        assert!(text.contains("NasiBabat"));
        assert!(text.contains("Rp25.000"));
        assert!(text.contains("Rp61.000"));
        assert!(text.lines().any(|l| l.contains("Subtotal") && l.trim_end().ends_with('-')));
    }

    #[test]
    fn test_render_pasted() {
        let receipt = parse_pasted_receipt("1 2x Nasi Rp50.000\nRp61.000");
        let text = render_pasted(&receipt, &ConfigState::default());
        assert!(text.contains("Rp50.000"));
        assert!(text.contains("  Rp61.000"));
    }

    #[test]
    fn test_render_report_marks_printed_total() {
        let mut session = BillSession::from_receipt(&parse_receipt(
            "1 2x Martabak Rp60.000\nBiaya Pengiriman Rp5.000\nRp70.000",
        ));
        let id = session.add_person().id.clone();
        session.set_person_item_quantity(&id, 0, 1).unwrap();

        let text = render_report(&session.split_report(), &ConfigState::default());
        assert!(text.contains("Total (printed)"));
        assert!(text.contains("Rp70.000"));
        assert!(text.contains("Orang 1"));
        assert!(text.contains("Unclaimed"));
    }
}
