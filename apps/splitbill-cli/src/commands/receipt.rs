//! Receipt commands: `parse`, `paste`, `new`.

use std::path::Path;

use splitbill_core::{parse_pasted_receipt, parse_receipt, BillSession};
use tracing::{debug, info};

use super::render::{render_pasted, render_receipt, render_report};
use super::{read_input, CommandContext};
use crate::error::ApiResult;
use crate::state::SessionState;

/// Parses OCR text with the lenient grammar.
pub fn cmd_parse(input: &Path, ctx: &CommandContext) -> ApiResult<String> {
    let text = read_input(input)?;
    let receipt = parse_receipt(&text);
    debug!(
        platform = %receipt.platform,
        items = receipt.items.len(),
        "Receipt parsed"
    );
    ctx.render(&receipt, render_receipt)
}

/// Parses text with the strict numbered-line grammar.
pub fn cmd_paste(input: &Path, ctx: &CommandContext) -> ApiResult<String> {
    let text = read_input(input)?;
    let receipt = parse_pasted_receipt(&text);
    debug!(
        items = receipt.items.len(),
        bills = receipt.bills.len(),
        "Paste parsed"
    );
    ctx.render(&receipt, render_pasted)
}

/// Parses a receipt into a new session file with `people` default-named
/// people, and prints the opening report.
pub fn cmd_new(input: &Path, people: usize, out: &Path, ctx: &CommandContext) -> ApiResult<String> {
    let text = read_input(input)?;
    let receipt = parse_receipt(&text);

    let mut session = BillSession::from_receipt(&receipt);
    for _ in 0..people {
        session.add_person_with_prefix(&ctx.config.person_name_prefix);
    }

    let state = SessionState::new(session);
    state.save(out)?;
    info!(
        ?out,
        items = receipt.items.len(),
        people,
        "Session created"
    );

    let report = state.with_session(|s| s.split_report());
    ctx.render(&report, render_report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ConfigState, OutputFormat};

    const RECEIPT: &str = "\
gojek
1 2x NasiBabat Rp50.000
1 1x Ayam rendang Rp18.000
Voucher Diskon -Rp40.000
Biaya Pengiriman @ Rp0
Rp28.000
";

    fn json_ctx() -> CommandContext {
        CommandContext::new(ConfigState::default(), Some(OutputFormat::Json))
    }

    #[test]
    fn test_parse_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("receipt.txt");
        std::fs::write(&input, RECEIPT).unwrap();

        let out = cmd_parse(&input, &json_ctx()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["platform"], "Gojek/GoFood");
        assert_eq!(value["items"][0]["unitPrice"], 25_000);
        assert_eq!(value["summary"]["discount"], 40_000);
        assert_eq!(value["summary"]["subtotal"], serde_json::Value::Null);
    }

    #[test]
    fn test_new_writes_session_with_people() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("receipt.txt");
        let session_path = dir.path().join("session.json");
        std::fs::write(&input, RECEIPT).unwrap();

        let config = ConfigState {
            person_name_prefix: "Teman".into(),
            ..ConfigState::default()
        };
        let ctx = CommandContext::new(config, Some(OutputFormat::Text));

        cmd_new(&input, 3, &session_path, &ctx).unwrap();

        let state = SessionState::load(&session_path).unwrap();
        state.with_session(|s| {
            assert_eq!(s.people().len(), 3);
            assert_eq!(s.people()[2].display_name(), "Teman 3");
            assert_eq!(s.charges().manual_total.units(), 28_000);
        });
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_parse(&dir.path().join("nope.txt"), &json_ctx()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::IoError);
    }
}
