//! # Split Bill CLI Entry Point
//!
//! Usage:
//!   splitbill parse receipt.txt                      Parse OCR text
//!   splitbill new receipt.txt --people 3 -o s.json   Start a session
//!   splitbill claim s.json -p Budi -i 0 -q 2         Claim units of an item
//!   splitbill report s.json                          Show who pays what
//!
//! The setup lives in lib.rs for testability.

use std::process::ExitCode;

fn main() -> ExitCode {
    splitbill_cli::run()
}
