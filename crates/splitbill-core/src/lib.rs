//! # splitbill-core: Receipt Parsing and Bill Allocation
//!
//! Pure logic for splitting a food-delivery bill. No I/O: OCR, files and
//! rendering belong to the host application.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Split Bill Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              OCR (external) ──► raw receipt text                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    splitbill-cli (host)                         │   │
//! │  │    parse, claim, edit, charges, report                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ splitbill-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  parser   │  │allocation │  │  session  │  │   money   │  │   │
//! │  │   │  receipt  │  │  totals   │  │ BillSess. │  │   Money   │  │   │
//! │  │   │  paste    │  │  shares   │  │ document  │  │  rounding │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • DETERMINISTIC                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`parser`] - OCR text → [`ParsedReceipt`], plus the strict paste grammar
//! - [`allocation`] - Aggregate and per-person totals
//! - [`session`] - The editable bill document and its mutations
//! - [`money`] - Whole-Rupiah integer amounts
//! - [`types`] - Domain types (LineItem, Person, Charges, etc.)
//! - [`validation`] - Form input coercion and name checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use splitbill_core::{parse_receipt, BillSession};
//!
//! let receipt = parse_receipt("1 2x Martabak Rp60.000\nBiaya Pengiriman Rp5.000");
//! let mut session = BillSession::from_receipt(&receipt);
//! let ani = session.add_person().id.clone();
//! let budi = session.add_person().id.clone();
//!
//! session.set_person_item_quantity(&ani, 0, 1).unwrap();
//! session.set_person_item_quantity(&budi, 0, 1).unwrap();
//!
//! let report = session.split_report();
//! assert_eq!(report.people[0].total.units(), 32_500);
//! assert_eq!(report.people[1].total.units(), 32_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod error;
pub mod money;
pub mod parser;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocation::{AggregateTotals, ItemBreakdown, PersonBreakdown, SplitReport};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use parser::{parse_item_name, parse_pasted_receipt, parse_receipt};
pub use session::{BillSession, ItemEdit, SessionDocument};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name given to items added by hand.
pub const NEW_ITEM_NAME: &str = "Item Baru";

/// Prefix of generated person names ("Orang 1", "Orang 2", ...).
pub const DEFAULT_PERSON_PREFIX: &str = "Orang";

/// Maximum length of a custom person name, in characters.
pub const MAX_PERSON_NAME_LEN: usize = 50;

/// Maximum length of an item name, in characters.
///
/// OCR lines pasted into the name field can be long; this still catches a
/// whole receipt pasted by mistake.
pub const MAX_ITEM_NAME_LEN: usize = 200;
