//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::state::OutputFormat;

/// Split Bill - share a food-delivery bill fairly
#[derive(Debug, Parser)]
#[command(name = "splitbill")]
#[command(about = "Parse delivery receipts and split the bill between people", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse OCR text of a receipt
    Parse {
        /// Text file, or - for stdin
        input: PathBuf,
    },

    /// Parse text with the strict numbered-line grammar
    Paste {
        /// Text file, or - for stdin
        input: PathBuf,
    },

    /// Start a session file from a receipt
    New {
        /// Text file, or - for stdin
        input: PathBuf,

        /// Number of people sharing the bill
        #[arg(short, long, default_value = "2")]
        people: usize,

        /// Session file to create
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Set how many units of an item a person takes
    Claim {
        /// Session file
        session: PathBuf,

        /// Person id or name
        #[arg(short, long)]
        person: String,

        /// Item index (see `report`)
        #[arg(short, long)]
        item: usize,

        /// Units to claim; 0 releases the item
        #[arg(short, long, allow_negative_numbers = true)]
        qty: i64,
    },

    /// Edit one field of an item
    Edit {
        /// Session file
        session: PathBuf,

        /// Item index
        #[arg(short, long)]
        item: usize,

        /// Field to change
        #[arg(short, long, value_enum)]
        field: ItemField,

        /// New value, as typed
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },

    /// Append a blank item
    AddItem {
        /// Session file
        session: PathBuf,
    },

    /// Delete an item and release its claims
    RemoveItem {
        /// Session file
        session: PathBuf,

        /// Item index
        #[arg(short, long)]
        item: usize,
    },

    /// Add a person with a generated name
    AddPerson {
        /// Session file
        session: PathBuf,
    },

    /// Remove a person and their claims
    RemovePerson {
        /// Session file
        session: PathBuf,

        /// Person id or name
        #[arg(short, long)]
        person: String,
    },

    /// Give a person a custom name (empty restores the default)
    RenamePerson {
        /// Session file
        session: PathBuf,

        /// Person id or name
        #[arg(short, long)]
        person: String,

        /// New name
        #[arg(short, long)]
        name: String,
    },

    /// Set discount and fees; omitted values are left alone
    Charges {
        /// Session file
        session: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        discount: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        service_fee: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        delivery_fee: Option<String>,

        /// Printed total; 0 turns the override off
        #[arg(long, allow_hyphen_values = true)]
        manual_total: Option<String>,
    },

    /// Show the split
    Report {
        /// Session file
        session: PathBuf,
    },
}

/// Editable item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ItemField {
    Name,
    Quantity,
    UnitPrice,
    TotalPrice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_claim() {
        let cli = Cli::try_parse_from([
            "splitbill", "claim", "s.json", "--person", "Budi", "--item", "2", "--qty", "-1",
        ])
        .unwrap();
        match cli.command {
            Commands::Claim {
                person, item, qty, ..
            } => {
                assert_eq!(person, "Budi");
                assert_eq!(item, 2);
                assert_eq!(qty, -1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["splitbill", "report", "s.json", "--format", "json", "-v"])
            .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.verbose);
    }

    #[test]
    fn test_edit_field_names() {
        let cli = Cli::try_parse_from([
            "splitbill", "edit", "s.json", "--item", "0", "--field", "unit-price", "--value", "500",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Edit {
                field: ItemField::UnitPrice,
                ..
            }
        ));
    }
}
