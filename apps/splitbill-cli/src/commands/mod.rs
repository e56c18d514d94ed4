//! # Commands Module
//!
//! Command implementations, one function per subcommand.
//!
//! ## Command Pattern
//! Every command:
//! 1. Reads its input (receipt text or session file)
//! 2. Applies one operation through the session state
//! 3. Writes the session back if it changed
//! 4. Returns the rendered output as a string
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Module Organization                          │
//! │                                                                         │
//! │  commands/                                                              │
//! │  ├── mod.rs       ◄─── dispatch, CommandContext, input helpers          │
//! │  ├── receipt.rs   ◄─── parse, paste, new                                │
//! │  ├── split.rs     ◄─── claim, edit, items, people, charges, report      │
//! │  └── render.rs    ◄─── text rendering                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod receipt;
pub mod render;
pub mod split;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::cli::Commands;
use crate::error::ApiResult;
use crate::state::{ConfigState, OutputFormat};

/// What every command gets besides its own arguments.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: ConfigState,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(config: ConfigState, format: Option<OutputFormat>) -> Self {
        let format = format.unwrap_or(config.default_format);
        CommandContext { config, format }
    }

    /// Renders `value` as JSON or, in text mode, with `text`.
    pub fn render<T, F>(&self, value: &T, text: F) -> ApiResult<String>
    where
        T: Serialize,
        F: FnOnce(&T, &ConfigState) -> String,
    {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Text => Ok(text(value, &self.config)),
        }
    }
}

/// Runs one parsed subcommand.
pub fn dispatch(command: Commands, ctx: &CommandContext) -> ApiResult<String> {
    debug!(?command, format = ?ctx.format, "Dispatching command");

    match command {
        Commands::Parse { input } => receipt::cmd_parse(&input, ctx),
        Commands::Paste { input } => receipt::cmd_paste(&input, ctx),
        Commands::New { input, people, out } => receipt::cmd_new(&input, people, &out, ctx),
        Commands::Claim {
            session,
            person,
            item,
            qty,
        } => split::cmd_claim(&session, &person, item, qty, ctx),
        Commands::Edit {
            session,
            item,
            field,
            value,
        } => split::cmd_edit(&session, item, field, value, ctx),
        Commands::AddItem { session } => split::cmd_add_item(&session, ctx),
        Commands::RemoveItem { session, item } => split::cmd_remove_item(&session, item, ctx),
        Commands::AddPerson { session } => split::cmd_add_person(&session, ctx),
        Commands::RemovePerson { session, person } => {
            split::cmd_remove_person(&session, &person, ctx)
        }
        Commands::RenamePerson {
            session,
            person,
            name,
        } => split::cmd_rename_person(&session, &person, &name, ctx),
        Commands::Charges {
            session,
            discount,
            service_fee,
            delivery_fee,
            manual_total,
        } => split::cmd_charges(
            &session,
            split::ChargeUpdate {
                discount,
                service_fee,
                delivery_fee,
                manual_total,
            },
            ctx,
        ),
        Commands::Report { session } => split::cmd_report(&session, ctx),
    }
}

/// Reads a text file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> ApiResult<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}
