//! # Split Bill CLI Library
//!
//! Everything behind the `splitbill` binary. `main.rs` only calls [`run`].
//!
//! ## Module Organization
//! ```text
//! splitbill_cli/
//! ├── lib.rs          ◄─── You are here (logging, config, dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Mutex-guarded bill session + session files
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch and shared helpers
//! │   ├── receipt.rs  ◄─── parse / paste / new
//! │   ├── split.rs    ◄─── claim / edit / people / charges / report
//! │   └── render.rs   ◄─── Text output
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output Streams
//! Results go to stdout; logs and errors go to stderr, so
//! `splitbill report s.json --format json | jq` always sees clean JSON.

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use commands::CommandContext;
use error::ApiError;
use state::{ConfigState, OutputFormat};

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse Arguments ──────────────────────────────────────────────────► │
/// │     • clap derive, global --format / --config / --verbose               │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • RUST_LOG > --verbose > default                                    │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → TOML file → environment                                │
/// │     • an unreadable file falls back to defaults with a warning          │
/// │                                                                         │
/// │  4. Dispatch Command ─────────────────────────────────────────────────► │
/// │     • output on stdout, errors on stderr                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting splitbill");

    let config = ConfigState::load_or_default(cli.config.as_deref());
    let ctx = CommandContext::new(config, cli.format);

    match commands::dispatch(cli.command, &ctx) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err, ctx.format);
            ExitCode::FAILURE
        }
    }
}

/// Prints a command failure to stderr.
fn report_error(err: &ApiError, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(err) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", err),
        },
        OutputFormat::Text => eprintln!("error: {}", err),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages from every crate
/// - `--verbose` - Same as `RUST_LOG=debug`
/// - Default: warnings, plus INFO from this crate
fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn,splitbill_cli=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
