//! # State Module
//!
//! The two pieces of state a command can ask for.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │       SessionState           │  │        ConfigState           │    │
//! │  │                              │  │                              │    │
//! │  │  Arc<Mutex<BillSession>>     │  │  currency_symbol             │    │
//! │  │  loaded from / saved to a    │  │  thousands_separator         │    │
//! │  │  session JSON file           │  │  default_format              │    │
//! │  │                              │  │  person_name_prefix          │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: one mutation at a time through the mutex              │
//! │  • ConfigState: read-only after loading                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{ConfigError, ConfigResult, ConfigState, OutputFormat};
pub use session::SessionState;
