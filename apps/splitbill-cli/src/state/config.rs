//! # Configuration State
//!
//! Presentation settings loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SPLITBILL_CURRENCY_SYMBOL=Rp                                       │
//! │     SPLITBILL_FORMAT=json                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/splitbill/config.toml (Linux)                            │
//! │     ~/Library/Application Support/id.splitbill.splitbill/config.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Rp, '.', text, "Orang"                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! currency_symbol = "Rp"
//! thousands_separator = "."
//! default_format = "text"    # text | json
//! person_name_prefix = "Orang"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after loading, so no mutex needed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use splitbill_core::money::group_thousands;
use splitbill_core::{Money, DEFAULT_PERSON_PREFIX, MAX_PERSON_NAME_LEN};
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Output Format
// =============================================================================

/// How command results are printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::Invalid(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Config State
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Currency symbol placed before amounts.
    pub currency_symbol: String,

    /// Digit group separator ("61.000").
    pub thousands_separator: char,

    /// Output format when `--format` is not given.
    pub default_format: OutputFormat,

    /// Prefix of generated person names ("Orang 1").
    pub person_name_prefix: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            currency_symbol: "Rp".to_string(),
            thousands_separator: '.',
            default_format: OutputFormat::Text,
            person_name_prefix: DEFAULT_PERSON_PREFIX.to_string(),
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform config dir)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// file in the platform config dir is not.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.thousands_separator.is_ascii_digit() {
            return Err(ConfigError::Invalid(
                "thousands_separator must not be a digit".into(),
            ));
        }

        let prefix = self.person_name_prefix.trim();
        if prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "person_name_prefix must not be empty".into(),
            ));
        }
        if prefix.chars().count() > MAX_PERSON_NAME_LEN {
            return Err(ConfigError::Invalid(format!(
                "person_name_prefix must be at most {} characters",
                MAX_PERSON_NAME_LEN
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// ## Keys
    /// - `SPLITBILL_CURRENCY_SYMBOL`
    /// - `SPLITBILL_THOUSANDS_SEPARATOR` (first character is used)
    /// - `SPLITBILL_FORMAT` (`text` | `json`)
    /// - `SPLITBILL_PERSON_PREFIX`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(symbol) = lookup("SPLITBILL_CURRENCY_SYMBOL") {
            debug!(symbol = %symbol, "Overriding currency symbol from environment");
            self.currency_symbol = symbol;
        }

        if let Some(separator) = lookup("SPLITBILL_THOUSANDS_SEPARATOR") {
            match separator.chars().next() {
                Some(c) => self.thousands_separator = c,
                None => warn!("Empty thousands separator in environment"),
            }
        }

        if let Some(format) = lookup("SPLITBILL_FORMAT") {
            match format.parse() {
                Ok(parsed) => self.default_format = parsed,
                Err(_) => warn!(format = %format, "Unknown output format in environment"),
            }
        }

        if let Some(prefix) = lookup("SPLITBILL_PERSON_PREFIX") {
            self.person_name_prefix = prefix;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "splitbill", "splitbill")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Formats an amount with the configured symbol and separator.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_cli::state::ConfigState;
    /// use splitbill_core::Money;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_units(61_000)), "Rp61.000");
    /// assert_eq!(config.format_currency(Money::from_units(-40_000)), "-Rp40.000");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            group_thousands(amount.units().unsigned_abs(), self.thousands_separator)
        )
    }
}
