//! # Navigator Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     --book household                                                   │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     LEDGER_PROMPT, LEDGER_FORCE_SIGN, LEDGER_AMOUNT_SCALE, LEDGER_LOG  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/ledger/ledger.toml (Linux)                               │
//! │     ~/Library/Application Support/org.ledger.ledger/ledger.toml (macOS)│
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [book]
//! name = "household"
//!
//! [display]
//! force_sign = true
//! amount_scale = 2      # omit to keep each amount's own scale
//!
//! [shell]
//! prompt = "ledger"
//! echo = false
//!
//! [logging]
//! filter = "warn,ledger=info"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, CliResult};

/// Largest accepted `display.amount_scale`.
pub const MAX_AMOUNT_SCALE: usize = 30;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSettings {
    /// Name given to the book the session starts with.
    #[serde(default = "default_book_name")]
    pub name: String,
}

fn default_book_name() -> String {
    "book".to_string()
}

impl Default for BookSettings {
    fn default() -> Self {
        BookSettings {
            name: default_book_name(),
        }
    }
}

/// How amounts are parsed and shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Prefix non-negative balances with `+`.
    #[serde(default = "default_true")]
    pub force_sign: bool,

    /// Fixed number of fractional digits for posted amounts and balances.
    /// Extra digits are truncated toward zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_scale: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            force_sign: true,
            amount_scale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellSettings {
    /// Text shown before the current path in interactive mode.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Repeat each command line on stdout before running it.
    #[serde(default)]
    pub echo: bool,
}

fn default_prompt() -> String {
    "ledger".to_string()
}

impl Default for ShellSettings {
    fn default() -> Self {
        ShellSettings {
            prompt: default_prompt(),
            echo: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "warn,ledger=info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub book: BookSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub shell: ShellSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl CliConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (ledger.toml)
    /// 3. Environment variables
    ///
    /// This runs before logging is initialized, so every problem, including
    /// an unusable environment override, is returned as an error.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        Self::load_from(config_path, |key| std::env::var(key).ok())
    }

    /// [`CliConfig::load`] with environment lookups going through `env`.
    fn load_from<F>(config_path: Option<PathBuf>, env: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            }
        }

        config.apply_env_overrides(env)?;
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file and returns where it went.
    pub fn save(&self, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CliError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.book.name.trim().is_empty() {
            return Err(CliError::InvalidConfig("book.name must not be empty".into()));
        }

        if let Some(scale) = self.display.amount_scale {
            if scale > MAX_AMOUNT_SCALE {
                return Err(CliError::InvalidConfig(format!(
                    "display.amount_scale must be at most {}, got {}",
                    MAX_AMOUNT_SCALE, scale
                )));
            }
        }

        if let Err(e) = EnvFilter::try_new(&self.logging.filter) {
            return Err(CliError::InvalidConfig(format!(
                "logging.filter '{}' is not a valid filter: {}",
                self.logging.filter, e
            )));
        }

        Ok(())
    }

    /// Applies `LEDGER_*` overrides read through `env`.
    fn apply_env_overrides<F>(&mut self, env: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prompt) = env("LEDGER_PROMPT") {
            self.shell.prompt = prompt;
        }

        if let Some(value) = env("LEDGER_FORCE_SIGN") {
            self.display.force_sign = parse_flag(&value).ok_or_else(|| {
                CliError::InvalidConfig(format!(
                    "LEDGER_FORCE_SIGN must be a flag (true/false, yes/no, on/off, 1/0), got '{}'",
                    value
                ))
            })?;
        }

        if let Some(value) = env("LEDGER_AMOUNT_SCALE") {
            let scale = value.parse::<usize>().map_err(|_| {
                CliError::InvalidConfig(format!(
                    "LEDGER_AMOUNT_SCALE must be a whole number, got '{}'",
                    value
                ))
            })?;
            self.display.amount_scale = Some(scale);
        }

        if let Some(filter) = env("LEDGER_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "ledger", "ledger")
            .map(|dirs| dirs.config_dir().join("ledger.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
