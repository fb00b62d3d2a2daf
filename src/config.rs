#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::Level;

use crate::i18n::{Catalog, NullTranslator, Translator};

/// Environment variable selecting the log level.
pub const LOG_LEVEL_ENV: &str = "GRADER_FEEDBACK_LOG_LEVEL";
/// Environment variable pointing at a JSON translation catalog.
pub const TRANSLATIONS_ENV: &str = "GRADER_FEEDBACK_TRANSLATIONS";
/// Environment variable that reveals `hidden-until` content.
pub const SHOW_EVERYTHING_ENV: &str = "GRADER_FEEDBACK_SHOW_EVERYTHING";
/// Environment variable that renders for a staff viewer.
pub const STAFF_ENV: &str = "GRADER_FEEDBACK_STAFF";

/// Parses a log level name, defaulting to `INFO` when unset or unrecognised.
fn parse_level(val: Option<String>) -> Level {
    match val
        .map(|s| s.trim().to_ascii_lowercase())
        .as_deref()
        .unwrap_or("info")
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Parses a boolean switch; `1`, `true`, `yes` and `on` enable it.
fn parse_flag(val: Option<String>) -> bool {
    matches!(
        val.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// Reads a boolean switch from the environment.
fn read_flag(env: &str) -> bool {
    parse_flag(std::env::var(env).ok())
}

/// Settings of the command line, sourced from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum level of emitted log events.
    log_level:       Level,
    /// JSON translation catalog, if any.
    translations:    Option<PathBuf>,
    /// Reveal content hidden by `hidden-until`.
    show_everything: bool,
    /// Render for a staff viewer.
    staff:           bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level:       Level::INFO,
            translations:    None,
            show_everything: false,
            staff:           false,
        }
    }
}

impl Config {
    /// Reads the configuration from the environment. Call after `.env` has
    /// been loaded.
    pub fn from_env() -> Self {
        let translations = std::env::var(TRANSLATIONS_ENV)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self {
            log_level: parse_level(std::env::var(LOG_LEVEL_ENV).ok()),
            translations,
            show_everything: read_flag(SHOW_EVERYTHING_ENV),
            staff: read_flag(STAFF_ENV),
        }
    }

    /// gets the `log_level` field
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// gets the `translations` field
    pub fn translations(&self) -> Option<&Path> {
        self.translations.as_deref()
    }

    /// sets the `translations` field
    pub fn set_translations(mut self, translations: Option<PathBuf>) -> Self {
        self.translations = translations;
        self
    }

    /// gets the `show_everything` field
    pub fn show_everything(&self) -> bool {
        self.show_everything
    }

    /// sets the `show_everything` field
    pub fn set_show_everything(mut self, show_everything: bool) -> Self {
        self.show_everything = show_everything;
        self
    }

    /// gets the `staff` field
    pub fn staff(&self) -> bool {
        self.staff
    }

    /// sets the `staff` field
    pub fn set_staff(mut self, staff: bool) -> Self {
        self.staff = staff;
        self
    }

    /// Loads the configured translation catalog, or the identity translator
    /// when none is configured.
    pub fn translator(&self) -> Result<Box<dyn Translator>> {
        match self.translations() {
            Some(path) => Ok(Box::new(Catalog::from_json_file(path)?)),
            None => Ok(Box::new(NullTranslator)),
        }
    }
}
