#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Message lookup for viewer-facing strings.
//!
//! Renderers never reach for a process-wide translation function; callers
//! hand a [`Translator`] to every render call instead.

use std::{borrow::Cow, collections::HashMap, path::Path};

use anyhow::{Context, Result};

/// Looks up the localized form of a message id.
pub trait Translator {
    /// Returns the translation of `msgid`, or `msgid` itself when none is
    /// known.
    fn gettext<'a>(&'a self, msgid: &'a str) -> Cow<'a, str>;
}

/// Translator that returns every message unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
    fn gettext<'a>(&'a self, msgid: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(msgid)
    }
}

/// Translator backed by a flat `msgid -> msgstr` table.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Known translations.
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Creates a catalog from an existing table.
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Parses a catalog from a JSON object mapping message ids to
    /// translations.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).context("Translation catalog must be a JSON object of strings")?;
        Ok(Self::new(entries))
    }

    /// Reads a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read translation catalog {}", path.display()))?;
        let catalog = Self::from_json_str(&json)
            .with_context(|| format!("Could not parse translation catalog {}", path.display()))?;
        tracing::debug!("Loaded {} translations from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Number of known translations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no translations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for Catalog {
    fn gettext<'a>(&'a self, msgid: &'a str) -> Cow<'a, str> {
        match self.entries.get(msgid) {
            Some(msgstr) if !msgstr.is_empty() => Cow::Borrowed(msgstr.as_str()),
            _ => Cow::Borrowed(msgid),
        }
    }
}
