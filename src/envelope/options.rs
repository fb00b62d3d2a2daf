#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::DecodeError;
use crate::constants::{DEFAULT_DIFF_CONTEXT_LINES, DEFAULT_DIFF_MAX_LINES};

/// Grading subsystem that produced an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Multi-language code runner.
    Multilang,
    /// HDL simulator (VHDL/Verilog).
    Hdl,
    /// Notebook grader.
    Notebook,
}

impl BackendKind {
    /// Wire name stored under `container_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Multilang => "multilang",
            BackendKind::Hdl => "hdl",
            BackendKind::Notebook => "notebook",
        }
    }
}

impl FromStr for BackendKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multilang" => Ok(BackendKind::Multilang),
            "hdl" => Ok(BackendKind::Hdl),
            "notebook" => Ok(BackendKind::Notebook),
            other => Err(DecodeError::UnknownBackend(other.to_string())),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serde default for `diff_max_lines`.
fn default_diff_max_lines() -> Option<usize> {
    Some(DEFAULT_DIFF_MAX_LINES)
}

/// Serde default for `diff_context_lines`.
fn default_diff_context_lines() -> usize {
    DEFAULT_DIFF_CONTEXT_LINES
}

/// Rendering options captured at grading time and carried in the envelope.
///
/// Every field has a default, so a partial (or empty) options record decodes
/// to a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Maximum number of diff lines; `null` on the wire means unbounded.
    #[serde(default = "default_diff_max_lines")]
    diff_max_lines:     Option<usize>,
    /// Context lines around each change.
    #[serde(default = "default_diff_context_lines")]
    diff_context_lines: usize,
    /// Input files whose debug detail may be shown to students.
    #[serde(default)]
    output_diff_for:    BTreeSet<String>,
    /// Extra feedback text per input file.
    #[serde(default)]
    custom_feedback:    BTreeMap<String, String>,
    /// Whether to show a preview of each test's input.
    #[serde(default)]
    show_input:         bool,
    /// Whether the submission was made by staff.
    #[serde(default)]
    is_staff:           bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            diff_max_lines:     default_diff_max_lines(),
            diff_context_lines: default_diff_context_lines(),
            output_diff_for:    BTreeSet::new(),
            custom_feedback:    BTreeMap::new(),
            show_input:         false,
            is_staff:           false,
        }
    }
}

impl RenderOptions {
    /// Creates options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// gets the `diff_max_lines` field
    pub fn diff_max_lines(&self) -> Option<usize> {
        self.diff_max_lines
    }

    /// sets the `diff_max_lines` field
    pub fn set_diff_max_lines(mut self, diff_max_lines: Option<usize>) -> Self {
        self.diff_max_lines = diff_max_lines;
        self
    }

    /// gets the `diff_context_lines` field
    pub fn diff_context_lines(&self) -> usize {
        self.diff_context_lines
    }

    /// sets the `diff_context_lines` field
    pub fn set_diff_context_lines(mut self, diff_context_lines: usize) -> Self {
        self.diff_context_lines = diff_context_lines;
        self
    }

    /// Input files for which students may see debug detail.
    pub fn output_diff_for(&self) -> &BTreeSet<String> {
        &self.output_diff_for
    }

    /// Replaces the disclosure set.
    pub fn set_output_diff_for<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_diff_for = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Whether students may see debug detail for `input_file`.
    pub fn discloses(&self, input_file: &str) -> bool {
        self.output_diff_for.contains(input_file)
    }

    /// Custom feedback texts keyed by input file.
    pub fn custom_feedback(&self) -> &BTreeMap<String, String> {
        &self.custom_feedback
    }

    /// Custom feedback registered for `input_file`, if any.
    pub fn custom_feedback_for(&self, input_file: &str) -> Option<&str> {
        self.custom_feedback.get(input_file).map(String::as_str)
    }

    /// Registers custom feedback for `input_file`.
    pub fn add_custom_feedback(
        mut self,
        input_file: impl Into<String>,
        feedback: impl Into<String>,
    ) -> Self {
        self.custom_feedback.insert(input_file.into(), feedback.into());
        self
    }

    /// gets the `show_input` field
    pub fn show_input(&self) -> bool {
        self.show_input
    }

    /// sets the `show_input` field
    pub fn set_show_input(mut self, show_input: bool) -> Self {
        self.show_input = show_input;
        self
    }

    /// gets the `is_staff` field
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    /// sets the `is_staff` field
    pub fn set_is_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }
}
