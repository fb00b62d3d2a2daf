#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeMap;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::result::GraderResult;

/// One grading unit: an input file and the file holding its expected output.
///
/// Serialized as a two-element sequence `[input, expected_output]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct TestCase {
    /// Reference to the input file.
    input:           String,
    /// Reference to the expected output file.
    expected_output: String,
}

impl TestCase {
    /// Creates a test case from its two file references.
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input:           input.into(),
            expected_output: expected_output.into(),
        }
    }

    /// Reference to the input file.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Reference to the expected output file.
    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }
}

impl From<(String, String)> for TestCase {
    fn from((input, expected_output): (String, String)) -> Self {
        Self {
            input,
            expected_output,
        }
    }
}

impl From<TestCase> for (String, String) {
    fn from(case: TestCase) -> Self {
        (case.input, case.expected_output)
    }
}

/// Result summary of one test case of a `multilang` or `hdl` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseEntry {
    /// Zero-based test index; shown to viewers as `i + 1`.
    pub i:            usize,
    /// Outcome of the test.
    pub result:       GraderResult,
    /// Files that define the test.
    pub test_case:    TestCase,
    /// Preview of the test input, captured at grading time.
    pub input_sample: String,
}

/// Debug information recorded for one input file.
///
/// Text fields are HTML-escaped by the grader before they are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct FileFeedback {
    /// Input file the run was fed with.
    #[serde(default)]
    #[builder(default)]
    pub input_file:  String,
    /// Standard output of the submission.
    #[serde(default)]
    #[builder(default)]
    pub stdout:      String,
    /// Standard error of the submission.
    #[serde(default)]
    #[builder(default)]
    pub stderr:      String,
    /// Exit code of the submission.
    #[serde(default)]
    #[builder(default)]
    pub return_code: i32,
    /// Diff against the expected output, if one was computed.
    #[serde(default)]
    pub diff:        Option<String>,
}

/// Debug payload of an envelope: per-input-file feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Feedback keyed by input-file reference.
    #[serde(default)]
    pub files_feedback:     BTreeMap<String, FileFeedback>,
    /// Build output, when the build step failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation_output: Option<String>,
}

impl DebugInfo {
    /// Creates an empty debug payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records feedback for `input_file`.
    pub fn with_file(mut self, input_file: impl Into<String>, feedback: FileFeedback) -> Self {
        self.files_feedback.insert(input_file.into(), feedback);
        self
    }

    /// Feedback recorded for `input_file`, if any.
    pub fn file(&self, input_file: &str) -> Option<&FileFeedback> {
        self.files_feedback.get(input_file)
    }

    /// Diff recorded for `input_file`, if any.
    pub fn diff_for(&self, input_file: &str) -> Option<&str> {
        self.file(input_file).and_then(|file| file.diff.as_deref())
    }

    /// Standard error recorded for `input_file`; empty when unknown.
    pub fn stderr_for(&self, input_file: &str) -> &str {
        self.file(input_file)
            .map(|file| file.stderr.as_str())
            .unwrap_or_default()
    }
}

/// Debug information of one case of a notebook test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct NotebookCase {
    /// Whether the case failed with an exception.
    #[builder(default)]
    pub is_runtime_error: bool,
    /// Error raised by the case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:            Option<String>,
    /// Source code the case executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_code:        Option<String>,
    /// Difference between expected and actual output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_output_diff: Option<String>,
}

/// Result of one named notebook test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookTestResult {
    /// Test name shown to viewers.
    pub name:   String,
    /// Outcome of the test.
    pub result: GraderResult,
    /// Per-case debug information keyed by case identifier.
    pub cases:  BTreeMap<String, NotebookCase>,
    /// Points obtained.
    pub total:  f64,
}

/// One test entry of a `notebook` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookEntry {
    /// Zero-based test index.
    pub i:                    usize,
    /// Result of the test.
    pub test_result:          NotebookTestResult,
    /// Points the test is worth.
    pub weights:              f64,
    /// Whether per-case debug information may be shown.
    pub show_debug_info:      bool,
    /// Extra feedback for this test.
    pub test_custom_feedback: Option<String>,
}
