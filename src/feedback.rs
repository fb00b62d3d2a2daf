#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grading summaries and the host feedback store they are published to.

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of every custom value written to the store.
const CUSTOM_PREFIX: &str = "custom_";

/// Overall verdict of a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalResult {
    /// Every test passed.
    Success,
    /// At least one test did not pass.
    #[default]
    Failed,
}

impl GlobalResult {
    /// `Success` when `passed`, `Failed` otherwise.
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            GlobalResult::Success
        } else {
            GlobalResult::Failed
        }
    }

    /// Wire name of the verdict.
    pub fn as_str(self) -> &'static str {
        match self {
            GlobalResult::Success => "success",
            GlobalResult::Failed => "failed",
        }
    }
}

impl Display for GlobalResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `global` section of a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    /// Overall verdict.
    pub result:   GlobalResult,
    /// Feedback document shown to the viewer (an envelope or RST).
    #[serde(default)]
    pub feedback: String,
}

/// What a grading run reports to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    /// Verdict and feedback document.
    pub global: GlobalSummary,
    /// Grade in `[0, 100]`.
    pub grade:  f64,
    /// Extra values, published with a `custom_` prefix.
    #[serde(default)]
    pub custom: BTreeMap<String, Value>,
}

impl FeedbackSummary {
    /// Creates a summary with no feedback document and no custom values.
    pub fn new(result: GlobalResult, grade: f64) -> Self {
        Self {
            global: GlobalSummary {
                result,
                feedback: String::new(),
            },
            grade: grade.clamp(0.0, 100.0),
            custom: BTreeMap::new(),
        }
    }

    /// Overall verdict.
    pub fn result(&self) -> GlobalResult {
        self.global.result
    }

    /// Grade in `[0, 100]`.
    pub fn grade(&self) -> f64 {
        self.grade
    }

    /// Feedback document.
    pub fn feedback(&self) -> &str {
        &self.global.feedback
    }

    /// sets the `feedback` field
    pub fn set_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.global.feedback = feedback.into();
        self
    }

    /// Adds a custom value.
    pub fn set_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

/// The host's feedback storage API.
pub trait FeedbackStore {
    /// Stores an extra value under `key`.
    fn set_custom_value(&mut self, key: &str, value: Value);
    /// Stores the overall verdict.
    fn set_global_result(&mut self, result: GlobalResult);
    /// Stores the grade.
    fn set_grade(&mut self, grade: f64);
    /// Stores the feedback document.
    fn set_global_feedback(&mut self, feedback: &str);
}

/// Writes `summary` to `store`: custom values first, then the verdict, the
/// grade and the feedback document.
pub fn publish(summary: &FeedbackSummary, store: &mut dyn FeedbackStore) {
    for (key, value) in &summary.custom {
        store.set_custom_value(&format!("{CUSTOM_PREFIX}{key}"), value.clone());
    }

    store.set_global_result(summary.result());
    store.set_grade(summary.grade());
    store.set_global_feedback(summary.feedback());
    tracing::debug!(
        "Published feedback: {} with grade {:.2}",
        summary.result(),
        summary.grade()
    );
}

/// In-memory feedback store; what the CLI prints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Overall verdict, once set.
    pub result:   Option<GlobalResult>,
    /// Grade, once set.
    pub grade:    Option<f64>,
    /// Feedback document, once set.
    pub feedback: Option<String>,
    /// Custom values, keyed with their prefix.
    pub custom:   BTreeMap<String, Value>,
}

impl FeedbackStore for FeedbackRecord {
    fn set_custom_value(&mut self, key: &str, value: Value) {
        self.custom.insert(key.to_string(), value);
    }

    fn set_global_result(&mut self, result: GlobalResult) {
        self.result = Some(result);
    }

    fn set_grade(&mut self, grade: f64) {
        self.grade = Some(grade);
    }

    fn set_global_feedback(&mut self, feedback: &str) {
        self.feedback = Some(feedback.to_string());
    }
}
