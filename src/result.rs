#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Outcome kinds of a single graded test case.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::constants::{MEMORY_LIMIT_EXIT_CODE, TIME_LIMIT_EXIT_CODE};

/// Result of grading one test case.
///
/// Variants are ordered by precedence: when several results are merged into a
/// summary, the lowest one wins. The numeric values are part of the envelope
/// wire format and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum GraderResult {
    /// The submission did not build.
    CompilationError     = 10,
    /// The submission ran out of time.
    TimeLimitExceeded    = 20,
    /// The submission ran out of memory.
    MemoryLimitExceeded  = 30,
    /// The submission crashed or exited with a non-zero code.
    RuntimeError         = 40,
    /// The submission printed more than allowed.
    OutputLimitExceeded  = 50,
    /// The grading code itself failed at runtime.
    GradingRuntimeError  = 60,
    /// Something went wrong outside the submission.
    InternalError        = 70,
    /// Output is right modulo formatting.
    PresentationError    = 80,
    /// Output differs from the expected output.
    WrongAnswer          = 90,
    /// Output matches the expected output.
    Accepted             = 100,
}

/// Raised when a numeric value does not name a [`GraderResult`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{0} is not a known grader result")]
pub struct UnknownResult(pub u32);

impl GraderResult {
    /// Every kind, from highest to lowest precedence.
    pub const ALL: [GraderResult; 10] = [
        GraderResult::CompilationError,
        GraderResult::TimeLimitExceeded,
        GraderResult::MemoryLimitExceeded,
        GraderResult::RuntimeError,
        GraderResult::OutputLimitExceeded,
        GraderResult::GradingRuntimeError,
        GraderResult::InternalError,
        GraderResult::PresentationError,
        GraderResult::WrongAnswer,
        GraderResult::Accepted,
    ];

    /// Stable numeric value used on the wire.
    pub fn value(self) -> u32 {
        self as u32
    }

    /// Upper-case name shown to viewers, e.g. `WRONG_ANSWER`.
    pub fn name(self) -> &'static str {
        match self {
            GraderResult::CompilationError => "COMPILATION_ERROR",
            GraderResult::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            GraderResult::MemoryLimitExceeded => "MEMORY_LIMIT_EXCEEDED",
            GraderResult::RuntimeError => "RUNTIME_ERROR",
            GraderResult::OutputLimitExceeded => "OUTPUT_LIMIT_EXCEEDED",
            GraderResult::GradingRuntimeError => "GRADING_RUNTIME_ERROR",
            GraderResult::InternalError => "INTERNAL_ERROR",
            GraderResult::PresentationError => "PRESENTATION_ERROR",
            GraderResult::WrongAnswer => "WRONG_ANSWER",
            GraderResult::Accepted => "ACCEPTED",
        }
    }

    /// Whether the test case passed.
    pub fn is_accepted(self) -> bool {
        self == GraderResult::Accepted
    }

    /// Classifies a non-zero sandbox exit code.
    ///
    /// * `return_code`: exit code reported by the sandbox for the submission.
    pub fn from_return_code(return_code: i32) -> Self {
        match return_code {
            MEMORY_LIMIT_EXIT_CODE => GraderResult::MemoryLimitExceeded,
            TIME_LIMIT_EXIT_CODE => GraderResult::TimeLimitExceeded,
            _ => GraderResult::RuntimeError,
        }
    }

    /// Merges per-test results into the summary result, i.e. the one with the
    /// highest precedence. Returns `None` for an empty input.
    pub fn summarize<I>(results: I) -> Option<Self>
    where
        I: IntoIterator<Item = GraderResult>,
    {
        results.into_iter().min()
    }
}

impl TryFrom<u32> for GraderResult {
    type Error = UnknownResult;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        GraderResult::ALL
            .into_iter()
            .find(|kind| kind.value() == value)
            .ok_or(UnknownResult(value))
    }
}

impl From<GraderResult> for u32 {
    fn from(value: GraderResult) -> Self {
        value.value()
    }
}

impl Display for GraderResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
