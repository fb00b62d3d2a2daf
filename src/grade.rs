#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grading-side assembly: turns execution outcomes into per-test results,
//! debug information, summaries and the envelope persisted for rendering.

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use bon::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    diff::DiffEngine,
    document::{fragments_to_rst, html_to_rst},
    envelope::{
        BackendKind, DebugInfo, Envelope, FileFeedback, GradingFailure, NotebookEntry,
        RenderOptions, Report, TestCase, TestCaseEntry,
    },
    feedback::{FeedbackSummary, GlobalResult},
    i18n::{NullTranslator, Translator},
    render::{CodeRenderer, RenderContext, Suppression, render_failure},
    result::GraderResult,
    sample::input_sample,
    util::escape_html,
};

/// Custom value holding the name of the summary result.
pub const SUMMARY_RESULT_KEY: &str = "summary_result";

/// What the sandbox reports after running a submission on one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct ExecutionOutcome {
    /// Exit code of the submission.
    #[serde(default)]
    #[builder(default)]
    pub return_code: i32,
    /// Standard output.
    #[serde(default)]
    #[builder(default)]
    pub stdout:      String,
    /// Standard error.
    #[serde(default)]
    #[builder(default)]
    pub stderr:      String,
}

/// Decides whether an output is correct.
pub trait OutputChecker {
    /// Whether `actual` matches `expected`.
    fn check(&self, actual: &str, expected: &str) -> bool;
}

/// Compares outputs line by line, ignoring trailing whitespace on each line
/// and trailing blank lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineChecker;

impl LineChecker {
    /// Lines of `text` with trailing whitespace and trailing blank lines
    /// removed.
    fn normalized(text: &str) -> Vec<&str> {
        let mut lines = text.lines().map(str::trim_end).collect::<Vec<_>>();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines
    }
}

impl OutputChecker for LineChecker {
    fn check(&self, actual: &str, expected: &str) -> bool {
        Self::normalized(actual) == Self::normalized(expected)
    }
}

/// Format of the feedback document a grading run publishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// A JSON envelope, rendered later by the host.
    #[default]
    Json,
    /// RST rendered right away.
    Rst,
}

/// Serde default for boolean switches that are on unless disabled.
fn enabled() -> bool {
    true
}

/// Options a task author sets for a code or HDL task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOptions {
    /// Options carried into the envelope.
    #[serde(flatten)]
    pub render:                          RenderOptions,
    /// Whether to compute a diff for every test.
    #[serde(default = "enabled")]
    pub compute_diff:                    bool,
    /// Whether a non-zero exit code is classified from its value rather than
    /// counted as a wrong answer.
    #[serde(default = "enabled")]
    pub treat_non_zero_as_runtime_error: bool,
    /// Format of the published feedback document.
    #[serde(default)]
    pub response_type:                   ResponseType,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            render:                          RenderOptions::default(),
            compute_diff:                    true,
            treat_non_zero_as_runtime_error: true,
            response_type:                   ResponseType::default(),
        }
    }
}

/// One executed test: the files that define it and what the submission did.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct CaseRun {
    /// Path of the input file.
    pub input_file:           String,
    /// Path of the file holding the expected output.
    pub expected_output_file: String,
    /// What the sandbox reported.
    #[serde(flatten)]
    #[builder(default)]
    pub outcome:              ExecutionOutcome,
}

impl CaseRun {
    /// Files that define the test.
    pub fn test_case(&self) -> TestCase {
        TestCase::new(&self.input_file, &self.expected_output_file)
    }
}

/// Grades `multilang` and `hdl` submissions.
pub struct CodeGrader<'a> {
    /// Backend the runs come from.
    backend:    BackendKind,
    /// Task options.
    options:    TaskOptions,
    /// Whether the submission was made by staff.
    is_staff:   bool,
    /// Decides correctness.
    checker:    &'a dyn OutputChecker,
    /// Message lookup for RST feedback.
    translator: &'a dyn Translator,
}

impl<'a> CodeGrader<'a> {
    /// Creates a grader comparing outputs with [`LineChecker`].
    pub fn new(backend: BackendKind, options: TaskOptions) -> Self {
        Self {
            backend,
            options,
            is_staff: false,
            checker: &LineChecker,
            translator: &NullTranslator,
        }
    }

    /// gets the `backend` field
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// gets the `options` field
    pub fn options(&self) -> &TaskOptions {
        &self.options
    }

    /// sets the `is_staff` field
    pub fn set_is_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    /// sets the `checker` field
    pub fn set_checker(mut self, checker: &'a dyn OutputChecker) -> Self {
        self.checker = checker;
        self
    }

    /// sets the `translator` field
    pub fn set_translator(mut self, translator: &'a dyn Translator) -> Self {
        self.translator = translator;
        self
    }

    /// Options written into the envelope.
    fn envelope_options(&self) -> RenderOptions {
        self.options.render.clone().set_is_staff(self.is_staff)
    }

    /// Classifies one run and records its debug information.
    ///
    /// Output text and the diff are HTML-escaped before they are stored.
    pub fn construct_feedback(
        &self,
        input_file: &str,
        outcome: &ExecutionOutcome,
        expected_output: &str,
    ) -> (GraderResult, FileFeedback, FeedbackSummary) {
        let result = if outcome.return_code == 0 {
            if self.checker.check(&outcome.stdout, expected_output) {
                GraderResult::Accepted
            } else {
                GraderResult::WrongAnswer
            }
        } else if self.options.treat_non_zero_as_runtime_error {
            GraderResult::from_return_code(outcome.return_code)
        } else {
            GraderResult::WrongAnswer
        };

        let diff = self.options.compute_diff.then(|| {
            let engine = DiffEngine::from(&self.options.render);
            escape_html(&engine.compute(&outcome.stdout, expected_output))
        });

        let file_feedback = FileFeedback::builder()
            .input_file(input_file)
            .stdout(escape_html(&outcome.stdout))
            .stderr(escape_html(&outcome.stderr))
            .return_code(outcome.return_code)
            .maybe_diff(diff)
            .build();

        let accepted = result.is_accepted();
        let grade = if accepted { 100.0 } else { 0.0 };
        let summary = FeedbackSummary::new(GlobalResult::from_passed(accepted), grade);

        (result, file_feedback, summary)
    }

    /// Grades every run and produces the published summary.
    ///
    /// Expected outputs and input samples are read from disk; failing to read
    /// either is an error.
    pub fn grade(&self, runs: &[CaseRun]) -> Result<FeedbackSummary> {
        ensure!(!runs.is_empty(), "At least one test case must be provided");

        let mut entries = Vec::with_capacity(runs.len());
        let mut debug_info = DebugInfo::new();

        for (i, run) in runs.iter().enumerate() {
            let expected = fs::read_to_string(&run.expected_output_file).with_context(|| {
                format!("Could not read expected output {}", run.expected_output_file)
            })?;
            let (result, file_feedback, _) =
                self.construct_feedback(&run.input_file, &run.outcome, &expected);
            tracing::debug!("Test {} ({}): {}", i + 1, run.input_file, result);

            entries.push(TestCaseEntry {
                i,
                result,
                test_case: run.test_case(),
                input_sample: input_sample(Path::new(&run.input_file))?,
            });
            debug_info = debug_info.with_file(&run.input_file, file_feedback);
        }

        let passed = entries.iter().filter(|entry| entry.result.is_accepted()).count();
        let grade = passed as f64 / entries.len() as f64 * 100.0;
        let summary_result = GraderResult::summarize(entries.iter().map(|entry| entry.result))
            .unwrap_or(GraderResult::InternalError);

        let report = Report::new(entries, self.envelope_options(), debug_info);
        let feedback = match self.options.response_type {
            ResponseType::Json => self.envelope(report).to_json()?,
            ResponseType::Rst => self.render_rst(&report),
        };

        Ok(
            FeedbackSummary::new(GlobalResult::from_passed(passed == runs.len()), grade)
                .set_feedback(feedback)
                .set_custom(SUMMARY_RESULT_KEY, summary_result.name()),
        )
    }

    /// Summary of a submission that did not build.
    pub fn compilation_failure(&self, compilation_output: &str) -> Result<FeedbackSummary> {
        let failure = GradingFailure::Compilation {
            backend: self.backend,
            output:  compilation_output.to_string(),
        };
        let feedback = match self.options.response_type {
            ResponseType::Json => Envelope::Failure(failure).to_json()?,
            ResponseType::Rst => {
                let suppression = Suppression::grading_side();
                let ctx =
                    RenderContext::new(self.translator, &suppression).with_staff(self.is_staff);
                html_to_rst(&render_failure(&failure, &ctx))
            }
        };

        Ok(FeedbackSummary::new(GlobalResult::Failed, 0.0)
            .set_feedback(feedback)
            .set_custom(SUMMARY_RESULT_KEY, GraderResult::CompilationError.name()))
    }

    /// Wraps a report in the envelope variant of this grader's backend.
    fn envelope(&self, report: Report<TestCaseEntry>) -> Envelope {
        match self.backend {
            BackendKind::Hdl => Envelope::Hdl(report),
            _ => Envelope::Multilang(report),
        }
    }

    /// Renders a report straight to RST, hiding detail of accepted tests.
    fn render_rst(&self, report: &Report<TestCaseEntry>) -> String {
        let suppression = Suppression::grading_side();
        let ctx = RenderContext::new(self.translator, &suppression).with_staff(self.is_staff);
        let renderer = CodeRenderer::new(&report.options, &ctx);

        fragments_to_rst(report.entries.iter().map(|entry| match self.backend {
            BackendKind::Hdl => renderer.render_hdl_entry(entry, &report.debug_info),
            _ => renderer.render_entry(entry, &report.debug_info),
        }))
    }
}

/// Summary of a graded notebook.
///
/// The grade is the share of points obtained over the points available.
pub fn grade_notebook(
    entries: Vec<NotebookEntry>,
    options: RenderOptions,
) -> Result<FeedbackSummary> {
    ensure!(!entries.is_empty(), "At least one notebook test must be provided");
    let obtained: f64 = entries.iter().map(|entry| entry.test_result.total).sum();
    let available: f64 = entries.iter().map(|entry| entry.weights).sum();
    let grade = if available > 0.0 {
        obtained / available * 100.0
    } else {
        0.0
    };
    let passed = entries.iter().all(|entry| entry.test_result.result.is_accepted());
    let summary_result =
        GraderResult::summarize(entries.iter().map(|entry| entry.test_result.result));
    let names = entries.iter().map(|entry| entry.test_result.name.as_str()).join(", ");
    tracing::debug!("Graded notebook tests: {names}");

    let feedback = Envelope::Notebook(Report::new(entries, options, DebugInfo::new())).to_json()?;
    let mut summary =
        FeedbackSummary::new(GlobalResult::from_passed(passed), grade).set_feedback(feedback);
    if let Some(summary_result) = summary_result {
        summary = summary.set_custom(SUMMARY_RESULT_KEY, summary_result.name());
    }
    Ok(summary)
}

/// Summary of a notebook that could not be executed.
pub fn notebook_failure(error_name: &str, output: &str) -> Result<FeedbackSummary> {
    let failure = GradingFailure::Notebook {
        error_name: error_name.to_string(),
        output:     output.to_string(),
    };
    Ok(FeedbackSummary::new(GlobalResult::Failed, 0.0)
        .set_feedback(Envelope::Failure(failure).to_json()?)
        .set_custom(SUMMARY_RESULT_KEY, GraderResult::InternalError.name()))
}

/// A complete grading request as read by the command line: task options plus
/// either a build failure or the outcome of every test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingRun {
    /// Backend the runs come from; `multilang` or `hdl`.
    pub backend:            BackendKind,
    /// Task options.
    #[serde(default)]
    pub options:            TaskOptions,
    /// Whether the submission was made by staff.
    #[serde(default)]
    pub is_staff:           bool,
    /// Build output, when the build failed.
    #[serde(default)]
    pub compilation_output: Option<String>,
    /// Executed tests, in order.
    #[serde(default)]
    pub cases:              Vec<CaseRun>,
}

impl GradingRun {
    /// Grades the request.
    pub fn grade(&self, translator: &dyn Translator) -> Result<FeedbackSummary> {
        ensure!(
            self.backend != BackendKind::Notebook,
            "Notebook submissions are graded by the notebook runner"
        );

        let grader = CodeGrader::new(self.backend, self.options.clone())
            .set_is_staff(self.is_staff)
            .set_translator(translator);

        match &self.compilation_output {
            Some(output) => grader.compilation_failure(output),
            None => grader.grade(&self.cases),
        }
    }
}
