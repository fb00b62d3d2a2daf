#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Turns decoded envelopes into role-gated, collapsible HTML feedback.

/// Typed fragment blocks
pub mod blocks;
/// Per-test fragments for the code runner and HDL backends
pub mod code;
/// Per-test fragments for the notebook backend
pub mod notebook;

use itertools::Itertools;

pub use self::{code::CodeRenderer, notebook::NotebookRenderer};
use crate::{
    envelope::{Envelope, GradingFailure},
    i18n::Translator,
    result::GraderResult,
    util::{escape_html, fill},
};

/// Result kinds that only ever get the minimal one-line summary.
///
/// The decoding side and the grading side historically disagree on whether
/// accepted tests show detail, so each call site picks its own set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression(Vec<GraderResult>);

impl Suppression {
    /// Suppresses exactly `kinds`.
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = GraderResult>,
    {
        Self(kinds.into_iter().collect())
    }

    /// Set used when rendering decoded envelopes: internal errors only.
    pub fn render_side() -> Self {
        Self::new([GraderResult::InternalError])
    }

    /// Set used when the grader renders feedback itself: accepted tests and
    /// internal errors.
    pub fn grading_side() -> Self {
        Self::new([GraderResult::Accepted, GraderResult::InternalError])
    }

    /// Whether `result` is always rendered as a minimal summary.
    pub fn suppresses(&self, result: GraderResult) -> bool {
        self.0.contains(&result)
    }
}

impl Default for Suppression {
    fn default() -> Self {
        Self::render_side()
    }
}

/// Everything a render call needs besides the envelope itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Message lookup for viewer-facing strings.
    translator:  &'a dyn Translator,
    /// Whether the viewer is staff.
    staff:       bool,
    /// Result kinds that never reveal detail.
    suppression: &'a Suppression,
}

impl<'a> RenderContext<'a> {
    /// Creates a context for a student viewer.
    pub fn new(translator: &'a dyn Translator, suppression: &'a Suppression) -> Self {
        Self {
            translator,
            staff: false,
            suppression,
        }
    }

    /// Returns a copy of this context for a viewer with the given role.
    pub fn with_staff(self, staff: bool) -> Self {
        Self { staff, ..self }
    }

    /// Whether the viewer is staff.
    pub fn is_staff(&self) -> bool {
        self.staff
    }

    /// Suppression set of this call site.
    pub fn suppression(&self) -> &Suppression {
        self.suppression
    }

    /// Translates `msgid`.
    pub fn gettext(&self, msgid: &str) -> String {
        self.translator.gettext(msgid).into_owned()
    }
}

/// One-line summary shown when debug detail is withheld.
pub fn minimal_summary(test_number: usize, result: GraderResult) -> String {
    format!("<ul><li><strong>Test {test_number}: {} </strong></li></ul>", result.name())
}

/// Fragment shown instead of feedback that could not be decoded.
pub fn parsing_failed(content: &str, ctx: &RenderContext<'_>) -> String {
    fill(&ctx.gettext("<b>Parsing failed</b>: <pre>{}</pre>"), &[&escape_html(content)])
}

/// Renders a grading failure that happened before any test ran.
pub fn render_failure(failure: &GradingFailure, ctx: &RenderContext<'_>) -> String {
    match failure {
        GradingFailure::Compilation { output, .. } => format!(
            "<p><strong>{}</strong>:</p><pre>{}</pre>",
            ctx.gettext("Compilation error"),
            escape_html(output)
        ),
        GradingFailure::Notebook { error_name, output } => format!(
            "<br><strong>{}:</strong> {} <br><pre>{}</pre><br>",
            escape_html(error_name),
            ctx.gettext("There was an error while running your notebook:"),
            escape_html(output)
        ),
    }
}

/// Renders every entry of `envelope`, in envelope order, separated by blank
/// lines.
///
/// The viewer counts as staff when either the context or the envelope's
/// options say so.
pub fn render_envelope(envelope: &Envelope, ctx: &RenderContext<'_>) -> String {
    let staff = ctx.is_staff() || envelope.options().is_some_and(|options| options.is_staff());
    let ctx = ctx.with_staff(staff);

    match envelope {
        Envelope::Multilang(report) => {
            let renderer = CodeRenderer::new(&report.options, &ctx);
            report
                .entries
                .iter()
                .map(|entry| renderer.render_entry(entry, &report.debug_info))
                .join("\n\n")
        }
        Envelope::Hdl(report) => {
            let renderer = CodeRenderer::new(&report.options, &ctx);
            report
                .entries
                .iter()
                .map(|entry| renderer.render_hdl_entry(entry, &report.debug_info))
                .join("\n\n")
        }
        Envelope::Notebook(report) => {
            let renderer = NotebookRenderer::new(&ctx);
            report
                .entries
                .iter()
                .map(|entry| renderer.render_entry(entry))
                .join("\n\n")
        }
        Envelope::Failure(failure) => render_failure(failure, &ctx),
    }
}

/// Decodes and renders a JSON envelope; anything that fails to decode is
/// shown as the escaped "Parsing failed" fragment.
pub fn render_json(content: &str, ctx: &RenderContext<'_>) -> String {
    match Envelope::from_json(content) {
        Ok(envelope) => render_envelope(&envelope, ctx),
        Err(err) => {
            tracing::warn!("Could not decode feedback envelope: {err:#}");
            parsing_failed(content, ctx)
        }
    }
}
