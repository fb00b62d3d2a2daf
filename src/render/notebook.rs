#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{cmp::Ordering, fmt::Write};

use itertools::{EitherOrBoth, Itertools};

use super::RenderContext;
use crate::{
    envelope::{NotebookCase, NotebookEntry},
    util::escape_html,
};

/// Splits `text` into alternating runs of digits and non-digits.
fn runs(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(run)
    })
}

/// Whether a run is made of digits.
fn is_number(run: &str) -> bool {
    run.starts_with(|c: char| c.is_ascii_digit())
}

/// Compares two digit runs by value, ignoring leading zeros.
fn cmp_digits(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

/// Orders case identifiers so that embedded numbers compare by value
/// (`case2` before `case10`). Ties fall back to plain text order.
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    runs(left)
        .zip_longest(runs(right))
        .map(|pair| match pair {
            EitherOrBoth::Both(l, r) if is_number(l) && is_number(r) => cmp_digits(l, r),
            EitherOrBoth::Both(l, r) => l.cmp(r),
            EitherOrBoth::Left(_) => Ordering::Greater,
            EitherOrBoth::Right(_) => Ordering::Less,
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| left.cmp(right))
}

/// Renders per-test fragments of `notebook` envelopes.
pub struct NotebookRenderer<'a> {
    /// Viewer role and translations.
    ctx: &'a RenderContext<'a>,
}

impl<'a> NotebookRenderer<'a> {
    /// Creates a renderer for one envelope.
    pub fn new(ctx: &'a RenderContext<'a>) -> Self {
        Self { ctx }
    }

    /// Label of a toggle link, marked when the viewer is staff.
    fn toggle_label(&self, label: &str) -> String {
        if self.ctx.is_staff() {
            self.ctx.gettext(&format!("{label} (only for staff)"))
        } else {
            self.ctx.gettext(label)
        }
    }

    /// Debug detail of a single case.
    fn case_detail(&self, case: &NotebookCase) -> String {
        let mut detail = String::new();

        if case.is_runtime_error {
            let _ = write!(
                detail,
                "<strong>{}</strong><br><pre>{}</pre>",
                self.ctx.gettext("Error:"),
                escape_html(case.error.as_deref().unwrap_or_default())
            );
        }

        if let Some(code) = &case.case_code {
            let _ = write!(
                detail,
                "<strong>{}</strong><pre class=\"language-python\"><code class=\"language-python\" \
                 data-language=\"python\">{}</code></pre><script>highlight_code();</script>",
                self.ctx.gettext("Executed code:"),
                escape_html(code)
            );
        }

        if !case.is_runtime_error {
            let output_diff = case
                .case_output_diff
                .as_deref()
                .unwrap_or_default()
                .replace("/n", "\n")
                .replace('<', "&lt;");
            let _ = write!(
                detail,
                "<br><strong>{}</strong><pre>{output_diff}</pre><br>",
                self.ctx.gettext("Output difference:")
            );
        }

        detail
    }

    /// Renders one notebook test.
    pub fn render_entry(&self, entry: &NotebookEntry) -> String {
        let test_id = entry.i;
        let result = &entry.test_result;
        let panel_id = format!("collapseDebug{test_id}");

        let mut html = format!(
            "<ul class=\"list_disc\" style=\"font-size:12px;\"><li>\n<strong \
             style=\"font-size:15px\"> {}: </strong><i>{} - {:.2} / {:?} </i>",
            escape_html(&result.name),
            result.result.name(),
            result.total,
            entry.weights
        );

        if entry.show_debug_info && !result.cases.is_empty() {
            let _ = write!(
                html,
                "<a class=\"btn btn-default btn-link btn-xs\" role=\"button\"\ndata-toggle=\"collapse\" \
                 href=\"#{panel_id}\" aria-expanded=\"false\" aria-controls=\"{panel_id}\">{}</a><div \
                 class=\"collapse\" id=\"{panel_id}\">",
                self.toggle_label("Expand test results")
            );

            if let Some(feedback) = entry.test_custom_feedback.as_deref().filter(|f| !f.is_empty()) {
                let _ = write!(
                    html,
                    "<br><strong>{}</strong><br><pre>{feedback}</pre>",
                    self.ctx.gettext("Custom feedback:")
                );
            }

            let show_label = self.toggle_label("Show debug info");
            for (case_id, case) in result
                .cases
                .iter()
                .sorted_by(|(left, _), (right, _)| natural_cmp(left, right))
            {
                let case_id = escape_html(case_id);
                let case_panel_id = format!("collapse_debug_test_{test_id}_case_{case_id}");
                let _ = write!(
                    html,
                    "<ul class=\"list_disc\" style=\"font-size:12px; list-style-type: \
                     square;\"><li>\n<strong>Case {case_id}:</strong><a class=\"btn btn-default \
                     btn-link btn-xs\" role=\"button\" data-toggle=\"collapse\" \
                     href=\"#{case_panel_id}\" aria-expanded=\"false\" \
                     aria-controls=\"{case_panel_id}\">{show_label}</a>\n<div class=\"collapse\" \
                     id=\"{case_panel_id}\">{}</div></li></ul>\n",
                    self.case_detail(case)
                );
            }

            html.push_str("</div>");
        }

        html.push_str("</li></ul>");
        html
    }
}
