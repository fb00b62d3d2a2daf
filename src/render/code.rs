#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::{
    RenderContext,
    blocks::{Block, render_blocks},
    minimal_summary,
};
use crate::{
    constants::{DIFF_SCRIPT_HOOK, WAVEFORM_SCRIPT_HOOK},
    envelope::{DebugInfo, RenderOptions, TestCase, TestCaseEntry},
    result::GraderResult,
    util::{escape_html, escape_js_string, escape_template_literal, fill},
};

/// Renders per-test fragments of `multilang` and `hdl` envelopes.
pub struct CodeRenderer<'a> {
    /// Options captured at grading time.
    options: &'a RenderOptions,
    /// Viewer role, translations and suppression set.
    ctx:     &'a RenderContext<'a>,
}

impl<'a> CodeRenderer<'a> {
    /// Creates a renderer for one envelope.
    pub fn new(options: &'a RenderOptions, ctx: &'a RenderContext<'a>) -> Self {
        Self { options, ctx }
    }

    /// Whether only the minimal summary may be shown for this test.
    fn withholds_detail(&self, result: GraderResult, test_case: &TestCase) -> bool {
        self.ctx.suppression().suppresses(result)
            || (!self.options.discloses(test_case.input()) && !self.ctx.is_staff())
    }

    /// Builds the ordered block list for one test.
    fn blocks(
        &self,
        test_id: usize,
        result: GraderResult,
        test_case: &TestCase,
        input_sample: &str,
        debug_info: &DebugInfo,
    ) -> Vec<Block> {
        let input_file = test_case.input();
        let block_id = format!("diffBlock{test_id}");
        let toggle_label = if self.ctx.is_staff() {
            self.ctx.gettext("Toggle diff (only for staff)")
        } else {
            self.ctx.gettext("Toggle diff")
        };

        let mut blocks = vec![Block::Header {
            test_number: test_id + 1,
            result_name: result.name(),
            panel_id: format!("collapseDiff{test_id}"),
            toggle_label,
        }];

        if let Some(feedback) = self.options.custom_feedback_for(input_file) {
            blocks.push(Block::CustomFeedback {
                title: self.ctx.gettext("Custom feedback"),
                text:  feedback.to_string(),
            });
        }

        if self.options.show_input() {
            let file_html = escape_html(input_file);
            blocks.push(Block::InputPreview {
                title: fill(&self.ctx.gettext("Input preview: {}"), &[&file_html]),
                element_id: format!("{block_id}-input"),
                file_html,
                file_js: escape_js_string(input_file),
                sample_html: escape_html(input_sample),
            });
        }

        if let Some(diff) = debug_info.diff_for(input_file) {
            blocks.push(Block::Diff {
                block_id:     block_id.clone(),
                script_hook:  DIFF_SCRIPT_HOOK,
                diff_literal: escape_template_literal(diff),
            });
        }

        if result == GraderResult::RuntimeError {
            blocks.push(Block::Stderr {
                title:  self.ctx.gettext("Error: "),
                stderr: debug_info.stderr_for(input_file).to_string(),
            });
        }

        blocks.push(Block::Footer);
        blocks
    }

    /// Renders the fragment of one test.
    ///
    /// * `test_id`: zero-based test index.
    /// * `result`: outcome of the test.
    /// * `test_case`: files that define the test.
    /// * `input_sample`: preview of the input, shown when `show_input` is set.
    /// * `debug_info`: debug payload of the envelope.
    pub fn render(
        &self,
        test_id: usize,
        result: GraderResult,
        test_case: &TestCase,
        input_sample: &str,
        debug_info: &DebugInfo,
    ) -> String {
        if self.withholds_detail(result, test_case) {
            return minimal_summary(test_id + 1, result);
        }

        render_blocks(&self.blocks(test_id, result, test_case, input_sample, debug_info))
    }

    /// Like [`CodeRenderer::render`], but draws diffs as waveforms.
    pub fn render_hdl(
        &self,
        test_id: usize,
        result: GraderResult,
        test_case: &TestCase,
        input_sample: &str,
        debug_info: &DebugInfo,
    ) -> String {
        self.render(test_id, result, test_case, input_sample, debug_info)
            .replace(DIFF_SCRIPT_HOOK, WAVEFORM_SCRIPT_HOOK)
    }

    /// Renders one decoded `multilang` entry.
    pub fn render_entry(&self, entry: &TestCaseEntry, debug_info: &DebugInfo) -> String {
        self.render(entry.i, entry.result, &entry.test_case, &entry.input_sample, debug_info)
    }

    /// Renders one decoded `hdl` entry.
    pub fn render_hdl_entry(&self, entry: &TestCaseEntry, debug_info: &DebugInfo) -> String {
        self.render_hdl(entry.i, entry.result, &entry.test_case, &entry.input_sample, debug_info)
    }
}
