#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The pieces a per-test HTML fragment is assembled from.
//!
//! Every block owns an already translated and escaped payload, so blocks can
//! be rendered independently and concatenated in order.

use std::fmt::Write;

/// One piece of a per-test fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Test title plus the collapse toggle; opens the collapsible container.
    Header {
        /// One-based test number.
        test_number:  usize,
        /// Result name, e.g. `WRONG_ANSWER`.
        result_name:  &'static str,
        /// Id of the collapsible container.
        panel_id:     String,
        /// Label of the toggle link.
        toggle_label: String,
    },
    /// Extra feedback written by the task author (trusted markup).
    CustomFeedback {
        /// Block title.
        title: String,
        /// Feedback markup.
        text:  String,
    },
    /// Preview of the test input.
    InputPreview {
        /// Block title, already including the input file name.
        title:        String,
        /// Id of the `<pre>` element holding the preview.
        element_id:   String,
        /// HTML-escaped input file name.
        file_html:    String,
        /// Input file name escaped for a JavaScript string.
        file_js:      String,
        /// HTML-escaped preview text.
        sample_html:  String,
    },
    /// Placeholder filled by a frontend script with the rendered diff.
    Diff {
        /// Id of the element the script draws into.
        block_id:     String,
        /// Name of the script function that draws the diff.
        script_hook:  &'static str,
        /// Diff text escaped for a template literal.
        diff_literal: String,
    },
    /// Standard error of a crashed run.
    Stderr {
        /// Block title.
        title:  String,
        /// Standard error text (escaped by the grader).
        stderr: String,
    },
    /// Closes the collapsible container opened by [`Block::Header`].
    Footer,
}

impl Block {
    /// Appends the markup of this block to `out`.
    pub fn write_to(&self, out: &mut String) {
        // writing into a String cannot fail
        let _ = match self {
            Block::Header {
                test_number,
                result_name,
                panel_id,
                toggle_label,
            } => write!(
                out,
                "<ul><li><strong>Test {test_number}: {result_name} </strong>\n<a class=\"btn \
                 btn-default btn-link btn-xs\" role=\"button\" data-toggle=\"collapse\" \
                 href=\"#{panel_id}\" aria-expanded=\"false\" \
                 aria-controls=\"{panel_id}\">{toggle_label}</a> <div class=\"collapse\" \
                 id=\"{panel_id}\">"
            ),
            Block::CustomFeedback { title, text } => {
                write!(out, "<p>{title}</p><pre>{text}</pre><br>")
            }
            Block::InputPreview {
                title,
                element_id,
                file_html,
                file_js,
                sample_html,
            } => write!(
                out,
                "<p>{title}</p>\n<pre class=\"input-area\" id=\"{element_id}\">{sample_html}</pre>\n<div \
                 id=\"{file_html}_download_link\"></div>\n<script>createDownloadLink(\"{file_js}\");</script>\n"
            ),
            Block::Diff {
                block_id,
                script_hook,
                diff_literal,
            } => write!(
                out,
                "<pre id=\"{block_id}\"></pre>\n<script>{script_hook}(\"{block_id}\", \
                 `{diff_literal}`);</script>"
            ),
            Block::Stderr { title, stderr } => write!(out, "<p>{title}</p><br><pre>{stderr}</pre>"),
            Block::Footer => write!(out, "</div></li></ul>"),
        };
    }
}

/// Renders `blocks` in order into one fragment.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        block.write_to(&mut out);
    }
    out
}
