#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Bounded unified diffs between expected and actual program output.

use std::ops::Range;

use similar::{Algorithm, ChangeTag, DiffOp, capture_diff_slices, group_diff_ops};

use crate::{
    constants::{DIFF_BYTE_CEILING, DIFF_ELLIPSIS},
    envelope::RenderOptions,
    util::truncate_with_notice,
};

/// Splits `text` into lines, keeping a trailing newline as a synthetic `"\n"`
/// line so that outputs with and without a final newline compare as
/// different.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().collect();
    if text.ends_with('\n') {
        lines.push("\n");
    }
    lines
}

/// Formats one side of a hunk header range (`start,len` with 1-based start).
fn format_range(range: Range<usize>) -> String {
    let length = range.len();
    let beginning = range.start + 1;
    match length {
        1 => format!("{beginning}"),
        0 => format!("{},0", beginning - 1),
        _ => format!("{beginning},{length}"),
    }
}

/// Computes the full list of unified diff lines between `old` and `new`,
/// without file headers.
fn unified_lines(old: &[&str], new: &[&str], context_lines: usize) -> Vec<String> {
    let ops = capture_diff_slices(Algorithm::Myers, old, new);
    let mut lines = Vec::new();

    for group in group_diff_ops(ops, context_lines) {
        if group.iter().all(|op| matches!(op, DiffOp::Equal { .. })) {
            continue;
        }
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };

        let old_range = first.old_range().start..last.old_range().end;
        let new_range = first.new_range().start..last.new_range().end;
        lines.push(format!("@@ -{} +{} @@", format_range(old_range), format_range(new_range)));

        for op in &group {
            for change in op.iter_changes(old, new) {
                let prefix = match change.tag() {
                    ChangeTag::Equal => ' ',
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                };
                lines.push(format!("{prefix}{}", change.value()));
            }
        }
    }

    lines
}

/// Computes a diff between the program output and the expected output.
///
/// Both texts are cut at [`DIFF_BYTE_CEILING`] first. The diff goes from
/// `expected` to `actual`, keeps `context_lines` lines around each change and
/// is limited to `max_lines` lines (`None` means no limit); a diff that was
/// cut ends with `"..."`. When there is no difference at all, the expected
/// output is returned instead so that viewers always get a preview.
pub fn compute(
    actual: &str,
    expected: &str,
    max_lines: Option<usize>,
    context_lines: usize,
) -> String {
    let expected = truncate_with_notice(expected, DIFF_BYTE_CEILING);
    let actual = truncate_with_notice(actual, DIFF_BYTE_CEILING);

    let lines = unified_lines(&split_lines(&expected), &split_lines(&actual), context_lines);
    let limit = max_lines.unwrap_or(usize::MAX);

    let mut diff = lines.iter().take(limit).map(String::as_str).collect::<Vec<_>>().join("\n");
    if lines.len() > limit {
        diff.push('\n');
        diff.push_str(DIFF_ELLIPSIS);
    }

    if diff.is_empty() { expected } else { diff }
}

/// Diff settings taken from a task's feedback options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEngine {
    /// Maximum number of diff lines, `None` for unbounded.
    max_lines:     Option<usize>,
    /// Context lines around each change.
    context_lines: usize,
}

impl DiffEngine {
    /// Creates a diff engine with explicit limits.
    pub fn new(max_lines: Option<usize>, context_lines: usize) -> Self {
        Self {
            max_lines,
            context_lines,
        }
    }

    /// Maximum number of diff lines.
    pub fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    /// Number of context lines.
    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    /// See [`compute`].
    pub fn compute(&self, actual: &str, expected: &str) -> String {
        compute(actual, expected, self.max_lines, self.context_lines)
    }
}

impl From<&RenderOptions> for DiffEngine {
    fn from(options: &RenderOptions) -> Self {
        Self::new(options.diff_max_lines(), options.diff_context_lines())
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::from(&RenderOptions::default())
    }
}
