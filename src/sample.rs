#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Short previews of test input files.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result};

use crate::{
    constants::{INPUT_SAMPLE_ELLIPSIS, INPUT_SAMPLE_MAX_BYTES, INPUT_SAMPLE_MAX_LINES},
    util::floor_char_boundary,
};

/// Builds a preview from the beginning of an input text.
///
/// Keeps at most [`INPUT_SAMPLE_MAX_LINES`] lines, then at most
/// [`INPUT_SAMPLE_MAX_BYTES`] bytes; each cut appends `"...\n"`.
pub fn sample_text(text: &str) -> String {
    let mut lines = text.split_inclusive('\n');
    let mut sample: String = lines.by_ref().take(INPUT_SAMPLE_MAX_LINES).collect();
    if lines.next().is_some() {
        sample.push_str(INPUT_SAMPLE_ELLIPSIS);
    }

    if sample.len() > INPUT_SAMPLE_MAX_BYTES {
        sample.truncate(floor_char_boundary(&sample, INPUT_SAMPLE_MAX_BYTES));
        sample.push_str(INPUT_SAMPLE_ELLIPSIS);
    }

    sample
}

/// Reads a preview of the input file at `path`, as shown to students.
///
/// Only the first `INPUT_SAMPLE_MAX_BYTES + 1` bytes are read, which is enough
/// to decide both cuts made by [`sample_text`].
pub fn input_sample(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("Could not open input file {}", path.display()))?;

    let mut prefix = Vec::with_capacity(INPUT_SAMPLE_MAX_BYTES + 1);
    BufReader::new(file)
        .take(INPUT_SAMPLE_MAX_BYTES as u64 + 1)
        .read_to_end(&mut prefix)
        .with_context(|| format!("Could not read input file {}", path.display()))?;

    Ok(sample_text(&String::from_utf8_lossy(&prefix)))
}
