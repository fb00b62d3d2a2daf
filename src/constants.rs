#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Maximum number of bytes of either output that the diff engine looks at
/// (800 KiB).
pub const DIFF_BYTE_CEILING: usize = 800 * 1024;

/// Marker appended to an output that was cut at [`DIFF_BYTE_CEILING`].
pub const TRUNCATION_NOTICE: &str = "\n...[TRUNCATED]";

/// Marker appended to a diff that has more lines than the configured limit.
pub const DIFF_ELLIPSIS: &str = "...";

/// Default number of diff lines shown when the options do not say otherwise.
pub const DEFAULT_DIFF_MAX_LINES: usize = 100;

/// Default number of context lines around each change.
pub const DEFAULT_DIFF_CONTEXT_LINES: usize = 3;

/// Number of input lines kept in an input preview.
pub const INPUT_SAMPLE_MAX_LINES: usize = 15;

/// Number of bytes kept in an input preview.
pub const INPUT_SAMPLE_MAX_BYTES: usize = 1024;

/// Marker appended to a truncated input preview.
pub const INPUT_SAMPLE_ELLIPSIS: &str = "...\n";

/// Name of the frontend script function that draws a text diff.
pub const DIFF_SCRIPT_HOOK: &str = "updateDiffBlock";

/// Name of the frontend script function that draws an HDL waveform diff.
pub const WAVEFORM_SCRIPT_HOOK: &str = "updateWaveDromBlock";

/// Sandbox exit code reported when the memory limit was hit.
pub const MEMORY_LIMIT_EXIT_CODE: i32 = 252;

/// Sandbox exit code reported when the time limit was hit.
pub const TIME_LIMIT_EXIT_CODE: i32 = 253;

/// `strftime` format used when showing `hidden-until` dates to viewers.
pub const HIDDEN_UNTIL_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Date-time formats accepted by the `hidden-until` directive.
pub const HIDDEN_UNTIL_DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// Date-only formats accepted by the `hidden-until` directive.
pub const HIDDEN_UNTIL_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
