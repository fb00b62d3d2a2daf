use grader_feedback::{
    DiffEngine, RenderOptions, compute_diff,
    constants::{DIFF_BYTE_CEILING, TRUNCATION_NOTICE},
};

#[test]
fn single_changed_line_produces_one_hunk() {
    let diff = compute_diff("a\nb\nc\n", "a\nx\nc\n", Some(100), 1);
    assert_eq!(diff, "@@ -1,3 +1,3 @@\n a\n-x\n+b\n c");
}

#[test]
fn diff_is_cut_after_max_lines() {
    let diff = compute_diff("a\nb\nc\n", "a\nx\nc\n", Some(2), 1);
    assert_eq!(diff, "@@ -1,3 +1,3 @@\n a\n...");
}

#[test]
fn identical_outputs_return_expected_text() {
    let expected = "line one\nline two\n";
    assert_eq!(compute_diff(expected, expected, Some(100), 3), expected);
    assert_eq!(compute_diff("", "", Some(100), 3), "");
}

#[test]
fn ellipsis_only_when_lines_remain() {
    // five diff lines in total
    let full = compute_diff("a\nb\nc\n", "a\nx\nc\n", None, 1);
    assert_eq!(full.lines().count(), 5);
    assert!(!full.ends_with("..."));

    let exact = compute_diff("a\nb\nc\n", "a\nx\nc\n", Some(5), 1);
    assert_eq!(exact, full);

    let cut = compute_diff("a\nb\nc\n", "a\nx\nc\n", Some(4), 1);
    assert!(cut.ends_with("\n..."));
    assert_eq!(cut.lines().count(), 5);
}

#[test]
fn zero_max_lines_keeps_only_the_ellipsis() {
    let diff = compute_diff("a\n", "b\n", Some(0), 3);
    assert_eq!(diff, "\n...");
}

#[test]
fn context_lines_limit_the_hunk() {
    let expected = "1\n2\n3\n4\n5\n6\n7\n";
    let actual = "1\n2\n3\nfour\n5\n6\n7\n";

    let diff = compute_diff(actual, expected, None, 1);
    assert_eq!(diff, "@@ -3,3 +3,3 @@\n 3\n-4\n+four\n 5");
}

#[test]
fn distant_changes_get_separate_hunks() {
    let expected = "1\n2\n3\n4\n5\n6\n7\n8\n9\n";
    let actual = "one\n2\n3\n4\n5\n6\n7\n8\nnine\n";

    let diff = compute_diff(actual, expected, None, 1);
    let headers = diff.lines().filter(|line| line.starts_with("@@")).count();
    assert_eq!(headers, 2);
    assert!(diff.starts_with("@@ -1,2 +1,2 @@\n-1\n+one\n 2\n"));
}

#[test]
fn missing_final_newline_is_a_difference() {
    let diff = compute_diff("a", "a\n", None, 3);
    assert!(diff.starts_with("@@ "));
    assert!(diff.contains("\n a\n"));
}

#[test]
fn diff_is_deterministic() {
    let expected = "alpha\nbeta\ngamma\ndelta\n";
    let actual = "alpha\nBETA\ngamma\n";

    let first = compute_diff(actual, expected, Some(100), 3);
    for _ in 0..5 {
        assert_eq!(compute_diff(actual, expected, Some(100), 3), first);
    }
}

#[test]
fn oversized_expected_output_is_truncated_with_notice() {
    let line = "x".repeat(99) + "\n";
    let expected = line.repeat(DIFF_BYTE_CEILING / line.len() + 10);
    assert!(expected.len() > DIFF_BYTE_CEILING);

    let diff = compute_diff(&expected, &expected, Some(100), 3);
    assert!(diff.ends_with(TRUNCATION_NOTICE));
    assert_eq!(diff.len(), DIFF_BYTE_CEILING + TRUNCATION_NOTICE.len());
}

#[test]
fn truncation_respects_char_boundaries() {
    let expected = "é".repeat(DIFF_BYTE_CEILING);
    let diff = compute_diff(&expected, &expected, None, 3);
    assert!(diff.ends_with(TRUNCATION_NOTICE));
    assert!(diff.len() <= DIFF_BYTE_CEILING + TRUNCATION_NOTICE.len());
}

#[test]
fn engine_takes_limits_from_options() {
    let options = RenderOptions::new()
        .set_diff_max_lines(Some(2))
        .set_diff_context_lines(1);
    let engine = DiffEngine::from(&options);

    assert_eq!(engine.max_lines(), Some(2));
    assert_eq!(engine.context_lines(), 1);
    assert_eq!(engine.compute("a\nb\nc\n", "a\nx\nc\n"), "@@ -1,3 +1,3 @@\n a\n...");

    let default = DiffEngine::default();
    assert_eq!(default.max_lines(), Some(100));
    assert_eq!(default.context_lines(), 3);
}
