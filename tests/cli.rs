#![allow(deprecated)]

use std::{fs, path::Path};

use assert_cmd::Command;
use serde_json::{Value, json};
use tempfile::tempdir;

fn command(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("grader-feedback").expect("binary exists");
    cmd.current_dir(workdir)
        .env("CLICOLOR", "0")
        .env_remove("GRADER_FEEDBACK_STAFF")
        .env_remove("GRADER_FEEDBACK_SHOW_EVERYTHING")
        .env_remove("GRADER_FEEDBACK_TRANSLATIONS");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let assert = cmd.assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).to_string()
}

#[test]
fn diff_prints_a_hunk() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("actual.txt"), "a\nb\nc\n").expect("write");
    fs::write(dir.path().join("expected.txt"), "a\nx\nc\n").expect("write");

    let stdout = stdout_of(
        command(dir.path())
            .args(["diff", "--context", "1", "actual.txt", "expected.txt"]),
    );
    assert_eq!(stdout, "@@ -1,3 +1,3 @@\n a\n-x\n+b\n c\n");

    let stdout = stdout_of(command(dir.path()).args([
        "diff",
        "--context",
        "1",
        "--max-lines",
        "2",
        "actual.txt",
        "expected.txt",
    ]));
    assert_eq!(stdout, "@@ -1,3 +1,3 @@\n a\n...\n");
}

#[test]
fn render_shows_minimal_summary_for_students() {
    let dir = tempdir().expect("tempdir");
    let envelope = json!([
        {"i": 0, "result": 90, "test_case": ["t.in", "t.out"], "input_sample": ""},
        {"container_type": "multilang"},
        {"files_feedback": {"t.in": {"diff": "-1\n+2"}}}
    ]);
    fs::write(dir.path().join("feedback.json"), envelope.to_string()).expect("write");

    let stdout = stdout_of(command(dir.path()).args(["render", "feedback.json"]));
    assert_eq!(stdout, "<ul><li><strong>Test 1: WRONG_ANSWER </strong></li></ul>\n");

    let stdout = stdout_of(command(dir.path()).args(["render", "--staff", "feedback.json"]));
    assert!(stdout.contains("Toggle diff (only for staff)"));

    let stdout = stdout_of(
        command(dir.path())
            .env("GRADER_FEEDBACK_STAFF", "true")
            .args(["render", "feedback.json"]),
    );
    assert!(stdout.contains("Toggle diff (only for staff)"));
}

#[test]
fn render_reports_undecodable_feedback() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("broken.json"), "[1, 2").expect("write");

    let stdout = stdout_of(command(dir.path()).args(["render", "broken.json"]));
    assert_eq!(stdout, "<b>Parsing failed</b>: <pre>[1, 2</pre>\n");
}

#[test]
fn render_uses_translation_catalog() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("fr.json"), r#"{"Compilation error": "Erreur de compilation"}"#)
        .expect("write");
    fs::write(
        dir.path().join("feedback.json"),
        r#"{"container_type": "hdl", "compilation_output": "oops"}"#,
    )
    .expect("write");

    let stdout = stdout_of(
        command(dir.path())
            .env("GRADER_FEEDBACK_TRANSLATIONS", "fr.json")
            .args(["render", "feedback.json"]),
    );
    assert_eq!(stdout, "<p><strong>Erreur de compilation</strong>:</p><pre>oops</pre>\n");
}

#[test]
fn render_rejects_bad_hidden_until_dates() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("doc.rst"), ".. hidden-until:: someday\n\n    Hint.\n")
        .expect("write");

    command(dir.path())
        .args(["render", "--mode", "rst", "doc.rst"])
        .assert()
        .failure();
}

#[test]
fn grade_prints_published_feedback() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("1.in"), "1 2\n").expect("write");
    fs::write(dir.path().join("1.out"), "3\n").expect("write");
    fs::write(dir.path().join("2.in"), "2 2\n").expect("write");
    fs::write(dir.path().join("2.out"), "4\n").expect("write");

    let run = json!({
        "backend": "multilang",
        "cases": [
            {"input_file": "1.in", "expected_output_file": "1.out", "return_code": 0, "stdout": "3\n"},
            {"input_file": "2.in", "expected_output_file": "2.out", "return_code": 0, "stdout": "5\n"}
        ]
    });
    fs::write(dir.path().join("run.json"), run.to_string()).expect("write");

    let stdout = stdout_of(command(dir.path()).args(["grade", "run.json"]));
    let record: Value = serde_json::from_str(&stdout).expect("json output");

    assert_eq!(record["result"], json!("failed"));
    assert_eq!(record["grade"], json!(50.0));
    assert_eq!(record["custom"]["custom_summary_result"], json!("WRONG_ANSWER"));

    let feedback = record["feedback"].as_str().expect("feedback document");
    let envelope: Value = serde_json::from_str(feedback).expect("envelope");
    assert_eq!(envelope[2]["container_type"], json!("multilang"));
    assert_eq!(envelope[1]["result"], json!(90));
}

#[test]
fn grade_fails_on_unreadable_runs() {
    let dir = tempdir().expect("tempdir");
    command(dir.path())
        .args(["grade", "missing.json"])
        .assert()
        .failure();
}
