use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use grader_feedback::{
    DocumentError, Mode, NullTranslator, ParsableText,
    document::{
        DirectiveContext, MarkupWriter, VerbatimWriter, expand_hidden_until, fragments_to_rst,
        html_to_rst, parse_hidden_until,
    },
};

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid date")
}

fn ctx(now: NaiveDateTime, show_everything: bool) -> DirectiveContext<'static> {
    DirectiveContext {
        now,
        show_everything,
        translator: &NullTranslator,
    }
}

const DOCUMENT: &str = "Intro\n\n.. hidden-until:: 2030-01-15 12:00\n\n    Secret hint.\n\nOutro\n";

struct FailingWriter;

impl MarkupWriter for FailingWriter {
    fn write_html(&self, _rst: &str) -> Result<String> {
        bail!("writer unavailable")
    }
}

#[test]
fn raw_html_block_indents_every_line() {
    assert_eq!(html_to_rst("<p>a</p>\n<p>b</p>"), ".. raw:: html\n\n    <p>a</p>\n    <p>b</p>\n");
    assert_eq!(
        fragments_to_rst(["<b>1</b>", "<b>2</b>"]),
        ".. raw:: html\n\n    <b>1</b>\n\n.. raw:: html\n\n    <b>2</b>\n"
    );
}

#[test]
fn all_date_formats_are_accepted() {
    let noon = at(2030, 1, 15, 12);
    assert_eq!(parse_hidden_until("2030-01-15 12:00"), Ok(noon));
    assert_eq!(parse_hidden_until("2030-01-15 12:00:00"), Ok(noon));
    assert_eq!(parse_hidden_until("15/01/2030 12:00"), Ok(noon));
    assert_eq!(parse_hidden_until(" 15/01/2030 12:00:00 "), Ok(noon));
    assert_eq!(parse_hidden_until("2030-01-15"), Ok(at(2030, 1, 15, 0)));
    assert_eq!(parse_hidden_until("15/01/2030"), Ok(at(2030, 1, 15, 0)));
    assert_eq!(parse_hidden_until("2030-01-15 12"), Ok(noon));
    assert_eq!(parse_hidden_until("15/01/2030 9"), Ok(at(2030, 1, 15, 9)));
    assert_eq!(
        parse_hidden_until("15/01/2030 25"),
        Err(DocumentError::InvalidDate("15/01/2030 25".to_string()))
    );
    assert_eq!(
        parse_hidden_until("next tuesday"),
        Err(DocumentError::InvalidDate("next tuesday".to_string()))
    );
}

#[test]
fn content_is_shown_after_the_date() {
    let expanded = expand_hidden_until(DOCUMENT, &ctx(at(2031, 1, 1, 0), false)).expect("expand");
    assert_eq!(expanded, "Intro\n\nSecret hint.\n\nOutro\n");
}

#[test]
fn content_is_replaced_before_the_date() {
    let expanded = expand_hidden_until(DOCUMENT, &ctx(at(2029, 1, 1, 0), false)).expect("expand");
    assert!(!expanded.contains("Secret hint."));
    assert!(expanded.contains(".. caution::"));
    assert!(expanded.contains("A part of this feedback is hidden until 15/01/2030 12:00:00."));
    assert!(expanded.starts_with("Intro\n"));
    assert!(expanded.ends_with("Outro\n"));
}

#[test]
fn staff_preview_shows_content_with_a_warning() {
    let expanded = expand_hidden_until(DOCUMENT, &ctx(at(2029, 1, 1, 0), true)).expect("expand");
    let warning = expanded
        .find("The feedback below will be hidden to the students until 15/01/2030 12:00:00.")
        .expect("warning");
    let hint = expanded.find("Secret hint.").expect("hint");
    assert!(warning < hint);
}

#[test]
fn nested_directives_are_expanded() {
    let document = ".. hidden-until:: 2020-01-01\n\n    Outer.\n\n    .. hidden-until:: \
                    2040-01-01\n\n        Inner.\n";
    let expanded = expand_hidden_until(document, &ctx(at(2030, 1, 1, 0), false)).expect("expand");

    assert!(expanded.contains("Outer."));
    assert!(!expanded.contains("Inner."));
    assert!(expanded.contains("hidden until 01/01/2040 00:00:00"));
}

#[test]
fn malformed_directives_are_errors() {
    let now = at(2030, 1, 1, 0);
    assert_eq!(
        expand_hidden_until(".. hidden-until:: soon\n\n    Text.\n", &ctx(now, false)),
        Err(DocumentError::InvalidDate("soon".to_string()))
    );
    assert_eq!(
        expand_hidden_until("Title\n\n.. hidden-until::\n\n    Text.\n", &ctx(now, false)),
        Err(DocumentError::MissingDate(3))
    );
    assert_eq!(
        expand_hidden_until(".. hidden-until:: 2020-01-01\n\nNot indented.\n", &ctx(now, false)),
        Err(DocumentError::EmptyContent(1))
    );
}

#[test]
fn parse_modes_dispatch() {
    let envelope = r#"[{"i": 0, "result": 100, "test_case": ["t.in", "t.out"], "input_sample": ""},
                       {"container_type": "multilang"}, {}]"#;
    let html = ParsableText::new(envelope, Mode::Json, &NullTranslator)
        .parse(&VerbatimWriter)
        .expect("parse json");
    assert_eq!(html, "<ul><li><strong>Test 1: ACCEPTED </strong></li></ul>");

    let raw = ParsableText::new("<p>kept</p>", Mode::Html, &NullTranslator)
        .parse(&VerbatimWriter)
        .expect("parse html");
    assert_eq!(raw, "<p>kept</p>");

    let rst = ParsableText::new(DOCUMENT, Mode::Rst, &NullTranslator)
        .set_now(at(2029, 1, 1, 0))
        .set_show_everything(true)
        .parse(&VerbatimWriter)
        .expect("parse rst");
    assert!(rst.contains("Secret hint."));
}

#[test]
fn writer_failures_fall_back_to_parsing_failed() {
    let text = ParsableText::new("*bold*", Mode::Rst, &NullTranslator);
    assert_eq!(text.parse(&FailingWriter), Ok("<b>Parsing failed</b>: <pre>*bold*</pre>".to_string()));
    assert_eq!(text.original_content(), "*bold*");
}

#[test]
fn staff_flag_reaches_the_renderer() {
    let envelope = r#"[{"i": 0, "result": 90, "test_case": ["t.in", "t.out"], "input_sample": ""},
                       {"container_type": "multilang"},
                       {"files_feedback": {"t.in": {"diff": "-1\n+2"}}}]"#;
    let student = ParsableText::new(envelope, Mode::Json, &NullTranslator)
        .parse(&VerbatimWriter)
        .expect("parse");
    assert!(!student.contains("updateDiffBlock"));

    let staff = ParsableText::new(envelope, Mode::Json, &NullTranslator)
        .set_staff(true)
        .parse(&VerbatimWriter)
        .expect("parse");
    assert!(staff.contains("updateDiffBlock(\"diffBlock0\", `-1\\n+2`);"));
}

#[test]
fn modes_parse_from_names() {
    assert_eq!("JSON".parse::<Mode>(), Ok(Mode::Json));
    assert_eq!("rst".parse::<Mode>(), Ok(Mode::Rst));
    assert_eq!("html".parse::<Mode>(), Ok(Mode::Html));
    assert_eq!("pdf".parse::<Mode>(), Err(DocumentError::UnknownMode("pdf".to_string())));
}
