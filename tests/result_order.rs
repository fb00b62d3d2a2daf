use grader_feedback::{GraderResult, result::UnknownResult};

#[test]
fn kinds_are_ordered_by_precedence() {
    for pair in GraderResult::ALL.windows(2) {
        assert!(pair[0] < pair[1], "{} should precede {}", pair[0], pair[1]);
        assert!(pair[0].value() < pair[1].value());
    }

    assert_eq!(GraderResult::CompilationError.value(), 10);
    assert_eq!(GraderResult::Accepted.value(), 100);
}

#[test]
fn summary_picks_highest_precedence() {
    let summary = GraderResult::summarize([
        GraderResult::Accepted,
        GraderResult::WrongAnswer,
        GraderResult::RuntimeError,
        GraderResult::Accepted,
    ]);
    assert_eq!(summary, Some(GraderResult::RuntimeError));

    assert_eq!(GraderResult::summarize([GraderResult::Accepted]), Some(GraderResult::Accepted));
    assert_eq!(GraderResult::summarize(Vec::new()), None);
}

#[test]
fn sandbox_exit_codes_are_classified() {
    assert_eq!(GraderResult::from_return_code(252), GraderResult::MemoryLimitExceeded);
    assert_eq!(GraderResult::from_return_code(253), GraderResult::TimeLimitExceeded);
    assert_eq!(GraderResult::from_return_code(1), GraderResult::RuntimeError);
    assert_eq!(GraderResult::from_return_code(-11), GraderResult::RuntimeError);
}

#[test]
fn numeric_values_convert_both_ways() {
    for kind in GraderResult::ALL {
        assert_eq!(GraderResult::try_from(kind.value()), Ok(kind));
    }
    assert_eq!(GraderResult::try_from(42), Err(UnknownResult(42)));
}

#[test]
fn wire_form_is_the_number() {
    assert_eq!(serde_json::to_string(&GraderResult::WrongAnswer).expect("serialize"), "90");

    let decoded: GraderResult = serde_json::from_str("40").expect("decode");
    assert_eq!(decoded, GraderResult::RuntimeError);
    assert!(serde_json::from_str::<GraderResult>("41").is_err());
}

#[test]
fn names_match_display() {
    assert_eq!(GraderResult::TimeLimitExceeded.name(), "TIME_LIMIT_EXCEEDED");
    assert_eq!(GraderResult::Accepted.to_string(), "ACCEPTED");
    assert!(GraderResult::Accepted.is_accepted());
    assert!(!GraderResult::PresentationError.is_accepted());
}
