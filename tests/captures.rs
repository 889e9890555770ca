use matchspace::{AllMatches, Error, RegexOptions};

fn all(pattern: &str) -> AllMatches {
    AllMatches::new(pattern, &RegexOptions::default()).unwrap()
}

#[test]
fn group_zero_is_the_whole_match() {
    let matches = all(r#"(["'])([01]{2})\1"#);
    let m = matches.get(0).unwrap();
    assert_eq!(m.group(0), Some(m.as_str()));
}

#[test]
fn numbered_groups_expose_their_spans() {
    let matches = all(r#"(["'])([01]{2})\1"#);
    let m = matches.get(0).unwrap();
    assert_eq!(m.group(1), Some("\""));
    assert_eq!(m.group(2), Some("00"));
    assert_eq!(m.groups().len(), 2);
}

#[test]
fn group_absent_from_the_taken_branch_is_none() {
    // Only one side of the alternation ever participates in a given match,
    // so the other side's group never captured.
    let matches = all(r"(a)|(b)");
    let first = matches.get(0).unwrap();
    assert_eq!(first.group(1), Some("a"));
    assert_eq!(first.group(2), None);

    let second = matches.get(1).unwrap();
    assert_eq!(second.group(1), None);
    assert_eq!(second.group(2), Some("b"));
}

#[test]
fn backref_must_match_the_captured_group_text() {
    let matches = all(r#"(["'])([01]{2})\1"#);
    assert!(matches.contains("\"00\""));
    assert!(matches.contains("'11'"));
    assert!(!matches.contains("\"00'"));
}

#[test]
fn backref_to_unopened_group_is_rejected_at_compile_time() {
    let err = AllMatches::new(r"\1(a)", &RegexOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedConstruct(_)));
}

#[test]
fn backref_into_a_repeated_group_is_rejected_at_compile_time() {
    let err = AllMatches::new(r"(a|b)*\1", &RegexOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedConstruct(_)));
}

#[test]
fn named_capture_groups_behave_like_numbered_ones() {
    let matches = all(r"(?P<first>a)(?P<second>b)");
    let m = matches.get(0).unwrap();
    assert_eq!(m.group(1), Some("a"));
    assert_eq!(m.group(2), Some("b"));
}

#[test]
fn out_of_range_index_is_an_error() {
    let matches = all(r"a|b");
    assert!(matches!(matches.get(2), Err(Error::IndexOutOfRange)));
}
