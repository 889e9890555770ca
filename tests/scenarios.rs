//! The literal scenarios table (S1-S9), exercised end to end through the
//! public facade rather than through any single internal module.

use matchspace::{AllMatches, AllStrings, CharClass, RegexOptions, RegexOptionsBuilder};

fn all(pattern: &str) -> AllStrings {
    AllStrings::new(pattern, &RegexOptions::default()).unwrap()
}

fn all_with(pattern: &str, options: &RegexOptions) -> AllStrings {
    AllStrings::new(pattern, options).unwrap()
}

#[test]
fn s1_alternation_of_literals() {
    let v = all(r"foo|ba[rz]");
    assert_eq!(v.len(), 3u32.into());
    let strings: Vec<_> = v.iter().collect();
    assert_eq!(strings, vec!["foo", "bar", "baz"]);
}

#[test]
fn s2_dot_with_overridden_charset() {
    let charset = CharClass::from_ranges(vec![('a' as u32, 'a' as u32), ('b' as u32, 'b' as u32)]);
    let options = RegexOptionsBuilder::new().charset(charset).build();
    let v = all_with(r".|a", &options);
    assert_eq!(v.len(), 3u32.into());
    let strings: Vec<_> = v.iter().collect();
    assert_eq!(strings, vec!["a", "b", "a"]);
}

#[test]
fn s3_duplicate_alternative_not_deduplicated() {
    let v = all("a|a");
    assert_eq!(v.len(), 2u32.into());
    assert_eq!(v.iter().collect::<Vec<_>>(), vec!["a", "a"]);
}

#[test]
fn s4_duplicate_class_member_not_deduplicated() {
    let v = all("[aa]");
    assert_eq!(v.len(), 2u32.into());
    assert_eq!(v.iter().collect::<Vec<_>>(), vec!["a", "a"]);
}

#[test]
fn s5_longer_alternation_with_slicing() {
    let v = all(r"bu|[rn]t|[coy]e|[mtg]a|j|iso|n[hl]|[ae]d|lev|sh|[lnd]i|[po]o|ls");
    assert_eq!(v.len(), 23u32.into());
    assert!(v.contains("bu"));
    let prefix: Vec<_> = v.slice(0u32.into(), 5u32.into()).collect();
    assert_eq!(prefix, vec!["bu", "rt", "nt", "ce", "oe"]);
}

#[test]
fn slice_end_past_length_is_clamped_not_run_off_the_end() {
    let v = all("a|b");
    let all_of_it: Vec<_> = v.slice(0u32.into(), 1000u32.into()).collect();
    assert_eq!(all_of_it, vec!["a", "b"]);
}

#[test]
fn s6_backref_group_and_groups() {
    let v = AllMatches::new(r#"(["'])([01]{3})\1"#, &RegexOptions::default()).unwrap();
    let m = v.get(0).unwrap();
    assert_eq!(m.group(0), Some("\"000\""));
    assert_eq!(m.groups(), vec![Some("\""), Some("000")]);
}

#[test]
fn s7_digit_class_via_all_matches() {
    let v = AllMatches::new(r"a(\d)b", &RegexOptions::default()).unwrap();
    assert_eq!(v.len(), 10u32.into());
    let m = v.get(0).unwrap();
    assert_eq!(m.group(0), Some("a0b"));
    assert_eq!(m.group(1), Some("0"));
}

#[test]
fn s8_non_whole_pattern_anchor_compiles_to_empty_language() {
    let v = all("foo$");
    assert_eq!(v.len(), 0u32.into());
    assert!(v.get(0).is_err());
}

#[test]
fn s9_unbounded_star_uses_default_max_count() {
    let v = all("a*");
    assert_eq!(v.len(), 65536u32.into());
    assert_eq!(v.get(-1).unwrap().len(), 65535);
}
