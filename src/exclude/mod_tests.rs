use super::*;

fn filter(patterns: &[&str]) -> ClassExclusionFilter {
    ClassExclusionFilter::new(patterns)
}

#[test]
fn empty_filter_excludes_nothing() {
    let f = filter(&[]);
    assert!(f.is_empty());
    assert!(!f.is_excluded("com/example/Anything"));
}

#[test]
fn nested_class_pattern_excludes_only_nested_class() {
    let f = filter(&["**/CoveredClass$UncoveredNestedClass.*"]);

    assert!(f.is_excluded("com/example/CoveredClass$UncoveredNestedClass"));
    assert!(!f.is_excluded("com/example/CoveredClass"));
}

#[test]
fn outer_class_pattern_does_not_exclude_nested_class() {
    let f = filter(&["**/CoveredClass.*"]);

    assert!(f.is_excluded("com/example/CoveredClass"));
    assert!(!f.is_excluded("com/example/CoveredClass$Nested"));
}

#[test]
fn wildcard_on_class_segment_covers_nested_classes() {
    let f = filter(&["**/Outer*.*"]);

    assert!(f.is_excluded("a/Outer"));
    assert!(f.is_excluded("a/Outer$Inner"));
}

#[test]
fn recursive_directory_wildcard() {
    let f = filter(&["**/excludes/**/UncoveredClass.*"]);

    assert!(f.is_excluded("com/excludes/UncoveredClass"));
    assert!(f.is_excluded("com/excludes/deep/nested/UncoveredClass"));
    assert!(!f.is_excluded("com/includes/UncoveredClass"));
}

#[test]
fn single_star_stays_within_segment() {
    let f = filter(&["com/*/Foo.*"]);

    assert!(f.is_excluded("com/a/Foo"));
    assert!(!f.is_excluded("com/a/b/Foo"));
}

#[test]
fn whole_subpackage_pattern() {
    let f = filter(&["**/excludes/sub/**/*.*"]);

    assert!(f.is_excluded("com/excludes/sub/A"));
    assert!(f.is_excluded("com/excludes/sub/x/B$C"));
    assert!(!f.is_excluded("com/excludes/A"));
}

#[test]
fn dot_separated_class_names_are_matched_as_paths() {
    let f = filter(&["com/example/**"]);
    assert!(f.is_excluded("com.example.deep.Foo"));
}

#[test]
fn any_matching_pattern_excludes() {
    let f = filter(&["**/Nope.*", "**/Foo.*"]);
    assert!(f.is_excluded("x/Foo"));
}

#[test]
fn invalid_pattern_is_recorded_and_matches_nothing() {
    let f = filter(&["[invalid", "**/Foo.*"]);

    assert_eq!(f.invalid_patterns(), ["[invalid".to_string()]);
    assert!(f.is_excluded("x/Foo"));
    assert!(!f.is_excluded("x/Bar"));
}

#[test]
fn only_invalid_patterns_exclude_nothing() {
    let f = filter(&["[invalid"]);
    assert!(f.is_empty());
    assert!(!f.is_excluded("[invalid"));
}

#[test]
fn strict_rejects_invalid_pattern() {
    let result = ClassExclusionFilter::strict(&["**/Ok.*", "[invalid"]);
    assert!(matches!(
        result,
        Err(DeltaCoverageError::InvalidPattern { .. })
    ));
}

#[test]
fn duplicate_patterns_are_kept_once_in_order() {
    let f = filter(&["b/**", "a/**", "b/**"]);
    assert_eq!(f.patterns().collect::<Vec<_>>(), vec!["b/**", "a/**"]);
}

#[test]
fn empty_class_name_is_never_excluded() {
    let f = filter(&["**"]);
    assert!(!f.is_excluded(""));
}
