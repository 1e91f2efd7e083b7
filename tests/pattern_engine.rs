use regexp_explorer::{Flags, Pattern};
use std::ops::Range;

#[track_caller]
fn assert_match(
    pattern: &str,
    text: &str,
    expected_full: Range<usize>,
    expected_groups: &[Option<Range<usize>>],
) {
    let pattern = Pattern::new(pattern).unwrap_or_else(|err| panic!("{pattern:?}: {err}"));
    let Some(found) = pattern.find(text, 0) else {
        panic!("Expected match, but found none for pattern {pattern} in text {text:?}");
    };
    assert_eq!(found.range(), expected_full, "Full match range mismatch");
    assert_eq!(
        found.groups().collect::<Vec<_>>(),
        expected_groups,
        "Captures mismatch"
    );
}

#[track_caller]
fn assert_no_match(pattern: &str, text: &str) {
    let pattern = Pattern::new(pattern).unwrap_or_else(|err| panic!("{pattern:?}: {err}"));
    let found = pattern.find(text, 0);
    assert!(
        found.is_none(),
        "Expected no match, but found {found:?} for pattern {pattern} in text {text:?}"
    );
}

#[test]
fn test_literals() {
    assert_match("hello", "hello world", 0..5, &[]);
    assert_match("world", "hello world", 6..11, &[]);
    assert_no_match("xyz", "hello world");
    assert_match("", "abc", 0..0, &[]);
    assert_match("", "", 0..0, &[]);
}

#[test]
fn test_greedy_and_lazy() {
    assert_match("a*", "aaa", 0..3, &[]);
    assert_match("a*?", "aaa", 0..0, &[]);
    assert_match("a+?", "aaa", 0..1, &[]);
    assert_match("a{2,}?", "aaaa", 0..2, &[]);
    assert_match("<.+>", "<a><b>", 0..6, &[]);
    assert_match("<.+?>", "<a><b>", 0..3, &[]);
    assert_match("a??b", "ab", 0..2, &[]);
}

#[test]
fn test_counted_repetition() {
    assert_match("a{3}", "aaaa", 0..3, &[]);
    assert_match("a{2,3}", "aaaa", 0..3, &[]);
    assert_no_match("a{3}", "aa");
    assert_match("x{0}y", "xy", 1..2, &[]);
    assert_match("(ab){2}", "abababx", 0..4, &[Some(2..4)]);
}

#[test]
fn test_dot() {
    assert_match("a.c", "abc", 0..3, &[]);
    assert_no_match("a.c", "a\nc");
    assert_match(".+", "é漢字", 0..8, &[]);

    let dot_all = Pattern::with_flags("a.c", Flags::new().dot_all(true)).unwrap();
    assert_eq!(dot_all.find("a\nc", 0).map(|m| m.range()), Some(0..3));
}

#[test]
fn test_classes() {
    assert_match("[a-g]", "c", 0..1, &[]);
    assert_no_match("[a-g]", "h");
    assert_no_match("[^abc]", "a");
    assert_match("[^abc]", "d", 0..1, &[]);
    assert_match(r"\d+", "abc123def", 3..6, &[]);
    assert_match(r"\w+", "  foo_1 ", 2..7, &[]);
    assert_match(r"\s+", "a \t\nb", 1..4, &[]);
    assert_match(r"[\d.]+", "v1.25", 1..5, &[]);
    assert_match(r"\D\W", "1a!", 1..3, &[]);
}

#[test]
fn test_alternation_priority() {
    assert_match("a|ab", "ab", 0..1, &[]);
    assert_match("ab|a", "ab", 0..2, &[]);
    assert_match("(cat|dog)s", "hotdogs", 3..7, &[Some(3..6)]);
}

#[test]
fn test_captures() {
    assert_match(
        r"(\w+)@(\w+)\.com",
        "mail joe@example.com",
        5..20,
        &[Some(5..8), Some(9..16)],
    );
    assert_match("(a)|(b)", "b", 0..1, &[None, Some(0..1)]);
    assert_match("(a)?b", "b", 0..1, &[None]);
    assert_match("((a)b)", "ab", 0..2, &[Some(0..2), Some(0..1)]);
}

#[test]
fn test_captures_keep_last_iteration() {
    assert_match("(a|b)+", "abba", 0..4, &[Some(3..4)]);
    assert_match(r"(\d)*x", "123x", 0..4, &[Some(2..3)]);
    assert_match("(?:(a)|b)+", "ab", 0..2, &[Some(0..1)]);
}

#[test]
fn test_backreferences() {
    assert_match(r"(a)(b)\1", "aba", 0..3, &[Some(0..1), Some(1..2)]);
    assert_no_match(r"(a)(b)\1", "abb");
    assert_match(r"(\w+) \1", "hey ho ho", 4..9, &[Some(4..6)]);
    assert_no_match(r"(a)?b\1", "b");

    let ci = Pattern::with_flags(r"(ab)\1", Flags::new().case_insensitive(true)).unwrap();
    assert_eq!(ci.find("abAB", 0).map(|m| m.range()), Some(0..4));
}

#[test]
fn test_anchors() {
    assert_match("^abc", "abcabc", 0..3, &[]);
    assert_match("abc$", "abcabc", 3..6, &[]);
    assert_no_match("^abc$", "xx\nabc\nyy");
    assert_no_match("^b", "ab");
    assert_match(r"\bfoo\b", "a foo.", 2..5, &[]);
    assert_no_match(r"\bfoo\b", "afoo");
    assert_match(r"\Bo\B", "foo", 1..2, &[]);
    assert_match(r"\Aa", "aa", 0..1, &[]);
    assert_match(r"a\z", "aa", 1..2, &[]);

    let multiline = Pattern::with_flags("^abc$", Flags::new().multiline(true)).unwrap();
    let found = multiline.find("xx\nabc\nyy", 0).unwrap();
    assert_eq!(found.range(), 3..6);
    assert_eq!(found.as_str(), "abc");

    // A multiline `^` never matches at the end of the input.
    let line_start = Pattern::with_flags("^", Flags::new().multiline(true)).unwrap();
    assert_eq!(line_start.find("", 0), None);
    let starts: Vec<_> = line_start.find_all("a\n").map(|m| m.start()).collect();
    assert_eq!(starts, [0]);
    assert_eq!(
        Pattern::new("^").unwrap().find("", 0).map(|m| m.range()),
        Some(0..0)
    );
}

#[test]
fn test_lookaround() {
    assert_match("a(?=b)", "ab", 0..1, &[]);
    assert_no_match("a(?=b)", "ac");
    assert_match("a(?!b)", "abac", 2..3, &[]);
    assert_match("(?<=x)a", "axa", 2..3, &[]);
    assert_match("(?<!x)a", "xaa", 2..3, &[]);
    assert_match(r"(?<=\d{3})x", "12x123x", 6..7, &[]);
    assert_match("(?=(a+))a", "aaa", 0..1, &[Some(0..3)]);
    assert_match("(?<=(a))b", "ab", 1..2, &[Some(0..1)]);
}

#[test]
fn test_case_insensitive() {
    let pattern = Pattern::with_flags("hello [a-z]+", Flags::new().case_insensitive(true)).unwrap();
    assert_eq!(
        pattern.find("Say HELLO World", 0).map(|m| m.as_str()),
        Some("HELLO World")
    );
    let sigma = Pattern::with_flags("σ", Flags::new().case_insensitive(true)).unwrap();
    assert!(sigma.matches("Σ"));
}

#[test]
fn test_empty_loops_terminate() {
    assert_match("(a*)*", "aaa", 0..3, &[Some(3..3)]);
    assert_match("(a*)+b", "aab", 0..3, &[Some(2..2)]);
    assert_match("(a?)*?b", "aab", 0..3, &[Some(1..2)]);
    assert_match("(|a)+", "aa", 0..0, &[Some(0..0)]);
    assert_match("(?:a*|b)*c", "abac", 0..4, &[]);
}

#[test]
fn test_deep_nesting() {
    let pattern = format!("{}a{}", "(".repeat(200), ")".repeat(200));
    let pattern = Pattern::new(&pattern).unwrap();
    assert_eq!(pattern.capture_count(), 200);
    assert_eq!(pattern.find("xa", 0).map(|m| m.range()), Some(1..2));

    let long = "ab".repeat(50_000);
    let pattern = Pattern::new("(?:ab)*$").unwrap();
    assert!(pattern.matches(&long));
}

#[test]
fn test_matches_agrees_with_find() {
    let cases = [
        ("a|ab", "ab"),
        ("a*", "aaa"),
        ("a*?", "aaa"),
        ("(a|b)*c", "ababc"),
        ("x", "xx"),
        ("", ""),
        (r"(\w)\1", "aa"),
        ("(?=a)a", "a"),
        ("a(?!b)", "ab"),
    ];
    for (pattern, text) in cases {
        let pattern = Pattern::new(pattern).unwrap();
        let anchored = Pattern::new(&format!(r"\A(?:{pattern})\z")).unwrap();
        let spans_all = anchored
            .find(text, 0)
            .is_some_and(|m| m.range() == (0..text.len()));
        assert_eq!(pattern.matches(text), spans_all, "{pattern} on {text:?}");
    }
}

#[test]
fn test_pattern_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Pattern>();

    let pattern = &Pattern::new(r"\d+").unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = ["a1", "bb22", "ccc333"]
            .into_iter()
            .map(|text| scope.spawn(move || pattern.find(text, 0).map(|m| m.len())))
            .collect();
        let lens: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(lens, [Some(1), Some(2), Some(3)]);
    });
}
