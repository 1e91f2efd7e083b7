use regexp_explorer::{Error, Match, Pattern, Repl};

fn replace(text: &str, pattern: &str, repl: Repl<'_>, limit: Option<usize>) -> (String, usize) {
    Pattern::new(pattern)
        .unwrap()
        .replace(text, repl, limit)
        .unwrap()
}

#[test]
fn test_basic_replace() {
    assert_eq!(
        replace("hello world", "o", Repl::Template("0"), None),
        ("hell0 w0rld".to_owned(), 2)
    );
    assert_eq!(
        replace("hello world", "l+", Repl::Template("L"), None),
        ("heLo worLd".to_owned(), 2)
    );
    assert_eq!(
        replace("hello", "x", Repl::Template("y"), None),
        ("hello".to_owned(), 0)
    );
    assert_eq!(
        replace("", "a*", Repl::Template("-"), None),
        ("-".to_owned(), 1)
    );
}

#[test]
fn test_replace_limit() {
    assert_eq!(
        replace("aaaa", "a", Repl::Template("b"), Some(2)),
        ("bbaa".to_owned(), 2)
    );
    assert_eq!(
        replace("aaaa", "a", Repl::Template("b"), Some(0)),
        ("aaaa".to_owned(), 0)
    );
}

#[test]
fn test_replace_groups() {
    assert_eq!(
        replace("John Smith", r"(\w+) (\w+)", Repl::Template("$2, $1"), None),
        ("Smith, John".to_owned(), 1)
    );
    assert_eq!(
        replace("abc", "b", Repl::Template("[$0]"), None),
        ("a[b]c".to_owned(), 1)
    );
    assert_eq!(
        replace("a-b", "(a)|(b)", Repl::Template("<$1$2>"), None),
        ("<a>-<b>".to_owned(), 2)
    );
    // `$11` with one group is group 1 followed by a literal `1`.
    assert_eq!(
        replace("x", "(x)", Repl::Template("$11"), None),
        ("x1".to_owned(), 1)
    );
    assert_eq!(
        replace("cost", "cost", Repl::Template(r"\$5 \\ \x"), None),
        (r"$5 \ x".to_owned(), 1)
    );
}

#[test]
fn test_replace_empty_matches() {
    assert_eq!(
        replace("abc", "", Repl::Template("-"), None),
        ("-a-b-c-".to_owned(), 4)
    );
    assert_eq!(
        replace("baaa", "a*", Repl::Template("X"), None),
        ("XbXX".to_owned(), 3)
    );
    assert_eq!(
        replace("héé", "x*", Repl::Template("."), None),
        (".h.é.é.".to_owned(), 4)
    );
}

#[test]
fn test_replace_function() {
    assert_eq!(
        replace(
            "1 22 333",
            r"\d+",
            Repl::Function(Box::new(|m: &Match<'_>| m.len().to_string())),
            None
        ),
        ("1 2 3".to_owned(), 3)
    );

    let suffix = String::from("!");
    assert_eq!(
        replace(
            "hi there",
            r"(\w)(\w*)",
            Repl::Function(Box::new(|m: &Match<'_>| {
                let first = m.group_str(1).unwrap_or_default().to_uppercase();
                format!("{first}{}{suffix}", m.group_str(2).unwrap_or_default())
            })),
            None
        ),
        ("Hi! There!".to_owned(), 2)
    );
}

#[test]
fn test_replace_all() {
    let pattern = Pattern::new(r"\s+").unwrap();
    assert_eq!(
        pattern.replace_all("a  b \t c", " ").unwrap(),
        "a b c".to_owned()
    );
}

#[test]
fn test_replace_template_errors() {
    let pattern = Pattern::new("(a)").unwrap();
    assert_eq!(
        pattern.replace_all("a", "$"),
        Err(Error::ReplacementSyntax { pos: 0 })
    );
    assert_eq!(
        pattern.replace_all("a", "x$2"),
        Err(Error::ReplacementGroup { pos: 1, index: 2 })
    );
    assert_eq!(
        pattern.replace_all("a", "x\\"),
        Err(Error::ReplacementEscape { pos: 1 })
    );
    // Templates are checked even when nothing matches.
    assert_eq!(
        pattern.replace_all("b", "$9"),
        Err(Error::ReplacementGroup { pos: 0, index: 9 })
    );
}
