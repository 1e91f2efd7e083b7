use regexp_explorer::{
    Error, Flags, MAX_NESTING, MAX_REPEAT,
    ast::{Anchor, AstNode, AstRoot, LookKind, Quantifier, parse_pattern},
    charset::CharSet,
};

fn parse_ok(pattern: &str) -> AstRoot {
    parse_pattern(pattern, Flags::default())
        .unwrap_or_else(|err| panic!("Parser failed for pattern {pattern:?}: {err}"))
}

fn parse_err(pattern: &str) -> Error {
    match parse_pattern(pattern, Flags::default()) {
        Ok(ast) => panic!("Parser accepted {pattern:?} as {:?}", *ast),
        Err(err) => err,
    }
}

fn repeat(inner: AstNode, quantifier: Quantifier) -> AstNode {
    AstNode::Repeat {
        inner: Box::new(inner),
        quantifier,
    }
}

fn group(inner: AstNode, index: Option<usize>) -> AstNode {
    AstNode::Group {
        inner: Box::new(inner),
        index,
    }
}

fn lit(c: char) -> AstNode {
    AstNode::Literal(c)
}

fn make_set(chars: &str, ranges: &[(char, char)], classes: &str) -> CharSet {
    let mut set = CharSet::new();
    for c in chars.chars() {
        set.add_char(c);
    }
    for &(start, end) in ranges {
        set.add_range(start, end).unwrap();
    }
    for class in classes.chars() {
        set.add_class(class).unwrap();
    }
    set
}

#[test]
fn test_simple_sequence_parser() {
    assert_eq!(
        parse_ok("abc"),
        AstNode::Concat(vec![lit('a'), lit('b'), lit('c')])
    );
    assert_eq!(parse_ok("a"), lit('a'));
    assert_eq!(parse_ok(""), AstNode::empty());
    assert_eq!(
        parse_ok(r"a.\d"),
        AstNode::Concat(vec![
            lit('a'),
            AstNode::AnyChar,
            AstNode::Class {
                set: make_set("", &[('0', '9')], ""),
                negated: false
            }
        ])
    );
    assert_eq!(
        parse_ok(r"\W"),
        AstNode::Class {
            set: make_set("", &[], "w"),
            negated: true
        }
    );
}

#[test]
fn test_anchors_parser() {
    assert_eq!(
        parse_ok("^a$"),
        AstNode::Concat(vec![
            AstNode::Anchor(Anchor::StartInput),
            lit('a'),
            AstNode::Anchor(Anchor::EndInput)
        ])
    );
    assert_eq!(
        *parse_pattern("^a$", Flags::new().multiline(true)).unwrap(),
        AstNode::Concat(vec![
            AstNode::Anchor(Anchor::StartLine),
            lit('a'),
            AstNode::Anchor(Anchor::EndLine)
        ])
    );
    assert_eq!(
        *parse_pattern(r"\A\b\B\z", Flags::new().multiline(true)).unwrap(),
        AstNode::Concat(vec![
            AstNode::Anchor(Anchor::StartInput),
            AstNode::Anchor(Anchor::WordBoundary),
            AstNode::Anchor(Anchor::NotWordBoundary),
            AstNode::Anchor(Anchor::EndInput)
        ])
    );
}

#[test]
fn test_quantifiers_parser() {
    assert_eq!(parse_ok("a*"), repeat(lit('a'), Quantifier::STAR));
    assert_eq!(parse_ok("a+?"), repeat(lit('a'), Quantifier::PLUS.lazy()));
    assert_eq!(parse_ok("a??"), repeat(lit('a'), Quantifier::QUESTION.lazy()));
    assert_eq!(
        parse_ok("a{2,5}?"),
        repeat(lit('a'), Quantifier::new(2, Some(5)).lazy())
    );
    assert_eq!(parse_ok("a{3,}"), repeat(lit('a'), Quantifier::new(3, None)));
    assert_eq!(
        parse_ok("ab*"),
        AstNode::Concat(vec![lit('a'), repeat(lit('b'), Quantifier::STAR)])
    );
}

#[test]
fn test_alternation_parser() {
    assert_eq!(
        parse_ok("ab|c|"),
        AstNode::Alternation(vec![
            AstNode::Concat(vec![lit('a'), lit('b')]),
            lit('c'),
            AstNode::empty()
        ])
    );
}

#[test]
fn test_groups_parser() {
    let ast = parse_ok("(a(b))(?:c)");
    assert_eq!(ast.capture_count(), 2);
    assert_eq!(
        ast,
        AstNode::Concat(vec![
            group(
                AstNode::Concat(vec![lit('a'), group(lit('b'), Some(2))]),
                Some(1)
            ),
            group(lit('c'), None)
        ])
    );
    assert_eq!(parse_ok("()"), group(AstNode::empty(), Some(1)));
}

#[test]
fn test_backreference_parser() {
    assert_eq!(
        parse_ok(r"(a)\1"),
        AstNode::Concat(vec![group(lit('a'), Some(1)), AstNode::Backreference(1)])
    );
    // A reference may precede its group.
    assert_eq!(
        parse_ok(r"\1(a)"),
        AstNode::Concat(vec![AstNode::Backreference(1), group(lit('a'), Some(1))])
    );
    assert_eq!(
        parse_err(r"(a)\2"),
        Error::InvalidBackreference { pos: 3, index: 2 }
    );
    assert_eq!(
        parse_err(r"(a)\10"),
        Error::InvalidBackreference { pos: 3, index: 10 }
    );
}

#[test]
fn test_lookaround_parser() {
    assert_eq!(
        parse_ok("a(?=b)"),
        AstNode::Concat(vec![
            lit('a'),
            AstNode::Lookaround {
                inner: Box::new(lit('b')),
                kind: LookKind::AheadPositive
            }
        ])
    );
    assert_eq!(
        parse_ok("(?<!ab|c)"),
        AstNode::Lookaround {
            inner: Box::new(AstNode::Alternation(vec![
                AstNode::Concat(vec![lit('a'), lit('b')]),
                lit('c')
            ])),
            kind: LookKind::BehindNegative
        }
    );
    assert_eq!(parse_err("x(?<=a+)"), Error::UnboundedLookbehind { pos: 1 });
    assert_eq!(parse_err(r"(a)(?<=\1)"), Error::UnboundedLookbehind { pos: 3 });
}

#[test]
fn test_sets_parser() {
    assert_eq!(
        parse_ok("[a-g]"),
        AstNode::Class {
            set: make_set("", &[('a', 'g')], ""),
            negated: false
        }
    );
    assert_eq!(
        parse_ok("[^abc]"),
        AstNode::Class {
            set: make_set("abc", &[], ""),
            negated: true
        }
    );
    assert_eq!(
        parse_ok(r"[-a\d-]"),
        AstNode::Class {
            set: make_set("-a", &[], "d"),
            negated: false
        }
    );
    assert_eq!(
        parse_ok(r"[]\w.]"),
        AstNode::Class {
            set: make_set("].", &[], "w"),
            negated: false
        }
    );
    assert_eq!(
        parse_ok("[+--]"),
        AstNode::Class {
            set: make_set("", &[('+', '-')], ""),
            negated: false
        }
    );
}

#[test]
fn test_syntax_errors_parser() {
    assert_eq!(parse_err("(abc"), Error::UnclosedGroup { pos: 0 });
    assert_eq!(parse_err("a(b(c)"), Error::UnclosedGroup { pos: 1 });
    assert_eq!(parse_err("abc)"), Error::UnmatchedParen { pos: 3 });
    assert_eq!(parse_err("[abc"), Error::UnclosedClass { pos: 0 });
    assert_eq!(parse_err("x[^"), Error::UnclosedClass { pos: 1 });
    assert_eq!(
        parse_err("*a"),
        Error::DanglingQuantifier { pos: 0, lit: '*' }
    );
    assert_eq!(
        parse_err("a|?"),
        Error::DanglingQuantifier { pos: 2, lit: '?' }
    );
    assert_eq!(
        parse_err("a**"),
        Error::DanglingQuantifier { pos: 2, lit: '*' }
    );
    assert_eq!(
        parse_err("^*"),
        Error::DanglingQuantifier { pos: 1, lit: '*' }
    );
    assert_eq!(parse_err("a{3,2}"), Error::InvalidRepetition { pos: 1 });
    assert_eq!(
        parse_err("a{10001}"),
        Error::RepetitionTooLarge {
            pos: 1,
            count: MAX_REPEAT + 1
        }
    );
    assert!(matches!(
        parse_err("[z-a]"),
        Error::CharSet { pos: 1, .. }
    ));
}

#[test]
fn test_error_positions_parser() {
    for (pattern, pos) in [("(abc", 0), ("ab)", 2), ("é[", 1), (r"é\q", 1)] {
        let err = parse_err(pattern);
        assert!(err.is_syntax());
        assert_eq!(err.position(), Some(pos), "{pattern:?}: {err}");
    }
}

#[test]
fn test_nesting_limit_parser() {
    let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));

    let ast = parse_ok(&nested(MAX_NESTING));
    assert_eq!(ast.capture_count(), MAX_NESTING);

    assert_eq!(
        parse_err(&nested(MAX_NESTING + 1)),
        Error::NestingTooDeep { pos: MAX_NESTING }
    );
    assert_eq!(
        parse_err(&nested(100_000)),
        Error::NestingTooDeep { pos: MAX_NESTING }
    );
    assert_eq!(
        parse_err(&"(?:(?=".repeat(MAX_NESTING)),
        Error::NestingTooDeep {
            pos: 3 * MAX_NESTING
        }
    );
}
