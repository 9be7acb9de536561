use std::error::Error;

use char_automata::{
    dfa::{regex::Regex, sparse},
    nfa::thompson,
    syntax, Input, Match, MatchError, SearchKind,
};

fn both(pattern: &str) -> Vec<Regex> {
    [SearchKind::ForwardReverse, SearchKind::AllStates]
        .iter()
        .map(|&kind| {
            Regex::builder()
                .configure(Regex::config().search_kind(kind))
                .build(pattern)
                .unwrap()
        })
        .collect()
}

// The concrete scenarios every regex must get right.
#[test]
fn scenarios() -> Result<(), Box<dyn Error>> {
    let re = Regex::new("ab")?;
    assert!(re.matches("ab"));
    assert!(!re.matches("aab"));
    assert_eq!(Some(Match::new(2, 4)), re.find("xxabxx"));

    let re = Regex::new("a*")?;
    assert!(re.matches(""));
    assert!(re.matches("aaaa"));

    let re = Regex::new("a|b")?;
    assert!(re.matches("a"));
    assert!(re.matches("b"));
    assert!(!re.matches("ab"));

    let re = Regex::new("a{2,3}")?;
    assert!(re.matches("aa"));
    assert!(re.matches("aaa"));
    assert!(!re.matches("a"));
    assert!(!re.matches("aaaa"));

    Ok(())
}

#[test]
fn malformed_patterns_are_syntax_errors() {
    for pattern in &["(a", "a)", "*a", "a{3,2}", "[z-a]", "^a", r"a\b"] {
        let err = Regex::new(pattern).unwrap_err();
        assert!(err.is_syntax(), "{:?}: {}", pattern, err);
    }
}

#[test]
fn syntax_error_reports_offset() {
    let err = syntax::parse("ab(c").unwrap_err();
    assert_eq!(2, err.offset());
    assert_eq!("ab(c", err.pattern());
    assert!(err.to_string().starts_with("regex parse error at offset 2"));
}

#[test]
fn class_equals_alternation() -> Result<(), Box<dyn Error>> {
    let class = Regex::new("[a-c]")?;
    let alt = Regex::new("(a|b|c)")?;
    for ch in (0u32..0x250).chain(0x2600..0x2610).filter_map(char::from_u32)
    {
        let s = ch.to_string();
        assert_eq!(class.matches(&s), alt.matches(&s), "{:?}", ch);
    }
    assert_eq!(class.forward().len(), alt.forward().len());
    Ok(())
}

#[test]
fn search_rejects_invalid_bounds() -> Result<(), Box<dyn Error>> {
    let re = Regex::new("a")?;
    assert_eq!(
        Err(MatchError::InvalidSpan { start: 2, end: 1, len: 3 }),
        re.search(&Input::new("aaa").range(2..1)),
    );
    assert_eq!(
        Err(MatchError::InvalidSpan { start: 0, end: 4, len: 3 }),
        re.search(&Input::new("aaa").range(0..4)),
    );
    assert_eq!(
        Err(MatchError::NotCharBoundary { offset: 1 }),
        re.search(&Input::new("☃a").range(1..4)),
    );
    assert_eq!(Ok(None), re.search(&Input::new("aaa").range(3..3)));
    Ok(())
}

#[test]
fn anchored_search() {
    for re in both("[0-9]+") {
        let input = Input::new("ab123").anchored(true);
        assert_eq!(Ok(None), re.search(&input));
        let input = Input::new("ab123").range(2..5).anchored(true);
        assert_eq!(Ok(Some(Match::new(2, 5))), re.search(&input));
        let input = Input::new("ab123").range(2..4).anchored(true);
        assert_eq!(Ok(Some(Match::new(2, 4))), re.search(&input));
    }
}

#[test]
fn bounded_and_anchored_searches() {
    let cases = &[
        ("a*", "baa", 0..3, true, Some((0, 0))),
        ("a*", "baa", 1..3, true, Some((1, 3))),
        ("a*", "baa", 1..2, false, Some((1, 2))),
        ("b|ab", "xab", 1..3, true, Some((1, 3))),
        ("b|ab", "xab", 2..3, true, Some((2, 3))),
        ("ab", "xab", 1..2, false, None),
        ("ab", "xab", 0..3, true, None),
        ("a+", "aaba", 1..4, false, Some((1, 2))),
        ("☃b", "a☃b", 1..5, true, Some((1, 5))),
    ];
    for &(pattern, haystack, ref span, anchored, expected) in cases {
        let input = Input::new(haystack)
            .range(span.clone())
            .anchored(anchored);
        for re in both(pattern) {
            let got = re.search(&input).unwrap().map(|m| (m.start(), m.end()));
            assert_eq!(
                expected,
                got,
                "{:?} on {:?}[{:?}] anchored={} with {:?}",
                pattern,
                haystack,
                span,
                anchored,
                re.search_kind(),
            );
        }
    }
}

#[test]
fn search_kinds_agree_on_leftmost_longest() {
    let cases = &[
        ("a|ab|abc", "xabcd", Some((1, 4))),
        ("ab|bcdef", "abcdef", Some((0, 2))),
        ("b|abc|bcd", "xbcd", Some((1, 4))),
        ("(ab)*c", "ababab", None),
        ("(ab)*c", "abxabc", Some((3, 6))),
        ("(ab)+c", "abababc", Some((0, 7))),
        ("x+", "aaa", None),
    ];
    for &(pattern, haystack, expected) in cases {
        for re in both(pattern) {
            let got = re.find(haystack).map(|m| (m.start(), m.end()));
            assert_eq!(
                expected,
                got,
                "{:?} on {:?} with {:?}",
                pattern,
                haystack,
                re.search_kind(),
            );
        }
    }
}

#[test]
fn find_iter() {
    for re in both("[a-z]+|[0-9]+") {
        let got: Vec<Match> = re.find_iter("ab 12 c3").collect();
        assert_eq!(
            vec![
                Match::new(0, 2),
                Match::new(3, 5),
                Match::new(6, 7),
                Match::new(7, 8),
            ],
            got,
        );
    }
    for re in both("a*") {
        let got: Vec<(usize, usize)> =
            re.find_iter("baab").map(|m| (m.start(), m.end())).collect();
        assert_eq!(vec![(0, 0), (1, 3), (4, 4)], got);
    }
}

#[test]
fn contained_in() -> Result<(), Box<dyn Error>> {
    let re = Regex::new("b+c")?;
    assert!(re.contained_in("aabbbcd"));
    assert!(!re.contained_in("aabbbd"));
    assert!(!re.matches("aabbbcd"));
    Ok(())
}

#[test]
fn prefilter_is_built_from_common_prefix() -> Result<(), Box<dyn Error>> {
    let re = Regex::new("foo(bar|baz)")?;
    assert!(re.has_prefilter());
    assert_eq!(Some("foo"), re.properties().prefix());
    assert_eq!(Some(Match::new(8, 14)), re.find("foo fob foobaz"));

    let re = Regex::builder()
        .configure(Regex::config().prefilter(false))
        .build("foo(bar|baz)")?;
    assert!(!re.has_prefilter());
    assert_eq!(Some(Match::new(8, 14)), re.find("foo fob foobaz"));

    let re = Regex::new("[a-z]oo")?;
    assert!(!re.has_prefilter());
    Ok(())
}

#[test]
fn properties() -> Result<(), Box<dyn Error>> {
    let re = Regex::new("ab{2,4}c?")?;
    assert_eq!(3, re.properties().min_len());
    assert_eq!(Some(6), re.properties().max_len());

    let re = Regex::new("x*y")?;
    assert_eq!(1, re.properties().min_len());
    assert_eq!(None, re.properties().max_len());
    assert_eq!(Some("y"), re.properties().suffix());
    Ok(())
}

#[test]
fn size_limits() {
    let err = Regex::builder()
        .thompson(thompson::Config::new().nfa_size_limit(Some(50)))
        .build("a{100}")
        .unwrap_err();
    assert!(!err.is_syntax());

    let err = Regex::builder()
        .sparse(sparse::Config::new().determinize_size_limit(Some(16)))
        .build("[ab]*a[ab]{6}")
        .unwrap_err();
    assert!(!err.is_syntax());
    assert!(err.to_string().contains("16"));

    let err = Regex::builder()
        .syntax(syntax::Config::new().nest_limit(3))
        .build("((((a))))")
        .unwrap_err();
    assert!(err.is_syntax());
}

// The length of a pattern must not decide how deep the recursive phases go.
#[test]
fn long_patterns_compile_on_a_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let re = Regex::new(&vec!["a"; 20_000].join("|")).unwrap();
            assert!(re.matches("a"));
            assert!(!re.matches("aa"));

            let re = Regex::new(&"a*".repeat(50_000)).unwrap();
            assert!(re.matches("aaaa"));
            assert_eq!(Some(Match::new(0, 2)), re.find("aab"));

            let class: String = (0..10_000u32)
                .filter_map(|i| char::from_u32(0x4E00 + 2 * i))
                .collect();
            let re = Regex::new(&format!("[{}]", class)).unwrap();
            assert!(re.matches("\u{4E02}"));
            assert!(!re.matches("\u{4E01}"));

            let err = Regex::new(&format!("a{}", "*".repeat(10_000)))
                .unwrap_err();
            assert!(err.is_syntax());
        })
        .unwrap();
    handle.join().unwrap();
}

#[test]
fn minimal_dfa_is_smaller() -> Result<(), Box<dyn Error>> {
    let dfa = sparse::DFA::builder()
        .configure(sparse::Config::new().minimize(false))
        .build("(a|b)*abb")?;
    let min = sparse::DFA::new("(a|b)*abb")?;
    assert!(min.len() < dfa.len());
    assert_eq!(4, min.len());
    Ok(())
}

#[test]
fn reverse_dfa_accepts_reversed_strings() -> Result<(), Box<dyn Error>> {
    let re = Regex::new("ab+c")?;
    assert!(re.forward().is_match("abbc"));
    assert!(re.reverse().is_match("cbba"));
    assert!(!re.reverse().is_match("abbc"));
    Ok(())
}
