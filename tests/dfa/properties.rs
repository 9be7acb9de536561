use char_automata::{
    dfa::{regex::Regex, sparse},
    nfa::thompson::{Compiler, Simulation},
    syntax, Input, Match, SearchKind,
};
use quickcheck::{quickcheck, TestResult};

use crate::util::{self, Haystack, Pattern};

fn regex(pattern: &str, kind: SearchKind, minimize: bool) -> Regex {
    Regex::builder()
        .configure(Regex::config().search_kind(kind))
        .sparse(sparse::Config::new().minimize(minimize))
        .build(pattern)
        .unwrap()
}

fn unminimized(pattern: &str) -> sparse::DFA {
    sparse::DFA::builder()
        .configure(sparse::Config::new().minimize(false))
        .build(pattern)
        .unwrap()
}

quickcheck! {
    // A minimal DFA, the unminimized DFA, a direct simulation of the NFA and
    // the naive AST matcher all accept exactly the same strings.
    fn whole_string_acceptance_agrees(
        pattern: Pattern,
        hay: Haystack
    ) -> bool {
        let (pattern, hay) = (&pattern.0, &hay.0);
        let ast = syntax::parse(pattern).unwrap();
        let nfa = Compiler::new().build(pattern).unwrap();
        let expected = util::full_match(&ast, hay);
        let simulated = Simulation::new(&nfa).is_match(hay);
        let min = sparse::DFA::new(pattern).unwrap().is_match(hay);
        let unmin = unminimized(pattern).is_match(hay);
        expected == simulated && expected == min && expected == unmin
    }

    // Both search kinds, on minimized and unminimized DFAs, find the same
    // leftmost-longest match as the naive matcher.
    fn search_kinds_agree(pattern: Pattern, hay: Haystack) -> bool {
        let (pattern, hay) = (&pattern.0, &hay.0);
        let ast = syntax::parse(pattern).unwrap();
        let expected = util::find(&ast, hay);
        let kinds = [SearchKind::AllStates, SearchKind::ForwardReverse];
        kinds.iter().all(|&kind| {
            [true, false].iter().all(|&minimize| {
                let re = regex(pattern, kind, minimize);
                let got = re.find(hay).map(|m| (m.start(), m.end()));
                got == expected
            })
        })
    }

    // The same holds for searches confined to a span of the haystack,
    // anchored or not.
    fn bounded_search_kinds_agree(
        pattern: Pattern,
        hay: Haystack,
        bounds: (usize, usize),
        anchored: bool
    ) -> bool {
        let (pattern, hay) = (&pattern.0, &hay.0);
        let ast = syntax::parse(pattern).unwrap();
        let (start, end) = util::start_end(hay, bounds.0, bounds.1);
        let expected = util::find_in(&ast, hay, (start, end), anchored)
            .map(|(s, e)| Match::new(s, e));
        let input = Input::new(hay).range(start..end).anchored(anchored);
        let kinds = [SearchKind::AllStates, SearchKind::ForwardReverse];
        kinds.iter().all(|&kind| {
            [true, false].iter().all(|&minimize| {
                let re = regex(pattern, kind, minimize);
                re.search(&input) == Ok(expected)
            })
        })
    }

    fn whole_match_is_found(pattern: Pattern, hay: Haystack) -> TestResult {
        let re = Regex::new(&pattern.0).unwrap();
        if !re.matches(&hay.0) {
            return TestResult::discard();
        }
        let m = re.find(&hay.0).unwrap();
        TestResult::from_bool(m.start() == 0 && m.end() == hay.0.len())
    }

    fn minimize_is_idempotent(pattern: Pattern) -> bool {
        let min = unminimized(&pattern.0).minimize();
        min.len() == min.minimize().len()
    }

    fn minimize_never_grows(pattern: Pattern) -> bool {
        let dfa = unminimized(&pattern.0);
        dfa.minimize().len() <= dfa.len()
    }

    // Every state's outgoing ranges are non-empty, sorted and disjoint.
    fn transitions_are_disjoint(pattern: Pattern) -> bool {
        let dfa = unminimized(&pattern.0);
        let dfas = vec![dfa.minimize(), dfa];
        dfas.iter().all(|dfa| {
            dfa.states().iter().all(|state| {
                let ts = state.transitions();
                ts.iter().all(|&(r, _)| !r.is_empty())
                    && ts.windows(2).all(|w| w[0].0.end() < w[1].0.start())
            })
        })
    }

    // The reverse DFA accepts exactly the reversals of what the forward DFA
    // accepts.
    fn reverse_accepts_reversals(pattern: Pattern, hay: Haystack) -> bool {
        let re = Regex::new(&pattern.0).unwrap();
        let reversed: String = hay.0.chars().rev().collect();
        re.forward().is_match(&hay.0) == re.reverse().is_match(&reversed)
    }

    // An escaped string matches itself and nothing else.
    fn escaped_literal_matches_only_itself(
        text: String,
        other: String
    ) -> bool {
        let re = Regex::new(&syntax::escape(&text)).unwrap();
        re.matches(&text) && re.matches(&other) == (other == text)
    }
}

// Patterns with no shared structure still collapse to the same minimal DFA
// when they denote the same language.
#[test]
fn equivalent_patterns_minimize_to_the_same_size() {
    let pairs = &[
        ("[a-c]", "a|b|c"),
        ("(a|b)*", "(a*b*)*"),
        ("a{2,3}", "aaa?"),
        ("(ab)*a", "a(ba)*"),
    ];
    for &(p1, p2) in pairs {
        let d1 = sparse::DFA::new(p1).unwrap();
        let d2 = sparse::DFA::new(p2).unwrap();
        assert_eq!(d1.len(), d2.len(), "{:?} vs {:?}", p1, p2);
    }
}
