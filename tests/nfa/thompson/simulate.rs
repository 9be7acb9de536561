use char_automata::nfa::thompson::{Compiler, Simulation, NFA};

use ret::{CompiledRegex, RegexTest, TestResult, TestRunner};

use crate::{suite, Result};

/// Runs the test suite directly on the NFA, without building a DFA.
///
/// The simulation has no iterator, so only whole-string matches and single
/// searches are checked.
#[test]
fn default() -> Result<()> {
    TestRunner::new()?
        .test_iter(suite()?.iter(), |_, pattern| {
            let nfa = Compiler::new().build(pattern)?;
            Ok(CompiledRegex::compiled(move |test| run_test(&nfa, test)))
        })
        .assert();
    Ok(())
}

fn run_test(nfa: &NFA, test: &RegexTest) -> Vec<TestResult> {
    let mut sim = Simulation::new(nfa);
    let mut results = vec![];
    if test.full_match().is_some() {
        let yes = sim.is_match(test.input());
        results.push(TestResult::full_matched(yes).name("is_match"));
    }

    let found = leftmost_longest(&mut sim, test);
    if test.is_match().is_some() {
        results.push(TestResult::matched(found.is_some()).name("search"));
    }
    if test.matches().is_some() {
        if test.anchored() || test.has_bounds() {
            let it = found.map(|(start, end)| ret::Match { start, end });
            results.push(TestResult::matches(it).name("search"));
        } else {
            results.push(TestResult::skip());
        }
    }
    results
}

/// Try every permitted start offset in turn and return the first match.
fn leftmost_longest(
    sim: &mut Simulation<'_>,
    test: &RegexTest,
) -> Option<(usize, usize)> {
    let (start, end) = test.bounds();
    let haystack = &test.input()[..end];
    let mut at = start;
    loop {
        if let Some(m) = sim.longest_match_at(haystack, at) {
            return Some((at, m));
        }
        if test.anchored() {
            return None;
        }
        at += haystack[at..].chars().next()?.len_utf8();
    }
}
