use char_automata::{
    dfa::{
        regex::{self, Regex},
        sparse,
    },
    SearchKind,
};

use ret::{CompiledRegex, RegexTest, TestResult, TestRunner};

use crate::{create_input, suite, Result};

/// Runs the test suite with the default configuration.
#[test]
fn forward_reverse_default() -> Result<()> {
    let builder = Regex::builder();
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Runs the test suite on unminimized DFAs.
#[test]
fn forward_reverse_unminimized() -> Result<()> {
    let mut builder = Regex::builder();
    builder.sparse(sparse::Config::new().minimize(false));
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Runs the test suite with the literal prefilter disabled.
#[test]
fn forward_reverse_no_prefilter() -> Result<()> {
    let mut builder = Regex::builder();
    builder.configure(Regex::config().prefilter(false));
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Runs the test suite by tracking all live states in a single pass.
#[test]
fn all_states_default() -> Result<()> {
    let mut builder = Regex::builder();
    builder.configure(Regex::config().search_kind(SearchKind::AllStates));
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Runs the test suite by tracking all live states on unminimized DFAs.
#[test]
fn all_states_unminimized() -> Result<()> {
    let mut builder = Regex::builder();
    builder
        .configure(Regex::config().search_kind(SearchKind::AllStates))
        .sparse(sparse::Config::new().minimize(false));
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Runs the test suite by tracking all live states without a prefilter.
#[test]
fn all_states_no_prefilter() -> Result<()> {
    let mut builder = Regex::builder();
    builder.configure(
        Regex::config().search_kind(SearchKind::AllStates).prefilter(false),
    );
    TestRunner::new()?.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

fn compiler(
    builder: regex::Builder,
) -> impl FnMut(&RegexTest, &str) -> Result<CompiledRegex> {
    move |_, pattern| {
        let re = builder.build(pattern)?;
        Ok(CompiledRegex::compiled(move |test| run_test(&re, test)))
    }
}

fn run_test(re: &Regex, test: &RegexTest) -> Vec<TestResult> {
    let mut results = vec![];
    if test.full_match().is_some() {
        let yes = re.matches(test.input());
        results.push(TestResult::full_matched(yes).name("matches"));
    }

    let input = create_input(test);
    let single = test.anchored() || test.has_bounds();
    if test.is_match().is_some() {
        let yes = if single {
            re.search(&input).unwrap().is_some()
        } else {
            re.contained_in(test.input())
        };
        results.push(TestResult::matched(yes).name("contained_in"));
    }
    if test.matches().is_some() {
        if single {
            let it = re.search(&input).unwrap().map(to_ret);
            results.push(TestResult::matches(it).name("search"));
        } else {
            let limit = test.match_limit().unwrap_or(std::usize::MAX);
            let it = re.find_iter(test.input()).take(limit).map(to_ret);
            results.push(TestResult::matches(it).name("find_iter"));
        }
    }
    results
}

fn to_ret(m: char_automata::Match) -> ret::Match {
    ret::Match { start: m.start(), end: m.end() }
}
