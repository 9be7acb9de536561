/*!
A harness for running regex tests described in TOML files.

Each file holds a list of `[[tests]]` tables. A test names a pattern and an
input, and states at least one expectation:

* `match`: whether the pattern matches somewhere in the input.
* `full_match`: whether the pattern matches the input in its entirety.
* `matches`: the non-overlapping matches, each as `[start, end]` byte
  offsets.

A test may also restrict the search with `bounds = [start, end]` and
`anchored = true`, cap the number of reported matches with `match_limit`, or
declare that the pattern must be rejected with `compiles = false`.

A [`TestRunner`] compiles each pattern with a caller supplied closure, runs
the resulting matcher and compares what it reports against the test. All
failures are collected and reported together when [`TestRunner::assert`] is
called.
*/

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const ENV_FILTER: &str = "REGEX_TEST";
const ENV_VERBOSE: &str = "REGEX_TEST_VERBOSE";

/// Tests loaded from one or more TOML files.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RegexTests {
    tests: Vec<RegexTest>,
    #[serde(skip)]
    names: HashSet<String>,
}

/// One pattern, one input and the outcomes expected from searching it.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexTest {
    #[serde(skip)]
    group: String,
    #[serde(default)]
    name: String,
    #[serde(skip)]
    full_name: String,
    regex: String,
    input: String,
    #[serde(rename = "match")]
    is_match: Option<bool>,
    full_match: Option<bool>,
    matches: Option<Vec<Match>>,
    bounds: Option<[usize; 2]>,
    match_limit: Option<usize>,
    #[serde(default = "default_true")]
    compiles: bool,
    #[serde(default)]
    anchored: bool,
}

/// A match span, in byte offsets. In TOML it is written `[start, end]`.
#[derive(Clone, Copy, Deserialize, Eq, PartialEq)]
#[serde(from = "[usize; 2]")]
pub struct Match {
    /// Where the match begins.
    pub start: usize,
    /// Where the match ends, exclusive.
    pub end: usize,
}

impl From<[usize; 2]> for Match {
    fn from([start, end]: [usize; 2]) -> Match {
        Match { start, end }
    }
}

impl std::fmt::Debug for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl RegexTests {
    /// An empty collection.
    pub fn new() -> RegexTests {
        RegexTests::default()
    }

    /// Load the tests in a TOML file. Their group is the file's stem, so
    /// `data/basic.toml` yields tests named `basic/...`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let group = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("no usable name: {}", path.display()))?;
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.load_slice(group, &data)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    /// Load TOML encoded tests from `data`, assigning each to `group`.
    /// Tests without a name are numbered in order.
    pub fn load_slice(&mut self, group: &str, data: &[u8]) -> Result<()> {
        let loaded: RegexTests =
            toml::from_slice(data).context("invalid TOML test data")?;
        let mut unnamed = 0;
        for mut test in loaded.tests {
            test.group = group.to_string();
            if test.name.is_empty() {
                unnamed += 1;
                test.name = unnamed.to_string();
            }
            test.full_name = format!("{}/{}", test.group, test.name);
            test.validate()
                .with_context(|| format!("invalid test {}", test.full_name))?;
            if !self.names.insert(test.full_name.clone()) {
                bail!("duplicate test name {}", test.full_name);
            }
            self.tests.push(test);
        }
        Ok(())
    }

    /// All loaded tests, in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegexTest> {
        self.tests.iter()
    }
}

impl RegexTest {
    fn validate(&self) -> Result<()> {
        if self.is_match.is_none()
            && self.full_match.is_none()
            && self.matches.is_none()
        {
            bail!("expected one of 'match', 'full_match' or 'matches'");
        }
        if let (Some(yes), Some(ms)) = (self.is_match, &self.matches) {
            if yes == ms.is_empty() {
                bail!("'match' and 'matches' disagree");
            }
        }
        if let Some([start, end]) = self.bounds {
            if start > end || end > self.input.len() {
                bail!(
                    "bounds [{}, {}] do not fit an input of length {}",
                    start,
                    end,
                    self.input.len(),
                );
            }
        }
        Ok(())
    }

    /// The name of the file the test came from.
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `group/name`, unique among all loaded tests.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn regex(&self) -> &str {
        &self.regex
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the pattern should match somewhere in the searched region.
    /// When only `matches` is given, this is implied by it.
    pub fn is_match(&self) -> Option<bool> {
        let implied = self.matches.as_ref().map(|ms| !ms.is_empty());
        self.is_match.or(implied)
    }

    /// Whether the pattern should match the whole input.
    pub fn full_match(&self) -> Option<bool> {
        self.full_match
    }

    /// The expected matches, if the test lists them.
    pub fn matches(&self) -> Option<&[Match]> {
        self.matches.as_deref()
    }

    /// The region to search. Defaults to the whole input.
    pub fn bounds(&self) -> (usize, usize) {
        self.bounds.map_or((0, self.input.len()), |[s, e]| (s, e))
    }

    /// True when the test names an explicit region.
    pub fn has_bounds(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn match_limit(&self) -> Option<usize> {
        self.match_limit
    }

    /// False when building the pattern must fail.
    pub fn compiles(&self) -> bool {
        self.compiles
    }

    /// Whether matches must begin at the start of the region.
    pub fn anchored(&self) -> bool {
        self.anchored
    }
}

type Matcher = Box<dyn Fn(&RegexTest) -> Vec<TestResult>>;

/// A compiled pattern, ready to run against the test it was built for.
pub struct CompiledRegex(Option<Matcher>);

impl CompiledRegex {
    /// Wrap a matcher. It receives the same test the pattern came from.
    pub fn compiled<F>(matcher: F) -> CompiledRegex
    where
        F: Fn(&RegexTest) -> Vec<TestResult> + 'static,
    {
        CompiledRegex(Some(Box::new(matcher)))
    }

    /// Skip the test, e.g., when it needs something the engine lacks.
    pub fn skip() -> CompiledRegex {
        CompiledRegex(None)
    }
}

impl std::fmt::Debug for CompiledRegex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.0 {
            None => write!(f, "CompiledRegex(skip)"),
            Some(_) => write!(f, "CompiledRegex(...)"),
        }
    }
}

/// What a matcher reported for one kind of search.
#[derive(Clone, Debug)]
pub struct TestResult {
    name: String,
    outcome: Outcome,
}

#[derive(Clone, Debug)]
enum Outcome {
    Matched(bool),
    FullMatched(bool),
    Matches(Vec<Match>),
    Skip,
}

impl TestResult {
    /// Whether a match was found somewhere.
    pub fn matched(yes: bool) -> TestResult {
        TestResult::new(Outcome::Matched(yes))
    }

    /// Whether the whole input matched.
    pub fn full_matched(yes: bool) -> TestResult {
        TestResult::new(Outcome::FullMatched(yes))
    }

    /// Every match found, in order.
    pub fn matches<I: IntoIterator<Item = Match>>(it: I) -> TestResult {
        TestResult::new(Outcome::Matches(it.into_iter().collect()))
    }

    /// Nothing to compare. Skips are counted but never fail.
    pub fn skip() -> TestResult {
        TestResult::new(Outcome::Skip)
    }

    /// Label this result. The label shows up in failure reports.
    pub fn name(mut self, name: &str) -> TestResult {
        self.name = name.to_string();
        self
    }

    fn new(outcome: Outcome) -> TestResult {
        TestResult { name: String::new(), outcome }
    }
}

/// Runs tests and collects their failures.
///
/// The `REGEX_TEST` environment variable selects which tests run. It holds
/// comma separated substrings of full test names. A plain substring adds
/// matching tests and one prefixed with `-` removes them. Later entries
/// override earlier ones. When at least one plain substring is present,
/// tests matching none of the entries are skipped.
///
/// Set `REGEX_TEST_VERBOSE=1` to print every test's status.
///
/// [`TestRunner::assert`] must be called once all tests have run, otherwise
/// failures go unreported.
#[derive(Debug, Default)]
pub struct TestRunner {
    filters: Vec<Filter>,
    passed: Vec<String>,
    skipped: Vec<String>,
    failed: Vec<String>,
}

#[derive(Debug)]
struct Filter {
    exclude: bool,
    needle: String,
}

impl TestRunner {
    /// A runner whose filters come from `REGEX_TEST`.
    pub fn new() -> Result<TestRunner> {
        let mut runner = TestRunner::default();
        for item in read_env(ENV_FILTER)?.split(',').map(str::trim) {
            match item.strip_prefix('-') {
                _ if item.is_empty() => {}
                Some(needle) => {
                    runner.blacklist(needle);
                }
                None => {
                    runner.whitelist(item);
                }
            }
        }
        Ok(runner)
    }

    /// Run tests whose full name contains `needle`.
    pub fn whitelist(&mut self, needle: &str) -> &mut TestRunner {
        let needle = needle.to_string();
        self.filters.push(Filter { exclude: false, needle });
        self
    }

    /// Skip tests whose full name contains `needle`.
    pub fn blacklist(&mut self, needle: &str) -> &mut TestRunner {
        let needle = needle.to_string();
        self.filters.push(Filter { exclude: true, needle });
        self
    }

    /// Compile and run each test with `compile`, which is given the test
    /// and its pattern.
    pub fn test_iter<I, T, F>(&mut self, tests: I, mut compile: F) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Borrow<RegexTest>,
        F: FnMut(
            &RegexTest,
            &str,
        ) -> Result<CompiledRegex, Box<dyn std::error::Error>>,
    {
        for test in tests {
            let test = test.borrow();
            if self.is_filtered(test) {
                self.skipped.push(test.full_name().to_string());
                continue;
            }
            self.test(test, |pattern| compile(test, pattern));
        }
        self
    }

    /// Compile and run a single test.
    pub fn test<F>(&mut self, test: &RegexTest, compile: F) -> &mut Self
    where
        F: FnOnce(&str) -> Result<CompiledRegex, Box<dyn std::error::Error>>,
    {
        let compiled = match catch(|| compile(test.regex())) {
            Err(panic) => {
                self.fail(test, "", &format!("panic compiling: {}", panic));
                return self;
            }
            Ok(Err(err)) if test.compiles() => {
                self.fail(test, "", &format!("failed to compile: {}", err));
                return self;
            }
            Ok(Err(_)) => {
                self.passed.push(test.full_name().to_string());
                return self;
            }
            Ok(Ok(_)) if !test.compiles() => {
                self.fail(test, "", "compiled, but should have failed");
                return self;
            }
            Ok(Ok(compiled)) => compiled,
        };
        let matcher = match compiled.0 {
            None => {
                self.skipped.push(test.full_name().to_string());
                return self;
            }
            Some(matcher) => matcher,
        };
        let results = match catch(|| matcher(test)) {
            Ok(results) => results,
            Err(panic) => {
                self.fail(test, "", &format!("panic searching: {}", panic));
                return self;
            }
        };
        for result in results {
            self.check(test, &result);
        }
        self
    }

    /// Panic with a report of every failure, if there were any.
    pub fn assert(&mut self) {
        if read_env(ENV_VERBOSE).map_or(false, |v| v == "1") {
            for name in &self.skipped {
                println!("skip: {}", name);
            }
            for name in &self.passed {
                println!("pass: {}", name);
            }
            println!(
                "passed: {}, skipped: {}, failed: {}",
                self.passed.len(),
                self.skipped.len(),
                self.failed.len(),
            );
        }
        if self.failed.is_empty() {
            return;
        }
        let rule = "~".repeat(79);
        panic!(
            "{} test failures:\n{}\n{}\n{}\n\n\
             Use REGEX_TEST=<substring>,-<substring> to select tests.",
            self.failed.len(),
            rule,
            self.failed.join("\n\n"),
            rule,
        );
    }

    fn check(&mut self, test: &RegexTest, result: &TestResult) {
        let label = label(test, result);
        let mismatch = match result.outcome {
            Outcome::Skip => {
                self.skipped.push(label);
                return;
            }
            Outcome::Matched(got) => test
                .is_match()
                .map(|want| (want != got).then(|| expect(&want, &got))),
            Outcome::FullMatched(got) => test
                .full_match()
                .map(|want| (want != got).then(|| expect(&want, &got))),
            Outcome::Matches(ref got) => test
                .matches()
                .map(|want| (want != &**got).then(|| expect(want, &**got))),
        };
        match mismatch {
            None => self.skipped.push(label),
            Some(None) => self.passed.push(label),
            Some(Some(why)) => self.fail(test, &result.name, &why),
        }
    }

    fn fail(&mut self, test: &RegexTest, result: &str, why: &str) {
        let mut report = String::new();
        let _ = writeln!(report, "{}: {}", test.full_name(), why);
        let _ = writeln!(report, "    regex: {:?}", test.regex());
        let _ = write!(report, "    input: {:?}", test.input());
        if !result.is_empty() {
            let _ = write!(report, "\n    search: {}", result);
        }
        self.failed.push(report);
    }

    fn is_filtered(&self, test: &RegexTest) -> bool {
        let mut skip = self.filters.iter().any(|f| !f.exclude);
        for filter in &self.filters {
            if test.full_name().contains(&filter.needle) {
                skip = filter.exclude;
            }
        }
        skip
    }
}

fn label(test: &RegexTest, result: &TestResult) -> String {
    if result.name.is_empty() {
        test.full_name().to_string()
    } else {
        format!("{} ({})", test.full_name(), result.name)
    }
}

fn expect<T: std::fmt::Debug + ?Sized>(want: &T, got: &T) -> String {
    format!("expected {:?}, got {:?}", want, got)
}

fn default_true() -> bool {
    true
}

fn read_env(var: &str) -> Result<String> {
    match std::env::var_os(var) {
        None => Ok(String::new()),
        Some(val) => val.into_string().map_err(|val| {
            anyhow::anyhow!("{} is not UTF-8: {:?}", var, val)
        }),
    }
}

/// Run `f`, turning a panic into its message.
fn catch<T, F: FnOnce() -> T>(f: F) -> Result<T, String> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).map_err(|err| {
        if let Some(msg) = err.downcast_ref::<&str>() {
            msg.to_string()
        } else if let Some(msg) = err.downcast_ref::<String>() {
            msg.clone()
        } else {
            "<panic payload is not a string>".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"
[[tests]]
name = "basic"
regex = "a+"
input = "baaa"
matches = [[1, 4]]

[[tests]]
regex = "x"
input = "abc"
match = false
full_match = false

[[tests]]
regex = "("
input = ""
match = false
compiles = false
"#;

    fn load() -> RegexTests {
        let mut tests = RegexTests::new();
        tests.load_slice("group", DATA.as_bytes()).unwrap();
        tests
    }

    #[test]
    fn names_and_defaults() {
        let tests = load();
        let names: Vec<&str> = tests.iter().map(|t| t.full_name()).collect();
        assert_eq!(vec!["group/basic", "group/1", "group/2"], names);

        let basic = tests.iter().next().unwrap();
        assert_eq!(Some(true), basic.is_match());
        assert_eq!(None, basic.full_match());
        assert_eq!(Some(&[Match { start: 1, end: 4 }][..]), basic.matches());
        assert_eq!((0, 4), basic.bounds());
        assert!(basic.compiles());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut tests = load();
        assert!(tests.load_slice("group", DATA.as_bytes()).is_err());
    }

    #[test]
    fn missing_expectation_is_rejected() {
        let data = "[[tests]]\nregex = \"a\"\ninput = \"a\"\n";
        assert!(RegexTests::new().load_slice("g", data.as_bytes()).is_err());
    }

    #[test]
    fn out_of_range_bounds_are_rejected() {
        let data = "[[tests]]\nregex = \"a\"\ninput = \"a\"\n\
                    bounds = [0, 2]\nmatch = true\n";
        assert!(RegexTests::new().load_slice("g", data.as_bytes()).is_err());
    }

    #[test]
    fn runner_collects_failures() {
        let tests = load();
        let mut runner = TestRunner::default();
        runner.test_iter(tests.iter(), |_, _| {
            Ok(CompiledRegex::compiled(|_| vec![TestResult::matched(true)]))
        });
        // group/1 expects no match and group/2 expects a compile error.
        assert_eq!(2, runner.failed.len());
        assert_eq!(1, runner.passed.len());
    }

    #[test]
    fn filters() {
        let tests = load();
        let mut runner = TestRunner::default();
        runner.whitelist("group/").blacklist("basic");
        let skipped: Vec<bool> =
            tests.iter().map(|t| runner.is_filtered(t)).collect();
        assert_eq!(vec![true, false, false], skipped);
    }
}
