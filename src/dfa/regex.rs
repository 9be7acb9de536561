/*!
A DFA-backed `Regex`.

A [`Regex`] answers three questions about a haystack: does the whole
string match, where is the leftmost-longest match, and what are all the
non-overlapping matches. Nothing beyond match boundaries is reported, since
a DFA cannot track groups.

A `Regex` owns two DFAs. The forward DFA recognizes the pattern and the
reverse DFA recognizes its reversal. The configured [`SearchKind`] decides
how they are used to find match boundaries.
*/

use crate::{
    dfa::{error::Error, search, sparse},
    nfa::thompson,
    syntax::{self, Ast, Factorization},
    util::{
        prefilter::Prefilter,
        search::{Input, Match, MatchError, SearchKind},
    },
};

/// A regular expression that uses a pair of sparse DFAs to find matches.
///
/// Every search reports leftmost-longest matches: of all matches in the
/// searched region, the one that starts first, and among those, the one that
/// ends last.
///
/// # Example
///
/// ```
/// use char_automata::{dfa::regex::Regex, Match};
///
/// let re = Regex::new("ab")?;
/// assert!(re.matches("ab"));
/// assert!(!re.matches("aab"));
/// assert_eq!(Some(Match::new(2, 4)), re.find("xxabxx"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Regex {
    forward: sparse::DFA,
    reverse: sparse::DFA,
    search_kind: SearchKind,
    prefilter: Option<Prefilter>,
    properties: Properties,
}

impl Regex {
    /// Parse the given pattern and build a regex from it using the default
    /// configuration.
    ///
    /// If there was a problem parsing or compiling the pattern, then an
    /// error is returned. Use [`Error::is_syntax`] to distinguish a
    /// malformed pattern from a pattern that exceeded a configured limit.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Builder::new().build(pattern)
    }

    /// Return a default configuration for a `Regex`.
    pub fn config() -> Config {
        Config::new()
    }

    /// Return a builder for configuring the construction of a `Regex`.
    ///
    /// # Example
    ///
    /// ```
    /// use char_automata::{dfa::regex::Regex, Match, SearchKind};
    ///
    /// let re = Regex::builder()
    ///     .configure(Regex::config().search_kind(SearchKind::AllStates))
    ///     .build("a+")?;
    /// assert_eq!(Some(Match::new(1, 3)), re.find("baab"));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn builder() -> Builder {
        Builder::new()
    }
}

/// Search routines.
impl Regex {
    /// Returns true if and only if this regex matches the entire haystack.
    pub fn matches(&self, haystack: &str) -> bool {
        self.forward.is_match(haystack)
    }

    /// Returns the leftmost-longest match in the haystack, if one exists.
    pub fn find(&self, haystack: &str) -> Option<Match> {
        self.search_imp(&Input::new(haystack))
    }

    /// Returns true if and only if this regex matches anywhere in the
    /// haystack.
    pub fn contained_in(&self, haystack: &str) -> bool {
        self.find(haystack).is_some()
    }

    /// Executes a search over the region and with the anchoring given by
    /// `input`.
    ///
    /// # Errors
    ///
    /// This returns an error when the bounds of `input` are out of order,
    /// exceed the haystack or split a character. Bounds are never clamped.
    ///
    /// # Example
    ///
    /// ```
    /// use char_automata::{dfa::regex::Regex, Input, Match};
    ///
    /// let re = Regex::new("[0-9]+")?;
    /// let input = Input::new("a12b345").range(4..7).anchored(true);
    /// assert_eq!(Some(Match::new(4, 7)), re.search(&input)?);
    ///
    /// let input = Input::new("a12b345").range(4..9);
    /// assert!(re.search(&input).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn search(
        &self,
        input: &Input<'_>,
    ) -> Result<Option<Match>, MatchError> {
        input.validate()?;
        Ok(self.search_imp(input))
    }

    /// Returns an iterator over all non-overlapping leftmost-longest matches
    /// in the haystack.
    ///
    /// An empty match that immediately follows another match is skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use char_automata::{dfa::regex::Regex, Match};
    ///
    /// let re = Regex::new("[a-z]+|[0-9]+")?;
    /// let matches: Vec<Match> = re.find_iter("ab 12 c").collect();
    /// assert_eq!(
    ///     vec![Match::new(0, 2), Match::new(3, 5), Match::new(6, 7)],
    ///     matches,
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn find_iter<'r, 'h>(&'r self, haystack: &'h str) -> Matches<'r, 'h> {
        Matches::new(self, haystack)
    }

    /// Search an already validated input.
    fn search_imp(&self, input: &Input<'_>) -> Option<Match> {
        let pre = self.prefilter.as_ref();
        match self.search_kind {
            SearchKind::AllStates => {
                search::find_all_states(&self.forward, pre, input)
            }
            SearchKind::ForwardReverse => {
                search::find_fwd_rev(&self.forward, &self.reverse, pre, input)
            }
        }
    }
}

/// Non-search APIs for querying information about the regex.
impl Regex {
    /// Return the underlying DFA responsible for forward matching.
    pub fn forward(&self) -> &sparse::DFA {
        &self.forward
    }

    /// Return the underlying DFA responsible for reverse matching. It
    /// accepts exactly the reversals of the strings accepted by
    /// [`Regex::forward`].
    pub fn reverse(&self) -> &sparse::DFA {
        &self.reverse
    }

    /// Return the search method used by this regex.
    pub fn search_kind(&self) -> SearchKind {
        self.search_kind
    }

    /// Returns true if and only if unanchored searches use a literal
    /// prefilter.
    pub fn has_prefilter(&self) -> bool {
        self.prefilter.is_some()
    }

    /// Return static properties of the pattern this regex was built from.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Static properties of a pattern, derived from its syntax tree.
///
/// # Example
///
/// ```
/// use char_automata::dfa::regex::Regex;
///
/// let re = Regex::new("foo(bar|baz){1,2}")?;
/// let props = re.properties();
/// assert_eq!(6, props.min_len());
/// assert_eq!(Some(9), props.max_len());
/// assert_eq!(Some("foo"), props.prefix());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Properties {
    min_len: usize,
    max_len: Option<usize>,
    prefix: Option<String>,
    suffix: Option<String>,
    factorization: Factorization,
}

impl Properties {
    fn new(ast: &Ast) -> Properties {
        let factorization = ast.factors();
        Properties {
            min_len: ast.min_len(),
            max_len: ast.max_len(),
            prefix: factorization.common_prefix(),
            suffix: factorization.common_suffix(),
            factorization,
        }
    }

    /// The minimum length, in characters, of any matching string.
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// The maximum length, in characters, of any matching string. This is
    /// `None` when the pattern contains an unbounded repetition.
    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// A non-empty literal that every matching string starts with, if known.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// A non-empty literal that every matching string ends with, if known.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// The literal factorization of the pattern.
    pub fn factorization(&self) -> &Factorization {
        &self.factorization
    }
}

/// An iterator over all non-overlapping matches of a regex in a haystack.
///
/// `'r` borrows the regex and `'h` the haystack.
#[derive(Clone, Debug)]
pub struct Matches<'r, 'h> {
    re: &'r Regex,
    haystack: &'h str,
    last_end: usize,
    last_match: Option<usize>,
}

impl<'r, 'h> Matches<'r, 'h> {
    fn new(re: &'r Regex, haystack: &'h str) -> Matches<'r, 'h> {
        Matches { re, haystack, last_end: 0, last_match: None }
    }
}

impl<'r, 'h> Iterator for Matches<'r, 'h> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if self.last_end > self.haystack.len() {
                return None;
            }
            let input = Input::new(self.haystack)
                .range(self.last_end..self.haystack.len());
            let m = self.re.search_imp(&input)?;
            if m.is_empty() {
                // To ensure we make progress, start the next search at the
                // next character following this empty match.
                self.last_end = match self.haystack[m.end()..].chars().next()
                {
                    Some(ch) => m.end() + ch.len_utf8(),
                    None => m.end() + 1,
                };
                // Don't accept empty matches immediately following a match.
                if Some(m.end()) == self.last_match {
                    continue;
                }
            } else {
                self.last_end = m.end();
            }
            self.last_match = Some(m.end());
            return Some(m);
        }
    }
}

/// The configuration used for building a [`Regex`].
///
/// Pass it to [`Builder::configure`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    search_kind: Option<SearchKind>,
    prefilter: Option<bool>,
}

impl Config {
    /// Return a new default regex configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the method used to find the boundaries of a match.
    ///
    /// Both methods report the same matches. See [`SearchKind`] for how
    /// they differ.
    ///
    /// This defaults to [`SearchKind::ForwardReverse`].
    pub fn search_kind(mut self, kind: SearchKind) -> Config {
        self.search_kind = Some(kind);
        self
    }

    /// Whether to use a literal prefilter for unanchored searches.
    ///
    /// When enabled and every match of the pattern starts with the same
    /// non-empty literal, searches skip directly to occurrences of that
    /// literal. This never changes which matches are reported.
    ///
    /// This is enabled by default.
    pub fn prefilter(mut self, yes: bool) -> Config {
        self.prefilter = Some(yes);
        self
    }

    /// Returns the configured search method.
    pub fn get_search_kind(&self) -> SearchKind {
        self.search_kind.unwrap_or_default()
    }

    /// Returns whether a prefilter will be used when possible.
    pub fn get_prefilter(&self) -> bool {
        self.prefilter.unwrap_or(true)
    }

    /// Merge `o` into `self`. Options set in `o` win.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            search_kind: o.search_kind.or(self.search_kind),
            prefilter: o.prefilter.or(self.prefilter),
        }
    }
}

/// A builder for a regex based on sparse DFAs.
///
/// Every phase can be tuned: parsing with [`Builder::syntax`], NFA
/// compilation with [`Builder::thompson`], DFA construction with
/// [`Builder::sparse`] and searching with [`Builder::configure`].
///
/// Both DFAs are compiled from the same syntax tree, so the pattern is only
/// parsed once.
///
/// # Example
///
/// ```
/// use char_automata::{
///     dfa::{regex::Regex, sparse},
///     Match,
/// };
///
/// let re = Regex::builder()
///     .sparse(sparse::Config::new().minimize(false))
///     .build("(a|b)*abb")?;
/// assert_eq!(Some(Match::new(1, 6)), re.find("cababbc"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    parser: syntax::Parser,
    dfa: sparse::Builder,
}

impl Builder {
    /// Create a new regex builder with the default configuration.
    pub fn new() -> Builder {
        Builder {
            config: Config::default(),
            parser: syntax::Parser::new(),
            dfa: sparse::Builder::new(),
        }
    }

    /// Build a regex from the given pattern.
    ///
    /// If there was a problem parsing or compiling the pattern, then an
    /// error is returned.
    pub fn build(&self, pattern: &str) -> Result<Regex, Error> {
        let ast = self
            .parser
            .parse(pattern)
            .map_err(|err| Error::nfa(thompson::Error::syntax(err)))?;
        self.build_from_ast(&ast)
    }

    /// Build a regex from the given abstract syntax tree.
    pub fn build_from_ast(&self, ast: &Ast) -> Result<Regex, Error> {
        let forward = self
            .dfa
            .clone()
            .thompson(thompson::Config::new().reverse(false))
            .build_from_ast(ast)?;
        let reverse = self
            .dfa
            .clone()
            .thompson(thompson::Config::new().reverse(true))
            .build_from_ast(ast)?;
        let properties = Properties::new(ast);
        let prefilter = if self.config.get_prefilter() {
            properties.prefix().and_then(Prefilter::new)
        } else {
            None
        };
        debug!(
            "built regex (forward states: {}, reverse states: {}, \
             prefilter: {})",
            forward.len(),
            reverse.len(),
            prefilter.is_some(),
        );
        Ok(Regex {
            forward,
            reverse,
            search_kind: self.config.get_search_kind(),
            prefilter,
            properties,
        })
    }

    /// Apply the given regex configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Set the syntax configuration for this builder using
    /// [`syntax::Config`].
    ///
    /// This permits setting things like the nesting limit of groups.
    pub fn syntax(&mut self, config: syntax::Config) -> &mut Builder {
        self.parser.configure(config);
        self
    }

    /// Set the Thompson NFA configuration for this builder using
    /// [`thompson::Config`].
    ///
    /// This permits setting a limit on the size of the NFA. The `reverse`
    /// option is ignored, since a regex always builds one DFA in each
    /// direction.
    pub fn thompson(&mut self, config: thompson::Config) -> &mut Builder {
        self.dfa.thompson(config);
        self
    }

    /// Set the sparse DFA compilation configuration for this builder using
    /// [`sparse::Config`].
    ///
    /// This permits setting things like whether the DFAs are minimized and
    /// a limit on the number of states produced by determinization.
    pub fn sparse(&mut self, config: sparse::Config) -> &mut Builder {
        self.dfa.configure(config);
        self
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regexes(pattern: &str) -> Vec<Regex> {
        let kinds = [SearchKind::AllStates, SearchKind::ForwardReverse];
        kinds
            .iter()
            .map(|&kind| {
                Regex::builder()
                    .configure(Regex::config().search_kind(kind))
                    .build(pattern)
                    .unwrap()
            })
            .collect()
    }

    fn find_all(re: &Regex, haystack: &str) -> Vec<(usize, usize)> {
        re.find_iter(haystack).map(|m| (m.start(), m.end())).collect()
    }

    #[test]
    fn scenarios() {
        for re in regexes("ab") {
            assert!(re.matches("ab"));
            assert!(!re.matches("aab"));
            assert_eq!(Some(Match::new(2, 4)), re.find("xxabxx"));
            assert!(re.contained_in("xxabxx"));
            assert!(!re.contained_in("xxbaxx"));
        }
    }

    #[test]
    fn syntax_errors() {
        for pattern in &["(a", "a)", "*a"] {
            let err = Regex::new(pattern).unwrap_err();
            assert!(err.is_syntax(), "{:?}", pattern);
        }
    }

    #[test]
    fn search_validates_bounds() {
        let re = Regex::new("a").unwrap();
        let err = re.search(&Input::new("abc").range(2..1)).unwrap_err();
        assert_eq!(MatchError::InvalidSpan { start: 2, end: 1, len: 3 }, err);
        let err = re.search(&Input::new("☃").range(0..2)).unwrap_err();
        assert_eq!(MatchError::NotCharBoundary { offset: 2 }, err);
    }

    #[test]
    fn find_iter_empty_matches() {
        for re in regexes("a*") {
            assert_eq!(vec![(0, 0), (1, 3)], find_all(&re, "baa"));
            assert_eq!(vec![(0, 2), (3, 3)], find_all(&re, "aab"));
        }
        for re in regexes("x*") {
            assert_eq!(
                vec![(0, 0), (1, 1), (4, 4), (5, 5)],
                find_all(&re, "a☃z"),
            );
        }
    }

    #[test]
    fn find_iter_non_overlapping() {
        for re in regexes("aba") {
            assert_eq!(vec![(0, 3), (4, 7)], find_all(&re, "abababa"));
        }
    }

    #[test]
    fn properties() {
        let re = Regex::new("foo[0-9]+").unwrap();
        assert_eq!(4, re.properties().min_len());
        assert_eq!(None, re.properties().max_len());
        assert_eq!(Some("foo"), re.properties().prefix());
        assert_eq!(None, re.properties().suffix());
        assert!(re.has_prefilter());

        let re = Regex::builder()
            .configure(Regex::config().prefilter(false))
            .build("foo[0-9]+")
            .unwrap();
        assert!(!re.has_prefilter());
        assert_eq!(Some(Match::new(4, 9)), re.find("fox foo12"));
    }

    #[test]
    fn reverse_dfa_matches_reversed_strings() {
        let re = Regex::new("ab+c").unwrap();
        assert!(re.forward().is_match("abbc"));
        assert!(re.reverse().is_match("cbba"));
        assert!(!re.reverse().is_match("abbc"));
    }

    #[test]
    fn limits_are_configurable() {
        let result = Regex::builder()
            .sparse(sparse::Config::new().determinize_size_limit(Some(5)))
            .build("[ab]*a[ab]{5}");
        assert!(!result.unwrap_err().is_syntax());

        let result = Regex::builder()
            .thompson(thompson::Config::new().nfa_size_limit(Some(50)))
            .build("a{100}");
        assert!(!result.unwrap_err().is_syntax());

        let result = Regex::builder()
            .syntax(syntax::Config::new().nest_limit(1))
            .build("((a))");
        assert!(result.unwrap_err().is_syntax());
    }
}
