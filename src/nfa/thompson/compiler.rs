use core::cell::RefCell;

use crate::{
    nfa::thompson::{
        nfa::{State, NFA},
        Error,
    },
    syntax::{self, Ast},
    util::{id::StateID, range::CharRange},
};

/// The configuration used for compiling a Thompson NFA from a regex pattern.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    reverse: Option<bool>,
    nfa_size_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default Thompson NFA compiler configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Reverse the NFA.
    ///
    /// A reverse NFA matches the reverse of every string matched by the
    /// forward NFA. It is built by compiling the reversal of the pattern's
    /// [`Ast`], so running it over a haystack from right to left finds the
    /// same strings the forward NFA finds from left to right. This is used to
    /// find the starting position of a match once its end is known.
    ///
    /// This is disabled by default.
    pub fn reverse(mut self, yes: bool) -> Config {
        self.reverse = Some(yes);
        self
    }

    /// Sets an approximate limit on the number of states in the NFA.
    ///
    /// Counted repetitions are compiled by copying their operand once per
    /// permitted occurrence, so a short pattern like `(a|b){1000}` can
    /// produce a very large NFA. When this limit is set and the compiler
    /// would exceed it, compilation stops and returns an error.
    ///
    /// This is disabled by default.
    pub fn nfa_size_limit(mut self, states: Option<usize>) -> Config {
        self.nfa_size_limit = Some(states);
        self
    }

    /// Returns whether this configuration will produce a reverse NFA.
    pub fn get_reverse(&self) -> bool {
        self.reverse.unwrap_or(false)
    }

    /// Returns the configured NFA size limit, if one was set.
    pub fn get_nfa_size_limit(&self) -> Option<usize> {
        self.nfa_size_limit.unwrap_or(None)
    }

    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            reverse: o.reverse.or(self.reverse),
            nfa_size_limit: o.nfa_size_limit.or(self.nfa_size_limit),
        }
    }
}

/// A builder for compiling an NFA from a pattern or an [`Ast`].
///
/// # Example
///
/// ```
/// use char_automata::nfa::thompson::Compiler;
///
/// let nfa = Compiler::new().build("a|b")?;
/// assert!(nfa.state(nfa.start()).transitions().len() > 0);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Compiler {
    /// The parser used when compiling from a pattern string.
    parser: syntax::Parser,
    /// The configuration that determines how the NFA is compiled.
    config: Config,
    /// The states of the NFA under construction.
    states: RefCell<Vec<State>>,
}

/// A fragment of an NFA under construction.
///
/// Every fragment has a single entry state and a single exit state. The exit
/// state never has any outgoing transitions while its fragment is being
/// built, which permits linking it to whatever follows the fragment with an
/// epsilon transition.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ThompsonRef {
    pub(crate) start: StateID,
    pub(crate) end: StateID,
}

impl Compiler {
    /// Create a new compiler with the default configuration.
    pub fn new() -> Compiler {
        Compiler {
            parser: syntax::Parser::new(),
            config: Config::default(),
            states: RefCell::new(vec![]),
        }
    }

    /// Compile the given pattern into an NFA.
    ///
    /// If there was a problem parsing the pattern, then an error is returned.
    pub fn build(&self, pattern: &str) -> Result<NFA, Error> {
        let ast = self.parser.parse(pattern).map_err(Error::syntax)?;
        self.build_from_ast(&ast)
    }

    /// Compile the given abstract syntax tree into an NFA.
    pub fn build_from_ast(&self, ast: &Ast) -> Result<NFA, Error> {
        self.states.borrow_mut().clear();
        let reversed;
        let ast = if self.config.get_reverse() {
            reversed = ast.reverse();
            &reversed
        } else {
            ast
        };
        let compiled = self.c(ast)?;
        let final_id = self.add_state()?;
        self.states.borrow_mut()[final_id].set_accepting(true);
        self.patch(compiled.end, final_id);

        let states = core::mem::take(&mut *self.states.borrow_mut());
        debug!(
            "compiled {} NFA (states: {})",
            if self.config.get_reverse() { "reverse" } else { "forward" },
            states.len(),
        );
        Ok(NFA::new(states, compiled.start))
    }

    /// Apply the given NFA configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Compiler {
        self.config = self.config.overwrite(config);
        self
    }

    /// Set the syntax configuration for this builder using
    /// [`syntax::Config`].
    ///
    /// This permits setting things like the nesting limit of groups.
    ///
    /// These settings only apply when constructing an NFA directly from a
    /// pattern.
    pub fn syntax(&mut self, config: syntax::Config) -> &mut Compiler {
        self.parser.configure(config);
        self
    }

    fn c(&self, ast: &Ast) -> Result<ThompsonRef, Error> {
        match *ast {
            Ast::Concat { ref head, ref tail } => self.c_concat(head, tail),
            Ast::Alternation { ref left, ref right } => {
                self.c_alternation(left, right)
            }
            Ast::Repetition { ref inner } => self.c_repetition(inner),
            Ast::CountedRepetition { ref inner, min, max } => {
                self.c_counted(inner, min, max)
            }
            Ast::Range(range) => self.c_range(range),
            Ast::Literal(ref s) => self.c_literal(s),
        }
    }

    fn c_concat(&self, head: &Ast, tail: &Ast) -> Result<ThompsonRef, Error> {
        let head = self.c(head)?;
        let tail = self.c(tail)?;
        self.patch(head.end, tail.start);
        Ok(ThompsonRef { start: head.start, end: tail.end })
    }

    fn c_alternation(
        &self,
        left: &Ast,
        right: &Ast,
    ) -> Result<ThompsonRef, Error> {
        let branch = self.add_state()?;
        let left = self.c(left)?;
        let right = self.c(right)?;
        let exit = self.add_state()?;
        self.patch(branch, left.start);
        self.patch(branch, right.start);
        self.patch(left.end, exit);
        self.patch(right.end, exit);
        Ok(ThompsonRef { start: branch, end: exit })
    }

    /// Compile `inner*`.
    ///
    /// The loop goes back to a fresh entry state rather than to the start of
    /// `inner`. The start of `inner` may be reachable from within `inner`
    /// itself (e.g., when `inner` is `a*b`), and giving it a bypass edge to
    /// the exit would then accept incomplete iterations.
    fn c_repetition(&self, inner: &Ast) -> Result<ThompsonRef, Error> {
        let entry = self.add_state()?;
        let compiled = self.c(inner)?;
        let exit = self.add_state()?;
        self.patch(entry, compiled.start);
        self.patch(entry, exit);
        self.patch(compiled.end, entry);
        Ok(ThompsonRef { start: entry, end: exit })
    }

    /// Compile `inner{min,max}` by unrolling it: `min` mandatory copies
    /// followed by `max - min` optional copies. Before each optional copy,
    /// an epsilon transition skips straight to a shared exit state.
    fn c_counted(
        &self,
        inner: &Ast,
        min: u32,
        max: u32,
    ) -> Result<ThompsonRef, Error> {
        assert!(min <= max, "invalid repetition range {}..={}", min, max);
        let start = self.add_state()?;
        let mut end = start;
        for _ in 0..min {
            let copy = self.c(inner)?;
            self.patch(end, copy.start);
            end = copy.end;
        }
        if min == max {
            return Ok(ThompsonRef { start, end });
        }
        let exit = self.add_state()?;
        for _ in min..max {
            let copy = self.c(inner)?;
            self.patch(end, exit);
            self.patch(end, copy.start);
            end = copy.end;
        }
        self.patch(end, exit);
        Ok(ThompsonRef { start, end: exit })
    }

    fn c_range(&self, range: CharRange) -> Result<ThompsonRef, Error> {
        let start = self.add_state()?;
        let end = self.add_state()?;
        self.add_transition(start, range, end);
        Ok(ThompsonRef { start, end })
    }

    /// Compile a literal as a chain of states, one transition per
    /// character. The empty literal compiles to a single state.
    fn c_literal(&self, s: &str) -> Result<ThompsonRef, Error> {
        let start = self.add_state()?;
        let mut end = start;
        for ch in s.chars() {
            let next = self.add_state()?;
            self.add_transition(end, CharRange::single(ch), next);
            end = next;
        }
        Ok(ThompsonRef { start, end })
    }

    /// Add an epsilon transition from `from` to `to`.
    fn patch(&self, from: StateID, to: StateID) {
        self.add_transition(from, CharRange::empty(), to);
    }

    fn add_transition(&self, from: StateID, range: CharRange, to: StateID) {
        self.states.borrow_mut()[from].add_transition(range, to);
    }

    fn add_state(&self) -> Result<StateID, Error> {
        let mut states = self.states.borrow_mut();
        let id = states.len();
        if let Some(limit) = self.config.get_nfa_size_limit() {
            if id >= limit {
                return Err(Error::exceeded_size_limit(limit));
            }
        }
        let sid =
            StateID::new(id).map_err(|_| Error::too_many_states(id + 1))?;
        states.push(State::default());
        Ok(sid)
    }
}

impl Default for Compiler {
    fn default() -> Compiler {
        Compiler::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::nfa::thompson::Simulation;

    use super::*;

    fn build(pattern: &str) -> NFA {
        Compiler::new().build(pattern).unwrap()
    }

    fn is_match(nfa: &NFA, haystack: &str) -> bool {
        Simulation::new(nfa).is_match(haystack)
    }

    #[test]
    fn single_accepting_state() {
        let nfa = build("a(b|c)*d{1,3}");
        let accepting =
            nfa.states().iter().filter(|s| s.is_accepting()).count();
        assert_eq!(1, accepting);
    }

    #[test]
    fn literal_is_a_chain() {
        // Start state, one state per character, and the final state.
        let nfa = build("abc");
        assert_eq!(5, nfa.len());
        assert!(is_match(&nfa, "abc"));
        assert!(!is_match(&nfa, "ab"));
        assert!(!is_match(&nfa, "abcc"));
    }

    #[test]
    fn star_rejects_incomplete_iterations() {
        let nfa = build("(a*b)*");
        assert!(is_match(&nfa, ""));
        assert!(is_match(&nfa, "b"));
        assert!(is_match(&nfa, "aabab"));
        assert!(!is_match(&nfa, "a"));
        assert!(!is_match(&nfa, "aba"));
    }

    #[test]
    fn counted_repetition_bounds() {
        let nfa = build("a{2,3}");
        assert!(!is_match(&nfa, "a"));
        assert!(is_match(&nfa, "aa"));
        assert!(is_match(&nfa, "aaa"));
        assert!(!is_match(&nfa, "aaaa"));

        let nfa = build("a{0}");
        assert!(is_match(&nfa, ""));
        assert!(!is_match(&nfa, "a"));
    }

    #[test]
    fn reverse_matches_reversed_strings() {
        let nfa = Compiler::new()
            .configure(Config::new().reverse(true))
            .build("ab+c")
            .unwrap();
        assert!(is_match(&nfa, "cbba"));
        assert!(!is_match(&nfa, "abbc"));
    }

    #[test]
    fn size_limit() {
        let err = Compiler::new()
            .configure(Config::new().nfa_size_limit(Some(100)))
            .build("(a|b){1000}")
            .unwrap_err();
        assert!(!err.is_syntax());
        assert!(err.to_string().contains("100"));

        let nfa = Compiler::new()
            .configure(Config::new().nfa_size_limit(Some(100)))
            .build("(a|b){3}")
            .unwrap();
        assert!(nfa.len() <= 100);
    }

    #[test]
    fn syntax_errors_are_wrapped() {
        let err = Compiler::new().build("(a").unwrap_err();
        assert!(err.is_syntax());
        assert!(std::error::Error::source(&err).is_some());
    }
}
