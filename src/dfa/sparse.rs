/*!
Types and routines specific to sparse DFAs.

This module is the home of [`sparse::DFA`](DFA).

A sparse DFA stores, for each state, a sorted list of disjoint character
ranges and the state each range leads to. Since the alphabet is all of
Unicode, a dense table with one entry per character would be impractical, so
this is the only DFA representation this crate provides. Looking up a
transition is a binary search over a state's ranges.

There is no explicit dead state. When no range of the current state contains
the next character, the search fails at that position.

This module also contains a [`sparse::Builder`](Builder) and a
[`sparse::Config`](Config) for configuring and building a sparse DFA.
*/

use core::fmt;

use crate::{
    dfa::{determinize, error::Error, minimize},
    nfa::thompson,
    syntax::{self, Ast},
    util::{id::StateID, range::CharRange},
};

/// The configuration used for compiling a sparse DFA.
///
/// A sparse DFA configuration is a simple data object that is typically used
/// with [`Builder::configure`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    // As with other configuration types in this crate, all knobs are
    // options so that "default" and "not set" can be told apart. See the
    // 'overwrite' method.
    minimize: Option<bool>,
    determinize_size_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default sparse DFA compiler configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Minimize the DFA.
    ///
    /// When enabled, the DFA built is minimized such that it is as small as
    /// possible while still accepting exactly the same language.
    ///
    /// This is enabled by default.
    pub fn minimize(mut self, yes: bool) -> Config {
        self.minimize = Some(yes);
        self
    }

    /// Set a limit on the number of states created during determinization.
    ///
    /// Subset construction can produce a number of DFA states that is
    /// exponential in the size of the NFA. When this limit is set and
    /// determinization would exceed it, an error is returned instead.
    ///
    /// The limit applies to the unminimized DFA. Minimization never adds
    /// states.
    ///
    /// This is disabled by default.
    pub fn determinize_size_limit(mut self, states: Option<usize>) -> Config {
        self.determinize_size_limit = Some(states);
        self
    }

    /// Returns whether this configuration will produce a minimal DFA.
    pub fn get_minimize(&self) -> bool {
        self.minimize.unwrap_or(true)
    }

    /// Returns the determinization size limit, if one was set.
    pub fn get_determinize_size_limit(&self) -> Option<usize> {
        self.determinize_size_limit.unwrap_or(None)
    }

    /// Merge `o` into `self`. Options set in `o` win.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            minimize: o.minimize.or(self.minimize),
            determinize_size_limit: o
                .determinize_size_limit
                .or(self.determinize_size_limit),
        }
    }
}

/// A builder for constructing a sparse DFA from a pattern, an [`Ast`] or a
/// Thompson NFA.
///
/// # Example
///
/// This example shows how to build an unminimized DFA and compare it with
/// its minimized counterpart.
///
/// ```
/// use char_automata::dfa::sparse;
///
/// let dfa = sparse::Builder::new()
///     .configure(sparse::Config::new().minimize(false))
///     .build("a|b|ab")?;
/// let min = dfa.minimize();
/// assert!(min.len() <= dfa.len());
/// assert!(min.is_match("ab"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    thompson: thompson::Compiler,
}

impl Builder {
    /// Create a new sparse DFA builder with the default configuration.
    pub fn new() -> Builder {
        Builder {
            config: Config::default(),
            thompson: thompson::Compiler::new(),
        }
    }

    /// Build a DFA from the given pattern.
    ///
    /// If there was a problem parsing or compiling the pattern, then an
    /// error is returned.
    pub fn build(&self, pattern: &str) -> Result<DFA, Error> {
        let nfa = self.thompson.build(pattern).map_err(Error::nfa)?;
        self.build_from_nfa(&nfa)
    }

    /// Build a DFA from the given abstract syntax tree.
    pub fn build_from_ast(&self, ast: &Ast) -> Result<DFA, Error> {
        let nfa = self.thompson.build_from_ast(ast).map_err(Error::nfa)?;
        self.build_from_nfa(&nfa)
    }

    /// Build a DFA from the given NFA.
    pub fn build_from_nfa(&self, nfa: &thompson::NFA) -> Result<DFA, Error> {
        let dfa = determinize::Config::new()
            .size_limit(self.config.get_determinize_size_limit())
            .run(nfa)?;
        if !self.config.get_minimize() {
            return Ok(dfa);
        }
        Ok(dfa.minimize())
    }

    /// Apply the given sparse DFA configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Set the syntax configuration for this builder using
    /// [`syntax::Config`].
    ///
    /// These settings only apply when constructing a DFA directly from a
    /// pattern.
    pub fn syntax(&mut self, config: syntax::Config) -> &mut Builder {
        self.thompson.syntax(config);
        self
    }

    /// Set the Thompson NFA configuration for this builder using
    /// [`thompson::Config`].
    ///
    /// This permits setting things like whether the DFA should match the
    /// regex in reverse or if there are any limits on the size of the NFA.
    pub fn thompson(&mut self, config: thompson::Config) -> &mut Builder {
        self.thompson.configure(config);
        self
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

/// A sparse deterministic finite automaton over Unicode scalar values.
///
/// A DFA is an arena of states addressed by [`StateID`]. Each state has an
/// accepting flag and a list of `(range, target)` transitions whose ranges
/// are non-empty, pairwise disjoint and sorted by their start. A DFA is
/// immutable once built and may be shared freely between threads.
///
/// # Example
///
/// ```
/// use char_automata::dfa::sparse::DFA;
///
/// let dfa = DFA::new("a{2,3}")?;
/// assert!(!dfa.is_match("a"));
/// assert!(dfa.is_match("aa"));
/// assert!(dfa.is_match("aaa"));
/// assert!(!dfa.is_match("aaaa"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct DFA {
    states: Vec<State>,
    start: StateID,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct State {
    accepting: bool,
    transitions: Vec<(CharRange, StateID)>,
}

impl DFA {
    /// Parse the given pattern and build a minimal DFA from it using the
    /// default configuration.
    pub fn new(pattern: &str) -> Result<DFA, Error> {
        Builder::new().build(pattern)
    }

    /// Return a default configuration for a sparse DFA.
    pub fn config() -> Config {
        Config::new()
    }

    /// Return a builder for configuring the construction of a sparse DFA.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Create a new DFA with no states. The caller must add at least one
    /// state and set the start state before using it.
    pub(crate) fn empty() -> DFA {
        DFA { states: vec![], start: StateID::ZERO }
    }

    /// Add a new state with no transitions and return its identifier.
    pub(crate) fn add_state(
        &mut self,
        accepting: bool,
    ) -> Result<StateID, Error> {
        let id = StateID::new(self.states.len())
            .map_err(|_| Error::too_many_states())?;
        self.states.push(State { accepting, transitions: vec![] });
        Ok(id)
    }

    /// Add a transition from `from` to `to` on `range`.
    ///
    /// # Panics
    ///
    /// Transitions must be added in increasing order of their ranges. This
    /// panics when `range` is empty, or when it does not come strictly after
    /// every range previously added to `from`.
    pub(crate) fn add_transition(
        &mut self,
        from: StateID,
        range: CharRange,
        to: StateID,
    ) {
        assert!(!range.is_empty(), "DFA transitions cannot be epsilon");
        assert!(to.as_usize() < self.states.len(), "invalid target {}", to);
        let transitions = &mut self.states[from].transitions;
        if let Some(&(last, _)) = transitions.last() {
            assert!(
                !last.overlaps(&range),
                "transition {:?} overlaps {:?}",
                range,
                last,
            );
            assert!(
                last.end() < range.start(),
                "transition {:?} precedes {:?}",
                range,
                last,
            );
        }
        transitions.push((range, to));
    }

    pub(crate) fn set_start(&mut self, id: StateID) {
        assert!(id.as_usize() < self.states.len(), "invalid start {}", id);
        self.start = id;
    }

    /// Return the identifier of the starting state.
    #[inline]
    pub fn start(&self) -> StateID {
        self.start
    }

    /// Return the total number of states in this DFA.
    ///
    /// Every state of a DFA built by this crate is reachable from its start
    /// state.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Return a handle to the state with the given identifier.
    ///
    /// # Panics
    ///
    /// This panics when the identifier does not belong to this DFA.
    #[inline]
    pub fn state(&self, id: StateID) -> StateRef<'_> {
        assert!(id.as_usize() < self.states.len(), "invalid state {}", id);
        StateRef { dfa: self, id }
    }

    /// Return every state reachable from the start state, in breadth first
    /// order. Within a state, transitions are followed in order of their
    /// ranges.
    pub fn states(&self) -> Vec<StateRef<'_>> {
        let mut seen = vec![false; self.states.len()];
        let mut queue = std::collections::VecDeque::new();
        let mut order = vec![];
        seen[self.start] = true;
        queue.push_back(self.start);
        while let Some(id) = queue.pop_front() {
            order.push(StateRef { dfa: self, id });
            for &(_, next) in self.transitions(id) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// Returns true if and only if the given state is accepting.
    #[inline]
    pub fn is_accepting(&self, id: StateID) -> bool {
        self.states[id].accepting
    }

    /// Return the transitions out of the given state, sorted by range.
    #[inline]
    pub fn transitions(&self, id: StateID) -> &[(CharRange, StateID)] {
        &self.states[id].transitions
    }

    /// Return the state reached from `id` after consuming `ch`, or `None`
    /// if no transition of `id` contains `ch`.
    #[inline]
    pub fn next_state(&self, id: StateID, ch: char) -> Option<StateID> {
        let c = u32::from(ch);
        let trans = self.transitions(id);
        trans
            .binary_search_by(|&(range, _)| {
                if range.end() < c {
                    core::cmp::Ordering::Less
                } else if range.start() > c {
                    core::cmp::Ordering::Greater
                } else {
                    core::cmp::Ordering::Equal
                }
            })
            .ok()
            .map(|i| trans[i].1)
    }

    /// Returns true if and only if this DFA accepts the entire haystack.
    ///
    /// The DFA is walked from its start state one character at a time. A
    /// missing transition fails immediately.
    pub fn is_match(&self, haystack: &str) -> bool {
        let mut id = self.start;
        for ch in haystack.chars() {
            id = match self.next_state(id, ch) {
                Some(id) => id,
                None => return false,
            };
        }
        self.is_accepting(id)
    }

    /// Return a new minimal DFA accepting the same language as this one.
    ///
    /// The result shares no states with this DFA. Minimizing a minimal DFA
    /// yields a DFA with the same number of states.
    pub fn minimize(&self) -> DFA {
        minimize::Minimizer::new(self).run()
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sparse::DFA(")?;
        for (i, state) in self.states.iter().enumerate() {
            let start = if i == self.start.as_usize() { '>' } else { ' ' };
            let accept = if state.accepting { '*' } else { ' ' };
            write!(f, "{}{}{:06}:", accept, start, i)?;
            for (j, &(range, next)) in state.transitions.iter().enumerate() {
                let sep = if j == 0 { " " } else { ", " };
                write!(f, "{}{:?} => {}", sep, range, next.as_usize())?;
            }
            writeln!(f)?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

/// A handle to a state in a specific DFA.
///
/// Two handles are equal if and only if they refer to the same state of the
/// same DFA value. Handles to states with equal identifiers in different
/// DFAs are never equal.
#[derive(Clone, Copy)]
pub struct StateRef<'a> {
    dfa: &'a DFA,
    id: StateID,
}

impl<'a> StateRef<'a> {
    /// The identifier of this state. It is unique within its DFA.
    #[inline]
    pub fn id(&self) -> StateID {
        self.id
    }

    /// Returns true if and only if this state is accepting.
    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.dfa.is_accepting(self.id)
    }

    /// The transitions out of this state. Their ranges are non-empty,
    /// pairwise disjoint and sorted.
    #[inline]
    pub fn transitions(&self) -> &'a [(CharRange, StateID)] {
        self.dfa.transitions(self.id)
    }

    /// Return the state reached after consuming `ch`, if any.
    #[inline]
    pub fn next(&self, ch: char) -> Option<StateRef<'a>> {
        let id = self.dfa.next_state(self.id, ch)?;
        Some(StateRef { dfa: self.dfa, id })
    }
}

impl<'a> PartialEq for StateRef<'a> {
    fn eq(&self, other: &StateRef<'a>) -> bool {
        core::ptr::eq(self.dfa, other.dfa) && self.id == other.id
    }
}

impl<'a> Eq for StateRef<'a> {}

impl<'a> core::hash::Hash for StateRef<'a> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        (self.dfa as *const DFA).hash(state);
        self.id.hash(state);
    }
}

impl<'a> fmt::Debug for StateRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRef")
            .field("id", &self.id.as_usize())
            .field("accepting", &self.is_accepting())
            .field("transitions", &self.transitions())
            .finish()
    }
}
