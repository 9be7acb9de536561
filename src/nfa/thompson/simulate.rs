use crate::{
    nfa::thompson::NFA,
    util::{id::StateID, sparse_set::SparseSets},
};

/// A direct simulation of an NFA.
///
/// The simulation tracks the set of all NFA states reachable after each
/// character of input, without ever building a DFA. It is much slower than
/// searching with a DFA, but it is simple enough that it serves as the
/// reference against which DFAs are checked.
///
/// A simulation borrows its NFA and owns scratch space sized to it, so it can
/// be reused for many searches over the same NFA.
#[derive(Clone, Debug)]
pub struct Simulation<'n> {
    nfa: &'n NFA,
    sets: SparseSets,
    stack: Vec<StateID>,
}

impl<'n> Simulation<'n> {
    /// Create a new simulation of the given NFA.
    pub fn new(nfa: &'n NFA) -> Simulation<'n> {
        Simulation { nfa, sets: SparseSets::new(nfa.len()), stack: vec![] }
    }

    /// Returns true if and only if the NFA accepts the entire haystack.
    pub fn is_match(&mut self, haystack: &str) -> bool {
        self.sets.clear();
        self.nfa.epsilon_closure(
            self.nfa.start(),
            &mut self.stack,
            &mut self.sets.set1,
        );
        for ch in haystack.chars() {
            self.step(ch);
            if self.sets.set1.is_empty() {
                return false;
            }
        }
        self.nfa.any_accepting(&self.sets.set1)
    }

    /// Return the end offset of the longest prefix of `haystack[start..]`
    /// accepted by the NFA, if there is one.
    ///
    /// # Panics
    ///
    /// This panics if `start` is not a `char` boundary of `haystack`.
    pub fn longest_match_at(
        &mut self,
        haystack: &str,
        start: usize,
    ) -> Option<usize> {
        self.sets.clear();
        self.nfa.epsilon_closure(
            self.nfa.start(),
            &mut self.stack,
            &mut self.sets.set1,
        );
        let mut last = None;
        if self.nfa.any_accepting(&self.sets.set1) {
            last = Some(start);
        }
        for (i, ch) in haystack[start..].char_indices() {
            self.step(ch);
            if self.sets.set1.is_empty() {
                break;
            }
            if self.nfa.any_accepting(&self.sets.set1) {
                last = Some(start + i + ch.len_utf8());
            }
        }
        last
    }

    /// Replace the current set of states (`set1`) with the set of states
    /// reachable from it after consuming `ch`.
    fn step(&mut self, ch: char) {
        let Simulation { nfa, ref mut sets, ref mut stack } = *self;
        sets.set2.clear();
        for id in &sets.set1 {
            for t in nfa.state(id).transitions() {
                if t.is_epsilon() || !t.range().contains(u32::from(ch)) {
                    continue;
                }
                for &target in t.targets() {
                    nfa.epsilon_closure(target, stack, &mut sets.set2);
                }
            }
        }
        sets.swap();
    }
}
