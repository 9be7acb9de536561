/*!
Conversion of a Thompson NFA into a sparse DFA via the powerset construction.

Every DFA state corresponds to a distinct set of NFA states that is closed
under epsilon transitions. States are discovered from a worklist starting at
the epsilon closure of the NFA's start state. For each discovered state, the
ranges of all of its NFA states' transitions are split into a minimal
disjoint cover, so that every character of a covering range leads to the same
set of NFA states. That set's epsilon closure is the successor DFA state.

A memo from sets of NFA states to DFA state identifiers guarantees that no
two DFA states share the same set.
*/

use std::{collections::HashMap, rc::Rc};

use crate::{
    dfa::{error::Error, sparse::DFA},
    nfa::thompson,
    util::{
        alphabet, id::StateID, range::CharRange, sparse_set::SparseSet,
    },
};

/// The configuration used to determinize an NFA.
#[derive(Clone, Debug, Default)]
pub(crate) struct Config {
    size_limit: Option<usize>,
}

impl Config {
    pub(crate) fn new() -> Config {
        Config::default()
    }

    /// Fail with an error once more than this many DFA states would be
    /// created. `None` means no limit.
    pub(crate) fn size_limit(mut self, limit: Option<usize>) -> Config {
        self.size_limit = limit;
        self
    }

    /// Determinize the given NFA into a new DFA.
    pub(crate) fn run(&self, nfa: &thompson::NFA) -> Result<DFA, Error> {
        let mut runner = Runner {
            config: self.clone(),
            nfa,
            dfa: DFA::empty(),
            builder_states: vec![],
            cache: HashMap::new(),
            stack: vec![],
            sparse: SparseSet::new(nfa.len()),
        };
        runner.run()?;
        debug!(
            "determinized NFA with {} states into DFA with {} states",
            nfa.len(),
            runner.dfa.len(),
        );
        Ok(runner.dfa)
    }
}

/// The state of a single determinization.
#[derive(Debug)]
struct Runner<'a> {
    config: Config,
    /// The NFA we're converting into a DFA.
    nfa: &'a thompson::NFA,
    /// The DFA we're building.
    dfa: DFA,
    /// The set of NFA states making up each DFA state, indexed by the DFA
    /// state's identifier.
    builder_states: Vec<Rc<Vec<StateID>>>,
    /// A cache of DFA states that already exist, keyed by their sorted set
    /// of NFA states.
    cache: HashMap<Rc<Vec<StateID>>, StateID>,
    /// Scratch space for computing epsilon closures.
    stack: Vec<StateID>,
    /// Scratch space for collecting the NFA states of a new DFA state.
    sparse: SparseSet,
}

impl<'a> Runner<'a> {
    fn run(&mut self) -> Result<(), Error> {
        self.sparse.clear();
        self.nfa.epsilon_closure(
            self.nfa.start(),
            &mut self.stack,
            &mut self.sparse,
        );
        let (start, _) = self.cached_state()?;
        self.dfa.set_start(start);

        let mut uncompiled = vec![start];
        while let Some(dfa_id) = uncompiled.pop() {
            let nfa_states = Rc::clone(&self.builder_states[dfa_id]);
            let nfa = self.nfa;
            let mut labeled: Vec<(CharRange, &[StateID])> = vec![];
            for &nfa_id in nfa_states.iter() {
                for t in nfa.state(nfa_id).transitions() {
                    if !t.is_epsilon() {
                        labeled.push((t.range(), t.targets()));
                    }
                }
            }

            let mut transitions: Vec<(CharRange, StateID)> = vec![];
            for (range, targets) in alphabet::minimal_cover(&labeled) {
                self.sparse.clear();
                for target in targets {
                    nfa.epsilon_closure(
                        target,
                        &mut self.stack,
                        &mut self.sparse,
                    );
                }
                let (next, is_new) = self.cached_state()?;
                if is_new {
                    uncompiled.push(next);
                }
                // Distinct target sets can still close over the same DFA
                // state, in which case adjacent ranges are joined.
                if let Some(last) = transitions.last_mut() {
                    if last.1 == next && last.0.is_adjacent_to(&range) {
                        last.0 = CharRange::new(last.0.start(), range.end());
                        continue;
                    }
                }
                transitions.push((range, next));
            }
            for (range, next) in transitions {
                self.dfa.add_transition(dfa_id, range, next);
            }
        }
        Ok(())
    }

    /// Return the DFA state for the NFA states currently in `sparse`,
    /// creating it if it doesn't exist yet. The boolean is true when the
    /// state was created by this call.
    fn cached_state(&mut self) -> Result<(StateID, bool), Error> {
        let key = self.sparse.to_sorted_vec();
        if let Some(&id) = self.cache.get(&key) {
            return Ok((id, false));
        }
        if let Some(limit) = self.config.size_limit {
            if self.dfa.len() >= limit {
                return Err(Error::determinize_exceeded_size_limit(limit));
            }
        }
        let accepting = self.nfa.any_accepting(&self.sparse);
        let id = self.dfa.add_state(accepting)?;
        let key = Rc::new(key);
        self.builder_states.push(Rc::clone(&key));
        self.cache.insert(key, id);
        trace!("new DFA state {} from NFA states {:?}", id, self.sparse);
        Ok((id, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn determinize(pattern: &str) -> DFA {
        let nfa = thompson::Compiler::new().build(pattern).unwrap();
        Config::new().run(&nfa).unwrap()
    }

    #[test]
    fn literal() {
        let dfa = determinize("ab");
        assert_eq!(3, dfa.len());
        assert!(dfa.is_match("ab"));
        assert!(!dfa.is_match("a"));
        assert!(!dfa.is_match("abb"));
    }

    #[test]
    fn overlapping_ranges_are_split() {
        let dfa = determinize("[a-m]x|[h-z]y");
        let start = dfa.start();
        let ranges: Vec<CharRange> =
            dfa.transitions(start).iter().map(|&(r, _)| r).collect();
        assert_eq!(
            vec![
                CharRange::chars('a', 'g'),
                CharRange::chars('h', 'm'),
                CharRange::chars('n', 'z'),
            ],
            ranges,
        );
        assert!(dfa.is_match("hx"));
        assert!(dfa.is_match("hy"));
        assert!(dfa.is_match("ax"));
        assert!(!dfa.is_match("ay"));
        assert!(!dfa.is_match("zx"));
    }

    #[test]
    fn transitions_are_sorted_and_disjoint() {
        let dfa = determinize("([a-f]|[d-k]|x|[^a-z])+(b|[b-c])*");
        for state in dfa.states() {
            for pair in state.transitions().windows(2) {
                assert!(!pair[0].0.is_empty());
                assert!(pair[0].0.end() < pair[1].0.start());
            }
        }
    }

    #[test]
    fn every_state_is_reachable() {
        let dfa = determinize("(a|b)*abb");
        assert_eq!(dfa.len(), dfa.states().len());
    }

    #[test]
    fn size_limit() {
        let nfa = thompson::Compiler::new().build("[ab]*a[ab]{4}").unwrap();
        let err = Config::new().size_limit(Some(10)).run(&nfa).unwrap_err();
        assert!(err.to_string().contains("10"));
        assert!(Config::new().size_limit(Some(100)).run(&nfa).is_ok());
    }
}
