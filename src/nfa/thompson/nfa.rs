use crate::util::{id::StateID, range::CharRange, sparse_set::SparseSet};

/// A Thompson non-deterministic finite automaton (NFA).
///
/// An NFA is an arena of states addressed by [`StateID`]. Each state has an
/// accepting flag and a list of transitions. A transition is labeled either
/// by a non-empty [`CharRange`], in which case it is followed after consuming
/// any one character in that range, or by the [empty](CharRange::empty)
/// range, in which case it is an epsilon transition that is followed without
/// consuming any input. A single transition may fan out to several target
/// states.
///
/// Since states refer to one another only by identifier, cycles created by
/// repetition operators need no special treatment. An NFA is immutable once
/// the [`Compiler`](crate::nfa::thompson::Compiler) returns it.
///
/// NFAs built by the compiler in this crate have exactly one accepting
/// state, but nothing else in this crate relies on that.
#[derive(Clone)]
pub struct NFA {
    states: Vec<State>,
    start: StateID,
}

impl NFA {
    /// Create a new NFA from its states and starting state.
    ///
    /// # Panics
    ///
    /// This panics if `start` or any transition target is not a valid
    /// identifier for one of `states`.
    pub(crate) fn new(states: Vec<State>, start: StateID) -> NFA {
        assert!(start.as_usize() < states.len(), "invalid start state");
        for state in states.iter() {
            for t in state.transitions() {
                for &target in t.targets() {
                    assert!(
                        target.as_usize() < states.len(),
                        "invalid transition target {}",
                        target,
                    );
                }
            }
        }
        NFA { states, start }
    }

    /// Return the identifier of the starting state of this NFA.
    #[inline]
    pub fn start(&self) -> StateID {
        self.start
    }

    /// Return the total number of states in this NFA.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Return a reference to the NFA state corresponding to the given ID.
    ///
    /// # Panics
    ///
    /// This panics when the ID does not belong to this NFA.
    #[inline]
    pub fn state(&self, id: StateID) -> &State {
        &self.states[id]
    }

    /// Return a slice of all states in this NFA, indexed by their
    /// identifiers.
    #[inline]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Add the epsilon closure of `start` to `set`.
    ///
    /// States already in `set` are not followed again, so calling this
    /// repeatedly with the same set computes the closure of a set of starting
    /// states. `stack` is scratch space and is empty on return.
    pub(crate) fn epsilon_closure(
        &self,
        start: StateID,
        stack: &mut Vec<StateID>,
        set: &mut SparseSet,
    ) {
        assert!(stack.is_empty());
        stack.push(start);
        while let Some(id) = stack.pop() {
            if !set.insert(id) {
                continue;
            }
            for t in self.states[id].transitions() {
                if !t.is_epsilon() {
                    continue;
                }
                // Push in reverse so that targets are visited in order.
                for &target in t.targets().iter().rev() {
                    if !set.contains(target) {
                        stack.push(target);
                    }
                }
            }
        }
    }

    /// Returns true if and only if any state in the given set is accepting.
    pub(crate) fn any_accepting(&self, set: &SparseSet) -> bool {
        set.into_iter().any(|id| self.states[id].is_accepting())
    }
}

impl core::fmt::Debug for NFA {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "thompson::NFA(")?;
        for (i, state) in self.states.iter().enumerate() {
            let status = if i == self.start.as_usize() { '>' } else { ' ' };
            writeln!(f, "{}{:06}: {:?}", status, i, state)?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

/// A state in an NFA.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct State {
    accepting: bool,
    transitions: Vec<Transition>,
}

impl State {
    /// Returns true if and only if this state is accepting.
    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Returns the transitions out of this state, in the order in which they
    /// were added.
    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub(crate) fn set_accepting(&mut self, yes: bool) {
        self.accepting = yes;
    }

    /// Add a transition to `target` on `range`. If a transition on exactly
    /// the same range already exists, `target` is added to its targets
    /// instead.
    pub(crate) fn add_transition(
        &mut self,
        range: CharRange,
        target: StateID,
    ) {
        if let Some(t) = self.transitions.iter_mut().find(|t| t.range == range)
        {
            if !t.targets.contains(&target) {
                t.targets.push(target);
            }
            return;
        }
        self.transitions.push(Transition { range, targets: vec![target] });
    }
}

impl core::fmt::Debug for State {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.accepting {
            write!(f, "MATCH")?;
            if !self.transitions.is_empty() {
                write!(f, ", ")?;
            }
        }
        for (i, t) in self.transitions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", t)?;
        }
        Ok(())
    }
}

/// A transition out of an NFA state.
#[derive(Clone, Eq, PartialEq)]
pub struct Transition {
    range: CharRange,
    targets: Vec<StateID>,
}

impl Transition {
    /// The range of characters on which this transition is followed. When
    /// this is the empty range, the transition is an epsilon transition.
    #[inline]
    pub fn range(&self) -> CharRange {
        self.range
    }

    /// The states this transition leads to. This is never empty.
    #[inline]
    pub fn targets(&self) -> &[StateID] {
        &self.targets
    }

    /// Returns true if and only if this transition is followed without
    /// consuming any input.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.range.is_empty()
    }
}

impl core::fmt::Debug for Transition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?} => ", self.range)?;
        for (i, id) in self.targets.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", id.as_usize())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(id: usize) -> StateID {
        StateID::must(id)
    }

    // 0 -ε-> 1 -a-> 2 -ε-> 0, 2 -ε-> 3 (accepting)
    fn loop_nfa() -> NFA {
        let mut states = vec![State::default(); 4];
        states[0].add_transition(CharRange::empty(), sid(1));
        states[1].add_transition(CharRange::single('a'), sid(2));
        states[2].add_transition(CharRange::empty(), sid(0));
        states[2].add_transition(CharRange::empty(), sid(3));
        states[3].set_accepting(true);
        NFA::new(states, sid(0))
    }

    #[test]
    fn epsilon_closure_follows_only_epsilons() {
        let nfa = loop_nfa();
        let mut stack = vec![];
        let mut set = SparseSet::new(nfa.len());
        nfa.epsilon_closure(sid(0), &mut stack, &mut set);
        assert_eq!(vec![sid(0), sid(1)], set.to_sorted_vec());
        assert!(!nfa.any_accepting(&set));

        set.clear();
        nfa.epsilon_closure(sid(2), &mut stack, &mut set);
        assert_eq!(vec![sid(0), sid(1), sid(2), sid(3)], set.to_sorted_vec());
        assert!(nfa.any_accepting(&set));
    }

    #[test]
    fn same_range_transitions_fan_out() {
        let mut state = State::default();
        state.add_transition(CharRange::single('a'), sid(1));
        state.add_transition(CharRange::single('a'), sid(2));
        state.add_transition(CharRange::single('a'), sid(2));
        assert_eq!(1, state.transitions().len());
        assert_eq!(&[sid(1), sid(2)], state.transitions()[0].targets());
    }

    #[test]
    #[should_panic]
    fn invalid_target_panics() {
        let mut states = vec![State::default()];
        states[0].add_transition(CharRange::empty(), sid(5));
        NFA::new(states, sid(0));
    }
}
