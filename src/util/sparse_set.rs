/*!
Fixed capacity sets of NFA state identifiers.

Epsilon closures are recomputed for every DFA state during determinization
and for every character during simulation, so the sets holding them must be
cheap to reset. A [`SparseSet`] clears in constant time, tests and inserts in
constant time, and iterates in insertion order.

See <https://research.swtch.com/sparse> for the idea. Both backing vectors
are zero initialized here.
*/

use crate::util::id::StateID;

/// The current and next state sets of an NFA simulation.
#[derive(Clone, Debug)]
pub(crate) struct SparseSets {
    pub(crate) set1: SparseSet,
    pub(crate) set2: SparseSet,
}

impl SparseSets {
    pub(crate) fn new(capacity: usize) -> SparseSets {
        SparseSets {
            set1: SparseSet::new(capacity),
            set2: SparseSet::new(capacity),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.set1.clear();
        self.set2.clear();
    }

    /// Make the next set current.
    pub(crate) fn swap(&mut self) {
        core::mem::swap(&mut self.set1, &mut self.set2);
    }
}

/// A set of NFA states, sized for one NFA.
#[derive(Clone)]
pub(crate) struct SparseSet {
    /// Members, in insertion order. Only the first `len` slots are live.
    members: Vec<StateID>,
    /// For each state, where it sits in `members`. A state is in the set
    /// exactly when `slots[id] < len` and `members[slots[id]] == id`.
    slots: Vec<usize>,
    len: usize,
}

impl SparseSet {
    /// Create a set that can hold states `0..capacity`.
    ///
    /// # Panics
    ///
    /// When `capacity` exceeds the number of representable states.
    pub(crate) fn new(capacity: usize) -> SparseSet {
        assert!(
            capacity <= StateID::LIMIT,
            "sparse set capacity {} exceeds limit of {}",
            capacity,
            StateID::LIMIT,
        );
        SparseSet {
            members: vec![StateID::ZERO; capacity],
            slots: vec![0; capacity],
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add `id`, returning false if it was already present.
    ///
    /// # Panics
    ///
    /// When `id` is not below the capacity of this set.
    pub(crate) fn insert(&mut self, id: StateID) -> bool {
        if self.contains(id) {
            return false;
        }
        self.members[self.len] = id;
        self.slots[id] = self.len;
        self.len += 1;
        true
    }

    pub(crate) fn contains(&self, id: StateID) -> bool {
        let slot = self.slots[id];
        slot < self.len && self.members[slot] == id
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// The members in ascending order. This is the canonical form used to
    /// identify a DFA state.
    pub(crate) fn to_sorted_vec(&self) -> Vec<StateID> {
        let mut ids = self.members[..self.len].to_vec();
        ids.sort();
        ids
    }
}

impl core::fmt::Debug for SparseSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_set().entries(self.into_iter()).finish()
    }
}

impl<'a> IntoIterator for &'a SparseSet {
    type Item = StateID;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, StateID>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members[..self.len].iter().copied()
    }
}
