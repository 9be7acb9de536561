/*!
State identifiers.

NFAs and DFAs in this crate keep their states in a `Vec` and refer to one
another by position, so cycles in the state graph need no shared ownership.
A [`StateID`] is such a position. It only means something relative to the
automaton that handed it out.
*/

use core::{convert::TryFrom, fmt, ops};

/// The index of a state within a single NFA or DFA.
///
/// A `StateID` is a `u32` under the hood and can index `Vec`s and slices
/// directly.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub struct StateID(u32);

impl StateID {
    /// The largest identifier. It fits in an `i32` so that it always fits
    /// in a `usize` too.
    pub const MAX: StateID = StateID(core::i32::MAX as u32 - 1);

    /// How many states one automaton may hold.
    pub const LIMIT: usize = StateID::MAX.as_usize() + 1;

    pub const ZERO: StateID = StateID(0);

    /// Returns an error when `id` is bigger than [`StateID::MAX`].
    #[inline]
    pub fn new(id: usize) -> Result<StateID, StateIDError> {
        StateID::try_from(id)
    }

    /// Like [`StateID::new`], but panics on an identifier that is too big.
    #[inline]
    pub fn must(id: usize) -> StateID {
        StateID::new(id).unwrap_or_else(|err| panic!("{}", err))
    }

    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for StateID {
    type Error = StateIDError;

    fn try_from(id: usize) -> Result<StateID, StateIDError> {
        if id > StateID::MAX.as_usize() {
            Err(StateIDError { attempted: id as u64 })
        } else {
            Ok(StateID(id as u32))
        }
    }
}

impl fmt::Display for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> ops::Index<StateID> for [T] {
    type Output = T;

    #[inline]
    fn index(&self, id: StateID) -> &T {
        &self[id.as_usize()]
    }
}

impl<T> ops::IndexMut<StateID> for [T] {
    #[inline]
    fn index_mut(&mut self, id: StateID) -> &mut T {
        &mut self[id.as_usize()]
    }
}

impl<T> ops::Index<StateID> for Vec<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: StateID) -> &T {
        &self.as_slice()[id]
    }
}

impl<T> ops::IndexMut<StateID> for Vec<T> {
    #[inline]
    fn index_mut(&mut self, id: StateID) -> &mut T {
        &mut self.as_mut_slice()[id]
    }
}

/// Returned when an integer is too big to be a [`StateID`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateIDError {
    attempted: u64,
}

impl StateIDError {
    /// The integer that was rejected.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }
}

impl std::error::Error for StateIDError {}

impl fmt::Display for StateIDError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state identifier {} is bigger than the maximum of {}",
            self.attempted, StateID::MAX,
        )
    }
}
