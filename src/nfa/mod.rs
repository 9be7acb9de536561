/*!
Provides non-deterministic finite automata (NFA) and regex engines that use
them.

This crate only provides one kind of NFA, the Thompson NFA in
[`thompson`]. Its transitions are labeled by inclusive ranges of characters,
or by the empty range for epsilon transitions.
*/

pub mod thompson;
