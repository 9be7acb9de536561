/*!
Utilities shared by the syntax, NFA and DFA modules.

The public pieces here are the identifier, range and search types that appear
in the APIs of the automata. The rest is scaffolding used during compilation.
*/

pub mod id;
pub mod range;
pub mod search;

pub(crate) mod alphabet;
pub(crate) mod prefilter;
pub(crate) mod sparse_set;
