/*!
A module for building and searching with deterministic finite automata (DFAs).

A DFA in this crate is a [`sparse::DFA`]: a set of states, each with a sorted
list of disjoint character ranges leading to other states. A DFA is built from
a Thompson NFA by the powerset construction and is then, by default,
minimized so that no two of its states accept the same language. Once built,
a DFA is immutable.

Most users will want a [`regex::Regex`], which pairs a forward DFA with a
reverse DFA and uses them to find the boundaries of matches in a haystack.

# Example

This example shows how to test whether a pattern matches a whole string and
where it first occurs in a longer one.

```
use char_automata::{dfa::regex::Regex, Match};

let re = Regex::new("a{2,3}")?;
assert!(re.matches("aa"));
assert!(!re.matches("aaaa"));
assert_eq!(Some(Match::new(1, 4)), re.find("baaaab"));

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Example: inspecting a DFA

The states of a DFA can be walked in breadth first order starting from its
start state, which is useful for generating code from it.

```
use char_automata::dfa::sparse::DFA;

let dfa = DFA::new("ab|ac")?;
let states = dfa.states();
assert_eq!(3, states.len());
assert_eq!(dfa.start(), states[0].id());
assert!(!states[0].is_accepting());
assert!(states[2].is_accepting());

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub use crate::dfa::error::Error;

pub mod regex;
pub mod sparse;

mod determinize;
mod error;
mod minimize;
mod search;
