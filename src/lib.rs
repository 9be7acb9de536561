/*!
This crate compiles regular expressions over Unicode characters into minimal
deterministic finite automata and uses them to search strings.

Compilation is a pipeline of pure transformations:

1. [`syntax::parse`] turns a pattern into an [`Ast`](syntax::Ast).
2. A [`thompson::Compiler`](nfa::thompson::Compiler) turns the `Ast` into a
   Thompson NFA whose transitions are labeled by character ranges.
3. The powerset construction turns the NFA into a
   [`sparse::DFA`](dfa::sparse::DFA), which is then minimized.

A [`Regex`] runs this pipeline twice, once for the pattern and once for its
reversal, and uses the resulting pair of DFAs to find leftmost-longest
matches. Every automaton is immutable once built and can be shared between
threads.

Offsets reported by searches are byte offsets into the haystack, which is
always a `&str`.

# Example

```
use char_automata::{Match, Regex};

let re = Regex::new("[a-c]+x")?;
assert!(re.matches("abcx"));
assert_eq!(Some(Match::new(3, 6)), re.find("zzzbbxq"));

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Supported syntax

Concatenation, alternation with `|`, grouping with `(...)` and `(?:...)`,
the repetition operators `*`, `+`, `?`, `{m}`, `{m,}` and `{m,n}`, `.`
(any character except `\n`), character classes such as `[a-z]` and
`[^0-9]`, the Perl classes `\d`, `\w` and `\s` (and their negations) and
escapes such as `\n`, `\t`, `\x{263A}` and `\*`. Anchors, word boundaries,
backreferences, Unicode property classes and inline flags are rejected with
a syntax error.

# Crate features

* **logging** - When enabled, the `log` crate is used to emit messages about
  how the automata are built, such as the number of states in each of them.
*/

pub use crate::{
    dfa::regex::Regex,
    util::search::{Input, Match, MatchError, SearchKind},
};

#[macro_use]
mod macros;

pub mod dfa;
pub mod nfa;
pub mod syntax;
pub mod util;
