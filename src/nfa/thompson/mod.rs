/*!
Defines a Thompson NFA and provides a compiler for building one from a
pattern or an [`Ast`](crate::syntax::Ast).

The NFA built here is the input to subset construction in
[`dfa`](crate::dfa). It can also be run directly with a [`Simulation`], which
is slow but simple, and is useful as a reference matcher.
*/

mod compiler;
mod error;
mod nfa;
mod simulate;

pub use self::{
    compiler::{Compiler, Config},
    error::Error,
    nfa::{State, Transition, NFA},
    simulate::Simulation,
};
