use crate::{nfa::thompson, util::id::StateID};

/// Building a DFA failed.
///
/// The pattern may be malformed, in which case [`Error::is_syntax`] is
/// true and the syntax error is reachable through `source`. Otherwise one
/// of the automata grew past a limit.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Clone, Debug)]
enum ErrorKind {
    /// Parsing the pattern or compiling its NFA failed.
    NFA(thompson::Error),
    /// More DFA states than a `StateID` can name.
    TooManyStates,
    /// Subset construction passed `sparse::Config::determinize_size_limit`.
    SizeLimit { limit: usize },
}

impl Error {
    pub(crate) fn nfa(err: thompson::Error) -> Error {
        Error { kind: ErrorKind::NFA(err) }
    }

    pub(crate) fn too_many_states() -> Error {
        Error { kind: ErrorKind::TooManyStates }
    }

    pub(crate) fn determinize_exceeded_size_limit(limit: usize) -> Error {
        Error { kind: ErrorKind::SizeLimit { limit } }
    }

    /// True when the pattern itself was rejected.
    pub fn is_syntax(&self) -> bool {
        match self.kind {
            ErrorKind::NFA(ref err) => err.is_syntax(),
            ErrorKind::TooManyStates | ErrorKind::SizeLimit { .. } => false,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            ErrorKind::NFA(ref err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::NFA(ref err) => write!(f, "{}", err),
            ErrorKind::TooManyStates => write!(
                f,
                "DFA needs more than {} states",
                StateID::LIMIT,
            ),
            ErrorKind::SizeLimit { limit } => write!(
                f,
                "DFA grew past the limit of {} states",
                limit,
            ),
        }
    }
}
