use crate::{syntax, util::id::StateID};

/// Compiling a pattern into a Thompson NFA failed.
///
/// Either the pattern did not parse, in which case the [`syntax::Error`] is
/// available through `source`, or the NFA needed more states than allowed
/// by [`Config::nfa_size_limit`](crate::nfa::thompson::Config::nfa_size_limit)
/// or by [`StateID::LIMIT`].
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Clone, Debug)]
enum ErrorKind {
    /// An error that occurred while parsing a regular expression.
    Syntax(syntax::Error),
    /// An error that occurs if more states are produced than can be
    /// addressed by a [`StateID`].
    TooManyStates {
        /// The number of states that are desired, which exceeds the limit.
        given: usize,
        /// The limit on the number of states.
        limit: usize,
    },
    /// An error that occurs when NFA compilation exceeds the configured
    /// state limit.
    ExceededSizeLimit {
        /// The configured limit, in states.
        limit: usize,
    },
}

impl Error {
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn syntax(err: syntax::Error) -> Error {
        Error { kind: ErrorKind::Syntax(err) }
    }

    pub(crate) fn too_many_states(given: usize) -> Error {
        let limit = StateID::LIMIT;
        Error { kind: ErrorKind::TooManyStates { given, limit } }
    }

    pub(crate) fn exceeded_size_limit(limit: usize) -> Error {
        Error { kind: ErrorKind::ExceededSizeLimit { limit } }
    }

    /// Returns true if this error was caused by a malformed pattern.
    pub fn is_syntax(&self) -> bool {
        match *self.kind() {
            ErrorKind::Syntax(_) => true,
            _ => false,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Syntax(ref err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind() {
            ErrorKind::Syntax(ref err) => {
                write!(f, "error parsing regex: {}", err)
            }
            ErrorKind::TooManyStates { given, limit } => write!(
                f,
                "attempted to compile {} NFA states, \
                 which exceeds the limit of {}",
                given, limit,
            ),
            ErrorKind::ExceededSizeLimit { limit } => write!(
                f,
                "number of NFA states exceeded limit of {}",
                limit,
            ),
        }
    }
}
