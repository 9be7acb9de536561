/// An error that occurred while parsing a regular expression.
///
/// Parsing is all-or-nothing: when this error is returned, no part of the
/// pattern has been translated. The error records the pattern and the byte
/// offset of the construct that caused the failure. Its `Display` impl is
/// intended to be end user readable on its own.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    pattern: String,
    offset: usize,
}

/// The kind of syntax error that occurred.
///
/// This is deliberately private. Callers only get a message and an offset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum ErrorKind {
    /// An alternation with a missing operand, e.g., `|a`, `a|` or `(a|)`.
    AlternationEmpty,
    /// A character class that can never match, e.g., `[]`.
    ClassEmpty,
    /// A character class range whose start exceeds its end, or where an
    /// endpoint is itself a class such as `\d`.
    ClassRangeInvalid,
    /// A `]` without a preceding `[`.
    ClassUnopened,
    /// A `[` without a matching `]`.
    ClassUnclosed,
    /// An escape naming a code point that is not a Unicode scalar value.
    CodepointInvalid,
    /// A hexadecimal escape with missing or invalid digits.
    EscapeHexInvalid,
    /// A backslash at the end of the pattern.
    EscapeUnexpectedEof,
    /// A backslash followed by a character with no defined meaning.
    EscapeUnrecognized(char),
    /// A `(` without a matching `)`.
    GroupUnclosed,
    /// A `)` without a matching `(`.
    GroupUnopened,
    /// Groups and repetition operators nested more deeply than the
    /// configured limit.
    NestLimitExceeded(u32),
    /// A counted repetition `{m,n}` where `m > n`.
    RepetitionCountInvalid,
    /// A counted repetition bound that is missing or not a decimal number.
    RepetitionCountDecimalEmpty,
    /// A counted repetition bound that does not fit into a `u32`.
    RepetitionCountOverflow,
    /// A counted repetition without a closing `}`.
    RepetitionCountUnclosed,
    /// A repetition operator without an operand, e.g., `*a`.
    RepetitionMissing,
    /// A construct this crate deliberately does not implement.
    Unsupported(&'static str),
}

impl Error {
    pub(crate) fn new(pattern: &str, offset: usize, kind: ErrorKind) -> Error {
        Error { kind, pattern: pattern.to_string(), offset }
    }

    /// The pattern that failed to parse.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The byte offset into the pattern of the construct that caused this
    /// error.
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[cfg(test)]
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "regex parse error at offset {}: ", self.offset)?;
        match self.kind {
            ErrorKind::AlternationEmpty => {
                write!(f, "alternation is missing an operand")
            }
            ErrorKind::ClassEmpty => {
                write!(f, "character class matches nothing")
            }
            ErrorKind::ClassRangeInvalid => {
                write!(f, "invalid character class range")
            }
            ErrorKind::ClassUnopened => {
                write!(f, "unopened character class")
            }
            ErrorKind::ClassUnclosed => {
                write!(f, "unclosed character class")
            }
            ErrorKind::CodepointInvalid => {
                write!(f, "escape is not a valid Unicode scalar value")
            }
            ErrorKind::EscapeHexInvalid => {
                write!(f, "invalid hexadecimal escape")
            }
            ErrorKind::EscapeUnexpectedEof => {
                write!(f, "incomplete escape sequence at end of pattern")
            }
            ErrorKind::EscapeUnrecognized(c) => {
                write!(f, "unrecognized escape sequence '\\{}'", c)
            }
            ErrorKind::GroupUnclosed => write!(f, "unclosed group"),
            ErrorKind::GroupUnopened => write!(f, "unopened group"),
            ErrorKind::NestLimitExceeded(limit) => write!(
                f,
                "exceed the maximum nesting depth of {}",
                limit,
            ),
            ErrorKind::RepetitionCountInvalid => write!(
                f,
                "invalid repetition count range, \
                 the start must be <= the end",
            ),
            ErrorKind::RepetitionCountDecimalEmpty => write!(
                f,
                "repetition quantifier expects a valid decimal",
            ),
            ErrorKind::RepetitionCountOverflow => {
                write!(f, "repetition count is too big")
            }
            ErrorKind::RepetitionCountUnclosed => {
                write!(f, "unclosed counted repetition")
            }
            ErrorKind::RepetitionMissing => {
                write!(f, "repetition operator missing expression")
            }
            ErrorKind::Unsupported(what) => {
                write!(f, "{} are not supported", what)
            }
        }
    }
}
