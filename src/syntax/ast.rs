use core::fmt;

use crate::{
    syntax::{is_meta_character, literal::Factorization},
    util::range::CharRange,
};

/// An abstract syntax tree for a regular expression.
///
/// The tree is immutable once the parser returns it. Every traversal over it
/// (NFA compilation, literal factorization, length analysis and reversal)
/// matches exhaustively on these six variants.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Ast {
    /// `head` followed by `tail`.
    Concat {
        /// The expression matched first.
        head: Box<Ast>,
        /// The expression matched second.
        tail: Box<Ast>,
    },
    /// Either `left` or `right`.
    Alternation {
        /// The first alternate.
        left: Box<Ast>,
        /// The second alternate.
        right: Box<Ast>,
    },
    /// Zero or more occurrences of `inner`.
    Repetition {
        /// The repeated expression.
        inner: Box<Ast>,
    },
    /// Between `min` and `max` occurrences of `inner`, inclusive.
    CountedRepetition {
        /// The repeated expression.
        inner: Box<Ast>,
        /// The minimum number of occurrences.
        min: u32,
        /// The maximum number of occurrences. Always `>= min`.
        max: u32,
    },
    /// Any single character in the range.
    Range(CharRange),
    /// The exact string. The empty string is permitted and matches only the
    /// empty string.
    Literal(String),
}

impl Ast {
    /// Create a concatenation.
    pub fn concat(head: Ast, tail: Ast) -> Ast {
        Ast::Concat { head: Box::new(head), tail: Box::new(tail) }
    }

    /// Create an alternation.
    pub fn alternation(left: Ast, right: Ast) -> Ast {
        Ast::Alternation { left: Box::new(left), right: Box::new(right) }
    }

    /// Concatenate `asts` in order. The result is a balanced tree, so its
    /// depth grows with the logarithm of the number of operands. Returns
    /// `None` when `asts` is empty.
    pub fn concat_all(asts: Vec<Ast>) -> Option<Ast> {
        balance(asts, Ast::concat)
    }

    /// Like [`Ast::concat_all`], but for alternates.
    pub fn alternation_all(asts: Vec<Ast>) -> Option<Ast> {
        balance(asts, Ast::alternation)
    }

    /// Create a zero-or-more repetition.
    pub fn repetition(inner: Ast) -> Ast {
        Ast::Repetition { inner: Box::new(inner) }
    }

    /// Create a counted repetition.
    ///
    /// # Panics
    ///
    /// This panics when `min > max`.
    pub fn counted(inner: Ast, min: u32, max: u32) -> Ast {
        assert!(min <= max, "invalid repetition range {}..={}", min, max);
        Ast::CountedRepetition { inner: Box::new(inner), min, max }
    }

    /// Create a node matching any single character in `range`.
    ///
    /// # Panics
    ///
    /// This panics when `range` is the empty (epsilon) range.
    pub fn range(range: CharRange) -> Ast {
        assert!(!range.is_empty(), "a range node cannot be empty");
        Ast::Range(range)
    }

    /// Create a node matching exactly `s`.
    pub fn literal<S: Into<String>>(s: S) -> Ast {
        Ast::Literal(s.into())
    }

    /// The length, in characters, of the shortest string this expression
    /// matches.
    pub fn min_len(&self) -> usize {
        match *self {
            Ast::Concat { ref head, ref tail } => {
                head.min_len().saturating_add(tail.min_len())
            }
            Ast::Alternation { ref left, ref right } => {
                core::cmp::min(left.min_len(), right.min_len())
            }
            Ast::Repetition { .. } => 0,
            Ast::CountedRepetition { ref inner, min, .. } => {
                inner.min_len().saturating_mul(min as usize)
            }
            Ast::Range(_) => 1,
            Ast::Literal(ref s) => s.chars().count(),
        }
    }

    /// The length, in characters, of the longest string this expression
    /// matches, or `None` when there is no upper bound.
    pub fn max_len(&self) -> Option<usize> {
        match *self {
            Ast::Concat { ref head, ref tail } => {
                head.max_len()?.checked_add(tail.max_len()?)
            }
            Ast::Alternation { ref left, ref right } => {
                Some(core::cmp::max(left.max_len()?, right.max_len()?))
            }
            Ast::Repetition { ref inner } => match inner.max_len() {
                Some(0) => Some(0),
                _ => None,
            },
            Ast::CountedRepetition { ref inner, max, .. } => {
                inner.max_len()?.checked_mul(max as usize)
            }
            Ast::Range(_) => Some(1),
            Ast::Literal(ref s) => Some(s.chars().count()),
        }
    }

    /// Return an expression matching the reverse of every string matched by
    /// this one.
    pub fn reverse(&self) -> Ast {
        match *self {
            Ast::Concat { ref head, ref tail } => {
                Ast::concat(tail.reverse(), head.reverse())
            }
            Ast::Alternation { ref left, ref right } => {
                Ast::alternation(left.reverse(), right.reverse())
            }
            Ast::Repetition { ref inner } => Ast::repetition(inner.reverse()),
            Ast::CountedRepetition { ref inner, min, max } => {
                Ast::counted(inner.reverse(), min, max)
            }
            Ast::Range(range) => Ast::Range(range),
            Ast::Literal(ref s) => Ast::Literal(s.chars().rev().collect()),
        }
    }

    /// Derive the literal factorization of this expression.
    ///
    /// This is a pure query. Calling it repeatedly yields the same result.
    pub fn factors(&self) -> Factorization {
        match *self {
            Ast::Concat { ref head, ref tail } => {
                head.factors().concatenate(&tail.factors())
            }
            Ast::Alternation { ref left, ref right } => {
                left.factors().alternate(&right.factors())
            }
            Ast::Repetition { .. } => Factorization::unbounded(),
            Ast::CountedRepetition { ref inner, min, max } => {
                inner.factors().repeat_range(min, max)
            }
            Ast::Range(range) => Factorization::range(range),
            Ast::Literal(ref s) => Factorization::literal(s),
        }
    }

    /// Returns true if this node can be suffixed with a repetition operator
    /// without parentheses.
    fn is_atom(&self) -> bool {
        match *self {
            Ast::Range(_) => true,
            Ast::Literal(ref s) => s.chars().count() == 1,
            Ast::Concat { .. }
            | Ast::Alternation { .. }
            | Ast::Repetition { .. }
            | Ast::CountedRepetition { .. } => false,
        }
    }

    fn fmt_atom(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_atom() {
            write!(f, "{}", self)
        } else {
            write!(f, "({})", self)
        }
    }

    fn fmt_concat_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Ast::Alternation { .. } => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }
}

/// Join neighbouring operands pairwise until one is left. Operand order is
/// preserved.
fn balance(mut asts: Vec<Ast>, join: fn(Ast, Ast) -> Ast) -> Option<Ast> {
    while asts.len() > 1 {
        let mut joined = Vec::with_capacity((asts.len() + 1) / 2);
        let mut it = asts.into_iter();
        while let Some(first) = it.next() {
            joined.push(match it.next() {
                Some(second) => join(first, second),
                None => first,
            });
        }
        asts = joined;
    }
    asts.pop()
}

/// Print an endpoint of a bracketed class such that the parser reads it back
/// as the same character code.
struct ClassChar(u32);

impl fmt::Display for ClassChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match core::char::from_u32(self.0) {
            Some(c) if c.is_ascii_alphanumeric() => write!(f, "{}", c),
            _ => write!(f, "\\x{{{:X}}}", self.0),
        }
    }
}

/// Renders the expression back into pattern syntax that parses into an
/// expression matching the same language.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Ast::Concat { ref head, ref tail } => {
                head.fmt_concat_operand(f)?;
                tail.fmt_concat_operand(f)
            }
            Ast::Alternation { ref left, ref right } => {
                write!(f, "{}|{}", left, right)
            }
            Ast::Repetition { ref inner } => {
                inner.fmt_atom(f)?;
                write!(f, "*")
            }
            Ast::CountedRepetition { ref inner, min, max } => {
                inner.fmt_atom(f)?;
                write!(f, "{{{},{}}}", min, max)
            }
            Ast::Range(range) => {
                write!(f, "[{}", ClassChar(range.start()))?;
                if range.start() != range.end() {
                    write!(f, "-{}", ClassChar(range.end()))?;
                }
                write!(f, "]")
            }
            Ast::Literal(ref s) => {
                if s.is_empty() {
                    return write!(f, "()");
                }
                for c in s.chars() {
                    if is_meta_character(c) {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                Ok(())
            }
        }
    }
}
