/*!
Literal factorization of regular expressions.

A [`Factorization`] summarizes the literal strings that are guaranteed to
appear in every string matched by an expression. It is derived bottom up from
the [`Ast`](crate::syntax::Ast) with two combinators,
[`Factorization::concatenate`] and [`Factorization::alternate`], and is
consumed by prefilters that want to skip over parts of a haystack that cannot
possibly match.

Each field is a [`Literals`] value, which makes the difference between "no
information" ([`Literals::Unbounded`]) and "this exact set of strings"
([`Literals::Bounded`]) explicit.
*/

use std::collections::BTreeSet;

use crate::util::range::CharRange;

/// The maximum number of strings tracked in a single set. Larger sets are
/// not worth the cost of a prefilter and are dropped to `Unbounded`.
pub const MAX_LITERALS: usize = 32;

/// Character ranges at most this wide contribute one literal per character.
const RANGE_LITERAL_LIMIT: usize = 4;

/// Counted repetitions are unrolled at most this many times when deriving
/// literals.
const REPEAT_UNROLL_LIMIT: u32 = 8;

/// A set of literal strings, or the absence of any information.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Literals {
    /// Nothing is known. Either the set is infinite, too big to track or
    /// trivially satisfied.
    Unbounded,
    /// A finite set of strings.
    Bounded(BTreeSet<String>),
}

impl Literals {
    /// Build a bounded set, dropping to `Unbounded` when it is too big.
    fn bounded(set: BTreeSet<String>) -> Literals {
        if set.len() > MAX_LITERALS {
            Literals::Unbounded
        } else {
            Literals::Bounded(set)
        }
    }

    fn single(s: &str) -> Literals {
        let mut set = BTreeSet::new();
        set.insert(s.to_string());
        Literals::Bounded(set)
    }

    /// Returns true if and only if nothing is known.
    pub fn is_unbounded(&self) -> bool {
        match *self {
            Literals::Unbounded => true,
            Literals::Bounded(_) => false,
        }
    }

    /// Returns the underlying set, if bounded.
    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match *self {
            Literals::Unbounded => None,
            Literals::Bounded(ref set) => Some(set),
        }
    }

    /// Drop sets containing the empty string. Every string has the empty
    /// string as a prefix, suffix and factor, so such a set says nothing.
    fn informative(self) -> Literals {
        match self {
            Literals::Bounded(ref set) if set.contains("") => {
                Literals::Unbounded
            }
            lits => lits,
        }
    }

    fn union(&self, other: &Literals) -> Literals {
        match (self, other) {
            (Literals::Bounded(a), Literals::Bounded(b)) => {
                Literals::bounded(a.union(b).cloned().collect())
            }
            _ => Literals::Unbounded,
        }
    }

    /// Every string of `self` followed by every string of `other`.
    fn cross(&self, other: &Literals) -> Literals {
        let (a, b) = match (self, other) {
            (Literals::Bounded(a), Literals::Bounded(b)) => (a, b),
            _ => return Literals::Unbounded,
        };
        if a.len().saturating_mul(b.len()) > MAX_LITERALS {
            return Literals::Unbounded;
        }
        let mut set = BTreeSet::new();
        for x in a {
            for y in b {
                let mut s = String::with_capacity(x.len() + y.len());
                s.push_str(x);
                s.push_str(y);
                set.insert(s);
            }
        }
        Literals::bounded(set)
    }

    fn total_chars(set: &BTreeSet<String>) -> usize {
        set.iter().map(|s| s.chars().count()).sum()
    }

    /// Pick the more useful of two valid candidate sets.
    ///
    /// A bounded set beats an unbounded one. Between two bounded sets, fewer
    /// elements wins, and on a tie, the larger total number of characters
    /// wins since longer strings filter more aggressively. On a full tie, the
    /// first set wins.
    fn better(self, other: Literals) -> Literals {
        let (a, b) = match (&self, &other) {
            (Literals::Unbounded, _) => return other,
            (_, Literals::Unbounded) => return self,
            (Literals::Bounded(a), Literals::Bounded(b)) => (a, b),
        };
        if b.len() < a.len() {
            return other;
        }
        if b.len() == a.len()
            && Literals::total_chars(b) > Literals::total_chars(a)
        {
            return other;
        }
        self
    }

    fn best<I: IntoIterator<Item = Literals>>(candidates: I) -> Literals {
        candidates
            .into_iter()
            .map(Literals::informative)
            .fold(Literals::Unbounded, Literals::better)
    }
}

/// Literal information derived from an expression.
///
/// * `all` is the exact language of the expression when it is small and
/// finite.
/// * `prefixes` is a set such that every matched string begins with one of
/// its members.
/// * `suffixes` is a set such that every matched string ends with one of its
/// members.
/// * `factors` is a set such that every matched string contains one of its
/// members.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Factorization {
    all: Literals,
    prefixes: Literals,
    suffixes: Literals,
    factors: Literals,
}

impl Factorization {
    /// The factorization of an expression about which nothing is known.
    pub fn unbounded() -> Factorization {
        Factorization {
            all: Literals::Unbounded,
            prefixes: Literals::Unbounded,
            suffixes: Literals::Unbounded,
            factors: Literals::Unbounded,
        }
    }

    /// The factorization of an expression matching exactly `s`.
    pub fn literal(s: &str) -> Factorization {
        let lits = Literals::single(s);
        Factorization {
            all: lits.clone(),
            prefixes: lits.clone().informative(),
            suffixes: lits.clone().informative(),
            factors: lits.informative(),
        }
    }

    /// The factorization of an expression matching any single character in
    /// the given range.
    pub fn range(range: CharRange) -> Factorization {
        if range.len() > RANGE_LITERAL_LIMIT {
            return Factorization::unbounded();
        }
        let set: BTreeSet<String> = range.iter().map(String::from).collect();
        let lits = Literals::bounded(set);
        Factorization {
            all: lits.clone(),
            prefixes: lits.clone(),
            suffixes: lits.clone(),
            factors: lits,
        }
    }

    /// The factorization of an expression matched by a string matched by
    /// `self` followed by a string matched by `other`.
    pub fn concatenate(&self, other: &Factorization) -> Factorization {
        let all = self.all.cross(&other.all);
        let all_prefixes = self.all.cross(&other.prefixes);
        let suffixes_all = self.suffixes.cross(&other.all);
        let suffixes_prefixes = self.suffixes.cross(&other.prefixes);

        let prefixes = Literals::best(vec![
            self.prefixes.clone(),
            all_prefixes.clone(),
            all.clone(),
        ]);
        let suffixes = Literals::best(vec![
            other.suffixes.clone(),
            suffixes_all.clone(),
            all.clone(),
        ]);
        let factors = Literals::best(vec![
            self.factors.clone(),
            other.factors.clone(),
            all.clone(),
            all_prefixes,
            suffixes_all,
            suffixes_prefixes,
        ]);
        Factorization { all, prefixes, suffixes, factors }
    }

    /// The factorization of an expression matched by a string matched by
    /// either `self` or `other`.
    pub fn alternate(&self, other: &Factorization) -> Factorization {
        Factorization {
            all: self.all.union(&other.all),
            prefixes: self.prefixes.union(&other.prefixes).informative(),
            suffixes: self.suffixes.union(&other.suffixes).informative(),
            factors: self.factors.union(&other.factors).informative(),
        }
    }

    /// The factorization of `self` concatenated with itself `n` times.
    pub(crate) fn repeat(&self, n: u32) -> Factorization {
        let mut f = Factorization::literal("");
        for _ in 0..n {
            f = f.concatenate(self);
        }
        f
    }

    /// The factorization of `self` repeated between `min` and `max` times,
    /// inclusive.
    pub(crate) fn repeat_range(&self, min: u32, max: u32) -> Factorization {
        assert!(min <= max, "invalid repetition range {}..={}", min, max);
        let mut mandatory = self.repeat(min.min(REPEAT_UNROLL_LIMIT));
        if min > REPEAT_UNROLL_LIMIT {
            mandatory = mandatory.concatenate(&Factorization::unbounded());
        }
        if min == max {
            return mandatory;
        }
        let span = max - min;
        let optional = if span > REPEAT_UNROLL_LIMIT {
            Factorization::unbounded()
        } else {
            let mut optional = Factorization::literal("");
            for k in 1..=span {
                optional = optional.alternate(&self.repeat(k));
            }
            optional
        };
        mandatory.concatenate(&optional)
    }

    /// The exact set of strings matched, if small and known.
    pub fn all(&self) -> &Literals {
        &self.all
    }

    /// A set that every matched string begins with a member of.
    pub fn prefixes(&self) -> &Literals {
        &self.prefixes
    }

    /// A set that every matched string ends with a member of.
    pub fn suffixes(&self) -> &Literals {
        &self.suffixes
    }

    /// A set that every matched string contains a member of.
    pub fn factors(&self) -> &Literals {
        &self.factors
    }

    /// The longest literal string that every matched string begins with, if
    /// it is non-empty.
    pub fn common_prefix(&self) -> Option<String> {
        let set = self.prefixes.as_set()?;
        let mut it = set.iter();
        let mut prefix: Vec<char> = it.next()?.chars().collect();
        for s in it {
            let n = prefix
                .iter()
                .zip(s.chars())
                .take_while(|(a, b)| **a == *b)
                .count();
            prefix.truncate(n);
        }
        if prefix.is_empty() {
            None
        } else {
            Some(prefix.into_iter().collect())
        }
    }

    /// The longest literal string that every matched string ends with, if it
    /// is non-empty.
    pub fn common_suffix(&self) -> Option<String> {
        let set = self.suffixes.as_set()?;
        let mut it = set.iter();
        let mut suffix: Vec<char> = it.next()?.chars().rev().collect();
        for s in it {
            let n = suffix
                .iter()
                .zip(s.chars().rev())
                .take_while(|(a, b)| **a == *b)
                .count();
            suffix.truncate(n);
        }
        if suffix.is_empty() {
            None
        } else {
            Some(suffix.into_iter().rev().collect())
        }
    }
}
