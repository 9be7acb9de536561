use crate::{
    syntax::ast::Ast,
    util::range::{self, CharRange},
};

/// The Perl character classes, `\d`, `\w` and `\s`.
///
/// These are ASCII only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PerlClass {
    Digit,
    Word,
    Space,
}

impl PerlClass {
    pub(crate) fn ranges(&self) -> Vec<CharRange> {
        match *self {
            PerlClass::Digit => vec![CharRange::chars('0', '9')],
            PerlClass::Word => vec![
                CharRange::chars('0', '9'),
                CharRange::chars('A', 'Z'),
                CharRange::single('_'),
                CharRange::chars('a', 'z'),
            ],
            PerlClass::Space => vec![
                CharRange::chars('\t', '\r'),
                CharRange::single(' '),
            ],
        }
    }
}

/// A set of characters under construction, as written in a bracketed class
/// or implied by an escape such as `\D`.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClassSet {
    ranges: Vec<CharRange>,
}

impl ClassSet {
    pub(crate) fn new() -> ClassSet {
        ClassSet::default()
    }

    pub(crate) fn perl(class: PerlClass, negated: bool) -> ClassSet {
        let mut set = ClassSet::new();
        set.add_perl(class, negated);
        set
    }

    /// Every character except `\n`.
    pub(crate) fn dot() -> ClassSet {
        let mut set = ClassSet::new();
        set.push(CharRange::single('\n'));
        set.negate();
        set
    }

    pub(crate) fn push(&mut self, range: CharRange) {
        self.ranges.push(range);
    }

    /// Add every character of `other` to this set.
    pub(crate) fn union(&mut self, other: ClassSet) {
        self.ranges.extend(other.ranges);
    }

    pub(crate) fn add_perl(&mut self, class: PerlClass, negated: bool) {
        if negated {
            let ranges = range::complement(&class.ranges());
            self.ranges.extend(ranges);
        } else {
            self.ranges.extend(class.ranges());
        }
    }

    pub(crate) fn negate(&mut self) {
        let canon = range::canonicalize(core::mem::take(&mut self.ranges));
        self.ranges = range::complement(&canon);
    }

    /// Return the canonical ranges of this set: sorted, disjoint and
    /// non-adjacent.
    pub(crate) fn into_ranges(self) -> Vec<CharRange> {
        range::canonicalize(self.ranges)
    }

    /// Convert this set into a single range node when it is contiguous, or an
    /// alternation over its ranges otherwise. Returns `None` when
    /// the set is empty.
    pub(crate) fn into_ast(self) -> Option<Ast> {
        let ranges = self.into_ranges().into_iter().map(Ast::range);
        Ast::alternation_all(ranges.collect())
    }
}
