/*!
Inclusive ranges of Unicode scalar values.

A [`CharRange`] labels every non-epsilon transition in both NFAs and DFAs.
Ranges are expressed over `u32` character codes rather than `char` so that
range arithmetic (such as `end + 1` when splitting at boundaries) never needs
to step around the surrogate gap. Since a haystack is always a `&str`, no
surrogate code point is ever looked up, so including them in a range is
harmless.
*/

/// The largest character code that may appear in a range.
pub const MAX_CHAR: u32 = 0x10FFFF;

/// An inclusive range of character codes, `[start, end]`.
///
/// The special [empty](CharRange::empty) range never contains any character
/// and is used as the label of epsilon transitions in an NFA. A DFA never
/// contains an empty range.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct CharRange {
    start: u32,
    end: u32,
}

impl CharRange {
    /// Create a new range from the inclusive bounds given.
    ///
    /// # Panics
    ///
    /// This panics when `start > end` or when `end` exceeds [`MAX_CHAR`].
    pub fn new(start: u32, end: u32) -> CharRange {
        assert!(start <= end, "invalid range {}-{}", start, end);
        assert!(end <= MAX_CHAR, "range end {:X} exceeds MAX_CHAR", end);
        CharRange { start, end }
    }

    /// Create a range matching exactly one character.
    pub fn single(ch: char) -> CharRange {
        CharRange::new(u32::from(ch), u32::from(ch))
    }

    /// Create a range from two characters.
    pub fn chars(start: char, end: char) -> CharRange {
        CharRange::new(u32::from(start), u32::from(end))
    }

    /// The range covering every character.
    pub fn full() -> CharRange {
        CharRange::new(0, MAX_CHAR)
    }

    /// The empty range, used to label epsilon transitions.
    pub const fn empty() -> CharRange {
        CharRange { start: 1, end: 0 }
    }

    /// Returns true if and only if this is the empty (epsilon) range.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// The inclusive lower bound.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// The inclusive upper bound.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// The number of character codes in this range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    /// Returns true if and only if the given character code is in this range.
    #[inline]
    pub fn contains(&self, c: u32) -> bool {
        self.start <= c && c <= self.end
    }

    /// Returns true if and only if this range and the one given share at
    /// least one character.
    pub fn overlaps(&self, other: &CharRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start <= other.end
            && other.start <= self.end
    }

    /// Returns true if and only if `other` begins right after this range ends.
    pub fn is_adjacent_to(&self, other: &CharRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.end + 1 == other.start
    }

    /// Iterate over every character in this range, skipping surrogates.
    pub fn iter(&self) -> impl Iterator<Item = char> {
        let (start, end) = (self.start, self.end);
        (start..=end).filter_map(core::char::from_u32)
    }
}

/// Sort and merge the given ranges such that the result is sorted by start,
/// pairwise disjoint and no two ranges are adjacent.
pub(crate) fn canonicalize(mut ranges: Vec<CharRange>) -> Vec<CharRange> {
    ranges.retain(|r| !r.is_empty());
    ranges.sort();
    let mut merged: Vec<CharRange> = Vec::with_capacity(ranges.len());
    for r in ranges {
        if let Some(last) = merged.last_mut() {
            if r.start <= last.end.saturating_add(1) {
                last.end = core::cmp::max(last.end, r.end);
                continue;
            }
        }
        merged.push(r);
    }
    merged
}

/// Return the complement of the given canonical ranges over
/// `[0, MAX_CHAR]`.
pub(crate) fn complement(ranges: &[CharRange]) -> Vec<CharRange> {
    let mut out = vec![];
    let mut next = 0u32;
    for r in ranges {
        if r.start > next {
            out.push(CharRange::new(next, r.start - 1));
        }
        if r.end == MAX_CHAR {
            return out;
        }
        next = r.end + 1;
    }
    out.push(CharRange::new(next, MAX_CHAR));
    out
}

impl core::fmt::Debug for CharRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            return write!(f, "ε");
        }
        if self.start == self.end {
            write!(f, "{}", DebugChar(self.start))
        } else {
            write!(f, "{}-{}", DebugChar(self.start), DebugChar(self.end))
        }
    }
}

/// Formats a character code for debug output, escaping anything that is not
/// printable ASCII.
pub(crate) struct DebugChar(pub(crate) u32);

impl core::fmt::Display for DebugChar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::char::from_u32(self.0) {
            Some(c) if c.is_ascii_graphic() || c == ' ' => write!(f, "{}", c),
            _ => write!(f, "\\x{{{:X}}}", self.0),
        }
    }
}
