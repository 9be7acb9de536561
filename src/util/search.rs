/*!
Types and routines that support the search APIs of this crate.

The central type is [`Input`], which bundles a haystack together with the
bounds of the region to search and whether the search is anchored. Bounds are
validated eagerly by [`Input::validate`] before any scanning starts, and an
invalid bound is reported as a [`MatchError`] instead of being clamped.
*/

use core::ops::Range;

/// The parameters of a regex search.
///
/// Offsets are byte offsets into the haystack and must fall on `char`
/// boundaries.
#[derive(Clone, Debug)]
pub struct Input<'h> {
    haystack: &'h str,
    start: usize,
    end: usize,
    anchored: bool,
}

impl<'h> Input<'h> {
    /// Create a new search configuration covering the entire haystack. The
    /// search is unanchored.
    #[inline]
    pub fn new(haystack: &'h str) -> Input<'h> {
        Input { haystack, start: 0, end: haystack.len(), anchored: false }
    }

    /// Set the region of the haystack to search. Matches are only reported
    /// when they lie entirely within `range`.
    ///
    /// The range is not validated here. An invalid range causes searches to
    /// return an error.
    #[inline]
    pub fn range(mut self, range: Range<usize>) -> Input<'h> {
        self.start = range.start;
        self.end = range.end;
        self
    }

    /// When enabled, a match must begin exactly at the start of the search
    /// region.
    #[inline]
    pub fn anchored(mut self, yes: bool) -> Input<'h> {
        self.anchored = yes;
        self
    }

    /// The haystack being searched.
    #[inline]
    pub fn haystack(&self) -> &'h str {
        self.haystack
    }

    /// The start of the search region.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end of the search region.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Whether the search is anchored.
    #[inline]
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Check that the search region is valid for the haystack.
    ///
    /// The region must satisfy `start <= end <= haystack.len()` and both
    /// bounds must fall on `char` boundaries.
    pub fn validate(&self) -> Result<(), MatchError> {
        let len = self.haystack.len();
        if self.start > self.end || self.end > len {
            return Err(MatchError::InvalidSpan {
                start: self.start,
                end: self.end,
                len,
            });
        }
        for &offset in &[self.start, self.end] {
            if !self.haystack.is_char_boundary(offset) {
                return Err(MatchError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }
}

/// A representation of a match reported by a regex.
///
/// A match records the start and end byte offsets of the match in the
/// haystack. Every match guarantees that `start <= end`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Match {
    start: usize,
    end: usize,
}

impl Match {
    /// Create a new match from a byte offset span.
    ///
    /// # Panics
    ///
    /// This panics if `end < start`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Match {
        assert!(start <= end);
        Match { start, end }
    }

    /// The starting position of the match.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The ending position of the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the match location as a range.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns true if and only if this match is empty. That is, when
    /// `start() == end()`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An error that occurred when a search was given invalid bounds.
///
/// Searching never fails otherwise: the absence of a match is reported as
/// `Ok(None)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchError {
    /// The search region is out of order or exceeds the haystack.
    InvalidSpan {
        /// The requested start offset.
        start: usize,
        /// The requested end offset.
        end: usize,
        /// The length of the haystack, in bytes.
        len: usize,
    },
    /// A bound of the search region splits a UTF-8 encoded character.
    NotCharBoundary {
        /// The offending offset.
        offset: usize,
    },
}

impl std::error::Error for MatchError {}

impl core::fmt::Display for MatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            MatchError::InvalidSpan { start, end, len } => write!(
                f,
                "invalid search span {}..{} for haystack of length {}",
                start, end, len,
            ),
            MatchError::NotCharBoundary { offset } => write!(
                f,
                "search bound {} is not on a character boundary",
                offset,
            ),
        }
    }
}

/// The search method used to find match boundaries.
///
/// Both methods report leftmost-longest matches: among all matches, the one
/// with the smallest start offset, and among those, the one with the largest
/// end offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchKind {
    /// Track every live DFA state at once, each tagged with the earliest
    /// start offset that could have produced it. This finds the match in a
    /// single forward pass.
    AllStates,
    /// For each candidate anchor, walk the forward DFA greedily to find the
    /// match end and then walk the reverse DFA backwards from that end to
    /// recover the start.
    ForwardReverse,
}

impl Default for SearchKind {
    fn default() -> SearchKind {
        SearchKind::ForwardReverse
    }
}
