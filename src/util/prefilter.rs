/*!
A literal prefilter for unanchored searches.

When every string matched by a pattern begins with the same non-empty
literal, an unanchored search only needs to try anchors at which that
literal occurs. A prefilter finds those anchors with a fast substring search,
skipping over stretches of the haystack that cannot contain a match.
*/

use memchr::memmem;

/// A prefilter that looks for a literal prefix of every match.
#[derive(Clone, Debug)]
pub(crate) struct Prefilter {
    finder: memmem::Finder<'static>,
}

impl Prefilter {
    /// Create a prefilter for the given literal. Returns `None` when the
    /// literal is empty, since it would report every position.
    pub(crate) fn new(prefix: &str) -> Option<Prefilter> {
        if prefix.is_empty() {
            return None;
        }
        debug!("prefilter built: memmem for {:?}", prefix);
        let finder = memmem::Finder::new(prefix.as_bytes()).into_owned();
        Some(Prefilter { finder })
    }

    /// Return the offset of the next occurrence of the literal that begins
    /// at or after `at` and ends at or before `end`.
    ///
    /// Since both the literal and the haystack are valid UTF-8, any offset
    /// returned falls on a `char` boundary.
    pub(crate) fn find(
        &self,
        haystack: &str,
        at: usize,
        end: usize,
    ) -> Option<usize> {
        self.finder.find(haystack[at..end].as_bytes()).map(|i| at + i)
    }
}
