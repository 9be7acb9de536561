/*!
Partitioning of the alphabet into disjoint character ranges.

During determinization, the NFA states making up a single DFA state may have
outgoing transitions whose ranges overlap arbitrarily. A DFA state requires
disjoint ranges, so the overlapping ranges are split at every boundary
introduced by any of them. Every resulting sub-range maps each of its
characters to the exact same set of NFA states.
*/

use crate::util::{id::StateID, range::CharRange};

/// Compute the minimal disjoint covering of the given transitions.
///
/// Each input element is a range paired with the states it leads to. The
/// output is sorted by range start, its ranges are pairwise disjoint and
/// every character of an output range leads to precisely the (sorted,
/// deduplicated) set of states paired with it. Adjacent output ranges never
/// share an identical target set, since those are merged into one maximal
/// range. Characters not covered by any input range are absent from the
/// output.
///
/// Empty (epsilon) ranges in the input are ignored.
pub(crate) fn minimal_cover(
    transitions: &[(CharRange, &[StateID])],
) -> Vec<(CharRange, Vec<StateID>)> {
    let mut boundaries: Vec<u32> = Vec::with_capacity(2 * transitions.len());
    for &(range, _) in transitions {
        if range.is_empty() {
            continue;
        }
        boundaries.push(range.start());
        // This may be one past MAX_CHAR, which is fine since it is only
        // ever used as an exclusive bound.
        boundaries.push(range.end() + 1);
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut cover: Vec<(CharRange, Vec<StateID>)> = vec![];
    for w in boundaries.windows(2) {
        let sub = CharRange::new(w[0], w[1] - 1);
        let mut targets = vec![];
        for &(range, next) in transitions {
            if range.contains(sub.start()) {
                targets.extend_from_slice(next);
            }
        }
        if targets.is_empty() {
            continue;
        }
        targets.sort();
        targets.dedup();
        if let Some((last, last_targets)) = cover.last_mut() {
            if last.is_adjacent_to(&sub) && *last_targets == targets {
                *last = CharRange::new(last.start(), sub.end());
                continue;
            }
        }
        cover.push((sub, targets));
    }
    cover
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(id: usize) -> StateID {
        StateID::must(id)
    }

    fn r(a: char, b: char) -> CharRange {
        CharRange::chars(a, b)
    }

    #[test]
    fn overlapping_ranges_are_split() {
        let (s1, s2): (&[StateID], &[StateID]) = (&[sid(1)], &[sid(2)]);
        let got = minimal_cover(&[(r('a', 'm'), s1), (r('f', 'z'), s2)]);
        assert_eq!(
            vec![
                (r('a', 'e'), vec![sid(1)]),
                (r('f', 'm'), vec![sid(1), sid(2)]),
                (r('n', 'z'), vec![sid(2)]),
            ],
            got,
        );
    }

    #[test]
    fn adjacent_identical_targets_are_merged() {
        let s1: &[StateID] = &[sid(1)];
        let got = minimal_cover(&[
            (r('a', 'c'), s1),
            (r('d', 'f'), s1),
            (r('x', 'z'), s1),
        ]);
        assert_eq!(
            vec![(r('a', 'f'), vec![sid(1)]), (r('x', 'z'), vec![sid(1)])],
            got,
        );
    }

    #[test]
    fn nested_range_splits_outer() {
        let (s1, s2): (&[StateID], &[StateID]) = (&[sid(1)], &[sid(2)]);
        let got = minimal_cover(&[(r('a', 'z'), s1), (r('k', 'k'), s2)]);
        assert_eq!(
            vec![
                (r('a', 'j'), vec![sid(1)]),
                (r('k', 'k'), vec![sid(1), sid(2)]),
                (r('l', 'z'), vec![sid(1)]),
            ],
            got,
        );
    }

    #[test]
    fn epsilon_ranges_are_ignored() {
        let s1: &[StateID] = &[sid(1)];
        assert!(minimal_cover(&[(CharRange::empty(), s1)]).is_empty());
    }

    #[test]
    fn full_range_is_supported() {
        let s1: &[StateID] = &[sid(0)];
        let got = minimal_cover(&[(CharRange::full(), s1)]);
        assert_eq!(vec![(CharRange::full(), vec![sid(0)])], got);
    }
}
