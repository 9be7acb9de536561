/*!
The two boundary search methods used by [`Regex`](crate::dfa::regex::Regex).

Both methods report leftmost-longest matches and agree on every input. They
differ in how they get there:

* [`find_all_states`] makes a single forward pass with the forward DFA,
  tracking every state that is live from *some* start offset.
* [`find_fwd_rev`] tries one anchor at a time. From each anchor, it walks the
  forward DFA greedily to find the end of the longest match and then walks the
  reverse DFA backwards from that end to recover the start.

Callers must validate the [`Input`] before searching. Every routine here
assumes that its bounds are in order and fall on `char` boundaries.
*/

use crate::{
    dfa::sparse::DFA,
    util::{
        id::StateID,
        prefilter::Prefilter,
        search::{Input, Match},
    },
};

/// Find the leftmost-longest match by tracking every live DFA state at once.
///
/// Each live state is tagged with the earliest start offset from which it
/// was reached. Reaching the same state from a later start can never lead to
/// a better match, so such duplicates are dropped. Once a match is known,
/// no new start offsets are seeded and every hypothesis starting after the
/// match is discarded, so the scan stops as soon as no hypothesis could
/// still extend or beat it.
pub(crate) fn find_all_states(
    dfa: &DFA,
    pre: Option<&Prefilter>,
    input: &Input<'_>,
) -> Option<Match> {
    let (haystack, end) = (input.haystack(), input.end());
    let anchored = input.is_anchored();
    let mut live = LiveStates::new(dfa.len());
    let mut next = LiveStates::new(dfa.len());
    let mut best: Option<Match> = None;
    let mut at = input.start();
    loop {
        if best.is_none() && (!anchored || at == input.start()) {
            if live.is_empty() && !anchored {
                if let Some(pre) = pre {
                    at = pre.find(haystack, at, end)?;
                }
            }
            live.insert(dfa.start(), at);
        }
        for &(id, start) in live.iter() {
            if !dfa.is_accepting(id) {
                continue;
            }
            if best.map_or(true, |m| start <= m.start()) {
                best = Some(Match::new(start, at));
            }
        }
        if let Some(m) = best {
            live.retain(|start| start <= m.start());
        }
        if at >= end || (live.is_empty() && (best.is_some() || anchored)) {
            break;
        }

        let ch = match haystack[at..].chars().next() {
            Some(ch) => ch,
            None => break,
        };
        next.clear();
        for &(id, start) in live.iter() {
            if let Some(to) = dfa.next_state(id, ch) {
                next.insert(to, start);
            }
        }
        core::mem::swap(&mut live, &mut next);
        at += ch.len_utf8();
    }
    best
}

/// Find the leftmost-longest match by trying each anchor in turn with the
/// forward DFA and recovering the start with the reverse DFA.
pub(crate) fn find_fwd_rev(
    forward: &DFA,
    reverse: &DFA,
    pre: Option<&Prefilter>,
    input: &Input<'_>,
) -> Option<Match> {
    let (haystack, end) = (input.haystack(), input.end());
    let mut anchor = input.start();
    loop {
        if !input.is_anchored() {
            if let Some(pre) = pre {
                anchor = pre.find(haystack, anchor, end)?;
            }
        }
        let fwd = find_longest_fwd(forward, haystack, anchor, end);
        if let Some(match_end) = fwd {
            let rev = find_start_rev(reverse, haystack, anchor, match_end);
            if let Some(start) = rev {
                return Some(Match::new(start, match_end));
            }
        }
        if input.is_anchored() {
            return None;
        }
        anchor += haystack[anchor..end].chars().next()?.len_utf8();
    }
}

/// Walk the forward DFA from `at` and return the end of the longest match
/// beginning at `at` and ending at or before `end`.
fn find_longest_fwd(
    dfa: &DFA,
    haystack: &str,
    at: usize,
    end: usize,
) -> Option<usize> {
    let mut state = dfa.start();
    let mut last_match = None;
    if dfa.is_accepting(state) {
        last_match = Some(at);
    }
    for (i, ch) in haystack[at..end].char_indices() {
        state = match dfa.next_state(state, ch) {
            Some(state) => state,
            None => break,
        };
        if dfa.is_accepting(state) {
            last_match = Some(at + i + ch.len_utf8());
        }
    }
    last_match
}

/// Walk the reverse DFA backwards from `end` and return the smallest offset
/// no less than `start` at which it accepts.
fn find_start_rev(
    dfa: &DFA,
    haystack: &str,
    start: usize,
    end: usize,
) -> Option<usize> {
    let mut state = dfa.start();
    let mut last_match = None;
    if dfa.is_accepting(state) {
        last_match = Some(end);
    }
    for (i, ch) in haystack[start..end].char_indices().rev() {
        state = match dfa.next_state(state, ch) {
            Some(state) => state,
            None => break,
        };
        if dfa.is_accepting(state) {
            last_match = Some(start + i);
        }
    }
    last_match
}

/// The live states of a search, each tagged with the earliest start offset
/// that reached it.
#[derive(Clone, Debug)]
struct LiveStates {
    /// Live states in the order they were first reached.
    states: Vec<(StateID, usize)>,
    /// For every DFA state, its position in `states` if it is live.
    index: Vec<Option<usize>>,
}

impl LiveStates {
    fn new(capacity: usize) -> LiveStates {
        LiveStates { states: vec![], index: vec![None; capacity] }
    }

    fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn iter(&self) -> core::slice::Iter<'_, (StateID, usize)> {
        self.states.iter()
    }

    /// Mark `id` as live from `start`, keeping the earlier start if it was
    /// already live.
    fn insert(&mut self, id: StateID, start: usize) {
        match self.index[id] {
            Some(i) => {
                let slot = &mut self.states[i].1;
                *slot = core::cmp::min(*slot, start);
            }
            None => {
                self.index[id] = Some(self.states.len());
                self.states.push((id, start));
            }
        }
    }

    /// Keep only the states whose start offset satisfies the predicate.
    fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let LiveStates { ref mut states, ref mut index } = *self;
        states.retain(|&(id, start)| {
            let yes = keep(start);
            if !yes {
                index[id] = None;
            }
            yes
        });
        for (i, &(id, _)) in states.iter().enumerate() {
            index[id] = Some(i);
        }
    }

    fn clear(&mut self) {
        for &(id, _) in self.states.iter() {
            self.index[id] = None;
        }
        self.states.clear();
    }
}
