use std::collections::HashMap;

use crate::{
    dfa::sparse::DFA,
    util::{id::StateID, range::CharRange},
};

/// A minimizer for a sparse DFA.
///
/// This implements Moore's partition refinement. States start out split into
/// two blocks: accepting and non-accepting. On each round, two states of the
/// same block stay together only if they send every character to the same
/// block. Rounds repeat until no block splits, at which point each block
/// becomes one state of the minimal DFA.
///
/// A state's outgoing behavior is compared as its transitions rewritten in
/// terms of blocks, with adjacent ranges leading to the same block merged.
/// This way, two states whose transitions split the alphabet at different
/// points but agree on every character are still found equivalent.
///
/// Only states reachable from the start state take part. The result has one
/// state per block, numbered in the breadth first order of the input, so the
/// start state of the result is always the first state.
#[derive(Debug)]
pub(crate) struct Minimizer<'a> {
    dfa: &'a DFA,
    /// Every reachable state, in breadth first order from the start state.
    order: Vec<StateID>,
}

/// The transitions of a state, rewritten in terms of blocks.
type Signature = Vec<(CharRange, usize)>;

impl<'a> Minimizer<'a> {
    pub(crate) fn new(dfa: &'a DFA) -> Minimizer<'a> {
        let order = dfa.states().iter().map(|s| s.id()).collect();
        Minimizer { dfa, order }
    }

    pub(crate) fn run(self) -> DFA {
        let (mut blocks, mut count) = self.initial_partition();
        loop {
            let (next, next_count) = self.refine(&blocks);
            // Refinement only ever splits blocks, so an unchanged count
            // means an unchanged partition.
            if next_count == count {
                break;
            }
            blocks = next;
            count = next_count;
        }
        let min = self.build(&blocks, count);
        debug!(
            "minimized DFA from {} states to {} states",
            self.dfa.len(),
            min.len(),
        );
        min
    }

    /// Split states into accepting and non-accepting blocks. Block
    /// identifiers are assigned in order of first appearance, so an empty
    /// block never gets one.
    fn initial_partition(&self) -> (Vec<usize>, usize) {
        let mut blocks = vec![usize::MAX; self.dfa.len()];
        let mut ids: [Option<usize>; 2] = [None, None];
        let mut count = 0;
        for &id in self.order.iter() {
            let slot = &mut ids[self.dfa.is_accepting(id) as usize];
            let block = *slot.get_or_insert_with(|| {
                count += 1;
                count - 1
            });
            blocks[id] = block;
        }
        (blocks, count)
    }

    /// Compute the next partition from the current one. Two states end up in
    /// the same new block if and only if they share a block and a signature.
    fn refine(&self, blocks: &[usize]) -> (Vec<usize>, usize) {
        let mut next = vec![usize::MAX; self.dfa.len()];
        let mut ids: HashMap<(usize, Signature), usize> = HashMap::new();
        for &id in self.order.iter() {
            let key = (blocks[id], self.signature(id, blocks));
            let fresh = ids.len();
            next[id] = *ids.entry(key).or_insert(fresh);
        }
        let count = ids.len();
        (next, count)
    }

    fn signature(&self, id: StateID, blocks: &[usize]) -> Signature {
        let mut sig: Signature = vec![];
        for &(range, target) in self.dfa.transitions(id) {
            let block = blocks[target];
            if let Some(last) = sig.last_mut() {
                if last.1 == block && last.0.is_adjacent_to(&range) {
                    last.0 = CharRange::new(last.0.start(), range.end());
                    continue;
                }
            }
            sig.push((range, block));
        }
        sig
    }

    /// Build the minimal DFA, using the first state of each block (in
    /// breadth first order) as its representative.
    fn build(&self, blocks: &[usize], count: usize) -> DFA {
        let mut reps: Vec<Option<StateID>> = vec![None; count];
        for &id in self.order.iter() {
            reps[blocks[id]].get_or_insert(id);
        }

        let mut min = DFA::empty();
        for rep in reps.iter().flatten() {
            min.add_state(self.dfa.is_accepting(*rep))
                .expect("minimal DFA is never bigger than its input");
        }
        for (block, rep) in reps.iter().enumerate() {
            let rep = match *rep {
                Some(rep) => rep,
                None => continue,
            };
            let from = StateID::must(block);
            for (range, target) in self.signature(rep, blocks) {
                min.add_transition(from, range, StateID::must(target));
            }
        }
        min.set_start(StateID::must(blocks[self.dfa.start()]));
        min
    }
}
