// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::collections::HashMap;

use super::Fsm;

/// A `Partition` of the states of a complete deterministic `Fsm` into blocks
/// of states that have not (yet) been told apart.
///
/// Refinement is Moore's: start from the finals and the non-finals and keep
/// splitting blocks until no block splits.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    blocks: Vec<Vec<String>>,
    block_of: HashMap<String, usize>,
}

// A Partition maintains the following invariants:
//
//  1.  Every state of the Fsm it was made from is in exactly one block, and
//      `block_of` maps each state to the index of that block.
//
//  2.  No block is empty.
//
//  3.  The first state of a block is its representative. A block only ever
//      loses the states whose signature differs from the representative's,
//      so the representative never moves.
impl Partition {
    /// Create the initial partition {finals, non-finals} of `fsm`.
    pub fn new(fsm: &Fsm) -> Partition {
        let (finals, others): (Vec<String>, Vec<String>) =
            fsm.states().iter().cloned().partition(|s| fsm.is_final(s));

        Partition::from_blocks(vec![finals, others])
    }

    fn from_blocks(blocks: Vec<Vec<String>>) -> Partition {
        let blocks: Vec<Vec<String>> = blocks.into_iter().filter(|b| !b.is_empty()).collect();
        let block_of = blocks
            .iter()
            .enumerate()
            .flat_map(|(i, block)| block.iter().map(move |s| (s.clone(), i)))
            .collect();

        Partition { blocks, block_of }
    }

    /// Refine until no block splits. Returns the number of rounds.
    pub fn refine(&mut self, fsm: &Fsm) -> usize {
        let symbols = fsm.symbols();
        let mut rounds = 0;

        loop {
            rounds += 1;
            let mut split = false;
            let mut blocks = Vec::with_capacity(self.blocks.len());

            for block in &self.blocks {
                let representative = self.signature(fsm, &block[0], &symbols);
                let (same, different): (Vec<String>, Vec<String>) = block
                    .iter()
                    .cloned()
                    .partition(|s| self.signature(fsm, s, &symbols) == representative);

                blocks.push(same);
                if !different.is_empty() {
                    split = true;
                    blocks.push(different);
                }
            }

            trace!("refinement round {}: {} blocks", rounds, blocks.len());
            *self = Partition::from_blocks(blocks);
            if !split {
                return rounds;
            }
        }
    }

    // the block reached on each symbol (None where the transition is missing)
    fn signature(&self, fsm: &Fsm, state: &str, symbols: &[char]) -> Vec<Option<usize>> {
        symbols
            .iter()
            .map(|&c| {
                fsm.destinations(state, c)
                    .first()
                    .and_then(|to| self.block_of.get(*to).cloned())
            })
            .collect()
    }

    /// The number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// The blocks, each led by its representative.
    pub fn blocks(&self) -> &[Vec<String>] {
        &self.blocks
    }

    /// Build the quotient automaton: one state per block, named after the
    /// block's representative.
    pub fn quotient(&self, fsm: &Fsm) -> Fsm {
        let representative = |state: &str| {
            self.block_of
                .get(state)
                .map(|&i| self.blocks[i][0].clone())
        };

        let mut result = Fsm::new();
        for &c in fsm.alphabet() {
            result.add_symbol(c);
        }
        for block in &self.blocks {
            result.add_state(block[0].as_str());
            if fsm.is_final(&block[0]) {
                result.add_final(block[0].as_str());
            }
            for t in fsm.transitions_from(&block[0]) {
                if let Some(to) = representative(&t.to) {
                    result.add_transition(block[0].as_str(), to, t.when);
                }
            }
        }
        if let Some(initial) = fsm.initial().and_then(|s| representative(s)) {
            result.set_initial(initial);
        }
        result
    }
}
