// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::iter;

use super::Fsm;
use error::{Error, Result};
use symbol;

/// The longest sentence that `Fsm::generate` will enumerate.
pub const MAX_SENTENCE_LENGTH: usize = 100;

/// Parse a sentence length for `Fsm::generate` from text.
///
/// The text must be an integer from 1 to `MAX_SENTENCE_LENGTH` (surrounding
/// whitespace is ignored).
pub fn parse_max_length(text: &str) -> Result<usize> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| Error::InvalidLength(text.to_string()))
        .and_then(check_length)
}

fn check_length(length: usize) -> Result<usize> {
    if length < 1 || length > MAX_SENTENCE_LENGTH {
        Err(Error::InvalidLength(length.to_string()))
    } else {
        Ok(length)
    }
}

impl Fsm {
    /// Enumerate every accepted sentence of at most `max_length` symbols.
    ///
    /// The result is sorted and free of duplicates. The empty sentence is
    /// included when the initial state accepts. `max_length` must be from 1
    /// to `MAX_SENTENCE_LENGTH`.
    pub fn generate(&self, max_length: usize) -> Result<Vec<String>> {
        let max_length = check_length(max_length)?;

        let mut fsm = self.clone();
        fsm.eliminate_epsilon_transitions();
        let initial = match fsm.initial() {
            Some(initial) => initial.to_string(),
            None => return Ok(Vec::new()),
        };
        let live = fsm.live_states();

        // each prefix maps to the set of states it can reach
        let mut sentences = BTreeSet::new();
        let mut frontier: BTreeMap<String, BTreeSet<String>> =
            iter::once((String::new(), iter::once(initial).collect())).collect();

        for length in 0..(max_length + 1) {
            let mut next: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

            for (prefix, states) in &frontier {
                if states.iter().any(|s| fsm.is_final(s)) {
                    sentences.insert(prefix.clone());
                }
                if length == max_length {
                    continue;
                }

                for state in states {
                    for t in fsm.transitions_from(state).filter(|t| live.contains(&t.to)) {
                        let mut sentence = prefix.clone();
                        sentence.push(t.when);
                        next.entry(sentence)
                            .or_insert_with(BTreeSet::new)
                            .insert(t.to.clone());
                    }
                }
            }

            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        debug!(
            "generated {} sentences of at most {} symbols",
            sentences.len(),
            max_length
        );
        Ok(sentences.into_iter().collect())
    }

    /// Check if the automaton accepts `sentence`.
    ///
    /// Every applicable transition is tried and the sentence is accepted if
    /// any branch accepts. A sentence with a symbol outside the alphabet is
    /// rejected. Each `(state, position)` pair is explored at most once, so
    /// epsilon loops terminate and ambiguous automata stay polynomial.
    pub fn recognize(&self, sentence: &str) -> bool {
        let input: Vec<char> = sentence.chars().collect();
        if input
            .iter()
            .any(|&c| symbol::is_epsilon(c) || !self.alphabet.contains(&c))
        {
            return false;
        }

        match self.initial() {
            Some(initial) => self.accepts_from(initial, &input),
            None => false,
        }
    }

    // depth first search over (state, position) with an explicit stack
    fn accepts_from<'a>(&'a self, initial: &'a str, input: &[char]) -> bool {
        let mut visited: HashSet<(&'a str, usize)> = HashSet::new();
        let mut stack = vec![(initial, 0)];

        while let Some((state, position)) = stack.pop() {
            if !visited.insert((state, position)) {
                continue;
            }
            if position == input.len() && self.is_final(state) {
                return true;
            }

            for t in self.transitions_from(state) {
                if t.is_epsilon() {
                    stack.push((t.to.as_str(), position));
                } else if input.get(position) == Some(&t.when) {
                    stack.push((t.to.as_str(), position + 1));
                }
            }
        }
        false
    }
}
