// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::iter;

use super::{Fsm, Transition};
use symbol;

type Composed = BTreeSet<String>;

impl Fsm {
    /// Check if the automaton is deterministic.
    ///
    /// It is not if some state has two transitions on the same symbol, or if
    /// some state has an epsilon transition next to any other transition.
    pub fn is_deterministic(&self) -> bool {
        self.states.iter().all(|state| {
            let mut seen = HashSet::new();
            let mut epsilon = false;
            let mut count = 0;

            for t in self.transitions_from(state) {
                count += 1;
                epsilon |= t.is_epsilon();
                if !seen.insert(t.when) {
                    return false;
                }
            }

            !(epsilon && count > 1)
        })
    }

    /// Check if any transition reads the epsilon marker.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.iter().any(Transition::is_epsilon)
    }

    /// The states reachable from `state` through epsilon transitions alone,
    /// including `state` itself.
    pub fn epsilon_closure(&self, state: &str) -> BTreeSet<String> {
        let mut closure: BTreeSet<String> = iter::once(state.to_string()).collect();
        let mut stack = vec![state.to_string()];

        while let Some(current) = stack.pop() {
            for t in self.transitions_from(&current).filter(|t| t.is_epsilon()) {
                if closure.insert(t.to.clone()) {
                    stack.push(t.to.clone());
                }
            }
        }
        closure
    }

    /// Replace every epsilon transition with equivalent symbol transitions
    /// and drop the epsilon marker from the alphabet.
    ///
    /// Each state takes on the symbol transitions and the finality of every
    /// state in its epsilon closure. Epsilon cycles are harmless since the
    /// closures are computed before anything is removed.
    pub fn eliminate_epsilon_transitions(&mut self) {
        if self.has_epsilon_transitions() {
            let before = self.transitions.len();
            let closures: Vec<(String, BTreeSet<String>)> = self.states
                .iter()
                .map(|s| (s.clone(), self.epsilon_closure(s)))
                .collect();

            let mut added = Vec::new();
            let mut finals = Vec::new();
            for &(ref state, ref closure) in &closures {
                for member in closure.iter().filter(|&m| m != state) {
                    added.extend(
                        self.transitions_from(member)
                            .filter(|t| !t.is_epsilon())
                            .map(|t| Transition::new(state.as_str(), t.to.as_str(), t.when)),
                    );
                    if self.is_final(member) {
                        finals.push(state.clone());
                    }
                }
            }

            self.transitions.retain(|t| !t.is_epsilon());
            for t in added {
                self.add_transition(t.from, t.to, t.when);
            }
            for state in finals {
                self.add_final(state);
            }
            debug!(
                "eliminated epsilon transitions: {} transitions became {}",
                before,
                self.transitions.len()
            );
        }

        self.alphabet.retain(|&c| !symbol::is_epsilon(c));
    }

    /// Make the automaton deterministic by the subset construction.
    ///
    /// Epsilon transitions are eliminated first. An automaton that is
    /// already deterministic is left alone. Each state of the result stands
    /// for a set of original states and is named by the sorted
    /// concatenation of their names. Only the states reachable from the
    /// initial state survive.
    pub fn determinate(&mut self) {
        if self.has_epsilon_transitions() {
            self.eliminate_epsilon_transitions();
        }
        if self.is_deterministic() {
            return;
        }
        let initial = match self.initial.clone() {
            Some(initial) => initial,
            None => return,
        };

        let before = self.states.len();
        let symbols = self.symbols();
        let mut result = Fsm::new();
        for &c in &symbols {
            result.add_symbol(c);
        }

        let mut names: BTreeMap<Composed, String> = BTreeMap::new();
        let mut queue = VecDeque::new();
        let start: Composed = iter::once(initial).collect();
        let start_name = composed_name(&start, &names);
        result.add_state(start_name.clone());
        result.set_initial(start_name.clone());
        names.insert(start.clone(), start_name);
        queue.push_back(start);

        while let Some(composed) = queue.pop_front() {
            let name = names[&composed].clone();
            if composed.iter().any(|s| self.is_final(s)) {
                result.add_final(name.clone());
            }

            for &c in &symbols {
                let target: Composed = composed
                    .iter()
                    .flat_map(|s| self.destinations(s, c))
                    .map(String::from)
                    .collect();
                if target.is_empty() {
                    continue;
                }

                let target_name = match names.get(&target).cloned() {
                    Some(existing) => existing,
                    None => {
                        let fresh = composed_name(&target, &names);
                        trace!("composed state {} from {:?}", fresh, target);
                        result.add_state(fresh.clone());
                        names.insert(target.clone(), fresh.clone());
                        queue.push_back(target);
                        fresh
                    }
                };
                result.add_transition(name.as_str(), target_name, c);
            }
        }

        debug!(
            "determinized: {} states became {}",
            before,
            result.states.len()
        );
        *self = result;
    }
}

// The sorted concatenation of the member names, unless a different set
// already claimed that name.
fn composed_name(composed: &Composed, names: &BTreeMap<Composed, String>) -> String {
    let name: String = composed.iter().map(|s| s.as_str()).collect();
    if names.values().any(|n| *n == name) {
        let taken: Vec<&String> = names.values().collect();
        symbol::make_unique_state_name(&taken)
    } else {
        name
    }
}
