// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use super::partition::Partition;
use super::Fsm;
use symbol;

impl Fsm {
    /// Check if the automaton is minimal.
    ///
    /// An automaton for the empty language is minimal when it has a single
    /// state. Otherwise a minimal automaton is deterministic, has no epsilon
    /// transitions, no unreachable and no dead states, and no two of its
    /// states are equivalent.
    pub fn is_minimal(&self) -> bool {
        if self.accepts_nothing() {
            return self.states.len() <= 1 && self.is_deterministic();
        }
        if self.has_epsilon_transitions() || !self.is_deterministic() {
            return false;
        }
        if self.reachable_states().len() != self.states.len()
            || self.live_states().len() != self.states.len()
        {
            return false;
        }

        let mut complete = self.clone();
        complete.complete();
        let mut partition = Partition::new(&complete);
        partition.refine(&complete);
        partition.len() == complete.states.len()
    }

    /// Minimize the automaton in place.
    ///
    /// The automaton is determinized, stripped of unreachable and dead
    /// states, completed with a sink, and reduced to its quotient under
    /// Moore partition refinement. The sink is then pruned again and the
    /// states are renamed to the standard sequence in breadth-first order.
    ///
    /// An automaton for the empty language becomes a single non-final state
    /// with a self-loop on every symbol.
    pub fn minimize(&mut self) {
        let before = self.states.len();
        if self.accepts_nothing() {
            self.collapse_to_empty_language();
            debug!("minimized an empty language: {} states became 1", before);
            return;
        }

        self.eliminate_epsilon_transitions();
        self.determinate();
        self.remove_unreachable_states();
        self.remove_dead_states();
        self.complete();

        let mut partition = Partition::new(self);
        let rounds = partition.refine(self);
        *self = partition.quotient(self);

        self.remove_unreachable_states();
        self.remove_dead_states();
        if self.accepts_nothing() {
            self.collapse_to_empty_language();
        } else {
            self.relabel();
        }

        debug!(
            "minimized in {} rounds: {} states became {}",
            rounds,
            before,
            self.states.len()
        );
    }

    fn collapse_to_empty_language(&mut self) {
        let symbols = self.symbols();
        let state = symbol::make_unique_state_name::<String>(&[]);

        *self = Fsm::new();
        self.add_state(state.as_str());
        self.set_initial(state.as_str());
        for c in symbols {
            self.add_transition(state.as_str(), state.as_str(), c);
        }
    }
}
