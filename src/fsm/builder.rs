// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use super::Fsm;

/// A builder for writing an `Fsm` out literally.
///
/// ```
/// use regula::Fsm;
///
/// let fsm = Fsm::builder()
///     .states(&["A", "B"])
///     .transition("A", "B", 'a')
///     .transition("B", "A", 'a')
///     .initial("A")
///     .final_state("A")
///     .build();
///
/// assert!(fsm.recognize("aa"));
/// ```
#[derive(Debug, Default)]
pub struct FsmBuilder(Fsm);

impl FsmBuilder {
    /// Create a builder for an empty `Fsm`.
    pub fn new() -> Self {
        FsmBuilder(Fsm::new())
    }

    /// Declare a state.
    pub fn state<S: Into<String>>(mut self, state: S) -> Self {
        self.0.add_state(state);
        self
    }

    /// Declare several states.
    pub fn states<S: AsRef<str>>(mut self, states: &[S]) -> Self {
        for state in states {
            self.0.add_state(state.as_ref());
        }
        self
    }

    /// Add a symbol to the alphabet even if no transition reads it.
    pub fn symbol(mut self, symbol: char) -> Self {
        self.0.add_symbol(symbol);
        self
    }

    /// Add a transition.
    pub fn transition<F, T>(mut self, from: F, to: T, when: char) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.0.add_transition(from, to, when);
        self
    }

    /// Set the initial state.
    pub fn initial<S: Into<String>>(mut self, state: S) -> Self {
        self.0.set_initial(state);
        self
    }

    /// Mark a state final.
    pub fn final_state<S: Into<String>>(mut self, state: S) -> Self {
        self.0.add_final(state);
        self
    }

    /// Mark several states final.
    pub fn finals<S: AsRef<str>>(mut self, states: &[S]) -> Self {
        for state in states {
            self.0.add_final(state.as_ref());
        }
        self
    }

    /// Finish building.
    pub fn build(self) -> Fsm {
        self.0
    }
}
