// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The finite-state automaton and its queries and transformations.
//!
//! An `Fsm` is a plain snapshot: a list of state names, an alphabet, a list
//! of `Transition`s, an optional initial state, and a list of final states.
//! It derives `Serialize` and `Deserialize` so that it can round-trip through
//! whatever format a surrounding application chooses. A deserialized (or
//! hand-built) `Fsm` should be checked with `validate` before it is queried.
//!
//! The transformations (`determinate`, `eliminate_epsilon_transitions`,
//! `minimize`, `ensure_states_names_are_standard`) mutate the receiver.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use error::{Error, Result};
use symbol::{self, EPSILON};

pub use self::builder::FsmBuilder;
pub use self::sentences::{parse_max_length, MAX_SENTENCE_LENGTH};

mod builder;
mod determinism;
mod minimize;
mod partition;
mod sentences;

/// A single transition of an `Fsm`: reading `when` in state `from` moves to
/// state `to`. A `when` of `symbol::EPSILON` moves without reading anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transition {
    /// The source state.
    pub from: String,
    /// The destination state.
    pub to: String,
    /// The symbol read.
    pub when: char,
}

impl Transition {
    /// Create a new `Transition`.
    pub fn new<F: Into<String>, T: Into<String>>(from: F, to: T, when: char) -> Transition {
        Transition {
            from: from.into(),
            to: to.into(),
            when,
        }
    }

    /// Check if this is an epsilon transition.
    pub fn is_epsilon(&self) -> bool {
        symbol::is_epsilon(self.when)
    }
}

/// A finite-state automaton.
///
/// States keep their insertion order, which only matters for the order of
/// generated output. Transitions behave as a set: adding a duplicate is a
/// no-op.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fsm {
    states: Vec<String>,
    alphabet: Vec<char>,
    transitions: Vec<Transition>,
    initial: Option<String>,
    finals: Vec<String>,
}

impl Fsm {
    /// Create an empty `Fsm` with no states and no initial state.
    pub fn new() -> Fsm {
        Fsm::default()
    }

    /// Create an `FsmBuilder` for literal construction.
    pub fn builder() -> FsmBuilder {
        FsmBuilder::new()
    }

    /// The declared states in insertion order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// The alphabet, possibly including `symbol::EPSILON`.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// The transitions.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The initial state, if one is set.
    pub fn initial(&self) -> Option<&str> {
        self.initial.as_ref().map(|s| s.as_str())
    }

    /// The final (accepting) states.
    pub fn finals(&self) -> &[String] {
        &self.finals
    }

    /// Check if `state` is declared.
    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Check if `state` is final.
    pub fn is_final(&self, state: &str) -> bool {
        self.finals.iter().any(|s| s == state)
    }

    /// Declare a state. Returns false if it was already declared.
    pub fn add_state<S: Into<String>>(&mut self, state: S) -> bool {
        let state = state.into();
        if self.has_state(&state) {
            false
        } else {
            self.states.push(state);
            true
        }
    }

    /// Add `symbol` to the alphabet if it is not already there.
    pub fn add_symbol(&mut self, symbol: char) {
        if !self.alphabet.contains(&symbol) {
            self.alphabet.push(symbol);
        }
    }

    /// Add a transition, adding its symbol to the alphabet. Returns false if
    /// the transition was already present.
    ///
    /// The states need not be declared yet, but the `Fsm` must declare them
    /// before it is queried.
    pub fn add_transition<F, T>(&mut self, from: F, to: T, when: char) -> bool
    where
        F: Into<String>,
        T: Into<String>,
    {
        let transition = Transition::new(from, to, when);
        self.add_symbol(when);
        if self.transitions.contains(&transition) {
            false
        } else {
            self.transitions.push(transition);
            true
        }
    }

    /// Remove a transition. Returns false if it was not present.
    pub fn remove_transition(&mut self, transition: &Transition) -> bool {
        let before = self.transitions.len();
        self.transitions.retain(|t| t != transition);
        before != self.transitions.len()
    }

    /// Set the initial state.
    pub fn set_initial<S: Into<String>>(&mut self, state: S) {
        self.initial = Some(state.into());
    }

    /// Mark `state` as final.
    pub fn add_final<S: Into<String>>(&mut self, state: S) {
        let state = state.into();
        if !self.is_final(&state) {
            self.finals.push(state);
        }
    }

    /// Mark `state` as not final.
    pub fn remove_final(&mut self, state: &str) {
        self.finals.retain(|s| s != state);
    }

    /// Check that the `Fsm` is sealed: it has a declared initial state, its
    /// finals and transition endpoints are declared states, and every
    /// transition symbol is a terminal (or epsilon) in the alphabet.
    pub fn validate(&self) -> Result<()> {
        let initial = self.initial().ok_or(Error::NoInitialState)?;
        let declared = |s: &str| {
            if self.has_state(s) {
                Ok(())
            } else {
                Err(Error::UndeclaredState(s.to_string()))
            }
        };

        declared(initial)?;
        for state in &self.finals {
            declared(state)?;
        }
        for t in &self.transitions {
            declared(&t.from)?;
            declared(&t.to)?;
            if !self.alphabet.contains(&t.when) {
                return Err(Error::UndeclaredSymbol(t.when));
            }
        }
        match self.alphabet
            .iter()
            .find(|&&c| !symbol::is_terminal(c) && !symbol::is_epsilon(c))
        {
            Some(&c) => Err(Error::UndeclaredSymbol(c)),
            None => Ok(()),
        }
    }

    /// The alphabet without `symbol::EPSILON`, sorted.
    pub fn symbols(&self) -> Vec<char> {
        let mut symbols: Vec<char> = self.alphabet
            .iter()
            .cloned()
            .filter(|&c| !symbol::is_epsilon(c))
            .collect();
        symbols.sort();
        symbols
    }

    /// Iterate over the transitions leaving `state`.
    pub fn transitions_from<'a, 'b>(&'a self, state: &'b str) -> impl Iterator<Item = &'a Transition> + 'b
    where
        'a: 'b,
    {
        self.transitions.iter().filter(move |t| t.from == state)
    }

    /// The distinct destinations of `state` on `symbol`, in transition order.
    pub fn destinations(&self, state: &str, symbol: char) -> Vec<&str> {
        let mut destinations: Vec<&str> = Vec::new();
        for t in self.transitions_from(state).filter(|t| t.when == symbol) {
            if !destinations.contains(&t.to.as_str()) {
                destinations.push(&t.to);
            }
        }
        destinations
    }

    /// The states reachable from the initial state (including itself).
    pub fn reachable_states(&self) -> BTreeSet<String> {
        let mut reached = BTreeSet::new();
        let mut queue: VecDeque<&str> = self.initial().into_iter().collect();

        while let Some(state) = queue.pop_front() {
            if reached.insert(state.to_string()) {
                queue.extend(self.transitions_from(state).map(|t| t.to.as_str()));
            }
        }
        reached
    }

    /// The live states: those from which some final state is reachable.
    pub fn live_states(&self) -> BTreeSet<String> {
        let mut live: BTreeSet<String> = self.finals.iter().cloned().collect();
        let mut changed = true;

        while changed {
            changed = false;
            for t in &self.transitions {
                if live.contains(&t.to) && !live.contains(&t.from) {
                    live.insert(t.from.clone());
                    changed = true;
                }
            }
        }
        live
    }

    /// Check if the automaton accepts no sentence at all.
    pub fn accepts_nothing(&self) -> bool {
        let live = self.live_states();
        !self.reachable_states().iter().any(|s| live.contains(s))
    }

    /// Remove states (and every transition touching them). Removing the
    /// initial state unsets it.
    pub fn remove_states(&mut self, doomed: &BTreeSet<String>) {
        if doomed.is_empty() {
            return;
        }
        self.states.retain(|s| !doomed.contains(s));
        self.finals.retain(|s| !doomed.contains(s));
        self.transitions
            .retain(|t| !doomed.contains(&t.from) && !doomed.contains(&t.to));
        if self.initial.as_ref().map_or(false, |s| doomed.contains(s)) {
            self.initial = None;
        }
    }

    /// Remove the states that are not reachable from the initial state.
    pub fn remove_unreachable_states(&mut self) {
        let reachable = self.reachable_states();
        let doomed = self.states
            .iter()
            .filter(|s| !reachable.contains(*s))
            .cloned()
            .collect();
        self.remove_states(&doomed);
    }

    /// Remove the dead states: those from which no final state is reachable.
    ///
    /// The initial state is kept even when dead so that the automaton stays
    /// usable.
    pub fn remove_dead_states(&mut self) {
        let live = self.live_states();
        let initial = self.initial.clone();
        let doomed = self.states
            .iter()
            .filter(|s| !live.contains(*s) && Some(*s) != initial.as_ref())
            .cloned()
            .collect();
        self.remove_states(&doomed);
    }

    /// Check if some state can reach itself through one or more transitions.
    pub fn has_cycle(&self) -> bool {
        let mut done = HashSet::new();
        self.states.iter().any(|state| {
            let mut path = HashSet::new();
            self.cycle_search(state, &mut path, &mut done)
        })
    }

    /// Check if a cycle is reachable from `state`.
    pub fn has_cycle_from(&self, state: &str) -> bool {
        let mut path = HashSet::new();
        let mut done = HashSet::new();
        self.cycle_search(state, &mut path, &mut done)
    }

    // depth first search where `path` is the recursion stack and `done` holds
    // states whose descendants are known to be acyclic
    fn cycle_search<'a>(
        &'a self,
        state: &'a str,
        path: &mut HashSet<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> bool {
        if path.contains(state) {
            return true;
        }
        if done.contains(state) {
            return false;
        }

        path.insert(state);
        let found = self.transitions_from(state)
            .any(|t| self.cycle_search(&t.to, path, done));
        path.remove(state);
        done.insert(state);
        found
    }

    /// Check if some state lacks a transition for some (non-epsilon) symbol
    /// of the alphabet.
    pub fn has_indefinition(&self) -> bool {
        let symbols = self.symbols();
        self.states.iter().any(|state| {
            symbols
                .iter()
                .any(|&c| !self.transitions_from(state).any(|t| t.when == c))
        })
    }

    /// Complete the transition function with a fresh, non-final sink state.
    ///
    /// Returns the sink's name, or `None` if there was no indefinition.
    pub fn complete(&mut self) -> Option<String> {
        if !self.has_indefinition() {
            return None;
        }

        let sink = symbol::make_unique_state_name(&self.states);
        self.add_state(sink.clone());
        let symbols = self.symbols();
        let states = self.states.clone();
        for state in &states {
            for &c in &symbols {
                if !self.transitions_from(state).any(|t| t.when == c) {
                    self.add_transition(state.as_str(), sink.as_str(), c);
                }
            }
        }
        Some(sink)
    }

    /// Rename every state whose name is not in the standard sequence,
    /// keeping all references intact, then sort the states and the finals
    /// in the canonical order.
    pub fn ensure_states_names_are_standard(&mut self) {
        let mut taken: Vec<String> = self.states
            .iter()
            .filter(|s| symbol::is_standard_name(s))
            .cloned()
            .collect();
        let mut renames = HashMap::new();

        for state in &self.states {
            if !symbol::is_standard_name(state) {
                let name = symbol::make_unique_state_name(&taken);
                taken.push(name.clone());
                renames.insert(state.clone(), name);
            }
        }

        self.rename_states(&renames);
        self.states.sort_by(|l, r| symbol::state_name_order(l, r));
        self.finals.sort_by(|l, r| symbol::state_name_order(l, r));
    }

    /// Rename every state to the standard sequence in breadth-first order
    /// from the initial state, so that structurally equal automata get equal
    /// names.
    pub(crate) fn relabel(&mut self) {
        let mut order: Vec<String> = Vec::new();
        let mut queue: VecDeque<String> = self.initial.iter().cloned().collect();

        while let Some(state) = queue.pop_front() {
            if order.contains(&state) {
                continue;
            }
            let mut next: Vec<&Transition> = self.transitions_from(&state).collect();
            next.sort_by(|l, r| (l.when, &l.to).cmp(&(r.when, &r.to)));
            queue.extend(next.into_iter().map(|t| t.to.clone()));
            order.push(state);
        }
        for state in &self.states {
            if !order.contains(state) {
                order.push(state.clone());
            }
        }

        let renames: HashMap<String, String> = order
            .into_iter()
            .zip(symbol::standard_names())
            .collect();
        self.rename_states(&renames);
        self.sort();
    }

    /// Sort states, finals and transitions in the canonical order.
    pub(crate) fn sort(&mut self) {
        self.states.sort_by(|l, r| symbol::state_name_order(l, r));
        self.finals.sort_by(|l, r| symbol::state_name_order(l, r));
        self.alphabet.sort();
        self.transitions.sort_by(|l, r| {
            symbol::state_name_order(&l.from, &r.from)
                .then(l.when.cmp(&r.when))
                .then(symbol::state_name_order(&l.to, &r.to))
        });
    }

    /// Rename the states, in their current order, to the names given.
    pub(crate) fn rename_in_order<I: IntoIterator<Item = String>>(&mut self, names: I) {
        let renames: HashMap<String, String> = self.states.iter().cloned().zip(names).collect();
        self.rename_states(&renames);
    }

    // apply the renames simultaneously; names missing from `renames` stay.
    // `renames` must be injective.
    fn rename_states(&mut self, renames: &HashMap<String, String>) {
        fn rename(name: &mut String, renames: &HashMap<String, String>) {
            if let Some(new) = renames.get(name) {
                *name = new.clone();
            }
        }

        for state in self.states.iter_mut().chain(self.finals.iter_mut()) {
            rename(state, renames);
        }
        if let Some(ref mut initial) = self.initial {
            rename(initial, renames);
        }
        for t in &mut self.transitions {
            rename(&mut t.from, renames);
            rename(&mut t.to, renames);
        }
    }

    /// Check that two deterministic automata are equal up to state names, by
    /// comparing relabeled copies.
    pub fn is_isomorphic_to(&self, other: &Fsm) -> bool {
        let mut lhs = self.clone();
        let mut rhs = other.clone();
        lhs.relabel();
        rhs.relabel();
        lhs == rhs
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use testutils::*;

    #[test]
    fn duplicate_transitions_collapse() {
        let mut sut = Fsm::new();

        assert!(sut.add_transition("A", "B", 'a'));
        assert!(!sut.add_transition("A", "B", 'a'));

        assert_eq!(sut.transitions().len(), 1);
        assert_eq!(sut.alphabet(), &['a']);
    }

    #[test]
    fn clone_is_independent() {
        let original = even_as();
        let mut copy = original.clone();

        copy.add_transition("A", "A", 'b');

        assert_ne!(copy.transitions().len(), original.transitions().len());
    }

    #[test]
    fn validate_rejects_missing_initial() {
        let mut sut = Fsm::new();
        sut.add_state("A");

        assert_matches!(sut.validate(), Err(Error::NoInitialState));
    }

    #[test]
    fn validate_rejects_undeclared_transition_endpoint() {
        let mut sut = Fsm::new();
        sut.add_state("A");
        sut.set_initial("A");
        sut.add_transition("A", "B", 'a');

        assert_matches!(sut.validate(), Err(Error::UndeclaredState(ref s)) if s == "B");
    }

    #[test]
    fn validate_rejects_non_terminal_symbol() {
        let mut sut = Fsm::new();
        sut.add_state("A");
        sut.set_initial("A");
        sut.add_transition("A", "A", 'X');

        assert_matches!(sut.validate(), Err(Error::UndeclaredSymbol('X')));
    }

    #[test]
    fn validate_accepts_sealed_fsm() {
        assert_matches!(even_as().validate(), Ok(()));
    }

    #[test]
    fn reachable_and_live_states() {
        let sut = Fsm::builder()
            .states(&["A", "B", "C", "D"])
            .transition("A", "B", 'a')
            .transition("A", "C", 'b')
            .transition("D", "B", 'a')
            .initial("A")
            .final_state("B")
            .build();

        let reachable: Vec<_> = sut.reachable_states().into_iter().collect();
        let live: Vec<_> = sut.live_states().into_iter().collect();

        assert_eq!(reachable, vec!["A", "B", "C"]);
        assert_eq!(live, vec!["A", "B", "D"]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let sut = Fsm::builder()
            .states(&["A"])
            .transition("A", "A", 'a')
            .initial("A")
            .build();

        assert!(sut.has_cycle());
    }

    #[test]
    fn multi_hop_cycle_is_found() {
        let sut = Fsm::builder()
            .states(&["A", "B", "C"])
            .transition("A", "B", 'a')
            .transition("B", "C", 'a')
            .transition("C", "B", 'b')
            .initial("A")
            .build();

        assert!(sut.has_cycle());
        assert!(sut.has_cycle_from("A"));
        assert!(sut.has_cycle_from("C"));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let sut = Fsm::builder()
            .states(&["A", "B", "C", "D"])
            .transition("A", "B", 'a')
            .transition("A", "C", 'b')
            .transition("B", "D", 'a')
            .transition("C", "D", 'a')
            .initial("A")
            .final_state("D")
            .build();

        assert!(!sut.has_cycle());
    }

    #[test]
    fn cycle_not_reachable_from_state() {
        let sut = Fsm::builder()
            .states(&["A", "B", "C"])
            .transition("A", "B", 'a')
            .transition("C", "C", 'a')
            .initial("A")
            .build();

        assert!(sut.has_cycle());
        assert!(!sut.has_cycle_from("A"));
    }

    #[test]
    fn indefinition_is_detected_and_completed() {
        let mut sut = Fsm::builder()
            .states(&["A", "B"])
            .transition("A", "B", 'a')
            .transition("B", "B", 'b')
            .initial("A")
            .final_state("B")
            .build();

        assert!(sut.has_indefinition());
        let sink = sut.complete();

        assert_eq!(sink, Some("C".to_string()));
        assert!(!sut.has_indefinition());
        assert!(!sut.is_final("C"));
        assert_eq!(sut.destinations("A", 'b'), vec!["C"]);
    }

    #[test]
    fn complete_fsm_has_no_indefinition() {
        let mut sut = even_as();

        assert!(!sut.has_indefinition());
        assert_eq!(sut.complete(), None);
    }

    #[test]
    fn standard_names_replace_odd_names() {
        let mut sut = Fsm::builder()
            .states(&["start", "B", "end"])
            .transition("start", "B", 'a')
            .transition("B", "end", 'b')
            .initial("start")
            .final_state("end")
            .build();

        sut.ensure_states_names_are_standard();

        assert_eq!(sut.states(), &["A", "B", "C"]);
        assert_eq!(sut.initial(), Some("A"));
        assert_eq!(sut.finals(), &["C"]);
        assert!(sut.transitions().contains(&Transition::new("A", "B", 'a')));
        assert!(sut.transitions().contains(&Transition::new("B", "C", 'b')));
    }

    #[test]
    fn remove_dead_states_keeps_initial() {
        let mut sut = Fsm::builder()
            .states(&["A", "B"])
            .transition("A", "B", 'a')
            .initial("A")
            .build();

        sut.remove_dead_states();

        assert_eq!(sut.states(), &["A"]);
        assert!(sut.transitions().is_empty());
        assert!(sut.accepts_nothing());
    }

    #[test]
    fn isomorphic_automata_differ_only_in_names() {
        let other = Fsm::builder()
            .states(&["X0", "X1"])
            .transition("X0", "X1", 'a')
            .transition("X1", "X0", 'a')
            .initial("X0")
            .final_state("X0")
            .build();

        assert!(even_as().is_isomorphic_to(&other));
    }
}
