// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::collections::{BTreeMap, HashMap};

use super::{Grammar, GrammarParts, Production};
use error::{Error, Result};
use fsm::Fsm;

const START: char = 'S';

impl Fsm {
    /// Convert the automaton to an equivalent right-linear grammar.
    ///
    /// The conversion works on a copy without epsilon transitions and
    /// without unreachable or dead states. The initial state becomes `S`
    /// and the other states take the letters `A` to `Z` (skipping `S`) in
    /// state order, so at most 26 states can be converted.
    ///
    /// Each transition `p -a-> q` gives `P -> aQ` when `q` has somewhere to
    /// go, and `P -> a` when `q` is final. A final initial state gives
    /// `S -> &`.
    ///
    /// The automaton must pass `validate`.
    pub fn to_grammar(&self) -> Result<Grammar> {
        self.validate()?;

        let mut fsm = self.clone();
        fsm.eliminate_epsilon_transitions();
        fsm.remove_unreachable_states();
        fsm.remove_dead_states();

        let initial = fsm.initial().ok_or(Error::NoInitialState)?.to_string();
        if fsm.states().len() > 26 {
            return Err(Error::TooManyStates(fsm.states().len()));
        }

        let mut letters = (b'A'..=b'Z').map(|b| b as char).filter(|&c| c != START);
        let mut names = HashMap::new();
        names.insert(initial.as_str(), START);
        for state in fsm.states().iter().filter(|&s| *s != initial) {
            let letter = letters.next().ok_or(Error::TooManyStates(fsm.states().len()))?;
            names.insert(state.as_str(), letter);
        }

        let mut productions: BTreeMap<char, Vec<Production>> = BTreeMap::new();
        let mut non_terminals = vec![START];
        if fsm.is_final(&initial) {
            productions.insert(START, vec![Production::Epsilon]);
        }

        for t in fsm.transitions() {
            let left = names[t.from.as_str()];
            let right = names[t.to.as_str()];
            let alternatives = productions.entry(left).or_insert_with(Vec::new);

            let mut add = |p: Production| {
                if !alternatives.contains(&p) {
                    alternatives.push(p);
                }
            };
            if fsm.transitions_from(&t.to).next().is_some() {
                add(Production::Step(t.when, right));
                non_terminals.push(right);
            }
            if fsm.is_final(&t.to) {
                add(Production::Terminal(t.when));
            }
            non_terminals.push(left);
        }

        let mut rest: Vec<char> = non_terminals.into_iter().filter(|&n| n != START).collect();
        rest.sort();
        rest.dedup();

        let grammar = Grammar::new(GrammarParts {
            non_terminals: Some(START).into_iter().chain(rest).collect(),
            terminals: fsm.symbols(),
            productions,
            start: START,
        });
        debug!(
            "converted an automaton with {} states to a grammar with {} non-terminals",
            fsm.states().len(),
            grammar.non_terminals().len()
        );
        Ok(grammar)
    }
}
