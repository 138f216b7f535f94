// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

// The automata and helpers in this module are used by the tests of more
// than one other module.

use proptest::prelude::*;

use fsm::Fsm;
use symbol::{standard_names, EPSILON};

/// Sentences with an even number of a's over {a}.
pub fn even_as() -> Fsm {
    Fsm::builder()
        .states(&["A", "B"])
        .transition("A", "B", 'a')
        .transition("B", "A", 'a')
        .initial("A")
        .final_state("A")
        .build()
}

/// Sentences with an even number of a's over {a, b}.
pub fn even_as_over_ab() -> Fsm {
    Fsm::builder()
        .states(&["A", "B"])
        .transition("A", "B", 'a')
        .transition("B", "A", 'a')
        .transition("A", "A", 'b')
        .transition("B", "B", 'b')
        .initial("A")
        .final_state("A")
        .build()
}

/// Sentences with an even number of b's over {a, b}.
pub fn even_bs_over_ab() -> Fsm {
    Fsm::builder()
        .states(&["C", "D"])
        .transition("C", "D", 'b')
        .transition("D", "C", 'b')
        .transition("C", "C", 'a')
        .transition("D", "D", 'a')
        .initial("C")
        .final_state("C")
        .build()
}

/// The non-deterministic automaton for (a|b)*ab.
pub fn ends_in_ab() -> Fsm {
    Fsm::builder()
        .states(&["A", "B", "C"])
        .transition("A", "A", 'a')
        .transition("A", "A", 'b')
        .transition("A", "B", 'a')
        .transition("B", "C", 'b')
        .initial("A")
        .final_state("C")
        .build()
}

/// a*b*c* written with epsilon transitions.
pub fn epsilon_chain() -> Fsm {
    Fsm::builder()
        .states(&["A", "B", "C"])
        .transition("A", "A", 'a')
        .transition("A", "B", EPSILON)
        .transition("B", "B", 'b')
        .transition("B", "C", EPSILON)
        .transition("C", "C", 'c')
        .initial("A")
        .final_state("C")
        .build()
}

/// Small, arbitrary automata over {a, b} that may use epsilon transitions.
pub fn arb_fsm() -> impl Strategy<Value = Fsm> {
    (1usize..5)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(
                    (0..n, 0..n, prop::sample::select(vec!['a', 'b', EPSILON])),
                    0..10,
                ),
                prop::collection::vec(any::<bool>(), n),
            )
        })
        .prop_map(|(n, transitions, finals)| {
            let names: Vec<String> = standard_names().take(n).collect();
            let mut fsm = Fsm::new();
            for name in &names {
                fsm.add_state(name.as_str());
            }
            fsm.add_symbol('a');
            fsm.add_symbol('b');
            fsm.set_initial(names[0].as_str());
            for (from, to, when) in transitions {
                fsm.add_transition(names[from].as_str(), names[to].as_str(), when);
            }
            for (name, is_final) in names.iter().zip(finals) {
                if is_final {
                    fsm.add_final(name.as_str());
                }
            }
            fsm
        })
}

/// Every sentence over the symbols of either automaton, up to `max_length`.
pub fn sentences_up_to(lhs: &Fsm, rhs: &Fsm, max_length: usize) -> Vec<String> {
    let mut symbols = lhs.symbols();
    symbols.extend(rhs.symbols());
    symbols.sort();
    symbols.dedup();

    let mut all = vec![String::new()];
    let mut current = vec![String::new()];
    for _ in 0..max_length {
        current = current
            .iter()
            .flat_map(|s| {
                symbols.iter().map(move |&c| {
                    let mut next = s.clone();
                    next.push(c);
                    next
                })
            })
            .collect();
        all.extend(current.iter().cloned());
    }
    all
}

/// Check that both automata agree on every sentence up to `max_length`.
pub fn same_language(lhs: &Fsm, rhs: &Fsm, max_length: usize) -> bool {
    sentences_up_to(lhs, rhs, max_length)
        .iter()
        .all(|s| lhs.recognize(s) == rhs.recognize(s))
}

pub fn assert_same_language(lhs: &Fsm, rhs: &Fsm, max_length: usize) {
    for sentence in sentences_up_to(lhs, rhs, max_length) {
        assert_eq!(
            lhs.recognize(&sentence),
            rhs.recognize(&sentence),
            "automata disagree on \"{}\"",
            sentence
        );
    }
}
