// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Operations that combine automata into a new automaton.
//!
//! Every operation leaves its operands untouched and returns a new `Fsm`
//! without epsilon transitions, unreachable states or dead states (except
//! an initial state for the empty language), with states renamed to the
//! standard sequence.
//!
//! Each operation has a `_with_steps` variant that returns every
//! intermediate automaton of the construction, in order. The last step is
//! always equal to the result of the plain variant.

use std::collections::{BTreeMap, VecDeque};

use fsm::Fsm;
use symbol::{make_unique_state_name, standard_names, EPSILON};

// where the intermediate automata of a construction go
trait Steps {
    fn record(&mut self, fsm: &Fsm);
}

impl Steps for () {
    fn record(&mut self, _: &Fsm) {}
}

impl Steps for Vec<Fsm> {
    fn record(&mut self, fsm: &Fsm) {
        trace!(
            "step {}: {} states, {} transitions",
            self.len() + 1,
            fsm.states().len(),
            fsm.transitions().len()
        );
        self.push(fsm.clone());
    }
}

fn with_steps<F>(build: F) -> Vec<Fsm>
where
    F: FnOnce(&mut Vec<Fsm>) -> Fsm,
{
    let mut steps = Vec::new();
    build(&mut steps);
    steps
}

/// The union of the languages of `lhs` and `rhs`.
///
/// A fresh initial state copies the moves out of both original initial
/// states, and is final if either of them is.
pub fn union(lhs: &Fsm, rhs: &Fsm) -> Fsm {
    build_union(lhs, rhs, &mut ())
}

/// `union`, returning every intermediate automaton.
pub fn union_with_steps(lhs: &Fsm, rhs: &Fsm) -> Vec<Fsm> {
    with_steps(|steps| build_union(lhs, rhs, steps))
}

/// The concatenation of the language of `lhs` with that of `rhs`.
///
/// Every final state of `lhs` copies the moves out of the initial state of
/// `rhs`. The finals of `rhs` are final; the finals of `lhs` stay final
/// only if `rhs` accepts the empty sentence.
pub fn concatenation(lhs: &Fsm, rhs: &Fsm) -> Fsm {
    build_concatenation(lhs, rhs, &mut ())
}

/// `concatenation`, returning every intermediate automaton.
pub fn concatenation_with_steps(lhs: &Fsm, rhs: &Fsm) -> Vec<Fsm> {
    with_steps(|steps| build_concatenation(lhs, rhs, steps))
}

/// The intersection of the languages of `lhs` and `rhs`, by the product
/// construction over the pairs of states reachable from the initial pair.
pub fn intersection(lhs: &Fsm, rhs: &Fsm) -> Fsm {
    build_intersection(lhs, rhs, &mut ())
}

/// `intersection`, returning every intermediate automaton.
pub fn intersection_with_steps(lhs: &Fsm, rhs: &Fsm) -> Vec<Fsm> {
    with_steps(|steps| build_intersection(lhs, rhs, steps))
}

/// The sentences of `lhs` that are not sentences of `rhs`: the
/// intersection of `lhs` with the negation of `rhs` over both alphabets.
pub fn difference(lhs: &Fsm, rhs: &Fsm) -> Fsm {
    build_difference(lhs, rhs, &mut ())
}

/// `difference`, returning every intermediate automaton.
pub fn difference_with_steps(lhs: &Fsm, rhs: &Fsm) -> Vec<Fsm> {
    with_steps(|steps| build_difference(lhs, rhs, steps))
}

/// The reverse of the language of `fsm`.
pub fn reverse(fsm: &Fsm) -> Fsm {
    build_reverse(fsm, &mut ())
}

/// `reverse`, returning every intermediate automaton.
pub fn reverse_with_steps(fsm: &Fsm) -> Vec<Fsm> {
    with_steps(|steps| build_reverse(fsm, steps))
}

/// The complement of the language of `fsm` over its own alphabet.
pub fn negation(fsm: &Fsm) -> Fsm {
    build_negation(fsm, &mut ())
}

/// `negation`, returning every intermediate automaton.
pub fn negation_with_steps(fsm: &Fsm) -> Vec<Fsm> {
    with_steps(|steps| build_negation(fsm, steps))
}

/// The Kleene closure (zero or more repetitions) of the language of `fsm`.
///
/// A fresh state, both initial and final, moves on epsilon to the old
/// initial state, and every old final state moves on epsilon back to it.
/// The epsilon transitions are then eliminated.
pub fn closure(fsm: &Fsm) -> Fsm {
    build_closure(fsm, &mut ())
}

/// `closure`, returning every intermediate automaton.
pub fn closure_with_steps(fsm: &Fsm) -> Vec<Fsm> {
    with_steps(|steps| build_closure(fsm, steps))
}

fn build_union<S: Steps>(lhs: &Fsm, rhs: &Fsm, steps: &mut S) -> Fsm {
    let lhs = operand(lhs, 0);
    let rhs = operand(rhs, lhs.states().len());

    let mut fsm = lhs.clone();
    steps.record(&fsm);
    absorb(&mut fsm, &rhs);
    steps.record(&fsm);

    let initial = make_unique_state_name(fsm.states());
    fsm.add_state(initial.as_str());
    for side in &[&lhs, &rhs] {
        if let Some(old) = side.initial() {
            for t in side.transitions_from(old) {
                fsm.add_transition(initial.as_str(), t.to.as_str(), t.when);
            }
            if side.is_final(old) {
                fsm.add_final(initial.as_str());
            }
        }
    }
    fsm.set_initial(initial);
    steps.record(&fsm);

    finish(fsm, steps, "union")
}

fn build_concatenation<S: Steps>(lhs: &Fsm, rhs: &Fsm, steps: &mut S) -> Fsm {
    let lhs = operand(lhs, 0);
    let rhs = operand(rhs, lhs.states().len());

    let mut fsm = lhs.clone();
    steps.record(&fsm);
    absorb(&mut fsm, &rhs);
    steps.record(&fsm);

    if let Some(old) = rhs.initial() {
        for last in lhs.finals() {
            for t in rhs.transitions_from(old) {
                fsm.add_transition(last.as_str(), t.to.as_str(), t.when);
            }
            if !rhs.is_final(old) {
                fsm.remove_final(last);
            }
        }
    }
    steps.record(&fsm);

    finish(fsm, steps, "concatenation")
}

fn build_intersection<S: Steps>(lhs: &Fsm, rhs: &Fsm, steps: &mut S) -> Fsm {
    let lhs = operand(lhs, 0);
    let rhs = operand(rhs, 0);

    let fsm = product(&lhs, &rhs);
    steps.record(&fsm);

    finish(fsm, steps, "intersection")
}

fn build_difference<S: Steps>(lhs: &Fsm, rhs: &Fsm, steps: &mut S) -> Fsm {
    let lhs = operand(lhs, 0);
    let mut symbols = lhs.symbols();
    symbols.extend(rhs.symbols());

    let negated = complement(rhs, &symbols, steps);
    let fsm = product(&lhs, &negated);
    steps.record(&fsm);

    finish(fsm, steps, "difference")
}

fn build_reverse<S: Steps>(fsm: &Fsm, steps: &mut S) -> Fsm {
    let original = operand(fsm, 0);

    let mut fsm = Fsm::new();
    for state in original.states() {
        fsm.add_state(state.as_str());
    }
    for &c in original.alphabet() {
        fsm.add_symbol(c);
    }
    for t in original.transitions() {
        fsm.add_transition(t.to.as_str(), t.from.as_str(), t.when);
    }
    steps.record(&fsm);

    let initial = make_unique_state_name(original.states());
    fsm.add_state(initial.as_str());
    for t in original.transitions() {
        if original.is_final(&t.to) {
            fsm.add_transition(initial.as_str(), t.from.as_str(), t.when);
        }
    }
    if let Some(old) = original.initial() {
        fsm.add_final(old);
        if original.is_final(old) {
            fsm.add_final(initial.as_str());
        }
    }
    fsm.set_initial(initial);
    steps.record(&fsm);

    finish(fsm, steps, "reverse")
}

fn build_negation<S: Steps>(fsm: &Fsm, steps: &mut S) -> Fsm {
    let negated = complement(fsm, &fsm.symbols(), steps);
    finish(negated, steps, "negation")
}

fn build_closure<S: Steps>(fsm: &Fsm, steps: &mut S) -> Fsm {
    let original = operand(fsm, 0);

    let mut fsm = original.clone();
    steps.record(&fsm);

    let initial = make_unique_state_name(fsm.states());
    fsm.add_state(initial.as_str());
    if let Some(old) = original.initial() {
        fsm.add_transition(initial.as_str(), old, EPSILON);
        for last in original.finals() {
            fsm.add_transition(last.as_str(), old, EPSILON);
        }
    }
    fsm.add_final(initial.as_str());
    fsm.set_initial(initial);
    steps.record(&fsm);

    fsm.eliminate_epsilon_transitions();
    steps.record(&fsm);

    finish(fsm, steps, "closure")
}

// An epsilon-free copy that has an initial state and only reachable states,
// named from the standard sequence starting at `first`.
fn operand(fsm: &Fsm, first: usize) -> Fsm {
    let mut fsm = fsm.clone();
    fsm.eliminate_epsilon_transitions();
    if fsm.initial().is_none() {
        let initial = make_unique_state_name(fsm.states());
        fsm.add_state(initial.as_str());
        fsm.set_initial(initial);
    }
    fsm.remove_unreachable_states();
    fsm.rename_in_order(standard_names().skip(first));
    fsm
}

// copy the states, symbols, transitions and finals of `other` into `fsm`
fn absorb(fsm: &mut Fsm, other: &Fsm) {
    for state in other.states() {
        fsm.add_state(state.as_str());
    }
    for &c in other.alphabet() {
        fsm.add_symbol(c);
    }
    for t in other.transitions() {
        fsm.add_transition(t.from.as_str(), t.to.as_str(), t.when);
    }
    for last in other.finals() {
        fsm.add_final(last.as_str());
    }
}

// A complete, deterministic automaton for the sentences over `symbols` that
// `fsm` rejects.
fn complement<S: Steps>(fsm: &Fsm, symbols: &[char], steps: &mut S) -> Fsm {
    let mut fsm = operand(fsm, 0);
    for &c in symbols {
        fsm.add_symbol(c);
    }
    fsm.determinate();
    steps.record(&fsm);

    fsm.complete();
    steps.record(&fsm);

    let flipped: Vec<String> = fsm.states()
        .iter()
        .filter(|s| !fsm.is_final(s))
        .cloned()
        .collect();
    for last in fsm.finals().to_vec() {
        fsm.remove_final(&last);
    }
    for state in flipped {
        fsm.add_final(state);
    }
    steps.record(&fsm);
    fsm
}

// The product of two epsilon-free automata with initial states, over the
// pairs reachable from the initial pair. Both sides move on every symbol.
fn product(lhs: &Fsm, rhs: &Fsm) -> Fsm {
    let mut fsm = Fsm::new();
    for c in lhs.symbols().into_iter().chain(rhs.symbols()) {
        fsm.add_symbol(c);
    }

    let mut names: BTreeMap<(String, String), String> = BTreeMap::new();
    let mut pending = VecDeque::new();
    let start = match (lhs.initial(), rhs.initial()) {
        (Some(l), Some(r)) => (l.to_string(), r.to_string()),
        _ => return fsm,
    };
    let initial = pair_name(&mut fsm, &mut names, &mut pending, lhs, rhs, start);
    fsm.set_initial(initial);

    let symbols = fsm.symbols();
    while let Some((l, r)) = pending.pop_front() {
        let from = names[&(l.clone(), r.clone())].clone();
        for &c in &symbols {
            for next_l in lhs.destinations(&l, c) {
                for next_r in rhs.destinations(&r, c) {
                    let pair = (next_l.to_string(), next_r.to_string());
                    let to = pair_name(&mut fsm, &mut names, &mut pending, lhs, rhs, pair);
                    fsm.add_transition(from.as_str(), to, c);
                }
            }
        }
    }

    trace!(
        "product of {} and {} states has {} states",
        lhs.states().len(),
        rhs.states().len(),
        fsm.states().len()
    );
    fsm
}

fn pair_name(
    fsm: &mut Fsm,
    names: &mut BTreeMap<(String, String), String>,
    pending: &mut VecDeque<(String, String)>,
    lhs: &Fsm,
    rhs: &Fsm,
    pair: (String, String),
) -> String {
    if let Some(name) = names.get(&pair) {
        return name.clone();
    }

    let name = make_unique_state_name(fsm.states());
    fsm.add_state(name.as_str());
    if lhs.is_final(&pair.0) && rhs.is_final(&pair.1) {
        fsm.add_final(name.as_str());
    }
    names.insert(pair.clone(), name.clone());
    pending.push_back(pair);
    name
}

fn finish<S: Steps>(mut fsm: Fsm, steps: &mut S, operation: &str) -> Fsm {
    fsm.remove_unreachable_states();
    fsm.remove_dead_states();
    fsm.relabel();
    steps.record(&fsm);

    debug!(
        "{} has {} states and {} transitions",
        operation,
        fsm.states().len(),
        fsm.transitions().len()
    );
    fsm
}

#[cfg(test)]
mod test {
    use super::*;
    use expression::parse_expression;
    use testutils::*;

    fn expression(text: &str) -> Fsm {
        parse_expression(text).unwrap()
    }

    #[test]
    fn union_accepts_either_language() {
        let sut = union(&expression("ab"), &expression("c*"));

        assert!(sut.recognize("ab"));
        assert!(sut.recognize(""));
        assert!(sut.recognize("ccc"));
        assert!(!sut.recognize("abc"));
        assert!(!sut.has_epsilon_transitions());
    }

    #[test]
    fn union_keeps_loops_through_old_initial() {
        let sut = union(&even_as(), &expression("b"));

        assert!(sut.recognize("aaaa"));
        assert!(sut.recognize("b"));
        assert!(!sut.recognize("aab"));
        assert!(!sut.recognize("aaa"));
    }

    #[test]
    fn concatenation_sequences_languages() {
        let sut = concatenation(&expression("a*"), &expression("bc"));

        assert_eq!(sut.generate(4).unwrap(), vec!["aabc", "abc", "bc"]);
    }

    #[test]
    fn concatenation_with_optional_suffix_keeps_first_finals() {
        let sut = concatenation(&expression("a"), &expression("b?"));

        assert_eq!(sut.generate(3).unwrap(), vec!["a", "ab"]);
    }

    #[test]
    fn intersection_of_parities() {
        let sut = intersection(&even_as_over_ab(), &even_bs_over_ab());

        for accepted in &["", "aa", "bb", "aabb", "abab", "ababaa"] {
            assert!(sut.recognize(accepted), "{} rejected", accepted);
        }
        for rejected in &["a", "b", "ab", "aab", "abb", "ababa"] {
            assert!(!sut.recognize(rejected), "{} accepted", rejected);
        }
        assert_eq!(sut.states().len(), 4);
    }

    #[test]
    fn intersection_of_disjoint_languages_is_empty() {
        let sut = intersection(&expression("a"), &expression("b"));

        assert!(sut.accepts_nothing());
        assert_eq!(sut.states().len(), 1);
    }

    #[test]
    fn intersection_needs_both_sides_to_move() {
        let sut = intersection(&expression("ab"), &expression("a"));

        assert!(!sut.recognize("ab"));
        assert!(!sut.recognize("a"));
        assert!(sut.accepts_nothing());
    }

    #[test]
    fn difference_removes_second_language() {
        let sut = difference(&even_as_over_ab(), &even_bs_over_ab());

        assert!(sut.recognize("aab"));
        assert!(sut.recognize("b"));
        assert!(!sut.recognize("aabb"));
        assert!(!sut.recognize("a"));
    }

    #[test]
    fn difference_uses_both_alphabets() {
        let sut = difference(&expression("(a|b)*"), &expression("a*"));

        assert!(sut.recognize("b"));
        assert!(sut.recognize("ab"));
        assert!(!sut.recognize("aaa"));
        assert!(!sut.recognize(""));
    }

    #[test]
    fn reverse_reads_backwards() {
        let sut = reverse(&ends_in_ab());

        assert!(sut.recognize("ba"));
        assert!(sut.recognize("baab"));
        assert!(!sut.recognize("ab"));
        assert!(!sut.recognize("b"));
    }

    #[test]
    fn reverse_keeps_empty_sentence() {
        let sut = reverse(&even_as());

        assert!(sut.recognize(""));
        assert!(sut.recognize("aa"));
        assert!(!sut.recognize("a"));
    }

    #[test]
    fn negation_flips_acceptance() {
        let sut = negation(&even_as());

        assert!(sut.recognize("a"));
        assert!(sut.recognize("aaa"));
        assert!(!sut.recognize(""));
        assert!(!sut.recognize("aa"));
        assert!(sut.is_deterministic());
    }

    #[test]
    fn negation_of_empty_language_accepts_everything() {
        let sut = negation(&Fsm::builder().state("A").symbol('a').initial("A").build());

        assert!(sut.recognize(""));
        assert!(sut.recognize("aaaa"));
    }

    #[test]
    fn closure_repeats_language() {
        let sut = closure(&expression("ab"));

        assert_eq!(sut.generate(4).unwrap(), vec!["", "ab", "abab"]);
        assert!(!sut.has_epsilon_transitions());
    }

    #[test]
    fn steps_end_with_the_result() {
        let lhs = even_as_over_ab();
        let rhs = even_bs_over_ab();

        let cases: Vec<(Fsm, Vec<Fsm>)> = vec![
            (union(&lhs, &rhs), union_with_steps(&lhs, &rhs)),
            (concatenation(&lhs, &rhs), concatenation_with_steps(&lhs, &rhs)),
            (intersection(&lhs, &rhs), intersection_with_steps(&lhs, &rhs)),
            (difference(&lhs, &rhs), difference_with_steps(&lhs, &rhs)),
            (reverse(&lhs), reverse_with_steps(&lhs)),
            (negation(&lhs), negation_with_steps(&lhs)),
            (closure(&lhs), closure_with_steps(&lhs)),
        ];

        for (result, steps) in cases {
            assert!(steps.len() > 1);
            assert_eq!(steps.last(), Some(&result));
        }
    }

    #[test]
    fn operands_are_untouched() {
        let lhs = epsilon_chain();
        let rhs = ends_in_ab();

        union(&lhs, &rhs);
        difference(&lhs, &rhs);

        assert_eq!(lhs, epsilon_chain());
        assert_eq!(rhs, ends_in_ab());
    }

    proptest! {
        #[test]
        fn prop_union_accepts_either(lhs in arb_fsm(), rhs in arb_fsm()) {
            let sut = union(&lhs, &rhs);

            for sentence in sentences_up_to(&lhs, &rhs, 4) {
                prop_assert_eq!(
                    sut.recognize(&sentence),
                    lhs.recognize(&sentence) || rhs.recognize(&sentence)
                );
            }
        }

        #[test]
        fn prop_intersection_and_difference(lhs in arb_fsm(), rhs in arb_fsm()) {
            let both = intersection(&lhs, &rhs);
            let only_lhs = difference(&lhs, &rhs);

            for sentence in sentences_up_to(&lhs, &rhs, 4) {
                let (l, r) = (lhs.recognize(&sentence), rhs.recognize(&sentence));
                prop_assert_eq!(both.recognize(&sentence), l && r);
                prop_assert_eq!(only_lhs.recognize(&sentence), l && !r);
            }
        }

        #[test]
        fn prop_concatenation_and_reverse(lhs in arb_fsm(), rhs in arb_fsm()) {
            let joined = concatenation(&lhs, &rhs);
            let reversed = reverse(&lhs);

            for sentence in sentences_up_to(&lhs, &rhs, 4) {
                let split = (0..=sentence.len())
                    .any(|i| lhs.recognize(&sentence[..i]) && rhs.recognize(&sentence[i..]));
                prop_assert_eq!(joined.recognize(&sentence), split);

                let backwards: String = sentence.chars().rev().collect();
                prop_assert_eq!(reversed.recognize(&sentence), lhs.recognize(&backwards));
            }
        }

        #[test]
        fn prop_closure_accepts_repetitions(fsm in arb_fsm()) {
            let sut = closure(&fsm);

            prop_assert!(sut.recognize(""));
            for sentence in sentences_up_to(&fsm, &fsm, 3) {
                if fsm.recognize(&sentence) {
                    let twice = format!("{}{}", sentence, sentence);
                    prop_assert!(sut.recognize(&sentence));
                    prop_assert!(sut.recognize(&twice));
                }
            }
        }
    }
}
