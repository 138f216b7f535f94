// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::tree::{Position, Tree};
use fsm::Fsm;
use symbol::make_unique_state_name;

type Composition = BTreeSet<Position>;

struct Builder<'a> {
    tree: &'a Tree,
    fsm: Fsm,
    names: BTreeMap<Composition, String>,
    pending: VecDeque<Composition>,
}

/// Build a deterministic `Fsm` from the syntax tree.
///
/// Each state stands for a composition: the set of positions the
/// expression can be in. The initial composition is what can come first
/// in the root. Reading a symbol from a composition moves to the union of
/// what follows each leaf of that symbol. A composition holding `End` is
/// final.
pub fn build_fsm(tree: &Tree) -> Fsm {
    let mut builder = Builder {
        tree,
        fsm: Fsm::new(),
        names: BTreeMap::new(),
        pending: VecDeque::new(),
    };

    let mut symbols: Vec<char> = tree.leaves().map(|i| tree.node(i).symbol).collect();
    symbols.sort();
    symbols.dedup();
    for symbol in symbols {
        builder.fsm.add_symbol(symbol);
    }

    let initial = builder.intern(tree.collect_nodes_going_down(tree.root()));
    builder.fsm.set_initial(initial);

    while let Some(composition) = builder.pending.pop_front() {
        builder.expand(&composition);
    }

    debug!(
        "built an automaton with {} states and {} transitions from an expression",
        builder.fsm.states().len(),
        builder.fsm.transitions().len()
    );
    builder.fsm
}

impl<'a> Builder<'a> {
    fn intern(&mut self, composition: Composition) -> String {
        if let Some(name) = self.names.get(&composition) {
            return name.clone();
        }

        let name = make_unique_state_name(self.fsm.states());
        trace!("state {} is the composition {:?}", name, composition);
        self.fsm.add_state(name.as_str());
        if composition.contains(&Position::End) {
            self.fsm.add_final(name.as_str());
        }
        self.names.insert(composition.clone(), name.clone());
        self.pending.push_back(composition);
        name
    }

    fn expand(&mut self, composition: &Composition) {
        let from = match self.names.get(composition) {
            Some(name) => name.clone(),
            None => return,
        };

        let mut moves: BTreeMap<char, Composition> = BTreeMap::new();
        for position in composition {
            if let Position::Leaf(leaf) = *position {
                moves
                    .entry(self.tree.node(leaf).symbol)
                    .or_insert_with(BTreeSet::new)
                    .extend(self.tree.collect_nodes_going_up(leaf));
            }
        }

        for (symbol, next) in moves {
            let to = self.intern(next);
            self.fsm.add_transition(from.as_str(), to, symbol);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use expression::parser::{explicit_concatenation, normalize, to_postfix};

    fn build(text: &str) -> Fsm {
        let postfix = to_postfix(&explicit_concatenation(&normalize(text)).unwrap());
        build_fsm(&Tree::from_postfix(&postfix).unwrap())
    }

    #[test]
    fn single_symbol_has_two_states() {
        let sut = build("a");

        assert_eq!(sut.states(), &["A", "B"]);
        assert_eq!(sut.initial(), Some("A"));
        assert_eq!(sut.finals(), &["B"]);
        assert_eq!(sut.alphabet(), &['a']);
    }

    #[test]
    fn result_is_deterministic() {
        let sut = build("(a|b)*abb");

        assert!(sut.is_deterministic());
        assert!(sut.recognize("abb"));
        assert!(sut.recognize("babaabb"));
        assert!(!sut.recognize("abba"));
    }

    #[test]
    fn epsilon_only_expression_accepts_empty_sentence() {
        let sut = build("&");

        assert_eq!(sut.states().len(), 1);
        assert!(sut.recognize(""));
        assert!(sut.alphabet().is_empty());
    }

    #[test]
    fn repeated_compositions_are_not_expanded_twice() {
        let sut = build("a*");

        assert_eq!(sut.states(), &["A"]);
        assert_eq!(sut.transitions().len(), 1);
    }
}
