// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Right-linear grammars.
//!
//! A grammar is the 4-tuple `(Vn, Vt, P, S)` held by `GrammarParts`. A
//! `Grammar` checks its parts when it is created; if they form a valid
//! right-linear grammar it also carries the equivalent `Fsm`. An invalid
//! grammar is not an error: `is_valid` is false and `fsm` is `None`.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use itertools::Itertools;

use error::Result;
use fsm::Fsm;
use memo::Memo;
use symbol::{self, ACCEPT, EPSILON};

pub use self::parser::{parse_parts, GrammarParser};

mod convert;
mod parser;

/// A single right-hand side of a production rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Production {
    /// A terminal that ends the derivation: `X -> a`.
    Terminal(char),
    /// A terminal followed by a non-terminal: `X -> aY`.
    Step(char, char),
    /// The empty string: `S -> &`. Only the start symbol may have it.
    Epsilon,
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Production::Terminal(t) => write!(f, "{}", t),
            Production::Step(t, n) => write!(f, "{}{}", t, n),
            Production::Epsilon => write!(f, "{}", EPSILON),
        }
    }
}

/// The plain parts of a grammar: `Vn`, `Vt`, `P` and `S`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarParts {
    /// `Vn`: the non-terminals, start symbol first.
    pub non_terminals: Vec<char>,
    /// `Vt`: the terminals.
    pub terminals: Vec<char>,
    /// `P`: the alternatives of each non-terminal.
    pub productions: BTreeMap<char, Vec<Production>>,
    /// `S`: the start symbol.
    pub start: char,
}

/// A single-slot cache for `Grammar::from_text_cached`.
pub type GrammarCache = Memo<Grammar>;

/// A right-linear grammar and, when it is valid, its equivalent `Fsm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    parts: GrammarParts,
    fsm: Option<Fsm>,
}

impl Grammar {
    /// Create a `Grammar` from its parts, checking them and building the
    /// equivalent `Fsm` if they are valid.
    pub fn new(parts: GrammarParts) -> Grammar {
        let fsm = if is_valid(&parts) {
            Some(build_fsm(&parts))
        } else {
            None
        };

        Grammar { parts, fsm }
    }

    /// Parse grammar text into a `Grammar`.
    ///
    /// Malformed text is an error. Well formed text that breaks a rule of
    /// right-linear grammars gives an invalid `Grammar`.
    pub fn from_text(text: &str) -> Result<Grammar> {
        parse_parts(text).map(Grammar::new)
    }

    /// `from_text` that skips the work when `text` is the same as the last
    /// text given to `cache`.
    pub fn from_text_cached(text: &str, cache: &mut GrammarCache) -> Result<Grammar> {
        cache.get_or_try_insert_with(text, Grammar::from_text)
    }

    /// Check if the grammar is a valid right-linear grammar.
    pub fn is_valid(&self) -> bool {
        self.fsm.is_some()
    }

    /// The equivalent automaton, if the grammar is valid.
    pub fn fsm(&self) -> Option<&Fsm> {
        self.fsm.as_ref()
    }

    /// Take the equivalent automaton, if the grammar is valid.
    pub fn into_fsm(self) -> Option<Fsm> {
        self.fsm
    }

    /// The parts of the grammar.
    pub fn parts(&self) -> &GrammarParts {
        &self.parts
    }

    /// `Vn`, start symbol first.
    pub fn non_terminals(&self) -> &[char] {
        &self.parts.non_terminals
    }

    /// `Vt`.
    pub fn terminals(&self) -> &[char] {
        &self.parts.terminals
    }

    /// The alternatives of `non_terminal` (empty if it has none).
    pub fn productions_of(&self, non_terminal: char) -> &[Production] {
        self.parts
            .productions
            .get(&non_terminal)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    /// `S`.
    pub fn start(&self) -> char {
        self.parts.start
    }
}

impl Display for Grammar {
    /// Writes one rule per line, in the order of `Vn`, skipping symbols
    /// without alternatives. The output parses back to an equal grammar.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rules = self.parts
            .non_terminals
            .iter()
            .filter(|n| !self.productions_of(**n).is_empty())
            .map(|&n| format!("{} -> {}", n, self.productions_of(n).iter().join(" | ")));

        write!(f, "{}", rules.format("\n"))
    }
}

fn is_valid(parts: &GrammarParts) -> bool {
    let declared_non_terminal =
        |n: char| n != ACCEPT && parts.non_terminals.contains(&n) && symbol::is_non_terminal(n);
    let declared_terminal = |t: char| parts.terminals.contains(&t) && symbol::is_terminal(t);

    if !declared_non_terminal(parts.start) {
        debug!("invalid grammar: start symbol {} is not declared", parts.start);
        return false;
    }
    if !parts.non_terminals.iter().all(|&n| declared_non_terminal(n))
        || !parts.terminals.iter().all(|&t| declared_terminal(t))
    {
        debug!("invalid grammar: Vn or Vt holds a symbol of the wrong class");
        return false;
    }

    parts.productions.iter().all(|(&left, alternatives)| {
        let valid = declared_non_terminal(left)
            && alternatives.iter().all(|p| match *p {
                Production::Terminal(t) => declared_terminal(t),
                Production::Step(t, n) => declared_terminal(t) && declared_non_terminal(n),
                Production::Epsilon => left == parts.start,
            });
        if !valid {
            debug!("invalid grammar: bad production for {}", left);
        }
        valid
    })
}

fn build_fsm(parts: &GrammarParts) -> Fsm {
    let accept = ACCEPT.to_string();
    let mut fsm = Fsm::new();

    for &n in &parts.non_terminals {
        fsm.add_state(n.to_string());
    }
    fsm.add_state(accept.as_str());
    for &t in &parts.terminals {
        fsm.add_symbol(t);
    }
    fsm.set_initial(parts.start.to_string());
    fsm.add_final(accept.as_str());

    for (&left, alternatives) in &parts.productions {
        for production in alternatives {
            match *production {
                Production::Terminal(t) => {
                    fsm.add_transition(left.to_string(), accept.as_str(), t);
                }
                Production::Step(t, n) => {
                    fsm.add_transition(left.to_string(), n.to_string(), t);
                }
                Production::Epsilon => fsm.add_final(left.to_string()),
            }
        }
    }

    debug!(
        "built an automaton with {} states from a grammar",
        fsm.states().len()
    );
    fsm
}

/// Parse grammar text into a `Grammar`.
pub fn parse_grammar(text: &str) -> Result<Grammar> {
    Grammar::from_text(text)
}
