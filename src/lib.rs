// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! A toolkit for converting between the three equivalent representations of
//! a regular language: a right-linear grammar, a regular expression, and a
//! finite-state automaton (`Fsm`).
//!
//! Grammar text is parsed by `parse_grammar` into a `Grammar` which, if valid,
//! carries an equivalent `Fsm`. Regular expression text is parsed by
//! `parse_expression` directly into a deterministic `Fsm` using a follow-set
//! construction over the expression's syntax tree.
//!
//! An `Fsm` supports determinization, epsilon elimination, minimization,
//! sentence generation and recognition, and conversion back to a `Grammar`.
//! The set operations in the `ops` module combine one or two automata into
//! a new one, optionally recording each intermediate automaton.
//!
//! The operations that change an `Fsm` in place (`determinate`, `minimize`,
//! `eliminate_epsilon_transitions`, `ensure_states_names_are_standard`) take
//! `&mut self`; clone first if the original is still needed.

#![deny(missing_docs)]

#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
#[macro_use]
extern crate proptest;

mod error;
mod memo;

pub mod expression;
pub mod fsm;
pub mod grammar;
pub mod ops;
pub mod symbol;

#[cfg(test)]
mod testutils;

pub use error::{Error, Result};
pub use expression::{parse_expression, ExpressionParser};
pub use fsm::{parse_max_length, Fsm, FsmBuilder, Transition, MAX_SENTENCE_LENGTH};
pub use grammar::{parse_grammar, Grammar, GrammarCache, GrammarParser, GrammarParts, Production};
pub use memo::Memo;
