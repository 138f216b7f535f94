// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::result;

/// The error type for parsing grammars and expressions and for the
/// operations on an `Fsm` that validate their input.
///
/// A grammar that parses but breaks the rules of a right-linear grammar
/// is not an error; see `Grammar::is_valid`.
#[derive(Debug, Fail, Clone, PartialEq, Eq)]
pub enum Error {
    /// The grammar text had no production rules.
    #[fail(display = "The grammar has no production rules.")]
    EmptyGrammar,

    /// A line of the grammar text is not a well formed production rule.
    ///
    /// `line` is the 1-based line number in the original text.
    #[fail(display = "Invalid production rule on line {}: \"{}\".", line, text)]
    InvalidProduction {
        /// The 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// The regular expression was empty after removing whitespace.
    #[fail(display = "The regular expression is empty.")]
    EmptyExpression,

    /// The regular expression contains a symbol that is not a terminal,
    /// an operator, or a parenthesis.
    #[fail(display = "Invalid symbol '{}' at position {} of the regular expression.", symbol,
           position)]
    InvalidSymbol {
        /// The offending symbol.
        symbol: char,
        /// The 0-based position in the expression without whitespace.
        position: usize,
    },

    /// The parentheses of the regular expression do not balance.
    #[fail(display = "The regular expression has unbalanced parentheses.")]
    UnbalancedParentheses,

    /// An operator of the regular expression has nothing to apply to.
    #[fail(display = "The operator '{}' is missing an operand.", _0)]
    MissingOperand(char),

    /// A sentence length outside of `1..=100` (or not an integer at all).
    #[fail(display = "Invalid sentence length: {} (expected an integer from 1 to 100).", _0)]
    InvalidLength(String),

    /// The automaton has no initial state.
    #[fail(display = "The automaton has no initial state.")]
    NoInitialState,

    /// The automaton refers to a state that it does not declare.
    #[fail(display = "The automaton refers to the undeclared state \"{}\".", _0)]
    UndeclaredState(String),

    /// The automaton uses a symbol that is missing from its alphabet or that
    /// is not a terminal.
    #[fail(display = "The automaton uses the undeclared symbol '{}'.", _0)]
    UndeclaredSymbol(char),

    /// The automaton has more states than a grammar has non-terminals.
    #[fail(display = "The automaton has {} useful states but a grammar allows at most 26.", _0)]
    TooManyStates(usize),
}

/// A specialized Result type for grammar, expression and automaton operations.
pub type Result<T> = result::Result<T, Error>;
