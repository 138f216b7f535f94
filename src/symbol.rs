// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The symbol classes shared by grammars, expressions and automata.
//!
//! A symbol is a single `char` in exactly one of three classes: a terminal
//! (lowercase ASCII letter or digit), a non-terminal (uppercase ASCII letter
//! or the reserved `ACCEPT` marker), or the `EPSILON` marker. Membership is
//! purely syntactic.
//!
//! This module also owns the standard sequence of state names
//! (`A`, `B`, ..., `Z`, `Q0`, `Q1`, ...) used whenever an automaton needs a
//! fresh state.

use std::cmp::Ordering;

use regex::Regex;

/// The marker for the empty string.
pub const EPSILON: char = '&';

/// The reserved non-terminal that names the accepting state of an automaton
/// built from a grammar.
pub const ACCEPT: char = '$';

lazy_static! {
    static ref TERMINAL: Regex = Regex::new("^[a-z0-9]$").expect("valid terminal pattern");
    static ref NON_TERMINAL: Regex = Regex::new(r"^[A-Z$]$").expect("valid non-terminal pattern");
    static ref STANDARD_NAME: Regex =
        Regex::new(r"^(?:[A-Z]|Q(?:0|[1-9][0-9]*))$").expect("valid state name pattern");
}

/// Check if `symbol` is a terminal.
pub fn is_terminal(symbol: char) -> bool {
    TERMINAL.is_match(symbol.encode_utf8(&mut [0; 4]))
}

/// Check if `symbol` is a non-terminal (including the `ACCEPT` marker).
pub fn is_non_terminal(symbol: char) -> bool {
    NON_TERMINAL.is_match(symbol.encode_utf8(&mut [0; 4]))
}

/// Check if `symbol` is the `EPSILON` marker.
pub fn is_epsilon(symbol: char) -> bool {
    symbol == EPSILON
}

/// Check if `name` belongs to the standard sequence of state names.
pub fn is_standard_name(name: &str) -> bool {
    STANDARD_NAME.is_match(name)
}

/// Iterate over the standard state names in order: `A` through `Z`, then
/// `Q0`, `Q1`, and so on without end.
pub fn standard_names() -> impl Iterator<Item = String> {
    (b'A'..=b'Z')
        .map(|b| (b as char).to_string())
        .chain((0usize..).map(|n| format!("Q{}", n)))
}

/// Return the first standard state name that is not in `existing`.
///
/// This never fails since the `Q`-prefixed names do not run out.
pub fn make_unique_state_name<S: AsRef<str>>(existing: &[S]) -> String {
    standard_names()
        .find(|name| !existing.iter().any(|e| e.as_ref() == name.as_str()))
        .unwrap_or_default() // COV_EXCL_LINE
}

/// The canonical display order of state names.
///
/// Single letter names come first, then `Q<n>` names by number, then any
/// other name lexicographically.
pub fn state_name_order(lhs: &str, rhs: &str) -> Ordering {
    name_key(lhs).cmp(&name_key(rhs))
}

fn name_key(name: &str) -> (u8, usize, &str) {
    if !is_standard_name(name) {
        (2, 0, name)
    } else if name.len() == 1 {
        (0, 0, name)
    } else {
        (1, name[1..].parse().unwrap_or(0), name)
    }
}
