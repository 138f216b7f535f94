// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The text stages of expression parsing: normalization, explicit
//! concatenation, and conversion to postfix.

use error::{Error, Result};
use symbol::{self, EPSILON};

pub const STAR: char = '*';
pub const OPTIONAL: char = '?';
pub const CONCAT: char = '.';
pub const UNION: char = '|';
const OPEN: char = '(';
const CLOSE: char = ')';

/// Check if `c` is one of the four operators.
pub fn is_operator(c: char) -> bool {
    c == STAR || c == OPTIONAL || c == CONCAT || c == UNION
}

/// Check if `c` is a leaf of the syntax tree (a terminal or `&`).
pub fn is_operand(c: char) -> bool {
    symbol::is_terminal(c) || c == EPSILON
}

fn precedence(op: char) -> u8 {
    match op {
        STAR | OPTIONAL => 3,
        CONCAT => 2,
        UNION => 1,
        _ => 0,
    }
}

/// Remove all whitespace.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Check a normalized expression and make every concatenation explicit.
///
/// A `.` goes between `x` and `y` whenever `x` ends an operand (an operand,
/// `)`, `*` or `?`) and `y` starts one (an operand or `(`).
pub fn explicit_concatenation(expression: &str) -> Result<Vec<char>> {
    if expression.is_empty() {
        return Err(Error::EmptyExpression);
    }

    let mut depth = 0usize;
    let mut infix = Vec::with_capacity(expression.len() * 2);
    let mut previous: Option<char> = None;

    for (position, c) in expression.chars().enumerate() {
        if !(is_operand(c) || is_operator(c) || c == OPEN || c == CLOSE) {
            return Err(Error::InvalidSymbol {
                symbol: c,
                position,
            });
        }

        if c == OPEN {
            depth += 1;
        } else if c == CLOSE {
            depth = depth.checked_sub(1).ok_or(Error::UnbalancedParentheses)?;
        }

        let ends_operand = |p: char| is_operand(p) || p == CLOSE || p == STAR || p == OPTIONAL;
        let starts_operand = is_operand(c) || c == OPEN;
        if previous.map_or(false, ends_operand) && starts_operand {
            infix.push(CONCAT);
        }

        infix.push(c);
        previous = Some(c);
    }

    if depth != 0 {
        return Err(Error::UnbalancedParentheses);
    }

    Ok(infix)
}

/// Convert an explicit infix expression to postfix (shunting-yard).
///
/// `*` and `?` bind tighter than `.`, which binds tighter than `|`. All
/// operators are left associative. The parentheses must balance.
pub fn to_postfix(infix: &[char]) -> Vec<char> {
    let mut output = Vec::with_capacity(infix.len());
    let mut stack: Vec<char> = Vec::new();

    for &c in infix {
        match c {
            OPEN => stack.push(c),
            CLOSE => {
                while let Some(op) = stack.pop() {
                    if op == OPEN {
                        break;
                    }
                    output.push(op);
                }
            }
            _ if is_operator(c) => {
                while let Some(&op) = stack.last() {
                    if op == OPEN || precedence(op) < precedence(c) {
                        break;
                    }
                    output.push(op);
                    stack.pop();
                }
                stack.push(c);
            }
            _ => output.push(c),
        }
    }

    while let Some(op) = stack.pop() {
        if op != OPEN {
            output.push(op);
        }
    }

    trace!(
        "postfix of {}: {}",
        infix.iter().collect::<String>(),
        output.iter().collect::<String>()
    );
    output
}
