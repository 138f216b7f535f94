// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Regular expressions.
//!
//! An expression is built from terminals, `&` (the empty string), the
//! postfix operators `*` (zero or more) and `?` (zero or one), the infix
//! operators `.` (concatenation, usually left implicit) and `|` (union),
//! and parentheses. Whitespace is ignored.
//!
//! Parsing goes through explicit concatenation, postfix conversion and a
//! syntax tree, and then builds a deterministic `Fsm` directly from the
//! follow sets of the tree's leaves.

use error::Result;
use fsm::Fsm;
use memo::Memo;

use self::parser::{explicit_concatenation, normalize, to_postfix};
use self::tree::Tree;

mod construct;
mod parser;
mod tree;

/// A parser for regular expressions that remembers its last input.
#[derive(Debug, Default)]
pub struct ExpressionParser {
    memo: Memo<Fsm>,
}

impl ExpressionParser {
    /// Create a new `ExpressionParser`.
    pub fn new() -> ExpressionParser {
        ExpressionParser { memo: Memo::new() }
    }

    /// Parse `text` into a deterministic `Fsm`, reusing the last result if
    /// `text` has not changed.
    pub fn parse(&mut self, text: &str) -> Result<Fsm> {
        self.memo.get_or_try_insert_with(text, parse_expression)
    }

    /// The cache behind this parser.
    pub fn memo(&self) -> &Memo<Fsm> {
        &self.memo
    }
}

/// Parse regular expression text into a deterministic `Fsm`.
///
/// # Errors
///
/// `EmptyExpression` if there is nothing but whitespace, `InvalidSymbol`
/// for a character that is not a terminal, `&`, an operator or a
/// parenthesis, `UnbalancedParentheses`, and `MissingOperand` for an
/// operator with nothing to apply to (such as `a|` or `()`).
pub fn parse_expression(text: &str) -> Result<Fsm> {
    let infix = explicit_concatenation(&normalize(text))?;
    let postfix = to_postfix(&infix);
    let tree = Tree::from_postfix(&postfix)?;
    Ok(construct::build_fsm(&tree))
}

#[cfg(test)]
mod test {
    use super::*;
    use error::Error;

    #[test]
    fn star_after_symbol() {
        let sut = parse_expression("ab*").unwrap();

        assert_eq!(sut.generate(4).unwrap(), vec!["a", "ab", "abb", "abbb"]);
    }

    #[test]
    fn star_of_group() {
        let sut = parse_expression("(ab)*").unwrap();

        assert_eq!(sut.generate(4).unwrap(), vec!["", "ab", "abab"]);
    }

    #[test]
    fn optional_and_union() {
        let sut = parse_expression("a?(b | c)").unwrap();

        assert_eq!(
            sut.generate(3).unwrap(),
            vec!["ab", "ac", "b", "c"]
        );
    }

    #[test]
    fn explicit_concatenation_is_allowed() {
        let sut = parse_expression("a.b").unwrap();

        assert_eq!(sut.generate(5).unwrap(), vec!["ab"]);
    }

    #[test]
    fn parse_errors() {
        assert_matches!(parse_expression("  "), Err(Error::EmptyExpression));
        assert_matches!(
            parse_expression("a#"),
            Err(Error::InvalidSymbol {
                symbol: '#',
                position: 1,
            })
        );
        assert_matches!(parse_expression("(a|b"), Err(Error::UnbalancedParentheses));
        assert_matches!(parse_expression("a|"), Err(Error::MissingOperand('|')));
        assert_matches!(parse_expression("()"), Err(Error::EmptyExpression));
    }

    #[test]
    fn parser_remembers_last_expression() {
        let mut sut = ExpressionParser::new();

        let first = sut.parse("a*b").unwrap();
        let second = sut.parse("a*b").unwrap();

        assert_eq!(first, second);
        assert_eq!(sut.memo().hits(), 1);
        assert_eq!(sut.memo().input(), Some("a*b"));
    }

    #[test]
    fn failed_parse_empties_the_cache() {
        let mut sut = ExpressionParser::new();
        sut.parse("a").unwrap();

        assert!(sut.parse("a)").is_err());
        assert_eq!(sut.memo().input(), None);
    }

    proptest! {
        #[test]
        fn prop_expression_automaton_is_deterministic(text in "[ab|*?()&]{1,12}") {
            if let Ok(fsm) = parse_expression(&text) {
                prop_assert!(fsm.is_deterministic());
                prop_assert!(!fsm.has_epsilon_transitions());
            }
        }
    }
}
