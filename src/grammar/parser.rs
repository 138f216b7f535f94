// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::collections::BTreeMap;

use itertools::Itertools;
use regex::Regex;

use super::{GrammarParts, Production};
use error::{Error, Result};
use memo::Memo;
use symbol::EPSILON;

lazy_static! {
    static ref RULE: Regex = Regex::new(r"^([A-Z])->((?:[a-z0-9][A-Z]?|&)(?:\|(?:[a-z0-9][A-Z]?|&))*)$")
        .expect("valid production rule pattern");
}

/// A parser for right-linear grammar text that remembers its last input.
///
/// Parsing the same text twice in a row returns the remembered result
/// without parsing again; a failed parse forgets everything.
#[derive(Debug, Default)]
pub struct GrammarParser {
    memo: Memo<GrammarParts>,
}

impl GrammarParser {
    /// Create a new `GrammarParser`.
    pub fn new() -> GrammarParser {
        GrammarParser { memo: Memo::new() }
    }

    /// Parse `text` into the parts of a grammar.
    pub fn parse(&mut self, text: &str) -> Result<GrammarParts> {
        self.memo.get_or_try_insert_with(text, parse_parts)
    }

    /// The cache behind this parser.
    pub fn memo(&self) -> &Memo<GrammarParts> {
        &self.memo
    }
}

/// Parse right-linear grammar text into the parts of a grammar.
///
/// Each non-blank line is one rule `X->r1|r2|...` where `X` is an
/// uppercase letter and each alternative is a terminal, a terminal followed
/// by a non-terminal, or `&`. Whitespace anywhere is ignored. The start
/// symbol is the left-hand side of the first rule; rules for the same
/// symbol merge.
pub fn parse_parts(text: &str) -> Result<GrammarParts> {
    let mut start = None;
    let mut terminals = Vec::new();
    let mut non_terminals = Vec::new();
    let mut productions: BTreeMap<char, Vec<Production>> = BTreeMap::new();

    for (index, line) in text.lines().enumerate() {
        let rule: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if rule.is_empty() {
            continue;
        }

        let captures = RULE.captures(&rule).ok_or_else(|| Error::InvalidProduction {
            line: index + 1,
            text: line.to_string(),
        })?;
        let left = captures[1].chars().next().unwrap_or(EPSILON);
        start = start.or(Some(left));
        non_terminals.push(left);

        let alternatives = productions.entry(left).or_insert_with(Vec::new);
        for alternative in captures[2].split('|') {
            let production = parse_alternative(alternative);
            match production {
                Production::Terminal(t) => terminals.push(t),
                Production::Step(t, n) => {
                    terminals.push(t);
                    non_terminals.push(n);
                }
                Production::Epsilon => {}
            }
            if !alternatives.contains(&production) {
                alternatives.push(production);
            }
        }
    }

    let start = start.ok_or(Error::EmptyGrammar)?;
    let mut rest: Vec<char> = non_terminals
        .into_iter()
        .filter(|&n| n != start)
        .unique()
        .collect();
    rest.sort();
    let mut terminals: Vec<char> = terminals.into_iter().unique().collect();
    terminals.sort();

    Ok(GrammarParts {
        non_terminals: Some(start).into_iter().chain(rest).collect(),
        terminals,
        productions,
        start,
    })
}

// `alternative` already matched the rule pattern
fn parse_alternative(alternative: &str) -> Production {
    let mut chars = alternative.chars();
    match (chars.next(), chars.next()) {
        (Some(t), Some(n)) => Production::Step(t, n),
        (Some(EPSILON), None) | (None, _) => Production::Epsilon,
        (Some(t), None) => Production::Terminal(t),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_simple_grammar() {
        let result = parse_parts("S -> a | aB\nB -> aS | a").unwrap();

        assert_eq!(result.start, 'S');
        assert_eq!(result.non_terminals, vec!['S', 'B']);
        assert_eq!(result.terminals, vec!['a']);
        assert_eq!(
            result.productions[&'S'],
            vec![Production::Terminal('a'), Production::Step('a', 'B')]
        );
        assert_eq!(
            result.productions[&'B'],
            vec![Production::Step('a', 'S'), Production::Terminal('a')]
        );
    }

    #[test]
    fn whitespace_and_blank_lines_are_ignored() {
        let result = parse_parts("\n  S-> a B |\tb \n\n   \nB ->b\n").unwrap();

        assert_eq!(
            result.productions[&'S'],
            vec![Production::Step('a', 'B'), Production::Terminal('b')]
        );
        assert_eq!(result.terminals, vec!['a', 'b']);
    }

    #[test]
    fn start_symbol_is_sorted_first() {
        let result = parse_parts("X -> aA | bC\nA -> a\nC -> c").unwrap();

        assert_eq!(result.start, 'X');
        assert_eq!(result.non_terminals, vec!['X', 'A', 'C']);
        assert_eq!(result.terminals, vec!['a', 'b', 'c']);
    }

    #[test]
    fn repeated_rules_merge_without_duplicates() {
        let result = parse_parts("S -> a | b | a\nS -> b | c | &").unwrap();

        assert_eq!(
            result.productions[&'S'],
            vec![
                Production::Terminal('a'),
                Production::Terminal('b'),
                Production::Terminal('c'),
                Production::Epsilon,
            ]
        );
    }

    #[test]
    fn tail_non_terminals_are_declared() {
        let result = parse_parts("S -> aB").unwrap();

        assert_eq!(result.non_terminals, vec!['S', 'B']);
        assert!(!result.productions.contains_key(&'B'));
    }

    #[test]
    fn malformed_line_fails_whole_parse() {
        let result = parse_parts("S -> aB\nB -> Ab\nC -> c");

        assert_matches!(result, Err(Error::InvalidProduction { line: 2, .. }));
    }

    #[test]
    fn malformed_rules_are_rejected() {
        for text in &["S -> ", "s -> a", "S -> abC", "S => a", "SA -> a", "S -> a||b", "S -> $"] {
            assert_matches!(parse_parts(text), Err(Error::InvalidProduction { .. }));
        }
    }

    #[test]
    fn empty_text_is_an_empty_grammar() {
        assert_matches!(parse_parts(" \n\n"), Err(Error::EmptyGrammar));
    }

    #[test]
    fn parser_remembers_last_input() {
        let mut sut = GrammarParser::new();

        let first = sut.parse("S -> a").unwrap();
        let second = sut.parse("S -> a").unwrap();

        assert_eq!(first, second);
        assert_eq!(sut.memo().hits(), 1);
    }

    #[test]
    fn parser_forgets_after_failure() {
        let mut sut = GrammarParser::new();

        sut.parse("S -> a").unwrap();
        assert!(sut.parse("S ->").is_err());

        assert_eq!(sut.memo().input(), None);
    }
}
