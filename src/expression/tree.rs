// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The syntax tree of a regular expression.
//!
//! Nodes live in a `Vec` and refer to each other by index. The `father`
//! link is navigational only.

use std::collections::{BTreeSet, HashSet};

use super::parser::{is_operand, CONCAT, OPTIONAL, STAR, UNION};
use error::{Error, Result};
use symbol::EPSILON;

/// A place the construction can be in: just before reading a terminal
/// leaf, or past the end of the whole expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    Leaf(usize),
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub symbol: char,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub father: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Direction {
    Down,
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: usize,
}

impl Tree {
    /// Build the tree from a postfix expression.
    pub fn from_postfix(postfix: &[char]) -> Result<Tree> {
        let mut nodes: Vec<Node> = Vec::with_capacity(postfix.len());
        let mut operands: Vec<usize> = Vec::new();

        for &symbol in postfix {
            let index = nodes.len();
            let (left, right) = if is_operand(symbol) {
                (None, None)
            } else if symbol == STAR || symbol == OPTIONAL {
                let left = operands.pop().ok_or(Error::MissingOperand(symbol))?;
                (Some(left), None)
            } else {
                let right = operands.pop().ok_or(Error::MissingOperand(symbol))?;
                let left = operands.pop().ok_or(Error::MissingOperand(symbol))?;
                (Some(left), Some(right))
            };

            for &child in left.iter().chain(right.iter()) {
                nodes[child].father = Some(index);
            }
            nodes.push(Node {
                symbol,
                left,
                right,
                father: None,
            });
            operands.push(index);
        }

        match (operands.pop(), operands.pop()) {
            (Some(root), None) => Ok(Tree { nodes, root }),
            (None, _) => Err(Error::EmptyExpression),
            (Some(_), Some(_)) => Err(Error::MissingOperand(CONCAT)),
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// The indices of the terminal leaves, in expression order.
    pub fn leaves<'a>(&'a self) -> impl Iterator<Item = usize> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(|&(_, n)| is_operand(n.symbol) && n.symbol != EPSILON)
            .map(|(i, _)| i)
    }

    /// The nearest ancestor that decides what follows `index`.
    ///
    /// Walking up, a node that is the left operand of a `.` is followed by
    /// the right operand, and a node under a `*` may repeat. Any other
    /// ancestor (`|`, `?`, or the right side of `.`) is finished together
    /// with `index` and is passed over. `None` means the expression ends.
    pub fn last_father(&self, index: usize) -> Option<usize> {
        let mut child = index;
        while let Some(father) = self.nodes[child].father {
            let node = &self.nodes[father];
            if node.symbol == STAR || (node.symbol == CONCAT && node.left == Some(child)) {
                return Some(father);
            }
            child = father;
        }
        None
    }

    /// The positions that can come first when entering `index`.
    pub fn collect_nodes_going_down(&self, index: usize) -> BTreeSet<Position> {
        let mut found = BTreeSet::new();
        self.collect(index, Direction::Down, &mut HashSet::new(), &mut found);
        found
    }

    /// The positions that can come right after leaving `index`.
    pub fn collect_nodes_going_up(&self, index: usize) -> BTreeSet<Position> {
        let mut found = BTreeSet::new();
        self.collect(index, Direction::Up, &mut HashSet::new(), &mut found);
        found
    }

    fn collect(
        &self,
        index: usize,
        direction: Direction,
        visited: &mut HashSet<(usize, Direction)>,
        found: &mut BTreeSet<Position>,
    ) {
        if !visited.insert((index, direction)) {
            return;
        }

        let node = &self.nodes[index];
        match direction {
            Direction::Down => match node.symbol {
                EPSILON => self.collect(index, Direction::Up, visited, found),
                STAR | OPTIONAL => {
                    if let Some(left) = node.left {
                        self.collect(left, Direction::Down, visited, found);
                    }
                    self.collect(index, Direction::Up, visited, found);
                }
                UNION => {
                    for &child in node.left.iter().chain(node.right.iter()) {
                        self.collect(child, Direction::Down, visited, found);
                    }
                }
                CONCAT => {
                    if let Some(left) = node.left {
                        self.collect(left, Direction::Down, visited, found);
                    }
                }
                _ => {
                    found.insert(Position::Leaf(index));
                }
            },
            Direction::Up => match self.last_father(index) {
                None => {
                    found.insert(Position::End);
                }
                Some(father) => {
                    let father_node = &self.nodes[father];
                    if father_node.symbol == STAR {
                        if let Some(left) = father_node.left {
                            self.collect(left, Direction::Down, visited, found);
                        }
                        self.collect(father, Direction::Up, visited, found);
                    } else if let Some(right) = father_node.right {
                        self.collect(right, Direction::Down, visited, found);
                    }
                }
            },
        }
    }
}
