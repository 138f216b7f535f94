// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

#[macro_use]
extern crate quicli;

extern crate itertools;
extern crate regula;
extern crate serde_json;

mod snapshot;

use std::path::PathBuf;

use itertools::Itertools;
use quicli::prelude::*;
use regula::{ops, parse_expression, parse_max_length, Fsm, Grammar};
use snapshot::{load, print_fsm, print_steps};

/// Convert between right-linear grammars, regular expressions and
/// finite-state automata.
///
/// Automata are read and written as JSON snapshots.
#[derive(Debug, StructOpt)]
struct Cli {
    #[structopt(subcommand)]
    command: Command,

    /// Pass many times for more log output.
    #[structopt(long = "verbose", short = "v", parse(from_occurrences))]
    verbosity: u8,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Convert a file of grammar text to an automaton.
    #[structopt(name = "grammar")]
    Grammar {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },

    /// Convert a regular expression to an automaton.
    #[structopt(name = "expression")]
    Expression { text: String },

    /// Convert an automaton to grammar text.
    #[structopt(name = "to-grammar")]
    ToGrammar {
        #[structopt(parse(from_os_str))]
        fsm: PathBuf,
    },

    /// Make an automaton deterministic.
    #[structopt(name = "determinize")]
    Determinize {
        #[structopt(parse(from_os_str))]
        fsm: PathBuf,
    },

    /// Remove the epsilon transitions of an automaton.
    #[structopt(name = "eliminate-epsilon")]
    EliminateEpsilon {
        #[structopt(parse(from_os_str))]
        fsm: PathBuf,
    },

    /// Minimize an automaton.
    #[structopt(name = "minimize")]
    Minimize {
        #[structopt(parse(from_os_str))]
        fsm: PathBuf,
    },

    /// Rename the states of an automaton to standard names.
    #[structopt(name = "normalize")]
    Normalize {
        #[structopt(parse(from_os_str))]
        fsm: PathBuf,
    },

    /// Show the properties of an automaton.
    #[structopt(name = "info")]
    Info {
        #[structopt(parse(from_os_str))]
        fsm: PathBuf,
    },

    /// List the sentences of an automaton up to a length (1 to 100).
    #[structopt(name = "generate")]
    Generate {
        #[structopt(parse(from_os_str))]
        fsm: PathBuf,
        length: String,
    },

    /// Check if an automaton accepts a sentence.
    #[structopt(name = "recognize")]
    Recognize {
        #[structopt(parse(from_os_str))]
        fsm: PathBuf,
        sentence: String,
    },

    /// The union of two automata.
    #[structopt(name = "union")]
    Union(Binary),

    /// The concatenation of two automata.
    #[structopt(name = "concatenation")]
    Concatenation(Binary),

    /// The intersection of two automata.
    #[structopt(name = "intersection")]
    Intersection(Binary),

    /// The difference of two automata.
    #[structopt(name = "difference")]
    Difference(Binary),

    /// The reverse of an automaton.
    #[structopt(name = "reverse")]
    Reverse(Unary),

    /// The negation of an automaton.
    #[structopt(name = "negation")]
    Negation(Unary),

    /// The Kleene closure of an automaton.
    #[structopt(name = "closure")]
    Closure(Unary),
}

#[derive(Debug, StructOpt)]
struct Binary {
    #[structopt(parse(from_os_str))]
    lhs: PathBuf,

    #[structopt(parse(from_os_str))]
    rhs: PathBuf,

    /// Print every intermediate automaton.
    #[structopt(long = "steps")]
    steps: bool,
}

#[derive(Debug, StructOpt)]
struct Unary {
    #[structopt(parse(from_os_str))]
    fsm: PathBuf,

    /// Print every intermediate automaton.
    #[structopt(long = "steps")]
    steps: bool,
}

impl Binary {
    fn run(&self, op: fn(&Fsm, &Fsm) -> Fsm, with_steps: fn(&Fsm, &Fsm) -> Vec<Fsm>) -> Result<()> {
        let lhs = load(&self.lhs)?;
        let rhs = load(&self.rhs)?;
        if self.steps {
            print_steps(&with_steps(&lhs, &rhs))
        } else {
            print_fsm(&op(&lhs, &rhs))
        }
    }
}

impl Unary {
    fn run(&self, op: fn(&Fsm) -> Fsm, with_steps: fn(&Fsm) -> Vec<Fsm>) -> Result<()> {
        let fsm = load(&self.fsm)?;
        if self.steps {
            print_steps(&with_steps(&fsm))
        } else {
            print_fsm(&op(&fsm))
        }
    }
}

main!(|args: Cli, log_level: verbosity| {
    match args.command {
        Command::Grammar { ref file } => {
            let grammar = Grammar::from_text(&quicli::fs::read_file(file)?)?;
            match grammar.fsm() {
                Some(fsm) => print_fsm(fsm)?,
                None => bail!("{} is not a right-linear grammar", file.display()),
            }
        }
        Command::Expression { ref text } => print_fsm(&parse_expression(text)?)?,
        Command::ToGrammar { ref fsm } => println!("{}", load(fsm)?.to_grammar()?),
        Command::Determinize { ref fsm } => {
            let mut fsm = load(fsm)?;
            fsm.determinate();
            print_fsm(&fsm)?;
        }
        Command::EliminateEpsilon { ref fsm } => {
            let mut fsm = load(fsm)?;
            fsm.eliminate_epsilon_transitions();
            print_fsm(&fsm)?;
        }
        Command::Minimize { ref fsm } => {
            let mut fsm = load(fsm)?;
            fsm.minimize();
            print_fsm(&fsm)?;
        }
        Command::Normalize { ref fsm } => {
            let mut fsm = load(fsm)?;
            fsm.ensure_states_names_are_standard();
            print_fsm(&fsm)?;
        }
        Command::Info { ref fsm } => {
            let fsm = load(fsm)?;
            println!("states: {}", fsm.states().len());
            println!("deterministic: {}", fsm.is_deterministic());
            println!("epsilon transitions: {}", fsm.has_epsilon_transitions());
            println!("minimal: {}", fsm.is_minimal());
            println!("cycle: {}", fsm.has_cycle());
            println!("indefinition: {}", fsm.has_indefinition());
        }
        Command::Generate { ref fsm, ref length } => {
            let length = parse_max_length(length)?;
            let sentences = load(fsm)?.generate(length)?;
            debug!("generated {} sentences", sentences.len());
            println!(
                "{}",
                sentences
                    .iter()
                    .map(|s| if s.is_empty() { "&" } else { s.as_str() })
                    .join("\n")
            );
        }
        Command::Recognize { ref fsm, ref sentence } => {
            if load(fsm)?.recognize(sentence) {
                println!("accepted");
            } else {
                println!("rejected");
            }
        }
        Command::Union(ref binary) => binary.run(ops::union, ops::union_with_steps)?,
        Command::Concatenation(ref binary) => {
            binary.run(ops::concatenation, ops::concatenation_with_steps)?
        }
        Command::Intersection(ref binary) => {
            binary.run(ops::intersection, ops::intersection_with_steps)?
        }
        Command::Difference(ref binary) => binary.run(ops::difference, ops::difference_with_steps)?,
        Command::Reverse(ref unary) => unary.run(ops::reverse, ops::reverse_with_steps)?,
        Command::Negation(ref unary) => unary.run(ops::negation, ops::negation_with_steps)?,
        Command::Closure(ref unary) => unary.run(ops::closure, ops::closure_with_steps)?,
    }
});
