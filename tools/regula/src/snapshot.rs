// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::path::Path;

use quicli::fs;
use quicli::prelude::*;
use regula::Fsm;
use serde_json;

/// Read and check an automaton snapshot.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Fsm> {
    let path = path.as_ref();
    let text = fs::read_file(path)?;
    let fsm: Fsm = serde_json::from_str(&text)
        .map_err(|e| format_err!("{} is not an automaton snapshot: {}", path.display(), e))?;
    fsm.validate()?;

    debug!(
        "loaded {} with {} states and {} transitions",
        path.display(),
        fsm.states().len(),
        fsm.transitions().len()
    );
    Ok(fsm)
}

pub fn print_fsm(fsm: &Fsm) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(fsm)?);
    Ok(())
}

pub fn print_steps(steps: &[Fsm]) -> Result<()> {
    info!("{} steps", steps.len());
    println!("{}", serde_json::to_string_pretty(steps)?);
    Ok(())
}
