// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use error::Result;

/// A single-slot cache keyed by exact input text.
///
/// A `Memo` remembers the value computed for the most recent input. Asking
/// again for the same text returns a clone of that value without recomputing
/// it; any other text replaces the slot. A failed computation empties the
/// slot so that no stale value outlives an invalid input.
///
/// The hit and miss counters make the memoization observable in tests.
#[derive(Debug, Clone)]
pub struct Memo<T> {
    slot: Option<(String, T)>,
    hits: usize,
    misses: usize,
}

impl<T: Clone> Memo<T> {
    /// Create an empty `Memo`.
    pub fn new() -> Memo<T> {
        Memo {
            slot: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Get the value for `input`, computing it with `f` unless `input` is
    /// the same text as the last call.
    pub fn get_or_try_insert_with<F>(&mut self, input: &str, f: F) -> Result<T>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        if let Some((ref key, ref value)) = self.slot {
            if key == input {
                self.hits += 1;
                return Ok(value.clone());
            }
        }

        self.misses += 1;
        self.slot = None;
        let value = f(input)?;
        self.slot = Some((input.to_string(), value.clone()));
        Ok(value)
    }

    /// The cached input text, if any.
    pub fn input(&self) -> Option<&str> {
        self.slot.as_ref().map(|&(ref key, _)| key.as_str())
    }

    /// The number of calls answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// The number of calls that had to compute a value.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Empty the cache (the counters are kept).
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

impl<T: Clone> Default for Memo<T> {
    fn default() -> Self {
        Memo::new()
    }
}
