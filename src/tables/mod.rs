// src/tables/mod.rs
pub mod io;

pub use io::{load_tables_bin_bytes, load_tables_json_bytes, save_tables_bin, save_tables_json};

use serde::{Deserialize, Serialize};

use crate::dfa::{ALPHABET, DEAD, Dfa};

/// Packed, enumerable form of a compiled DFA, for downstream consumers that
/// materialize an equivalent recognizer elsewhere (code emitters, other
/// runtimes). Row-major `n_states x 256`; `u32::MAX` marks a dead entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    pub n_states: u32,
    pub start: u32,
    pub next: Vec<u32>,
    pub stops: Vec<i32>,
}

impl Tables {
    pub const ALPHABET: usize = ALPHABET;

    pub fn next(&self, state: u32, byte: u8) -> Option<u32> {
        let to = *self
            .next
            .get(state as usize * ALPHABET + byte as usize)?;
        if to == DEAD { None } else { Some(to) }
    }

    pub fn stop(&self, state: u32) -> i32 {
        self.stops.get(state as usize).copied().unwrap_or(0)
    }
}

impl From<&Dfa> for Tables {
    fn from(dfa: &Dfa) -> Self {
        let n_states = dfa.n_states() as u32;
        let mut next = Vec::with_capacity(dfa.n_states() * ALPHABET);
        let mut stops = Vec::with_capacity(dfa.n_states());
        for state in 0..n_states {
            next.extend_from_slice(dfa.row(state));
            stops.push(dfa.stop(state));
        }
        Self {
            n_states,
            start: dfa.start(),
            next,
            stops,
        }
    }
}
