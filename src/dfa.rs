// src/dfa.rs
// Dense table-driven DFA: one row of 256 next-state entries per state plus a
// per-state stop id. Built once by the determinizer, immutable afterwards.

use crate::nfa::NUM_SYMBOLS;

/// Sentinel for "no transition on this byte".
pub const DEAD: u32 = u32::MAX;

/// Byte alphabet size; every state row has exactly this many entries.
pub const ALPHABET: usize = NUM_SYMBOLS;

#[derive(Debug, Clone, Default)]
pub struct Dfa {
    /// Flattened `n_states x 256` transition table.
    next: Vec<u32>,
    /// Per-state stop id: 0 = not accepting, otherwise the token id to report
    /// when a scan halts in this state.
    stops: Vec<i32>,
    start: u32,
}

impl Dfa {
    pub(crate) fn push_state(&mut self) -> u32 {
        let id = self.stops.len() as u32;
        self.next.extend(std::iter::repeat_n(DEAD, ALPHABET));
        self.stops.push(0);
        id
    }

    pub(crate) fn set_transition(&mut self, from: u32, byte: u8, to: u32) {
        self.next[from as usize * ALPHABET + byte as usize] = to;
    }

    pub(crate) fn set_stop(&mut self, state: u32, id: i32) {
        self.stops[state as usize] = id;
    }

    pub fn n_states(&self) -> usize {
        self.stops.len()
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    /// Transition function; `None` on a dead end.
    pub fn next(&self, state: u32, byte: u8) -> Option<u32> {
        let to = self.next[state as usize * ALPHABET + byte as usize];
        if to == DEAD { None } else { Some(to) }
    }

    /// Stop id of a state, or 0 if it is not accepting. An out-of-range state
    /// degrades to "not accepting" rather than taking down the host.
    pub fn stop(&self, state: u32) -> i32 {
        match self.stops.get(state as usize) {
            Some(&id) => id,
            None => {
                debug_assert!(false, "stop lookup on unknown DFA state {state}");
                log::warn!("stop lookup on unknown DFA state {state}; treating as non-accepting");
                0
            }
        }
    }

    /// Whether any input can still be consumed from this state.
    pub fn is_dead_end(&self, state: u32) -> bool {
        let row = &self.next[state as usize * ALPHABET..(state as usize + 1) * ALPHABET];
        row.iter().all(|&to| to == DEAD)
    }

    /// Raw row access for table export.
    pub(crate) fn row(&self, state: u32) -> &[u32] {
        &self.next[state as usize * ALPHABET..(state as usize + 1) * ALPHABET]
    }
}
