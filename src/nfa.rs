// src/nfa.rs
// Non-deterministic automaton over the full byte alphabet. Epsilon reachability
// is maintained transitively as edges are added, so closure lookups during
// subset construction are a single bitset read.

use hashbrown::HashMap;

pub const NUM_SYMBOLS: usize = 256;

/// Set of input bytes, one bit per symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbolSet {
    words: [u64; 4],
}

impl SymbolSet {
    pub const fn empty() -> Self {
        Self { words: [0; 4] }
    }

    pub fn full() -> Self {
        Self {
            words: [u64::MAX; 4],
        }
    }

    pub fn single(b: u8) -> Self {
        let mut s = Self::empty();
        s.insert(b);
        s
    }

    /// All bytes in the inclusive range `lo..=hi`.
    pub fn range(lo: u8, hi: u8) -> Self {
        let mut s = Self::empty();
        for b in lo..=hi {
            s.insert(b);
        }
        s
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut s = Self::empty();
        for &b in bytes {
            s.insert(b);
        }
        s
    }

    pub fn insert(&mut self, b: u8) {
        self.words[(b >> 6) as usize] |= 1u64 << (b & 63);
    }

    pub fn has(&self, b: u8) -> bool {
        self.words[(b >> 6) as usize] >> (b & 63) & 1 != 0
    }

    pub fn negate(&mut self) {
        for w in &mut self.words {
            *w = !*w;
        }
    }

    pub fn union_with(&mut self, other: &SymbolSet) {
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w |= o;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0u16..NUM_SYMBOLS as u16)
            .map(|b| b as u8)
            .filter(move |&b| self.has(b))
    }
}

/// Accepting tag carried by an NFA state: the token's public id plus its
/// declaration rank (0 = declared first). Identity and priority are kept as
/// separate fields; the determinizer breaks ties on `rank` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTag {
    pub id: u16,
    pub rank: u16,
}

#[derive(Debug, Clone, Default)]
struct State {
    /// Symbol transitions, keyed by target state.
    trans: HashMap<u32, SymbolSet>,
    /// States reachable from here through epsilon moves alone (includes self
    /// for the start state). Kept transitively closed.
    free_to: Vec<u32>,
    /// States that can reach here through epsilon moves alone.
    free_from: Vec<u32>,
    stop: Option<StopTag>,
}

/// A multi-pattern NFA. One fragment per token type, unioned under a shared
/// synthetic start state by `merge`.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: u32,
}

fn include(list: &mut Vec<u32>, id: u32) -> bool {
    if list.contains(&id) {
        return false;
    }
    list.push(id);
    true
}

impl Nfa {
    pub fn new(num_states: usize) -> Self {
        let mut nfa = Self {
            states: vec![State::default(); num_states],
            start: 0,
        };
        if num_states > 0 {
            nfa.states[0].free_to.push(0);
        }
        nfa
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn add_state(&mut self) -> u32 {
        self.states.push(State::default());
        (self.states.len() - 1) as u32
    }

    /// Start state plus everything reachable from it for free.
    pub fn start_closure(&self) -> Vec<u32> {
        let mut set = self.states[self.start as usize].free_to.clone();
        include(&mut set, self.start);
        set
    }

    pub fn add_transition(&mut self, from: u32, to: u32, symbols: SymbolSet) {
        debug_assert!((from as usize) < self.states.len());
        debug_assert!((to as usize) < self.states.len());
        self.states[from as usize]
            .trans
            .entry(to)
            .or_default()
            .union_with(&symbols);
    }

    pub fn add_byte_transition(&mut self, from: u32, to: u32, byte: u8) {
        self.add_transition(from, to, SymbolSet::single(byte));
    }

    /// Add an epsilon edge and keep the closure lists transitively closed:
    /// everything that could already reach `from` for free can now also reach
    /// everything `to` reaches for free.
    pub fn add_free_transition(&mut self, from: u32, to: u32) {
        let mut extend_to = self.states[to as usize].free_to.clone();
        include(&mut extend_to, to);
        let mut extend_from = self.states[from as usize].free_from.clone();
        include(&mut extend_from, from);

        for &f in &extend_from {
            for &t in &extend_to {
                include(&mut self.states[f as usize].free_to, t);
            }
        }
        for &t in &extend_to {
            for &f in &extend_from {
                include(&mut self.states[t as usize].free_from, f);
            }
        }
    }

    pub fn set_stop(&mut self, state: u32, tag: StopTag) {
        self.states[state as usize].stop = Some(tag);
    }

    pub fn stop(&self, state: u32) -> Option<StopTag> {
        self.states[state as usize].stop
    }

    /// States reachable from `from_set` on `byte`, each expanded by its free
    /// closure. Output is sorted and deduplicated so it can key a map.
    pub fn next_set(&self, byte: u8, from_set: &[u32]) -> Vec<u32> {
        let mut out: Vec<u32> = Vec::new();
        for &from in from_set {
            for (&to, symbols) in &self.states[from as usize].trans {
                if symbols.has(byte) {
                    include(&mut out, to);
                    for &free in &self.states[to as usize].free_to {
                        include(&mut out, free);
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Union of outgoing symbol sets across a set of states. Lets the
    /// determinizer skip bytes no member state can consume.
    pub fn symbol_options(&self, from_set: &[u32]) -> SymbolSet {
        let mut options = SymbolSet::empty();
        for &id in from_set {
            for symbols in self.states[id as usize].trans.values() {
                options.union_with(symbols);
            }
        }
        options
    }

    /// Union another NFA into this one under a fresh shared start state with
    /// epsilon edges to both operands' starts. Stop tags are preserved.
    pub fn merge(&mut self, other: &Nfa) {
        let offset = self.states.len() as u32;
        for _ in 0..other.states.len() {
            self.add_state();
        }
        let new_start = self.add_state();
        let old_start = self.start;
        self.add_free_transition(new_start, old_start);
        self.add_free_transition(new_start, other.start + offset);
        self.start = new_start;

        for (i, state) in other.states.iter().enumerate() {
            let from = i as u32 + offset;
            for (&to, symbols) in &state.trans {
                self.add_transition(from, to + offset, *symbols);
            }
            for &to in &state.free_to {
                self.add_free_transition(from, to + offset);
            }
            if let Some(tag) = state.stop {
                self.set_stop(from, tag);
            }
        }
    }
}
