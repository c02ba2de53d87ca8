// src/determinize.rs
// Subset construction: merged NFA -> dense DFA. Each DFA state is keyed by
// the sorted set of NFA states it stands for; keys are interned in a map so
// equal sets always collapse to the same DFA state.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::dfa::{ALPHABET, Dfa};
use crate::nfa::{Nfa, StopTag};

type StateSet = SmallVec<[u32; 8]>;

/// Pick the winning tag when several token types accept in the same DFA
/// state. Lower rank (earlier declaration) wins. Ranks are unique per
/// registry, so the outcome is total and deterministic for any tag set.
///
/// Ids count down from the registry ceiling as ranks count up, so this is
/// equivalent to "larger id wins"; rank is the field that carries the
/// priority meaning.
pub fn prefer(a: StopTag, b: StopTag) -> StopTag {
    if a.rank <= b.rank { a } else { b }
}

/// Convert a merged NFA into an equivalent DFA, resolving stop values with
/// [`prefer`].
pub fn determinize(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa::default();
    let mut interned: HashMap<StateSet, u32> = HashMap::new();
    let mut worklist: Vec<StateSet> = Vec::new();

    let mut start: StateSet = nfa.start_closure().into();
    start.sort_unstable();
    let start_id = dfa.push_state();
    apply_stop(&mut dfa, nfa, start_id, &start);
    interned.insert(start.clone(), start_id);
    worklist.push(start);

    while let Some(set) = worklist.pop() {
        let from_id = match interned.get(&set) {
            Some(&id) => id,
            None => {
                debug_assert!(false, "worklist entry was never interned");
                continue;
            }
        };

        let options = nfa.symbol_options(&set);
        for byte in 0..ALPHABET as u16 {
            let byte = byte as u8;
            if !options.has(byte) {
                continue;
            }
            let to_set: StateSet = nfa.next_set(byte, &set).into();
            if to_set.is_empty() {
                continue;
            }
            let to_id = *interned.entry(to_set.clone()).or_insert_with(|| {
                let id = dfa.push_state();
                apply_stop(&mut dfa, nfa, id, &to_set);
                worklist.push(to_set.clone());
                id
            });
            dfa.set_transition(from_id, byte, to_id);
        }
    }

    dfa
}

fn apply_stop(dfa: &mut Dfa, nfa: &Nfa, dfa_state: u32, set: &[u32]) {
    let mut best: Option<StopTag> = None;
    for &id in set {
        if let Some(tag) = nfa.stop(id) {
            best = Some(match best {
                Some(cur) => prefer(cur, tag),
                None => tag,
            });
        }
    }
    if let Some(tag) = best {
        dfa.set_stop(dfa_state, tag.id as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    #[test]
    fn prefer_is_earliest_declared() {
        let first = StopTag { id: 255, rank: 0 };
        let later = StopTag { id: 254, rank: 1 };
        assert_eq!(prefer(first, later), first);
        assert_eq!(prefer(later, first), first);
        assert_eq!(prefer(first, first), first);
    }

    fn walk(dfa: &Dfa, input: &[u8]) -> Option<i32> {
        let mut state = dfa.start();
        for &b in input {
            state = dfa.next(state, b)?;
        }
        match dfa.stop(state) {
            0 => None,
            id => Some(id),
        }
    }

    #[test]
    fn single_pattern_recognizer() {
        let re = Regex::parse("[0-9]+").unwrap();
        let dfa = determinize(&re.to_nfa(StopTag { id: 255, rank: 0 }));
        assert_eq!(walk(&dfa, b"42"), Some(255));
        assert_eq!(walk(&dfa, b"0"), Some(255));
        assert_eq!(walk(&dfa, b""), None);
        assert_eq!(walk(&dfa, b"4x"), None);
    }

    #[test]
    fn overlapping_patterns_resolve_by_rank() {
        // Both patterns accept "ab"; the earlier declaration must win.
        let lower = Regex::parse("[a-z]+").unwrap();
        let mixed = Regex::parse("[a-zA-Z]+").unwrap();
        let mut nfa = lower.to_nfa(StopTag { id: 255, rank: 0 });
        nfa.merge(&mixed.to_nfa(StopTag { id: 254, rank: 1 }));
        let dfa = determinize(&nfa);
        assert_eq!(walk(&dfa, b"ab"), Some(255));
        // Only the mixed pattern accepts once an uppercase byte appears.
        assert_eq!(walk(&dfa, b"aB"), Some(254));
    }

    #[test]
    fn empty_nfa_accepts_nothing() {
        let dfa = determinize(&Nfa::new(1));
        assert_eq!(dfa.stop(dfa.start()), 0);
        assert!(dfa.is_dead_end(dfa.start()));
    }
}
