//! Decompression walker. Materializes strings from a finished [`Grammar`]
//! on demand — never the whole tree at once — caching the expansion of a
//! bounded number of recently used nonterminals (see Design Notes:
//! "expansion is on demand via a stack-driven walker with a small LRU
//! cache keyed by nonterminal id").

use std::collections::{HashMap, VecDeque};

use crate::grammar::Grammar;
use crate::parser::Symbol;

struct Lru {
    cap: usize,
    order: VecDeque<Symbol>,
    map: HashMap<Symbol, Vec<u8>>,
}

impl Lru {
    fn new(cap: usize) -> Self {
        Lru { cap, order: VecDeque::new(), map: HashMap::new() }
    }

    fn get(&self, id: Symbol) -> Option<&Vec<u8>> {
        self.map.get(&id)
    }

    fn put(&mut self, id: Symbol, bytes: Vec<u8>) {
        if self.map.contains_key(&id) {
            return;
        }
        if self.order.len() >= self.cap {
            if let Some(evict) = self.order.pop_front() {
                self.map.remove(&evict);
            }
        }
        self.order.push_back(id);
        self.map.insert(id, bytes);
    }
}

/// Default number of nonterminal expansions the walker keeps cached.
pub const DEFAULT_CACHE_SIZE: usize = 4096;

/// Fully expands `grammar`'s start symbol back into the original bytes.
pub fn decompress(grammar: &Grammar) -> Vec<u8> {
    let mut cache = Lru::new(DEFAULT_CACHE_SIZE);
    expand(grammar, &mut cache, grammar.start_symbol)
}

/// Expands a single string by its 0-based index among the input's
/// separator-delimited strings, using the grammar's suffix position table.
///
/// `suffix_positions` indexes the start rule's right-hand side at the
/// symbol level, not the fully expanded byte stream, so this walks only
/// the slice of start-rule symbols belonging to the requested string and
/// expands each one through the same cached [`expand`] used by
/// [`decompress`] — it never materializes any other string's bytes.
pub fn decompress_string(grammar: &Grammar, index: usize) -> Option<Vec<u8>> {
    let rhs = grammar.rule_rhs(grammar.start_symbol);

    let mut ends: Vec<usize> = grammar.suffix_positions.clone();
    ends.sort_unstable();
    ends.dedup();

    let mut starts = vec![0usize];
    starts.extend(ends.iter().map(|&p| p + 1));

    let start = *starts.get(index)?;
    if start > rhs.len() {
        return None;
    }
    let end = ends.get(index).copied().unwrap_or(rhs.len());

    let mut cache = Lru::new(DEFAULT_CACHE_SIZE);
    let mut out = Vec::new();
    for &sym in &rhs[start..end.min(rhs.len())] {
        out.extend(expand(grammar, &mut cache, sym));
    }
    Some(out)
}

fn expand(grammar: &Grammar, cache: &mut Lru, sym: Symbol) -> Vec<u8> {
    if grammar.is_terminal(sym) {
        return vec![grammar.symbol_map[sym as usize]];
    }
    if let Some(cached) = cache.get(sym) {
        return cached.clone();
    }
    let rhs = grammar.rule_rhs(sym);
    let mut out = Vec::new();
    for s in rhs {
        out.extend(expand(grammar, cache, s));
    }
    cache.put(sym, out.clone());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::pipeline::build_grammar;

    fn roundtrip(input: &[u8]) -> Vec<u8> {
        let out = build_grammar(input, b'\n', 1).unwrap();
        let grammar = Grammar::from_pipeline(out, 1).unwrap();
        decompress(&grammar)
    }

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(roundtrip(b""), b"");
    }

    #[test]
    fn repetitive_input_round_trips() {
        assert_eq!(roundtrip(b"abcabcabc"), b"abcabcabc");
    }

    #[test]
    fn run_length_input_round_trips() {
        assert_eq!(roundtrip(b"aaaaaaaa"), b"aaaaaaaa");
    }

    #[test]
    fn multi_string_input_round_trips_with_separators() {
        assert_eq!(roundtrip(b"ab\ncd\nab\n"), b"ab\ncd\nab\n");
    }

    #[test]
    fn fibonacci_string_round_trips() {
        // Fibonacci word: F(1)="b", F(2)="a", F(n)=F(n-1)+F(n-2).
        let mut a = b"b".to_vec();
        let mut b = b"a".to_vec();
        for _ in 0..18 {
            let next = [b.clone(), a.clone()].concat();
            a = b;
            b = next;
        }
        assert_eq!(roundtrip(&b), b.as_slice());
    }

    #[test]
    fn decompress_string_recovers_individual_records() {
        let out = build_grammar(b"ab\ncd\nab\n", b'\n', 1).unwrap();
        let grammar = Grammar::from_pipeline(out, 1).unwrap();
        assert_eq!(decompress_string(&grammar, 0).unwrap(), b"ab");
        assert_eq!(decompress_string(&grammar, 1).unwrap(), b"cd");
    }

    #[test]
    fn decompress_string_recovers_records_when_a_phrase_spans_separators() {
        // The repeated "mississippi" phrase forces at least one real round,
        // so the start rule's right-hand side is no longer a 1:1 terminal
        // copy of the input: suffix_positions must be honored at the
        // symbol level, not as byte offsets into the full decompression.
        let input = b"mississippi\nmississippi\nriver\n";
        let out = build_grammar(input, b'\n', 1).unwrap();
        let grammar = Grammar::from_pipeline(out, 1).unwrap();
        assert_eq!(decompress_string(&grammar, 0).unwrap(), b"mississippi");
        assert_eq!(decompress_string(&grammar, 1).unwrap(), b"mississippi");
        assert_eq!(decompress_string(&grammar, 2).unwrap(), b"river");
        // Index 3 is the empty trailing record after the last separator;
        // index 4 has no corresponding start offset at all.
        assert_eq!(decompress_string(&grammar, 3).unwrap(), b"");
        assert_eq!(decompress_string(&grammar, 4), None);
    }
}
