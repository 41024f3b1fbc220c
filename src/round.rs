//! One parsing round: hash, merge, rank, rewrite (see §4.5 "Round driver").
//!
//! Scheduling model: parallel OS threads with a fork-join boundary at the
//! end of each stage. No shared mutable state exists during a stage — each
//! hashing or rewriting worker owns a private [`crate::hash_table::PhraseHashTable`]
//! over its own byte range; the merge and rank steps run single-threaded on
//! the main thread between stages.

use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::hash_table::{merge_tables, PhraseHashTable};
use crate::parser::{self, Symbol};
use crate::rank::{self};
pub use crate::rank::Rule;

pub struct RoundOutput {
    /// This round's output symbol stream: one rank per parsed phrase.
    pub parse: Vec<Symbol>,
    /// Rules the round appended to the grammar (existing phrases and
    /// maximal internal repeats), ordered by ascending id.
    pub rules: Vec<Rule>,
    /// One past the largest id this round assigned.
    pub next_symbol: Symbol,
    /// Suffix positions carried forward, remapped into `parse` index space.
    pub suffix_positions: Vec<usize>,
    /// `false` when the round made no progress (parse length >= input length);
    /// the pipeline driver stops iterating when this is `false`.
    pub made_progress: bool,
}

/// Runs one round over `input`, producing the next round's symbol stream.
///
/// `max_prev_symbol` is the largest id already in use; this round's fresh
/// ids start immediately above it. `suffix_positions_in` are positions in
/// `input` (string-boundary separators, or boundaries inherited from a
/// prior round) that must be tracked into the new parse's index space.
pub fn run_round(
    input: &[Symbol],
    max_prev_symbol: Symbol,
    suffix_positions_in: &[usize],
    n_threads: usize,
) -> Result<RoundOutput> {
    if input.is_empty() {
        return Ok(RoundOutput {
            parse: Vec::new(),
            rules: Vec::new(),
            next_symbol: max_prev_symbol,
            suffix_positions: Vec::new(),
            made_progress: false,
        });
    }

    let ranges = parser::partition_text(n_threads.max(1), input);

    // Stage 1: hash. One thread-local table per range, no shared mutation.
    let mut local_tables: Vec<PhraseHashTable> =
        (0..ranges.len()).map(|_| PhraseHashTable::new()).collect();

    rayon::scope(|s| {
        for (table, &(lo, hi)) in local_tables.iter_mut().zip(ranges.iter()) {
            let slice = &input[lo..hi];
            s.spawn(move |_| {
                for phrase in parser::parse(slice) {
                    let mut rev: Vec<Symbol> = slice[phrase.start..phrase.end].to_vec();
                    rev.reverse();
                    let (slot, _) = table.insert(&rev);
                    table.bump_counter(slot);
                }
            });
        }
    });

    // Join boundary: merge runs single-threaded.
    let mut merged = merge_tables(local_tables);

    // Sort + rank (single-threaded, between stages).
    let dict = Dictionary::build(&merged, max_prev_symbol);
    let rank_result = rank::compress_dictionary(&dict, max_prev_symbol, &mut merged)?;

    // Stage 2: rewrite. Each worker re-parses its own range and looks up
    // every phrase's final id in the now-ranked global table.
    let mut per_range_spans: Vec<Vec<(usize, usize, Symbol)>> =
        (0..ranges.len()).map(|_| Vec::new()).collect();

    rayon::scope(|s| {
        for (spans, &(lo, hi)) in per_range_spans.iter_mut().zip(ranges.iter()) {
            let slice = &input[lo..hi];
            let table = &merged;
            s.spawn(move |_| {
                for phrase in parser::parse(slice) {
                    let mut rev: Vec<Symbol> = slice[phrase.start..phrase.end].to_vec();
                    rev.reverse();
                    let slot = table
                        .find(&rev)
                        .expect("phrase seen during hashing must be present during rewrite");
                    let id = table.get_value(slot) >> 1;
                    spans.push((lo + phrase.start, lo + phrase.end, id));
                }
            });
        }
    });

    let mut spans: Vec<(usize, usize, Symbol)> = per_range_spans.into_iter().flatten().collect();
    spans.sort_by_key(|(start, _, _)| *start);

    let parse: Vec<Symbol> = spans.iter().map(|(_, _, id)| *id).collect();

    // Map each carried-forward suffix position to the index of the phrase
    // (in `parse`) that now covers it.
    let starts: Vec<usize> = spans.iter().map(|(s, _, _)| *s).collect();
    let suffix_positions = suffix_positions_in
        .iter()
        .map(|&p| match starts.binary_search(&p) {
            Ok(idx) => idx,
            Err(0) => 0,
            Err(idx) => idx - 1,
        })
        .collect();

    let made_progress = parse.len() < input.len();

    Ok(RoundOutput {
        parse,
        rules: rank_result.rules,
        next_symbol: rank_result.next_symbol,
        suffix_positions,
        made_progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> Vec<Symbol> {
        s.bytes().map(|b| b as u64).collect()
    }

    #[test]
    fn round_on_repetitive_input_shrinks_the_parse() {
        let input = bytes("abcabcabcabcabcabc");
        let out = run_round(&input, 255, &[], 1).unwrap();
        assert!(out.made_progress);
        assert!(out.parse.len() < input.len());
    }

    #[test]
    fn round_assigns_ids_above_previous_max() {
        let input = bytes("xyzxyzxyz");
        let out = run_round(&input, 255, &[], 2).unwrap();
        for id in &out.parse {
            assert!(*id > 255);
        }
        for (id, _) in &out.rules {
            assert!(*id > 255);
        }
    }

    #[test]
    fn empty_input_makes_no_progress() {
        let out = run_round(&[], 255, &[], 4).unwrap();
        assert!(!out.made_progress);
        assert!(out.parse.is_empty());
    }

    #[test]
    fn suffix_positions_remapped_into_parse_space() {
        let input = bytes("ab\ncd\n");
        let seps = parser::separator_positions(&input, b'\n' as u64);
        let out = run_round(&input, 255, &seps, 1).unwrap();
        assert_eq!(out.suffix_positions.len(), seps.len());
        for &p in &out.suffix_positions {
            assert!(p < out.parse.len());
        }
    }
}
