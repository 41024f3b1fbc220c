//! Dictionary sort and rank assignment (`compress_dictionary` / `assign_ids`
//! in the source terminology): turns a round's [`Dictionary`] into new
//! grammar rules and writes final nonterminal ids back into the round's
//! phrase hash table.

use std::collections::HashMap;

use crate::dictionary::Dictionary;
use crate::error::{GramError, Result};
use crate::hash_table::PhraseHashTable;
use crate::parser::Symbol;
use crate::suffix_sort::suffix_array;

/// One newly minted rule: its nonterminal id and forward-order right-hand side.
pub type Rule = (Symbol, Vec<Symbol>);

pub struct RankResult {
    /// Every rule created this round (existing phrases and maximal internal
    /// repeats together), ordered by ascending id.
    pub rules: Vec<Rule>,
    /// One past the largest id assigned this round.
    pub next_symbol: Symbol,
}

#[derive(Default)]
struct Run {
    positions: Vec<usize>,
}

/// Left context of dictionary position `p`: `None` at a phrase start (the
/// position has no predecessor, or its predecessor is another phrase's
/// terminator), `Some(sym)` otherwise.
fn left_context(dict: &Dictionary, p: usize) -> Option<Symbol> {
    if p == 0 || dict.d_lim[p - 1] {
        None
    } else {
        Some(dict.data[p - 1])
    }
}

/// Runs `compress_dictionary` + `assign_ids` over `dict`, mutating `table`
/// in place so every original phrase occurrence carries its final
/// `(id << 1) | repeat_flag` value (see [`crate::hash_table`] for the
/// packing), and returning the rules the round must append to the grammar.
pub fn compress_dictionary(
    dict: &Dictionary,
    max_prev_symbol: Symbol,
    table: &mut PhraseHashTable,
) -> Result<RankResult> {
    let n = dict.len();
    if n == 0 {
        return Ok(RankResult { rules: Vec::new(), next_symbol: max_prev_symbol });
    }

    let sa = suffix_array(&dict.data);

    // term_end[p] = index of the terminator that ends the suffix starting at p.
    let mut term_end = vec![0usize; n];
    let mut next_term = n;
    for i in (0..n).rev() {
        if dict.d_lim[i] {
            next_term = i;
        }
        term_end[i] = next_term;
    }

    // Sweep the suffix array, grouping candidate positions (suffixes that
    // start on real content, not on a terminator byte) into runs of equal
    // truncated "suffix up to and including terminator" content. SA order
    // already clusters these adjacently: the terminator is the unique
    // maximum symbol, so two suffixes can only tie past where one of them
    // hits its terminator if the other hits its own terminator at the same
    // offset too.
    let mut runs: Vec<Run> = Vec::new();
    let mut prev_key: Option<&[Symbol]> = None;
    for &p in &sa {
        if dict.data[p] == dict.end_marker {
            continue; // bare-terminator suffix, not a candidate
        }
        let key = &dict.data[p..=term_end[p]];
        match prev_key {
            Some(pk) if pk == key => runs.last_mut().unwrap().positions.push(p),
            _ => runs.push(Run { positions: vec![p] }),
        }
        prev_key = Some(key);
    }

    let mut new_phrases_ht: HashMap<Vec<Symbol>, Symbol> = HashMap::new();
    let mut phrase_ranks: HashMap<Vec<Symbol>, Symbol> = HashMap::new();
    let mut rules: Vec<Rule> = Vec::new();
    let mut rank: u64 = 0;

    for run in &runs {
        let existing_pos = run.positions.iter().copied().find(|&p| dict.is_phrase_start(p));

        let left_maximal = {
            let mut contexts: Vec<Option<Symbol>> =
                run.positions.iter().map(|&p| left_context(dict, p)).collect();
            contexts.sort();
            contexts.dedup();
            contexts.len() > 1
        };

        let emit = existing_pos.is_some() || left_maximal;
        if !emit {
            continue;
        }
        rank += 1;
        let final_id = max_prev_symbol + rank;

        match existing_pos {
            Some(p) => {
                let phrase_key = dict.phrase_at(p).to_vec();
                phrase_ranks.insert(phrase_key, final_id);
            }
            None => {
                // Maximal internal repeat: not a full dictionary phrase on
                // its own, but left-maximal, so promote it to a rule.
                let p0 = run.positions[0];
                let content = dict.data[p0..term_end[p0]].to_vec(); // excludes terminator
                new_phrases_ht.insert(content.clone(), final_id);
                let mut forward = content;
                forward.reverse();
                rules.push((final_id, forward));
            }
        }
    }

    if phrase_ranks.len() != dict.phrase_starts.len() {
        return Err(GramError::SortInconsistency(format!(
            "{} of {} dictionary phrases received no rank",
            dict.phrase_starts.len() - phrase_ranks.len(),
            dict.phrase_starts.len()
        )));
    }

    let max_repeat_len = new_phrases_ht.keys().map(|k| k.len()).max().unwrap_or(0);

    // Rewrite pass: substitute tracked internal repeats inside every
    // existing phrase's stored (reverse-order) content, then reverse once
    // to produce the rule's forward-order right-hand side.
    for &start in &dict.phrase_starts {
        let content = dict.phrase_at(start);
        let id = *phrase_ranks.get(content).expect("existing phrase always ranked");

        let mut rewritten_rev = Vec::new();
        let mut i = 0;
        while i < content.len() {
            let mut matched = None;
            let upper = max_repeat_len.min(content.len() - i);
            for len in (1..=upper).rev() {
                if let Some(&rep_id) = new_phrases_ht.get(&content[i..i + len]) {
                    matched = Some((len, rep_id));
                    break;
                }
            }
            match matched {
                Some((len, rep_id)) => {
                    rewritten_rev.push(rep_id);
                    i += len;
                }
                None => {
                    rewritten_rev.push(content[i]);
                    i += 1;
                }
            }
        }
        rewritten_rev.reverse();
        rules.push((id, rewritten_rev));
    }

    rules.sort_by_key(|(id, _)| *id);

    // Rank propagation: write the final packed value back into the
    // caller's occurrence table (repeat flag = "seen more than once").
    let keys: Vec<Vec<Symbol>> = table.iter().map(|(k, _)| k.to_vec()).collect();
    for key in keys {
        let (slot, _) = table.insert(&key);
        let occurrences = table.get_value(slot) >> 1;
        let id = *phrase_ranks
            .get(&key)
            .ok_or_else(|| GramError::SortInconsistency("occurrence phrase missing a rank".into()))?;
        let repeat_flag = (occurrences > 1) as u64;
        table.set_value(slot, (id << 1) | repeat_flag);
    }

    Ok(RankResult { rules, next_symbol: max_prev_symbol + rank })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_table(phrases: &[&[Symbol]]) -> PhraseHashTable {
        let mut t = PhraseHashTable::new();
        for p in phrases {
            let (slot, _) = t.insert(p);
            t.bump_counter(slot);
        }
        t
    }

    #[test]
    fn dense_ranks_assigned_to_every_phrase() {
        // Reverse-stored phrases for forward "ab", "cd", "ef" (no shared substrings).
        let mut table = build_table(&[&[b'b' as u64, b'a' as u64], &[b'd' as u64, b'c' as u64]]);
        let dict = Dictionary::build(&table, 255);
        let result = compress_dictionary(&dict, 255, &mut table).unwrap();

        let ids: Vec<Symbol> = result.rules.iter().map(|(id, _)| *id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, ids, "ids must be dense/sorted with no duplicates");
        assert_eq!(result.next_symbol, 255 + result.rules.len() as u64);
    }

    #[test]
    fn rank_propagation_sets_repeat_flag() {
        let phrase: &[Symbol] = &[1, 2, 3];
        let mut table = PhraseHashTable::new();
        let (slot, _) = table.insert(phrase);
        table.bump_counter(slot);
        table.bump_counter(slot); // occurs twice -> repeat flag expected
        let dict = Dictionary::build(&table, 10);
        compress_dictionary(&dict, 10, &mut table).unwrap();

        let (slot2, fresh) = table.insert(phrase);
        assert!(!fresh);
        let value = table.get_value(slot2);
        assert_eq!(value & 1, 1);
    }

    #[test]
    fn internal_repeat_promoted_to_its_own_rule() {
        // Two phrases sharing an internal substring with different left
        // contexts: forward "xaby" and "zaby" share "aby" with left
        // contexts 'x' and 'z' -> "aby" (reversed "yba") should become a
        // left-maximal internal repeat.
        let rev = |s: &str| -> Vec<Symbol> { s.bytes().rev().map(|b| b as u64).collect() };
        let mut table = PhraseHashTable::new();
        for s in ["xaby", "zaby"] {
            let key = rev(s);
            let (slot, _) = table.insert(&key);
            table.bump_counter(slot);
        }
        let dict = Dictionary::build(&table, 255);
        let result = compress_dictionary(&dict, 255, &mut table).unwrap();
        // At least 3 rules expected: the internal repeat plus the two
        // rewritten existing phrases that reference it.
        assert!(result.rules.len() >= 3);
    }
}
