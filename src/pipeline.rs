//! Pipeline driver: iterates rounds until the parse is a single string,
//! appends that string as the start rule, and finalizes the round boundary
//! table (§4.6).

use crate::error::Result;
use crate::parser::{self, Symbol};
use crate::round::{self, Rule};

/// Number of distinct byte values a round-1 input is considered to use.
/// A fixed 256-entry alphabet keeps the terminal/nonterminal id mapping
/// uniform regardless of which bytes actually occur, at the cost of a few
/// always-unused identity rules for small inputs.
pub const SIGMA: Symbol = 256;

pub struct PipelineOutput {
    pub sigma: Symbol,
    /// Every rule (terminal identity rules, round rules, and the start
    /// rule), ordered by ascending id.
    pub rules: Vec<Rule>,
    /// `[b0, b1, ..., bR]`: `b0 == sigma`; the final entry is `start_symbol + 1`.
    pub round_boundaries: Vec<Symbol>,
    pub start_symbol: Symbol,
    /// Positions of each input string boundary, indexed into the start
    /// rule's right-hand side.
    pub suffix_positions: Vec<usize>,
    pub n_p_rounds: usize,
}

/// Builds the full grammar for `input`. `separator` marks string boundaries
/// in multi-string mode; `n_threads` is the per-round worker count.
pub fn build_grammar(input: &[u8], separator: u8, n_threads: usize) -> Result<PipelineOutput> {
    let mut rules: Vec<Rule> = (0..SIGMA).map(|b| (b, vec![b])).collect();

    let mut current: Vec<Symbol> = input.iter().map(|&b| b as u64).collect();
    let mut suffix_positions = parser::separator_positions(&current, separator as u64);

    let mut boundaries = vec![SIGMA];
    let mut max_symbol = SIGMA - 1;
    let mut n_p_rounds = 0usize;

    loop {
        if current.len() <= 1 {
            break;
        }
        let out = round::run_round(&current, max_symbol, &suffix_positions, n_threads)?;
        if !out.made_progress {
            break;
        }
        rules.extend(out.rules);
        boundaries.push(out.next_symbol + 1);
        max_symbol = out.next_symbol;
        current = out.parse;
        suffix_positions = out.suffix_positions;
        n_p_rounds += 1;
    }

    let start_symbol = max_symbol + 1;
    rules.push((start_symbol, current));
    boundaries.push(start_symbol + 1);

    Ok(PipelineOutput {
        sigma: SIGMA,
        rules,
        round_boundaries: boundaries,
        start_symbol,
        suffix_positions,
        n_p_rounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_zero_length_start_rule() {
        let out = build_grammar(b"", b'\n', 1).unwrap();
        assert_eq!(out.n_p_rounds, 0);
        let start_rule = out.rules.iter().find(|(id, _)| *id == out.start_symbol).unwrap();
        assert!(start_rule.1.is_empty());
    }

    #[test]
    fn repeated_pattern_yields_nonterminal_expanding_to_it() {
        let out = build_grammar(b"abcabcabc", b'\n', 1).unwrap();
        // Some rule's right-hand side, fully expanded one level (terminal ids
        // are < SIGMA and already literal bytes), should spell out "abc".
        let found = out.rules.iter().any(|(_, rhs)| {
            rhs.len() == 3
                && rhs.iter().all(|&s| s < SIGMA)
                && rhs.iter().map(|&s| s as u8).collect::<Vec<u8>>() == b"abc"
        });
        assert!(found, "expected some rule to directly spell \"abc\"");
    }

    #[test]
    fn dense_ranks_per_round_are_contiguous() {
        let out = build_grammar(b"aaaaaaaaaaaaaaaaaaaa", b'\n', 1).unwrap();
        for w in out.round_boundaries.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn monotone_ids_across_rounds() {
        let out = build_grammar(b"mississippi river mississippi river", b'\n', 2).unwrap();
        let mut ids: Vec<Symbol> = out.rules.iter().map(|(id, _)| *id).collect();
        let sorted = {
            let mut s = ids.clone();
            s.sort();
            s.dedup();
            s
        };
        ids.sort();
        assert_eq!(ids, sorted, "no duplicate ids across the whole grammar");
    }

    #[test]
    fn multi_string_boundaries_tracked() {
        let out = build_grammar(b"ab\ncd\nab\n", b'\n', 1).unwrap();
        assert_eq!(out.suffix_positions.len(), 3);
    }
}
