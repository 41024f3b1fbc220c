//! Locally consistent phrase parsing (see the dictionary ranking procedure in
//! [`crate::rank`] for what happens to the phrases this produces).
//!
//! The parser classifies every position of a symbol stream as S-type or
//! L-type by comparing suffixes, then cuts at leftmost-S-type (LMS)
//! positions. Two identical sub-sequences always induce the same internal
//! cuts (local consistency), so repeated substrings parse into identical
//! phrases and can be collapsed by the hash table.
//!
//! Round 1 parses raw bytes (`Symbol` widened to `u64`); round ≥ 2 parses
//! the previous round's nonterminal ids. Both go through the same boundary
//! logic — only the input type differs, so there is one implementation
//! parameterized over `&[Symbol]`.

pub type Symbol = u64;

/// One maximal run of symbols between two successive LMS boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phrase {
    pub start: usize,
    pub end: usize,
}

impl Phrase {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Classifies every position as S-type (`true`) or L-type (`false`).
///
/// A trailing virtual sentinel smaller than every symbol is assumed past the
/// end of the slice, so the last real position is always S-type.
fn classify(symbols: &[Symbol]) -> Vec<bool> {
    let n = symbols.len();
    let mut s_type = vec![false; n];
    if n == 0 {
        return s_type;
    }
    s_type[n - 1] = true; // sentinel is smaller than everything, so n-1 is S-type
    for i in (0..n - 1).rev() {
        s_type[i] = match symbols[i].cmp(&symbols[i + 1]) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => s_type[i + 1],
        };
    }
    s_type
}

/// Positions `i` that are S-type with an L-type predecessor.
fn lms_positions(s_type: &[bool]) -> Vec<usize> {
    let mut out = Vec::new();
    for i in 1..s_type.len() {
        if s_type[i] && !s_type[i - 1] {
            out.push(i);
        }
    }
    out
}

/// Computes phrase boundaries for `symbols`: a sorted, deduplicated list of
/// cut points starting at `0` and ending at `symbols.len()`, such that every
/// `[boundaries[i], boundaries[i+1])` is one phrase.
///
/// A stream shorter than 2 symbols has no internal LMS boundary and parses
/// as a single phrase (progress still holds: nothing shorter exists to cut).
pub fn phrase_boundaries(symbols: &[Symbol]) -> Vec<usize> {
    let n = symbols.len();
    if n == 0 {
        return vec![0];
    }
    let s_type = classify(symbols);
    let mut bounds = lms_positions(&s_type);
    bounds.insert(0, 0);
    if *bounds.last().unwrap() != n {
        bounds.push(n);
    }
    bounds
}

/// Splits `symbols` into its phrases, in left-to-right order.
pub fn parse(symbols: &[Symbol]) -> Vec<Phrase> {
    let bounds = phrase_boundaries(symbols);
    bounds
        .windows(2)
        .map(|w| Phrase { start: w[0], end: w[1] })
        .collect()
}

/// Positions in `symbols` equal to `separator` — carried forward as suffix
/// positions so the pipeline can recover original string boundaries.
pub fn separator_positions(symbols: &[Symbol], separator: Symbol) -> Vec<usize> {
    symbols
        .iter()
        .enumerate()
        .filter(|(_, &s)| s == separator)
        .map(|(i, _)| i)
        .collect()
}

/// Splits `data` into `n_threads` contiguous ranges whose boundaries fall on
/// phrase cuts, so concatenating the per-range parses reproduces the parse
/// of the whole stream. Ranges are found by computing the full boundary set
/// once and snapping each naive equal-sized split point to the nearest
/// boundary at or after it.
pub fn partition_text(n_threads: usize, symbols: &[Symbol]) -> Vec<(usize, usize)> {
    let n = symbols.len();
    if n_threads <= 1 || n == 0 {
        return vec![(0, n)];
    }
    let bounds = phrase_boundaries(symbols);
    let chunk = (n + n_threads - 1) / n_threads;

    let mut cuts = vec![0usize];
    for t in 1..n_threads {
        let naive = t * chunk;
        if naive >= n {
            break;
        }
        // first boundary >= naive
        let snapped = *bounds.iter().find(|&&b| b >= naive).unwrap_or(&n);
        if snapped > *cuts.last().unwrap() && snapped < n {
            cuts.push(snapped);
        }
    }
    cuts.push(n);
    cuts.dedup();

    cuts.windows(2).map(|w| (w[0], w[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_single_empty_phrase() {
        let bounds = phrase_boundaries(&[]);
        assert_eq!(bounds, vec![0]);
    }

    #[test]
    fn single_symbol_is_one_phrase() {
        let phrases = parse(&[42]);
        assert_eq!(phrases, vec![Phrase { start: 0, end: 1 }]);
    }

    #[test]
    fn repeated_substring_parses_identically() {
        // "abcabcabc" as byte symbols; the "abc" repeats should induce
        // identical internal cuts wherever they occur.
        let s: Vec<Symbol> = "abcabcabc".bytes().map(|b| b as u64).collect();
        let phrases = parse(&s);
        // Reconstruct phrase byte slices and check every maximal "abc" phrase
        // (if any distinct-length-3 phrase repeats, it must repeat verbatim).
        let mut seen_by_len: std::collections::HashMap<usize, Vec<&[Symbol]>> =
            std::collections::HashMap::new();
        for p in &phrases {
            seen_by_len.entry(p.len()).or_default().push(&s[p.start..p.end]);
        }
        for (_, group) in seen_by_len {
            if group.len() > 1 {
                let first = group[0];
                assert!(group.iter().all(|g| *g == first));
            }
        }
        // Total length covered equals input length.
        let total: usize = phrases.iter().map(|p| p.len()).sum();
        assert_eq!(total, s.len());
    }

    #[test]
    fn parse_covers_whole_input_without_gaps_or_overlap() {
        let s: Vec<Symbol> = "mississippi".bytes().map(|b| b as u64).collect();
        let phrases = parse(&s);
        let mut pos = 0;
        for p in &phrases {
            assert_eq!(p.start, pos);
            assert!(p.end > p.start);
            pos = p.end;
        }
        assert_eq!(pos, s.len());
    }

    #[test]
    fn separator_positions_found() {
        let s: Vec<Symbol> = "ab\ncd\nab\n".bytes().map(|b| b as u64).collect();
        let seps = separator_positions(&s, b'\n' as u64);
        assert_eq!(seps, vec![2, 5, 8]);
    }

    #[test]
    fn partition_text_ranges_are_contiguous_and_cover_input() {
        let s: Vec<Symbol> = "abcabcabcabcabcabcabc".bytes().map(|b| b as u64).collect();
        let ranges = partition_text(3, &s);
        assert_eq!(ranges.first().unwrap().0, 0);
        assert_eq!(ranges.last().unwrap().1, s.len());
        for w in ranges.windows(2) {
            assert_eq!(w[0].1, w[1].0);
        }
    }

    #[test]
    fn partition_text_single_thread_is_whole_range() {
        let s: Vec<Symbol> = vec![1, 2, 3];
        assert_eq!(partition_text(1, &s), vec![(0, 3)]);
    }
}
