//! Burrows-Wheeler transform builder — one of the external collaborators
//! the grammar pipeline feeds into. Operates on the fully decompressed text
//! (or an individual string, selected by suffix position) rather than
//! transforming the grammar directly.

use crate::grammar::Grammar;
use crate::parser::Symbol;
use crate::suffix_sort::suffix_array;
use crate::{decompress, error::Result};

pub struct Bwt {
    pub bytes: Vec<u8>,
    /// Row of the (conceptual) rotation matrix holding the original text,
    /// i.e. the index in the suffix array where the sentinel-terminated
    /// suffix starts at position 0.
    pub primary_index: usize,
}

/// A sentinel one past the byte range, guaranteeing it sorts after every
/// real byte — mirrors the dictionary's end-marker convention.
const SENTINEL: Symbol = 256;

/// Builds the BWT of `text`.
pub fn build(text: &[u8]) -> Bwt {
    if text.is_empty() {
        return Bwt { bytes: Vec::new(), primary_index: 0 };
    }
    let mut data: Vec<Symbol> = text.iter().map(|&b| b as Symbol).collect();
    data.push(SENTINEL);

    let sa = suffix_array(&data);
    let n = data.len();

    let mut bytes = Vec::with_capacity(n);
    let mut primary_index = 0;
    for (row, &p) in sa.iter().enumerate() {
        if p == 0 {
            primary_index = row;
        }
        let prev = if p == 0 { data[n - 1] } else { data[p - 1] };
        bytes.push(if prev == SENTINEL { 0 } else { prev as u8 });
    }
    Bwt { bytes, primary_index }
}

/// Builds the BWT directly from a finished grammar, by first decompressing it.
pub fn build_from_grammar(grammar: &Grammar) -> Result<Bwt> {
    Ok(build(&decompress::decompress(grammar)))
}

/// Inverts a BWT produced by [`build`] back to the original text.
pub fn invert(bwt: &Bwt) -> Vec<u8> {
    let n = bwt.bytes.len();
    if n == 0 {
        return Vec::new();
    }
    // Standard LF-mapping inverse: rank each BWT byte by its occurrence
    // count among equal bytes seen so far, then walk next[] from the
    // primary index, collecting characters except the synthetic sentinel.
    let mut counts = [0usize; 257];
    let mut lf = vec![0usize; n];
    let mut first_occurrence = [0usize; 257];

    for &b in &bwt.bytes {
        counts[b as usize] += 1;
    }
    let mut total = 0;
    for c in 0..257 {
        first_occurrence[c] = total;
        total += counts[c];
    }

    let mut running = [0usize; 257];
    for (i, &b) in bwt.bytes.iter().enumerate() {
        lf[i] = first_occurrence[b as usize] + running[b as usize];
        running[b as usize] += 1;
    }

    let mut out = Vec::with_capacity(n - 1);
    let mut row = bwt.primary_index;
    for _ in 0..n - 1 {
        row = lf[row];
        out.push(bwt.bytes[row]);
    }
    out.reverse();
    out
}
