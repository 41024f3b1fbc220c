//! Locally consistent grammar compression over byte texts.
//!
//! Builds a context-free grammar that losslessly encodes a (possibly
//! multi-string) byte text by iterating locally-consistent parsing rounds
//! to a fixed point, then offers random-access decompression and a BWT
//! transform over the finished grammar. See [`pipeline::build_grammar`] for
//! the entry point.

pub mod bwt;
pub mod cli;
pub mod config;
pub mod decompress;
pub mod dictionary;
pub mod error;
pub mod grammar;
pub mod hash_table;
pub mod io;
pub mod packed;
pub mod parser;
pub mod pipeline;
pub mod rank;
pub mod round;
pub mod suffix_sort;
pub mod tempdir;
pub mod timefn;
pub mod util;

pub use error::{GramError, Result};
pub use grammar::Grammar;
pub use pipeline::build_grammar;

/// Compresses `input` into a finished [`Grammar`].
pub fn compress(input: &[u8], separator: u8, n_threads: usize, comp_level: u8) -> Result<Grammar> {
    let out = pipeline::build_grammar(input, separator, n_threads)?;
    Grammar::from_pipeline(out, comp_level)
}

/// Decompresses `grammar` back into its original bytes.
pub fn decompress(grammar: &Grammar) -> Vec<u8> {
    decompress::decompress(grammar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_then_decompress_round_trips() {
        let grammar = compress(b"abcabcabc", b'\n', 1, 1).unwrap();
        assert_eq!(decompress(&grammar), b"abcabcabc");
    }
}
