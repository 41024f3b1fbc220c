//! The finished grammar container: parallel index arrays over a flat rule
//! stream rather than a pointer graph (see Design Notes — "cyclic
//! references"). A rule "owns" the slice of the rule stream between its
//! start offset and the next rule's start offset; nothing is ever
//! materialized as a tree.

use std::io::{self, Read, Write};

use crate::error::{GramError, Result};
use crate::packed::{width_for_max, BitVector, IntVector};
use crate::parser::Symbol;
use crate::pipeline::PipelineOutput;

pub struct Grammar {
    pub comp_level: u8,
    pub sigma: Symbol,
    pub max_tsym: Symbol,
    pub n_p_rounds: usize,
    pub start_symbol: Symbol,
    /// Terminal id -> original byte. Identity for this crate's fixed
    /// 256-entry alphabet, but kept explicit so the container format does
    /// not assume it.
    pub symbol_map: Vec<u8>,
    pub round_boundaries: Vec<Symbol>,
    /// Flattened right-hand sides of every rule, in ascending id order.
    pub rule_stream: IntVector,
    /// `true` at the last symbol of each rule's right-hand side.
    pub rule_limits: BitVector,
    /// `nter_ptr[id]` is the offset of rule `id`'s first symbol in
    /// `rule_stream`; `nter_ptr[R]` is a sentinel equal to `G`.
    pub nter_ptr: Vec<usize>,
    pub suffix_positions: Vec<usize>,
}

impl Grammar {
    pub fn from_pipeline(out: PipelineOutput, comp_level: u8) -> Result<Self> {
        if comp_level != 1 && comp_level != 2 {
            return Err(GramError::UnsupportedVersion(comp_level));
        }
        let r = out.rules.len() as u64;
        let g: usize = out.rules.iter().map(|(_, rhs)| rhs.len()).sum();
        let width = width_for_max(r) + 1;

        let mut rule_stream = IntVector::new(width.max(1));
        let mut rule_limits = BitVector::new(1);
        let mut nter_ptr = Vec::with_capacity(out.rules.len() + 1);

        for (_, rhs) in &out.rules {
            nter_ptr.push(rule_stream.len());
            if rhs.is_empty() {
                continue;
            }
            for (i, &s) in rhs.iter().enumerate() {
                rule_stream.append(s)?;
                rule_limits.append((i == rhs.len() - 1) as u64)?;
            }
        }
        nter_ptr.push(rule_stream.len());
        debug_assert_eq!(rule_stream.len(), g);

        Ok(Grammar {
            comp_level,
            sigma: out.sigma,
            max_tsym: out.sigma - 1,
            n_p_rounds: out.n_p_rounds,
            start_symbol: out.start_symbol,
            symbol_map: (0..out.sigma).map(|b| b as u8).collect(),
            round_boundaries: out.round_boundaries,
            rule_stream,
            rule_limits,
            nter_ptr,
            suffix_positions: out.suffix_positions,
        })
    }

    #[inline]
    pub fn is_terminal(&self, sym: Symbol) -> bool {
        sym < self.sigma
    }

    /// Number of rules stored (including terminal identity rules and the
    /// start rule).
    pub fn rule_count(&self) -> usize {
        self.nter_ptr.len() - 1
    }

    /// Materializes rule `id`'s right-hand side. Cheap for the short
    /// per-round rules this grammar produces; the decompression walker
    /// never calls this on the start rule directly for large inputs.
    pub fn rule_rhs(&self, id: Symbol) -> Vec<Symbol> {
        let start = self.nter_ptr[id as usize];
        let end = self.nter_ptr[id as usize + 1];
        (start..end).map(|i| self.rule_stream.get(i)).collect()
    }

    /// Grammar size: total length of the flattened rule stream (`G`).
    pub fn grammar_size(&self) -> usize {
        self.rule_stream.len()
    }

    /// Start rule length (`C`).
    pub fn start_rule_len(&self) -> usize {
        let id = self.start_symbol;
        self.nter_ptr[id as usize + 1] - self.nter_ptr[id as usize]
    }

    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&[self.comp_level])?;
        out.write_all(&self.sigma.to_le_bytes())?;
        out.write_all(&(self.rule_count() as u64).to_le_bytes())?;
        out.write_all(&(self.grammar_size() as u64).to_le_bytes())?;
        out.write_all(&(self.start_rule_len() as u64).to_le_bytes())?;
        out.write_all(&self.max_tsym.to_le_bytes())?;
        out.write_all(&(self.n_p_rounds as u64).to_le_bytes())?;
        out.write_all(&self.start_symbol.to_le_bytes())?;

        out.write_all(&self.symbol_map)?;

        out.write_all(&(self.round_boundaries.len() as u64).to_le_bytes())?;
        for b in &self.round_boundaries {
            out.write_all(&b.to_le_bytes())?;
        }

        self.rule_stream.serialize(out)?;
        self.rule_limits.serialize(out)?;

        out.write_all(&(self.nter_ptr.len() as u64).to_le_bytes())?;
        for &p in &self.nter_ptr {
            out.write_all(&(p as u64).to_le_bytes())?;
        }

        out.write_all(&(self.suffix_positions.len() as u64).to_le_bytes())?;
        for &p in &self.suffix_positions {
            out.write_all(&(p as u64).to_le_bytes())?;
        }
        Ok(())
    }

    pub fn deserialize<R: Read>(inp: &mut R) -> Result<Self> {
        let mut byte = [0u8; 1];
        inp.read_exact(&mut byte)?;
        let comp_level = byte[0];
        if comp_level != 1 && comp_level != 2 {
            return Err(GramError::UnsupportedVersion(comp_level));
        }

        let sigma = read_u64(inp)?;
        let _r = read_u64(inp)?;
        let _g = read_u64(inp)?;
        let _c = read_u64(inp)?;
        let max_tsym = read_u64(inp)?;
        let n_p_rounds = read_u64(inp)? as usize;
        let start_symbol = read_u64(inp)?;

        let mut symbol_map = vec![0u8; sigma as usize];
        inp.read_exact(&mut symbol_map)?;

        let n_boundaries = read_u64(inp)? as usize;
        let mut round_boundaries = Vec::with_capacity(n_boundaries);
        for _ in 0..n_boundaries {
            round_boundaries.push(read_u64(inp)?);
        }

        let rule_stream = IntVector::deserialize(inp)?;
        let rule_limits = BitVector::deserialize(inp)?;

        let n_ptr = read_u64(inp)? as usize;
        let mut nter_ptr = Vec::with_capacity(n_ptr);
        for _ in 0..n_ptr {
            nter_ptr.push(read_u64(inp)? as usize);
        }

        let n_suffix = read_u64(inp)? as usize;
        let mut suffix_positions = Vec::with_capacity(n_suffix);
        for _ in 0..n_suffix {
            suffix_positions.push(read_u64(inp)? as usize);
        }

        Ok(Grammar {
            comp_level,
            sigma,
            max_tsym,
            n_p_rounds,
            start_symbol,
            symbol_map,
            round_boundaries,
            rule_stream,
            rule_limits,
            nter_ptr,
            suffix_positions,
        })
    }
}

fn read_u64<R: Read>(inp: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    inp.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::build_grammar;

    #[test]
    fn from_pipeline_produces_dense_nter_ptr() {
        let out = build_grammar(b"abcabcabc", b'\n', 1).unwrap();
        let grammar = Grammar::from_pipeline(out, 1).unwrap();
        assert_eq!(grammar.nter_ptr.len(), grammar.rule_count() + 1);
        for w in grammar.nter_ptr.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn serialize_round_trip() {
        let out = build_grammar(b"hello world hello world", b'\n', 1).unwrap();
        let grammar = Grammar::from_pipeline(out, 1).unwrap();

        let mut buf = Vec::new();
        grammar.serialize(&mut buf).unwrap();
        let loaded = Grammar::deserialize(&mut &buf[..]).unwrap();

        assert_eq!(loaded.sigma, grammar.sigma);
        assert_eq!(loaded.start_symbol, grammar.start_symbol);
        assert_eq!(loaded.rule_count(), grammar.rule_count());
        assert_eq!(loaded.rule_rhs(grammar.start_symbol), grammar.rule_rhs(grammar.start_symbol));
    }

    #[test]
    fn rejects_unsupported_compression_level() {
        let out = build_grammar(b"abc", b'\n', 1).unwrap();
        assert!(matches!(Grammar::from_pipeline(out, 3), Err(GramError::UnsupportedVersion(3))));
    }
}
