//! Open-addressed phrase hash table.
//!
//! Keys are phrases stored **in reverse** (tail symbol first) — later rounds
//! detect phrase suffixes for run-length and suffix-pair compression, and
//! the algorithm reads right-to-left more naturally in that orientation.
//! Callers reverse before inserting and reverse again when emitting
//! forward-order output.
//!
//! Values are a single `u64`: bit 0 is a repeat flag consumed by the round
//! driver for run-length detection, the remaining 63 bits hold either an
//! occurrence counter (during hashing) or the assigned nonterminal id
//! (after ranking). This packing is load-bearing — downstream rounds read
//! the flag bit directly out of the stored value.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::parser::Symbol;

#[derive(Clone, Debug)]
struct Entry {
    key: Vec<Symbol>,
    value: u64,
}

/// One worker's local phrase table. Each hashing thread owns exactly one of
/// these; no mutation is ever shared across threads during a round.
pub struct PhraseHashTable {
    slots: Vec<Option<Entry>>,
    len: usize,
}

fn fnv1a(key: &[Symbol]) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &s in key {
        for b in s.to_le_bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
    }
    h
}

impl PhraseHashTable {
    pub fn new() -> Self {
        PhraseHashTable { slots: vec![None; 16], len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn probe(&self, key: &[Symbol]) -> usize {
        let cap = self.capacity();
        let mut idx = (fnv1a(key) as usize) & (cap - 1);
        loop {
            match &self.slots[idx] {
                None => return idx,
                Some(e) if e.key == key => return idx,
                Some(_) => idx = (idx + 1) & (cap - 1),
            }
        }
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity() * 2;
        let old = std::mem::replace(&mut self.slots, vec![None; new_capacity]);
        self.len = 0;
        for slot in old.into_iter().flatten() {
            self.insert_entry(slot.key, slot.value);
        }
    }

    fn insert_entry(&mut self, key: Vec<Symbol>, value: u64) -> usize {
        let idx = self.probe(&key);
        if self.slots[idx].is_none() {
            self.len += 1;
        }
        self.slots[idx] = Some(Entry { key, value });
        idx
    }

    /// Inserts `key` (already reversed) if absent, with initial value 0.
    /// Returns the slot index and whether this was a fresh insertion.
    ///
    /// *Out-of-memory* handling: callers that want spill-on-failure should
    /// catch an allocation failure around `grow` at the layer above; in
    /// safe Rust this surfaces as an abort, so this type instead exposes
    /// [`Self::should_spill`] as a capacity policy the round driver can
    /// check proactively.
    pub fn insert(&mut self, key: &[Symbol]) -> (usize, bool) {
        if self.len * 4 >= self.capacity() * 3 {
            self.grow();
        }
        let idx = self.probe(key);
        if self.slots[idx].is_none() {
            self.slots[idx] = Some(Entry { key: key.to_vec(), value: 0 });
            self.len += 1;
            (idx, true)
        } else {
            (idx, false)
        }
    }

    /// Advisory cap used by the round driver to decide when to spill a
    /// thread-local table to disk and start a fresh one.
    pub fn should_spill(&self, max_entries: usize) -> bool {
        self.len >= max_entries
    }

    /// Read-only slot lookup: returns the slot holding `key`, if present,
    /// without mutating the table. Safe to call concurrently from multiple
    /// rewrite workers sharing an immutable reference to the same table.
    pub fn find(&self, key: &[Symbol]) -> Option<usize> {
        let cap = self.capacity();
        let mut idx = (fnv1a(key) as usize) & (cap - 1);
        loop {
            match &self.slots[idx] {
                None => return None,
                Some(e) if e.key == key => return Some(idx),
                Some(_) => idx = (idx + 1) & (cap - 1),
            }
        }
    }

    pub fn get_value(&self, slot: usize) -> u64 {
        self.slots[slot].as_ref().expect("empty slot").value
    }

    pub fn set_value(&mut self, slot: usize, val: u64) {
        self.slots[slot].as_mut().expect("empty slot").value = val;
    }

    pub fn key(&self, slot: usize) -> &[Symbol] {
        &self.slots[slot].as_ref().expect("empty slot").key
    }

    /// Bumps the repeat counter held in the upper 63 bits of a slot's value,
    /// leaving the low repeat-flag bit untouched.
    pub fn bump_counter(&mut self, slot: usize) {
        let v = self.get_value(slot);
        let flag = v & 1;
        let count = v >> 1;
        self.set_value(slot, ((count + 1) << 1) | flag);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Symbol], u64)> {
        self.slots.iter().flatten().map(|e| (e.key.as_slice(), e.value))
    }

    /// Writes every `(key_len, key..., value)` triple to `path` and empties
    /// the in-memory table. Used both for out-of-memory spilling and for
    /// persisting thread-local dump files that the merge step reads back.
    pub fn spill(&mut self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        for (key, value) in self.iter() {
            w.write_all(&(key.len() as u64).to_le_bytes())?;
            for &s in key {
                w.write_all(&s.to_le_bytes())?;
            }
            w.write_all(&value.to_le_bytes())?;
        }
        w.flush()?;
        *self = PhraseHashTable::new();
        Ok(())
    }

    /// Loads a previously spilled table, merging into the current contents
    /// (counters of keys present in both are summed).
    pub fn load_merge(&mut self, path: &Path) -> io::Result<()> {
        let file = File::open(path)?;
        let mut r = BufReader::new(file);
        let mut len_buf = [0u8; 8];
        loop {
            match r.read_exact(&mut len_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
            let klen = u64::from_le_bytes(len_buf) as usize;
            let mut key = Vec::with_capacity(klen);
            for _ in 0..klen {
                let mut sb = [0u8; 8];
                r.read_exact(&mut sb)?;
                key.push(u64::from_le_bytes(sb));
            }
            let mut vb = [0u8; 8];
            r.read_exact(&mut vb)?;
            let value = u64::from_le_bytes(vb);

            let (idx, inserted) = self.insert(&key);
            if inserted {
                self.set_value(idx, value);
            } else {
                let flag = value & 1;
                let cur = self.get_value(idx);
                self.set_value(idx, (((cur >> 1) + (value >> 1)) << 1) | flag | (cur & 1));
            }
        }
        Ok(())
    }
}

impl Default for PhraseHashTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds a set of per-thread tables (built during the hashing stage, one
/// per worker, no shared mutation) into a single canonical table, summing
/// counters for keys seen by more than one worker. Run single-threaded by
/// the round driver's main thread after all hashing workers join.
pub fn merge_tables(tables: Vec<PhraseHashTable>) -> PhraseHashTable {
    let mut merged = PhraseHashTable::new();
    for t in tables {
        for (key, value) in t.iter() {
            let (idx, inserted) = merged.insert(key);
            if inserted {
                merged.set_value(idx, value);
            } else {
                let cur = merged.get_value(idx);
                let flag = cur & 1 | value & 1;
                merged.set_value(idx, (((cur >> 1) + (value >> 1)) << 1) | flag);
            }
        }
    }
    merged
}
