//! A round's dictionary: the concatenation of every distinct phrase
//! discovered by the hashing stage, each stored reverse-order (as the hash
//! table keys them) and terminated by a shared end-marker symbol strictly
//! greater than any symbol appearing inside a phrase. Read-only once built;
//! consumed entirely by [`crate::rank`] and discarded at round end.

use crate::hash_table::PhraseHashTable;
use crate::parser::Symbol;

pub struct Dictionary {
    /// Concatenated reverse-order phrases, each followed by `end_marker`.
    pub data: Vec<Symbol>,
    /// `d_lim[j]` is set iff `data[j]` is the terminator of its phrase.
    pub d_lim: Vec<bool>,
    /// Starting offset of each phrase in `data`, sorted by phrase content
    /// so two runs over the same phrase set produce the same dictionary
    /// byte-for-byte (the round's determinism property depends on this).
    pub phrase_starts: Vec<usize>,
    pub end_marker: Symbol,
}

impl Dictionary {
    /// Builds the dictionary from the round's merged hash table. `max_symbol`
    /// is the largest symbol id in use before this round; the end marker is
    /// one past it, which is also one past every symbol that can appear
    /// inside a phrase (phrases only ever reference ids `<= max_symbol`).
    pub fn build(table: &PhraseHashTable, max_symbol: Symbol) -> Self {
        let mut keys: Vec<&[Symbol]> = table.iter().map(|(k, _)| k).collect();
        keys.sort();

        let end_marker = max_symbol + 1;
        let mut data = Vec::new();
        let mut d_lim = Vec::new();
        let mut phrase_starts = Vec::with_capacity(keys.len());

        for key in keys {
            phrase_starts.push(data.len());
            for &s in key {
                data.push(s);
                d_lim.push(false);
            }
            data.push(end_marker);
            d_lim.push(true);
        }

        Dictionary { data, d_lim, phrase_starts, end_marker }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `true` iff `p` is the first position of some phrase (position 0 or
    /// immediately following another phrase's terminator).
    pub fn is_phrase_start(&self, p: usize) -> bool {
        p == 0 || self.d_lim[p - 1]
    }

    /// The reversed phrase key occupying `[start, end)` of `data`, where
    /// `end` is the index of its terminator (exclusive of the terminator).
    pub fn phrase_at(&self, start: usize) -> &[Symbol] {
        let mut end = start;
        while !self.d_lim[end] {
            end += 1;
        }
        &self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_orders_phrases_and_marks_terminators() {
        let mut t = PhraseHashTable::new();
        t.insert(&[2, 1]); // reverse of "12"
        t.insert(&[1]);
        let dict = Dictionary::build(&t, 5);

        assert_eq!(dict.end_marker, 6);
        // phrase "1" sorts before phrase "2,1" lexicographically.
        assert_eq!(dict.phrase_starts.len(), 2);
        assert!(dict.is_phrase_start(0));
        assert_eq!(dict.phrase_at(dict.phrase_starts[0]), &[1]);
    }

    #[test]
    fn is_phrase_start_detects_boundaries() {
        let mut t = PhraseHashTable::new();
        t.insert(&[1, 2]);
        t.insert(&[3]);
        let dict = Dictionary::build(&t, 10);
        for &start in &dict.phrase_starts {
            assert!(dict.is_phrase_start(start));
        }
    }
}
