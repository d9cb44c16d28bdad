//! # Corpus Index
//!
//! The mutable state the merge loop rewrites: word frequencies, pair
//! frequencies, and the pair -> affected-words inverted index.

use crate::training::word::{pairs, Word};
use crate::types::{CommonHashMap, CommonHashSet, Pair};

/// The trainer's working state over the pre-tokenized corpus.
///
/// `word_counts`, `pair_counts`, and `pair_index` are kept mutually
/// consistent by [`crate::training::merge_engine::apply_merge`]; this
/// struct owns no other invariants.
#[derive(Debug, Default)]
pub struct CorpusIndex {
    /// Frequency of each live word.
    pub word_counts: CommonHashMap<Word, u64>,

    /// Occurrence count of each adjacent pair across all live words.
    ///
    /// Entries may transiently reach zero or go negative within a single
    /// merge step; such entries are logically absent.
    pub pair_counts: CommonHashMap<Pair, i64>,

    /// The set of live words containing each pair at least once.
    pub pair_index: CommonHashMap<Pair, CommonHashSet<Word>>,
}

impl CorpusIndex {
    /// Build a [`CorpusIndex`] from a pre-tokenized word-count multiset.
    ///
    /// Words of length < 2 contribute no pairs.
    pub fn from_word_counts(word_counts: CommonHashMap<Word, u64>) -> Self {
        let mut pair_counts: CommonHashMap<Pair, i64> =
            CommonHashMap::with_capacity_and_hasher(word_counts.len(), Default::default());
        let mut pair_index: CommonHashMap<Pair, CommonHashSet<Word>> =
            CommonHashMap::with_capacity_and_hasher(word_counts.len(), Default::default());

        for (word, &count) in word_counts.iter() {
            if word.len() < 2 || count == 0 {
                continue;
            }
            for pair in pairs(word) {
                *pair_counts.entry(pair).or_insert(0) += count as i64;
                pair_index.entry(pair).or_default().insert(word.clone());
            }
        }

        CorpusIndex {
            word_counts,
            pair_counts,
            pair_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::word::word_from_bytes;

    #[test]
    fn test_from_word_counts() {
        let mut word_counts: CommonHashMap<Word, u64> = CommonHashMap::default();
        word_counts.insert(word_from_bytes(b"hello"), 1);
        word_counts.insert(word_from_bytes(b"help"), 3);
        word_counts.insert(word_from_bytes(b"world"), 2);

        let index = CorpusIndex::from_word_counts(word_counts);

        let h = b'h' as u32;
        let e = b'e' as u32;
        let l = b'l' as u32;
        let o = b'o' as u32;
        let p = b'p' as u32;

        assert_eq!(index.pair_counts.get(&(h, e)), Some(&4));
        assert_eq!(index.pair_counts.get(&(e, l)), Some(&4));
        assert_eq!(index.pair_counts.get(&(l, l)), Some(&1));
        assert_eq!(index.pair_counts.get(&(l, o)), Some(&1));
        assert_eq!(index.pair_counts.get(&(l, p)), Some(&3));

        assert_eq!(
            index.pair_index.get(&(h, e)).unwrap().len(),
            2 // "hello" and "help"
        );
    }

    #[test]
    fn test_short_words_contribute_nothing() {
        let mut word_counts: CommonHashMap<Word, u64> = CommonHashMap::default();
        word_counts.insert(word_from_bytes(b"a"), 10);

        let index = CorpusIndex::from_word_counts(word_counts);
        assert!(index.pair_counts.is_empty());
        assert!(index.pair_index.is_empty());
    }
}
