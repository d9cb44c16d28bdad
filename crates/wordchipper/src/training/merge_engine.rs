//! # Merge Engine
//!
//! Executes one merge step against a [`CorpusIndex`], pushing every
//! dirtied pair back onto the [`PairHeap`] with its refreshed frequency.

use crate::training::corpus_index::CorpusIndex;
use crate::training::pair_heap::PairHeap;
use crate::training::word::{merge_pair, pairs};
use crate::types::{CommonHashSet, Pair, TokenId};
use crate::vocab::Vocabulary;

/// Apply one merge step: `target_pair -> new_id`.
///
/// Rewrites every live word containing `target_pair` and keeps
/// `index.word_counts`, `index.pair_counts`, and `index.pair_index`
/// mutually consistent; pushes every pair whose count changed back onto
/// `heap` at its post-step frequency.
///
/// ## Invariants established on return
/// * `index.pair_counts` and `index.pair_index` agree with
///   `index.word_counts`.
/// * `target_pair`'s count is `0` (or absent): the scan in
///   [`merge_pair`] is exhaustive, so no occurrence of `target_pair`
///   survives in any rewritten word.
pub fn apply_merge(
    index: &mut CorpusIndex,
    heap: &mut PairHeap,
    vocab: &Vocabulary,
    target_pair: Pair,
    new_id: TokenId,
) {
    // Snapshot: mutation during iteration is forbidden.
    let affected: Vec<_> = index
        .pair_index
        .get(&target_pair)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();

    let mut dirtied: CommonHashSet<Pair> = CommonHashSet::default();

    for word in affected {
        let Some(&freq) = index.word_counts.get(&word) else {
            continue;
        };
        if freq == 0 {
            continue;
        }

        index.word_counts.remove(&word);

        for pair in pairs(&word) {
            *index.pair_counts.entry(pair).or_insert(0) -= freq as i64;
            if let Some(set) = index.pair_index.get_mut(&pair) {
                set.remove(&word);
                if set.is_empty() {
                    index.pair_index.remove(&pair);
                }
            }
            dirtied.insert(pair);
        }

        let new_word = merge_pair(&word, target_pair, new_id);

        *index.word_counts.entry(new_word.clone()).or_insert(0) += freq;

        if new_word.len() >= 2 {
            for pair in pairs(&new_word) {
                *index.pair_counts.entry(pair).or_insert(0) += freq as i64;
                index
                    .pair_index
                    .entry(pair)
                    .or_default()
                    .insert(new_word.clone());
                dirtied.insert(pair);
            }
        }
    }

    for pair in dirtied {
        let freq = index.pair_counts.get(&pair).copied().unwrap_or(0);
        if freq > 0 {
            heap.push(pair, freq, vocab);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::word::word_from_bytes;
    use crate::types::CommonHashMap;

    #[test]
    fn test_step_rewrites_words_and_counts() {
        let vocab = Vocabulary::with_specials::<&str>(&[]);

        let mut word_counts: CommonHashMap<_, u64> = CommonHashMap::default();
        word_counts.insert(word_from_bytes(b"aaa"), 3);
        word_counts.insert(word_from_bytes(b"aab"), 2);

        let mut index = CorpusIndex::from_word_counts(word_counts);
        let mut heap = PairHeap::default();

        let a = b'a' as u32;
        let new_id = 300u32;

        apply_merge(&mut index, &mut heap, &vocab, (a, a), new_id);

        // "aaa" (freq 3) -> [new_id, a]
        // "aab" (freq 2) -> [new_id, b]
        assert_eq!(
            index.word_counts.get(&*Box::<[u32]>::from([new_id, a])),
            Some(&3)
        );
        assert_eq!(
            index
                .word_counts
                .get(&*Box::<[u32]>::from([new_id, b'b' as u32])),
            Some(&2)
        );

        // target pair is fully gone.
        assert_eq!(index.pair_counts.get(&(a, a)).copied().unwrap_or(0), 0);
    }

    #[test]
    fn test_step_coalesces_into_existing_word() {
        let vocab = Vocabulary::with_specials::<&str>(&[]);

        // A word already reduced to [1, 9, 9] by earlier (simulated)
        // merges, and a still-raw word that, once (2, 2) -> 9 is applied,
        // reduces to that exact same sequence. Their frequencies must
        // coalesce into a single WordCounts entry.
        let mut word_counts: CommonHashMap<Box<[u32]>, u64> = CommonHashMap::default();
        word_counts.insert(Box::from([1u32, 9, 9]), 10);
        word_counts.insert(Box::from([1u32, 2, 2, 2, 2]), 3);

        let mut index = CorpusIndex::from_word_counts(word_counts);
        let mut heap = PairHeap::default();

        apply_merge(&mut index, &mut heap, &vocab, (2, 2), 9);

        assert_eq!(index.word_counts.len(), 1);
        assert_eq!(
            index.word_counts.get(&*Box::<[u32]>::from([1u32, 9, 9])),
            Some(&13)
        );
    }
}
