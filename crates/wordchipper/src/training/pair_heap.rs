//! # Pair Heap
//!
//! A lazy max-heap over pair frequencies, tie-broken by byte-lexicographic
//! order. Stale entries (whose stored frequency no longer matches the
//! live [`CorpusIndex::pair_counts`](crate::training::CorpusIndex::pair_counts))
//! are discarded lazily on pop rather than eagerly repaired; this is the
//! standard trade-off for a pair-merge heap that cannot efficiently
//! support decrease-key (a single merge dirties many pairs at once).

use core::cmp::Ordering;
use dary_heap::OctonaryHeap;

use crate::errors::{WCResult, WordchipperError};
use crate::types::{CommonHashMap, Pair};
use crate::vocab::Vocabulary;

/// One proposed merge candidate.
#[derive(Debug, Clone, Eq, PartialEq)]
struct HeapItem {
    /// The pair's frequency at the time it was pushed.
    freq: i64,

    /// The byte strings of the pair's two halves, at push time.
    ///
    /// Tie-break key: among pairs with equal frequency, the one whose
    /// `(bytes_a, bytes_b)` is lexicographically GREATER wins. This must
    /// be preserved bit-for-bit for reproducibility.
    pair_bytes: (Box<[u8]>, Box<[u8]>),

    /// The pair of ids this candidate would merge.
    pair: Pair,
}

impl Ord for HeapItem {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        // A standard max-heap pops the greatest element, so ordering this
        // ascending on (freq, pair_bytes) naturally yields: highest
        // frequency first, and on ties, the lexicographically greater
        // byte pair first.
        (self.freq, &self.pair_bytes).cmp(&(other.freq, &other.pair_bytes))
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A lazy max-heap over [`Pair`] frequencies.
#[derive(Default)]
pub struct PairHeap {
    heap: OctonaryHeap<HeapItem>,
    stale_pops: u64,
}

impl PairHeap {
    /// Build an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
            stale_pops: 0,
        }
    }

    /// Push a candidate pair at its current frequency.
    ///
    /// The heap is not deduplicated on insert: pushing a pair already
    /// present is legal and simply creates a second, possibly stale,
    /// entry that will be filtered out lazily by [`Self::pop_valid`].
    pub fn push(
        &mut self,
        pair: Pair,
        freq: i64,
        vocab: &Vocabulary,
    ) {
        let pair_bytes = (
            Box::from(vocab.bytes(pair.0)),
            Box::from(vocab.bytes(pair.1)),
        );
        self.heap.push(HeapItem {
            freq,
            pair_bytes,
            pair,
        });
    }

    /// Pop the highest-priority pair whose stored frequency still agrees
    /// with `pair_counts`, discarding stale entries along the way.
    ///
    /// ## Errors
    /// Returns [`WordchipperError::NoPairsRemaining`] once the heap is
    /// exhausted without finding a live entry.
    pub fn pop_valid(
        &mut self,
        pair_counts: &CommonHashMap<Pair, i64>,
    ) -> WCResult<Pair> {
        while let Some(top) = self.heap.pop() {
            let current = pair_counts.get(&top.pair).copied().unwrap_or(0);
            if current > 0 && current == top.freq {
                return Ok(top.pair);
            }
            // Stale: either the frequency drifted or the pair is dead.
            self.stale_pops += 1;
        }
        Err(WordchipperError::NoPairsRemaining)
    }

    /// The number of entries currently in the heap, live or stale.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the heap has no entries.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The number of stale entries discarded by [`Self::pop_valid`] so
    /// far, across the heap's lifetime (not reset by [`Self::compact`]).
    pub fn stale_pops(&self) -> u64 {
        self.stale_pops
    }

    /// Rebuild the heap from only the pairs currently live in
    /// `pair_counts`, discarding every stale entry outright rather than
    /// waiting for [`Self::pop_valid`] to filter them out one at a time.
    ///
    /// Returns the number of entries the heap held before compaction.
    fn compact(
        &mut self,
        pair_counts: &CommonHashMap<Pair, i64>,
        vocab: &Vocabulary,
    ) -> usize {
        let before = self.heap.len();
        self.heap.clear();
        for (&pair, &freq) in pair_counts.iter() {
            if freq > 0 {
                self.push(pair, freq, vocab);
            }
        }
        before
    }

    /// Compact the heap if its size exceeds `threshold_factor` times the
    /// number of distinct pairs tracked by `pair_counts`.
    ///
    /// This is the optional compaction pass described in spec §5: the
    /// lazy heap's stale-entry count is otherwise bounded only by the
    /// total number of dirtied-pair pushes across training, which can
    /// dominate memory on long runs over a corpus with many distinct
    /// pairs. A factor of 4 is the spec's suggested default.
    pub fn maybe_compact(
        &mut self,
        pair_counts: &CommonHashMap<Pair, i64>,
        vocab: &Vocabulary,
        threshold_factor: usize,
    ) {
        let live_bound = pair_counts.len();
        if live_bound == 0 || self.heap.len() <= live_bound.saturating_mul(threshold_factor) {
            return;
        }
        let before = self.compact(pair_counts, vocab);
        log::debug!(
            "pair heap compaction: {before} -> {} entries ({} stale pops so far)",
            self.heap.len(),
            self.stale_pops
        );
    }
}
