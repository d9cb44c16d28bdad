//! # Trainer
//!
//! The top-level BPE training loop: wires [`ParallelPreTokDriver`](crate::training::parallel_pretok),
//! [`CorpusIndex`], [`PairHeap`], and [`MergeEngine`](crate::training::merge_engine)
//! together to turn a text corpus into a `(Vocabulary, Merges)` pair.

use std::path::Path;

use crate::errors::{WCResult, WordchipperError};
use crate::pretokenizer::PreTokenizerOptions;
use crate::training::corpus_index::CorpusIndex;
use crate::training::merge_engine::apply_merge;
use crate::training::pair_heap::PairHeap;
use crate::training::parallel_pretok::{parallel_pretokenize, ParallelPreTokOptions};
use crate::training::word::word_from_bytes;
use crate::vocab::{Merges, Vocabulary};

/// Configuration for a single training run.
///
/// Follows the teacher crate's `with_*`-method builder convention
/// (small, `Clone`-able value structs, not a generic builder trait).
#[derive(Debug, Clone)]
pub struct TrainerOptions {
    /// Target vocabulary size, including the 256 byte entries and the
    /// special tokens.
    pub vocab_size: usize,

    /// Special tokens, in the order they should be assigned ids
    /// `256, 257, ...`.
    pub special_tokens: Vec<String>,

    /// The byte string chunk boundaries are snapped to during parallel
    /// pre-tokenization. Has no semantic effect on the trained result.
    pub split_special_token: Vec<u8>,

    /// A hint for how many parallel pre-tokenization chunks to attempt.
    /// The driver may silently use fewer.
    pub desired_num_chunks: usize,
}

impl TrainerOptions {
    /// Create new options with sensible defaults for
    /// `split_special_token` (`b"\n"`) and `desired_num_chunks` (the
    /// number of available CPUs).
    pub fn new(
        vocab_size: usize,
        special_tokens: Vec<String>,
    ) -> Self {
        Self {
            vocab_size,
            special_tokens,
            split_special_token: b"\n".to_vec(),
            desired_num_chunks: rayon::current_num_threads(),
        }
    }

    /// Set the chunk-split token used to align parallel worker
    /// boundaries.
    pub fn with_split_special_token(
        mut self,
        token: impl Into<Vec<u8>>,
    ) -> Self {
        self.split_special_token = token.into();
        self
    }

    /// Set the desired number of parallel pre-tokenization chunks.
    pub fn with_desired_num_chunks(
        mut self,
        desired_num_chunks: usize,
    ) -> Self {
        self.desired_num_chunks = desired_num_chunks;
        self
    }
}

/// The result of a training run.
#[derive(Debug, Clone)]
pub struct TrainResults {
    /// The trained vocabulary, `256 + specials.len() + merges.len()`
    /// entries.
    pub vocab: Vocabulary,

    /// The learned merge rules, in training order.
    pub merges: Merges,
}

/// Train a BPE vocabulary from a text corpus file.
///
/// Implements the top-level loop from the spec: build the initial
/// vocabulary, pre-tokenize the corpus in parallel, build the corpus
/// index and heap, then repeatedly pop the best valid pair, mint a new
/// vocabulary entry for it, and apply the merge — until `vocab_size` is
/// reached or the heap runs dry (early termination is a normal outcome,
/// not an error).
///
/// ## Errors
/// Returns [`WordchipperError::VocabTooSmall`] if `options.vocab_size` is
/// below `256 + special_tokens.len()`, or propagates I/O/encoding errors
/// from the parallel pre-tokenization driver.
pub fn train<P: AsRef<Path>>(
    input_path: P,
    options: &TrainerOptions,
) -> WCResult<TrainResults> {
    let mut vocab = Vocabulary::with_specials(&options.special_tokens);

    if options.vocab_size < vocab.len() {
        return Err(WordchipperError::VocabTooSmall {
            requested: options.vocab_size,
            specials: options.special_tokens.len(),
        });
    }
    let num_merges = options.vocab_size - vocab.len();

    log::info!(
        "starting BPE training: {num_merges} merges to compute (target vocab {})",
        options.vocab_size
    );

    let pretokenizer =
        PreTokenizerOptions::new(options.special_tokens.clone()).build();

    let pretok_options = ParallelPreTokOptions::new(options.desired_num_chunks)
        .with_split_token(options.split_special_token.clone());
    let byte_word_counts = parallel_pretokenize(input_path, &pretokenizer, &pretok_options)?;

    log::info!(
        "building corpus index over {} distinct words",
        byte_word_counts.len()
    );

    let word_counts = byte_word_counts
        .into_iter()
        .map(|(bytes, count)| (word_from_bytes(&bytes), count))
        .collect();

    let mut index = CorpusIndex::from_word_counts(word_counts);

    let mut heap = PairHeap::with_capacity(index.pair_counts.len());
    for (&pair, &count) in index.pair_counts.iter() {
        if count > 0 {
            heap.push(pair, count, &vocab);
        }
    }

    let mut merges: Merges = Vec::with_capacity(num_merges);
    let mut last_log_percent = 0;

    for i in 0..num_merges {
        let pair = match heap.pop_valid(&index.pair_counts) {
            Ok(pair) => pair,
            Err(WordchipperError::NoPairsRemaining) => {
                log::info!("heap exhausted after {i}/{num_merges} merges; stopping early");
                break;
            }
            Err(e) => return Err(e),
        };

        let (a_bytes, b_bytes) = (vocab.bytes(pair.0).to_vec(), vocab.bytes(pair.1).to_vec());
        let new_id = vocab.push_merge(pair.0, pair.1);
        merges.push((a_bytes.into_boxed_slice(), b_bytes.into_boxed_slice()));

        apply_merge(&mut index, &mut heap, &vocab, pair, new_id);
        heap.maybe_compact(&index.pair_counts, &vocab, 4);

        let percent = ((i + 1) * 100) / num_merges.max(1);
        if percent > last_log_percent {
            log::info!("progress: {percent}% ({}/{num_merges} merges)", i + 1);
            last_log_percent = percent;
        }
    }

    log::info!(
        "finished training: {} merges completed, final vocab size {}",
        merges.len(),
        vocab.len()
    );
    log::debug!("pair heap stale pops over run: {}", heap.stale_pops());

    Ok(TrainResults { vocab, merges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn corpus_file(dir: &tempdir::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("corpus.txt");
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_vocab_too_small() {
        let dir = tempdir::TempDir::new("wordchipper-test").unwrap();
        let path = corpus_file(&dir, "hello world");

        let options = TrainerOptions::new(200, vec!["<|endoftext|>".to_string()]);
        let result = train(&path, &options);
        assert!(matches!(
            result,
            Err(WordchipperError::VocabTooSmall { .. })
        ));
    }

    #[test]
    fn test_classic_aaabdaaabac_example() {
        let dir = tempdir::TempDir::new("wordchipper-test").unwrap();
        let path = corpus_file(&dir, "aaabdaaabac");

        // Each ASCII char is its own "word" under the GPT-2 regex? No:
        // the word regex groups contiguous letters, so "aaabdaaabac" is
        // one single word/fragment (no spaces, all letters).
        let options = TrainerOptions::new(256 + 3, vec![]);
        let results = train(&path, &options).unwrap();

        assert_eq!(results.merges.len(), 3);

        // First merge: 'a' + 'a' (freq 4 within "aaabdaaabac": positions
        // 0-1, 1-2(? no overlap), ... verified by the non-overlapping
        // greedy scan used throughout).
        let (a, b) = &results.merges[0];
        assert_eq!((a.as_ref(), b.as_ref()), (b"a".as_ref(), b"a".as_ref()));
    }

    #[test]
    fn test_newest_example_reduces_token_count() {
        let dir = tempdir::TempDir::new("wordchipper-test").unwrap();
        let content = "low low low low low lower lower widest widest widest \
                        newest newest newest newest newest newest";
        let path = corpus_file(&dir, content);

        let options = TrainerOptions::new(256 + 6, vec!["<|endoftext|>".to_string()]);
        let results = train(&path, &options).unwrap();

        assert_eq!(results.merges.len(), 6);
        assert!(results.vocab.len() <= options.vocab_size);
    }

    #[test]
    fn test_training_is_worker_count_independent() {
        let dir = tempdir::TempDir::new("wordchipper-test").unwrap();
        let content = "low low low low low lower lower widest widest widest \
                        newest newest newest newest newest newest\n"
            .repeat(20);
        let path = corpus_file(&dir, &content);

        let mut options_1 = TrainerOptions::new(256 + 10, vec![]);
        options_1.desired_num_chunks = 1;
        let mut options_8 = options_1.clone();
        options_8.desired_num_chunks = 8;

        let r1 = train(&path, &options_1).unwrap();
        let r8 = train(&path, &options_8).unwrap();

        assert_eq!(r1.merges, r8.merges);
        assert_eq!(r1.vocab.len(), r8.vocab.len());
    }

    const PROP_WORDS: &[&str] = &[
        "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "low", "lower", "newest",
        "widest", "a", "an", "to", "of", "and",
    ];

    fn arbitrary_corpus(word_indices: &[usize]) -> String {
        word_indices
            .iter()
            .map(|&i| PROP_WORDS[i % PROP_WORDS.len()])
            .collect::<Vec<_>>()
            .join(" ")
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(32))]

        /// `|Vocabulary| <= vocab_size`, and the merges learned are always
        /// exactly `|Vocabulary| - 256 - |specials|`, for any corpus and
        /// target size.
        #[test]
        fn vocab_size_and_merge_count_are_consistent(
            word_indices in proptest::collection::vec(0usize..PROP_WORDS.len() * 4, 5..40),
            extra_vocab in 0usize..20,
        ) {
            let dir = tempdir::TempDir::new("wordchipper-prop").unwrap();
            let path = corpus_file(&dir, &arbitrary_corpus(&word_indices));

            let specials = vec!["<|endoftext|>".to_string()];
            let vocab_size = 256 + specials.len() + extra_vocab;
            let options = TrainerOptions::new(vocab_size, specials.clone());

            let results = train(&path, &options).unwrap();

            proptest::prop_assert!(results.vocab.len() <= vocab_size);
            proptest::prop_assert_eq!(
                results.merges.len(),
                results.vocab.len() - 256 - specials.len()
            );
        }

        /// Every learned merge rule's two byte strings, concatenated,
        /// equal the vocabulary entry minted at that rule's position.
        #[test]
        fn merge_rules_match_minted_vocab_entries(
            word_indices in proptest::collection::vec(0usize..PROP_WORDS.len() * 4, 5..40),
        ) {
            let dir = tempdir::TempDir::new("wordchipper-prop").unwrap();
            let path = corpus_file(&dir, &arbitrary_corpus(&word_indices));

            let options = TrainerOptions::new(300, vec![]);
            let results = train(&path, &options).unwrap();

            for (i, (a, b)) in results.merges.iter().enumerate() {
                let mut expected = Vec::new();
                expected.extend_from_slice(a);
                expected.extend_from_slice(b);
                proptest::prop_assert_eq!(
                    results.vocab.bytes(256 + i as u32),
                    expected.as_slice()
                );
            }
        }

        /// Training is independent of how many parallel chunks the corpus
        /// was split into.
        #[test]
        fn training_is_chunk_count_independent(
            word_indices in proptest::collection::vec(0usize..PROP_WORDS.len() * 4, 20..60),
        ) {
            let dir = tempdir::TempDir::new("wordchipper-prop").unwrap();
            let path = corpus_file(&dir, &arbitrary_corpus(&word_indices));

            let one = TrainerOptions::new(290, vec![]).with_desired_num_chunks(1);
            let many = TrainerOptions::new(290, vec![]).with_desired_num_chunks(8);

            let t1 = train(&path, &one).unwrap();
            let t8 = train(&path, &many).unwrap();

            proptest::prop_assert_eq!(t1.merges, t8.merges);
            proptest::prop_assert_eq!(t1.vocab.len(), t8.vocab.len());
        }
    }
}
