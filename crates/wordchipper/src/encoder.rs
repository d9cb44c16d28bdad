//! # Encoder
//!
//! Turns text into a sequence of [`TokenId`]s using a trained vocabulary
//! and its merge rules.

use crate::pretokenizer::{PreTokenizer, PreTokenizerOptions, Segment};
use crate::training::word::{merge_pair, word_from_bytes, Word};
use crate::types::{CommonHashMap, TokenId};
use crate::vocab::{Merges, Vocabulary};

/// Encodes text into [`TokenId`]s using a fixed vocabulary and merge
/// order.
///
/// Built once from a trained (or loaded) [`Vocabulary`] and [`Merges`];
/// cheap to clone, since its internal lookup table is shared via an
/// owned copy built at construction.
pub struct Encoder {
    pretokenizer: PreTokenizer,
    special_to_id: CommonHashMap<String, TokenId>,
    merge_ranks: CommonHashMap<(TokenId, TokenId), usize>,
    /// The vocabulary id each merge rank resolves to.
    merge_result_id: CommonHashMap<usize, TokenId>,
}

impl Encoder {
    /// Build an encoder from a trained vocabulary and its merge rules.
    ///
    /// `merges` must be in the exact order they were learned: encoding
    /// applies them low-rank-first, one rule at a time over the whole
    /// fragment, exactly reproducing the learned merge order rather than
    /// resolving ties with a priority queue over current pair frequencies.
    pub fn new(
        vocab: &Vocabulary,
        merges: &Merges,
        specials: &[String],
    ) -> Self {
        let pretokenizer = PreTokenizerOptions::new(specials.to_vec()).build();

        let special_to_id = specials
            .iter()
            .filter_map(|s| vocab.id_of(s.as_bytes()).map(|id| (s.clone(), id)))
            .collect();

        let mut merge_ranks = CommonHashMap::default();
        let mut merge_result_id = CommonHashMap::default();
        for (rank, (a, b)) in merges.iter().enumerate() {
            let (Some(a_id), Some(b_id)) = (vocab.id_of(a), vocab.id_of(b)) else {
                continue;
            };
            let mut concat = Vec::with_capacity(a.len() + b.len());
            concat.extend_from_slice(a);
            concat.extend_from_slice(b);
            let Some(result_id) = vocab.id_of(&concat) else {
                continue;
            };
            merge_ranks.insert((a_id, b_id), rank);
            merge_result_id.insert(rank, result_id);
        }

        Self {
            pretokenizer,
            special_to_id,
            merge_ranks,
            merge_result_id,
        }
    }

    /// Encode `text` into a sequence of token ids.
    ///
    /// Special tokens are matched literally and encoded as their single
    /// reserved id; everything else is pre-tokenized with the GPT-2 word
    /// regex and BPE-merged fragment by fragment.
    pub fn encode(
        &self,
        text: &str,
    ) -> Vec<TokenId> {
        let mut out = Vec::new();
        for segment in self.pretokenizer.split_on_specials(text, true) {
            match segment {
                Segment::Special(s) => {
                    if let Some(&id) = self.special_to_id.get(s) {
                        out.push(id);
                    }
                }
                Segment::Text(segment) => {
                    for word in self.pretokenizer.split_words(segment) {
                        out.extend(self.encode_fragment(word));
                    }
                }
            }
        }
        out
    }

    /// Apply every learned merge rule, in rank order, to one
    /// pre-tokenized fragment.
    fn encode_fragment(
        &self,
        fragment: &str,
    ) -> Word {
        let mut word = word_from_bytes(fragment.as_bytes());

        if self.merge_ranks.is_empty() {
            return word;
        }

        loop {
            let best = word
                .windows(2)
                .enumerate()
                .filter_map(|(i, w)| {
                    let pair = (w[0], w[1]);
                    self.merge_ranks.get(&pair).map(|&rank| (rank, i, pair))
                })
                .min_by_key(|&(rank, i, _)| (rank, i));

            let Some((rank, _, pair)) = best else {
                break;
            };

            let new_id = self.merge_result_id[&rank];
            word = merge_pair(&word, pair, new_id);
        }

        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::train;
    use crate::training::TrainerOptions;
    use std::fs::File;
    use std::io::Write;

    fn train_small() -> (Vocabulary, Merges) {
        let dir = tempdir::TempDir::new("wordchipper-test").unwrap();
        let path = dir.path().join("corpus.txt");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"low low low low low lower lower widest widest widest \
                      newest newest newest newest newest newest")
            .unwrap();

        let options = TrainerOptions::new(256 + 6, vec!["<|endoftext|>".to_string()]);
        let results = train(&path, &options).unwrap();
        (results.vocab, results.merges)
    }

    #[test]
    fn test_encode_produces_fewer_tokens_than_bytes() {
        let (vocab, merges) = train_small();
        let encoder = Encoder::new(&vocab, &merges, &["<|endoftext|>".to_string()]);

        let ids = encoder.encode("newest");
        assert!(ids.len() < "newest".len());
    }

    #[test]
    fn test_encode_special_token_is_single_id() {
        let (vocab, merges) = train_small();
        let specials = vec!["<|endoftext|>".to_string()];
        let encoder = Encoder::new(&vocab, &merges, &specials);

        let ids = encoder.encode("newest<|endoftext|>newest");
        let special_id = vocab.id_of(b"<|endoftext|>").unwrap();
        assert_eq!(ids.iter().filter(|&&id| id == special_id).count(), 1);
    }

    #[test]
    fn test_encode_empty_string() {
        let (vocab, merges) = train_small();
        let encoder = Encoder::new(&vocab, &merges, &[]);
        assert_eq!(encoder.encode(""), Vec::<TokenId>::new());
    }
}
