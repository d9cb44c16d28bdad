//! # Tokenizer
//!
//! The public-facing façade combining a trained [`Vocabulary`], its
//! [`Merges`], and the special tokens it was trained with into one
//! `encode`/`decode` unit, loadable from disk artifacts or straight from
//! a [`TrainResults`](crate::training::TrainResults).

use std::path::Path;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::errors::WCResult;
use crate::training::{train, TrainResults, TrainerOptions};
use crate::types::TokenId;
use crate::vocab::{io, Merges, Vocabulary};

/// A trained BPE tokenizer, ready to encode and decode text.
pub struct Tokenizer {
    vocab: Vocabulary,
    merges: Merges,
    specials: Vec<String>,
    encoder: Encoder,
}

impl Tokenizer {
    /// Build a tokenizer from an already-trained vocabulary, merge list,
    /// and the special tokens used during training.
    pub fn new(
        vocab: Vocabulary,
        merges: Merges,
        specials: Vec<String>,
    ) -> Self {
        let encoder = Encoder::new(&vocab, &merges, &specials);
        Self {
            vocab,
            merges,
            specials,
            encoder,
        }
    }

    /// Train a fresh tokenizer directly from a text corpus.
    ///
    /// See [`train`] for the full contract.
    pub fn train<P: AsRef<Path>>(
        input_path: P,
        options: &TrainerOptions,
    ) -> WCResult<Self> {
        let TrainResults { vocab, merges } = train(input_path, options)?;
        Ok(Self::new(vocab, merges, options.special_tokens.clone()))
    }

    /// Load a previously trained tokenizer from its on-disk artifacts:
    /// `vocab.json`, `merges.txt`, and `special_tokens.txt` under `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> WCResult<Self> {
        let dir = dir.as_ref();

        let specials = io::load_special_tokens(dir.join("special_tokens.txt"))?;
        let merges = io::load_merges(dir.join("merges.txt"))?;
        let entries = io::load_vocab_json(dir.join("vocab.json"))?;

        // Rebuild the vocabulary from scratch: the first 256 + specials
        // entries are implied by `with_specials`, and every entry after
        // that is exactly the result of applying `merges` in order.
        let mut vocab = Vocabulary::with_specials(&specials);
        for (a, b) in &merges {
            let a_id = vocab
                .id_of(a)
                .ok_or_else(|| malformed("merges.txt references an unknown byte sequence"))?;
            let b_id = vocab
                .id_of(b)
                .ok_or_else(|| malformed("merges.txt references an unknown byte sequence"))?;
            vocab.push_merge(a_id, b_id);
        }

        if vocab.len() != entries.len() {
            return Err(malformed(
                "vocab.json entry count does not match specials + merges",
            ));
        }

        Ok(Self::new(vocab, merges, specials))
    }

    /// Persist this tokenizer's artifacts (`vocab.json`, `merges.txt`,
    /// `special_tokens.txt`) under `dir`.
    pub fn save<P: AsRef<Path>>(
        &self,
        dir: P,
    ) -> WCResult<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        io::save_vocab_json(&self.vocab, dir.join("vocab.json"))?;
        io::save_merges(&self.merges, dir.join("merges.txt"))?;
        io::save_special_tokens(&self.specials, dir.join("special_tokens.txt"))?;
        Ok(())
    }

    /// Encode `text` into token ids.
    pub fn encode(
        &self,
        text: &str,
    ) -> Vec<TokenId> {
        self.encoder.encode(text)
    }

    /// Decode token ids back into text.
    pub fn decode(
        &self,
        ids: &[TokenId],
    ) -> String {
        Decoder::new(&self.vocab).decode(ids)
    }

    /// The trained vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// The learned merge rules, in training order.
    pub fn merges(&self) -> &Merges {
        &self.merges
    }

    /// The special tokens this tokenizer was trained with.
    pub fn specials(&self) -> &[String] {
        &self.specials
    }
}

fn malformed(msg: &str) -> crate::errors::WordchipperError {
    crate::errors::WordchipperError::MalformedArtifact(msg.to_string())
}
