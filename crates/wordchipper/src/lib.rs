#![warn(missing_docs, unused)]
//! # wordchipper
//!
//! A byte-pair-encoding subword tokenizer: trains a vocabulary and merge
//! rules from a text corpus, then uses them to encode text to token ids
//! and decode ids back to text.
//!
//! The core pipeline lives in [`training`]; [`Tokenizer`] is the
//! recommended entry point for encode/decode once a vocabulary has been
//! trained or loaded from disk.

pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod pretokenizer;
pub mod tokenizer;
pub mod training;
pub mod types;
pub mod vocab;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use errors::{WCResult, WordchipperError};
pub use pretokenizer::{PreTokenizer, PreTokenizerOptions};
pub use tokenizer::Tokenizer;
pub use training::{train, ParallelPreTokOptions, TrainResults, TrainerOptions};
pub use types::TokenId;
pub use vocab::{Merges, Vocabulary};
