//! # Training
//!
//! The BPE training pipeline: pre-tokenize the corpus in parallel, index
//! word/pair frequencies, then repeatedly pop the best candidate pair off
//! a lazy max-heap and apply it as a merge.

pub mod corpus_index;
pub mod merge_engine;
pub mod pair_heap;
pub mod parallel_pretok;
pub mod trainer;
pub mod word;

pub use corpus_index::CorpusIndex;
pub use pair_heap::PairHeap;
pub use parallel_pretok::ParallelPreTokOptions;
pub use trainer::{train, TrainResults, TrainerOptions};
pub use word::Word;
