//! # Pre-Tokenizer
//!
//! Splits raw text into atomic fragments across which BPE merges are
//! never allowed: special-token occurrences are protected first, then the
//! remaining text is split on the GPT-2 word-split regex.

mod pattern;
mod specials;

pub use pattern::GPT2_SPLIT_PATTERN;
pub use specials::{Segment, split_on_specials};

use crate::types::CommonHashMap;
use fancy_regex::Regex as FancyRegex;

/// Splits text into pre-tokenization fragments.
///
/// Holds the compiled GPT-2 word-split regex and the ordered list of
/// special tokens it must protect.
///
/// The word-split regex is compiled with `fancy_regex`, not the plain
/// `regex` crate: [`GPT2_SPLIT_PATTERN`] requires negative lookahead
/// (`\s+(?!\S)`), which `regex` cannot express. Special-token splitting
/// (see [`split_on_specials`]) needs no lookaround and stays on `regex`.
#[derive(Clone)]
pub struct PreTokenizer {
    word_re: FancyRegex,
    specials: Vec<String>,
}

impl PreTokenizer {
    /// Build a new `PreTokenizer` over the given special tokens.
    ///
    /// ## Arguments
    /// * `specials` - the special token strings, in caller-supplied order.
    ///
    /// ## Panics
    /// Panics if the fixed GPT-2 pattern fails to compile (it cannot, in
    /// practice; this mirrors the teacher crate's
    /// `pattern.compile().expect(...)` convention for a pattern the crate
    /// itself controls).
    pub fn new(specials: Vec<String>) -> Self {
        let word_re =
            FancyRegex::new(GPT2_SPLIT_PATTERN).expect("GPT2_SPLIT_PATTERN must compile");
        Self { word_re, specials }
    }

    /// Build a `PreTokenizer` from a [`PreTokenizerOptions`] value. See
    /// [`PreTokenizerOptions::build`].
    pub fn from_options(options: PreTokenizerOptions) -> Self {
        Self::new(options.specials)
    }

    /// The special tokens this pre-tokenizer protects.
    pub fn specials(&self) -> &[String] {
        &self.specials
    }

    /// Split `text` on special tokens, optionally retaining them as their
    /// own segments. See [`split_on_specials`].
    pub fn split_on_specials<'a>(
        &self,
        text: &'a str,
        keep_specials: bool,
    ) -> Vec<Segment<'a>> {
        split_on_specials(text, &self.specials, keep_specials)
    }

    /// Split one non-special segment into its GPT-2 word fragments.
    ///
    /// ## Invariant
    /// The concatenation of the returned fragments equals `segment`.
    ///
    /// ## Panics
    /// Panics if `fancy_regex` aborts a match (e.g. its backtracking
    /// budget is exceeded); this cannot happen for the bounded lookahead
    /// in [`GPT2_SPLIT_PATTERN`] on realistic inputs.
    pub fn split_words<'a>(
        &self,
        segment: &'a str,
    ) -> impl Iterator<Item = &'a str> + '_ {
        self.word_re
            .find_iter(segment)
            .map(|m| m.expect("GPT2_SPLIT_PATTERN match failed").as_str())
    }

    /// Pre-tokenize `text` into a multiset of (fragment bytes, count).
    ///
    /// Special tokens are stripped (not counted) before word-splitting, so
    /// they never participate in the returned counts.
    pub fn pretokenize(
        &self,
        text: &str,
    ) -> CommonHashMap<Vec<u8>, u64> {
        let mut counts: CommonHashMap<Vec<u8>, u64> = CommonHashMap::default();
        for segment in self.split_on_specials(text, false) {
            let Segment::Text(segment) = segment else {
                continue;
            };
            for word in self.split_words(segment) {
                *counts.entry(word.as_bytes().to_vec()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Configuration for a [`PreTokenizer`].
///
/// Follows the same small, `Clone`-able `with_*`-method builder
/// convention as [`crate::training::TrainerOptions`] rather than a
/// generic builder trait.
#[derive(Debug, Clone, Default)]
pub struct PreTokenizerOptions {
    specials: Vec<String>,
}

impl PreTokenizerOptions {
    /// Create new options with the given special tokens, in the order
    /// they should be protected from splitting.
    pub fn new(specials: Vec<String>) -> Self {
        Self { specials }
    }

    /// Replace the special tokens.
    pub fn with_specials(
        mut self,
        specials: Vec<String>,
    ) -> Self {
        self.specials = specials;
        self
    }

    /// Build the configured [`PreTokenizer`].
    pub fn build(self) -> PreTokenizer {
        PreTokenizer::new(self.specials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretokenize_basic() {
        let pt = PreTokenizer::new(vec![]);
        let counts = pt.pretokenize("low low low");
        // " low" appears once (leading word has no space), "low" with a
        // leading space appears twice.
        assert_eq!(counts.get(&b"low".to_vec()), Some(&1));
        assert_eq!(counts.get(&b" low".to_vec()), Some(&2));
    }

    #[test]
    fn test_pretokenize_strips_specials() {
        let pt = PreTokenizer::new(vec!["<|endoftext|>".to_string()]);
        let counts = pt.pretokenize("hi<|endoftext|>there");
        let total: u64 = counts.values().sum();
        // "hi" + "there" fragments only; the special contributes nothing.
        assert!(counts.keys().all(|k| k != b"<|endoftext|>"));
        assert_eq!(total, 2);
    }

    #[test]
    fn test_split_words_concatenates_to_segment() {
        let pt = PreTokenizer::new(vec![]);
        let segment = "Hello, world! 123";
        let rebuilt: String = pt.split_words(segment).collect();
        assert_eq!(rebuilt, segment);
    }

    #[test]
    fn test_contraction_split() {
        let pt = PreTokenizer::new(vec![]);
        let words: Vec<&str> = pt.split_words("I'll go").collect();
        assert_eq!(words, vec!["I", "'ll", " go"]);
    }

    #[test]
    fn test_options_build_matches_new() {
        let specials = vec!["<|endoftext|>".to_string()];
        let pt = PreTokenizerOptions::new(vec![]).with_specials(specials.clone()).build();
        assert_eq!(pt.specials(), specials.as_slice());
    }
}
