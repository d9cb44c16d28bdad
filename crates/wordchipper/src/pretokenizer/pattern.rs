//! # GPT-2 Style Word Split Pattern

/// The fixed GPT-2-style word-splitting regex.
///
/// Matches, per attempt in order: contractions, an optional leading space
/// followed by a run of letters, an optional leading space followed by a
/// run of digits, an optional leading space followed by a run of
/// non-space/non-letter/non-digit characters, trailing whitespace, or any
/// other whitespace run.
///
/// Requires a regex engine with Unicode property class support
/// (`\p{L}`, `\p{N}`) *and* negative lookahead for the trailing-whitespace
/// alternative (`\s+(?!\S)`). The stdlib-backed `regex` crate supports
/// neither lookaround, so this pattern is compiled with `fancy_regex`,
/// matching the teacher crate's `ConstRegexPattern::Fancy` tagging of its
/// byte-identical r50k/GPT-2 patterns in `pretrained/openai/patterns.rs`.
pub const GPT2_SPLIT_PATTERN: &str =
    r"'(?:s|d|m|t|ll|ve|re)| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";
