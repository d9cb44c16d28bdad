//! # Decoder
//!
//! Turns a sequence of [`TokenId`]s back into text.

use crate::types::TokenId;
use crate::vocab::Vocabulary;

/// Decodes [`TokenId`] sequences back into text using a fixed
/// vocabulary.
///
/// Decoding is total: every input id sequence produces *some* `String`,
/// even if the underlying bytes are not valid UTF-8 (invalid sequences
/// are replaced with U+FFFD, matching `String::from_utf8_lossy`).
pub struct Decoder<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> Decoder<'a> {
    /// Build a decoder borrowing `vocab` for the lifetime of its use.
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    /// Decode `ids` into text.
    ///
    /// ## Panics
    /// Panics if any id is out of range for the vocabulary (the same
    /// contract as [`Vocabulary::bytes`]).
    pub fn decode(
        &self,
        ids: &[TokenId],
    ) -> String {
        let mut bytes = Vec::new();
        for &id in ids {
            bytes.extend_from_slice(self.vocab.bytes(id));
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_roundtrips_ascii() {
        let vocab = Vocabulary::with_specials::<&str>(&[]);
        let decoder = Decoder::new(&vocab);
        let ids: Vec<TokenId> = "hello".bytes().map(|b| b as TokenId).collect();
        assert_eq!(decoder.decode(&ids), "hello");
    }

    #[test]
    fn test_decode_invalid_utf8_is_replaced() {
        let vocab = Vocabulary::with_specials::<&str>(&[]);
        let decoder = Decoder::new(&vocab);
        // 0x80 alone is not a valid UTF-8 lead byte.
        let decoded = decoder.decode(&[0x80]);
        assert!(decoded.contains('\u{FFFD}'));
    }

    #[test]
    fn test_decode_empty() {
        let vocab = Vocabulary::with_specials::<&str>(&[]);
        let decoder = Decoder::new(&vocab);
        assert_eq!(decoder.decode(&[]), "");
    }
}
