//! # Vocabulary
//!
//! The bijective mapping from [`TokenId`] to its byte string, plus the
//! ordered list of merge rules that built it.

pub mod io;

use crate::types::{CommonHashMap, TokenId};

/// A bijective `TokenId <-> bytes` mapping.
///
/// Created at trainer initialization with `256 + specials.len()` entries
/// (one per raw byte, one per special token, in order); append-only
/// during training; frozen once training finishes.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<Box<[u8]>>,
    index: CommonHashMap<Box<[u8]>, TokenId>,
}

impl Vocabulary {
    /// Build the initial vocabulary: 256 single-byte entries (IDs 0..256,
    /// where byte `b` is assigned exactly ID `b`) followed by one entry
    /// per special token, in the order supplied.
    ///
    /// ## Arguments
    /// * `specials` - the special token strings, in caller-supplied order.
    pub fn with_specials<S: AsRef<str>>(specials: &[S]) -> Self {
        let mut vocab = Vocabulary {
            entries: Vec::with_capacity(256 + specials.len()),
            index: CommonHashMap::default(),
        };
        for byte in 0u16..256 {
            vocab.push_entry(Box::from([byte as u8]));
        }
        for special in specials {
            vocab.push_entry(special.as_ref().as_bytes().into());
        }
        vocab
    }

    fn push_entry(
        &mut self,
        bytes: Box<[u8]>,
    ) -> TokenId {
        let id = self.entries.len() as TokenId;
        self.index.insert(bytes.clone(), id);
        self.entries.push(bytes);
        id
    }

    /// Mint a new vocabulary entry as the concatenation of two existing
    /// entries, returning its freshly allocated [`TokenId`].
    ///
    /// ## Panics
    /// Panics if `a` or `b` is not a valid id in this vocabulary.
    pub fn push_merge(
        &mut self,
        a: TokenId,
        b: TokenId,
    ) -> TokenId {
        let mut bytes = Vec::with_capacity(self.bytes(a).len() + self.bytes(b).len());
        bytes.extend_from_slice(self.bytes(a));
        bytes.extend_from_slice(self.bytes(b));
        self.push_entry(bytes.into())
    }

    /// The number of entries in the vocabulary.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vocabulary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The byte string for a given id.
    ///
    /// ## Panics
    /// Panics if `id` is out of range.
    pub fn bytes(
        &self,
        id: TokenId,
    ) -> &[u8] {
        &self.entries[id as usize]
    }

    /// The id for a given byte string, if present.
    pub fn id_of(
        &self,
        bytes: &[u8],
    ) -> Option<TokenId> {
        self.index.get(bytes).copied()
    }

    /// Iterate over `(id, bytes)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &[u8])> {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, bytes)| (id as TokenId, bytes.as_ref()))
    }
}

/// An ordered list of merge rules, recording which two vocabulary entries'
/// byte strings were concatenated, in training order.
pub type Merges = Vec<(Box<[u8]>, Box<[u8]>)>;
