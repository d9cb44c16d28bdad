//! # Common Types

/// The integer type used to identify vocabulary entries ("symbols").
///
/// The teacher crate this is descended from parameterizes over a generic
/// `TokenType` trait (`u16`/`u32`/`u64`); this crate fixes the width to
/// `u32` since nothing in this spec requires more than one integer width.
pub type TokenId = u32;

/// An ordered pair of [`TokenId`]s, as found adjacent inside a [`Word`](crate::training::Word).
pub type Pair = (TokenId, TokenId);

/// Type alias for hash maps used throughout this crate.
///
/// Uses `hashbrown` with the `foldhash` hasher, matching the teacher
/// crate's non-`ahash` `CommonHashMap` alias.
pub type CommonHashMap<K, V> = hashbrown::HashMap<K, V, foldhash::fast::RandomState>;

/// Type alias for hash sets used throughout this crate.
pub type CommonHashSet<V> = hashbrown::HashSet<V, foldhash::fast::RandomState>;
