//! # Vocabulary Artifact I/O
//!
//! Serializes and loads the three on-disk artifacts a training run
//! produces: `vocab.json` (Latin-1-encoded byte strings, id-keyed),
//! `merges.txt` (one merge rule per line, `#version: 0.2` header), and
//! `special_tokens.txt` (one special token per line).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{WCResult, WordchipperError};
use crate::types::TokenId;
use crate::vocab::{Merges, Vocabulary};

const MERGES_HEADER: &str = "#version: 0.2";

/// Encode a byte string as a `String` where byte `b` maps to the Latin-1
/// codepoint `U+00XX`. Round-trips exactly for any byte sequence, unlike
/// UTF-8-lossy decoding.
fn bytes_to_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decode a Latin-1-encoded string back to its original bytes.
///
/// ## Errors
/// Returns [`WordchipperError::MalformedArtifact`] if any character falls
/// outside the `U+0000..=U+00FF` range.
fn latin1_to_bytes(s: &str) -> WCResult<Vec<u8>> {
    s.chars()
        .map(|c| {
            u32::try_from(c)
                .ok()
                .filter(|&cp| cp <= 0xFF)
                .map(|cp| cp as u8)
                .ok_or_else(|| {
                    WordchipperError::MalformedArtifact(format!(
                        "character {c:?} is not representable as a single byte"
                    ))
                })
        })
        .collect()
}

/// The `vocab.json` on-disk shape: a map from the Latin-1-encoded token
/// bytes to its numeric id, matching the convention used by other GPT-2
/// style BPE tokenizers.
#[derive(Serialize, Deserialize)]
struct VocabJson(std::collections::BTreeMap<String, TokenId>);

/// Write `vocab` to `path` as `vocab.json`.
pub fn save_vocab_json<P: AsRef<Path>>(
    vocab: &Vocabulary,
    path: P,
) -> WCResult<()> {
    let mut map = std::collections::BTreeMap::new();
    for (id, bytes) in vocab.iter() {
        map.insert(bytes_to_latin1(bytes), id);
    }
    let json = serde_json::to_string_pretty(&VocabJson(map))
        .map_err(|e| WordchipperError::MalformedArtifact(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a `vocab.json` file back into the `(id, bytes)` pairs it
/// encodes, sorted by id.
///
/// Note this reconstructs entries, not a full [`Vocabulary`]: the caller
/// is expected to already know the special tokens and merge order needed
/// to rebuild one (see [`load_merges`] and [`load_special_tokens`]).
pub fn load_vocab_json<P: AsRef<Path>>(path: P) -> WCResult<Vec<(TokenId, Vec<u8>)>> {
    let text = fs::read_to_string(path)?;
    let VocabJson(map) =
        serde_json::from_str(&text).map_err(|e| WordchipperError::MalformedArtifact(e.to_string()))?;

    let mut entries: Vec<(TokenId, Vec<u8>)> = map
        .into_iter()
        .map(|(s, id)| latin1_to_bytes(&s).map(|bytes| (id, bytes)))
        .collect::<WCResult<_>>()?;
    entries.sort_by_key(|(id, _)| *id);
    Ok(entries)
}

/// Write `merges` to `path` as `merges.txt`.
pub fn save_merges<P: AsRef<Path>>(
    merges: &Merges,
    path: P,
) -> WCResult<()> {
    let mut out = String::from(MERGES_HEADER);
    out.push('\n');
    for (a, b) in merges {
        out.push_str(&bytes_to_latin1(a));
        out.push(' ');
        out.push_str(&bytes_to_latin1(b));
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Load a `merges.txt` file back into its ordered list of `(bytes_a,
/// bytes_b)` merge rules.
///
/// ## Errors
/// Returns [`WordchipperError::MalformedArtifact`] if the header is
/// missing or a data line does not split into exactly two
/// space-separated fields.
pub fn load_merges<P: AsRef<Path>>(path: P) -> WCResult<Merges> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();

    match lines.next() {
        Some(header) if header == MERGES_HEADER => {}
        _ => {
            return Err(WordchipperError::MalformedArtifact(
                "merges.txt is missing its '#version: 0.2' header".to_string(),
            ))
        }
    }

    lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut parts = line.splitn(2, ' ');
            let (a, b) = match (parts.next(), parts.next()) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(WordchipperError::MalformedArtifact(format!(
                        "malformed merges.txt line: {line:?}"
                    )))
                }
            };
            Ok((
                latin1_to_bytes(a)?.into_boxed_slice(),
                latin1_to_bytes(b)?.into_boxed_slice(),
            ))
        })
        .collect()
}

/// Write `specials` to `path` as `special_tokens.txt`, one token per line, in
/// order.
pub fn save_special_tokens<P: AsRef<Path>>(
    specials: &[String],
    path: P,
) -> WCResult<()> {
    let mut out = String::new();
    for special in specials {
        out.push_str(special);
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Load a `special_tokens.txt` file back into its ordered list of special
/// tokens.
pub fn load_special_tokens<P: AsRef<Path>>(path: P) -> WCResult<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text.lines().map(str::to_string).collect())
}
