//! # Parallel Pre-Tokenization Driver
//!
//! For large corpora, splits the input file into byte ranges aligned to a
//! safe delimiter and fans pre-tokenization across `rayon` worker
//! threads, reproduced from the reference chunk-boundary algorithm
//! (`find_chunk_boundaries` in the original implementation this spec was
//! distilled from).

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use rayon::prelude::*;

use crate::errors::{WCResult, WordchipperError};
use crate::pretokenizer::PreTokenizer;
use crate::types::CommonHashMap;

const MINI_CHUNK_SIZE: usize = 4096;

/// Find up to `desired_num_chunks` byte offsets splitting `file` into
/// ranges, each boundary snapped forward to the first occurrence of
/// `split_token` (or to EOF if none is found), then deduplicated.
///
/// May return fewer than `desired_num_chunks + 1` boundaries if guesses
/// collapse onto the same snapped position; this is expected, not an
/// error, and the caller silently proceeds with fewer chunks.
fn find_chunk_boundaries(
    file: &mut File,
    desired_num_chunks: usize,
    split_token: &[u8],
) -> WCResult<Vec<u64>> {
    let file_size = file.seek(SeekFrom::End(0))?;
    file.seek(SeekFrom::Start(0))?;

    if desired_num_chunks == 0 || file_size == 0 {
        return Ok(vec![0, file_size]);
    }

    let chunk_size = file_size / desired_num_chunks as u64;
    let mut boundaries: Vec<u64> = (0..=desired_num_chunks as u64)
        .map(|i| i * chunk_size)
        .collect();
    *boundaries.last_mut().unwrap() = file_size;

    let mut mini_chunk = vec![0u8; MINI_CHUNK_SIZE];

    for bi in 1..boundaries.len() - 1 {
        let mut position = boundaries[bi];
        loop {
            file.seek(SeekFrom::Start(position))?;
            let read = file.read(&mut mini_chunk)?;
            if read == 0 {
                boundaries[bi] = file_size;
                break;
            }
            if let Some(found_at) = mini_chunk[..read]
                .windows(split_token.len().max(1))
                .position(|w| w == split_token)
            {
                boundaries[bi] = position + found_at as u64;
                break;
            }
            position += read as u64;
        }
    }

    boundaries.sort_unstable();
    boundaries.dedup();
    Ok(boundaries)
}

/// Configuration for [`parallel_pretokenize`].
///
/// Follows the same small, `Clone`-able `with_*`-method builder convention
/// as [`crate::training::TrainerOptions`] rather than a generic builder
/// trait.
#[derive(Debug, Clone)]
pub struct ParallelPreTokOptions {
    desired_num_chunks: usize,
    split_token: Vec<u8>,
}

impl ParallelPreTokOptions {
    /// Create new options with the given chunk-count hint and the
    /// default split token (`b"\n"`).
    pub fn new(desired_num_chunks: usize) -> Self {
        Self {
            desired_num_chunks,
            split_token: b"\n".to_vec(),
        }
    }

    /// Replace the byte string chunk boundaries are snapped to.
    pub fn with_split_token(
        mut self,
        split_token: impl Into<Vec<u8>>,
    ) -> Self {
        self.split_token = split_token.into();
        self
    }
}

/// Run pre-tokenization over `input_path` in parallel, merging worker
/// results into a single global word-count multiset.
///
/// ## Arguments
/// * `input_path` - path to the UTF-8 text corpus.
/// * `pretokenizer` - the (specials-aware) pre-tokenizer to apply.
/// * `options` - the chunk-count hint and split token; see
///   [`ParallelPreTokOptions`].
///
/// ## Errors
/// Aborts and returns the underlying error if the file cannot be opened,
/// if a byte range is not valid UTF-8, or if any worker otherwise fails.
/// No partial result is returned on failure.
pub fn parallel_pretokenize<P: AsRef<Path>>(
    input_path: P,
    pretokenizer: &PreTokenizer,
    options: &ParallelPreTokOptions,
) -> WCResult<CommonHashMap<Vec<u8>, u64>> {
    let path = input_path.as_ref();
    let mut file = File::open(path)?;
    let boundaries = find_chunk_boundaries(
        &mut file,
        options.desired_num_chunks,
        &options.split_token,
    )?;
    drop(file);

    log::info!(
        "pre-tokenizing {} in {} chunk(s)",
        path.display(),
        boundaries.len().saturating_sub(1)
    );

    let ranges: Vec<(u64, u64)> = boundaries.windows(2).map(|w| (w[0], w[1])).collect();

    let partials: Vec<CommonHashMap<Vec<u8>, u64>> = ranges
        .into_par_iter()
        .map(|(start, end)| -> WCResult<CommonHashMap<Vec<u8>, u64>> {
            let mut file = File::open(path)?;
            file.seek(SeekFrom::Start(start))?;
            let mut buf = vec![0u8; (end - start) as usize];
            file.read_exact(&mut buf)?;
            let text = String::from_utf8(buf).map_err(|e| {
                WordchipperError::InputEncoding {
                    offset: start as usize + e.utf8_error().valid_up_to(),
                }
            })?;
            Ok(pretokenizer.pretokenize(&text))
        })
        .collect::<WCResult<Vec<_>>>()?;

    let mut merged: CommonHashMap<Vec<u8>, u64> = CommonHashMap::default();
    for partial in partials {
        for (word, count) in partial {
            *merged.entry(word).or_insert(0) += count;
        }
    }
    Ok(merged)
}
