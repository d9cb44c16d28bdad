//! # Error Types

/// Errors from wordchipper operations.
#[derive(Debug, thiserror::Error)]
pub enum WordchipperError {
    /// The input file could not be opened or read.
    #[error("input io error: {0}")]
    InputIo(#[from] std::io::Error),

    /// The input bytes were not valid UTF-8.
    #[error("input encoding error at byte offset {offset}")]
    InputEncoding {
        /// The byte offset of the first invalid byte.
        offset: usize,
    },

    /// Requested vocab size is below 256 + the number of special tokens.
    #[error("vocab size ({requested}) must be >= 256 + {specials} special tokens")]
    VocabTooSmall {
        /// The vocab size that was requested.
        requested: usize,
        /// The number of special tokens supplied.
        specials: usize,
    },

    /// The pair heap emptied before the target vocab size was reached.
    ///
    /// This is caught internally by the trainer and turned into a normal
    /// early termination; it is not expected to escape the public API.
    #[error("no pairs remain to merge")]
    NoPairsRemaining,

    /// A pre-tokenization worker failed.
    #[error("worker failed: {0}")]
    WorkerFailure(String),

    /// A vocabulary or merges artifact violated its on-disk format.
    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),
}

/// Result type for wordchipper operations.
pub type WCResult<T> = Result<T, WordchipperError>;
