//! # Error Types

/// Errors from tokeneval operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenEvalError {
    /// The rank table is not a bijection; the reverse decoder cannot be built.
    #[error("encoder ({encoder}) and decoder ({decoder}) sizes don't match")]
    DecoderSizeMismatch {
        /// The number of entries in the encoder table.
        encoder: usize,
        /// The number of entries in the built reverse table.
        decoder: usize,
    },

    /// A merged part has no rank; the rank table is incomplete for this vocabulary.
    #[error("byte sequence cannot be merged against this vocabulary")]
    UnmergeableByteSequence,

    /// A disallowed special token literal was found in the input text.
    #[error("text contains disallowed special token {0:?}")]
    DisallowedSpecialTokenFound(String),

    /// The model identifier has no encoding mapping.
    #[error("unsupported model: {0:?}")]
    UnsupportedModel(String),

    /// The encoding name has no known construction.
    #[error("unsupported encoding: {0:?}")]
    UnsupportedEncoding(String),

    /// A facade operation was invoked before any encoding was bound.
    #[error("no encoding bound; call set_encoding first")]
    NoEncodingBound,

    /// Strict decoding encountered an id absent from both reverse tables.
    #[error("unknown token id: {0}")]
    UnknownTokenId(u64),

    /// A vocabulary file contains the same byte sequence twice.
    #[error("duplicate vocabulary entry at rank {rank}")]
    DuplicateVocabEntry {
        /// The rank on the duplicated line.
        rank: u64,
    },

    /// Vocabulary data is inconsistent.
    #[error("{0}")]
    VocabConflict(String),

    /// Token value out of range for the target type.
    #[error("token out of range")]
    TokenOutOfRange,

    /// A regex pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(String),

    /// Parse error (base64, integer, etc.)
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error from an external component.
    #[error("{0}")]
    External(String),
}

/// Result type for tokeneval operations.
pub type Result<T> = core::result::Result<T, TokenEvalError>;
