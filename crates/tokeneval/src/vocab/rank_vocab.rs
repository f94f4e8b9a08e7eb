//! # Mergeable Rank Vocabulary

use crate::errors::{Result, TokenEvalError};
use crate::types::TokenType;
use crate::vocab::vocab_types::{SpanTokenMap, TokenSpanMap};

/// Token vocabulary for mergeable byte ranks.
///
/// Holds the ``{ byte span -> rank }`` table that drives byte-pair
/// merging. Byte spans are unique by construction of the map; rank
/// values must also be unique for the reverse decoder to exist, which
/// is checked by [`RankVocab::build_reverse`].
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RankVocab<T: TokenType> {
    /// The map of byte spans to ranks.
    span_map: SpanTokenMap<T>,
}

impl<T: TokenType> From<SpanTokenMap<T>> for RankVocab<T> {
    fn from(span_map: SpanTokenMap<T>) -> Self {
        Self::from_map(span_map)
    }
}

impl<T: TokenType> RankVocab<T> {
    /// Create a new rank vocab.
    ///
    /// ## Arguments
    /// * `span_map` - A mapping of byte spans to ranks.
    ///
    /// ## Returns
    /// A new `RankVocab` instance.
    pub fn from_map(span_map: SpanTokenMap<T>) -> Self {
        Self { span_map }
    }

    /// Get the span map.
    pub fn span_map(&self) -> &SpanTokenMap<T> {
        &self.span_map
    }

    /// Get the number of ranks in the vocab.
    pub fn len(&self) -> usize {
        self.span_map.len()
    }

    /// Check if the vocab is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a byte span to the vocab.
    ///
    /// A span that is already present is overwritten (last write wins);
    /// well-formed vocabulary files never contain duplicates, and the
    /// loaders reject them before this point.
    ///
    /// ## Arguments
    /// * `span` - The byte span to add.
    /// * `rank` - The rank value to assign to the span.
    pub fn insert(
        &mut self,
        span: Vec<u8>,
        rank: T,
    ) {
        self.span_map.insert(span, rank);
    }

    /// Return the associated rank for the span, if any.
    ///
    /// ## Arguments
    /// * `span` - The byte slice to look up.
    ///
    /// ## Returns
    /// An `Option` containing the rank if the span exists in the vocabulary.
    pub fn lookup(
        &self,
        span: &[u8],
    ) -> Option<T> {
        self.span_map.get(span).copied()
    }

    /// Check whether the span is itself a vocabulary entry.
    pub fn contains(
        &self,
        span: &[u8],
    ) -> bool {
        self.span_map.contains_key(span)
    }

    /// Get the maximum rank value, if any.
    pub fn max_token(&self) -> Option<T> {
        self.span_map.values().max().copied()
    }

    /// Build the reverse ``{ rank -> byte span }`` table.
    ///
    /// ## Returns
    /// The reverse table; or [`TokenEvalError::DecoderSizeMismatch`] when
    /// two distinct spans share a rank (the table is not a bijection).
    pub fn build_reverse(&self) -> Result<TokenSpanMap<T>> {
        let mut reverse = TokenSpanMap::with_capacity(self.span_map.len());
        for (span, &rank) in &self.span_map {
            reverse.insert(rank, span.clone());
        }

        if reverse.len() != self.span_map.len() {
            return Err(TokenEvalError::DecoderSizeMismatch {
                encoder: self.span_map.len(),
                decoder: reverse.len(),
            });
        }

        Ok(reverse)
    }
}
