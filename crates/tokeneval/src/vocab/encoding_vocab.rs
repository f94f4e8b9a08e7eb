//! # Encoding Vocabulary

use crate::errors::{Result, TokenEvalError};
use crate::regex::RegexPattern;
use crate::types::TokenType;
use crate::vocab::rank_vocab::RankVocab;
use crate::vocab::special_vocab::SpecialVocab;

/// A complete named encoding vocabulary.
///
/// One value per vocabulary family member (cl100k, p50k, r50k, ...);
/// the engine consumes this value, there is no subtyping. Members differ
/// only in data: the split pattern, the mergeable ranks, the special
/// tokens, and the optional declared vocabulary size.
#[derive(Debug, Clone)]
pub struct EncodingVocab<T: TokenType> {
    /// The encoding name, e.g. "cl100k_base".
    name: String,

    /// The ordinary-token split pattern.
    pattern: RegexPattern,

    /// The mergeable byte ranks.
    mergeable_ranks: RankVocab<T>,

    /// The special token literals.
    special_tokens: SpecialVocab<T>,

    /// The declared vocabulary size, when the encoding defines one.
    explicit_vocab_size: Option<usize>,
}

impl<T: TokenType> EncodingVocab<T> {
    /// Create a new encoding vocab.
    ///
    /// ## Arguments
    /// * `name` - The encoding name.
    /// * `pattern` - The ordinary-token split pattern.
    ///
    /// ## Returns
    /// A new `EncodingVocab` with empty rank and special tables.
    pub fn new<N, P>(
        name: N,
        pattern: P,
    ) -> Self
    where
        N: AsRef<str>,
        P: Into<RegexPattern>,
    {
        Self {
            name: name.as_ref().to_string(),
            pattern: pattern.into(),
            mergeable_ranks: RankVocab::default(),
            special_tokens: SpecialVocab::default(),
            explicit_vocab_size: None,
        }
    }

    /// Set the mergeable ranks.
    pub fn with_ranks<R: Into<RankVocab<T>>>(
        mut self,
        ranks: R,
    ) -> Self {
        self.mergeable_ranks = ranks.into();
        self
    }

    /// Extend the special token table.
    pub fn with_special_tokens<W, S>(
        mut self,
        special_tokens: W,
    ) -> Self
    where
        W: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
    {
        self.special_tokens = self.special_tokens.with_special_tokens(special_tokens);
        self
    }

    /// Set the declared vocabulary size.
    pub fn with_explicit_vocab_size(
        mut self,
        size: Option<usize>,
    ) -> Self {
        self.explicit_vocab_size = size;
        self
    }

    /// Get the encoding name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the ordinary-token split pattern.
    pub fn pattern(&self) -> &RegexPattern {
        &self.pattern
    }

    /// Get the mergeable ranks.
    pub fn mergeable_ranks(&self) -> &RankVocab<T> {
        &self.mergeable_ranks
    }

    /// Get the special token table.
    pub fn special_tokens(&self) -> &SpecialVocab<T> {
        &self.special_tokens
    }

    /// Get the declared vocabulary size, if any.
    pub fn explicit_vocab_size(&self) -> Option<usize> {
        self.explicit_vocab_size
    }

    /// Get the maximum token value over both tables.
    pub fn max_token_value(&self) -> Option<T> {
        core::cmp::max(
            self.mergeable_ranks.max_token(),
            self.special_tokens.max_token(),
        )
    }

    /// Validate the vocabulary against its declared size.
    ///
    /// A no-op when `explicit_vocab_size` is unset.
    ///
    /// ## Returns
    /// [`TokenEvalError::VocabConflict`] when the entry count or the
    /// maximum token value disagrees with the declared size.
    pub fn validate(&self) -> Result<()> {
        let Some(expected) = self.explicit_vocab_size else {
            return Ok(());
        };

        let actual = self.mergeable_ranks.len() + self.special_tokens.len();
        if actual != expected {
            return Err(TokenEvalError::VocabConflict(format!(
                "{}: explicit vocab size is {expected}, but {actual} entries are present",
                self.name,
            )));
        }

        if let Some(max) = self.max_token_value() {
            let max = max.to_usize().ok_or(TokenEvalError::TokenOutOfRange)?;
            if max != expected - 1 {
                return Err(TokenEvalError::VocabConflict(format!(
                    "{}: max token value {max} does not fit vocab size {expected}",
                    self.name,
                )));
            }
        }

        Ok(())
    }
}
