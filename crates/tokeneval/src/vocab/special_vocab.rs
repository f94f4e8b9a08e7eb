//! # Special Token Vocabulary

use crate::regex::{RegexPattern, special_union_pattern};
use crate::types::TokenType;
use crate::vocab::vocab_types::{StringTokenMap, TokenStringMap};

/// Token vocabulary for special token literals.
///
/// Special tokens bypass byte-pair merging entirely; each literal maps
/// to a single reserved id, disjoint from the mergeable rank range.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SpecialVocab<T: TokenType> {
    /// The map of special literals to tokens.
    str_map: StringTokenMap<T>,
}

impl<T: TokenType> From<StringTokenMap<T>> for SpecialVocab<T> {
    fn from(str_map: StringTokenMap<T>) -> Self {
        Self::from_map(str_map)
    }
}

impl<T: TokenType> SpecialVocab<T> {
    /// Create a new special token vocab.
    ///
    /// ## Arguments
    /// * `str_map` - A mapping of literals to tokens.
    ///
    /// ## Returns
    /// A new `SpecialVocab` instance.
    pub fn from_map(str_map: StringTokenMap<T>) -> Self {
        Self { str_map }
    }

    /// Get the literal map.
    pub fn str_map(&self) -> &StringTokenMap<T> {
        &self.str_map
    }

    /// Get the number of special tokens in the vocab.
    pub fn len(&self) -> usize {
        self.str_map.len()
    }

    /// Check if the vocab is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a special token literal to the vocab.
    ///
    /// ## Arguments
    /// * `literal` - The literal string to add.
    /// * `token` - The token value to assign to the literal.
    pub fn add_literal(
        &mut self,
        literal: &str,
        token: T,
    ) {
        self.str_map.insert(literal.to_string(), token);
    }

    /// Extend the vocabulary with the given special tokens.
    ///
    /// ## Arguments
    /// * `special_tokens` - An iterator of literal strings and tokens.
    ///
    /// ## Returns
    /// The updated `SpecialVocab` instance.
    pub fn with_special_tokens<W, S>(
        self,
        special_tokens: W,
    ) -> Self
    where
        W: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
    {
        let mut vocab = self;
        for (literal, token) in special_tokens {
            vocab.add_literal(literal.as_ref(), token);
        }
        vocab
    }

    /// Return the associated token for the literal, if any.
    pub fn lookup_token(
        &self,
        literal: &str,
    ) -> Option<T> {
        self.str_map.get(literal).copied()
    }

    /// Iterate over the special token literals.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.str_map.keys().map(String::as_str)
    }

    /// Get the maximum token value, if any.
    pub fn max_token(&self) -> Option<T> {
        self.str_map.values().max().copied()
    }

    /// Build the reverse ``{ token -> literal }`` table.
    pub fn build_reverse(&self) -> TokenStringMap<T> {
        self.str_map
            .iter()
            .map(|(literal, &token)| (token, literal.clone()))
            .collect()
    }

    /// Get the exact-match regex pattern for the special literals.
    ///
    /// ## Returns
    /// `None` if no special tokens are present;
    /// and `Some(RegexPattern)` otherwise.
    pub fn union_pattern(&self) -> Option<RegexPattern> {
        let literals = self.str_map.keys().collect::<Vec<_>>();
        special_union_pattern(&literals)
    }
}
