//! # Public Encoding Types

use core::str::FromStr;

use crate::errors::{Result, TokenEvalError};
use crate::pretrained::patterns::{GPT2_R50K_WORD_PATTERN, GPT3_CL100K_WORD_PATTERN};
use crate::pretrained::rank_source::RankSource;
use crate::pretrained::specials::{
    CL100K_BASE_SPECIALS,
    P50K_BASE_SPECIALS,
    P50K_EDIT_SPECIALS,
    R50K_BASE_SPECIALS,
};
use crate::regex::RegexPattern;
use crate::types::TokenType;
use crate::vocab::{EncodingVocab, SpanTokenMap};

/// The public encoding family.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
)]
#[non_exhaustive]
pub enum EncodingType {
    /// GPT-2 "`r50k_base`" encoding.
    #[strum(serialize = "r50k_base")]
    R50kBase,

    /// GPT-2 "`p50k_base`" encoding.
    #[strum(serialize = "p50k_base")]
    P50kBase,

    /// GPT-2 "`p50k_edit`" encoding.
    #[strum(serialize = "p50k_edit")]
    P50kEdit,

    /// GPT-3 "`cl100k_base`" encoding.
    #[strum(serialize = "cl100k_base")]
    Cl100kBase,
}

impl EncodingType {
    /// Resolve an encoding type from its name.
    ///
    /// ## Arguments
    /// * `name` - The encoding name, e.g. "cl100k_base".
    ///
    /// ## Returns
    /// [`TokenEvalError::UnsupportedEncoding`] for unknown names.
    pub fn for_name(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| TokenEvalError::UnsupportedEncoding(name.to_string()))
    }

    /// Get the encoding name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::R50kBase => "r50k_base",
            Self::P50kBase => "p50k_base",
            Self::P50kEdit => "p50k_edit",
            Self::Cl100kBase => "cl100k_base",
        }
    }

    /// Get the ordinary-token split pattern.
    pub fn word_pattern(&self) -> RegexPattern {
        match self {
            Self::R50kBase | Self::P50kBase | Self::P50kEdit => {
                RegexPattern::Fancy(GPT2_R50K_WORD_PATTERN.to_string())
            }
            Self::Cl100kBase => RegexPattern::Fancy(GPT3_CL100K_WORD_PATTERN.to_string()),
        }
    }

    /// Get the special token table.
    pub fn special_tokens(&self) -> &'static [(&'static str, u64)] {
        match self {
            Self::R50kBase => R50K_BASE_SPECIALS,
            Self::P50kBase => P50K_BASE_SPECIALS,
            Self::P50kEdit => P50K_EDIT_SPECIALS,
            Self::Cl100kBase => CL100K_BASE_SPECIALS,
        }
    }

    /// Get the declared vocabulary size, if the encoding defines one.
    pub fn explicit_vocab_size(&self) -> Option<usize> {
        match self {
            Self::R50kBase => Some(50257),
            Self::P50kBase => Some(50281),
            // p50k_edit reuses the p50k rank file with a wider special
            // table; no consistent declared size exists for it.
            Self::P50kEdit => None,
            Self::Cl100kBase => None,
        }
    }

    /// Get the rank file name for this encoding.
    ///
    /// p50k_edit shares the p50k_base rank file.
    pub fn rank_file_name(&self) -> &'static str {
        match self {
            Self::R50kBase => "r50k_base.tiktoken",
            Self::P50kBase | Self::P50kEdit => "p50k_base.tiktoken",
            Self::Cl100kBase => "cl100k_base.tiktoken",
        }
    }

    /// Get the public mirror URLs for the rank file.
    pub fn rank_file_urls(&self) -> &'static [&'static str] {
        match self {
            Self::R50kBase => {
                &["https://openaipublic.blob.core.windows.net/encodings/r50k_base.tiktoken"]
            }
            Self::P50kBase | Self::P50kEdit => {
                &["https://openaipublic.blob.core.windows.net/encodings/p50k_base.tiktoken"]
            }
            Self::Cl100kBase => {
                &["https://openaipublic.blob.core.windows.net/encodings/cl100k_base.tiktoken"]
            }
        }
    }

    /// Assemble an [`EncodingVocab`] from already-loaded ranks.
    ///
    /// ## Arguments
    /// * `ranks` - The mergeable rank table for this encoding.
    ///
    /// ## Returns
    /// The assembled vocabulary; or [`TokenEvalError::TokenOutOfRange`]
    /// when a special token id does not fit `T`.
    pub fn build_vocab<T: TokenType>(
        &self,
        ranks: SpanTokenMap<T>,
    ) -> Result<EncodingVocab<T>> {
        let mut specials = Vec::with_capacity(self.special_tokens().len());
        for &(literal, id) in self.special_tokens() {
            let token = T::from_u64(id).ok_or(TokenEvalError::TokenOutOfRange)?;
            specials.push((literal, token));
        }

        Ok(EncodingVocab::new(self.name(), self.word_pattern())
            .with_ranks(ranks)
            .with_special_tokens(specials)
            .with_explicit_vocab_size(self.explicit_vocab_size()))
    }

    /// Load an [`EncodingVocab`] through a rank source.
    ///
    /// ## Arguments
    /// * `source` - The rank source collaborator.
    ///
    /// ## Returns
    /// The assembled vocabulary.
    pub fn load_vocab<T, S>(
        &self,
        source: &mut S,
    ) -> Result<EncodingVocab<T>>
    where
        T: TokenType,
        S: RankSource,
    {
        self.build_vocab(source.load_ranks(*self)?)
    }
}
