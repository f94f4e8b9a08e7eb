//! # Model-to-Encoding Mapping

use core::str::FromStr;

use crate::errors::{Result, TokenEvalError};
use crate::pretrained::encodings::EncodingType;

/// The public model family.
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
#[allow(missing_docs)]
pub enum ModelType {
    // Chat models; cl100k.
    #[strum(serialize = "gpt-4")]
    Gpt4,
    #[strum(serialize = "gpt-3.5-turbo")]
    Gpt35Turbo,

    // Text models; p50k.
    #[strum(serialize = "text-davinci-003")]
    TextDavinci003,
    #[strum(serialize = "text-davinci-002")]
    TextDavinci002,
    #[strum(serialize = "text-davinci-001")]
    TextDavinci001,
    #[strum(serialize = "text-curie-001")]
    TextCurie001,
    #[strum(serialize = "text-babbage-001")]
    TextBabbage001,
    #[strum(serialize = "text-ada-001")]
    TextAda001,
    #[strum(serialize = "davinci")]
    Davinci,
    #[strum(serialize = "curie")]
    Curie,
    #[strum(serialize = "babbage")]
    Babbage,
    #[strum(serialize = "ada")]
    Ada,

    // Code models; p50k.
    #[strum(serialize = "code-davinci-002")]
    CodeDavinci002,
    #[strum(serialize = "code-davinci-001")]
    CodeDavinci001,
    #[strum(serialize = "code-cushman-002")]
    CodeCushman002,
    #[strum(serialize = "code-cushman-001")]
    CodeCushman001,
    #[strum(serialize = "davinci-codex")]
    DavinciCodex,
    #[strum(serialize = "cushman-codex")]
    CushmanCodex,

    // Edit models; p50k.
    #[strum(serialize = "text-davinci-edit-001")]
    TextDavinciEdit001,
    #[strum(serialize = "code-davinci-edit-001")]
    CodeDavinciEdit001,

    // Embedding models; cl100k.
    #[strum(serialize = "text-embedding-ada-002")]
    TextEmbeddingAda002,

    // Older similarity/search models; r50k.
    #[strum(serialize = "text-similarity-davinci-001")]
    TextSimilarityDavinci001,
    #[strum(serialize = "text-similarity-curie-001")]
    TextSimilarityCurie001,
    #[strum(serialize = "text-similarity-babbage-001")]
    TextSimilarityBabbage001,
    #[strum(serialize = "text-similarity-ada-001")]
    TextSimilarityAda001,
    #[strum(serialize = "text-search-davinci-doc-001")]
    TextSearchDavinciDoc001,
    #[strum(serialize = "text-search-curie-doc-001")]
    TextSearchCurieDoc001,
    #[strum(serialize = "text-search-babbage-doc-001")]
    TextSearchBabbageDoc001,
    #[strum(serialize = "text-search-ada-doc-001")]
    TextSearchAdaDoc001,
    #[strum(serialize = "code-search-babbage-code-001")]
    CodeSearchBabbageCode001,
    #[strum(serialize = "code-search-ada-code-001")]
    CodeSearchAdaCode001,
}

impl ModelType {
    /// Get the encoding type for this model.
    pub fn encoding(&self) -> EncodingType {
        use ModelType::*;
        match self {
            Gpt4 | Gpt35Turbo | TextEmbeddingAda002 => EncodingType::Cl100kBase,

            TextDavinci003 | TextDavinci002 | TextDavinci001 | TextCurie001 | TextBabbage001
            | TextAda001 | Davinci | Curie | Babbage | Ada => EncodingType::P50kBase,

            CodeDavinci002 | CodeDavinci001 | CodeCushman002 | CodeCushman001 | DavinciCodex
            | CushmanCodex => EncodingType::P50kBase,

            TextDavinciEdit001 | CodeDavinciEdit001 => EncodingType::P50kBase,

            TextSimilarityDavinci001 | TextSimilarityCurie001 | TextSimilarityBabbage001
            | TextSimilarityAda001 | TextSearchDavinciDoc001 | TextSearchCurieDoc001
            | TextSearchBabbageDoc001 | TextSearchAdaDoc001 | CodeSearchBabbageCode001
            | CodeSearchAdaCode001 => EncodingType::R50kBase,
        }
    }
}

/// Resolve the encoding type for a model identifier string.
///
/// ## Arguments
/// * `name` - The model identifier, e.g. "gpt-4".
///
/// ## Returns
/// [`TokenEvalError::UnsupportedModel`] for unknown identifiers.
pub fn encoding_for_model_name(name: &str) -> Result<EncodingType> {
    ModelType::from_str(name)
        .map(|model| model.encoding())
        .map_err(|_| TokenEvalError::UnsupportedModel(name.to_string()))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_model_encodings() {
        assert_eq!(ModelType::Gpt4.encoding(), EncodingType::Cl100kBase);
        assert_eq!(ModelType::Gpt35Turbo.encoding(), EncodingType::Cl100kBase);
        assert_eq!(ModelType::TextDavinci003.encoding(), EncodingType::P50kBase);
        assert_eq!(ModelType::CodeDavinci002.encoding(), EncodingType::P50kBase);
        assert_eq!(
            ModelType::TextEmbeddingAda002.encoding(),
            EncodingType::Cl100kBase
        );
        assert_eq!(
            ModelType::TextSearchAdaDoc001.encoding(),
            EncodingType::R50kBase
        );
    }

    #[test]
    fn test_model_names_round_trip() {
        for model in ModelType::iter() {
            let name = model.to_string();
            assert_eq!(ModelType::from_str(&name).unwrap(), model);
        }
    }

    #[test]
    fn test_encoding_for_model_name() {
        assert_eq!(
            encoding_for_model_name("gpt-4").unwrap(),
            EncodingType::Cl100kBase
        );
        assert!(matches!(
            encoding_for_model_name("gpt-imaginary"),
            Err(TokenEvalError::UnsupportedModel(_))
        ));
    }
}
