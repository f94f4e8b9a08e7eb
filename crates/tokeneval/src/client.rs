//! # Tokenization Client
//!
//! The high-level facade: binds one vocabulary to one engine at a time,
//! exposes encode/decode/count, and enforces the allowed/disallowed
//! special-token contract.

use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::{EngineOptions, ExecutionMode, TokenizationEngine};
use crate::errors::{Result, TokenEvalError};
use crate::pretrained::{EncodingType, ModelType, RankSource};
use crate::regex::special_union_pattern;
use crate::types::{TeHashSet, TokenType};

/// A special-token scope argument.
///
/// Resolves to a concrete literal set against the bound vocabulary:
/// `None` is the empty set, `All` is every special literal the
/// vocabulary defines, and `Set` is an explicit selection.
#[derive(Clone, Copy, Debug, Default)]
pub enum SpecialScope<'a> {
    /// No special tokens.
    #[default]
    None,

    /// All special tokens of the bound vocabulary.
    All,

    /// An explicit set of special token literals.
    Set(&'a [&'a str]),
}

/// Token count strategy for [`TokenEvalClient::encoded_token_count`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CountMode {
    /// The exact, special-token-aware count; agrees with `encode`.
    #[default]
    Exact,

    /// The memoized ordinary-pattern count; never intercepts special
    /// tokens, and may disagree with `encode` when the text contains
    /// special literals.
    Fast,
}

/// Client for tokenization encoding and decoding operations.
///
/// Bound to at most one active vocabulary at a time; `set_encoding*`
/// replaces the whole engine atomically, never mutating one in place.
/// Swapping is not synchronized against concurrent encodes on the same
/// client: callers must not encode while switching.
pub struct TokenEvalClient<T: TokenType, S: RankSource> {
    engine: Option<Arc<TokenizationEngine<T>>>,
    rank_source: S,
    options: EngineOptions,
    mode: ExecutionMode,
}

impl<T: TokenType, S: RankSource> TokenEvalClient<T, S> {
    /// Create a new client with no encoding bound.
    ///
    /// ## Arguments
    /// * `rank_source` - The vocabulary loading collaborator.
    pub fn new(rank_source: S) -> Self {
        Self {
            engine: None,
            rank_source,
            options: EngineOptions::default(),
            mode: ExecutionMode::default(),
        }
    }

    /// Set the engine construction options for subsequent bindings.
    pub fn with_options(
        mut self,
        options: EngineOptions,
    ) -> Self {
        self.options = options;
        self
    }

    /// Set the execution mode for encode/decode/count operations.
    pub fn with_mode(
        mut self,
        mode: ExecutionMode,
    ) -> Self {
        self.mode = mode;
        self
    }

    /// Get the currently bound engine, if any.
    pub fn engine(&self) -> Option<&Arc<TokenizationEngine<T>>> {
        self.engine.as_ref()
    }

    fn bound_engine(&self) -> Result<&Arc<TokenizationEngine<T>>> {
        self.engine.as_ref().ok_or(TokenEvalError::NoEncodingBound)
    }

    /// Bind the client to an encoding, replacing any previous engine.
    ///
    /// ## Arguments
    /// * `encoding` - The encoding to bind.
    pub fn set_encoding(
        &mut self,
        encoding: EncodingType,
    ) -> Result<()> {
        let vocab = encoding.load_vocab::<T, S>(&mut self.rank_source)?;
        let engine = TokenizationEngine::from_encoding(vocab, self.options.clone())?;

        log::debug!("bound encoding {}", encoding);
        self.engine = Some(Arc::new(engine));
        Ok(())
    }

    /// Bind the client to an encoding by name, replacing any previous
    /// engine.
    ///
    /// ## Arguments
    /// * `name` - The encoding name, e.g. "cl100k_base".
    pub fn set_encoding_by_name(
        &mut self,
        name: &str,
    ) -> Result<()> {
        self.set_encoding(EncodingType::for_name(name)?)
    }

    /// Bind the client to the encoding for a model, replacing any
    /// previous engine.
    ///
    /// ## Arguments
    /// * `model` - The model to resolve an encoding for.
    pub fn set_encoding_for_model(
        &mut self,
        model: ModelType,
    ) -> Result<()> {
        self.set_encoding(model.encoding())
    }

    /// Bind the client to the encoding for a model identifier, replacing
    /// any previous engine.
    ///
    /// ## Arguments
    /// * `model_id` - The model identifier, e.g. "gpt-4".
    pub fn set_encoding_for_model_name(
        &mut self,
        model_id: &str,
    ) -> Result<()> {
        self.set_encoding(crate::pretrained::models::encoding_for_model_name(
            model_id,
        )?)
    }

    /// Encode text into token ids.
    ///
    /// When any disallowed special literal occurs anywhere in `text`,
    /// the call fails with
    /// [`TokenEvalError::DisallowedSpecialTokenFound`] before any
    /// tokenization work.
    ///
    /// ## Arguments
    /// * `text` - The text to encode.
    /// * `allowed_special` - The allowed special-token scope.
    /// * `disallowed_special` - The disallowed special-token scope.
    ///
    /// ## Returns
    /// The ordered token ids.
    pub fn encode(
        &self,
        text: &str,
        allowed_special: SpecialScope<'_>,
        disallowed_special: SpecialScope<'_>,
    ) -> Result<Vec<T>> {
        let engine = self.bound_engine()?;

        let allowed = self.resolve_allowed(allowed_special);
        let disallowed = self.resolve_disallowed(disallowed_special, &allowed);
        check_disallowed_special(text, &disallowed)?;

        Ok(engine.encode(text, &allowed, self.mode)?.0)
    }

    /// Count the tokens `encode` would produce.
    ///
    /// ## Arguments
    /// * `text` - The text to count.
    /// * `allowed_special` - The allowed special-token scope.
    /// * `disallowed_special` - The disallowed special-token scope.
    /// * `count_mode` - Exact (special-aware) or fast (ordinary-pattern
    ///   only; ignores both scopes).
    ///
    /// ## Returns
    /// The token count.
    pub fn encoded_token_count(
        &self,
        text: &str,
        allowed_special: SpecialScope<'_>,
        disallowed_special: SpecialScope<'_>,
        count_mode: CountMode,
    ) -> Result<usize> {
        let engine = self.bound_engine()?;

        match count_mode {
            CountMode::Exact => {
                let allowed = self.resolve_allowed(allowed_special);
                let disallowed = self.resolve_disallowed(disallowed_special, &allowed);
                check_disallowed_special(text, &disallowed)?;

                Ok(engine.count_tokens(text, &allowed, self.mode))
            }
            CountMode::Fast => Ok(engine.count_tokens_fast(text, self.mode)),
        }
    }

    /// Decode token ids into text.
    ///
    /// Unknown ids are silently dropped (see
    /// [`TokenizationEngine::decode_bytes`]); use
    /// [`Self::decode_strict`] to fail loudly instead.
    ///
    /// ## Arguments
    /// * `tokens` - The token ids to decode.
    ///
    /// ## Returns
    /// The decoded text.
    pub fn decode(
        &self,
        tokens: &[T],
    ) -> Result<String> {
        self.bound_engine()?.decode(tokens, self.mode)
    }

    /// Decode token ids into text, failing on unknown ids.
    pub fn decode_strict(
        &self,
        tokens: &[T],
    ) -> Result<String> {
        self.bound_engine()?.decode_strict(tokens)
    }

    /// Get the special token literals of the bound vocabulary.
    ///
    /// ## Returns
    /// An empty set when no vocabulary is bound.
    pub fn special_tokens_set(&self) -> TeHashSet<String> {
        match &self.engine {
            Some(engine) => engine
                .vocab()
                .special_tokens()
                .literals()
                .map(str::to_string)
                .collect(),
            None => TeHashSet::default(),
        }
    }

    /// Override the vocabulary directory of the rank source.
    ///
    /// Applies to subsequent `set_encoding*` calls; the bound engine is
    /// unaffected.
    ///
    /// ## Arguments
    /// * `dir` - The directory containing rank files.
    pub fn override_vocab_dir(
        &mut self,
        dir: PathBuf,
    ) {
        self.rank_source.override_vocab_dir(dir);
    }

    fn resolve_allowed(
        &self,
        scope: SpecialScope<'_>,
    ) -> TeHashSet<String> {
        match scope {
            SpecialScope::None => TeHashSet::default(),
            SpecialScope::All => self.special_tokens_set(),
            SpecialScope::Set(literals) => literals.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn resolve_disallowed(
        &self,
        scope: SpecialScope<'_>,
        allowed: &TeHashSet<String>,
    ) -> TeHashSet<String> {
        match scope {
            SpecialScope::None => TeHashSet::default(),
            SpecialScope::All => self
                .special_tokens_set()
                .into_iter()
                .filter(|literal| !allowed.contains(literal))
                .collect(),
            SpecialScope::Set(literals) => literals.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(feature = "download")]
impl<T: TokenType> TokenEvalClient<T, crate::pretrained::DiskCacheRankSource> {
    /// Create a new client backed by the tokeneval disk cache.
    pub fn with_disk_cache() -> Result<Self> {
        Ok(Self::new(crate::pretrained::DiskCacheRankSource::new()?))
    }
}

/// Fail when any disallowed special literal occurs in the text.
fn check_disallowed_special(
    text: &str,
    disallowed: &TeHashSet<String>,
) -> Result<()> {
    if disallowed.is_empty() {
        return Ok(());
    }

    let literals = disallowed.iter().collect::<Vec<_>>();
    if let Some(pattern) = special_union_pattern(&literals) {
        if let Some(range) = pattern.compile()?.find_from(text, 0) {
            return Err(TokenEvalError::DisallowedSpecialTokenFound(
                text[range].to_string(),
            ));
        }
    }

    Ok(())
}
