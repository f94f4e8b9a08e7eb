//! # Tokenization Engine

use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use rayon::prelude::*;

use crate::bpe::{byte_pair_count, byte_pair_encode};
use crate::engine::count_cache::CountCache;
use crate::errors::{Result, TokenEvalError};
use crate::segmentation::TextSegmentor;
use crate::types::{TeHashSet, TokenType};
use crate::vocab::{EncodingVocab, TokenSpanMap, TokenStringMap};

/// Default bound on the piece-count memoization cache.
pub const DEFAULT_COUNT_CACHE_CAPACITY: usize = 65_536;

/// Execution strategy for the engine pipelines.
///
/// Parallel modes are a pure throughput optimization: they never change
/// output order or content relative to sequential execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Single-threaded execution.
    #[default]
    Sequential,

    /// Data-parallel execution over independent pieces via `rayon`.
    Parallel,
}

/// Construction options for [`TokenizationEngine`].
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Bound on the piece-count memoization cache;
    /// `None` leaves the cache unbounded.
    pub count_cache_capacity: Option<usize>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            count_cache_capacity: Some(DEFAULT_COUNT_CACHE_CAPACITY),
        }
    }
}

/// The tokenization engine for one bound vocabulary.
///
/// Immutable once constructed; safe for concurrent shared use. The only
/// mutable state is the internally locked count cache, plus the reverse
/// decoder table which is built lazily on first decode.
pub struct TokenizationEngine<T: TokenType> {
    /// The bound vocabulary.
    vocab: EncodingVocab<T>,

    /// Ordinary + special-union segmentation.
    segmentor: TextSegmentor,

    /// Reverse ``{ id -> literal }`` table for special tokens.
    special_decoder: TokenStringMap<T>,

    /// Lazily built reverse ``{ rank -> bytes }`` table.
    decoder: OnceCell<TokenSpanMap<T>>,

    /// Memoized piece counts for the fast count path.
    count_cache: CountCache,
}

impl<T: TokenType> TokenizationEngine<T> {
    /// Construct an engine bound to the given vocabulary.
    ///
    /// ## Arguments
    /// * `vocab` - The encoding vocabulary to bind.
    /// * `options` - Engine construction options.
    ///
    /// ## Returns
    /// A new `TokenizationEngine` instance; or a pattern error when the
    /// vocabulary's patterns do not compile.
    pub fn from_encoding(
        vocab: EncodingVocab<T>,
        options: EngineOptions,
    ) -> Result<Self> {
        let segmentor = TextSegmentor::from_encoding(&vocab)?;
        let special_decoder = vocab.special_tokens().build_reverse();

        log::debug!(
            "built tokenization engine for {:?} ({} ranks, {} specials)",
            vocab.name(),
            vocab.mergeable_ranks().len(),
            vocab.special_tokens().len(),
        );

        Ok(Self {
            vocab,
            segmentor,
            special_decoder,
            decoder: OnceCell::new(),
            count_cache: CountCache::new(options.count_cache_capacity),
        })
    }

    /// Get the bound vocabulary.
    pub fn vocab(&self) -> &EncodingVocab<T> {
        &self.vocab
    }

    /// Get the segmentor.
    pub fn segmentor(&self) -> &TextSegmentor {
        &self.segmentor
    }

    /// Get the lazily built reverse decoder table.
    ///
    /// ## Returns
    /// [`TokenEvalError::DecoderSizeMismatch`] when the rank table is not
    /// a bijection; the failure is sticky only in the sense that every
    /// decode retries and fails identically.
    fn decoder(&self) -> Result<&TokenSpanMap<T>> {
        self.decoder
            .get_or_try_init(|| self.vocab.mergeable_ranks().build_reverse())
    }

    /// Encode one ordinary piece, exact-match fast path first.
    fn encode_piece(
        &self,
        piece: &str,
    ) -> Result<Vec<T>> {
        let bytes = piece.as_bytes();
        if let Some(token) = self.vocab.mergeable_ranks().lookup(bytes) {
            return Ok(vec![token]);
        }
        byte_pair_encode(bytes, self.vocab.mergeable_ranks().span_map())
    }

    /// Count one ordinary piece, exact-match fast path first.
    fn piece_count(
        &self,
        piece: &str,
    ) -> usize {
        let bytes = piece.as_bytes();
        if self.vocab.mergeable_ranks().contains(bytes) {
            return 1;
        }
        byte_pair_count(bytes, self.vocab.mergeable_ranks().span_map())
    }

    /// Count one ordinary piece through the memoization cache.
    ///
    /// Exact-match hits are not memoized; the rank table already answers
    /// them in one lookup.
    fn cached_piece_count(
        &self,
        piece: &str,
    ) -> usize {
        let bytes = piece.as_bytes();
        if self.vocab.mergeable_ranks().contains(bytes) {
            return 1;
        }
        if let Some(count) = self.count_cache.get(piece) {
            return count;
        }

        let count = byte_pair_count(bytes, self.vocab.mergeable_ranks().span_map());
        self.count_cache.insert(piece, count);
        count
    }

    /// Look up the id for an allowed special literal.
    fn special_token(
        &self,
        literal: &str,
    ) -> Result<T> {
        self.vocab
            .special_tokens()
            .lookup_token(literal)
            .ok_or_else(|| {
                TokenEvalError::VocabConflict(format!(
                    "special literal {literal:?} missing from the special table"
                ))
            })
    }

    /// Encode text into token ids.
    ///
    /// Ordinary pieces run through the exact-match fast path or the
    /// byte-pair merge; allowed special occurrences are substituted with
    /// their fixed ids. Parallel mode merges the ordinary pieces of each
    /// non-special region concurrently, collecting results in match
    /// order, so the output is identical to sequential mode.
    ///
    /// ## Arguments
    /// * `text` - The text to encode.
    /// * `allowed` - The allowed special token literals.
    /// * `mode` - The execution strategy.
    ///
    /// ## Returns
    /// The ordered token ids, and the number of ids contributed by the
    /// final piece (zero when the text ends with a special token).
    pub fn encode(
        &self,
        text: &str,
        allowed: &TeHashSet<String>,
        mode: ExecutionMode,
    ) -> Result<(Vec<T>, usize)> {
        let mut tokens = Vec::new();
        let mut last_piece_token_len = 0;
        let mut start = 0;

        loop {
            let next_special = self.segmentor.next_allowed_special(text, start, allowed);
            let end = next_special.as_ref().map_or(text.len(), |r| r.start);

            let ranges = self.segmentor.word_ranges(&text[start..end], start);
            match mode {
                ExecutionMode::Sequential => {
                    for range in ranges {
                        let ids = self.encode_piece(&text[range])?;
                        last_piece_token_len = ids.len();
                        tokens.extend(ids);
                    }
                }
                ExecutionMode::Parallel => {
                    let piece_ids = ranges
                        .into_par_iter()
                        .map(|range| self.encode_piece(&text[range]))
                        .collect::<Result<Vec<_>>>()?;
                    for ids in piece_ids {
                        last_piece_token_len = ids.len();
                        tokens.extend(ids);
                    }
                }
            }

            match next_special {
                Some(range) => {
                    tokens.push(self.special_token(&text[range.clone()])?);
                    last_piece_token_len = 0;
                    start = range.end;
                }
                None => break,
            }
        }

        Ok((tokens, last_piece_token_len))
    }

    /// Count the tokens [`Self::encode`] would produce, without
    /// materializing the id list.
    ///
    /// ## Arguments
    /// * `text` - The text to count.
    /// * `allowed` - The allowed special token literals.
    /// * `mode` - The execution strategy.
    ///
    /// ## Returns
    /// The exact token count.
    pub fn count_tokens(
        &self,
        text: &str,
        allowed: &TeHashSet<String>,
        mode: ExecutionMode,
    ) -> usize {
        let mut total = 0;
        let mut start = 0;

        loop {
            let next_special = self.segmentor.next_allowed_special(text, start, allowed);
            let end = next_special.as_ref().map_or(text.len(), |r| r.start);

            let ranges = self.segmentor.word_ranges(&text[start..end], start);
            total += match mode {
                ExecutionMode::Sequential => ranges
                    .into_iter()
                    .map(|range| self.piece_count(&text[range]))
                    .sum(),
                ExecutionMode::Parallel => ranges
                    .into_par_iter()
                    .map(|range| self.piece_count(&text[range]))
                    .sum::<usize>(),
            };

            match next_special {
                Some(range) => {
                    total += 1;
                    start = range.end;
                }
                None => break,
            }
        }

        total
    }

    /// Count tokens over the ordinary pattern only, memoizing piece
    /// counts.
    ///
    /// This path never intercepts special tokens: special literals in
    /// the text are counted as ordinary text, so the result may
    /// legitimately differ from [`Self::count_tokens`] with a non-empty
    /// allowed set. Callers choose this path for throughput on
    /// special-free text.
    ///
    /// ## Arguments
    /// * `text` - The text to count.
    /// * `mode` - The execution strategy.
    ///
    /// ## Returns
    /// The token count over the ordinary pattern.
    pub fn count_tokens_fast(
        &self,
        text: &str,
        mode: ExecutionMode,
    ) -> usize {
        let ranges = self.segmentor.word_ranges(text, 0);

        match mode {
            ExecutionMode::Sequential => ranges
                .into_iter()
                .map(|range| self.cached_piece_count(&text[range]))
                .sum(),
            ExecutionMode::Parallel => {
                let total = AtomicUsize::new(0);
                ranges.into_par_iter().for_each(|range| {
                    let count = self.cached_piece_count(&text[range]);
                    total.fetch_add(count, Ordering::Relaxed);
                });
                total.into_inner()
            }
        }
    }

    /// Decode token ids into bytes.
    ///
    /// Ids are resolved against the ordinary reverse table first, then
    /// the special reverse table. **Ids present in neither table are
    /// silently dropped**; this lossy compatibility behavior can mask
    /// truncated or corrupted token streams. Use
    /// [`Self::decode_bytes_strict`] to fail loudly instead.
    ///
    /// ## Arguments
    /// * `tokens` - The token ids to decode.
    /// * `mode` - The execution strategy.
    ///
    /// ## Returns
    /// The concatenated bytes, in input order.
    pub fn decode_bytes(
        &self,
        tokens: &[T],
        mode: ExecutionMode,
    ) -> Result<Vec<u8>> {
        let decoder = self.decoder()?;

        let lookup = |token: &T| -> Option<&[u8]> {
            decoder
                .get(token)
                .map(Vec::as_slice)
                .or_else(|| self.special_decoder.get(token).map(String::as_bytes))
        };

        let mut out = Vec::with_capacity(tokens.len() * 2);
        match mode {
            ExecutionMode::Sequential => {
                for token in tokens {
                    if let Some(bytes) = lookup(token) {
                        out.extend_from_slice(bytes);
                    }
                }
            }
            ExecutionMode::Parallel => {
                let chunks: Vec<Option<&[u8]>> = tokens.par_iter().map(lookup).collect();
                for bytes in chunks.into_iter().flatten() {
                    out.extend_from_slice(bytes);
                }
            }
        }

        Ok(out)
    }

    /// Decode token ids into bytes, failing on unknown ids.
    ///
    /// ## Arguments
    /// * `tokens` - The token ids to decode.
    ///
    /// ## Returns
    /// The concatenated bytes; or [`TokenEvalError::UnknownTokenId`] for
    /// the first id absent from both reverse tables.
    pub fn decode_bytes_strict(
        &self,
        tokens: &[T],
    ) -> Result<Vec<u8>> {
        let decoder = self.decoder()?;

        let mut out = Vec::with_capacity(tokens.len() * 2);
        for token in tokens {
            if let Some(bytes) = decoder.get(token) {
                out.extend_from_slice(bytes);
            } else if let Some(literal) = self.special_decoder.get(token) {
                out.extend_from_slice(literal.as_bytes());
            } else {
                return Err(TokenEvalError::UnknownTokenId(
                    token.to_u64().unwrap_or(u64::MAX),
                ));
            }
        }

        Ok(out)
    }

    /// Decode token ids into text.
    ///
    /// Unknown ids are silently dropped; invalid UTF-8 decodes lossily.
    ///
    /// ## Arguments
    /// * `tokens` - The token ids to decode.
    /// * `mode` - The execution strategy.
    ///
    /// ## Returns
    /// The decoded text.
    pub fn decode(
        &self,
        tokens: &[T],
        mode: ExecutionMode,
    ) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.decode_bytes(tokens, mode)?).into_owned())
    }

    /// Decode token ids into text, failing on unknown ids.
    pub fn decode_strict(
        &self,
        tokens: &[T],
    ) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.decode_bytes_strict(tokens)?).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pretrained::patterns::GPT2_R50K_WORD_PATTERN;
    use crate::regex::RegexPattern;
    use crate::vocab::SpanTokenMap;

    type T = u32;

    /// All 256 single bytes, rank = byte value.
    fn byte_ranks() -> SpanTokenMap<T> {
        (0u32..=255).map(|b| (vec![b as u8], b)).collect()
    }

    fn byte_vocab() -> EncodingVocab<T> {
        EncodingVocab::new(
            "bytes_test",
            RegexPattern::Fancy(GPT2_R50K_WORD_PATTERN.to_string()),
        )
        .with_ranks(byte_ranks())
        .with_special_tokens([("<|endoftext|>", 300u32)])
    }

    fn engine() -> TokenizationEngine<T> {
        TokenizationEngine::from_encoding(byte_vocab(), EngineOptions::default()).unwrap()
    }

    fn allowed_of(literals: &[&str]) -> TeHashSet<String> {
        literals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_special_substitution() {
        let engine = engine();
        let allowed = allowed_of(&["<|endoftext|>"]);

        let (tokens, last) = engine
            .encode("a<|endoftext|>b", &allowed, ExecutionMode::Sequential)
            .unwrap();
        assert_eq!(tokens, vec![97, 300, 98]);
        assert_eq!(last, 1);

        // Text ending with a special resets the last-piece length.
        let (tokens, last) = engine
            .encode("a<|endoftext|>", &allowed, ExecutionMode::Sequential)
            .unwrap();
        assert_eq!(tokens, vec![97, 300]);
        assert_eq!(last, 0);
    }

    #[test]
    fn test_unrequested_special_encodes_as_text() {
        let engine = engine();

        let (tokens, _) = engine
            .encode("a<|endoftext|>b", &allowed_of(&[]), ExecutionMode::Sequential)
            .unwrap();
        assert_eq!(tokens.len(), "a<|endoftext|>b".len());
        assert!(!tokens.contains(&300));
    }

    #[test]
    fn test_sequential_parallel_parity() {
        let engine = engine();
        let allowed = allowed_of(&["<|endoftext|>"]);
        let text = "The quick brown fox<|endoftext|> jumped over 10 lazy dogs!";

        let (seq, seq_last) = engine.encode(text, &allowed, ExecutionMode::Sequential).unwrap();
        let (par, par_last) = engine.encode(text, &allowed, ExecutionMode::Parallel).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq_last, par_last);

        assert_eq!(
            engine.count_tokens(text, &allowed, ExecutionMode::Sequential),
            engine.count_tokens(text, &allowed, ExecutionMode::Parallel),
        );
    }

    #[test]
    fn test_count_matches_encode() {
        let engine = engine();
        let allowed = allowed_of(&["<|endoftext|>"]);
        let text = "hello world<|endoftext|>again";

        let (tokens, _) = engine.encode(text, &allowed, ExecutionMode::Sequential).unwrap();
        assert_eq!(
            engine.count_tokens(text, &allowed, ExecutionMode::Sequential),
            tokens.len(),
        );
    }

    #[test]
    fn test_fast_count_ignores_specials() {
        let engine = engine();
        let text = "a<|endoftext|>b";

        // The fast path tokenizes the special literal as ordinary text;
        // with the byte vocabulary that is one token per byte.
        let fast = engine.count_tokens_fast(text, ExecutionMode::Sequential);
        assert_eq!(fast, text.len());

        let exact = engine
            .count_tokens(text, &allowed_of(&["<|endoftext|>"]), ExecutionMode::Sequential);
        assert_eq!(exact, 3);
        assert_ne!(fast, exact);

        // Memoized pieces answer from the cache on repeat.
        assert_eq!(
            engine.count_tokens_fast(text, ExecutionMode::Parallel),
            fast,
        );
    }

    #[test]
    fn test_decode_round_trip() {
        let engine = engine();
        let allowed = allowed_of(&["<|endoftext|>"]);
        let text = "hello <|endoftext|> world";

        let (tokens, _) = engine.encode(text, &allowed, ExecutionMode::Sequential).unwrap();
        assert_eq!(engine.decode(&tokens, ExecutionMode::Sequential).unwrap(), text);
        assert_eq!(engine.decode(&tokens, ExecutionMode::Parallel).unwrap(), text);
    }

    #[test]
    fn test_decode_drops_unknown_ids() {
        let engine = engine();

        let tokens = vec![104, 105, 9999];
        assert_eq!(engine.decode(&tokens, ExecutionMode::Sequential).unwrap(), "hi");
        assert_eq!(engine.decode(&tokens, ExecutionMode::Parallel).unwrap(), "hi");

        assert!(matches!(
            engine.decode_strict(&tokens),
            Err(TokenEvalError::UnknownTokenId(9999))
        ));
    }

    #[test]
    fn test_decoder_bijection_failure_surfaces() {
        let mut ranks = byte_ranks();
        // Introduce a rank collision; encode still works, decode fails.
        ranks.insert(b"aa".to_vec(), 97);

        let vocab = EncodingVocab::new(
            "broken_test",
            RegexPattern::Fancy(GPT2_R50K_WORD_PATTERN.to_string()),
        )
        .with_ranks(ranks);
        let engine = TokenizationEngine::from_encoding(vocab, EngineOptions::default()).unwrap();

        let (tokens, _) = engine
            .encode("hi", &allowed_of(&[]), ExecutionMode::Sequential)
            .unwrap();
        assert_eq!(tokens, vec![104, 105]);

        assert!(matches!(
            engine.decode_bytes(&tokens, ExecutionMode::Sequential),
            Err(TokenEvalError::DecoderSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_text() {
        let engine = engine();
        let allowed = allowed_of(&[]);

        let (tokens, last) = engine.encode("", &allowed, ExecutionMode::Sequential).unwrap();
        assert!(tokens.is_empty());
        assert_eq!(last, 0);

        assert_eq!(engine.count_tokens("", &allowed, ExecutionMode::Sequential), 0);
        assert_eq!(engine.count_tokens_fast("", ExecutionMode::Parallel), 0);
        assert_eq!(engine.decode(&[], ExecutionMode::Sequential).unwrap(), "");
    }
}
