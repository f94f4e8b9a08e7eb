//! # Vocabulary
//!
//! This module provides the vocabulary data model and related io.
//!
//! The user-oriented vocabulary is [`EncodingVocab`], which contains:
//! * `pattern` - the ordinary-token split pattern,
//! * `mergeable_ranks` - a [`RankVocab`] ``{ Vec<u8> -> T }`` vocabulary,
//! * `special_tokens` - a [`SpecialVocab`] ``{ String -> T }`` vocabulary.

pub mod encoding_vocab;
pub mod io;
pub mod rank_vocab;
pub mod special_vocab;
pub mod vocab_types;

#[doc(inline)]
pub use encoding_vocab::EncodingVocab;
#[doc(inline)]
pub use rank_vocab::RankVocab;
#[doc(inline)]
pub use special_vocab::SpecialVocab;
#[doc(inline)]
pub use vocab_types::{SpanTokenMap, StringTokenMap, TokenSpanMap, TokenStringMap};
