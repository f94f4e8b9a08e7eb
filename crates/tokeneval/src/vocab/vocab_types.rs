//! # Vocabulary Map Types

use crate::types::TeHashMap;

/// Map from byte spans to tokens.
pub type SpanTokenMap<T> = TeHashMap<Vec<u8>, T>;

/// Map from tokens to byte spans.
pub type TokenSpanMap<T> = TeHashMap<T, Vec<u8>>;

/// Map from literal strings to tokens.
pub type StringTokenMap<T> = TeHashMap<String, T>;

/// Map from tokens to literal strings.
pub type TokenStringMap<T> = TeHashMap<T, String>;
