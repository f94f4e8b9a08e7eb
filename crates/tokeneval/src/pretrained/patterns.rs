//! # Word-Split Patterns
//!
//! The GPT-style ordinary-token patterns. Both use a negative look-ahead
//! on trailing whitespace and compile on the `fancy_regex` engine.

/// The GPT-2 r50k/p50k word pattern.
pub const GPT2_R50K_WORD_PATTERN: &str =
    r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

/// The GPT-3 cl100k word pattern.
///
/// Differs from the GPT-2 pattern in case-insensitive contractions,
/// digit runs capped at three, and explicit newline-run handling.
pub const GPT3_CL100K_WORD_PATTERN: &str = r"(?i:'s|'t|'re|'ve|'m|'ll|'d)|[^\r\n\p{L}\p{N}]?\p{L}+|\p{N}{1,3}| ?[^\s\p{L}\p{N}]+[\r\n]*|\s*[\r\n]+|\s+(?!\S)|\s+";
