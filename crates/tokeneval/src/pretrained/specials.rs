//! # Special Token Tables

/// The end-of-text marker literal.
pub const ENDOFTEXT: &str = "<|endoftext|>";

/// The fill-in-the-middle prefix marker literal.
pub const FIM_PREFIX: &str = "<|fim_prefix|>";

/// The fill-in-the-middle middle marker literal.
pub const FIM_MIDDLE: &str = "<|fim_middle|>";

/// The fill-in-the-middle suffix marker literal.
pub const FIM_SUFFIX: &str = "<|fim_suffix|>";

/// The end-of-prompt marker literal.
pub const ENDOFPROMPT: &str = "<|endofprompt|>";

/// The r50k special tokens.
pub const R50K_BASE_SPECIALS: &[(&str, u64)] = &[(ENDOFTEXT, 50256)];

/// The p50k base special tokens.
pub const P50K_BASE_SPECIALS: &[(&str, u64)] = &[(ENDOFTEXT, 50256)];

/// The p50k edit special tokens.
pub const P50K_EDIT_SPECIALS: &[(&str, u64)] = &[
    (ENDOFTEXT, 50256),
    (FIM_PREFIX, 50281),
    (FIM_MIDDLE, 50282),
    (FIM_SUFFIX, 50283),
];

/// The cl100k base special tokens.
pub const CL100K_BASE_SPECIALS: &[(&str, u64)] = &[
    (ENDOFTEXT, 100257),
    (FIM_PREFIX, 100258),
    (FIM_MIDDLE, 100259),
    (FIM_SUFFIX, 100260),
    (ENDOFPROMPT, 100276),
];
