//! # Regex Support
//!
//! This module provides mechanisms to mix `regex` and `fancy_regex` types.
//!
//! The GPT-style word patterns use a negative look-ahead (`\s+(?!\S)`),
//! which the `regex` crate cannot express; special-token unions are plain
//! escaped alternations which the faster `regex` crate handles. The
//! [`RegexPattern::Adaptive`] variant compiles with `regex` first and
//! falls back to `fancy_regex`.

pub mod regex_wrapper;
pub mod special_union;

#[doc(inline)]
pub use regex_wrapper::{CompiledPattern, PatternMatches, RegexPattern};
#[doc(inline)]
pub use special_union::special_union_pattern;
