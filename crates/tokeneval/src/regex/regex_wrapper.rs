//! # Regex Wrapper

use core::ops::Range;

use crate::errors::{Result, TokenEvalError};

/// Label for regex patterns.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RegexPattern {
    /// This is a pattern for the `regex` crate.
    Basic(String),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(String),

    /// This pattern will try the `regex` crate first,
    /// and fall back to `fancy_regex` if it fails.
    Adaptive(String),
}

impl<S: AsRef<str>> From<S> for RegexPattern {
    fn from(pattern: S) -> Self {
        Self::Adaptive(pattern.as_ref().to_string())
    }
}

impl RegexPattern {
    /// Get the underlying regex pattern.
    ///
    /// ## Returns
    /// The regex pattern string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
            Self::Adaptive(pattern) => pattern,
        }
    }

    /// Compile the regex pattern into a [`CompiledPattern`].
    ///
    /// ## Returns
    /// A `Result` containing the compiled pattern,
    /// or a [`TokenEvalError::Pattern`] error.
    pub fn compile(&self) -> Result<CompiledPattern> {
        match self {
            Self::Basic(pattern) => regex::Regex::new(pattern)
                .map(CompiledPattern::from)
                .map_err(|e| TokenEvalError::Pattern(e.to_string())),
            Self::Fancy(pattern) => fancy_regex::Regex::new(pattern)
                .map(CompiledPattern::from)
                .map_err(|e| TokenEvalError::Pattern(e.to_string())),
            Self::Adaptive(pattern) => regex::Regex::new(pattern)
                .map(CompiledPattern::from)
                .or_else(|_| {
                    fancy_regex::Regex::new(pattern)
                        .map(CompiledPattern::from)
                        .map_err(|e| TokenEvalError::Pattern(e.to_string()))
                }),
        }
    }
}

/// Wrapper for compiled regex patterns.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// Wrapper for `regex::Regex`.
    Basic(regex::Regex),

    /// Wrapper for `fancy_regex::Regex`.
    Fancy(fancy_regex::Regex),
}

impl From<regex::Regex> for CompiledPattern {
    fn from(regex: regex::Regex) -> Self {
        Self::Basic(regex)
    }
}

impl From<fancy_regex::Regex> for CompiledPattern {
    fn from(regex: fancy_regex::Regex) -> Self {
        Self::Fancy(regex)
    }
}

impl CompiledPattern {
    /// Get the underlying regex pattern.
    ///
    /// ## Returns
    /// The regex pattern string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(regex) => regex.as_str(),
            Self::Fancy(regex) => regex.as_str(),
        }
    }

    /// Iterate over the byte ranges of all non-overlapping matches.
    ///
    /// ## Arguments
    /// * `haystack` - The string to search in.
    ///
    /// ## Returns
    /// A [`PatternMatches`] iterator over the match ranges.
    pub fn find_iter<'r, 'h>(
        &'r self,
        haystack: &'h str,
    ) -> PatternMatches<'r, 'h> {
        match self {
            Self::Basic(regex) => PatternMatches::Basic(regex.find_iter(haystack)),
            Self::Fancy(regex) => PatternMatches::Fancy(regex.find_iter(haystack)),
        }
    }

    /// Find the first match at or after the `start` byte offset.
    ///
    /// ## Arguments
    /// * `haystack` - The string to search in.
    /// * `start` - The byte offset to start the search at.
    ///
    /// ## Returns
    /// The byte range of the match, absolute in `haystack`; if any.
    pub fn find_from(
        &self,
        haystack: &str,
        start: usize,
    ) -> Option<Range<usize>> {
        match self {
            Self::Basic(regex) => regex.find_at(haystack, start).map(|m| m.range()),
            Self::Fancy(regex) => regex
                .find_from_pos(haystack, start)
                .ok()
                .flatten()
                .map(|m| m.range()),
        }
    }
}

/// Iterator over match byte ranges.
pub enum PatternMatches<'r, 'h> {
    /// Wrapper for `regex::Matches`.
    Basic(regex::Matches<'r, 'h>),

    /// Wrapper for `fancy_regex::Matches`.
    Fancy(fancy_regex::Matches<'r, 'h>),
}

impl Iterator for PatternMatches<'_, '_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Basic(matches) => matches.next().map(|m| m.range()),
            Self::Fancy(matches) => matches.next().and_then(|m| m.ok()).map(|m| m.range()),
        }
    }
}
