//! # Text Segmentor

use core::ops::Range;

use crate::errors::Result;
use crate::regex::{CompiledPattern, RegexPattern, special_union_pattern};
use crate::types::{TeHashSet, TokenType};
use crate::vocab::EncodingVocab;

/// Span reference for [`TextSegmentor`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpanRef {
    /// An ordinary piece, subject to byte-pair merging.
    Ordinary(Range<usize>),

    /// An allowed special token occurrence.
    Special(Range<usize>),
}

impl From<SpanRef> for Range<usize> {
    fn from(span: SpanRef) -> Self {
        match span {
            SpanRef::Ordinary(range) => range,
            SpanRef::Special(range) => range,
        }
    }
}

/// Word Split + Special Token Segmentor.
#[derive(Debug, Clone)]
pub struct TextSegmentor {
    /// Regex for splitting ordinary words.
    word_re: CompiledPattern,

    /// Regex matching any special token literal.
    special_re: Option<CompiledPattern>,
}

impl TextSegmentor {
    /// Create a new text segmentor from an encoding vocabulary.
    ///
    /// ## Arguments
    /// * `vocab` - The encoding vocabulary.
    ///
    /// ## Returns
    /// A new `TextSegmentor` instance.
    pub fn from_encoding<T: TokenType>(vocab: &EncodingVocab<T>) -> Result<Self> {
        Self::init(vocab.pattern(), vocab.special_tokens().union_pattern())
    }

    /// Create a new text segmentor with the given word pattern and special
    /// token literals.
    ///
    /// ## Arguments
    /// * `word_pattern` - The word split pattern.
    /// * `specials` - A slice of special token literal strings.
    ///
    /// ## Returns
    /// A new `TextSegmentor` instance.
    pub fn from_patterns<P, S>(
        word_pattern: P,
        specials: &[S],
    ) -> Result<Self>
    where
        P: Into<RegexPattern>,
        S: AsRef<str>,
    {
        Self::init(&word_pattern.into(), special_union_pattern(specials))
    }

    fn init(
        word_pattern: &RegexPattern,
        special_pattern: Option<RegexPattern>,
    ) -> Result<Self> {
        Ok(Self {
            word_re: word_pattern.compile()?,
            special_re: match special_pattern {
                Some(pattern) => Some(pattern.compile()?),
                None => None,
            },
        })
    }

    /// Get the word split regex.
    pub fn word_regex(&self) -> &CompiledPattern {
        &self.word_re
    }

    /// Find the next *allowed* special token occurrence.
    ///
    /// Disallowed-but-unrequested special strings are stepped past (one
    /// character beyond their start), so they end up tokenized as
    /// ordinary text rather than skipped.
    ///
    /// ## Arguments
    /// * `text` - The text to search in.
    /// * `start` - The byte offset to start the search at.
    /// * `allowed` - The allowed special token literals.
    ///
    /// ## Returns
    /// The byte range of the next allowed occurrence, if any.
    pub fn next_allowed_special(
        &self,
        text: &str,
        start: usize,
        allowed: &TeHashSet<String>,
    ) -> Option<Range<usize>> {
        let special_re = self.special_re.as_ref()?;

        let mut find_start = start;
        while let Some(range) = special_re.find_from(text, find_start) {
            if allowed.contains(&text[range.clone()]) {
                return Some(range);
            }
            let step = text[range.start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            find_start = range.start + step;
            if find_start > text.len() {
                break;
            }
        }
        None
    }

    /// Collect the ordinary word ranges within a region of text.
    ///
    /// ## Arguments
    /// * `region` - The text region to split.
    /// * `offset` - The byte offset of `region` within the full text;
    ///   added to every returned range.
    ///
    /// ## Returns
    /// The word ranges, in match order.
    pub fn word_ranges(
        &self,
        region: &str,
        offset: usize,
    ) -> Vec<Range<usize>> {
        self.word_re
            .find_iter(region)
            .map(|r| r.start + offset..r.end + offset)
            .collect()
    }

    /// Split text into ordered special/ordinary spans.
    ///
    /// ## Arguments
    /// * `text` - The text to split.
    /// * `allowed` - The allowed special token literals.
    ///
    /// ## Returns
    /// A vector of [`SpanRef`] items covering all pattern matches.
    pub fn split_spans(
        &self,
        text: &str,
        allowed: &TeHashSet<String>,
    ) -> Vec<SpanRef> {
        let mut spans = Vec::new();
        let mut start = 0;

        loop {
            let next_special = self.next_allowed_special(text, start, allowed);
            let end = next_special.as_ref().map_or(text.len(), |r| r.start);

            spans.extend(
                self.word_ranges(&text[start..end], start)
                    .into_iter()
                    .map(SpanRef::Ordinary),
            );

            match next_special {
                Some(range) => {
                    start = range.end;
                    spans.push(SpanRef::Special(range));
                }
                None => break,
            }
        }

        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pretrained::patterns::GPT2_R50K_WORD_PATTERN;

    fn allowed_of(literals: &[&str]) -> TeHashSet<String> {
        literals.iter().map(|s| s.to_string()).collect()
    }

    fn r50k_segmentor(specials: &[&str]) -> TextSegmentor {
        TextSegmentor::from_patterns(
            RegexPattern::Fancy(GPT2_R50K_WORD_PATTERN.to_string()),
            specials,
        )
        .unwrap()
    }

    #[test]
    fn test_word_splits() {
        let segmentor = r50k_segmentor(&[]);

        let buf = "hello world!";
        assert_eq!(
            segmentor.split_spans(buf, &allowed_of(&[])),
            vec![
                SpanRef::Ordinary(0..5),
                SpanRef::Ordinary(5..11),
                SpanRef::Ordinary(11..12),
            ],
        );
    }

    #[test]
    fn test_allowed_special_interception() {
        let segmentor = r50k_segmentor(&["<|FNORD|>", "<|NORP|>"]);

        let buf = "hello<|FNORD|> wor<|NORP|>ld";
        assert_eq!(
            segmentor.split_spans(buf, &allowed_of(&["<|FNORD|>", "<|NORP|>"])),
            vec![
                SpanRef::Ordinary(0..5),
                SpanRef::Special(5..14),
                SpanRef::Ordinary(14..18),
                SpanRef::Special(18..26),
                SpanRef::Ordinary(26..28),
            ],
        );
    }

    #[test]
    fn test_unrequested_special_is_ordinary_text() {
        let segmentor = r50k_segmentor(&["<|FNORD|>"]);

        // Not in the allowed set: the literal is split as ordinary text,
        // not intercepted and not skipped.
        let buf = "a<|FNORD|>b";
        assert_eq!(
            segmentor.split_spans(buf, &allowed_of(&[])),
            vec![
                SpanRef::Ordinary(0..1),
                SpanRef::Ordinary(1..3),
                SpanRef::Ordinary(3..8),
                SpanRef::Ordinary(8..10),
                SpanRef::Ordinary(10..11),
            ],
        );
    }

    #[test]
    fn test_next_allowed_special_steps_past_disallowed() {
        let segmentor = r50k_segmentor(&["<|A|>", "<|B|>"]);

        let buf = "x<|A|>y<|B|>z";
        let allowed = allowed_of(&["<|B|>"]);
        assert_eq!(segmentor.next_allowed_special(buf, 0, &allowed), Some(7..12));
        assert_eq!(segmentor.next_allowed_special(buf, 12, &allowed), None);
    }
}
