//! # Special-Token Union Patterns

use crate::regex::RegexPattern;

/// Build an exact-match alternation pattern over the given literals.
///
/// Literals are escaped, then sorted longest-first so that overlapping
/// literals (one a prefix of another) always match their longest form.
///
/// ## Arguments
/// * `literals` - The literal strings to match.
///
/// ## Returns
/// `None` if `literals` is empty; a basic-engine [`RegexPattern`] otherwise.
pub fn special_union_pattern<S: AsRef<str>>(literals: &[S]) -> Option<RegexPattern> {
    if literals.is_empty() {
        return None;
    }

    let mut escaped = literals
        .iter()
        .map(|s| regex::escape(s.as_ref()))
        .collect::<Vec<_>>();
    escaped.sort_by_key(|s| core::cmp::Reverse(s.len()));

    Some(RegexPattern::Basic(escaped.join("|")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_union_pattern() {
        let none: Option<RegexPattern> = special_union_pattern::<&str>(&[]);
        assert!(none.is_none());

        let pattern = special_union_pattern(&["<|end|>", "<|endoftext|>"]).unwrap();
        assert_eq!(pattern.as_str(), r"<\|endoftext\|>|<\|end\|>");

        let re = pattern.compile().unwrap();
        assert_eq!(re.find_from("a<|endoftext|>b", 0), Some(1..14));
    }
}
