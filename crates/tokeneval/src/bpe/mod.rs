//! # Byte-Pair Merge Algorithm
//!
//! Resolves one piece of bytes into vocabulary-rank tokens.
//!
//! The merge loop is a pure function of ``(piece, ranks)``: boundaries
//! are placed before each byte, every internal boundary carries the rank
//! of the concatenation of its two adjacent parts (absent from the table
//! means unmergeable), and the leftmost boundary with the strictly
//! lowest finite rank merges first. This greedy, order-sensitive loop
//! must reproduce the reference vocabulary's tokenization bit-for-bit;
//! the leftmost tie-break and the neighbor-recompute rule are
//! load-bearing, not incidental. A heap-ordered variant would reorder
//! equal-rank merges and is deliberately not used.

use crate::errors::{Result, TokenEvalError};
use crate::types::TokenType;
use crate::vocab::vocab_types::SpanTokenMap;

/// Merge boundary state: the byte offset where a part starts, and the
/// rank of merging that part with its successor (`None` = unmergeable).
type Boundary<T> = (usize, Option<T>);

/// Run the merge loop over a piece, returning the final part boundaries.
///
/// The result holds one `(start, _)` entry per final part, plus a
/// terminal entry at `piece.len()`; part `i` spans
/// ``parts[i].0 .. parts[i + 1].0``.
fn merge_boundaries<T: TokenType>(
    piece: &[u8],
    ranks: &SpanTokenMap<T>,
) -> Vec<Boundary<T>> {
    debug_assert!(piece.len() > 1);

    let mut parts: Vec<Boundary<T>> = Vec::with_capacity(piece.len() + 1);
    let mut min_rank: Option<(T, usize)> = None;

    for i in 0..piece.len() - 1 {
        let rank = ranks.get(&piece[i..i + 2]).copied();
        if let Some(r) = rank {
            // Strict `<` keeps the leftmost boundary on ties.
            if min_rank.is_none_or(|(best, _)| r < best) {
                min_rank = Some((r, i));
            }
        }
        parts.push((i, rank));
    }
    parts.push((piece.len() - 1, None));
    parts.push((piece.len(), None));

    let get_rank = |parts: &[Boundary<T>], i: usize| -> Option<T> {
        if i + 3 < parts.len() {
            ranks.get(&piece[parts[i].0..parts[i + 3].0]).copied()
        } else {
            None
        }
    };

    while let Some((_, i)) = min_rank {
        // Merge part i with part i+1, then recompute the two boundaries
        // now adjacent to the merged part.
        if i > 0 {
            parts[i - 1].1 = get_rank(&parts, i - 1);
        }
        parts[i].1 = get_rank(&parts, i);
        parts.remove(i + 1);

        min_rank = None;
        for (j, &(_, rank)) in parts[..parts.len() - 1].iter().enumerate() {
            if let Some(r) = rank {
                if min_rank.is_none_or(|(best, _)| r < best) {
                    min_rank = Some((r, j));
                }
            }
        }
    }

    parts
}

/// Encode one piece of bytes into vocabulary ranks.
///
/// ## Arguments
/// * `piece` - The byte slice to encode.
/// * `ranks` - The mergeable rank table.
///
/// ## Returns
/// The ordered ranks the vocabulary's merge priority assigns to the
/// piece; a piece that is itself a vocabulary entry yields exactly one
/// rank. [`TokenEvalError::UnmergeableByteSequence`] when a final part
/// is absent from the table (the table is internally inconsistent;
/// unreachable with a valid vocabulary file).
pub fn byte_pair_encode<T: TokenType>(
    piece: &[u8],
    ranks: &SpanTokenMap<T>,
) -> Result<Vec<T>> {
    if piece.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(&token) = ranks.get(piece) {
        return Ok(vec![token]);
    }
    if piece.len() == 1 {
        // A single byte with no rank has nothing left to merge.
        return Err(TokenEvalError::UnmergeableByteSequence);
    }

    merge_boundaries(piece, ranks)
        .windows(2)
        .map(|pair| {
            ranks
                .get(&piece[pair[0].0..pair[1].0])
                .copied()
                .ok_or(TokenEvalError::UnmergeableByteSequence)
        })
        .collect()
}

/// Count the tokens that [`byte_pair_encode`] would produce for a piece.
///
/// Performs the identical merge process without building the id list;
/// since the final parts are never mapped back through the table, this
/// cannot observe an inconsistent vocabulary and is infallible.
///
/// ## Arguments
/// * `piece` - The byte slice to count.
/// * `ranks` - The mergeable rank table.
///
/// ## Returns
/// The number of final parts.
pub fn byte_pair_count<T: TokenType>(
    piece: &[u8],
    ranks: &SpanTokenMap<T>,
) -> usize {
    if piece.is_empty() {
        return 0;
    }
    if piece.len() == 1 || ranks.contains_key(piece) {
        return 1;
    }

    merge_boundaries(piece, ranks).len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks_of(entries: &[(&str, u32)]) -> SpanTokenMap<u32> {
        entries
            .iter()
            .map(|&(s, r)| (s.as_bytes().to_vec(), r))
            .collect()
    }

    #[test]
    fn test_exact_match_short_circuit() {
        let ranks = ranks_of(&[("a", 0), ("b", 1), ("ab", 2)]);
        assert_eq!(byte_pair_encode(b"ab", &ranks).unwrap(), vec![2]);
        assert_eq!(byte_pair_count(b"ab", &ranks), 1);
    }

    #[test]
    fn test_single_merge() {
        let ranks = ranks_of(&[("a", 0), ("b", 1), ("c", 2), ("ab", 3), ("bc", 4)]);
        // (a,b) rank 3 beats (b,c) rank 4; "abc" is not an entry.
        assert_eq!(byte_pair_encode(b"abc", &ranks).unwrap(), vec![3, 2]);
        assert_eq!(byte_pair_count(b"abc", &ranks), 2);
    }

    #[test]
    fn test_leftmost_tie_break() {
        // Both boundaries carry rank 10; the leftmost must merge.
        let ranks = ranks_of(&[("a", 0), ("b", 1), ("c", 2), ("ab", 10), ("bc", 10)]);
        assert_eq!(byte_pair_encode(b"abc", &ranks).unwrap(), vec![10, 2]);
    }

    #[test]
    fn test_neighbor_recompute() {
        // Merging "ll" first exposes the ("e","ll") boundary; "ell"
        // exists, so the recompute must pick it up and cascade.
        let ranks = ranks_of(&[
            ("h", 0),
            ("e", 1),
            ("l", 2),
            ("o", 3),
            ("ll", 4),
            ("ell", 5),
            ("hell", 6),
        ]);
        assert_eq!(byte_pair_encode(b"hello", &ranks).unwrap(), vec![6, 3]);
        assert_eq!(byte_pair_count(b"hello", &ranks), 2);
    }

    #[test]
    fn test_merge_order_is_rank_order() {
        // "he" (256) merges before "ll" (257); neither composite
        // extends further.
        let ranks = ranks_of(&[
            ("h", 104),
            ("e", 101),
            ("l", 108),
            ("o", 111),
            ("he", 256),
            ("ll", 257),
        ]);
        assert_eq!(
            byte_pair_encode(b"hello", &ranks).unwrap(),
            vec![256, 257, 111]
        );
        assert_eq!(byte_pair_count(b"hello", &ranks), 3);
    }

    #[test]
    fn test_unmergeable_sequence() {
        let ranks = ranks_of(&[("a", 0), ("b", 1)]);
        assert!(matches!(
            byte_pair_encode(b"abc", &ranks),
            Err(TokenEvalError::UnmergeableByteSequence)
        ));
        assert!(matches!(
            byte_pair_encode(b"c", &ranks),
            Err(TokenEvalError::UnmergeableByteSequence)
        ));
    }

    #[test]
    fn test_empty_piece() {
        let ranks = ranks_of(&[("a", 0)]);
        assert_eq!(byte_pair_encode(b"", &ranks).unwrap(), Vec::<u32>::new());
        assert_eq!(byte_pair_count(b"", &ranks), 0);
    }

    #[test]
    fn test_single_byte_fallback() {
        // No merges apply; every byte maps through its own rank.
        let ranks = ranks_of(&[("x", 7), ("y", 8), ("z", 9)]);
        assert_eq!(byte_pair_encode(b"xyz", &ranks).unwrap(), vec![7, 8, 9]);
        assert_eq!(byte_pair_count(b"xyz", &ranks), 3);
    }
}
