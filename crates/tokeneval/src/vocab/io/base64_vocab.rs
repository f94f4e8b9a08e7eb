//! # Base64 Rank-File IO
//!
//! The ``.tiktoken`` vocabulary file format; lines are:
//! ```terminaloutput
//! {BASE64 SPAN} {DECIMAL RANK}
//! ```
//! Blank lines are ignored. Duplicate byte spans are a loader error.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use base64::{Engine, prelude::BASE64_STANDARD};

use crate::errors::{Result, TokenEvalError};
use crate::types::TokenType;
use crate::vocab::vocab_types::SpanTokenMap;

/// Load a [`SpanTokenMap`] from a rank file.
///
/// # Arguments
/// * `path` - the path to the vocabulary file.
pub fn load_rank_file_path<T, P>(path: P) -> Result<SpanTokenMap<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_rank_file(reader)
}

/// Read a [`SpanTokenMap`] from a rank-file line reader.
///
/// # Arguments
/// * `reader` - the line reader.
///
/// # Errors
/// * [`TokenEvalError::Parse`] on malformed lines.
/// * [`TokenEvalError::DuplicateVocabEntry`] when a byte span repeats.
/// * [`TokenEvalError::TokenOutOfRange`] when a rank exceeds `T`.
pub fn read_rank_file<T, R>(reader: R) -> Result<SpanTokenMap<T>>
where
    T: TokenType,
    R: BufRead,
{
    let mut vocab = SpanTokenMap::default();

    for line in reader.lines() {
        let line = line?;
        let s = line.trim();
        if s.is_empty() {
            continue;
        }

        let mut parts = s.splitn(2, ' ');
        let (span, rank) = match (parts.next(), parts.next()) {
            (Some(span), Some(rank)) => (span, rank),
            _ => {
                return Err(TokenEvalError::Parse(format!(
                    "malformed rank line: {s:?}"
                )));
            }
        };

        let span = BASE64_STANDARD
            .decode(span)
            .map_err(|e| TokenEvalError::Parse(e.to_string()))?;

        let id: u64 = rank
            .parse()
            .map_err(|e: core::num::ParseIntError| TokenEvalError::Parse(e.to_string()))?;
        let token = T::from_u64(id).ok_or(TokenEvalError::TokenOutOfRange)?;

        if vocab.insert(span, token).is_some() {
            return Err(TokenEvalError::DuplicateVocabEntry { rank: id });
        }
    }

    Ok(vocab)
}

/// Save a [`SpanTokenMap`] to a rank file.
///
/// # Arguments
/// * `span_map` - the vocabulary to save.
/// * `path` - the path to save the vocabulary to.
pub fn save_rank_file_path<T: TokenType, P: AsRef<Path>>(
    span_map: &SpanTokenMap<T>,
    path: P,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_rank_file(span_map, &mut writer)
}

/// Write a [`SpanTokenMap`] to a [`Write`] writer, sorted by rank.
///
/// # Arguments
/// * `span_map` - the vocabulary to save.
/// * `writer` - the writer to target.
pub fn write_rank_file<T, W>(
    span_map: &SpanTokenMap<T>,
    writer: &mut W,
) -> Result<()>
where
    T: TokenType,
    W: Write,
{
    let mut items: Vec<(T, &Vec<u8>)> = span_map
        .iter()
        .map(|(span, &token)| (token, span))
        .collect();
    items.sort_by_key(|(t, _)| *t);

    for (token, span) in items {
        writeln!(
            writer,
            "{} {}",
            BASE64_STANDARD.encode(span),
            token.to_u64().ok_or(TokenEvalError::TokenOutOfRange)?
        )?;
    }

    Ok(())
}
