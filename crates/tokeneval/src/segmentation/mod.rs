//! # Pre-Tokenization / Segmentation
//!
//! Splits raw text into special-token spans and ordinary spans, using
//! the ordinary word pattern and the special-token union pattern.

pub mod text_segmentor;

#[doc(inline)]
pub use text_segmentor::{SpanRef, TextSegmentor};
