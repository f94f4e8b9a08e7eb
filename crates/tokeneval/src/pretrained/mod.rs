//! # Pretrained Public Encodings
//!
//! The public vocabulary family (cl100k/p50k/r50k) as data: one
//! [`crate::vocab::EncodingVocab`] value per family member, produced by
//! small pure constructors. Members share the engine and merge
//! algorithm; they differ only in pattern, special tokens, and rank
//! source.

pub mod encodings;
pub mod models;
pub mod patterns;
pub mod rank_source;
pub mod specials;

#[doc(inline)]
pub use encodings::EncodingType;
#[doc(inline)]
pub use models::ModelType;
#[doc(inline)]
pub use rank_source::{DirRankSource, RankSource};

#[cfg(feature = "download")]
#[doc(inline)]
pub use rank_source::DiskCacheRankSource;
