//! # `tokeneval` LLM Tokenization Suite
//!
//! A byte-pair-encoding text tokenizer compatible with `tiktoken`
//! vocabularies (cl100k/p50k/r50k style encodings). Converts text to
//! integer token ids and back, matching a specific vocabulary's merge
//! rules and special-token handling exactly.
//!
//! See:
//! * [`client`] for the high-level tokenization client.
//! * [`engine`] for the encode/decode/count engine.
//! * [`bpe`] for the byte-pair merge algorithm.
//! * [`vocab`] to manage token vocabularies and vocab io.
//! * [`pretrained`] for the public encoding/model tables and loaders.
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``download``
//!
//! #### feature: ``download``
//!
//! Enables downloading vocabularies from the internet through
//! [`tokeneval_disk_cache`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use tokeneval::client::TokenEvalClient;
//! use tokeneval::client::SpecialScope;
//! use tokeneval::pretrained::EncodingType;
//!
//! let mut client = TokenEvalClient::<u32, _>::with_disk_cache()?;
//! client.set_encoding(EncodingType::Cl100kBase)?;
//!
//! let tokens = client.encode("hello world", SpecialScope::None, SpecialScope::None)?;
//! let text = client.decode(&tokens)?;
//! ```
#![warn(missing_docs)]

pub mod bpe;
pub mod client;
pub mod engine;
pub mod errors;
pub mod pretrained;
pub mod regex;
pub mod segmentation;
pub mod types;
pub mod vocab;

#[cfg(feature = "download")]
#[doc(inline)]
pub use tokeneval_disk_cache as disk_cache;

#[doc(inline)]
pub use errors::{Result, TokenEvalError};
#[doc(inline)]
pub use types::TokenType;
