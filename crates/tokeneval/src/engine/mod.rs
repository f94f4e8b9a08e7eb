//! # Tokenization Engine
//!
//! Orchestrates segmentation, byte-pair merging, and special-token
//! substitution for the encode/decode/count pipelines; each pipeline
//! offers sequential and parallel execution.

pub mod count_cache;
pub mod tokenization_engine;

#[doc(inline)]
pub use count_cache::CountCache;
#[doc(inline)]
pub use tokenization_engine::{EngineOptions, ExecutionMode, TokenizationEngine};
