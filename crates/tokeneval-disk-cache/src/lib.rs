//! # tokeneval-disk-cache
//!
//! Local cache-directory resolution and mirrored downloads for
//! `tokeneval` vocabulary rank files. The core library never touches the
//! network or the filesystem; everything that does lives here.
#![warn(missing_docs)]

use crate::path_resolver::PathResolver;

pub mod disk_cache;
pub mod path_resolver;

pub use disk_cache::{TokenEvalDiskCache, TokenEvalDiskCacheOptions};

/// Environment variable key to override the default cache directory.
pub const TOKENEVAL_CACHE_DIR: &str = "TOKENEVAL_CACHE_DIR";

/// Default [`PathResolver`] for tokeneval.
pub const TOKENEVAL_CACHE_CONFIG: PathResolver = PathResolver {
    qualifier: "io.crates.tokeneval",
    organization: "",
    application: "tokeneval",
    cache_env_vars: &[TOKENEVAL_CACHE_DIR],
};
