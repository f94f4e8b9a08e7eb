//! # Rank Sources
//!
//! The vocabulary loading collaborator: supplies the mergeable rank
//! table for an encoding. The engine itself never performs I/O; a rank
//! source completes before an engine is constructed.

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::pretrained::encodings::EncodingType;
use crate::types::TokenType;
use crate::vocab::SpanTokenMap;
use crate::vocab::io::load_rank_file_path;

/// A source of mergeable rank tables.
pub trait RankSource {
    /// Load the rank table for an encoding.
    ///
    /// ## Arguments
    /// * `encoding` - The encoding to load ranks for.
    ///
    /// ## Returns
    /// The ``{ byte span -> rank }`` table.
    fn load_ranks<T: TokenType>(
        &mut self,
        encoding: EncodingType,
    ) -> Result<SpanTokenMap<T>>;

    /// Override the directory rank files are read from.
    fn override_vocab_dir(
        &mut self,
        dir: PathBuf,
    );
}

/// A rank source reading from a fixed directory; no network.
#[derive(Debug, Clone)]
pub struct DirRankSource {
    dir: PathBuf,
}

impl DirRankSource {
    /// Create a new directory rank source.
    ///
    /// ## Arguments
    /// * `dir` - The directory containing the ``.tiktoken`` rank files.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Get the vocabulary directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RankSource for DirRankSource {
    fn load_ranks<T: TokenType>(
        &mut self,
        encoding: EncodingType,
    ) -> Result<SpanTokenMap<T>> {
        let path = self.dir.join(encoding.rank_file_name());
        log::info!("loading {} ranks from {}", encoding, path.display());
        load_rank_file_path(path)
    }

    fn override_vocab_dir(
        &mut self,
        dir: PathBuf,
    ) {
        self.dir = dir;
    }
}

#[cfg(feature = "download")]
mod disk_cache_source {
    use super::*;
    use crate::errors::TokenEvalError;

    use tokeneval_disk_cache::{TokenEvalDiskCache, TokenEvalDiskCacheOptions};

    /// Shared download context key.
    const OA_KEY: &str = "openai";

    /// A rank source backed by the tokeneval disk cache.
    ///
    /// Rank files are read from the cache directory, downloading from
    /// the public mirrors on a miss. An explicit vocabulary directory
    /// override bypasses the cache (and the network) entirely.
    pub struct DiskCacheRankSource {
        cache: TokenEvalDiskCache,
        dir_override: Option<PathBuf>,
        download: bool,
    }

    impl DiskCacheRankSource {
        /// Create a new disk-cache rank source with default options.
        pub fn new() -> Result<Self> {
            Self::with_options(TokenEvalDiskCacheOptions::default())
        }

        /// Create a new disk-cache rank source.
        ///
        /// ## Arguments
        /// * `options` - Disk cache options.
        pub fn with_options(options: TokenEvalDiskCacheOptions) -> Result<Self> {
            Ok(Self {
                cache: TokenEvalDiskCache::new(options)
                    .map_err(|e| TokenEvalError::External(e.to_string()))?,
                dir_override: None,
                download: true,
            })
        }

        /// Enable or disable downloading on cache misses.
        pub fn with_download(
            mut self,
            download: bool,
        ) -> Self {
            self.download = download;
            self
        }
    }

    impl RankSource for DiskCacheRankSource {
        fn load_ranks<T: TokenType>(
            &mut self,
            encoding: EncodingType,
        ) -> Result<SpanTokenMap<T>> {
            let path = match &self.dir_override {
                Some(dir) => dir.join(encoding.rank_file_name()),
                None => self
                    .cache
                    .load_cached_path(&[OA_KEY], encoding.rank_file_urls(), self.download)
                    .map_err(|e| TokenEvalError::External(e.to_string()))?,
            };

            log::info!("loading {} ranks from {}", encoding, path.display());
            load_rank_file_path(path)
        }

        fn override_vocab_dir(
            &mut self,
            dir: PathBuf,
        ) {
            self.dir_override = Some(dir);
        }
    }
}

#[cfg(feature = "download")]
pub use disk_cache_source::DiskCacheRankSource;
