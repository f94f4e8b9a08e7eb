//! # TokenEval Disk Cache

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use downloader::{Download, Downloader};

use crate::TOKENEVAL_CACHE_CONFIG;

/// Options for [`TokenEvalDiskCache`].
#[derive(Clone, Default, Debug)]
pub struct TokenEvalDiskCacheOptions {
    /// Optional path to the cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Optional [`Downloader`] builder.
    pub downloader: Option<fn() -> Downloader>,
}

impl TokenEvalDiskCacheOptions {
    /// Set the cache directory.
    pub fn with_cache_dir<P: AsRef<Path>>(
        mut self,
        cache_dir: Option<P>,
    ) -> Self {
        self.cache_dir = cache_dir.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Set the downloader builder.
    pub fn with_downloader(
        mut self,
        downloader: Option<fn() -> Downloader>,
    ) -> Self {
        self.downloader = downloader;
        self
    }
}

/// Disk cache for downloaded vocabulary files.
///
/// Leverages [`Downloader`] for downloading files, and
/// [`PathResolver`](`crate::path_resolver::PathResolver`) for resolving a
/// cache directory appropriate for the user/system combo, plus any
/// environment overrides.
pub struct TokenEvalDiskCache {
    /// Cache directory.
    cache_dir: PathBuf,

    /// Connection pool for downloading files.
    downloader: Downloader,
}

impl Default for TokenEvalDiskCache {
    fn default() -> Self {
        Self::new(TokenEvalDiskCacheOptions::default()).unwrap()
    }
}

impl TokenEvalDiskCache {
    /// Construct a new [`TokenEvalDiskCache`].
    pub fn new(options: TokenEvalDiskCacheOptions) -> anyhow::Result<Self> {
        let cache_dir = TOKENEVAL_CACHE_CONFIG
            .resolve_cache_dir(options.cache_dir)
            .context("failed to resolve cache directory")?;

        let downloader = match options.downloader {
            Some(builder) => builder(),
            None => Downloader::builder().build()?,
        };

        log::debug!("tokeneval cache directory: {}", cache_dir.display());

        Ok(Self {
            cache_dir,
            downloader,
        })
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the cache path for the given key.
    ///
    /// * Does not check that the path exists.
    /// * Does not initialize the containing directories.
    ///
    /// # Arguments
    /// * `context` - prefix dirs, inserted between `self.cache_dir` and `file`.
    /// * `file` - the final file name.
    pub fn cache_path<C, F>(
        &self,
        context: &[C],
        file: F,
    ) -> PathBuf
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
    {
        let mut path = self.cache_dir.clone();
        for c in context {
            path.push(c);
        }
        path.push(file);
        path
    }

    /// Loads a cached file from the cache directory, or downloads it if it
    /// does not exist.
    ///
    /// # Arguments
    /// * `context` - prefix dirs used in determining the cache location.
    /// * `urls` - mirror URLs to download the file from when it is not cached.
    /// * `download` - whether to attempt downloading on a cache miss.
    ///
    /// # Errors
    /// * The cached file does not exist and `download` is `false`.
    /// * The download fails.
    pub fn load_cached_path<C, S>(
        &mut self,
        context: &[C],
        urls: &[S],
        download: bool,
    ) -> anyhow::Result<PathBuf>
    where
        C: AsRef<Path>,
        S: AsRef<str>,
    {
        let urls: Vec<_> = urls.iter().map(|s| s.as_ref()).collect();
        let mut dl = Download::new_mirrored(&urls);
        let file_name = dl.file_name.clone();
        let path = self.cache_path(context, &file_name);
        dl.file_name = path.clone();

        if path.exists() {
            return Ok(path);
        }

        if !download {
            anyhow::bail!("cached file not found: {}", path.display());
        }

        fs::create_dir_all(path.parent().unwrap())?;

        log::info!("downloading {:?} to {}", urls, path.display());
        self.downloader.download(&[dl])?;

        Ok(path)
    }
}
