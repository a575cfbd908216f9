use std::fs;
use std::io;
use std::path::PathBuf;

use url::Url;
use watchfeed_logging::{feed_debug, feed_info};

use crate::decode::{decode_text, DecodeError};
use crate::fetch::Fetcher;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("watchlist request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("watchlist is not readable text: {0}")]
    Decode(#[from] DecodeError),
    #[error("failed to read watchlist cache {path:?}: {source}")]
    CacheRead { path: PathBuf, source: io::Error },
    #[error("failed to write watchlist cache {path:?}: {source}")]
    CacheWrite { path: PathBuf, source: PersistError },
}

/// Provides the raw watchlist text, from the cache file when present and
/// over HTTP otherwise.
pub struct WatchlistSource<F> {
    fetcher: F,
    url: Url,
    cache_path: Option<PathBuf>,
}

impl<F: Fetcher> WatchlistSource<F> {
    pub fn new(fetcher: F, url: Url, cache_path: Option<PathBuf>) -> Self {
        Self {
            fetcher,
            url,
            cache_path,
        }
    }

    /// An existing cache file is returned as is; its age is not checked.
    pub async fn obtain(&self) -> Result<String, SourceError> {
        if let Some(path) = self.cache_path.as_ref().filter(|p| p.is_file()) {
            feed_info!("Loading watchlist from cache {:?}", path);
            let bytes = fs::read(path).map_err(|source| SourceError::CacheRead {
                path: path.clone(),
                source,
            })?;
            return Ok(decode_text(&bytes, None)?.text);
        }

        feed_info!("Fetching watchlist from {}...", self.url);
        let output = self.fetcher.fetch(self.url.as_str()).await?;
        let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref())?;
        feed_debug!(
            "watchlist response: {} bytes, {}",
            output.metadata.byte_len,
            decoded.encoding.name()
        );

        if let Some(path) = &self.cache_path {
            AtomicFileWriter::new(path.clone())
                .write(&output.bytes)
                .map_err(|source| SourceError::CacheWrite {
                    path: path.clone(),
                    source,
                })?;
            feed_debug!("watchlist cached at {:?}", path);
        }

        feed_info!("Fetching watchlist from {}...done", self.url);
        Ok(decoded.text)
    }
}
