use std::io;
use std::path::PathBuf;

use watchfeed_core::{extract_ids, filter_feed, FilterReport};
use watchfeed_logging::{feed_debug, feed_error, feed_info, feed_warn};

use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::source::{SourceError, WatchlistSource};
use crate::store::{FeedStore, StoreError};
use crate::FilterConfig;

/// Result handed back to the host. Anything but success means the feed must
/// not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Exit code NZBGet expects from a feed script that succeeded.
    pub const SUCCESS_CODE: i32 = 93;
    /// Exit code NZBGet expects from a feed script that failed.
    pub const FAILURE_CODE: i32 = 94;

    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => Self::SUCCESS_CODE,
            Outcome::Failure => Self::FAILURE_CODE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Watchlist(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to start async runtime: {0}")]
    Runtime(io::Error),
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub watchlist_size: usize,
    pub report: FilterReport,
    pub written_to: PathBuf,
}

/// Run the whole filter on a current-thread runtime and block until done.
pub fn run(config: &FilterConfig) -> Outcome {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => return fail(&store_for(config), PipelineError::Runtime(err)),
    };
    runtime.block_on(run_async(config))
}

pub async fn run_async(config: &FilterConfig) -> Outcome {
    run_with(config, ReqwestFetcher::new(config.fetch.clone())).await
}

/// Same as [`run_async`] with a caller-supplied fetcher.
pub async fn run_with<F: Fetcher>(config: &FilterConfig, fetcher: F) -> Outcome {
    let store = store_for(config);
    match execute(config, &store, fetcher).await {
        Ok(summary) => {
            feed_info!(
                "Kept {} of {} entries ({} titles on watchlist), written to {:?}",
                summary.report.kept(),
                summary.report.decisions.len(),
                summary.watchlist_size,
                summary.written_to
            );
            Outcome::Success
        }
        Err(err) => fail(&store, err),
    }
}

/// All-or-nothing: any error aborts before the output is written.
pub async fn execute<F: Fetcher>(
    config: &FilterConfig,
    store: &FeedStore,
    fetcher: F,
) -> Result<RunSummary, PipelineError> {
    let url = config.watchlist_url().map_err(SourceError::from)?;
    let source = WatchlistSource::new(fetcher, url, config.watchlist_cache_path.clone());
    let watchlist = source.obtain().await?;
    if config.verbose {
        feed_info!("{}", watchlist);
    }

    let ids = extract_ids(&watchlist);
    if config.verbose {
        feed_info!("IMDb-ID List: {:?}", ids.sorted());
    } else {
        feed_debug!("watchlist holds {} ids", ids.len());
    }

    let feed = store.load()?;
    if config.verbose {
        feed_info!("Filtering");
    }
    let filtered = filter_feed(&feed.text, &ids);
    if config.verbose {
        for decision in &filtered.report.decisions {
            let id = decision.identifier.as_deref().unwrap_or("<none>");
            if decision.kept {
                feed_info!("[DETAIL] Keeping imdbid {}", id);
            } else {
                feed_info!("[DETAIL] Discarding imdbid {}", id);
            }
        }
    }
    if filtered.report.unterminated {
        feed_warn!("Feed ended inside an unterminated entry; it was dropped");
    }

    let written_to = store.save(&feed.with_text(filtered.document))?;
    Ok(RunSummary {
        watchlist_size: ids.len(),
        report: filtered.report,
        written_to,
    })
}

fn store_for(config: &FilterConfig) -> FeedStore {
    FeedStore::new(config.feed_path.clone(), config.output_target())
}

fn fail(store: &FeedStore, err: PipelineError) -> Outcome {
    // The host must never pick up an unfiltered or half-written feed.
    if let Err(remove_err) = store.discard_primary() {
        feed_error!("{}", remove_err);
    }
    feed_error!("{}", err);
    Outcome::Failure
}
