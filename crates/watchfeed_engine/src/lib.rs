//! Watchfeed engine: watchlist retrieval, feed persistence and the run driver.
mod config;
mod decode;
mod fetch;
mod persist;
mod pipeline;
mod source;
mod store;
mod types;

pub use config::{FilterConfig, DEFAULT_WATCHLIST_URL};
pub use decode::{decode_text, DecodeError, DecodedText};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use pipeline::{execute, run, run_async, run_with, Outcome, PipelineError, RunSummary};
pub use source::{SourceError, WatchlistSource};
pub use store::{FeedDocument, FeedStore, StoreError};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
