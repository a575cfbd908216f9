use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use watchfeed_logging::feed_info;

/// Optional RON settings, the lowest layer under flags and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub watchlist_owner_id: Option<u64>,
    pub verbose: Option<bool>,
    pub watchlist_cache_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    /// Watchlist URL with a `{user_id}` placeholder.
    pub watchlist_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_bytes: Option<u64>,
}

pub fn load(path: &Path) -> Result<FileSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings from {path:?}"))?;
    let settings: FileSettings = ron::from_str(&content)
        .with_context(|| format!("failed to parse settings from {path:?}"))?;
    feed_info!("Loaded settings from {:?}", path);
    Ok(settings)
}
