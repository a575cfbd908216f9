use std::path::{Path, PathBuf};

use url::Url;

use crate::{FailureKind, FetchError, FetchSettings};

/// Public IMDb watchlist RSS, keyed by the numeric part of the `ur…` user id.
pub const DEFAULT_WATCHLIST_URL: &str = "http://rss.imdb.com/user/ur{user_id}/watchlist";
const USER_ID_PLACEHOLDER: &str = "{user_id}";

/// Everything one filtering run needs, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Feed file handed over by the host; rewritten in place by default.
    pub feed_path: PathBuf,
    pub watchlist_owner_id: u64,
    /// Log the raw watchlist, the id list and every keep/discard decision.
    pub verbose: bool,
    /// When the file exists it replaces the HTTP request; after a fetch the
    /// response body is stored here.
    pub watchlist_cache_path: Option<PathBuf>,
    /// Write the filtered feed here instead of over `feed_path`.
    pub output_path: Option<PathBuf>,
    pub watchlist_url_template: String,
    pub fetch: FetchSettings,
}

impl FilterConfig {
    pub fn new(feed_path: impl Into<PathBuf>, watchlist_owner_id: u64) -> Self {
        Self {
            feed_path: feed_path.into(),
            watchlist_owner_id,
            verbose: false,
            watchlist_cache_path: None,
            output_path: None,
            watchlist_url_template: DEFAULT_WATCHLIST_URL.to_string(),
            fetch: FetchSettings::default(),
        }
    }

    pub fn watchlist_url(&self) -> Result<Url, FetchError> {
        let raw = self
            .watchlist_url_template
            .replace(USER_ID_PLACEHOLDER, &self.watchlist_owner_id.to_string());
        Url::parse(&raw)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))
    }

    pub fn output_target(&self) -> &Path {
        self.output_path.as_deref().unwrap_or(&self.feed_path)
    }
}

#[cfg(test)]
mod tests {
    use super::FilterConfig;
    use crate::FailureKind;

    #[test]
    fn default_url_embeds_owner_id() {
        let config = FilterConfig::new("feed.xml", 12345678);
        assert_eq!(
            config.watchlist_url().unwrap().as_str(),
            "http://rss.imdb.com/user/ur12345678/watchlist"
        );
    }

    #[test]
    fn broken_template_is_invalid_url() {
        let mut config = FilterConfig::new("feed.xml", 1);
        config.watchlist_url_template = "not a url {user_id}".to_string();
        assert_eq!(
            config.watchlist_url().unwrap_err().kind,
            FailureKind::InvalidUrl
        );
    }

    #[test]
    fn output_defaults_to_feed_path() {
        let mut config = FilterConfig::new("feed.xml", 1);
        assert_eq!(config.output_target(), std::path::Path::new("feed.xml"));
        config.output_path = Some("out.xml".into());
        assert_eq!(config.output_target(), std::path::Path::new("out.xml"));
    }
}
