//! Command-line and host environment surface.
//!
//! NZBGet hands script options over as `NZBPO_*` variables and the feed file
//! as `NZBFP_FILENAME`; every one of them can also be given as a flag.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use watchfeed_engine::FilterConfig;

use super::settings::FileSettings;

/// Keep only the feed entries whose title is on an IMDb watchlist.
#[derive(Parser, Debug, Clone)]
#[command(name = "watchfeed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Feed file to filter; rewritten in place unless --feed-out-file is set
    #[arg(long, env = "NZBFP_FILENAME")]
    pub feed: PathBuf,

    /// IMDb user id owning the public watchlist (digits, `ur` prefix allowed)
    #[arg(long, env = "NZBPO_IMDBUSERID", value_parser = parse_user_id)]
    pub imdb_user_id: Option<u64>,

    /// Print more logging messages (yes, no)
    #[arg(long, env = "NZBPO_VERBOSE", value_parser = parse_yes_no)]
    pub verbose: Option<bool>,

    /// Watchlist cache file, used instead of imdb.com when it exists
    #[arg(long, env = "NZBPO_WATCHLISTFILE")]
    pub watchlist_file: Option<PathBuf>,

    /// Write the filtered feed here instead of over the input
    #[arg(long, env = "NZBPO_FEEDOUTFILE")]
    pub feed_out_file: Option<PathBuf>,

    /// Optional RON settings file; flags and environment take precedence
    #[arg(short, long, env = "WATCHFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also append log output to this file
    #[arg(long, env = "WATCHFEED_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

fn parse_yes_no(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        other => Err(format!("expected yes or no, got `{other}`")),
    }
}

fn parse_user_id(raw: &str) -> Result<u64, String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("ur").unwrap_or(trimmed);
    digits
        .parse::<u64>()
        .map_err(|err| format!("`{raw}` is not a numeric user id: {err}"))
}

/// Merge flags over the settings file into the run configuration.
pub fn build_config(cli: &Cli, file: FileSettings) -> Result<FilterConfig> {
    let owner_id = cli
        .imdb_user_id
        .or(file.watchlist_owner_id)
        .ok_or_else(|| {
            anyhow!("Option ImdbUserId is missing in configuration file. Please check script settings")
        })?;

    let mut config = FilterConfig::new(cli.feed.clone(), owner_id);
    config.verbose = cli.verbose.or(file.verbose).unwrap_or(false);
    config.watchlist_cache_path = cli.watchlist_file.clone().or(file.watchlist_cache_path);
    config.output_path = cli.feed_out_file.clone().or(file.output_path);
    if let Some(template) = file.watchlist_url {
        config.watchlist_url_template = template;
    }
    if let Some(secs) = file.connect_timeout_secs {
        config.fetch.connect_timeout = Some(Duration::from_secs(secs));
    }
    if let Some(secs) = file.request_timeout_secs {
        config.fetch.request_timeout = Some(Duration::from_secs(secs));
    }
    if let Some(max_bytes) = file.max_bytes {
        config.fetch.max_bytes = max_bytes;
    }

    config
        .watchlist_url()
        .with_context(|| format!("bad watchlist url `{}`", config.watchlist_url_template))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{build_config, parse_user_id, parse_yes_no, Cli};
    use crate::platform::settings::FileSettings;
    use clap::{CommandFactory, Parser};
    use std::path::Path;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["watchfeed"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).expect("valid arguments")
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn yes_no_values() {
        assert_eq!(parse_yes_no("yes"), Ok(true));
        assert_eq!(parse_yes_no("No"), Ok(false));
        assert!(parse_yes_no("maybe").is_err());
    }

    #[test]
    fn user_id_accepts_ur_prefix() {
        assert_eq!(parse_user_id("12345678"), Ok(12345678));
        assert_eq!(parse_user_id("ur12345678"), Ok(12345678));
        assert!(parse_user_id("abc").is_err());
    }

    #[test]
    fn flags_build_config() {
        let cli = parse(&[
            "--feed",
            "feed.xml",
            "--imdb-user-id",
            "42",
            "--verbose",
            "yes",
            "--feed-out-file",
            "out.xml",
        ]);
        let config = build_config(&cli, FileSettings::default()).unwrap();
        assert_eq!(config.feed_path, Path::new("feed.xml"));
        assert_eq!(config.watchlist_owner_id, 42);
        assert!(config.verbose);
        assert_eq!(config.output_path.as_deref(), Some(Path::new("out.xml")));
        assert_eq!(config.watchlist_cache_path, None);
    }

    #[test]
    fn flags_override_settings_file() {
        let cli = parse(&["--feed", "feed.xml", "--imdb-user-id", "7"]);
        let file = FileSettings {
            watchlist_owner_id: Some(99),
            verbose: Some(true),
            watchlist_cache_path: Some("cache.xml".into()),
            request_timeout_secs: Some(5),
            ..FileSettings::default()
        };
        let config = build_config(&cli, file).unwrap();
        assert_eq!(config.watchlist_owner_id, 7);
        assert!(config.verbose);
        assert_eq!(
            config.watchlist_cache_path.as_deref(),
            Some(Path::new("cache.xml"))
        );
        assert_eq!(config.fetch.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_user_id_is_reported() {
        let cli = parse(&["--feed", "feed.xml"]);
        let err = build_config(&cli, FileSettings::default()).unwrap_err();
        assert!(err.to_string().contains("ImdbUserId"));
    }

    #[test]
    fn bad_url_template_is_rejected() {
        let cli = parse(&["--feed", "feed.xml", "--imdb-user-id", "1"]);
        let file = FileSettings {
            watchlist_url: Some("::nope::".to_string()),
            ..FileSettings::default()
        };
        assert!(build_config(&cli, file).is_err());
    }
}
