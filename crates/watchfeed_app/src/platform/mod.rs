mod cli;
mod logging;
mod settings;

use clap::error::ErrorKind;
use clap::Parser;
use watchfeed_engine::Outcome;
use watchfeed_logging::feed_error;

use cli::Cli;
use logging::LogDestination;

/// Parse the host's options, run the filter and return the process exit code.
pub fn run_app() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match failure_code(&err) {
            Some(code) => {
                logging::initialize(LogDestination::Terminal, false);
                feed_error!("{}", err.render());
                return code;
            }
            None => err.exit(),
        },
    };

    let file_settings = match cli.config.as_deref().map(settings::load).transpose() {
        Ok(settings) => settings.unwrap_or_default(),
        Err(err) => {
            logging::initialize(LogDestination::Terminal, cli.verbose.unwrap_or(false));
            feed_error!("{:#}", err);
            return Outcome::Failure.exit_code();
        }
    };

    let verbose = cli.verbose.or(file_settings.verbose).unwrap_or(false);
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    logging::initialize(destination, verbose);

    let config = match cli::build_config(&cli, file_settings) {
        Ok(config) => config,
        Err(err) => {
            feed_error!("{:#}", err);
            return Outcome::Failure.exit_code();
        }
    };

    watchfeed_engine::run(&config).exit_code()
}

/// Help and version requests keep clap's own handling; any other bad
/// argument is a failed run as far as NZBGet is concerned.
fn failure_code(err: &clap::Error) -> Option<i32> {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => Some(Outcome::Failure.exit_code()),
    }
}

#[cfg(test)]
mod tests {
    use super::{failure_code, Cli};
    use clap::Parser;

    fn code_for(args: &[&str]) -> Option<i32> {
        let mut full = vec!["watchfeed"];
        full.extend_from_slice(args);
        let err = Cli::try_parse_from(full).expect_err("arguments should be rejected");
        failure_code(&err)
    }

    #[test]
    fn bad_verbose_value_fails_the_run() {
        assert_eq!(code_for(&["--feed", "f.xml", "--verbose", "maybe"]), Some(94));
    }

    #[test]
    fn non_numeric_user_id_fails_the_run() {
        assert_eq!(code_for(&["--feed", "f.xml", "--imdb-user-id", "abc"]), Some(94));
    }

    #[test]
    fn missing_feed_fails_the_run() {
        if std::env::var_os("NZBFP_FILENAME").is_some() {
            return;
        }
        assert_eq!(code_for(&["--imdb-user-id", "1"]), Some(94));
    }

    #[test]
    fn help_and_version_are_left_to_clap() {
        assert_eq!(code_for(&["--help"]), None);
        assert_eq!(code_for(&["--version"]), None);
    }
}
