use crate::signup::{directory::DEFAULT_DIRECTORY_URL, YearWindow};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;
use url::Url;

pub const ARG_DIRECTORY_URL: &str = "directory-url";
pub const ARG_DIRECTORY_DOMAINS: &str = "directory-domains";
pub const ARG_DIRECTORY_TIMEOUT: &str = "directory-timeout-seconds";
pub const ARG_STORE_TIMEOUT: &str = "store-timeout-seconds";
pub const ARG_START_YEAR_PAST: &str = "start-year-past";
pub const ARG_START_YEAR_FUTURE: &str = "start-year-future";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DIRECTORY_URL)
                .long(ARG_DIRECTORY_URL)
                .help("Email-domain directory URL returning institutions and their domains")
                .env("UNISIGNUP_DIRECTORY_URL")
                .default_value(DEFAULT_DIRECTORY_URL),
        )
        .arg(
            Arg::new(ARG_DIRECTORY_DOMAINS)
                .long(ARG_DIRECTORY_DOMAINS)
                .help("Comma separated university email domains, replaces the remote directory")
                .env("UNISIGNUP_DIRECTORY_DOMAINS")
                .value_delimiter(','),
        )
        .arg(
            Arg::new(ARG_DIRECTORY_TIMEOUT)
                .long(ARG_DIRECTORY_TIMEOUT)
                .help("Timeout for directory requests in seconds")
                .env("UNISIGNUP_DIRECTORY_TIMEOUT_SECONDS")
                .default_value("5")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_STORE_TIMEOUT)
                .long(ARG_STORE_TIMEOUT)
                .help("Timeout for account store queries in seconds")
                .env("UNISIGNUP_STORE_TIMEOUT_SECONDS")
                .default_value("5")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_START_YEAR_PAST)
                .long(ARG_START_YEAR_PAST)
                .help("How many years before the current one a start year may be")
                .env("UNISIGNUP_START_YEAR_PAST")
                .default_value("10")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_START_YEAR_FUTURE)
                .long(ARG_START_YEAR_FUTURE)
                .help("How many years after the current one a start year may be (max 10)")
                .env("UNISIGNUP_START_YEAR_FUTURE")
                .default_value("10")
                .value_parser(clap::value_parser!(u16).range(..=i64::from(YearWindow::MAX_FUTURE))),
        )
}

/// Where accepted email domains come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySource {
    Remote(Url),
    Static(Vec<String>),
}

#[derive(Debug)]
pub struct Options {
    pub directory: DirectorySource,
    pub directory_timeout: Duration,
    pub store_timeout: Duration,
    pub years: YearWindow,
}

impl Options {
    /// # Errors
    /// Returns an error if the directory URL is invalid.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let domains: Vec<String> = matches
            .get_many::<String>(ARG_DIRECTORY_DOMAINS)
            .map(|values| {
                values
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let directory = if domains.is_empty() {
            let url = matches
                .get_one::<String>(ARG_DIRECTORY_URL)
                .map_or(DEFAULT_DIRECTORY_URL, String::as_str);
            DirectorySource::Remote(
                Url::parse(url).with_context(|| format!("Invalid directory URL: {url}"))?,
            )
        } else {
            DirectorySource::Static(domains)
        };

        let seconds = |id: &str| Duration::from_secs(matches.get_one::<u64>(id).copied().unwrap_or(5));

        let past = matches
            .get_one::<u16>(ARG_START_YEAR_PAST)
            .copied()
            .unwrap_or(YearWindow::DEFAULT_PAST);
        let future = matches
            .get_one::<u16>(ARG_START_YEAR_FUTURE)
            .copied()
            .unwrap_or(YearWindow::DEFAULT_FUTURE);

        Ok(Self {
            directory,
            directory_timeout: seconds(ARG_DIRECTORY_TIMEOUT),
            store_timeout: seconds(ARG_STORE_TIMEOUT),
            years: YearWindow::new(past, future),
        })
    }
}
