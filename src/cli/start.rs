use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;
use clap::ArgMatches;
use tracing::Level;

// -v, -vv, -vvv, -vvvv
const VERBOSE_LEVELS: [Level; 4] = [Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];

/// `None` leaves the subscriber on its default (errors only, or `RUST_LOG`).
fn log_level(matches: &ArgMatches) -> Option<Level> {
    let count = matches.get_one::<u8>(commands::ARG_VERBOSITY).copied()?;
    let index = usize::from(count.checked_sub(1)?);
    VERBOSE_LEVELS
        .get(index.min(VERBOSE_LEVELS.len() - 1))
        .copied()
}

/// Parse the command line, install the subscriber and resolve what to run.
///
/// # Errors
///
/// Returns an error if the subscriber cannot be installed or the server
/// options are inconsistent.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(log_level(&matches))?;

    dispatch::handler(&matches)
}
