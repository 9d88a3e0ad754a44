//! Maps validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{validation, ARG_DB_PASSWORD, ARG_DB_USERNAME, ARG_DSN, ARG_PORT};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    let validation = validation::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        db_username: matches.get_one::<String>(ARG_DB_USERNAME).cloned(),
        db_password: matches
            .get_one::<String>(ARG_DB_PASSWORD)
            .cloned()
            .map(SecretString::from),
        directory: validation.directory,
        directory_timeout: validation.directory_timeout,
        store_timeout: validation.store_timeout,
        years: validation.years,
    }))
}
