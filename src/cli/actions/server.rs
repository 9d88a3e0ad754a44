use crate::{
    api,
    cli::commands::validation::DirectorySource,
    signup::{EmailDirectory, HttpDirectory, StaticDirectory, YearWindow},
};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub db_username: Option<String>,
    pub db_password: Option<SecretString>,
    pub directory: DirectorySource,
    pub directory_timeout: Duration,
    pub store_timeout: Duration,
    pub years: YearWindow,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the DSN is invalid, the directory client cannot be
/// built, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let dsn = with_credentials(
        &args.dsn,
        args.db_username.as_deref(),
        args.db_password.as_ref(),
    )?;

    let directory: Arc<dyn EmailDirectory> = match args.directory {
        DirectorySource::Remote(url) => {
            let directory = HttpDirectory::new(url, args.directory_timeout)?;
            info!("Using email-domain directory at {}", directory.url());
            Arc::new(directory)
        }
        DirectorySource::Static(domains) => {
            info!("Using {} configured email domains", domains.len());
            Arc::new(StaticDirectory::from_domains(domains))
        }
    };

    debug!(
        "Start year window: -{} / +{}",
        args.years.past(),
        args.years.future()
    );

    api::new(args.port, dsn, directory, args.store_timeout, args.years).await
}

/// Inject the username and password into the DSN when given separately.
fn with_credentials(
    dsn: &str,
    username: Option<&str>,
    password: Option<&SecretString>,
) -> Result<String> {
    let mut dsn = Url::parse(dsn).context("Invalid database connection string")?;

    if let Some(username) = username {
        dsn.set_username(username)
            .map_err(|()| anyhow!("Error setting username"))?;
    }

    if let Some(password) = password {
        dsn.set_password(Some(password.expose_secret()))
            .map_err(|()| anyhow!("Error setting password"))?;
    }

    Ok(dsn.to_string())
}
