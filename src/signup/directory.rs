//! Email-domain directory: the remote list of institutions and the email
//! domains they hand out.

use crate::APP_USER_AGENT;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_DIRECTORY_URL: &str = "http://universities.hipolabs.com/search";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    pub name: String,
    #[serde(default)]
    pub domains: Vec<String>,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("directory returned {0}")]
    Status(StatusCode),
    #[error("directory response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Lookup of known institutions.
#[async_trait]
pub trait EmailDirectory: Send + Sync {
    /// Every known institution with its accepted domains.
    async fn institutions(&self) -> Result<Vec<Institution>, DirectoryError>;
}

/// Directory backed by an HTTP endpoint returning a JSON array of
/// `{"name": ..., "domains": [...]}` objects.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    url: Url,
}

impl HttpDirectory {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build directory HTTP client")?;

        Ok(Self { client, url })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl EmailDirectory for HttpDirectory {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn institutions(&self) -> Result<Vec<Institution>, DirectoryError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(DirectoryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status));
        }

        let institutions: Vec<Institution> =
            response.json().await.map_err(DirectoryError::Decode)?;

        debug!("directory returned {} institutions", institutions.len());

        Ok(institutions)
    }
}

/// Fixed in-process directory, used when accepted domains are pinned in
/// configuration instead of fetched.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    institutions: Vec<Institution>,
}

impl StaticDirectory {
    #[must_use]
    pub fn new(institutions: Vec<Institution>) -> Self {
        Self { institutions }
    }

    /// Single pseudo-institution accepting the given domains.
    #[must_use]
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(vec![Institution {
            name: "configured".to_string(),
            domains: domains.into_iter().map(Into::into).collect(),
        }])
    }
}

#[async_trait]
impl EmailDirectory for StaticDirectory {
    async fn institutions(&self) -> Result<Vec<Institution>, DirectoryError> {
        Ok(self.institutions.clone())
    }
}
