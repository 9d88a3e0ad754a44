//! Account store lookups used by the username check.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info_span, Instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub userid: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account store query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("account store query timed out after {0:?}")]
    Timeout(Duration),
}

/// Read access to existing accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Accounts whose identifying key equals `username` exactly.
    async fn find_by_username(&self, username: &str) -> Result<Vec<Account>, StoreError>;
}

/// Postgres-backed store over the `users` table.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Vec<Account>, StoreError> {
        let query = "SELECT userid FROM users WHERE userid = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );

        let rows = timeout(
            self.query_timeout,
            sqlx::query(query)
                .bind(username)
                .fetch_all(&self.pool)
                .instrument(span),
        )
        .await
        .map_err(|_| StoreError::Timeout(self.query_timeout))??;

        rows.iter()
            .map(|row| {
                Ok(Account {
                    userid: row.try_get("userid")?,
                })
            })
            .collect()
    }
}
