//! Shared `SQLite` gateway and the helpers every repository uses.

use std::fmt::Debug;

use chrono::NaiveDateTime;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteQueryResult};
use sqlx::{Execute, Sqlite, SqlitePool};

use homesim_domain::time::Timestamp;

use crate::error::StorageError;

/// Text layout of the `timestamp` columns, identical to `CURRENT_TIMESTAMP`.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `SQLite`-backed store implementing every storage and event-log port.
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Clone)]
pub struct SqliteGateway {
    pub(crate) pool: SqlitePool,
}

impl SqliteGateway {
    /// Create a new gateway using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(crate) fn format_timestamp(at: Timestamp) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Log a failed statement together with the values bound to it.
pub(crate) fn log_failure(query: &str, params: &[&(dyn Debug + Sync)], err: &sqlx::Error) {
    tracing::error!(error = %err, query, ?params, "statement failed");
}

/// Run one write statement in its own transaction.
///
/// The statement is committed on success. On failure it is logged with its
/// parameters and the transaction is rolled back.
pub(crate) async fn write<'q>(
    pool: &SqlitePool,
    statement: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[&(dyn Debug + Sync)],
) -> Result<SqliteQueryResult, StorageError> {
    let query = statement.sql();
    let mut tx = pool.begin().await?;
    match statement.execute(&mut *tx).await {
        Ok(done) => {
            tx.commit().await?;
            Ok(done)
        }
        Err(err) => {
            log_failure(query, params, &err);
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(error = %rollback, "rollback failed");
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
pub(crate) async fn memory_gateway() -> SqliteGateway {
    let db = crate::pool::Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .unwrap();
    SqliteGateway::new(db.pool().clone())
}
