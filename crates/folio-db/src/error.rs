//! # Store Errors
//!
//! ```text
//!   sqlx::Error ─┐
//!   MigrateError ┼──► DbError ──┬──► writer task: error!, counted in WriterStats
//!   serde_json  ─┘              └──► startup / flush: surfaced to the CLI
//! ```
//!
//! The in-memory ledger never waits on these. A failed document write is
//! logged and the next snapshot of that collection supersedes it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The SQLite file could not be opened or created.
    #[error("cannot open store: {0}")]
    ConnectionFailed(String),

    #[error("schema migration: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement.
    #[error("statement rejected: {0}")]
    QueryFailed(String),

    /// A document batch was rolled back as a whole.
    #[error("batch rolled back: {0}")]
    TransactionFailed(String),

    #[error("no free connection in the pool")]
    PoolExhausted,

    /// A stored collection does not deserialize into its entity type.
    #[error("bad document JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The writer task has exited; its channel is gone.
    #[error("writer gone: {0}")]
    WriterStopped(String),

    #[error("store error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool already closed".into()),
            sqlx::Error::Database(e) => DbError::QueryFailed(e.message().to_owned()),
            sqlx::Error::Migrate(e) => DbError::MigrationFailed(e.to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors() {
        assert!(matches!(DbError::from(sqlx::Error::PoolTimedOut), DbError::PoolExhausted));
        let closed = DbError::from(sqlx::Error::PoolClosed);
        assert_eq!(closed.to_string(), "cannot open store: pool already closed");
    }

    #[test]
    fn test_bad_document_json() {
        let err: DbError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("bad document JSON"));
    }
}
