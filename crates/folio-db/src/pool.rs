//! # Document Store Connection
//!
//! Opens the SQLite file that backs the ledger's document store.
//!
//! ```text
//!   DbConfig::new("folio.db")          DbConfig::in_memory()
//!            │                                  │
//!            │ WAL, NORMAL sync,                │ one pinned connection,
//!            │ busy timeout, rwc                │ no WAL, never idles out
//!            └───────────────┬──────────────────┘
//!                            ▼
//!                  Database::new(config)
//!                            │  embedded migrations (unless skipped)
//!                            ▼
//!             db.documents() ─► DocumentRepository
//!                            │
//!                            ▼
//!             PersistentLedger::open(store)
//! ```
//!
//! Only the background writer issues writes, so a small pool is plenty.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationState};
use crate::repository::document::DocumentRepository;

const MEMORY_PATH: &str = ":memory:";

/// How to open the document store.
///
/// ```rust,ignore
/// let config = DbConfig::new(data_dir.join("folio.db")).pool_size(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`
    pub path: PathBuf,
    pub pool_size: u32,
    /// How long a caller waits for a free connection
    pub acquire_timeout: Duration,
    /// How long SQLite retries on a locked database before failing
    pub busy_timeout: Duration,
    pub migrate: bool,
}

impl DbConfig {
    /// A file-backed store; the file is created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            pool_size: 4,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    /// A private store that disappears with its last connection. Tests only.
    pub fn in_memory() -> Self {
        DbConfig {
            pool_size: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Opens the pool without touching the schema.
    pub fn skip_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            // `:memory:` cannot journal to WAL.
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.pool_size)
            .min_connections(1)
            .acquire_timeout(self.acquire_timeout);

        if self.is_in_memory() {
            // Closing the only connection would drop every document.
            options.idle_timeout(None).max_lifetime(None)
        } else {
            options.idle_timeout(Some(Duration::from_secs(600)))
        }
    }
}

/// An open document store.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        debug!(path = %config.path.display(), pool_size = config.pool_size, "Opening document store");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(format!("{}: {}", config.path.display(), e)))?;

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }

        info!(path = %config.path.display(), "Document store ready");
        Ok(db)
    }

    /// Brings the schema up to date and returns where it stands.
    pub async fn run_migrations(&self) -> DbResult<MigrationState> {
        migrations::run_migrations(&self.pool).await?;
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Document store closed");
    }

    /// True when the `documents` table answers a query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
