//! # Ledger State
//!
//! Owns the open database and the persistent ledger for one invocation.
//!
//! ```text
//!   open ──► Database::new ──► PersistentLedger::open ──► command ──► close
//!                                                                      │
//!                                       flush the writer, close pool ◄─┘
//! ```
//!
//! Every intent is applied in memory first; `close` waits for the writer so
//! the process does not exit with writes still queued.

use std::path::Path;
use std::sync::Arc;

use folio_db::{Database, DbConfig, KeyValueStore, PersistentLedger, WriterStats};
use tracing::{info, warn};

use super::FolioConfig;
use crate::error::CliResult;

pub struct LedgerState {
    config: FolioConfig,
    ledger: PersistentLedger,
    db: Option<Database>,
}

impl LedgerState {
    /// Opens (creating if needed) the SQLite database at `path`.
    pub async fn open(config: FolioConfig, path: &Path) -> CliResult<Self> {
        let db = Database::new(DbConfig::new(path)).await?;
        info!(path = %path.display(), "Database opened");

        let ledger =
            PersistentLedger::open(Arc::new(db.documents()), config.ledger.payment_policy).await;

        Ok(LedgerState {
            config,
            ledger,
            db: Some(db),
        })
    }

    /// Runs against an arbitrary document store.
    pub async fn with_store(config: FolioConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let ledger = PersistentLedger::open(store, config.ledger.payment_policy).await;
        LedgerState {
            config,
            ledger,
            db: None,
        }
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn ledger(&self) -> &PersistentLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut PersistentLedger {
        &mut self.ledger
    }

    /// Drains the writer and releases the database.
    pub async fn close(self) -> CliResult<WriterStats> {
        let stats = self.ledger.close().await?;
        if stats.failed > 0 {
            warn!(failed = stats.failed, "Some writes did not reach the database");
        }
        if let Some(db) = self.db {
            db.close().await;
        }
        Ok(stats)
    }
}
