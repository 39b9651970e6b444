//! # Schema Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the binary, so a
//! fresh install and an upgraded one converge on the same `documents`
//! table. Files are applied in numeric order and each one exactly once;
//! a shipped file is never edited, a change gets a new `NNN_*.sql`.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database's schema has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationState {
    /// Migrations embedded in this build
    pub total: usize,
    /// Migrations recorded as successful in the database
    pub applied: usize,
}

impl MigrationState {
    pub fn is_current(&self) -> bool {
        self.applied >= self.total
    }
}

/// Applies whatever the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = migration_status(pool).await?;
    if before.is_current() {
        debug!(applied = before.applied, "Schema up to date");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;
    info!(
        from = before.applied,
        to = MIGRATOR.migrations.len(),
        "Schema migrated"
    );
    Ok(())
}

/// Reads the migration bookkeeping table. A database that was never
/// migrated has no such table and reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationState> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    Ok(MigrationState {
        total: MIGRATOR.migrations.len(),
        applied: usize::try_from(applied).unwrap_or(0),
    })
}
