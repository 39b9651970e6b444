//! # Document Repository
//!
//! SQLite-backed [`KeyValueStore`].
//!
//! ## Schema
//! ```text
//! documents
//! ┌──────────┬──────────────────────────────┬───────────────────────────┐
//! │ key (PK) │ value (JSON)                 │ updated_at (RFC 3339)     │
//! ├──────────┼──────────────────────────────┼───────────────────────────┤
//! │ auth     │ false                        │ 2025-04-01T09:12:44Z      │
//! │ branches │ [{"id":"B001",...}]          │ 2025-04-01T09:12:44Z      │
//! │ invoices │ [{"id":"...","status":...}]  │ 2025-04-01T09:15:02Z      │
//! └──────────┴──────────────────────────────┴───────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::{Document, KeyValueStore};
use crate::error::{DbError, DbResult};

/// Repository over the `documents` table.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Lists stored keys in alphabetical order.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM documents ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    /// Writes a raw value under `key` outside of any batch.
    ///
    /// Used by maintenance tooling and tests; the ledger always goes through
    /// [`KeyValueStore::write_batch`].
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        self.write_batch(&[Document::new(key, value)]).await
    }
}

#[async_trait]
impl KeyValueStore for DocumentRepository {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM documents WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn write_batch(&self, documents: &[Document]) -> DbResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for document in documents {
            debug!(key = %document.key, bytes = document.value.len(), "Writing document");

            sqlx::query(
                r#"
                INSERT INTO documents (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(document.key.as_str())
            .bind(document.value.as_str())
            .bind(now.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> DocumentRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().documents()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let repo = repo().await;
        assert_eq!(repo.get("invoices").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_batch_upserts() {
        let repo = repo().await;
        repo.write_batch(&[Document::new("auth", "false"), Document::new("clients", "[]")])
            .await
            .unwrap();
        repo.put("auth", "true").await.unwrap();

        assert_eq!(repo.get("auth").await.unwrap().as_deref(), Some("true"));
        assert_eq!(repo.get("clients").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(repo.keys().await.unwrap(), vec!["auth", "clients"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let repo = repo().await;
        repo.write_batch(&[]).await.unwrap();
        assert!(repo.keys().await.unwrap().is_empty());
    }
}
