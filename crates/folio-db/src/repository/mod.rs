//! # Repository Module
//!
//! The key-value substrate the ledger persists into.
//!
//! ## Substrate Seam
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Synchronizer / rehydrate                                              │
//! │       │                                                                 │
//! │       │  store.get("invoices")                                         │
//! │       │  store.write_batch(&[Document { key, value }, ...])            │
//! │       ▼                                                                 │
//! │  dyn KeyValueStore                                                     │
//! │  ├── DocumentRepository  (SQLite `documents` table)                   │
//! │  └── MemoryStore         (HashMap, tests and dry runs)                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`DocumentRepository`] - SQLite-backed documents
//! - [`MemoryStore`] - In-process documents with failure injection

pub mod document;
pub mod memory;

use async_trait::async_trait;

use crate::error::DbResult;

pub use document::DocumentRepository;
pub use memory::MemoryStore;

/// One stored value under a stable key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub key: String,
    pub value: String,
}

impl Document {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Document {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A string-keyed document store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`, if any.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes every document or none of them.
    async fn write_batch(&self, documents: &[Document]) -> DbResult<()>;
}
