//! # folio-db: Persistence Layer for Folio Ledger
//!
//! Mirrors the in-memory ledger into a key-value document store and
//! rebuilds it at startup.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Ledger Data Flow                           │
//! │                                                                         │
//! │  folio-cli (invoice create ...)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     folio-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌────────────────┐  │   │
//! │  │   │PersistentLedger│──►│  Synchronizer  │──►│ KeyValueStore  │  │   │
//! │  │   │ (ledger.rs)   │   │ ordered writer │   │ SQLite/Memory  │  │   │
//! │  │   └───────┬───────┘   └────────────────┘   └───────┬────────┘  │   │
//! │  │           │ startup                                 │           │   │
//! │  │           └────────────── rehydrate ◄───────────────┘           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (folio.db, WAL)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use folio_db::{Database, DbConfig, PersistentLedger};
//!
//! let db = Database::new(DbConfig::new("./folio.db")).await?;
//! let mut ledger = PersistentLedger::open(Arc::new(db.documents()), Default::default()).await;
//! ledger.login();
//! ledger.close().await?;
//! ```

pub mod error;
pub mod hydrate;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod synchronizer;

pub use error::{DbError, DbResult};
pub use hydrate::{rehydrate, HydrationReport, KeySource};
pub use ledger::PersistentLedger;
pub use pool::{Database, DbConfig};
pub use repository::{Document, DocumentRepository, KeyValueStore, MemoryStore};
pub use synchronizer::{Synchronizer, SynchronizerHandle, WriterStats};
