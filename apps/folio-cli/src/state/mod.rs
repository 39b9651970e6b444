//! # State Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐        ┌─────────────────────────────────────┐   │
//! │  │   FolioConfig    │        │            LedgerState              │   │
//! │  │                  │───────►│                                     │   │
//! │  │  company, bank   │        │  PersistentLedger (in memory)       │   │
//! │  │  payment policy  │        │  Database (SQLite pool, optional)   │   │
//! │  │  backup prefix   │        │                                     │   │
//! │  └──────────────────┘        └─────────────────────────────────────┘   │
//! │                                                                         │
//! │  FolioConfig: read-only after load                                     │
//! │  LedgerState: one per invocation, closed before exit                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod ledger;

pub use config::{BankConfig, CompanyConfig, FolioConfig, LedgerSettings};
pub use ledger::LedgerState;
