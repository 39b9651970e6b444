//! # Commands Module
//!
//! One function per CLI intent. Each takes the ledger state plus parsed
//! arguments and returns the text to print.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (shared helpers)
//! ├── session.rs  ◄─── login / logout
//! ├── branch.rs   ◄─── branch list / upsert
//! ├── client.rs   ◄─── client list / upsert / remove
//! ├── invoice.rs  ◄─── invoice list / show / create / edit / revoke / share
//! ├── payment.rs  ◄─── payment list / record
//! └── report.rs   ◄─── summary / backup
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  folio invoice create --file inv.json                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  read_json::<InvoiceInput>  ──► resolve client + defaults               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  validate_invoice_fields    ──► ValidationError → CliError              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  PersistentLedger::create_invoice (in memory, then queued write)        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  "Created VED-BLR-2075060834 ..."  (or JSON with --json)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod branch;
pub mod client;
pub mod invoice;
pub mod payment;
pub mod report;
pub mod session;

use std::path::Path;

use folio_core::{EntityStore, Invoice};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CliError, CliResult};

/// How query results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reads and decodes an input entity file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(
            crate::error::ErrorCode::IoError,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })?;
    Ok(serde_json::from_str(&contents)?)
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Finds an invoice by id or by invoice number.
pub(crate) fn find_invoice<'a>(store: &'a EntityStore, key: &str) -> Option<&'a Invoice> {
    store.invoice(key).or_else(|| store.invoice_by_number(key))
}

pub(crate) fn resolve_invoice<'a>(store: &'a EntityStore, key: &str) -> CliResult<&'a Invoice> {
    find_invoice(store, key).ok_or_else(|| CliError::not_found("Invoice", key))
}
