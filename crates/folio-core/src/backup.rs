//! Backup export.
//!
//! A backup is a one-way snapshot of the four entity collections in a single
//! pretty-printed JSON document. There is no import path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::EntityStore;
use crate::types::{Branch, Client, Invoice, Payment};

/// Default file name prefix for backups.
pub const DEFAULT_BACKUP_PREFIX: &str = "FOLIO_BACKUP";

/// All entity collections at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    pub invoices: Vec<Invoice>,
    pub clients: Vec<Client>,
    pub branches: Vec<Branch>,
    pub payments: Vec<Payment>,
}

impl BackupSnapshot {
    pub fn capture(store: &EntityStore) -> Self {
        BackupSnapshot {
            invoices: store.invoices().to_vec(),
            clients: store.clients().to_vec(),
            branches: store.branches().to_vec(),
            payments: store.payments().to_vec(),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `<PREFIX>_<YYYY-MM-DD>.json`
pub fn backup_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.json", prefix, date.format("%Y-%m-%d"))
}
