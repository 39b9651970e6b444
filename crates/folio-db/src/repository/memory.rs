//! In-process [`KeyValueStore`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{Document, KeyValueStore};
use crate::error::{DbError, DbResult};

/// A HashMap-backed store.
///
/// Reads and writes can be made to fail on demand, which is how tests drive
/// the fallback and error-logging paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, String>>,
    fail_reads: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
    batches: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing the batch counter.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Returns the raw value under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Makes every read of `key` fail.
    pub fn fail_reads_of(&self, key: impl Into<String>) {
        self.fail_reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.into());
    }

    /// Makes every subsequent batch fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of batches successfully written.
    pub fn batches_written(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let failing = self
            .fail_reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|k| k == key);
        if failing {
            return Err(DbError::QueryFailed(format!("read of {} failed", key)));
        }
        Ok(self.raw(key))
    }

    async fn write_batch(&self, documents: &[Document]) -> DbResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::TransactionFailed("write rejected".to_string()));
        }

        let mut stored = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        for document in documents {
            stored.insert(document.key.clone(), document.value.clone());
        }
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
