//! # Persistence Synchronizer
//!
//! Background writer that mirrors committed ledger changes to the substrate.
//!
//! ## Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PersistentLedger                 Synchronizer task                     │
//! │  ────────────────                 ─────────────────                     │
//! │  commit #1 ──submit(batch)──┐                                           │
//! │  commit #2 ──submit(batch)──┤    unbounded mpsc                         │
//! │  flush()   ──Flush(tx)──────┤──► recv in order ──► write_batch (1 tx)   │
//! │                             │                  ──► write_batch (1 tx)   │
//! │                             │                  ──► ack flush            │
//! │  shutdown()──Shutdown(tx)───┘                  ──► ack, stop            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Batches are written in submission order, one at a time.
//! - A failed batch is logged and dropped; later batches still run.
//! - `submit` never blocks and never fails the caller.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{Document, KeyValueStore};

/// Counters reported by the writer at a flush barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterStats {
    /// Batches committed to the substrate.
    pub written: u64,
    /// Batches the substrate rejected.
    pub failed: u64,
}

enum WriterMessage {
    Write(Vec<Document>),
    Flush(oneshot::Sender<WriterStats>),
    Shutdown(oneshot::Sender<WriterStats>),
}

// =============================================================================
// Synchronizer
// =============================================================================

/// The writer loop. Owns the substrate.
pub struct Synchronizer {
    store: Arc<dyn KeyValueStore>,
    rx: mpsc::UnboundedReceiver<WriterMessage>,
    stats: WriterStats,
}

/// Handle for submitting batches to the writer.
#[derive(Clone)]
pub struct SynchronizerHandle {
    tx: mpsc::UnboundedSender<WriterMessage>,
}

impl SynchronizerHandle {
    /// Queues a batch for writing. Fire-and-forget.
    pub fn submit(&self, documents: Vec<Document>) {
        if documents.is_empty() {
            return;
        }
        let keys: Vec<&str> = documents.iter().map(|d| d.key.as_str()).collect();
        debug!(?keys, "Queueing document batch");

        if self.tx.send(WriterMessage::Write(documents)).is_err() {
            warn!("Writer stopped, dropping document batch");
        }
    }

    /// Waits until every batch submitted before this call has been attempted.
    pub async fn flush(&self) -> DbResult<WriterStats> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(WriterMessage::Flush(ack_tx))
            .map_err(|_| DbError::WriterStopped("flush channel closed".into()))?;
        ack_rx
            .await
            .map_err(|_| DbError::WriterStopped("flush not acknowledged".into()))
    }

    /// Drains pending batches and stops the writer.
    pub async fn shutdown(&self) -> DbResult<WriterStats> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(WriterMessage::Shutdown(ack_tx))
            .map_err(|_| DbError::WriterStopped("shutdown channel closed".into()))?;
        ack_rx
            .await
            .map_err(|_| DbError::WriterStopped("shutdown not acknowledged".into()))
    }
}

impl Synchronizer {
    /// Creates a new writer and returns a handle.
    pub fn new(store: Arc<dyn KeyValueStore>) -> (Self, SynchronizerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();

        let synchronizer = Synchronizer {
            store,
            rx,
            stats: WriterStats::default(),
        };

        (synchronizer, SynchronizerHandle { tx })
    }

    /// Creates a writer and spawns it on the current tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> (SynchronizerHandle, JoinHandle<()>) {
        let (synchronizer, handle) = Synchronizer::new(store);
        let task = tokio::spawn(synchronizer.run());
        (handle, task)
    }

    /// Runs the writer loop until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!("Persistence writer starting");

        while let Some(message) = self.rx.recv().await {
            match message {
                WriterMessage::Write(documents) => self.write(documents).await,
                WriterMessage::Flush(ack) => {
                    // Receiver may have given up waiting.
                    let _ = ack.send(self.stats);
                }
                WriterMessage::Shutdown(ack) => {
                    info!("Persistence writer shutting down");
                    let _ = ack.send(self.stats);
                    break;
                }
            }
        }

        info!(
            written = self.stats.written,
            failed = self.stats.failed,
            "Persistence writer stopped"
        );
    }

    async fn write(&mut self, documents: Vec<Document>) {
        match self.store.write_batch(&documents).await {
            Ok(()) => {
                self.stats.written += 1;
                debug!(count = documents.len(), "Document batch written");
            }
            Err(e) => {
                self.stats.failed += 1;
                let keys: Vec<&str> = documents.iter().map(|d| d.key.as_str()).collect();
                error!(?e, ?keys, "Failed to write document batch");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    #[tokio::test]
    async fn test_writes_apply_in_submission_order() {
        let store = Arc::new(MemoryStore::new());
        let (handle, _task) = Synchronizer::spawn(store.clone());

        for n in 0..20 {
            handle.submit(vec![Document::new("invoices", n.to_string())]);
        }
        let stats = handle.flush().await.unwrap();

        assert_eq!(stats.written, 20);
        assert_eq!(store.raw("invoices").as_deref(), Some("19"));
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_writer() {
        let store = Arc::new(MemoryStore::new());
        let (handle, _task) = Synchronizer::spawn(store.clone());

        store.set_fail_writes(true);
        handle.submit(vec![Document::new("clients", "[1]")]);
        let stats = handle.flush().await.unwrap();
        assert_eq!(stats.failed, 1);
        assert_eq!(store.raw("clients"), None);

        store.set_fail_writes(false);
        handle.submit(vec![Document::new("clients", "[2]")]);
        let stats = handle.flush().await.unwrap();
        assert_eq!(stats, WriterStats { written: 1, failed: 1 });
        assert_eq!(store.raw("clients").as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn test_shutdown_drains_then_stops() {
        let store = Arc::new(MemoryStore::new());
        let (handle, task) = Synchronizer::spawn(store.clone());

        handle.submit(vec![Document::new("auth", "true")]);
        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.written, 1);
        task.await.unwrap();

        assert!(handle.flush().await.is_err());
        // Submitting after shutdown is dropped silently.
        handle.submit(vec![Document::new("auth", "false")]);
        assert_eq!(store.raw("auth").as_deref(), Some("true"));
    }
}
