//! # Persistent Ledger
//!
//! Couples the in-memory [`Ledger`] with the persistence synchronizer.
//!
//! ```text
//!   intent ──► Ledger (in memory, authoritative) ──► Outcome { value, changes }
//!                                                          │
//!                      serialize each changed collection ◄─┘
//!                                     │
//!                       SynchronizerHandle::submit(batch)   (fire-and-forget)
//! ```
//!
//! Persistence never turns a successful operation into a failure. What the
//! caller sees is always the in-memory result.

use std::sync::Arc;

use folio_core::{
    Branch, Client, Collection, CoreResult, Invoice, InvoiceFields, Ledger, Outcome,
    Payment, PaymentPolicy, Settlement,
};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::DbResult;
use crate::hydrate::{rehydrate, HydrationReport};
use crate::repository::{Document, KeyValueStore};
use crate::synchronizer::{Synchronizer, SynchronizerHandle, WriterStats};

/// A ledger whose every committed change is mirrored to a substrate.
pub struct PersistentLedger {
    ledger: Ledger,
    writer: SynchronizerHandle,
    task: JoinHandle<()>,
    report: HydrationReport,
}

impl PersistentLedger {
    /// Rehydrates from `store` and starts the background writer.
    ///
    /// Collections that were absent are written back straight away, so the
    /// default data set is durable from the first start.
    pub async fn open(store: Arc<dyn KeyValueStore>, policy: PaymentPolicy) -> Self {
        let (entities, report) = rehydrate(store.as_ref()).await;
        let (writer, task) = Synchronizer::spawn(store);

        let ledger = PersistentLedger {
            ledger: Ledger::new(entities).with_policy(policy),
            writer,
            task,
            report,
        };

        let seeded = ledger.report.seeded();
        if !seeded.is_empty() {
            info!(?seeded, "Persisting default data set");
            ledger.persist(seeded);
        }

        ledger
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn hydration_report(&self) -> &HydrationReport {
        &self.report
    }

    fn persist(&self, collections: impl IntoIterator<Item = Collection>) {
        let store = self.ledger.store();
        let documents = collections
            .into_iter()
            .filter_map(|collection| match store.to_document(collection) {
                Ok(value) => Some(Document::new(collection.key(), value)),
                Err(e) => {
                    error!(key = collection.key(), error = %e, "Failed to serialize collection");
                    None
                }
            })
            .collect();
        self.writer.submit(documents);
    }

    fn mirror<T>(&self, outcome: Outcome<T>) -> Outcome<T> {
        self.persist(outcome.changes.iter());
        outcome
    }

    fn mirror_result<T>(&self, result: CoreResult<Outcome<T>>) -> CoreResult<Outcome<T>> {
        result.map(|outcome| self.mirror(outcome))
    }

    // -------------------------------------------------------------------------
    // Intents
    // -------------------------------------------------------------------------

    pub fn create_invoice(
        &mut self,
        fields: InvoiceFields,
        branch_id: &str,
    ) -> CoreResult<Outcome<Invoice>> {
        let result = self.ledger.create_invoice(fields, branch_id);
        self.mirror_result(result)
    }

    pub fn edit_invoice(&mut self, id: &str, fields: InvoiceFields) -> CoreResult<Outcome<Invoice>> {
        let result = self.ledger.edit_invoice(id, fields);
        self.mirror_result(result)
    }

    pub fn revoke_invoice(&mut self, id: &str) -> CoreResult<Outcome<Invoice>> {
        let result = self.ledger.revoke_invoice(id);
        self.mirror_result(result)
    }

    pub fn record_payment(&mut self, payment: Payment) -> CoreResult<Outcome<Settlement>> {
        let result = self.ledger.record_payment(payment);
        self.mirror_result(result)
    }

    pub fn upsert_client(&mut self, client: Client) -> Outcome<Client> {
        let outcome = self.ledger.upsert_client(client);
        self.mirror(outcome)
    }

    pub fn remove_client(&mut self, id: &str) -> CoreResult<Outcome<Client>> {
        let result = self.ledger.remove_client(id);
        self.mirror_result(result)
    }

    pub fn upsert_branch(&mut self, branch: Branch) -> Outcome<Branch> {
        let outcome = self.ledger.upsert_branch(branch);
        self.mirror(outcome)
    }

    pub fn login(&mut self) -> Outcome<()> {
        let outcome = self.ledger.login();
        self.mirror(outcome)
    }

    pub fn logout(&mut self) -> Outcome<()> {
        let outcome = self.ledger.logout();
        self.mirror(outcome)
    }

    // -------------------------------------------------------------------------
    // Writer control
    // -------------------------------------------------------------------------

    /// Waits for every write submitted so far.
    pub async fn flush(&self) -> DbResult<WriterStats> {
        self.writer.flush().await
    }

    /// Drains pending writes and stops the writer.
    pub async fn close(self) -> DbResult<WriterStats> {
        let stats = self.writer.shutdown().await?;
        if let Err(e) = self.task.await {
            error!(?e, "Writer task ended abnormally");
        }
        Ok(stats)
    }
}

