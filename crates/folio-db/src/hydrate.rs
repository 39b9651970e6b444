//! # Rehydration
//!
//! Rebuilds the entity store from the substrate at startup.
//!
//! ```text
//!   for key in [auth, branches, clients, invoices, payments]:
//!       get(key) ── Ok(Some(json)) ── parse ok ──► Loaded
//!           │                       └ parse err ─► FellBack  (warn!)
//!           ├──── Ok(None) ────────────────────► Seeded
//!           └──── Err(_) ──────────────────────► FellBack  (warn!)
//! ```
//!
//! A bad key never aborts startup and never affects any other key.

use folio_core::{Collection, EntityStore};
use tracing::{info, warn};

use crate::repository::KeyValueStore;

/// How one collection was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Read and parsed from the substrate.
    Loaded,
    /// Absent; the default was used.
    Seeded,
    /// Present but unreadable or unparseable; the default was used.
    FellBack,
}

/// Per-collection outcome of a rehydration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HydrationReport {
    pub sources: Vec<(Collection, KeySource)>,
}

impl HydrationReport {
    pub fn source(&self, collection: Collection) -> Option<KeySource> {
        self.sources
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, s)| *s)
    }

    /// Collections that came from the default data set because nothing was
    /// stored yet.
    pub fn seeded(&self) -> Vec<Collection> {
        self.sources
            .iter()
            .filter(|(_, s)| *s == KeySource::Seeded)
            .map(|(c, _)| *c)
            .collect()
    }
}

/// Loads every collection, falling back per key to the default data set.
pub async fn rehydrate(store: &dyn KeyValueStore) -> (EntityStore, HydrationReport) {
    let mut entities = EntityStore::default();
    let mut report = HydrationReport::default();

    for collection in Collection::ALL {
        let source = match store.get(collection.key()).await {
            Ok(Some(json)) => match entities.load_document(collection, &json) {
                Ok(()) => KeySource::Loaded,
                Err(e) => {
                    warn!(key = collection.key(), error = %e, "Stored document unreadable, using default");
                    KeySource::FellBack
                }
            },
            Ok(None) => KeySource::Seeded,
            Err(e) => {
                warn!(key = collection.key(), error = %e, "Failed to read document, using default");
                KeySource::FellBack
            }
        };
        report.sources.push((collection, source));
    }

    info!(
        branches = entities.branches().len(),
        clients = entities.clients().len(),
        invoices = entities.invoices().len(),
        payments = entities.payments().len(),
        "Ledger rehydrated"
    );

    (entities, report)
}
