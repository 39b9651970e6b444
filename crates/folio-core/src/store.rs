//! # Entity Store
//!
//! The in-memory state of the ledger: four entity collections plus the
//! session flag.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Engine (pure)            EntityStore               Synchronizer        │
//! │  ─────────────            ───────────               ────────────        │
//! │  reads &EntityStore                                                     │
//! │  builds Commit ──────────► apply(commit)                                │
//! │  { invoices: Some(..),     replaces every                               │
//! │    branches: Some(..) }    present collection                           │
//! │                            returns ChangeSet ───────► writes each key   │
//! │                            [Invoices, Branches]       in one transaction│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`Commit`] is the only way to change the store, and applying one cannot
//! fail. Engines validate everything before they build it, so a multi
//! collection change is either applied whole or never produced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::defaults::default_branches;
use crate::types::{Branch, Client, Invoice, Payment};

// =============================================================================
// Collection Keys
// =============================================================================

/// One persisted unit of ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    Auth,
    Branches,
    Clients,
    Invoices,
    Payments,
}

impl Collection {
    /// Every collection, in rehydration order.
    pub const ALL: [Collection; 5] = [
        Collection::Auth,
        Collection::Branches,
        Collection::Clients,
        Collection::Invoices,
        Collection::Payments,
    ];

    /// The stable storage key.
    pub const fn key(&self) -> &'static str {
        match self {
            Collection::Auth => "auth",
            Collection::Branches => "branches",
            Collection::Clients => "clients",
            Collection::Invoices => "invoices",
            Collection::Payments => "payments",
        }
    }

    /// Looks a collection up by its storage key.
    pub fn from_key(key: &str) -> Option<Self> {
        Collection::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Commit
// =============================================================================

/// A set of whole-collection replacements applied to the store as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    pub branches: Option<Vec<Branch>>,
    pub clients: Option<Vec<Client>>,
    pub invoices: Option<Vec<Invoice>>,
    pub payments: Option<Vec<Payment>>,
    pub authenticated: Option<bool>,
}

impl Commit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branches(mut self, branches: Vec<Branch>) -> Self {
        self.branches = Some(branches);
        self
    }

    pub fn with_clients(mut self, clients: Vec<Client>) -> Self {
        self.clients = Some(clients);
        self
    }

    pub fn with_invoices(mut self, invoices: Vec<Invoice>) -> Self {
        self.invoices = Some(invoices);
        self
    }

    pub fn with_payments(mut self, payments: Vec<Payment>) -> Self {
        self.payments = Some(payments);
        self
    }

    pub fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = Some(authenticated);
        self
    }

    /// The collections this commit replaces.
    pub fn collections(&self) -> ChangeSet {
        let mut changed = Vec::new();
        if self.authenticated.is_some() {
            changed.push(Collection::Auth);
        }
        if self.branches.is_some() {
            changed.push(Collection::Branches);
        }
        if self.clients.is_some() {
            changed.push(Collection::Clients);
        }
        if self.invoices.is_some() {
            changed.push(Collection::Invoices);
        }
        if self.payments.is_some() {
            changed.push(Collection::Payments);
        }
        ChangeSet(changed)
    }

    pub fn is_empty(&self) -> bool {
        self.collections().is_empty()
    }
}

/// A computed value together with the commit that makes it real.
///
/// Engines return this instead of mutating the store; nothing changes until
/// the commit is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged<T> {
    pub value: T,
    pub commit: Commit,
}

impl<T> Staged<T> {
    pub fn new(value: T, commit: Commit) -> Self {
        Staged { value, commit }
    }
}

/// The collections touched by one applied commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(Vec<Collection>);

impl ChangeSet {
    pub fn contains(&self, collection: Collection) -> bool {
        self.0.contains(&collection)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Collection> + '_ {
        self.0.iter().copied()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Collection;
    type IntoIter = std::slice::Iter<'a, Collection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Entity Store
// =============================================================================

/// In-memory ledger state.
///
/// `invoices` and `payments` are kept newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityStore {
    branches: Vec<Branch>,
    clients: Vec<Client>,
    invoices: Vec<Invoice>,
    payments: Vec<Payment>,
    authenticated: bool,
}

/// The default data set: one branch, nothing else, signed out.
impl Default for EntityStore {
    fn default() -> Self {
        EntityStore {
            branches: default_branches(),
            clients: Vec::new(),
            invoices: Vec::new(),
            payments: Vec::new(),
            authenticated: false,
        }
    }
}

impl EntityStore {
    /// A store with no branches at all. Mostly useful in tests.
    pub fn empty() -> Self {
        EntityStore {
            branches: Vec::new(),
            clients: Vec::new(),
            invoices: Vec::new(),
            payments: Vec::new(),
            authenticated: false,
        }
    }

    // -------------------------------------------------------------------------
    // Read snapshots
    // -------------------------------------------------------------------------

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn branch(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    /// Finds an invoice by its printed number.
    pub fn invoice_by_number(&self, invoice_number: &str) -> Option<&Invoice> {
        self.invoices
            .iter()
            .find(|i| i.invoice_number == invoice_number)
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Applies every replacement in `commit` and reports what changed.
    pub fn apply(&mut self, commit: Commit) -> ChangeSet {
        let changed = commit.collections();

        if let Some(authenticated) = commit.authenticated {
            self.authenticated = authenticated;
        }
        if let Some(branches) = commit.branches {
            self.branches = branches;
        }
        if let Some(clients) = commit.clients {
            self.clients = clients;
        }
        if let Some(invoices) = commit.invoices {
            self.invoices = invoices;
        }
        if let Some(payments) = commit.payments {
            self.payments = payments;
        }

        changed
    }

    // -------------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------------

    /// Serializes one collection to its persisted JSON document.
    pub fn to_document(&self, collection: Collection) -> serde_json::Result<String> {
        match collection {
            Collection::Auth => serde_json::to_string(&self.authenticated),
            Collection::Branches => serde_json::to_string(&self.branches),
            Collection::Clients => serde_json::to_string(&self.clients),
            Collection::Invoices => serde_json::to_string(&self.invoices),
            Collection::Payments => serde_json::to_string(&self.payments),
        }
    }

    /// Replaces one collection from its persisted JSON document.
    ///
    /// On a parse error the collection is left untouched.
    pub fn load_document(&mut self, collection: Collection, json: &str) -> serde_json::Result<()> {
        match collection {
            Collection::Auth => self.authenticated = serde_json::from_str(json)?,
            Collection::Branches => self.branches = serde_json::from_str(json)?,
            Collection::Clients => self.clients = serde_json::from_str(json)?,
            Collection::Invoices => self.invoices = serde_json::from_str(json)?,
            Collection::Payments => self.payments = serde_json::from_str(json)?,
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_is_seeded() {
        let store = EntityStore::default();
        assert_eq!(store.branches().len(), 1);
        assert_eq!(store.branches()[0].id, "B001");
        assert!(store.clients().is_empty());
        assert!(store.invoices().is_empty());
        assert!(store.payments().is_empty());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_apply_replaces_only_present_collections() {
        let mut store = EntityStore::default();
        let changed = store.apply(Commit::new().with_authenticated(true).with_clients(Vec::new()));

        assert!(changed.contains(Collection::Auth));
        assert!(changed.contains(Collection::Clients));
        assert!(!changed.contains(Collection::Branches));
        assert_eq!(changed.len(), 2);
        assert!(store.is_authenticated());
        assert_eq!(store.branches().len(), 1);
    }

    #[test]
    fn test_empty_commit_changes_nothing() {
        let mut store = EntityStore::default();
        let before = store.clone();
        assert!(Commit::new().is_empty());
        assert!(store.apply(Commit::new()).is_empty());
        assert_eq!(store, before);
    }

    #[test]
    fn test_collection_keys() {
        let keys: Vec<_> = Collection::ALL.iter().map(Collection::key).collect();
        assert_eq!(keys, ["auth", "branches", "clients", "invoices", "payments"]);
        assert_eq!(Collection::from_key("invoices"), Some(Collection::Invoices));
        assert_eq!(Collection::from_key("sales"), None);
    }

    #[test]
    fn test_document_round_trip() {
        let store = EntityStore::default();
        let json = store.to_document(Collection::Branches).unwrap();
        assert!(json.contains("\"nextInvoiceNumber\":2075060834"));

        let mut other = EntityStore::empty();
        other.load_document(Collection::Branches, &json).unwrap();
        assert_eq!(other.branches(), store.branches());
    }

    #[test]
    fn test_load_document_failure_leaves_collection() {
        let mut store = EntityStore::default();
        assert!(store.load_document(Collection::Branches, "{not json").is_err());
        assert_eq!(store.branches().len(), 1);
    }
}
