//! # Ledger
//!
//! Owns the [`EntityStore`] and is the single actor that applies intents.
//!
//! ```text
//!   intent ──► engine(&store) ──► Staged { value, commit }
//!                                          │
//!                         store.apply(commit) ──► ChangeSet
//!                                          │
//!                           Outcome { value, changes } ──► caller / synchronizer
//! ```
//!
//! Errors from an engine are returned before anything is applied.

use crate::error::CoreResult;
use crate::lifecycle;
use crate::master;
use crate::payment::{self, PaymentPolicy, Settlement};
use crate::store::{ChangeSet, Commit, EntityStore, Staged};
use crate::types::{Branch, Client, Invoice, InvoiceFields, Payment};

/// The value an intent produced and the collections it changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub changes: ChangeSet,
}

/// In-memory ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    store: EntityStore,
    policy: PaymentPolicy,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new(EntityStore::default())
    }
}

impl Ledger {
    pub fn new(store: EntityStore) -> Self {
        Ledger {
            store,
            policy: PaymentPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PaymentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn policy(&self) -> PaymentPolicy {
        self.policy
    }

    fn commit<T>(&mut self, staged: Staged<T>) -> Outcome<T> {
        let changes = self.store.apply(staged.commit);
        Outcome {
            value: staged.value,
            changes,
        }
    }

    // -------------------------------------------------------------------------
    // Invoice lifecycle
    // -------------------------------------------------------------------------

    pub fn create_invoice(
        &mut self,
        fields: InvoiceFields,
        branch_id: &str,
    ) -> CoreResult<Outcome<Invoice>> {
        let staged = lifecycle::create_invoice(&self.store, fields, branch_id)?;
        Ok(self.commit(staged))
    }

    pub fn edit_invoice(&mut self, id: &str, fields: InvoiceFields) -> CoreResult<Outcome<Invoice>> {
        let staged = lifecycle::edit_invoice(&self.store, id, fields)?;
        Ok(self.commit(staged))
    }

    pub fn revoke_invoice(&mut self, id: &str) -> CoreResult<Outcome<Invoice>> {
        let staged = lifecycle::revoke_invoice(&self.store, id)?;
        Ok(self.commit(staged))
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    pub fn record_payment(&mut self, payment: Payment) -> CoreResult<Outcome<Settlement>> {
        let staged = payment::record_payment(&self.store, payment, self.policy)?;
        Ok(self.commit(staged))
    }

    // -------------------------------------------------------------------------
    // Master data
    // -------------------------------------------------------------------------

    pub fn upsert_client(&mut self, client: Client) -> Outcome<Client> {
        let staged = master::upsert_client(&self.store, client);
        self.commit(staged)
    }

    pub fn remove_client(&mut self, id: &str) -> CoreResult<Outcome<Client>> {
        let staged = master::remove_client(&self.store, id)?;
        Ok(self.commit(staged))
    }

    pub fn upsert_branch(&mut self, branch: Branch) -> Outcome<Branch> {
        let staged = master::upsert_branch(&self.store, branch);
        self.commit(staged)
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Marks the session as signed in. No credentials are checked.
    pub fn login(&mut self) -> Outcome<()> {
        self.commit(Staged::new((), Commit::new().with_authenticated(true)))
    }

    pub fn logout(&mut self) -> Outcome<()> {
        self.commit(Staged::new((), Commit::new().with_authenticated(false)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::store::Collection;
    use crate::types::{InvoiceStatus, LineItem, PaymentMethod, TaxRate};
    use chrono::NaiveDate;

    fn fields() -> InvoiceFields {
        InvoiceFields {
            client_id: "C15480001".to_string(),
            client_name: "Acme".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 4).unwrap(),
            items: vec![LineItem {
                description: "Financial management consulting".to_string(),
                hsn_code: "998314".to_string(),
                quantity: 1,
                unit_price: Money::from_minor(50_000),
                tax_rate: TaxRate::from_percent(18),
            }],
            notes: Some("Net 30".to_string()),
        }
    }

    #[test]
    fn test_pay_then_revoke_scenario() {
        let mut ledger = Ledger::default();
        let invoice = ledger.create_invoice(fields(), "B001").unwrap().value;
        assert_eq!(invoice.invoice_number, "VED-BLR-2075060834");

        let date = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let outcome = ledger
            .record_payment(Payment::new(&invoice.id, Money::from_minor(500), date, PaymentMethod::Cash))
            .unwrap();
        assert!(outcome.changes.contains(Collection::Invoices));
        assert!(outcome.changes.contains(Collection::Payments));

        let err = ledger.revoke_invoice(&invoice.id).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(
            ledger.store().invoice(&invoice.id).unwrap().status,
            InvoiceStatus::Paid
        );
    }

    #[test]
    fn test_failed_edit_leaves_store_unchanged() {
        let mut ledger = Ledger::default();
        ledger.create_invoice(fields(), "B001").unwrap();
        let before = ledger.store().clone();

        let err = ledger.edit_invoice("nope", fields()).unwrap_err();
        assert_eq!(err, CoreError::not_found("Invoice", "nope"));
        assert_eq!(ledger.store(), &before);
    }

    #[test]
    fn test_login_logout() {
        let mut ledger = Ledger::default();
        let outcome = ledger.login();
        assert!(outcome.changes.contains(Collection::Auth));
        assert!(ledger.store().is_authenticated());

        ledger.logout();
        assert!(!ledger.store().is_authenticated());
    }

    #[test]
    fn test_strict_policy_is_used() {
        let mut ledger = Ledger::default().with_policy(PaymentPolicy::Strict);
        let date = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let err = ledger
            .record_payment(Payment::new("ghost", Money::from_minor(1), date, PaymentMethod::Upi))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(ledger.store().payments().is_empty());
    }
}
