//! # Payment Application Engine
//!
//! Records payments and settles the invoices they reference.
//!
//! ## Settlement Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  referenced invoice     Lenient (default)          Strict               │
//! │  ──────────────────     ─────────────────          ──────               │
//! │  Draft / Posted         append, → Paid             append, → Paid       │
//! │  Paid                   append, stays Paid         InvalidTransition    │
//! │  Cancelled              append, stays Cancelled    InvalidTransition    │
//! │  missing (orphan)       append                     NotFound             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any positive amount settles the invoice in full. There is no partial
//! payment tracking and no balance.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::lifecycle::replace;
use crate::store::{Commit, EntityStore, Staged};
use crate::types::{InvoiceStatus, Payment};

/// How the engine treats payments that cannot settle anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPolicy {
    /// Always append; settle when possible.
    #[default]
    Lenient,
    /// Reject payments against missing or terminal invoices.
    Strict,
}

/// What a recorded payment did to its invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementEffect {
    /// The invoice moved to Paid.
    Settled,
    /// The invoice was already Paid.
    AlreadyPaid,
    /// The invoice is Cancelled and was left alone.
    InvoiceCancelled,
    /// No invoice carries the referenced id.
    Orphaned,
}

/// A recorded payment and its effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub payment: Payment,
    pub effect: SettlementEffect,
}

/// Appends `payment` to the log (newest first) and settles its invoice.
///
/// # Errors
/// - [`ValidationError::Duplicate`] if a payment with the same id exists
/// - Under [`PaymentPolicy::Strict`]: [`CoreError::NotFound`] for an orphan,
///   [`CoreError::InvalidTransition`] for a Paid or Cancelled invoice
pub fn record_payment(
    store: &EntityStore,
    payment: Payment,
    policy: PaymentPolicy,
) -> CoreResult<Staged<Settlement>> {
    if store.payments().iter().any(|p| p.id == payment.id) {
        return Err(ValidationError::Duplicate {
            field: "payment id".to_string(),
            value: payment.id,
        }
        .into());
    }

    let invoice = store.invoice(&payment.invoice_id);
    let effect = match invoice.map(|i| i.status) {
        None => SettlementEffect::Orphaned,
        Some(InvoiceStatus::Paid) => SettlementEffect::AlreadyPaid,
        Some(InvoiceStatus::Cancelled) => SettlementEffect::InvoiceCancelled,
        Some(InvoiceStatus::Draft | InvoiceStatus::Posted) => SettlementEffect::Settled,
    };

    if policy == PaymentPolicy::Strict {
        match (effect, invoice) {
            (SettlementEffect::Orphaned, _) => {
                return Err(CoreError::not_found("Invoice", payment.invoice_id));
            }
            (SettlementEffect::AlreadyPaid | SettlementEffect::InvoiceCancelled, Some(i)) => {
                return Err(CoreError::invalid_transition(
                    i.id.clone(),
                    i.status,
                    "record payment",
                ));
            }
            _ => {}
        }
    }

    let mut commit = match (effect, invoice) {
        (SettlementEffect::Settled, Some(i)) => replace(store, i.with_status(InvoiceStatus::Paid)),
        _ => Commit::new(),
    };

    let mut payments = Vec::with_capacity(store.payments().len() + 1);
    payments.push(payment.clone());
    payments.extend_from_slice(store.payments());
    commit = commit.with_payments(payments);

    Ok(Staged::new(Settlement { payment, effect }, commit))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{create_invoice, revoke_invoice};
    use crate::money::Money;
    use crate::types::{InvoiceFields, LineItem, PaymentMethod, TaxRate};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 14).unwrap()
    }

    fn posted_store() -> (EntityStore, String) {
        let mut store = EntityStore::default();
        let fields = InvoiceFields {
            client_id: "C15480001".to_string(),
            client_name: "Acme".to_string(),
            date: date(),
            items: vec![LineItem {
                description: "Due diligence".to_string(),
                hsn_code: "998314".to_string(),
                quantity: 1,
                unit_price: Money::from_minor(100_000),
                tax_rate: TaxRate::from_percent(18),
            }],
            notes: None,
        };
        let staged = create_invoice(&store, fields, "B001").unwrap();
        let id = staged.value.id.clone();
        store.apply(staged.commit);
        (store, id)
    }

    fn pay(invoice_id: &str, minor: i64) -> Payment {
        Payment::new(invoice_id, Money::from_minor(minor), date(), PaymentMethod::BankTransfer)
    }

    #[test]
    fn test_any_payment_settles() {
        let (mut store, id) = posted_store();

        let staged = record_payment(&store, pay(&id, 50_000), PaymentPolicy::Lenient).unwrap();
        assert_eq!(staged.value.effect, SettlementEffect::Settled);
        store.apply(staged.commit);
        assert_eq!(store.invoice(&id).unwrap().status, InvoiceStatus::Paid);

        let staged = record_payment(&store, pay(&id, 50_000), PaymentPolicy::Lenient).unwrap();
        assert_eq!(staged.value.effect, SettlementEffect::AlreadyPaid);
        assert!(staged.commit.invoices.is_none());
        store.apply(staged.commit);
        assert_eq!(store.invoice(&id).unwrap().status, InvoiceStatus::Paid);
        assert_eq!(store.payments().len(), 2);
    }

    #[test]
    fn test_payments_are_newest_first() {
        let (mut store, id) = posted_store();
        let first = pay(&id, 100);
        let second = pay(&id, 200);
        let staged = record_payment(&store, first.clone(), PaymentPolicy::Lenient).unwrap();
        store.apply(staged.commit);
        let staged = record_payment(&store, second.clone(), PaymentPolicy::Lenient).unwrap();
        store.apply(staged.commit);

        assert_eq!(store.payments()[0].id, second.id);
        assert_eq!(store.payments()[1].id, first.id);
    }

    #[test]
    fn test_cancelled_invoice_never_flips() {
        let (mut store, id) = posted_store();
        let staged = revoke_invoice(&store, &id).unwrap();
        store.apply(staged.commit);

        let staged = record_payment(&store, pay(&id, 500), PaymentPolicy::Lenient).unwrap();
        assert_eq!(staged.value.effect, SettlementEffect::InvoiceCancelled);
        store.apply(staged.commit);
        assert_eq!(store.invoice(&id).unwrap().status, InvoiceStatus::Cancelled);
        assert_eq!(store.payments().len(), 1);
    }

    #[test]
    fn test_orphan_tolerated_when_lenient() {
        let (mut store, _) = posted_store();
        let staged = record_payment(&store, pay("ghost", 500), PaymentPolicy::Lenient).unwrap();
        assert_eq!(staged.value.effect, SettlementEffect::Orphaned);
        store.apply(staged.commit);
        assert_eq!(store.payments().len(), 1);
    }

    #[test]
    fn test_strict_policy_rejects() {
        let (mut store, id) = posted_store();

        let err = record_payment(&store, pay("ghost", 500), PaymentPolicy::Strict).unwrap_err();
        assert_eq!(err, CoreError::not_found("Invoice", "ghost"));

        let staged = record_payment(&store, pay(&id, 500), PaymentPolicy::Strict).unwrap();
        store.apply(staged.commit);

        let err = record_payment(&store, pay(&id, 500), PaymentPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            CoreError::invalid_transition(&id, InvoiceStatus::Paid, "record payment")
        );
        assert_eq!(store.payments().len(), 1);
    }

    #[test]
    fn test_duplicate_payment_id_rejected() {
        let (mut store, id) = posted_store();
        let payment = pay(&id, 500);
        let staged = record_payment(&store, payment.clone(), PaymentPolicy::Lenient).unwrap();
        store.apply(staged.commit);

        let err = record_payment(&store, payment, PaymentPolicy::Lenient).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let policy: PaymentPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(policy, PaymentPolicy::Strict);
    }
}
