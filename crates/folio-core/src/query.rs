//! # Queries
//!
//! Read-only views over the entity store used by collaborators: list
//! filters, per-invoice payment history and the ledger summary.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::store::EntityStore;
use crate::types::{Branch, Client, Invoice, InvoiceStatus, Payment};

/// Filters invoices by number or client name, case-insensitively.
///
/// An empty (or whitespace) query matches everything. Order is preserved,
/// so results stay newest first.
pub fn search_invoices<'a>(invoices: &'a [Invoice], query: &str) -> Vec<&'a Invoice> {
    let needle = query.trim().to_lowercase();
    invoices
        .iter()
        .filter(|i| {
            needle.is_empty()
                || i.invoice_number.to_lowercase().contains(&needle)
                || i.client_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Filters clients by name or GSTIN, case-insensitively.
pub fn search_clients<'a>(clients: &'a [Client], query: &str) -> Vec<&'a Client> {
    let needle = query.trim().to_lowercase();
    clients
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.gstin.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Payments recorded against one invoice, newest first.
pub fn payments_for<'a>(payments: &'a [Payment], invoice_id: &str) -> Vec<&'a Payment> {
    payments
        .iter()
        .filter(|p| p.invoice_id == invoice_id)
        .collect()
}

/// The branch selected when the collaborator has not picked one.
pub fn default_active_branch(branches: &[Branch]) -> Option<&Branch> {
    branches.first()
}

/// Headline figures of the ledger.
///
/// Money figures clamp at `i64::MAX` rather than wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub draft: usize,
    pub posted: usize,
    pub paid: usize,
    pub cancelled: usize,
    /// Grand totals of Posted and Paid invoices.
    pub billed: Money,
    /// Grand totals of Posted invoices.
    pub outstanding: Money,
    /// Payments whose invoice exists.
    pub collected: Money,
}

impl LedgerSummary {
    pub fn compute(store: &EntityStore) -> Self {
        let mut summary = LedgerSummary::default();

        for invoice in store.invoices() {
            match invoice.status {
                InvoiceStatus::Draft => summary.draft += 1,
                InvoiceStatus::Posted => {
                    summary.posted += 1;
                    summary.billed = summary.billed.saturating_add(invoice.grand_total);
                    summary.outstanding = summary.outstanding.saturating_add(invoice.grand_total);
                }
                InvoiceStatus::Paid => {
                    summary.paid += 1;
                    summary.billed = summary.billed.saturating_add(invoice.grand_total);
                }
                InvoiceStatus::Cancelled => summary.cancelled += 1,
            }
        }

        summary.collected = store
            .payments()
            .iter()
            .filter(|p| store.invoice(&p.invoice_id).is_some())
            .fold(Money::zero(), |acc, p| acc.saturating_add(p.amount));

        summary
    }

    pub fn total(&self) -> usize {
        self.draft + self.posted + self.paid + self.cancelled
    }
}
