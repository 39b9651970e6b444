//! # Invoice Lifecycle Controller
//!
//! Create, edit and revoke transitions over [`Invoice::status`].
//!
//! ## Operation Matrix
//! ```text
//! ┌────────────┬──────────┬──────────┬──────────┬────────────┐
//! │ operation  │  Draft   │  Posted  │   Paid   │ Cancelled  │
//! ├────────────┼──────────┼──────────┼──────────┼────────────┤
//! │ edit       │  ok      │  ok      │  reject  │  reject    │
//! │ revoke     │ →Cancel  │ →Cancel  │  reject  │  reject    │
//! └────────────┴──────────┴──────────┴──────────┴────────────┘
//!   create: always produces Posted, numbered by the branch allocator
//! ```
//!
//! Every function here reads the store and returns a [`Staged`] commit. A
//! rejected operation returns an error and no commit, so the store is left
//! untouched.

use crate::error::{CoreError, CoreResult};
use crate::numbering::allocate;
use crate::store::{Commit, EntityStore, Staged};
use crate::types::{Invoice, InvoiceFields, InvoiceStatus};

/// Creates a posted invoice on `branch_id`.
///
/// The new invoice goes to the front of the collection and the branch
/// counter advances; both land in one commit.
///
/// # Errors
/// - [`CoreError::NotFound`] if the branch does not exist
/// - [`CoreError::NumberingExhausted`] if the counter cannot advance
/// - [`CoreError::Validation`] if the line totals overflow
pub fn create_invoice(
    store: &EntityStore,
    fields: InvoiceFields,
    branch_id: &str,
) -> CoreResult<Staged<Invoice>> {
    let branch = store
        .branch(branch_id)
        .ok_or_else(|| CoreError::not_found("Branch", branch_id))?;

    let allocation = allocate(branch)?;
    let invoice = Invoice::posted(fields, allocation.invoice_number, branch.id.clone())?;

    let branches = store
        .branches()
        .iter()
        .map(|b| {
            if b.id == branch.id {
                allocation.branch.clone()
            } else {
                b.clone()
            }
        })
        .collect();

    let mut invoices = Vec::with_capacity(store.invoices().len() + 1);
    invoices.push(invoice.clone());
    invoices.extend_from_slice(store.invoices());

    let commit = Commit::new()
        .with_invoices(invoices)
        .with_branches(branches);
    Ok(Staged::new(invoice, commit))
}

/// Replaces the editable fields of a non-terminal invoice.
///
/// The invoice number, branch and status are kept; totals are recomputed.
/// The branch counter is not touched.
pub fn edit_invoice(
    store: &EntityStore,
    id: &str,
    fields: InvoiceFields,
) -> CoreResult<Staged<Invoice>> {
    let current = existing(store, id)?;
    if !current.status.is_editable() {
        return Err(CoreError::invalid_transition(id, current.status, "edit"));
    }

    let edited = current.with_fields(fields)?;
    Ok(Staged::new(edited.clone(), replace(store, edited)))
}

/// Cancels an invoice.
///
/// Paid and already-cancelled invoices are rejected; revoking twice is an
/// error, not a no-op. The invoice number stays consumed.
pub fn revoke_invoice(store: &EntityStore, id: &str) -> CoreResult<Staged<Invoice>> {
    let current = existing(store, id)?;
    if current.status.is_terminal() {
        return Err(CoreError::invalid_transition(id, current.status, "revoke"));
    }

    let cancelled = current.with_status(InvoiceStatus::Cancelled);
    Ok(Staged::new(cancelled.clone(), replace(store, cancelled)))
}

fn existing<'a>(store: &'a EntityStore, id: &str) -> CoreResult<&'a Invoice> {
    store
        .invoice(id)
        .ok_or_else(|| CoreError::not_found("Invoice", id))
}

/// Builds a commit that swaps `updated` in at its current position.
pub(crate) fn replace(store: &EntityStore, updated: Invoice) -> Commit {
    let invoices = store
        .invoices()
        .iter()
        .map(|i| {
            if i.id == updated.id {
                updated.clone()
            } else {
                i.clone()
            }
        })
        .collect();
    Commit::new().with_invoices(invoices)
}

// =============================================================================
// Unit Tests
// =============================================================================
