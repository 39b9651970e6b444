//! Client and branch master data.
//!
//! Plain record replacement. Invoices keep their own snapshot of the client
//! name, so nothing here cascades into the invoice collection.

use crate::error::{CoreError, CoreResult};
use crate::store::{Commit, EntityStore, Staged};
use crate::types::{Branch, Client};

/// Replaces the client with the same id, or appends a new one.
pub fn upsert_client(store: &EntityStore, client: Client) -> Staged<Client> {
    let mut clients = store.clients().to_vec();
    match clients.iter_mut().find(|c| c.id == client.id) {
        Some(existing) => *existing = client.clone(),
        None => clients.push(client.clone()),
    }
    Staged::new(client, Commit::new().with_clients(clients))
}

/// Removes a client. Invoices that reference it are left as they are.
pub fn remove_client(store: &EntityStore, id: &str) -> CoreResult<Staged<Client>> {
    let removed = store
        .client(id)
        .cloned()
        .ok_or_else(|| CoreError::not_found("Client", id))?;

    let clients = store
        .clients()
        .iter()
        .filter(|c| c.id != id)
        .cloned()
        .collect();
    Ok(Staged::new(removed, Commit::new().with_clients(clients)))
}

/// Replaces the branch with the same id, or appends a new one.
///
/// The stored `next_invoice_number` of an existing branch always wins over
/// the incoming value; only the numbering allocator moves the counter.
pub fn upsert_branch(store: &EntityStore, mut branch: Branch) -> Staged<Branch> {
    let mut branches = store.branches().to_vec();
    match branches.iter_mut().find(|b| b.id == branch.id) {
        Some(existing) => {
            branch.next_invoice_number = existing.next_invoice_number;
            *existing = branch.clone();
        }
        None => branches.push(branch.clone()),
    }
    Staged::new(branch, Commit::new().with_branches(branches))
}
