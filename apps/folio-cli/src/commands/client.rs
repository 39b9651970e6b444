//! # Client Commands
//!
//! ## Input File
//! ```json
//! {
//!   "name": "Northwind Traders",
//!   "gstin": "29AAACN1234F1Z5",
//!   "contactPerson": "Accounts Payable",
//!   "billingAddress": { "line1": "1 Business Park", "city": "Bengaluru",
//!                       "state": "Karnataka", "pincode": "560025", "country": "India" }
//! }
//! ```
//! Without an `id` a new `C1548NNNN` id is issued. Without `branchIds` the
//! client is billable from the default branch. Without a shipping address,
//! or with `--same-as-billing`, shipping copies billing.

use std::collections::BTreeSet;
use std::path::Path;

use folio_core::query::{default_active_branch, search_clients};
use folio_core::validation::{validate_client, validate_search_query};
use folio_core::{Address, Client, ClientStatus};
use serde::Deserialize;
use tracing::{debug, info};

use super::{read_json, to_json, OutputFormat};
use crate::error::CliResult;
use crate::state::LedgerState;

/// A client as written by hand. Everything but name and GSTIN is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub gstin: String,
    #[serde(default)]
    pub status: ClientStatus,
    #[serde(default)]
    pub branch_ids: Option<BTreeSet<String>>,
    #[serde(default)]
    pub billing_address: Address,
    #[serde(default)]
    pub shipping_address: Option<Address>,
}

impl ClientInput {
    /// Builds the client record, filling in defaults.
    pub fn into_client(self, default_branch: Option<&str>, same_as_billing: bool) -> Client {
        let branch_ids = self
            .branch_ids
            .unwrap_or_else(|| default_branch.map(str::to_string).into_iter().collect());

        let mut client = Client::new(self.name, self.gstin, branch_ids);
        if let Some(id) = self.id {
            client.id = id;
        }
        client.contact_person = self.contact_person;
        client.email = self.email;
        client.phone = self.phone;
        client.status = self.status;
        client.billing_address = self.billing_address;

        match self.shipping_address {
            Some(shipping) if !same_as_billing => client.shipping_address = shipping,
            _ => client.ship_to_billing_address(),
        }
        client
    }
}

pub fn list(state: &LedgerState, query: Option<&str>, format: OutputFormat) -> CliResult<String> {
    debug!(?query, "client list command");
    let query = validate_search_query(query.unwrap_or(""))?;
    let clients = search_clients(state.ledger().ledger().store().clients(), &query);

    if format == OutputFormat::Json {
        return to_json(&clients);
    }

    if clients.is_empty() {
        return Ok("No clients".to_string());
    }

    let mut out = format!(
        "{:<10} {:<32} {:<16} {:<9} {}",
        "ID", "NAME", "GSTIN", "STATUS", "CITY"
    );
    for c in clients {
        out.push_str(&format!(
            "\n{:<10} {:<32} {:<16} {:<9} {}",
            c.id,
            c.name,
            c.gstin,
            format!("{:?}", c.status),
            c.billing_address.city
        ));
    }
    Ok(out)
}

pub fn upsert(state: &mut LedgerState, file: &Path, same_as_billing: bool) -> CliResult<String> {
    let input: ClientInput = read_json(file)?;
    debug!(name = %input.name, "client upsert command");

    let store = state.ledger().ledger().store();
    let default_branch = default_active_branch(store.branches()).map(|b| b.id.as_str());
    let client = input.into_client(default_branch, same_as_billing);
    validate_client(&client)?;

    let existed = store.client(&client.id).is_some();
    let saved = state.ledger_mut().upsert_client(client).value;
    info!(client_id = %saved.id, existed, "Client saved");

    Ok(format!(
        "{} client {} ({})",
        if existed { "Updated" } else { "Added" },
        saved.id,
        saved.name
    ))
}

/// Removes a client. Invoices that reference it are left as they are.
pub fn remove(state: &mut LedgerState, id: &str) -> CliResult<String> {
    debug!(client_id = %id, "client remove command");
    let removed = state.ledger_mut().remove_client(id)?.value;
    info!(client_id = %removed.id, "Client removed");
    Ok(format!("Removed client {} ({})", removed.id, removed.name))
}
