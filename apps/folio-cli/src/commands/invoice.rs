//! # Invoice Commands
//!
//! ## Input File (create and edit)
//! ```json
//! {
//!   "clientId": "C15480001",
//!   "date": "2025-06-01",
//!   "items": [
//!     { "hsnCode": "998313", "quantity": 2, "unitPrice": 2500000 }
//!   ],
//!   "notes": "PO 4471"
//! }
//! ```
//! Amounts are in paise. The client name is taken from the client record.
//! A line without a description uses the HSN/SAC description; a line
//! without a tax rate uses the branch default. Create defaults the date to
//! today, edit keeps the invoice's current date.

use std::path::Path;

use chrono::NaiveDate;
use folio_core::defaults::hsn_description;
use folio_core::query::{default_active_branch, payments_for, search_invoices};
use folio_core::share::share_message;
use folio_core::validation::{validate_invoice_fields, validate_search_query};
use folio_core::{Branch, EntityStore, Invoice, InvoiceFields, InvoiceStatus, LineItem, Money, Payment, TaxRate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{read_json, resolve_invoice, to_json, OutputFormat};
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::LedgerState;

// =============================================================================
// Input
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    pub client_id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub items: Vec<LineInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInput {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hsn_code: String,
    pub quantity: i64,
    pub unit_price: Money,
    #[serde(default)]
    pub tax_rate: Option<TaxRate>,
}

impl InvoiceInput {
    /// Resolves the client and fills line defaults from `branch`.
    pub fn into_fields(
        self,
        store: &EntityStore,
        branch: &Branch,
        default_date: NaiveDate,
    ) -> CliResult<InvoiceFields> {
        let client = store
            .client(&self.client_id)
            .ok_or_else(|| CliError::not_found("Client", &self.client_id))?;

        if !client.is_billable_from(&branch.id) {
            warn!(client_id = %client.id, branch_id = %branch.id, "Client is not assigned to this branch");
        }

        let items = self
            .items
            .into_iter()
            .map(|line| LineItem {
                description: line
                    .description
                    .or_else(|| hsn_description(&line.hsn_code).map(str::to_string))
                    .unwrap_or_default(),
                hsn_code: line.hsn_code,
                quantity: line.quantity,
                unit_price: line.unit_price,
                tax_rate: line.tax_rate.unwrap_or(branch.default_tax_rate),
            })
            .collect();

        Ok(InvoiceFields {
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            date: self.date.unwrap_or(default_date),
            items,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

// =============================================================================
// Queries
// =============================================================================

pub fn list(
    state: &LedgerState,
    query: Option<&str>,
    status: Option<InvoiceStatus>,
    format: OutputFormat,
) -> CliResult<String> {
    debug!(?query, ?status, "invoice list command");
    let query = validate_search_query(query.unwrap_or(""))?;
    let invoices: Vec<&Invoice> =
        search_invoices(state.ledger().ledger().store().invoices(), &query)
            .into_iter()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .collect();

    if format == OutputFormat::Json {
        return to_json(&invoices);
    }

    if invoices.is_empty() {
        return Ok("No invoices".to_string());
    }

    let config = state.config();
    let mut out = format!(
        "{:<22} {:<10} {:<32} {:<9} {:>18}",
        "NUMBER", "DATE", "CLIENT", "STATUS", "TOTAL"
    );
    for i in invoices {
        out.push_str(&format!(
            "\n{:<22} {:<10} {:<32} {:<9} {:>18}",
            i.invoice_number,
            i.date.format("%Y-%m-%d").to_string(),
            i.client_name,
            i.status.as_str(),
            config.format_currency(i.grand_total)
        ));
    }
    Ok(out)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceDetail<'a> {
    invoice: &'a Invoice,
    payments: Vec<&'a Payment>,
}

pub fn show(state: &LedgerState, key: &str, format: OutputFormat) -> CliResult<String> {
    debug!(key, "invoice show command");
    let store = state.ledger().ledger().store();
    let invoice = resolve_invoice(store, key)?;
    let payments = payments_for(store.payments(), &invoice.id);

    if format == OutputFormat::Json {
        return to_json(&InvoiceDetail { invoice, payments });
    }

    let config = state.config();
    let money = |m: Money| config.format_currency(m);

    let mut out = String::new();
    out.push_str(&format!("Invoice {}  [{}]\n", invoice.invoice_number, invoice.status));
    if let Some(branch) = store.branch(&invoice.branch_id) {
        out.push_str(&format!("From:    {} (GSTIN {})\n", branch.name, branch.gstin));
    }
    out.push_str(&format!("To:      {} ({})\n", invoice.client_name, invoice.client_id));
    out.push_str(&format!("Date:    {}\n", invoice.date.format("%d-%b-%Y")));
    out.push('\n');

    for (n, item) in invoice.items.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<46} {:<7} {:>6} x {:>16} @ {:>5}% = {:>18}\n",
            n + 1,
            item.description,
            item.hsn_code,
            item.quantity,
            money(item.unit_price),
            item.tax_rate.percentage(),
            item.line_total().map_or_else(|| "-".to_string(), money)
        ));
    }

    out.push('\n');
    out.push_str(&format!("Subtotal:    {:>18}\n", money(invoice.subtotal)));
    out.push_str(&format!("Tax:         {:>18}\n", money(invoice.tax)));
    out.push_str(&format!("Grand total: {:>18}\n", money(invoice.grand_total)));

    if let Some(notes) = &invoice.notes {
        out.push_str(&format!("\nNotes: {}\n", notes));
    }

    if !payments.is_empty() {
        out.push_str("\nPayments:\n");
        for p in &payments {
            out.push_str(&format!(
                "  {}  {:<12} {:>18}  {}\n",
                p.date.format("%Y-%m-%d"),
                format!("{:?}", p.method),
                money(p.amount),
                p.reference.as_deref().unwrap_or("-")
            ));
        }
    }

    let bank = &config.bank;
    out.push_str(&format!(
        "\nPay to: {}, A/c {}, IFSC {}\n        {}",
        bank.bank_name, bank.account_number, bank.ifsc_code, bank.address
    ));
    Ok(out)
}

/// Prints the message sent to the client alongside the invoice document.
pub fn share(state: &LedgerState, key: &str) -> CliResult<String> {
    debug!(key, "invoice share command");
    let invoice = resolve_invoice(state.ledger().ledger().store(), key)?;
    let company = &state.config().company;
    Ok(share_message(invoice, &company.name, &company.currency_symbol))
}

// =============================================================================
// Intents
// =============================================================================

/// Creates a posted invoice on `branch` (the first branch when omitted).
pub fn create(
    state: &mut LedgerState,
    file: &Path,
    branch: Option<&str>,
    today: NaiveDate,
) -> CliResult<String> {
    let input: InvoiceInput = read_json(file)?;
    debug!(client_id = %input.client_id, ?branch, "invoice create command");

    let store = state.ledger().ledger().store();
    let branch = match branch {
        Some(id) => store
            .branch(id)
            .ok_or_else(|| CliError::not_found("Branch", id))?,
        None => default_active_branch(store.branches())
            .ok_or_else(|| CliError::not_found("Branch", "(default)"))?,
    };
    let branch_id = branch.id.clone();

    let fields = input.into_fields(store, branch, today)?;
    validate_invoice_fields(&fields)?;

    let invoice = state.ledger_mut().create_invoice(fields, &branch_id)?.value;
    info!(
        invoice_id = %invoice.id,
        invoice_number = %invoice.invoice_number,
        "Invoice created"
    );

    Ok(format!(
        "Created invoice {} for {} ({}), id {}",
        invoice.invoice_number,
        invoice.client_name,
        state.config().format_currency(invoice.grand_total),
        invoice.id
    ))
}

/// Replaces the editable fields of a Draft or Posted invoice.
pub fn edit(state: &mut LedgerState, key: &str, file: &Path) -> CliResult<String> {
    let input: InvoiceInput = read_json(file)?;
    debug!(key, "invoice edit command");

    let store = state.ledger().ledger().store();
    let current = resolve_invoice(store, key)?;
    let branch = store
        .branch(&current.branch_id)
        .ok_or_else(|| CliError::not_found("Branch", &current.branch_id))?;
    let id = current.id.clone();

    let fields = input.into_fields(store, branch, current.date)?;
    validate_invoice_fields(&fields)?;

    let invoice = state.ledger_mut().edit_invoice(&id, fields)?.value;
    info!(invoice_id = %invoice.id, "Invoice edited");

    Ok(format!(
        "Updated invoice {} ({})",
        invoice.invoice_number,
        state.config().format_currency(invoice.grand_total)
    ))
}

/// Cancels an invoice. Requires explicit confirmation.
pub fn revoke(state: &mut LedgerState, key: &str, confirmed: bool) -> CliResult<String> {
    debug!(key, confirmed, "invoice revoke command");
    let invoice = resolve_invoice(state.ledger().ledger().store(), key)?;

    if !confirmed {
        return Err(CliError::new(
            ErrorCode::NotConfirmed,
            format!(
                "Revoking {} cannot be undone; pass --yes to confirm",
                invoice.invoice_number
            ),
        ));
    }

    let id = invoice.id.clone();
    let revoked = state.ledger_mut().revoke_invoice(&id)?.value;
    info!(invoice_id = %revoked.id, "Invoice revoked");

    Ok(format!("Revoked invoice {}", revoked.invoice_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{client, payment, testing};

    const CLIENT: &str = r#"{"id": "C15480001", "name": "Northwind Traders", "gstin": "29AAACN1234F1Z5"}"#;
    const INVOICE: &str = r#"{
        "clientId": "C15480001",
        "date": "2025-06-01",
        "items": [{ "hsnCode": "998313", "quantity": 2, "unitPrice": 250000 }]
    }"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    async fn with_client(dir: &tempfile::TempDir) -> LedgerState {
        let mut state = testing::state().await;
        client::upsert(&mut state, &testing::input_file(dir, "c.json", CLIENT), false).unwrap();
        state
    }

    #[tokio::test]
    async fn test_create_fills_defaults_and_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = with_client(&dir).await;
        let file = testing::input_file(&dir, "i.json", INVOICE);

        let out = create(&mut state, &file, None, today()).unwrap();
        assert!(out.starts_with("Created invoice VED-BLR-2075060834 for Northwind Traders (₹ 5,900.00)"));

        let store = state.ledger().ledger().store();
        let invoice = &store.invoices()[0];
        assert_eq!(invoice.items[0].description, "STRATEGIC MANAGEMENT SERVICES");
        assert_eq!(invoice.items[0].tax_rate, TaxRate::from_percent(18));
        assert_eq!(invoice.status, InvoiceStatus::Posted);
        assert_eq!(store.branch("B001").unwrap().next_invoice_number, 2_075_060_835);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_client_and_branch() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = testing::state().await;
        let file = testing::input_file(&dir, "i.json", INVOICE);

        let err = create(&mut state, &file, None, today()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let mut state = with_client(&dir).await;
        let err = create(&mut state, &file, Some("B999"), today()).unwrap_err();
        assert_eq!(err.message, "Branch not found: B999");
        assert!(state.ledger().ledger().store().invoices().is_empty());
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_rejects_empty_items() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = with_client(&dir).await;
        let file = testing::input_file(&dir, "i.json", r#"{"clientId": "C15480001", "items": []}"#);

        let err = create(&mut state, &file, None, today()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(
            state.ledger().ledger().store().branch("B001").unwrap().next_invoice_number,
            2_075_060_834
        );
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_rejects_overflowing_price() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = with_client(&dir).await;
        let file = testing::input_file(
            &dir,
            "i.json",
            r#"{"clientId": "C15480001", "items": [{"hsnCode": "998313", "quantity": 2, "unitPrice": 4611686018427387904}]}"#,
        );

        let err = create(&mut state, &file, None, today()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("unit price must be between"));
        assert!(state.ledger().ledger().store().invoices().is_empty());
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_edit_keeps_number_and_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = with_client(&dir).await;
        create(&mut state, &testing::input_file(&dir, "i.json", INVOICE), None, today()).unwrap();

        let edit_file = testing::input_file(
            &dir,
            "e.json",
            r#"{"clientId": "C15480001", "items": [{"description": "Workshop", "quantity": 1, "unitPrice": 100000, "taxRate": 0}]}"#,
        );
        let out = edit(&mut state, "VED-BLR-2075060834", &edit_file).unwrap();
        assert_eq!(out, "Updated invoice VED-BLR-2075060834 (₹ 1,000.00)");

        let invoice = &state.ledger().ledger().store().invoices()[0];
        assert_eq!(invoice.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(invoice.items[0].description, "Workshop");
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = with_client(&dir).await;
        create(&mut state, &testing::input_file(&dir, "i.json", INVOICE), None, today()).unwrap();

        let err = revoke(&mut state, "VED-BLR-2075060834", false).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotConfirmed);
        assert_eq!(state.ledger().ledger().store().invoices()[0].status, InvoiceStatus::Posted);

        assert_eq!(
            revoke(&mut state, "VED-BLR-2075060834", true).unwrap(),
            "Revoked invoice VED-BLR-2075060834"
        );
        let err = revoke(&mut state, "VED-BLR-2075060834", true).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_paid_invoice_cannot_be_edited() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = with_client(&dir).await;
        let file = testing::input_file(&dir, "i.json", INVOICE);
        create(&mut state, &file, None, today()).unwrap();
        payment::record(
            &mut state,
            payment::RecordPayment {
                invoice: "VED-BLR-2075060834".to_string(),
                amount: "500".to_string(),
                date: today(),
                method: folio_core::PaymentMethod::Upi,
                reference: None,
            },
        )
        .unwrap();

        let err = edit(&mut state, "VED-BLR-2075060834", &file).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_list_show_and_share() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = with_client(&dir).await;
        create(&mut state, &testing::input_file(&dir, "i.json", INVOICE), None, today()).unwrap();

        let listed = list(&state, Some("northwind"), None, OutputFormat::Text).unwrap();
        assert!(listed.contains("VED-BLR-2075060834"));
        assert_eq!(
            list(&state, None, Some(InvoiceStatus::Paid), OutputFormat::Text).unwrap(),
            "No invoices"
        );

        let shown = show(&state, "VED-BLR-2075060834", OutputFormat::Text).unwrap();
        assert!(shown.contains("Grand total:"));
        assert!(shown.contains("RATN0000088"));

        let json = show(&state, "VED-BLR-2075060834", OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["invoice"]["grandTotal"], 590_000);

        assert_eq!(
            share(&state, "VED-BLR-2075060834").unwrap(),
            "Dear Northwind Traders,\n\nPlease find attached Invoice *VED-BLR-2075060834* dated 2025-06-01.\n\n*Total Amount:* ₹ 5,900.00\n\nRegards,\nVedartha International Limited"
        );
        state.close().await.unwrap();
    }
}
