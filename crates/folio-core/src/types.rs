//! # Domain Types
//!
//! Core entity types of the ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Branch      │   │     Invoice     │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  invoice_prefix │◄──│  invoice_number │◄──│  invoice_id     │       │
//! │  │  next_invoice_  │   │  branch_id      │   │  amount         │       │
//! │  │    number       │   │  status         │   │  method         │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ client_id + client_name (snapshot)   │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │     Client      │   │  InvoiceStatus  │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  id, gstin      │   │  Draft, Posted  │       │
//! │                        │  branch_ids     │   │  Paid,Cancelled │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! Every entity serializes with camelCase field names. The persisted
//! documents are the direct serialization of these structs.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1800 bps = 18% (standard GST on consulting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage.
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        TaxRate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Address
// =============================================================================

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

// =============================================================================
// Branch
// =============================================================================

/// A billing entity with its own registration and numbering sequence.
///
/// ## Counter Invariant
/// `next_invoice_number` only moves forward, one step per created invoice,
/// and only through [`crate::numbering::allocate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Stable business id (e.g. `B001`).
    pub id: String,

    /// Legal name printed on invoices.
    pub name: String,

    pub address: Address,

    /// Contact phone number.
    pub contact: String,

    pub email: String,

    /// GST registration number.
    pub gstin: String,

    /// Permanent account number.
    pub pan: String,

    /// Tax rate pre-filled on new line items.
    pub default_tax_rate: TaxRate,

    /// Prefix of every invoice number issued by this branch.
    pub invoice_prefix: String,

    /// The number the next created invoice will carry.
    #[ts(type = "number")]
    pub next_invoice_number: u64,
}

// =============================================================================
// Client
// =============================================================================

/// Lifecycle status of a client master record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
}

/// A client that can be billed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
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
    /// Branches this client may be invoiced from.
    #[serde(default)]
    pub branch_ids: BTreeSet<String>,
    pub billing_address: Address,
    pub shipping_address: Address,
}

impl Client {
    /// Creates a client billable from the given branches.
    ///
    /// The id follows the `C1548NNNN` scheme, where `NNNN` are the last four
    /// digits of the current millisecond timestamp.
    pub fn new(
        name: impl Into<String>,
        gstin: impl Into<String>,
        branch_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        Client {
            id: format!("C1548{:04}", millis.rem_euclid(10_000)),
            name: name.into(),
            contact_person: String::new(),
            email: String::new(),
            phone: String::new(),
            gstin: gstin.into(),
            status: ClientStatus::Active,
            branch_ids: branch_ids.into_iter().collect(),
            billing_address: Address::default(),
            shipping_address: Address::default(),
        }
    }

    /// Copies the billing address into the shipping address.
    pub fn ship_to_billing_address(&mut self) {
        self.shipping_address = self.billing_address.clone();
    }

    /// Whether this client may be invoiced from `branch_id`.
    pub fn is_billable_from(&self, branch_id: &str) -> bool {
        self.branch_ids.contains(branch_id)
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// The status of an invoice document.
///
/// ## State Machine
/// ```text
///   Draft ──┐
///     │     │ (edit allowed in Draft and Posted)
///     ▼     │
///   Posted ─┼──── payment ────► Paid       (terminal)
///           │
///           └──── revoke ─────► Cancelled  (terminal)
/// ```
///
/// Creation posts immediately, so `Draft` is never produced by the creation
/// path. It stays a legal value for records that arrive by other means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InvoiceStatus {
    Draft,
    #[default]
    Posted,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    /// Paid and Cancelled admit no further transitions.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }

    /// Whether non-status fields may still change.
    #[inline]
    pub const fn is_editable(&self) -> bool {
        !self.is_terminal()
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Posted => "Posted",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One billed service line.
///
/// Tax is a flat rate on the line total; there is no compound or
/// jurisdiction-specific tax logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    /// HSN/SAC classification code.
    #[serde(default)]
    pub hsn_code: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
}

impl LineItem {
    /// Unit price × quantity, `None` if it does not fit in `Money`.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Tax on the line total at the line's flat rate.
    pub fn tax(&self) -> Option<Money> {
        self.line_total()?.calculate_tax(self.tax_rate)
    }
}

/// Totals derived from a sequence of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub grand_total: Money,
}

impl InvoiceTotals {
    /// Sums line totals and per-line tax.
    ///
    /// Rejects items whose line, subtotal, tax or grand total overflows.
    pub fn from_items(items: &[LineItem]) -> Result<Self, ValidationError> {
        let overflow = |field: &str| ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        };

        let mut subtotal = Money::zero();
        let mut tax = Money::zero();
        for item in items {
            let line = item.line_total().ok_or_else(|| overflow("line total"))?;
            let line_tax = item.tax().ok_or_else(|| overflow("line tax"))?;
            subtotal = subtotal.checked_add(line).ok_or_else(|| overflow("subtotal"))?;
            tax = tax.checked_add(line_tax).ok_or_else(|| overflow("tax"))?;
        }

        let grand_total = subtotal.checked_add(tax).ok_or_else(|| overflow("grand total"))?;
        Ok(InvoiceTotals {
            subtotal,
            tax,
            grand_total,
        })
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// The caller-editable fields of an invoice.
///
/// Used both for creation and for edits. Identity, numbering, branch and
/// status are owned by the lifecycle controller and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFields {
    pub client_id: String,
    pub client_name: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A numbered invoice document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// `branch.invoice_prefix` + counter value, fixed at creation.
    pub invoice_number: String,
    pub branch_id: String,
    pub client_id: String,
    /// Client name as it was when the invoice was last written.
    pub client_name: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub grand_total: Money,
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Invoice {
    /// Builds a new posted invoice from caller fields and an allocated number.
    pub fn posted(
        fields: InvoiceFields,
        invoice_number: String,
        branch_id: String,
    ) -> Result<Self, ValidationError> {
        let totals = InvoiceTotals::from_items(&fields.items)?;
        Ok(Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number,
            branch_id,
            client_id: fields.client_id,
            client_name: fields.client_name,
            date: fields.date,
            items: fields.items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            grand_total: totals.grand_total,
            status: InvoiceStatus::Posted,
            notes: fields.notes,
        })
    }

    /// Returns a copy with `fields` merged in.
    ///
    /// `id`, `invoice_number`, `branch_id` and `status` are carried over;
    /// totals are recomputed from the new items.
    pub fn with_fields(&self, fields: InvoiceFields) -> Result<Self, ValidationError> {
        let totals = InvoiceTotals::from_items(&fields.items)?;
        Ok(Invoice {
            id: self.id.clone(),
            invoice_number: self.invoice_number.clone(),
            branch_id: self.branch_id.clone(),
            client_id: fields.client_id,
            client_name: fields.client_name,
            date: fields.date,
            items: fields.items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            grand_total: totals.grand_total,
            status: self.status,
            notes: fields.notes,
        })
    }

    /// Returns a copy carrying `status`.
    pub fn with_status(&self, status: InvoiceStatus) -> Self {
        Invoice {
            status,
            ..self.clone()
        }
    }

    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            grand_total: self.grand_total,
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// How a payment was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    BankTransfer,
    Upi,
    Cheque,
    Cash,
    Card,
}

/// An entry in the append-only payment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    /// Referenced invoice. The invoice may not exist (orphaned payment).
    pub invoice_id: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub method: PaymentMethod,
    /// Bank reference, UTR or cheque number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Payment {
    /// Creates a payment with a fresh UUID v4 id.
    pub fn new(
        invoice_id: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        method: PaymentMethod,
    ) -> Self {
        Payment {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.into(),
            amount,
            date,
            method,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
