//! # folio-core: Pure Business Logic for Folio Ledger
//!
//! This crate is the **heart** of Folio Ledger: the invoice lifecycle and
//! numbering engine, expressed as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Ledger Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    folio-cli (collaborator)                     │   │
//! │  │    parse intent ──► validate ──► call ledger ──► print          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ numbering │  │ lifecycle │  │  payment  │  │   store   │  │   │
//! │  │   │ allocate  │  │ create    │  │  record   │  │  Commit   │  │   │
//! │  │   │           │  │ edit      │  │  settle   │  │  ChangeSet│  │   │
//! │  │   │           │  │ revoke    │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO LOGGING SINKS • PURE FUNCTIONS     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ ChangeSet                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                folio-db (Persistence Layer)                     │   │
//! │  │      document store, ordered writer, rehydration                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Branch, Client, Invoice, Payment)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules checked by collaborators
//! - [`store`] - Entity store, commits and change sets
//! - [`numbering`] - Branch-scoped invoice number allocation
//! - [`lifecycle`] - Create / edit / revoke
//! - [`payment`] - Payment recording and settlement
//! - [`master`] - Client and branch master data
//! - [`ledger`] - The actor that applies staged commits
//! - [`query`], [`backup`], [`share`] - Read-only views
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use folio_core::{InvoiceFields, Ledger, LineItem, Money, TaxRate};
//!
//! let mut ledger = Ledger::default();
//! let fields = InvoiceFields {
//!     client_id: "C15480001".to_string(),
//!     client_name: "Acme Exports".to_string(),
//!     date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
//!     items: vec![LineItem {
//!         description: "Management consulting".to_string(),
//!         hsn_code: "998311".to_string(),
//!         quantity: 1,
//!         unit_price: Money::from_minor(100_000),
//!         tax_rate: TaxRate::from_percent(18),
//!     }],
//!     notes: None,
//! };
//!
//! let invoice = ledger.create_invoice(fields, "B001").unwrap().value;
//! assert_eq!(invoice.invoice_number, "VED-BLR-2075060834");
//! assert_eq!(invoice.grand_total.minor(), 118_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod defaults;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod master;
pub mod money;
pub mod numbering;
pub mod payment;
pub mod query;
pub mod share;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Ledger, Outcome};
pub use money::Money;
pub use payment::{PaymentPolicy, Settlement, SettlementEffect};
pub use store::{ChangeSet, Collection, Commit, EntityStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items on one invoice.
pub const MAX_INVOICE_LINES: usize = 200;

/// Maximum quantity on a single line item.
pub const MAX_LINE_QUANTITY: i64 = 100_000;

/// Maximum unit price in minor units (₹ 100,00,00,000.00).
///
/// With the line and quantity limits and a tax rate of at most 100%, every
/// invoice that passes validation has totals that fit in `Money`.
pub const MAX_UNIT_PRICE: i64 = 100_000_000_000;
