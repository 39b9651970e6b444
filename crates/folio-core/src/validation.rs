//! # Validation Module
//!
//! Input validation run by collaborators before a core operation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Collaborator (CLI / UI)                                      │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE: field rules (required, ranges, formats)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Lifecycle / Payment engines                                  │
//! │  ├── Existence checks (NotFound)                                       │
//! │  └── State machine checks (InvalidTransition)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engines assume their inputs passed this layer; they re-check only what
//! depends on stored state.
//!
//! ## Usage
//! ```rust
//! use folio_core::validation::{validate_gstin, validate_payment_amount};
//!
//! validate_gstin("29AALFD7157J1ZV").unwrap();
//! assert!(validate_payment_amount(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{Branch, Client, InvoiceFields, InvoiceTotals, LineItem, Payment};
use crate::{MAX_INVOICE_LINES, MAX_LINE_QUANTITY, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a GSTIN (GST identification number).
///
/// ## Rules
/// - Must not be empty
/// - Exactly 15 characters
/// - ASCII letters and digits only
///
/// ```rust
/// use folio_core::validation::validate_gstin;
///
/// assert!(validate_gstin("29AALFD7157J1ZV").is_ok());
/// assert!(validate_gstin("").is_err());
/// assert!(validate_gstin("29-AALFD").is_err());
/// ```
pub fn validate_gstin(gstin: &str) -> ValidationResult<()> {
    let gstin = gstin.trim();
    required("gstin", gstin)?;

    if gstin.len() != 15 || !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "gstin".to_string(),
            reason: "must be 15 letters or digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a legal or display name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    required("name", name)?;
    max_len("name", name, 200)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    max_len("query", query, 100)?;
    Ok(query.trim().to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in minor units. Zero is allowed.
pub fn validate_unit_price(minor: i64) -> ValidationResult<()> {
    if !(0..=MAX_UNIT_PRICE).contains(&minor) {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Validates a payment amount in minor units.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// Partial amounts are accepted; any positive payment settles the invoice.
pub fn validate_payment_amount(minor: i64) -> ValidationResult<()> {
    if minor <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a single line item.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    required("description", &item.description)?;
    max_len("description", &item.description, 500)?;
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price.minor())?;
    validate_tax_rate_bps(item.tax_rate.bps())
}

/// Validates the caller-editable fields of an invoice.
///
/// ## Rules
/// - Client id and name are required
/// - At least one line item, at most MAX_INVOICE_LINES
/// - Every line item passes [`validate_line_item`]
/// - Line totals, tax and grand total fit in `Money`
pub fn validate_invoice_fields(fields: &InvoiceFields) -> ValidationResult<()> {
    required("clientId", &fields.client_id)?;
    required("clientName", &fields.client_name)?;

    if fields.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if fields.items.len() > MAX_INVOICE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_INVOICE_LINES as i64,
        });
    }

    fields.items.iter().try_for_each(validate_line_item)?;
    InvoiceTotals::from_items(&fields.items).map(|_| ())
}

/// Validates a client master record.
///
/// Name and GSTIN are the two mandatory fields of the client form.
pub fn validate_client(client: &Client) -> ValidationResult<()> {
    required("id", &client.id)?;
    validate_name(&client.name)?;
    validate_gstin(&client.gstin)
}

/// Validates a branch master record.
pub fn validate_branch(branch: &Branch) -> ValidationResult<()> {
    required("id", &branch.id)?;
    validate_name(&branch.name)?;
    validate_gstin(&branch.gstin)?;
    max_len("invoicePrefix", &branch.invoice_prefix, 20)?;
    validate_tax_rate_bps(branch.default_tax_rate.bps())
}

/// Validates a payment before it reaches the payment engine.
pub fn validate_payment(payment: &Payment) -> ValidationResult<()> {
    required("id", &payment.id)?;
    required("invoiceId", &payment.invoice_id)?;
    validate_payment_amount(payment.amount.minor())
}

// =============================================================================
// Unit Tests
// =============================================================================
