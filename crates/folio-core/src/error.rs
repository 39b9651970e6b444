//! # Ledger Errors
//!
//! Two layers, checked in this order:
//!
//! ```text
//!   entity from a collaborator
//!        │
//!        ▼
//!   validation::*  ──► ValidationError   (shape of the input)
//!        │
//!        ▼
//!   engine / Ledger ──► CoreError         (state of the ledger)
//! ```
//!
//! A `CoreError` means nothing was staged: the entity store is exactly
//! as it was before the call. Callers may retry or report and move on.

use thiserror::Error;

use crate::types::InvoiceStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Forbidden by the invoice status machine: editing or revoking a
    /// Paid/Cancelled invoice, or paying one under the strict policy.
    #[error("Invoice {invoice_id} is {status}, cannot {operation}")]
    InvalidTransition {
        invoice_id: String,
        status: InvoiceStatus,
        operation: &'static str,
    },

    /// The branch's sequence counter is at its ceiling.
    #[error("Invoice numbering exhausted for branch {branch_id}")]
    NumberingExhausted { branch_id: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        let id = id.into();
        CoreError::NotFound { entity, id }
    }

    pub fn invalid_transition(
        invoice_id: impl Into<String>,
        status: InvoiceStatus,
        operation: &'static str,
    ) -> Self {
        let invoice_id = invoice_id.into();
        CoreError::InvalidTransition { invoice_id, status, operation }
    }
}

/// A rejected input entity. See [`crate::validation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// GSTIN, IFSC, HSN and similar fixed-shape codes.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let revoke = CoreError::invalid_transition("inv-1", InvoiceStatus::Paid, "revoke");
        assert_eq!(revoke.to_string(), "Invoice inv-1 is Paid, cannot revoke");
        assert_eq!(CoreError::not_found("Branch", "B404").to_string(), "Branch not found: B404");

        let exhausted = CoreError::NumberingExhausted { branch_id: "BLR".into() };
        assert_eq!(exhausted.to_string(), "Invoice numbering exhausted for branch BLR");
    }

    #[test]
    fn test_validation_wraps_into_core() {
        let too_long = ValidationError::TooLong { field: "notes".into(), max: 500 };
        assert_eq!(too_long.to_string(), "notes must be at most 500 characters");

        let core: CoreError = too_long.clone().into();
        assert_eq!(core, CoreError::Validation(too_long));
    }
}
