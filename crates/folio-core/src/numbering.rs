//! # Numbering Allocator
//!
//! Derives the next legally sequential invoice number for a branch.
//!
//! ```text
//!   Branch { invoice_prefix: "VED-BLR-", next_invoice_number: 2075060834 }
//!        │
//!        ▼  allocate()
//!   "VED-BLR-2075060834"   +   Branch { .., next_invoice_number: 2075060835 }
//! ```
//!
//! Allocation is pure. The caller commits the returned branch together with
//! the invoice that carries the number, so a number is consumed exactly when
//! the invoice exists. Numbers are never reused, not even after revocation.

use crate::error::{CoreError, CoreResult};
use crate::types::Branch;

/// Result of one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// `invoice_prefix` followed by the decimal counter value.
    pub invoice_number: String,
    /// The branch with its counter advanced by one.
    pub branch: Branch,
}

/// Allocates the next invoice number of `branch`.
///
/// # Errors
/// [`CoreError::NumberingExhausted`] when the counter is at `u64::MAX`.
///
/// ```rust
/// use folio_core::numbering::allocate;
/// use folio_core::defaults::default_branches;
///
/// let branch = &default_branches()[0];
/// let allocation = allocate(branch).unwrap();
/// assert_eq!(allocation.invoice_number, "VED-BLR-2075060834");
/// assert_eq!(allocation.branch.next_invoice_number, 2075060835);
/// ```
pub fn allocate(branch: &Branch) -> CoreResult<Allocation> {
    let next = branch
        .next_invoice_number
        .checked_add(1)
        .ok_or_else(|| CoreError::NumberingExhausted {
            branch_id: branch.id.clone(),
        })?;

    Ok(Allocation {
        invoice_number: format!("{}{}", branch.invoice_prefix, branch.next_invoice_number),
        branch: Branch {
            next_invoice_number: next,
            ..branch.clone()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_branches;

    #[test]
    fn test_allocate_changes_only_counter() {
        let branch = default_branches().remove(0);
        let allocation = allocate(&branch).unwrap();

        assert_eq!(allocation.invoice_number, "VED-BLR-2075060834");
        let mut expected = branch.clone();
        expected.next_invoice_number = 2_075_060_835;
        assert_eq!(allocation.branch, expected);
    }

    #[test]
    fn test_allocate_with_empty_prefix() {
        let mut branch = default_branches().remove(0);
        branch.invoice_prefix.clear();
        branch.next_invoice_number = 1;
        assert_eq!(allocate(&branch).unwrap().invoice_number, "1");
    }

    #[test]
    fn test_allocate_exhausted() {
        let mut branch = default_branches().remove(0);
        branch.next_invoice_number = u64::MAX;
        assert_eq!(
            allocate(&branch),
            Err(CoreError::NumberingExhausted {
                branch_id: "B001".to_string()
            })
        );
    }
}
