//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An invoice total that drifts by a paisa is a different legal          │
//! │  document from the one the client received.                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise for INR)                     │
//! │    ₹ 1,180.00 is stored as 118000                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//!
//! let rate = Money::from_minor(250_000); // ₹ 2,500.00
//! let line = rate.multiply_quantity(3).unwrap();  // ₹ 7,500.00
//! assert_eq!(line.minor(), 750_000);
//! assert!(rate.multiply_quantity(i64::MAX).is_none());
//! ```
//!
//! There is no `+` or `*` on `Money`. Invoice arithmetic goes through the
//! checked methods and an overflow becomes a rejected invoice; reporting
//! totals saturate instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price ──► LineItem.line_total ──► Invoice.subtotal
///                                  │
///                                  └──► calculate_tax ──► Invoice.tax
///
/// Invoice.subtotal + Invoice.tax ──► Invoice.grand_total
/// Payment.amount (any positive amount settles the invoice)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let fee = Money::from_minor(1099);
    /// assert_eq!(fee.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).minor(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Calculates tax at a flat rate, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, widened to i128 so
    /// large invoices cannot overflow the intermediate product. `None` if
    /// the tax itself does not fit, which only a rate above 100% can cause.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    /// use folio_core::types::TaxRate;
    ///
    /// let fee = Money::from_minor(100_000);      // ₹ 1,000.00
    /// let gst = fee.calculate_tax(TaxRate::from_percent(18)).unwrap();
    /// assert_eq!(gst.minor(), 18_000);          // ₹ 180.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        let tax_minor = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        i64::try_from(tax_minor).ok().map(Money::from_minor)
    }

    /// Unit price × quantity, `None` on overflow.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Clamps at `i64::MAX` / `i64::MIN`. For running report totals only.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Sums with overflow checking.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let fees = [Money::from_minor(100), Money::from_minor(250)];
    /// assert_eq!(Money::checked_sum(fees).unwrap().minor(), 350);
    /// assert!(Money::checked_sum([Money::from_minor(i64::MAX), Money::from_minor(1)]).is_none());
    /// ```
    pub fn checked_sum(amounts: impl IntoIterator<Item = Money>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Formats the amount with Indian digit grouping (`12,34,567.89`).
    ///
    /// The last three integer digits form one group and every two digits
    /// before them form another.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(123_456_789).to_indian_grouping(), "12,34,567.89");
    /// assert_eq!(Money::from_minor(50_000).to_indian_grouping(), "500.00");
    /// ```
    pub fn to_indian_grouping(&self) -> String {
        let digits = self.major().abs().to_string();
        let grouped = if digits.len() <= 3 {
            digits
        } else {
            let (head, tail) = digits.split_at(digits.len() - 3);
            let mut groups: Vec<&str> = Vec::new();
            let mut end = head.len();
            while end > 0 {
                let start = end.saturating_sub(2);
                groups.push(&head[start..end]);
                end = start;
            }
            groups.reverse();
            format!("{},{}", groups.join(","), tail)
        };

        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, grouped, self.minor_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering without currency symbol or grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_minor(-550)), "-5.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_tax_calculation_rounds_half_up() {
        // 8.25% of 10.00 = 0.825 → 0.83
        let tax = Money::from_minor(1000).calculate_tax(TaxRate::from_bps(825)).unwrap();
        assert_eq!(tax.minor(), 83);
    }

    #[test]
    fn test_tax_calculation_gst() {
        let tax = Money::from_minor(250_000).calculate_tax(TaxRate::from_percent(18)).unwrap();
        assert_eq!(tax.minor(), 45_000);
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(Money::from_minor(0).to_indian_grouping(), "0.00");
        assert_eq!(Money::from_minor(99_999).to_indian_grouping(), "999.99");
        assert_eq!(Money::from_minor(100_000).to_indian_grouping(), "1,000.00");
        assert_eq!(Money::from_minor(10_000_000).to_indian_grouping(), "1,00,000.00");
        assert_eq!(
            Money::from_minor(1_234_567_800).to_indian_grouping(),
            "1,23,45,678.00"
        );
        assert_eq!(Money::from_minor(-150_050).to_indian_grouping(), "-1,500.50");
    }

    #[test]
    fn test_multiply_quantity_overflow() {
        let price = Money::from_minor(1_500_000);
        assert_eq!(price.multiply_quantity(4).unwrap().minor(), 6_000_000);

        let huge = Money::from_minor(i64::MAX / 2 + 1);
        assert_eq!(huge.multiply_quantity(2), None);
    }

    #[test]
    fn test_checked_and_saturating_add() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max.checked_add(Money::from_minor(1)), None);
        assert_eq!(max.saturating_add(Money::from_minor(1)), max);
        assert_eq!(
            Money::from_minor(100).checked_add(Money::from_minor(250)),
            Some(Money::from_minor(350))
        );
    }
}
