//! Plain-text invoice share message.

use crate::types::Invoice;

/// Formats the message sent to a client alongside an invoice.
///
/// ```rust
/// # use folio_core::share::share_message;
/// # use folio_core::types::*;
/// # use folio_core::money::Money;
/// # use chrono::NaiveDate;
/// # let fields = InvoiceFields {
/// #     client_id: "C1".into(),
/// #     client_name: "Acme".into(),
/// #     date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
/// #     items: vec![LineItem {
/// #         description: "Advisory".into(),
/// #         hsn_code: "998311".into(),
/// #         quantity: 1,
/// #         unit_price: Money::from_minor(10_000_000),
/// #         tax_rate: TaxRate::from_bps(0),
/// #     }],
/// #     notes: None,
/// # };
/// let invoice = Invoice::posted(fields, "VED-BLR-42".into(), "B001".into()).unwrap();
/// let text = share_message(&invoice, "Vedartha International", "₹");
/// assert!(text.starts_with("Dear Acme,"));
/// assert!(text.contains("*Total Amount:* ₹ 1,00,000.00"));
/// ```
pub fn share_message(invoice: &Invoice, company_name: &str, currency_symbol: &str) -> String {
    format!(
        "Dear {},\n\nPlease find attached Invoice *{}* dated {}.\n\n*Total Amount:* {} {}\n\nRegards,\n{}",
        invoice.client_name,
        invoice.invoice_number,
        invoice.date.format("%Y-%m-%d"),
        currency_symbol,
        invoice.grand_total.to_indian_grouping(),
        company_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{InvoiceFields, LineItem, TaxRate};
    use chrono::NaiveDate;

    #[test]
    fn test_share_message_layout() {
        let fields = InvoiceFields {
            client_id: "C15480001".to_string(),
            client_name: "Globex".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
            items: vec![LineItem {
                description: "Business consulting".to_string(),
                hsn_code: "998312".to_string(),
                quantity: 3,
                unit_price: Money::from_minor(500_000),
                tax_rate: TaxRate::from_percent(18),
            }],
            notes: None,
        };
        let invoice = Invoice::posted(fields, "VED-BLR-9".to_string(), "B001".to_string()).unwrap();

        assert_eq!(
            share_message(&invoice, "Vedartha International", "₹"),
            "Dear Globex,\n\nPlease find attached Invoice *VED-BLR-9* dated 2025-10-02.\n\n\
             *Total Amount:* ₹ 17,700.00\n\nRegards,\nVedartha International"
        );
    }
}
