//! # Payment Commands
//!
//! Any positive payment settles a Posted (or Draft) invoice in full. Under
//! the lenient policy a payment is always logged, even when its invoice is
//! missing or already terminal; the command reports what it did.

use chrono::NaiveDate;
use folio_core::query::payments_for;
use folio_core::validation::validate_payment;
use folio_core::{Money, Payment, PaymentMethod, SettlementEffect};
use tracing::{debug, info, warn};

use super::{find_invoice, to_json, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::state::LedgerState;

/// Arguments of `payment record`.
#[derive(Debug, Clone)]
pub struct RecordPayment {
    /// Invoice id or invoice number
    pub invoice: String,
    /// Decimal amount in major units, e.g. `5900` or `1,250.50`
    pub amount: String,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

/// Parses a decimal amount in major units into minor units.
///
/// Indian or western digit grouping commas are ignored. At most two
/// fractional digits are accepted.
pub fn parse_amount(input: &str) -> CliResult<Money> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    let invalid = || CliError::validation(format!("Invalid amount: '{}'", input));

    let (major, minor) = match cleaned.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (cleaned.as_str(), ""),
    };

    if major.is_empty() && minor.is_empty()
        || minor.len() > 2
        || !major.chars().all(|c| c.is_ascii_digit())
        || !minor.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let major: i64 = if major.is_empty() {
        0
    } else {
        major.parse().map_err(|_| invalid())?
    };
    let minor: i64 = match minor.len() {
        0 => 0,
        1 => minor.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => minor.parse().map_err(|_| invalid())?,
    };

    major
        .checked_mul(100)
        .and_then(|m| m.checked_add(minor))
        .map(Money::from_minor)
        .ok_or_else(invalid)
}

pub fn record(state: &mut LedgerState, args: RecordPayment) -> CliResult<String> {
    debug!(invoice = %args.invoice, amount = %args.amount, "payment record command");
    let amount = parse_amount(&args.amount)?;

    // An unknown key is passed through as the invoice id; the policy decides.
    let invoice_id = find_invoice(state.ledger().ledger().store(), &args.invoice)
        .map(|i| i.id.clone())
        .unwrap_or_else(|| args.invoice.clone());

    let mut payment = Payment::new(invoice_id, amount, args.date, args.method);
    if let Some(reference) = args.reference.filter(|r| !r.trim().is_empty()) {
        payment = payment.with_reference(reference);
    }
    validate_payment(&payment)?;

    let settlement = state.ledger_mut().record_payment(payment)?.value;
    let amount = state.config().format_currency(settlement.payment.amount);
    info!(
        payment_id = %settlement.payment.id,
        invoice_id = %settlement.payment.invoice_id,
        effect = ?settlement.effect,
        "Payment recorded"
    );

    let number = find_invoice(state.ledger().ledger().store(), &settlement.payment.invoice_id)
        .map(|i| i.invoice_number.clone())
        .unwrap_or_else(|| settlement.payment.invoice_id.clone());

    let message = match settlement.effect {
        SettlementEffect::Settled => format!("Recorded {} against {}; invoice is now Paid", amount, number),
        SettlementEffect::AlreadyPaid => {
            format!("Recorded {} against {}; invoice was already Paid", amount, number)
        }
        SettlementEffect::InvoiceCancelled => {
            warn!(invoice = %number, "Payment logged against a cancelled invoice");
            format!("Recorded {} against {}; invoice is Cancelled and stays so", amount, number)
        }
        SettlementEffect::Orphaned => {
            warn!(invoice_id = %number, "Payment logged against an unknown invoice");
            format!("Recorded {} against unknown invoice {}", amount, number)
        }
    };
    Ok(message)
}

pub fn list(state: &LedgerState, invoice: Option<&str>, format: OutputFormat) -> CliResult<String> {
    debug!(?invoice, "payment list command");
    let store = state.ledger().ledger().store();

    let payments: Vec<&Payment> = match invoice {
        Some(key) => {
            let id = find_invoice(store, key).map_or(key, |i| i.id.as_str());
            payments_for(store.payments(), id)
        }
        None => store.payments().iter().collect(),
    };

    if format == OutputFormat::Json {
        return to_json(&payments);
    }

    if payments.is_empty() {
        return Ok("No payments".to_string());
    }

    let config = state.config();
    let mut out = format!(
        "{:<10} {:<22} {:<13} {:>18}  {}",
        "DATE", "INVOICE", "METHOD", "AMOUNT", "REFERENCE"
    );
    for p in payments {
        let number = store
            .invoice(&p.invoice_id)
            .map_or(p.invoice_id.as_str(), |i| i.invoice_number.as_str());
        out.push_str(&format!(
            "\n{:<10} {:<22} {:<13} {:>18}  {}",
            p.date.format("%Y-%m-%d").to_string(),
            number,
            format!("{:?}", p.method),
            config.format_currency(p.amount),
            p.reference.as_deref().unwrap_or("-")
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{client, invoice, testing};
    use crate::error::ErrorCode;
    use crate::state::FolioConfig;
    use folio_core::{InvoiceStatus, PaymentPolicy};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
    }

    fn pay(invoice: &str, amount: &str) -> RecordPayment {
        RecordPayment {
            invoice: invoice.to_string(),
            amount: amount.to_string(),
            date: date(),
            method: PaymentMethod::BankTransfer,
            reference: Some("UTR0000000001".to_string()),
        }
    }

    async fn with_invoice(state: &mut LedgerState, dir: &tempfile::TempDir) {
        let c = r#"{"id": "C15480001", "name": "Northwind Traders", "gstin": "29AAACN1234F1Z5"}"#;
        client::upsert(state, &testing::input_file(dir, "c.json", c), false).unwrap();
        let i = r#"{"clientId": "C15480001", "items": [{"hsnCode": "998311", "quantity": 1, "unitPrice": 100000}]}"#;
        invoice::create(state, &testing::input_file(dir, "i.json", i), None, date()).unwrap();
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500").unwrap().minor(), 50_000);
        assert_eq!(parse_amount("1,250.5").unwrap().minor(), 125_050);
        assert_eq!(parse_amount("12,34,567.89").unwrap().minor(), 123_456_789);
        assert_eq!(parse_amount(".75").unwrap().minor(), 75);
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("1.234").is_err());
        assert!(parse_amount("ten").is_err());
        assert!(parse_amount("99999999999999999999").is_err());
    }

    #[tokio::test]
    async fn test_first_payment_settles_second_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = testing::state().await;
        with_invoice(&mut state, &dir).await;

        let out = record(&mut state, pay("VED-BLR-2075060834", "500")).unwrap();
        assert_eq!(out, "Recorded ₹ 500.00 against VED-BLR-2075060834; invoice is now Paid");

        let out = record(&mut state, pay("VED-BLR-2075060834", "100")).unwrap();
        assert!(out.ends_with("invoice was already Paid"));

        let store = state.ledger().ledger().store();
        assert_eq!(store.invoices()[0].status, InvoiceStatus::Paid);
        assert_eq!(store.payments().len(), 2);

        let listed = list(&state, Some("VED-BLR-2075060834"), OutputFormat::Text).unwrap();
        assert_eq!(listed.lines().count(), 3);
        assert!(listed.contains("UTR0000000001"));
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_orphan_payment_lenient_vs_strict() {
        let mut state = testing::state().await;
        let out = record(&mut state, pay("ghost", "10")).unwrap();
        assert_eq!(out, "Recorded ₹ 10.00 against unknown invoice ghost");
        state.close().await.unwrap();

        let mut config = FolioConfig::default();
        config.ledger.payment_policy = PaymentPolicy::Strict;
        let mut state = testing::state_with(config).await;
        let err = record(&mut state, pay("ghost", "10")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(state.ledger().ledger().store().payments().is_empty());
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = testing::state().await;
        with_invoice(&mut state, &dir).await;

        let err = record(&mut state, pay("VED-BLR-2075060834", "0")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(state.ledger().ledger().store().invoices()[0].status, InvoiceStatus::Posted);
        state.close().await.unwrap();
    }
}
