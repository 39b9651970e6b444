//! # Seed Data Generator
//!
//! Populates a ledger database with demo clients, invoices and payments.
//!
//! ## Usage
//! ```bash
//! # 40 invoices (default)
//! cargo run -p folio-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p folio-db --bin seed -- --count 200 --db ./data/folio.db
//! ```
//!
//! ## Generated Data
//! - One client per entry in `CLIENTS`, billable from the default branch
//! - `count` invoices spread over those clients, one to three lines each
//! - Every third invoice paid, every seventh revoked

use std::env;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use folio_core::defaults::{DEFAULT_BRANCH_ID, HSN_MASTER};
use folio_core::{
    Address, Client, InvoiceFields, LineItem, Money, Payment, PaymentMethod, PaymentPolicy,
    TaxRate,
};
use folio_db::{Database, DbConfig, PersistentLedger};

/// Demo clients: (name, GSTIN, city, state, pincode)
const CLIENTS: &[(&str, &str, &str, &str, &str)] = &[
    ("Northwind Traders", "29AAACN1234F1Z5", "Bengaluru", "Karnataka", "560025"),
    ("Globex Industries", "27AAACG5678K1Z2", "Mumbai", "Maharashtra", "400013"),
    ("Initech Software", "33AAACI9012L1Z8", "Chennai", "Tamil Nadu", "600002"),
    ("Umbrella Pharma", "36AAACU3456M1Z1", "Hyderabad", "Telangana", "500081"),
    ("Stark Components", "07AAACS7890N1Z4", "New Delhi", "Delhi", "110001"),
];

/// Line unit prices in paise
const RATES: &[i64] = &[2_500_000, 7_500_000, 15_000_000, 45_000_000];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./folio_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Folio Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of invoices to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./folio_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Folio Ledger Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Invoices: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");

    let mut ledger = PersistentLedger::open(Arc::new(db.documents()), PaymentPolicy::Lenient).await;

    if !ledger.ledger().store().invoices().is_empty() {
        println!(
            "⚠ Ledger already has {} invoices",
            ledger.ledger().store().invoices().len()
        );
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        ledger.close().await?;
        return Ok(());
    }

    let clients: Vec<Client> = CLIENTS
        .iter()
        .enumerate()
        .map(|(idx, entry)| demo_client(idx, entry))
        .collect();
    for client in &clients {
        ledger.upsert_client(client.clone());
    }
    println!("✓ Added {} clients", clients.len());

    let start_date = NaiveDate::from_ymd_opt(2025, 4, 1).ok_or("invalid start date")?;
    let mut paid = 0;
    let mut revoked = 0;

    for n in 0..count {
        let client = &clients[n % clients.len()];
        let date = start_date + Duration::days((n * 3) as i64);

        let invoice = ledger
            .create_invoice(demo_fields(n, client, date), DEFAULT_BRANCH_ID)?
            .value;

        if n % 7 == 6 {
            ledger.revoke_invoice(&invoice.id)?;
            revoked += 1;
        } else if n % 3 == 2 {
            let payment = Payment::new(
                &invoice.id,
                invoice.grand_total,
                date + Duration::days(15),
                PaymentMethod::BankTransfer,
            )
            .with_reference(format!("UTR{:010}", n));
            ledger.record_payment(payment)?;
            paid += 1;
        }
    }

    let stats = ledger.close().await?;
    db.close().await;

    println!();
    println!("✓ Generated {} invoices ({} paid, {} revoked)", count, paid, revoked);
    println!("  Writes: {} ok, {} failed", stats.written, stats.failed);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn demo_client(idx: usize, entry: &(&str, &str, &str, &str, &str)) -> Client {
    let (name, gstin, city, state, pincode) = *entry;
    let mut client = Client::new(name, gstin, [DEFAULT_BRANCH_ID.to_string()]);
    client.id = format!("C1548{:04}", idx + 1);
    client.contact_person = "Accounts Payable".to_string();
    client.email = format!("ap@{}.example", name.split(' ').next().unwrap_or("client").to_lowercase());
    client.billing_address = Address {
        line1: format!("{} Business Park", idx + 1),
        line2: None,
        city: city.to_string(),
        state: state.to_string(),
        pincode: pincode.to_string(),
        country: "India".to_string(),
    };
    client.ship_to_billing_address();
    client
}

fn demo_fields(n: usize, client: &Client, date: NaiveDate) -> InvoiceFields {
    let lines = n % 3 + 1;
    let items = (0..lines)
        .map(|line| {
            let (code, description) = HSN_MASTER[(n + line) % HSN_MASTER.len()];
            LineItem {
                description: description.to_string(),
                hsn_code: code.to_string(),
                quantity: (line + 1) as i64,
                unit_price: Money::from_minor(RATES[(n + line) % RATES.len()]),
                tax_rate: TaxRate::from_percent(18),
            }
        })
        .collect();

    InvoiceFields {
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        date,
        items,
        notes: None,
    }
}
