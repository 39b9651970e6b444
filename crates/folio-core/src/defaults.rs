//! Default data set used when nothing has been persisted yet.

use crate::types::{Address, Branch, TaxRate};

/// Id of the branch present on first start.
pub const DEFAULT_BRANCH_ID: &str = "B001";

/// HSN/SAC service codes offered for line items, with their descriptions.
pub const HSN_MASTER: &[(&str, &str)] = &[
    ("998311", "MANAGEMENT CONSULTING AND MANAGEMENT SERVICES"),
    ("998312", "BUSINESS CONSULTING SERVICES"),
    ("998313", "STRATEGIC MANAGEMENT SERVICES"),
    ("998314", "FINANCIAL MANAGEMENT CONSULTING"),
    ("998713", "IT INFRASTRUCTURE MANAGEMENT"),
    ("998319", "OTHER MANAGEMENT CONSULTANCY"),
];

/// Looks up the description of an HSN/SAC code.
pub fn hsn_description(code: &str) -> Option<&'static str> {
    HSN_MASTER
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| *description)
}

/// The branches seeded on first start.
pub fn default_branches() -> Vec<Branch> {
    vec![Branch {
        id: DEFAULT_BRANCH_ID.to_string(),
        name: "Vedartha International - Bengaluru HQ".to_string(),
        address: Address {
            line1: "13th to 22nd Floor, Ward no.77".to_string(),
            line2: Some("Prestige Trade Tower, Municipal No.46, Palace Road".to_string()),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            country: "India".to_string(),
        },
        contact: "+91 80 61886000".to_string(),
        email: "info@vedartha.com".to_string(),
        gstin: "29AALFD7157J1ZV".to_string(),
        pan: "AALFD7157J".to_string(),
        default_tax_rate: TaxRate::from_percent(18),
        invoice_prefix: "VED-BLR-".to_string(),
        next_invoice_number: 2_075_060_834,
    }]
}
