//! # Branch Commands

use std::path::Path;

use folio_core::validation::validate_branch;
use folio_core::Branch;
use tracing::{debug, info};

use super::{read_json, to_json, OutputFormat};
use crate::error::CliResult;
use crate::state::LedgerState;

pub fn list(state: &LedgerState, format: OutputFormat) -> CliResult<String> {
    debug!("branch list command");
    let branches = state.ledger().ledger().store().branches();

    if format == OutputFormat::Json {
        return to_json(branches);
    }

    if branches.is_empty() {
        return Ok("No branches".to_string());
    }

    let mut out = format!(
        "{:<8} {:<40} {:<12} {:>12} {}",
        "ID", "NAME", "PREFIX", "NEXT NO.", "GSTIN"
    );
    for b in branches {
        out.push_str(&format!(
            "\n{:<8} {:<40} {:<12} {:>12} {}",
            b.id, b.name, b.invoice_prefix, b.next_invoice_number, b.gstin
        ));
    }
    Ok(out)
}

/// Adds a branch or replaces an existing one by id.
///
/// An existing branch keeps its stored counter whatever the file says.
pub fn upsert(state: &mut LedgerState, file: &Path) -> CliResult<String> {
    let branch: Branch = read_json(file)?;
    debug!(branch_id = %branch.id, "branch upsert command");
    validate_branch(&branch)?;

    let existed = state.ledger().ledger().store().branch(&branch.id).is_some();
    let saved = state.ledger_mut().upsert_branch(branch).value;
    info!(branch_id = %saved.id, existed, "Branch saved");

    Ok(format!(
        "{} branch {} ({}), next invoice {}{}",
        if existed { "Updated" } else { "Added" },
        saved.id,
        saved.name,
        saved.invoice_prefix,
        saved.next_invoice_number
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::error::ErrorCode;
    use folio_core::defaults::default_branches;

    #[tokio::test]
    async fn test_list_shows_default_branch() {
        let state = testing::state().await;
        let out = list(&state, OutputFormat::Text).unwrap();
        assert!(out.contains("B001"));
        assert!(out.contains("VED-BLR-"));
        assert!(out.contains("2075060834"));
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_upsert_keeps_counter() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = testing::state().await;

        let mut branch = default_branches().remove(0);
        branch.name = "Vedartha International - Bengaluru".to_string();
        branch.next_invoice_number = 1;
        let file = testing::input_file(&dir, "b.json", &serde_json::to_string(&branch).unwrap());

        let out = upsert(&mut state, &file).unwrap();
        assert!(out.starts_with("Updated branch B001"));

        let stored = state.ledger().ledger().store().branch("B001").unwrap();
        assert_eq!(stored.name, "Vedartha International - Bengaluru");
        assert_eq!(stored.next_invoice_number, 2_075_060_834);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_upsert_rejects_bad_gstin() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = testing::state().await;

        let mut branch = default_branches().remove(0);
        branch.id = "B002".to_string();
        branch.gstin = "NOT-A-GSTIN".to_string();
        let file = testing::input_file(&dir, "b.json", &serde_json::to_string(&branch).unwrap());

        let err = upsert(&mut state, &file).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(state.ledger().ledger().store().branch("B002").is_none());
        state.close().await.unwrap();
    }
}
