//! # Report Commands
//!
//! Ledger summary and the one-way JSON backup export.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use folio_core::backup::{backup_file_name, BackupSnapshot};
use folio_core::query::LedgerSummary;
use tracing::{debug, info};

use super::{to_json, OutputFormat};
use crate::error::CliResult;
use crate::state::LedgerState;

pub fn summary(state: &LedgerState, format: OutputFormat) -> CliResult<String> {
    debug!("summary command");
    let summary = LedgerSummary::compute(state.ledger().ledger().store());

    if format == OutputFormat::Json {
        return to_json(&summary);
    }

    let config = state.config();
    Ok(format!(
        "Invoices:    {} ({} draft, {} posted, {} paid, {} cancelled)\n\
         Billed:      {}\n\
         Outstanding: {}\n\
         Collected:   {}",
        summary.total(),
        summary.draft,
        summary.posted,
        summary.paid,
        summary.cancelled,
        config.format_currency(summary.billed),
        config.format_currency(summary.outstanding),
        config.format_currency(summary.collected),
    ))
}

/// Writes `<prefix>_<date>.json` into `dir` and returns its path.
///
/// An existing file of the same name is overwritten.
pub fn backup(state: &LedgerState, dir: &Path, date: NaiveDate) -> CliResult<PathBuf> {
    debug!(dir = %dir.display(), "backup command");
    let snapshot = BackupSnapshot::capture(state.ledger().ledger().store());

    std::fs::create_dir_all(dir)?;
    let path = dir.join(backup_file_name(&state.config().ledger.backup_prefix, date));
    std::fs::write(&path, snapshot.to_pretty_json()?)?;

    info!(
        path = %path.display(),
        invoices = snapshot.invoices.len(),
        payments = snapshot.payments.len(),
        "Backup written"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::state::FolioConfig;

    #[tokio::test]
    async fn test_summary_of_fresh_ledger() {
        let state = testing::state().await;
        let out = summary(&state, OutputFormat::Text).unwrap();
        assert!(out.starts_with("Invoices:    0 (0 draft, 0 posted, 0 paid, 0 cancelled)"));
        assert!(out.contains("Collected:   ₹ 0.00"));

        let json: serde_json::Value =
            serde_json::from_str(&summary(&state, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["posted"], 0);
        state.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_backup_writes_all_collections() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FolioConfig::default();
        config.ledger.backup_prefix = "ACME_BACKUP".to_string();
        let state = testing::state_with(config).await;

        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let path = backup(&state, &dir.path().join("backups"), date).unwrap();
        assert_eq!(path.file_name().unwrap(), "ACME_BACKUP_2025-07-04.json");

        let snapshot: BackupSnapshot =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(snapshot.branches.len(), 1);
        assert!(snapshot.invoices.is_empty());
        assert!(snapshot.clients.is_empty());
        assert!(snapshot.payments.is_empty());
        state.close().await.unwrap();
    }
}
