//! # Folio Command-Line Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            folio (binary)                               │
//! │                                                                         │
//! │  main.rs ────► parses arguments, hands off to folio_cli::run            │
//! │                                                                         │
//! │  lib.rs ─────► tracing, config, database, ledger, dispatch              │
//! │                                                                         │
//! │  commands/ ──► invoice, payment, client, branch, session, report        │
//! │                                                                         │
//! │  state/ ─────► FolioConfig, AppState                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//! - `0`: the intent was applied (or the query printed)
//! - `1`: the intent was rejected; the error code and message go to stderr

use std::process::ExitCode;

use clap::Parser;
use folio_cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match folio_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
