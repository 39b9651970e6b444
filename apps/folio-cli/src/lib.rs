//! # Folio CLI Library
//!
//! Argument definitions, startup and command dispatch.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Startup                                    │
//! │                                                                         │
//! │  1. init_tracing()          RUST_LOG or info,folio=debug,sqlx=warn      │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  2. FolioConfig::load()     defaults → folio.toml → FOLIO_* env         │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  3. database_path()         --db → config/FOLIO_DB_PATH → data dir      │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  4. LedgerState::open()     migrations, rehydrate, start writer         │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  5. dispatch()              one intent or query                         │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  6. LedgerState::close()    drain writer, close pool                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state is closed even when the command fails, so every intent that
//! was applied before the failure is persisted.

pub mod commands;
pub mod error;
pub mod state;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use folio_core::{InvoiceStatus, PaymentMethod};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::payment::RecordPayment;
use commands::OutputFormat;
use error::{CliError, CliResult};
use state::{FolioConfig, LedgerState};

// =============================================================================
// Arguments
// =============================================================================

/// Invoicing ledger: branches, clients, invoices and payments.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
pub struct Cli {
    /// Config file (default: platform config dir / folio.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database file (overrides config and FOLIO_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print query results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mark the session as signed in
    Login,
    /// Clear the signed-in flag
    Logout,
    /// Branch master data
    #[command(subcommand)]
    Branch(BranchCommand),
    /// Client master data
    #[command(subcommand)]
    Client(ClientCommand),
    /// Invoice lifecycle
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// Payment log
    #[command(subcommand)]
    Payment(PaymentCommand),
    /// Counts and totals by status
    Summary,
    /// Export all collections to one JSON file
    Backup {
        /// Target directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum BranchCommand {
    List,
    /// Add or replace a branch from a JSON file
    Upsert {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    List {
        /// Filter by name or GSTIN
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Add or replace a client from a JSON file
    Upsert {
        #[arg(long)]
        file: PathBuf,
        /// Copy the billing address into the shipping address
        #[arg(long)]
        same_as_billing: bool,
    },
    Remove {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    List {
        /// Filter by invoice number or client name
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Show an invoice by id or number
    Show {
        invoice: String,
    },
    /// Create and post an invoice from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
        /// Issuing branch (default: the first branch)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Replace the editable fields of a Draft or Posted invoice
    Edit {
        invoice: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Cancel an invoice
    Revoke {
        invoice: String,
        /// Confirm the cancellation
        #[arg(long)]
        yes: bool,
    },
    /// Print the message to send with the invoice
    Share {
        invoice: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    List {
        /// Only payments against this invoice (id or number)
        #[arg(long)]
        invoice: Option<String>,
    },
    Record(RecordArgs),
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Invoice id or number
    pub invoice: String,
    /// Amount in major units, e.g. 5900 or 1,250.50
    #[arg(long)]
    pub amount: String,
    /// Payment date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = MethodArg::BankTransfer)]
    pub method: MethodArg,
    /// Bank reference, UTR or cheque number
    #[arg(long)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Draft,
    Posted,
    Paid,
    Cancelled,
}

impl From<StatusArg> for InvoiceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => InvoiceStatus::Draft,
            StatusArg::Posted => InvoiceStatus::Posted,
            StatusArg::Paid => InvoiceStatus::Paid,
            StatusArg::Cancelled => InvoiceStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    BankTransfer,
    Upi,
    Cheque,
    Cash,
    Card,
}

impl From<MethodArg> for PaymentMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::BankTransfer => PaymentMethod::BankTransfer,
            MethodArg::Upi => PaymentMethod::Upi,
            MethodArg::Cheque => PaymentMethod::Cheque,
            MethodArg::Cash => PaymentMethod::Cash,
            MethodArg::Card => PaymentMethod::Card,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Runs one CLI invocation.
pub async fn run(cli: Cli) -> CliResult<()> {
    init_tracing();

    let config = FolioConfig::load(cli.config.as_deref())?;
    let path = database_path(cli.db.as_deref(), &config)?;
    info!(db = %path.display(), policy = ?config.ledger.payment_policy, "Starting folio");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut state = LedgerState::open(config, &path).await?;
    let result = dispatch(&mut state, cli.command, format, Local::now().date_naive());
    let stats = state.close().await?;
    debug!(written = stats.written, failed = stats.failed, "Writer drained");

    println!("{}", result?);
    Ok(())
}

/// Applies one command to an open ledger and returns the text to print.
pub fn dispatch(
    state: &mut LedgerState,
    command: Command,
    format: OutputFormat,
    today: NaiveDate,
) -> CliResult<String> {
    match command {
        Command::Login => Ok(commands::session::login(state)),
        Command::Logout => Ok(commands::session::logout(state)),

        Command::Branch(BranchCommand::List) => commands::branch::list(state, format),
        Command::Branch(BranchCommand::Upsert { file }) => commands::branch::upsert(state, &file),

        Command::Client(ClientCommand::List { query }) => {
            commands::client::list(state, query.as_deref(), format)
        }
        Command::Client(ClientCommand::Upsert {
            file,
            same_as_billing,
        }) => commands::client::upsert(state, &file, same_as_billing),
        Command::Client(ClientCommand::Remove { id }) => commands::client::remove(state, &id),

        Command::Invoice(InvoiceCommand::List { query, status }) => {
            commands::invoice::list(state, query.as_deref(), status.map(Into::into), format)
        }
        Command::Invoice(InvoiceCommand::Show { invoice }) => {
            commands::invoice::show(state, &invoice, format)
        }
        Command::Invoice(InvoiceCommand::Create { file, branch }) => {
            commands::invoice::create(state, &file, branch.as_deref(), today)
        }
        Command::Invoice(InvoiceCommand::Edit { invoice, file }) => {
            commands::invoice::edit(state, &invoice, &file)
        }
        Command::Invoice(InvoiceCommand::Revoke { invoice, yes }) => {
            commands::invoice::revoke(state, &invoice, yes)
        }
        Command::Invoice(InvoiceCommand::Share { invoice }) => {
            commands::invoice::share(state, &invoice)
        }

        Command::Payment(PaymentCommand::List { invoice }) => {
            commands::payment::list(state, invoice.as_deref(), format)
        }
        Command::Payment(PaymentCommand::Record(args)) => commands::payment::record(
            state,
            RecordPayment {
                invoice: args.invoice,
                amount: args.amount,
                date: args.date.unwrap_or(today),
                method: args.method.into(),
                reference: args.reference,
            },
        ),

        Command::Summary => commands::report::summary(state, format),
        Command::Backup { dir } => commands::report::backup(state, &dir, today)
            .map(|path| format!("Backup written to {}", path.display())),
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so command output on stdout stays pipeable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=folio=trace` - Show trace for folio crates only
/// - Default: INFO, DEBUG for folio crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio=debug,sqlx=warn"));

    // A second init (tests driving `run`) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Determines the database file path.
///
/// ## Resolution Order
/// 1. `--db` flag
/// 2. `ledger.database_path` in the config (or `FOLIO_DB_PATH`)
/// 3. Platform data directory:
///    - **macOS**: `~/Library/Application Support/com.folio.ledger/folio.db`
///    - **Windows**: `%APPDATA%\folio\ledger\data\folio.db`
///    - **Linux**: `~/.local/share/ledger/folio.db`
fn database_path(flag: Option<&Path>, config: &FolioConfig) -> CliResult<PathBuf> {
    let path = match flag.or(config.ledger.database_path.as_deref()) {
        Some(path) => path.to_path_buf(),
        None => {
            let proj_dirs = ProjectDirs::from("com", "folio", "ledger")
                .ok_or_else(|| CliError::config("Could not determine app data directory"))?;
            proj_dirs.data_dir().join("folio.db")
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_payment_record() {
        let cli = Cli::try_parse_from([
            "folio",
            "payment",
            "record",
            "VED-BLR-2075060834",
            "--amount",
            "5,900",
            "--method",
            "upi",
            "--date",
            "2025-06-20",
        ])
        .unwrap();

        match cli.command {
            Command::Payment(PaymentCommand::Record(args)) => {
                assert_eq!(args.invoice, "VED-BLR-2075060834");
                assert_eq!(args.method, MethodArg::Upi);
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 6, 20));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "invoice", "list", "--status", "paid", "--json"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Invoice(InvoiceCommand::List {
                status: Some(StatusArg::Paid),
                ..
            })
        ));
    }

    #[test]
    fn test_database_path_prefers_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FolioConfig::default();
        config.ledger.database_path = Some(dir.path().join("from-config.db"));

        let flag = dir.path().join("nested").join("flag.db");
        assert_eq!(database_path(Some(&flag), &config).unwrap(), flag);
        assert!(dir.path().join("nested").is_dir());

        assert_eq!(
            database_path(None, &config).unwrap(),
            dir.path().join("from-config.db")
        );
    }

    #[tokio::test]
    async fn test_state_survives_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.db");
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let mut state = LedgerState::open(FolioConfig::default(), &path).await.unwrap();
        dispatch(&mut state, Command::Login, OutputFormat::Text, today).unwrap();
        state.close().await.unwrap();

        let mut state = LedgerState::open(FolioConfig::default(), &path).await.unwrap();
        assert!(state.ledger().ledger().store().is_authenticated());
        let out = dispatch(&mut state, Command::Summary, OutputFormat::Text, today).unwrap();
        assert!(out.starts_with("Invoices:    0"));
        state.close().await.unwrap();
    }
}
