//! # Application Configuration
//!
//! Configuration loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FOLIO_COMPANY_NAME="Acme Consulting"                               │
//! │     FOLIO_PAYMENT_POLICY=strict                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/folio-ledger/folio.toml (Linux)                          │
//! │     ~/Library/Application Support/com.folio.ledger/folio.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     INR, lenient payments, FOLIO_BACKUP prefix                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [company]
//! name = "Vedartha International Limited"
//! currency_code = "INR"
//! currency_symbol = "₹"
//!
//! [bank]
//! bank_name = "RBL BANK LTD"
//! account_number = "409000032439"
//! ifsc_code = "RATN0000088"
//!
//! [ledger]
//! payment_policy = "lenient"   # lenient | strict
//! backup_prefix = "FOLIO_BACKUP"
//! database_path = "/srv/folio/folio.db"
//! ```

use std::path::{Path, PathBuf};

use folio_core::backup::DEFAULT_BACKUP_PREFIX;
use folio_core::{Money, PaymentPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

// =============================================================================
// Company
// =============================================================================

/// The issuing organization, as printed on shared invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_company_name")]
    pub name: String,

    /// Currency code (ISO 4217)
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Currency symbol (for display)
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_company_name() -> String {
    "Vedartha International Limited".to_string()
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for CompanyConfig {
    fn default() -> Self {
        CompanyConfig {
            name: default_company_name(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Bank
// =============================================================================

/// Remittance details shown alongside an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    pub bank_name: String,
    pub address: String,
    pub account_number: String,
    pub ifsc_code: String,
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig {
            bank_name: "RBL BANK LTD".to_string(),
            address: "Tower 2, 3rd Floor, One Indiabulls Centre, Senapati Bapat Marg, \
                      Lower Parel, Mumbai - 400 013."
                .to_string(),
            account_number: "409000032439".to_string(),
            ifsc_code: "RATN0000088".to_string(),
        }
    }
}

// =============================================================================
// Ledger Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// How payments against missing or terminal invoices are treated.
    #[serde(default)]
    pub payment_policy: PaymentPolicy,

    /// File name prefix for `folio backup`.
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,

    /// Database file. Falls back to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

fn default_backup_prefix() -> String {
    DEFAULT_BACKUP_PREFIX.to_string()
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            payment_policy: PaymentPolicy::default(),
            backup_prefix: default_backup_prefix(),
            database_path: None,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub company: CompanyConfig,

    #[serde(default)]
    pub bank: BankConfig,

    #[serde(default)]
    pub ledger: LedgerSettings,
}

impl FolioConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform config dir)
    /// 3. Environment variables
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(CliError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.company.name.trim().is_empty() {
            return Err(CliError::config("company.name must not be empty"));
        }

        if self.company.currency_code.len() != 3 {
            return Err(CliError::config(format!(
                "company.currency_code must be a 3-letter ISO code, got: {}",
                self.company.currency_code
            )));
        }

        // The prefix ends up in a file name
        let prefix = &self.ledger.backup_prefix;
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(CliError::config(format!(
                "ledger.backup_prefix is not a valid file name prefix: '{}'",
                prefix
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("FOLIO_COMPANY_NAME") {
            debug!(company = %name, "Overriding company name from environment");
            self.company.name = name;
        }

        if let Ok(code) = std::env::var("FOLIO_CURRENCY_CODE") {
            self.company.currency_code = code;
        }

        if let Ok(symbol) = std::env::var("FOLIO_CURRENCY_SYMBOL") {
            self.company.currency_symbol = symbol;
        }

        if let Ok(policy) = std::env::var("FOLIO_PAYMENT_POLICY") {
            match parse_policy(&policy) {
                Some(parsed) => {
                    debug!(policy = %policy, "Overriding payment policy from environment");
                    self.ledger.payment_policy = parsed;
                }
                None => warn!(policy = %policy, "Unknown payment policy in environment"),
            }
        }

        if let Ok(prefix) = std::env::var("FOLIO_BACKUP_PREFIX") {
            self.ledger.backup_prefix = prefix;
        }

        if let Ok(path) = std::env::var("FOLIO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.ledger.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "folio", "ledger")
            .map(|dirs| dirs.config_dir().join("folio.toml"))
    }

    /// Formats an amount with the currency symbol and Indian digit grouping.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = FolioConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(123_456)), "₹ 1,234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", self.company.currency_symbol, amount.to_indian_grouping())
    }
}

fn parse_policy(s: &str) -> Option<PaymentPolicy> {
    match s.to_lowercase().as_str() {
        "lenient" => Some(PaymentPolicy::Lenient),
        "strict" => Some(PaymentPolicy::Strict),
        _ => None,
    }
}
