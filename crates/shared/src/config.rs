//! Application configuration management.
//!
//! Sources, lowest to highest precedence: built-in defaults,
//! `config/default.*`, `config/{RUN_MODE}.*`, an explicit file passed by the
//! caller, and `CONCILIADOR__*` environment variables
//! (e.g. `CONCILIADOR__DATABASE__URL`).

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Payroll reconciliation policy.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    /// Journal proposal policy and chart of accounts.
    #[serde(default)]
    pub journal: JournalConfig,
    /// Locale settings.
    #[serde(default)]
    pub locale: LocaleConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Which payroll source is ground truth for a row's totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthoritativeSource {
    /// The payroll book detail (libro de remuneraciones) is ground truth.
    #[default]
    PayrollBook,
    /// A matched liquidation record is ground truth; unmatched rows fall back
    /// to the book.
    Liquidation,
}

/// Reconciliation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconciliationConfig {
    /// Ground-truth source for row totals.
    #[serde(default)]
    pub authoritative_source: AuthoritativeSource,
}

/// Where the settlement side of an RCV journal entry is booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    /// Accounts payable (purchases) / accounts receivable (sales).
    #[default]
    Account,
    /// Cash.
    Cash,
}

/// How settlement lines are grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineGrouping {
    /// One settlement line for the whole register.
    #[default]
    Consolidated,
    /// One settlement line per supplier or client.
    PerEntity,
}

/// A ledger account reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Account code in the company's chart of accounts.
    pub code: String,
    /// Account display name.
    pub name: String,
}

impl AccountRef {
    /// Creates an account reference.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Accounts the RCV journal proposal posts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOfAccounts {
    /// Purchases (expense).
    pub purchases: AccountRef,
    /// IVA crédito fiscal (asset).
    pub iva_credit: AccountRef,
    /// Suppliers / accounts payable (liability).
    pub payables: AccountRef,
    /// Sales (revenue).
    pub sales: AccountRef,
    /// IVA débito fiscal (liability).
    pub iva_debit: AccountRef,
    /// Clients / accounts receivable (asset).
    pub receivables: AccountRef,
    /// Cash (asset).
    pub cash: AccountRef,
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        Self {
            purchases: AccountRef::new("5.1.01.001", "Compras"),
            iva_credit: AccountRef::new("1.1.07.001", "IVA Crédito Fiscal"),
            payables: AccountRef::new("2.1.01.001", "Proveedores"),
            sales: AccountRef::new("4.1.01.001", "Ventas"),
            iva_debit: AccountRef::new("2.1.05.001", "IVA Débito Fiscal"),
            receivables: AccountRef::new("1.1.03.001", "Clientes"),
            cash: AccountRef::new("1.1.01.001", "Caja"),
        }
    }
}

/// Journal proposal configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalConfig {
    /// Settlement side booking.
    #[serde(default)]
    pub settlement: SettlementMode,
    /// Settlement line grouping.
    #[serde(default)]
    pub grouping: LineGrouping,
    /// Chart of accounts mapping.
    #[serde(default)]
    pub accounts: ChartOfAccounts,
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Timezone used to decide the "current" period.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// Currency journal entries are denominated in.
    #[serde(default)]
    pub currency: Currency,
}

fn default_timezone() -> Tz {
    chrono_tz::America::Santiago
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            currency: Currency::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(None, None)
    }

    /// Loads configuration, layering `extra_file` (if given, required) above the
    /// default files and below the environment. A `database_url` wins over
    /// every source.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or deserialized.
    pub fn load_with(
        extra_file: Option<&str>,
        database_url: Option<&str>,
    ) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("CONCILIADOR").separator("__"))
            .set_override_option("database.url", database_url)?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("CONCILIADOR__DATABASE__URL", Some("postgres://localhost/conciliador")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/conciliador");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.database.min_connections, 1);
                assert_eq!(
                    config.reconciliation.authoritative_source,
                    AuthoritativeSource::PayrollBook
                );
                assert_eq!(config.journal.settlement, SettlementMode::Account);
                assert_eq!(config.journal.grouping, LineGrouping::Consolidated);
                assert_eq!(config.journal.accounts, ChartOfAccounts::default());
                assert_eq!(config.locale.timezone, chrono_tz::America::Santiago);
                assert_eq!(config.locale.currency, Currency::Clp);
            },
        );
    }

    #[test]
    fn test_environment_overrides_policy() {
        temp_env::with_vars(
            [
                ("CONCILIADOR__DATABASE__URL", Some("postgres://localhost/conciliador")),
                (
                    "CONCILIADOR__RECONCILIATION__AUTHORITATIVE_SOURCE",
                    Some("liquidation"),
                ),
                ("CONCILIADOR__JOURNAL__SETTLEMENT", Some("cash")),
                ("CONCILIADOR__JOURNAL__GROUPING", Some("per_entity")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(
                    config.reconciliation.authoritative_source,
                    AuthoritativeSource::Liquidation
                );
                assert_eq!(config.journal.settlement, SettlementMode::Cash);
                assert_eq!(config.journal.grouping, LineGrouping::PerEntity);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("CONCILIADOR__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_database_url_override() {
        temp_env::with_vars(
            [
                ("CONCILIADOR__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config =
                    AppConfig::load_with(None, Some("postgres://override/conciliador")).unwrap();
                assert_eq!(config.database.url, "postgres://override/conciliador");
            },
        );
    }

    #[test]
    fn test_chart_defaults_deserialize_partially() {
        let chart: ChartOfAccounts =
            serde_json::from_str(r#"{"cash": {"code": "1.1.01.002", "name": "Banco"}}"#).unwrap();
        assert_eq!(chart.cash, AccountRef::new("1.1.01.002", "Banco"));
        assert_eq!(chart.sales, ChartOfAccounts::default().sales);
    }
}
