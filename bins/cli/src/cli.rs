//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use conciliador_shared::config::{AuthoritativeSource, LineGrouping, SettlementMode};
use conciliador_shared::types::Period;
use uuid::Uuid;

/// Payroll reconciliation and RCV journal centralization.
#[derive(Debug, Parser)]
#[command(name = "conciliador", version, about)]
pub struct Cli {
    /// Extra configuration file layered above `config/default`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `database.url` from the configuration.
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile the stored payroll book of a period against its liquidations.
    Reconcile {
        /// Company UUID.
        #[arg(long)]
        company: Uuid,
        /// Period as YYYY-MM. Defaults to the current month.
        #[arg(long, value_parser = parse_period)]
        period: Option<Period>,
        /// Ground-truth source for row totals.
        #[arg(long, value_enum)]
        authority: Option<AuthorityArg>,
    },

    /// Generate and store the payroll book of a period from its liquidations.
    GenerateBook {
        /// Company UUID.
        #[arg(long)]
        company: Uuid,
        /// Period as YYYY-MM. Defaults to the current month.
        #[arg(long, value_parser = parse_period)]
        period: Option<Period>,
    },

    /// Propose a centralization entry from an RCV summary (JSON file).
    ProposeJournal {
        /// Company UUID.
        #[arg(long)]
        company: Uuid,
        /// RCV summary JSON file.
        #[arg(long)]
        rcv: PathBuf,
        /// Accounting period as YYYY-MM. Defaults to the summary's period.
        #[arg(long, value_parser = parse_period)]
        period: Option<Period>,
        /// Where the settlement side is booked.
        #[arg(long, value_enum)]
        settlement: Option<SettlementArg>,
        /// How settlement lines are grouped.
        #[arg(long, value_enum)]
        grouping: Option<GroupingArg>,
        /// Ledger UUID to file the entry under.
        #[arg(long)]
        ledger: Option<Uuid>,
    },

    /// Post a balanced entry (or a proposal) read from a JSON file.
    PostJournal {
        /// Company UUID.
        #[arg(long)]
        company: Uuid,
        /// Entry or proposal JSON file.
        #[arg(long)]
        entry: PathBuf,
    },
}

/// `--authority` values.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AuthorityArg {
    /// The payroll book row is ground truth.
    PayrollBook,
    /// A matched liquidation is ground truth.
    Liquidation,
}

impl From<AuthorityArg> for AuthoritativeSource {
    fn from(arg: AuthorityArg) -> Self {
        match arg {
            AuthorityArg::PayrollBook => Self::PayrollBook,
            AuthorityArg::Liquidation => Self::Liquidation,
        }
    }
}

/// `--settlement` values.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SettlementArg {
    /// Payables for purchases, receivables for sales.
    Account,
    /// Cash.
    Cash,
}

impl From<SettlementArg> for SettlementMode {
    fn from(arg: SettlementArg) -> Self {
        match arg {
            SettlementArg::Account => Self::Account,
            SettlementArg::Cash => Self::Cash,
        }
    }
}

/// `--grouping` values.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupingArg {
    /// One settlement line.
    Consolidated,
    /// One settlement line per counterparty.
    PerEntity,
}

impl From<GroupingArg> for LineGrouping {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::Consolidated => Self::Consolidated,
            GroupingArg::PerEntity => Self::PerEntity,
        }
    }
}

fn parse_period(input: &str) -> Result<Period, String> {
    Period::parse(input).map_err(|e| e.to_string())
}
