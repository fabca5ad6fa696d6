//! Subcommand handlers.

use std::path::Path;

use anyhow::Context;
use conciliador_core::journal::{
    JournalBalancer, JournalEntry, JournalEntryDraft, JournalError, JournalOptions, JournalPoster,
    RcvSummary,
};
use conciliador_core::payroll::{ReconciliationResolver, ReconciliationService};
use conciliador_db::SeaRecordStore;
use conciliador_shared::types::{CompanyId, LedgerId, Period};
use conciliador_shared::{AppConfig, AppError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cli::{Cli, Command};

/// A file accepted by `post-journal`: either the output of
/// `propose-journal` or a bare entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntryFile {
    Proposal { entry: JournalEntryDraft },
    Entry(JournalEntryDraft),
}

/// Runs the selected subcommand.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Reconcile {
            company,
            period,
            authority,
        } => {
            let store = open_store(&config).await?;
            let authority = authority.map_or(config.reconciliation.authoritative_source, Into::into);
            let period = period.unwrap_or_else(|| Period::current(config.locale.timezone));
            let service = ReconciliationService::new(&store, ReconciliationResolver::new(authority));

            let report = service
                .reconcile(CompanyId::from_uuid(company), period)
                .await
                .map_err(AppError::from)?;
            print_json(&report)
        }
        Command::GenerateBook { company, period } => {
            let store = open_store(&config).await?;
            let period = period.unwrap_or_else(|| Period::current(config.locale.timezone));
            let service = ReconciliationService::new(
                &store,
                ReconciliationResolver::new(config.reconciliation.authoritative_source),
            );

            let book = service
                .generate_book(CompanyId::from_uuid(company), period)
                .await
                .map_err(AppError::from)?;
            print_json(&book)
        }
        Command::ProposeJournal {
            company,
            rcv,
            period,
            settlement,
            grouping,
            ledger,
        } => {
            let summary: RcvSummary = read_json(&rcv)?;
            let mut options = JournalOptions::from_config(&config.journal, config.locale.currency);
            if let Some(settlement) = settlement {
                options.settlement = settlement.into();
            }
            if let Some(grouping) = grouping {
                options.grouping = grouping.into();
            }
            options.ledger_id = ledger.map(LedgerId::from_uuid);

            let period = period.unwrap_or(summary.period);
            let proposal =
                JournalBalancer::propose(CompanyId::from_uuid(company), &summary, period, &options)
                    .map_err(AppError::from)?;
            if !proposal.is_balanced() {
                warn!(
                    total_debit = %proposal.entry.total_debit(),
                    total_credit = %proposal.entry.total_credit(),
                    "Proposed entry is not balanced and cannot be posted"
                );
            }
            print_json(&proposal)
        }
        Command::PostJournal { company, entry } => {
            let store = open_store(&config).await?;
            let entry = parse_entry_file(&read_to_string(&entry)?)?;

            match JournalPoster::post(&store, CompanyId::from_uuid(company), entry).await {
                Ok(posted) => print_json(&posted),
                Err(JournalError::UnbalancedEntry {
                    debit,
                    credit,
                    entry,
                }) => {
                    print_json(&entry)?;
                    Err(AppError::BusinessRule(format!(
                        "Journal entry is not balanced. Debit: {debit}, Credit: {credit}"
                    ))
                    .into())
                }
                Err(err) => Err(AppError::from(err).into()),
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, AppError> {
    let extra = cli.config.as_deref().and_then(Path::to_str);
    AppConfig::load_with(extra, cli.database_url.as_deref())
        .map_err(|e| AppError::Configuration(e.to_string()))
}

async fn open_store(config: &AppConfig) -> Result<SeaRecordStore, AppError> {
    let db = conciliador_db::connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Connected to database");
    Ok(SeaRecordStore::new(db))
}

fn read_to_string(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = read_to_string(path)?;
    let value = serde_json::from_str(&raw)
        .map_err(|e| AppError::Validation(format!("{}: {e}", path.display())))?;
    Ok(value)
}

/// Parses a proposal or bare entry into a preliminary [`JournalEntry`].
fn parse_entry_file(raw: &str) -> Result<JournalEntry, AppError> {
    let file: EntryFile =
        serde_json::from_str(raw).map_err(|e| AppError::Validation(e.to_string()))?;
    let draft = match file {
        EntryFile::Proposal { entry } | EntryFile::Entry(entry) => entry,
    };
    Ok(JournalEntry::from_draft(draft)?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use conciliador_core::journal::{RcvRegister, RcvTotals};
    use conciliador_shared::config::JournalConfig;
    use conciliador_shared::types::Currency;
    use rust_decimal_macros::dec;

    fn proposal_json() -> String {
        let summary = RcvSummary {
            register: RcvRegister::Purchases,
            period: Period::new(2024, 3).unwrap(),
            totals: RcvTotals {
                document_count: 12,
                exempt_amount: dec!(0),
                net_amount: dec!(1000000),
                iva_amount: dec!(190000),
                total_amount: dec!(1190000),
                calculated_amount: dec!(1190000),
            },
            entities: Vec::new(),
        };
        let options = JournalOptions::from_config(&JournalConfig::default(), Currency::Clp);
        let proposal =
            JournalBalancer::propose(CompanyId::new(), &summary, summary.period, &options)
                .unwrap();
        serde_json::to_string(&proposal).unwrap()
    }

    #[test]
    fn test_parse_proposal_file() {
        let entry = parse_entry_file(&proposal_json()).unwrap();
        assert_eq!(entry.lines().len(), 3);
        assert!(entry.is_balanced());
        assert!(!entry.is_posted());
    }

    #[test]
    fn test_parse_bare_entry_file() {
        let raw = proposal_json();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let bare = value["entry"].to_string();

        let entry = parse_entry_file(&bare).unwrap();
        assert_eq!(entry.total_debit(), entry.total_credit());
    }

    #[test]
    fn test_parse_garbage_is_validation_error() {
        let err = parse_entry_file("{\"lines\": 3}").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
