//! RCV journal proposals.
//!
//! Turns an aggregated purchases or sales register into a preliminary
//! double-entry journal entry. Balance is computed from the lines, never
//! assumed: a summary whose exempt/net/IVA decomposition does not add up to
//! the declared total yields an unbalanced entry that posting will refuse.

use conciliador_shared::config::{
    AccountRef, ChartOfAccounts, JournalConfig, LineGrouping, SettlementMode,
};
use conciliador_shared::types::{CompanyId, Currency, LedgerId, Period};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::JournalError;
use super::rcv::{RcvRegister, RcvSummary};
use super::types::{EntryType, JournalEntry, JournalLine};

/// How a proposal is laid out.
#[derive(Debug, Clone, Default)]
pub struct JournalOptions {
    /// Account mapping.
    pub accounts: ChartOfAccounts,
    /// Book the settlement side to payables/receivables or to cash.
    pub settlement: SettlementMode,
    /// One settlement line, or one per counterparty.
    pub grouping: LineGrouping,
    /// Entry currency.
    pub currency: Currency,
    /// Existing ledger to file the entry under.
    pub ledger_id: Option<LedgerId>,
    /// Overrides the generated description.
    pub description: Option<String>,
}

impl JournalOptions {
    /// Options from the `journal` configuration section.
    #[must_use]
    pub fn from_config(config: &JournalConfig, currency: Currency) -> Self {
        Self {
            accounts: config.accounts.clone(),
            settlement: config.settlement,
            grouping: config.grouping,
            currency,
            ledger_id: None,
            description: None,
        }
    }
}

/// A preliminary entry plus the diagnostics that explain an imbalance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalProposal {
    /// The proposed entry, status preliminary.
    pub entry: JournalEntry,
    /// `total - (exempt + net + IVA)` of the global totals.
    pub decomposition_delta: Decimal,
    /// `total - calculated` of the global totals.
    pub calculated_delta: Decimal,
    /// `global total - sum of counterparty totals`, when counterparties exist.
    pub entity_delta: Option<Decimal>,
    /// Tax period the summary declares; the entry may be booked in another.
    pub summary_period: Period,
}

impl JournalProposal {
    /// Whether the proposed entry balances.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.entry.is_balanced()
    }

    /// Whether the entry is booked in the summary's own tax period.
    #[must_use]
    pub fn period_matches(&self) -> bool {
        self.entry.period == self.summary_period
    }
}

/// Builds journal proposals from RCV summaries.
pub struct JournalBalancer;

impl JournalBalancer {
    /// Proposes the centralization entry for `summary` in `period`.
    ///
    /// Purchases: Dr purchases (net, exempt), Dr IVA crédito fiscal,
    /// Cr payables or cash for the declared total.
    /// Sales: Dr receivables or cash for the declared total, Cr sales
    /// (net, exempt), Cr IVA débito fiscal.
    ///
    /// Zero amounts produce no line; negative amounts land on the opposite
    /// side.
    pub fn propose(
        company_id: CompanyId,
        summary: &RcvSummary,
        period: Period,
        options: &JournalOptions,
    ) -> Result<JournalProposal, JournalError> {
        let description = options.description.clone().unwrap_or_else(|| {
            format!("Centralización RCV {} {period}", summary.register.label())
        });
        let mut entry = JournalEntry::new(company_id, period, description)
            .with_ledger(options.ledger_id)
            .with_currency(options.currency);

        let lines = match summary.register {
            RcvRegister::Purchases => purchase_lines(summary, options),
            RcvRegister::Sales => sales_lines(summary, options),
        };
        for line in lines {
            entry.add_line(line)?;
        }

        let proposal = JournalProposal {
            decomposition_delta: summary.totals.decomposition_delta(),
            calculated_delta: summary.totals.calculated_delta(),
            entity_delta: summary.entity_delta(),
            summary_period: summary.period,
            entry,
        };

        if !proposal.period_matches() {
            warn!(
                company_id = %company_id,
                period = %period,
                summary_period = %summary.period,
                register = summary.register.label(),
                "RCV summary booked outside its tax period"
            );
        }

        if !proposal.decomposition_delta.is_zero()
            || !proposal.calculated_delta.is_zero()
            || proposal.entity_delta.is_some_and(|d| !d.is_zero())
        {
            warn!(
                company_id = %company_id,
                period = %period,
                register = summary.register.label(),
                decomposition_delta = %proposal.decomposition_delta,
                calculated_delta = %proposal.calculated_delta,
                entity_delta = ?proposal.entity_delta,
                "RCV summary does not add up"
            );
        }
        debug!(
            company_id = %company_id,
            lines = proposal.entry.lines().len(),
            total_debit = %proposal.entry.total_debit(),
            total_credit = %proposal.entry.total_credit(),
            is_balanced = proposal.entry.is_balanced(),
            "Proposed RCV journal entry"
        );

        Ok(proposal)
    }
}

fn purchase_lines(summary: &RcvSummary, options: &JournalOptions) -> Vec<JournalLine> {
    let accounts = &options.accounts;
    let totals = &summary.totals;

    let mut lines: Vec<JournalLine> = [
        debit(&accounts.purchases, totals.net_amount, "Compras afectas"),
        debit(&accounts.purchases, totals.exempt_amount, "Compras exentas"),
        debit(&accounts.iva_credit, totals.iva_amount, "IVA crédito fiscal"),
    ]
    .into_iter()
    .flatten()
    .collect();

    let settlement = match options.settlement {
        SettlementMode::Account => &accounts.payables,
        SettlementMode::Cash => &accounts.cash,
    };
    lines.extend(settlement_lines(
        summary,
        options.grouping,
        settlement,
        EntryType::Credit,
        "Proveedores",
    ));
    lines
}

fn sales_lines(summary: &RcvSummary, options: &JournalOptions) -> Vec<JournalLine> {
    let accounts = &options.accounts;
    let totals = &summary.totals;

    let settlement = match options.settlement {
        SettlementMode::Account => &accounts.receivables,
        SettlementMode::Cash => &accounts.cash,
    };
    let mut lines = settlement_lines(
        summary,
        options.grouping,
        settlement,
        EntryType::Debit,
        "Clientes",
    );

    lines.extend(
        [
            credit(&accounts.sales, totals.net_amount, "Ventas afectas"),
            credit(&accounts.sales, totals.exempt_amount, "Ventas exentas"),
            credit(&accounts.iva_debit, totals.iva_amount, "IVA débito fiscal"),
        ]
        .into_iter()
        .flatten(),
    );
    lines
}

fn debit(account: &AccountRef, amount: Decimal, description: &str) -> Option<JournalLine> {
    JournalLine::on_side(account, EntryType::Debit, amount, description)
}

fn credit(account: &AccountRef, amount: Decimal, description: &str) -> Option<JournalLine> {
    JournalLine::on_side(account, EntryType::Credit, amount, description)
}

/// Settlement side for the declared total, consolidated or per counterparty.
///
/// Falls back to a single line when the summary has no counterparty rows.
fn settlement_lines(
    summary: &RcvSummary,
    grouping: LineGrouping,
    account: &AccountRef,
    side: EntryType,
    label: &str,
) -> Vec<JournalLine> {
    match grouping {
        LineGrouping::PerEntity if !summary.entities.is_empty() => summary
            .entities
            .iter()
            .filter_map(|entity| {
                JournalLine::on_side(
                    account,
                    side,
                    entity.amounts.total_amount,
                    format!("{} {}", entity.name, entity.rut.formatted()),
                )
            })
            .collect(),
        _ => JournalLine::on_side(account, side, summary.totals.total_amount, label)
            .into_iter()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::rcv::{RcvEntitySummary, RcvTotals};
    use conciliador_shared::types::Rut;
    use rust_decimal_macros::dec;

    fn period() -> Period {
        Period::new(2024, 3).unwrap()
    }

    fn totals(net: Decimal, iva: Decimal, total: Decimal) -> RcvTotals {
        RcvTotals {
            document_count: 12,
            exempt_amount: dec!(0),
            net_amount: net,
            iva_amount: iva,
            total_amount: total,
            calculated_amount: net + iva,
        }
    }

    fn summary(register: RcvRegister, total: Decimal) -> RcvSummary {
        RcvSummary {
            register,
            period: period(),
            totals: totals(dec!(7176471), dec!(1363529), total),
            entities: vec![],
        }
    }

    #[test]
    fn test_purchases_balanced() {
        let proposal = JournalBalancer::propose(
            CompanyId::new(),
            &summary(RcvRegister::Purchases, dec!(8540000)),
            period(),
            &JournalOptions::default(),
        )
        .unwrap();

        let entry = &proposal.entry;
        assert!(proposal.is_balanced());
        assert_eq!(entry.total_debit(), dec!(8540000));
        assert_eq!(entry.total_credit(), dec!(8540000));
        assert_eq!(entry.lines().len(), 3);
        assert_eq!(entry.lines()[0].account_code, "5.1.01.001");
        assert_eq!(entry.lines()[1].account_code, "1.1.07.001");
        assert_eq!(entry.lines()[2].account_code, "2.1.01.001");
        assert_eq!(entry.lines()[2].side(), Some(EntryType::Credit));
        assert_eq!(entry.description, "Centralización RCV compras 2024-03");
        assert_eq!(proposal.decomposition_delta, dec!(0));
        assert!(proposal.period_matches());
    }

    #[test]
    fn test_decomposition_error_is_unbalanced() {
        let proposal = JournalBalancer::propose(
            CompanyId::new(),
            &summary(RcvRegister::Purchases, dec!(8400000)),
            period(),
            &JournalOptions::default(),
        )
        .unwrap();

        assert!(!proposal.is_balanced());
        assert_eq!(proposal.entry.total_debit(), dec!(8540000));
        assert_eq!(proposal.entry.total_credit(), dec!(8400000));
        assert_eq!(proposal.decomposition_delta, dec!(-140000));
    }

    #[test]
    fn test_period_mismatch_is_reported() {
        let april = Period::new(2024, 4).unwrap();
        let proposal = JournalBalancer::propose(
            CompanyId::new(),
            &summary(RcvRegister::Purchases, dec!(8540000)),
            april,
            &JournalOptions::default(),
        )
        .unwrap();

        assert!(!proposal.period_matches());
        assert_eq!(proposal.summary_period, period());
        assert_eq!(proposal.entry.period, april);
        assert!(proposal.is_balanced());
    }

    #[test]
    fn test_sales_to_cash() {
        let options = JournalOptions {
            settlement: SettlementMode::Cash,
            description: Some("Ventas marzo".to_string()),
            ..JournalOptions::default()
        };
        let proposal = JournalBalancer::propose(
            CompanyId::new(),
            &summary(RcvRegister::Sales, dec!(8540000)),
            period(),
            &options,
        )
        .unwrap();

        let lines = proposal.entry.lines();
        assert!(proposal.is_balanced());
        assert_eq!(lines[0].account_code, "1.1.01.001");
        assert_eq!(lines[0].debit_amount, dec!(8540000));
        assert_eq!(lines[1].account_code, "4.1.01.001");
        assert_eq!(lines[2].account_code, "2.1.05.001");
        assert_eq!(lines[2].credit_amount, dec!(1363529));
        assert_eq!(proposal.entry.description, "Ventas marzo");
    }

    #[test]
    fn test_exempt_and_credit_notes() {
        let mut rcv = summary(RcvRegister::Purchases, dec!(-119));
        rcv.totals = RcvTotals {
            exempt_amount: dec!(50),
            net_amount: dec!(-140),
            iva_amount: dec!(-29),
            total_amount: dec!(-119),
            calculated_amount: dec!(-119),
            document_count: 2,
        };

        let proposal =
            JournalBalancer::propose(CompanyId::new(), &rcv, period(), &JournalOptions::default())
                .unwrap();

        let lines = proposal.entry.lines();
        assert!(proposal.is_balanced());
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].credit_amount, dec!(140));
        assert_eq!(lines[1].debit_amount, dec!(50));
        assert_eq!(lines[2].credit_amount, dec!(29));
        assert_eq!(lines[3].debit_amount, dec!(119));
    }

    #[test]
    fn test_per_entity_settlement() {
        let mut rcv = summary(RcvRegister::Purchases, dec!(8540000));
        rcv.entities = vec![
            RcvEntitySummary {
                rut: Rut::parse("76086428-5").unwrap(),
                name: "Proveedor Uno SpA".to_string(),
                amounts: totals(dec!(5000000), dec!(950000), dec!(5950000)),
            },
            RcvEntitySummary {
                rut: Rut::parse("10000013-K").unwrap(),
                name: "Proveedor Dos Ltda".to_string(),
                amounts: totals(dec!(2176471), dec!(413529), dec!(2590000)),
            },
        ];
        let options = JournalOptions {
            grouping: LineGrouping::PerEntity,
            ..JournalOptions::default()
        };

        let proposal = JournalBalancer::propose(CompanyId::new(), &rcv, period(), &options).unwrap();

        let lines = proposal.entry.lines();
        assert!(proposal.is_balanced());
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2].credit_amount, dec!(5950000));
        assert_eq!(
            lines[3].description.as_deref(),
            Some("Proveedor Dos Ltda 10.000.013-K")
        );
        assert_eq!(proposal.entity_delta, Some(dec!(0)));
    }

    #[test]
    fn test_per_entity_mismatch_surfaces_as_imbalance() {
        let mut rcv = summary(RcvRegister::Purchases, dec!(8540000));
        rcv.entities = vec![RcvEntitySummary {
            rut: Rut::parse("76086428-5").unwrap(),
            name: "Proveedor Uno SpA".to_string(),
            amounts: totals(dec!(5000000), dec!(950000), dec!(5950000)),
        }];
        let options = JournalOptions {
            grouping: LineGrouping::PerEntity,
            ..JournalOptions::default()
        };

        let proposal = JournalBalancer::propose(CompanyId::new(), &rcv, period(), &options).unwrap();

        assert!(!proposal.is_balanced());
        assert_eq!(proposal.entity_delta, Some(dec!(2590000)));
        assert_eq!(proposal.entry.totals().difference(), dec!(2590000));
    }

    #[test]
    fn test_options_from_config() {
        let config = JournalConfig {
            settlement: SettlementMode::Cash,
            grouping: LineGrouping::PerEntity,
            accounts: ChartOfAccounts::default(),
        };
        let options = JournalOptions::from_config(&config, Currency::Clp);
        assert_eq!(options.settlement, SettlementMode::Cash);
        assert_eq!(options.grouping, LineGrouping::PerEntity);
        assert_eq!(options.ledger_id, None);
    }
}
