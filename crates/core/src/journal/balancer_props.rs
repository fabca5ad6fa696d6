//! Property-based tests for JournalBalancer.
//!
//! - `is_balanced` holds iff debits equal credits exactly
//! - A well-formed summary always balances
//! - Decomposition errors show up as the entry's imbalance

use conciliador_shared::config::{LineGrouping, SettlementMode};
use conciliador_shared::types::{CompanyId, Period};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balancer::{JournalBalancer, JournalOptions};
use super::rcv::{RcvRegister, RcvSummary, RcvTotals};

/// Signed whole-peso amounts; negatives model credit notes.
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-5_000_000i64..50_000_000i64).prop_map(Decimal::from)
}

fn register() -> impl Strategy<Value = RcvRegister> {
    prop_oneof![Just(RcvRegister::Purchases), Just(RcvRegister::Sales)]
}

fn settlement() -> impl Strategy<Value = SettlementMode> {
    prop_oneof![Just(SettlementMode::Account), Just(SettlementMode::Cash)]
}

fn summary(register: RcvRegister, exempt: Decimal, net: Decimal, iva: Decimal, total: Decimal) -> RcvSummary {
    RcvSummary {
        register,
        period: Period::new(2024, 3).unwrap(),
        totals: RcvTotals {
            document_count: 1,
            exempt_amount: exempt,
            net_amount: net,
            iva_amount: iva,
            total_amount: total,
            calculated_amount: exempt + net + iva,
        },
        entities: vec![],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// `is_balanced` is exactly `Σ debit == Σ credit`.
    #[test]
    fn prop_is_balanced_iff_sums_equal(
        register in register(),
        exempt in signed_amount(),
        net in signed_amount(),
        iva in signed_amount(),
        total in signed_amount(),
    ) {
        let rcv = summary(register, exempt, net, iva, total);
        let proposal = JournalBalancer::propose(
            CompanyId::new(), &rcv, rcv.period, &JournalOptions::default(),
        ).unwrap();

        let entry = &proposal.entry;
        let debit: Decimal = entry.lines().iter().map(|l| l.debit_amount).sum();
        let credit: Decimal = entry.lines().iter().map(|l| l.credit_amount).sum();
        prop_assert_eq!(entry.total_debit(), debit);
        prop_assert_eq!(entry.total_credit(), credit);
        prop_assert_eq!(entry.is_balanced(), debit == credit);
    }

    /// A summary whose parts add up to its total always balances.
    #[test]
    fn prop_well_formed_summary_balances(
        register in register(),
        settlement in settlement(),
        exempt in signed_amount(),
        net in signed_amount(),
        iva in signed_amount(),
    ) {
        let rcv = summary(register, exempt, net, iva, exempt + net + iva);
        let options = JournalOptions {
            settlement,
            grouping: LineGrouping::Consolidated,
            ..JournalOptions::default()
        };
        let proposal = JournalBalancer::propose(CompanyId::new(), &rcv, rcv.period, &options).unwrap();

        prop_assert!(proposal.is_balanced());
        prop_assert_eq!(proposal.decomposition_delta, Decimal::ZERO);
        for line in proposal.entry.lines() {
            prop_assert!(line.validate().is_ok());
        }
    }

    /// The entry's imbalance mirrors the decomposition delta.
    #[test]
    fn prop_imbalance_equals_decomposition_delta(
        exempt in signed_amount(),
        net in signed_amount(),
        iva in signed_amount(),
        total in signed_amount(),
    ) {
        let rcv = summary(RcvRegister::Purchases, exempt, net, iva, total);
        let proposal = JournalBalancer::propose(
            CompanyId::new(), &rcv, rcv.period, &JournalOptions::default(),
        ).unwrap();

        // Purchases credit the total: debit - credit == parts - total.
        prop_assert_eq!(
            proposal.entry.totals().difference(),
            -proposal.decomposition_delta
        );
    }
}
