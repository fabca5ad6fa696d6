//! Property-based tests for ReconciliationResolver.
//!
//! - Itemized columns plus residuals reproduce the authoritative totals
//! - Footer equals the book's declared totals under book authority
//! - Resolving is idempotent

use conciliador_shared::types::{CompanyId, LiquidationId, PayrollBookDetailId, Period, Rut};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::resolver::ReconciliationResolver;
use super::types::{LiquidationRecord, PayrollBook, PayrollBookDetail};

/// Whole-peso amounts up to 10,000,000.
fn peso_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(Decimal::from)
}

/// Deduction items for one liquidation: afp, commission, health, cesantía,
/// tax, apv, loans, advances.
fn deduction_items() -> impl Strategy<Value = [Decimal; 8]> {
    prop::array::uniform8((0i64..400_000i64).prop_map(Decimal::from))
}

/// An employee: book totals, whether a liquidation exists, and its items.
fn employee_case() -> impl Strategy<Value = (Decimal, Decimal, bool, [Decimal; 8])> {
    (peso_amount(), peso_amount(), any::<bool>(), deduction_items())
}

fn build(cases: &[(Decimal, Decimal, bool, [Decimal; 8])]) -> (PayrollBook, Vec<LiquidationRecord>) {
    let company_id = CompanyId::new();
    let period = Period::new(2024, 3).unwrap();
    let mut details = Vec::new();
    let mut records = Vec::new();

    for (i, (haberes, descuentos, has_record, items)) in cases.iter().enumerate() {
        let body = 1_000_000 + u32::try_from(i).unwrap();
        let rut = Rut::parse(&format!("{body}-{}", Rut::compute_check_digit(body))).unwrap();
        details.push(PayrollBookDetail {
            id: PayrollBookDetailId::new(),
            employee_rut: rut.clone(),
            employee_name: format!("Empleado {i}"),
            sueldo_base: Decimal::ZERO,
            total_haberes: *haberes,
            total_descuentos: *descuentos,
            sueldo_liquido: *haberes - *descuentos,
            colacion: Decimal::ZERO,
            movilizacion: Decimal::ZERO,
            asignacion_familiar: Decimal::ZERO,
        });
        if *has_record {
            records.push(LiquidationRecord {
                id: LiquidationId::new(),
                company_id,
                period,
                employee_rut: rut,
                base_salary: Decimal::ZERO,
                overtime_amount: Decimal::ZERO,
                bonuses: Decimal::ZERO,
                commissions: Decimal::ZERO,
                gratification: Decimal::ZERO,
                colacion: Decimal::ZERO,
                movilizacion: Decimal::ZERO,
                asignacion_familiar: Decimal::ZERO,
                total_haberes: *haberes,
                afp_amount: items[0],
                afp_commission_amount: items[1],
                health_amount: items[2],
                unemployment_amount: items[3],
                income_tax_amount: items[4],
                apv_amount: items[5],
                loan_deductions: items[6],
                advance_payments: items[7],
                total_deductions: *descuentos,
                net_salary: *haberes - *descuentos,
            });
        }
    }

    (PayrollBook::from_details(company_id, period, details), records)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whenever the known items do not exceed the total, itemized
    /// deductions plus the residual reproduce `total_descuentos` exactly.
    #[test]
    fn prop_itemized_deductions_reproduce_total(
        cases in prop::collection::vec(employee_case(), 1..12)
    ) {
        let (book, records) = build(&cases);
        let report = ReconciliationResolver::default().resolve(&book, &records, &[]);

        for row in &report.rows {
            prop_assert!(row.other_deductions >= Decimal::ZERO);
            prop_assert_eq!(
                row.other_deductions,
                row.deductions_delta.max(Decimal::ZERO)
            );
            if row.deductions_delta >= Decimal::ZERO {
                prop_assert_eq!(row.itemized_deductions(), row.total_descuentos);
            } else {
                prop_assert!(row.itemized_deductions() > row.total_descuentos);
            }
            prop_assert_eq!(row.itemized_haberes(), row.total_haberes);
        }
    }

    /// Rows without a liquidation put the whole total in the residual.
    #[test]
    fn prop_missing_liquidation_is_all_residual(
        cases in prop::collection::vec(employee_case(), 1..12)
    ) {
        let (book, records) = build(&cases);
        let report = ReconciliationResolver::default().resolve(&book, &records, &[]);

        for row in report.rows.iter().filter(|r| !r.has_liquidation) {
            prop_assert_eq!(row.other_deductions, row.total_descuentos);
            prop_assert_eq!(row.other_haberes, row.total_haberes);
        }
    }

    /// Under book authority the footer equals the book's declared totals.
    #[test]
    fn prop_footer_matches_book(
        cases in prop::collection::vec(employee_case(), 0..12)
    ) {
        let (book, records) = build(&cases);
        let report = ReconciliationResolver::default().resolve(&book, &records, &[]);

        prop_assert_eq!(report.totals.total_haberes, book.total_haberes);
        prop_assert_eq!(report.totals.total_descuentos, book.total_descuentos);
        prop_assert_eq!(report.totals.sueldo_liquido, book.total_liquido());
        prop_assert!(report.footer_matches_book());
    }

    /// Resolving the same inputs twice yields identical reports.
    #[test]
    fn prop_resolve_is_idempotent(
        cases in prop::collection::vec(employee_case(), 0..8)
    ) {
        let (book, records) = build(&cases);
        let resolver = ReconciliationResolver::default();
        prop_assert_eq!(
            resolver.resolve(&book, &records, &[]),
            resolver.resolve(&book, &records, &[])
        );
    }
}
