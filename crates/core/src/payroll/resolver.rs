//! Payroll reconciliation.
//!
//! Joins each payroll book row with at most one liquidation record by RUT and
//! produces a ledger row whose itemized columns add up to the authoritative
//! totals. Whatever the itemized sources do not explain goes into the
//! `other_*` residual columns.

use std::collections::HashMap;

use conciliador_shared::config::AuthoritativeSource;
use conciliador_shared::types::Rut;
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::warn;

use super::matching::LiquidationIndex;
use super::report::{
    BookTotals, PayrollLedgerReport, PayrollLedgerRow, PayrollLedgerTotals,
    ReconciliationWarning, TotalsColumn,
};
use super::residual::Residual;
use super::types::{
    ContractType, EmployeeProfile, LiquidationRecord, PayrollBook, PayrollBookDetail,
};

/// One independent unit of work for [`ReconciliationResolver::resolve_many`].
#[derive(Debug, Clone)]
pub struct ReconciliationInput {
    /// The authoritative book.
    pub book: PayrollBook,
    /// Liquidation records for the same company and period.
    pub liquidations: Vec<LiquidationRecord>,
    /// Employee profiles for enrichment. May be empty.
    pub profiles: Vec<EmployeeProfile>,
}

/// Reconciles a payroll book against liquidation records.
///
/// Pure and synchronous: the same inputs always produce the same report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationResolver {
    authority: AuthoritativeSource,
}

/// Totals a row is reconciled against.
struct Authoritative {
    total_haberes: Decimal,
    total_descuentos: Decimal,
    sueldo_liquido: Decimal,
}

impl ReconciliationResolver {
    /// Creates a resolver using `authority` as ground truth for row totals.
    #[must_use]
    pub fn new(authority: AuthoritativeSource) -> Self {
        Self { authority }
    }

    /// The configured authoritative source.
    #[must_use]
    pub fn authority(&self) -> AuthoritativeSource {
        self.authority
    }

    /// Reconciles one book.
    ///
    /// Only liquidations of the book's company and period are joined.
    ///
    /// Never fails: missing, duplicate, orphan or out-of-scope liquidations, clamped
    /// residuals and footer disagreements are reported as warnings.
    #[must_use]
    pub fn resolve(
        &self,
        book: &PayrollBook,
        liquidations: &[LiquidationRecord],
        profiles: &[EmployeeProfile],
    ) -> PayrollLedgerReport {
        let index = LiquidationIndex::build(liquidations, book.company_id, book.period);
        let profiles_by_rut: HashMap<&Rut, &EmployeeProfile> =
            profiles.iter().map(|p| (&p.employee.rut, p)).collect();

        let mut warnings: Vec<ReconciliationWarning> = index
            .duplicates()
            .iter()
            .map(|rut| ReconciliationWarning::DuplicateLiquidation {
                rut: (*rut).clone(),
            })
            .collect();
        warnings.extend(index.out_of_scope().iter().map(|record| {
            ReconciliationWarning::OutOfScopeLiquidation {
                rut: record.employee_rut.clone(),
                company_id: record.company_id,
                period: record.period,
            }
        }));

        let mut rows = Vec::with_capacity(book.details.len());
        let mut totals = PayrollLedgerTotals::default();

        for detail in &book.details {
            let record = index.get(&detail.employee_rut);
            let profile = profiles_by_rut.get(&detail.employee_rut).copied();
            let row = self.resolve_row(detail, record, profile, &mut warnings);
            totals.add_row(&row);
            rows.push(row);
        }

        warnings.extend(
            index
                .orphans(book)
                .into_iter()
                .map(|rut| ReconciliationWarning::OrphanLiquidation { rut: rut.clone() }),
        );

        let book_totals = BookTotals::from(book);
        warnings.extend(compare_footer(&totals, &book_totals));

        for warning in &warnings {
            warn!(
                company_id = %book.company_id,
                period = %book.period,
                code = warning.code(),
                warning = ?warning,
                "Reconciliation warning"
            );
        }

        PayrollLedgerReport {
            company_id: book.company_id,
            period: book.period,
            authoritative_source: self.authority,
            rows,
            totals,
            book_totals,
            warnings,
        }
    }

    /// Reconciles several independent books in parallel.
    ///
    /// Reports come back in input order.
    #[must_use]
    pub fn resolve_many(&self, inputs: &[ReconciliationInput]) -> Vec<PayrollLedgerReport> {
        inputs
            .par_iter()
            .map(|input| self.resolve(&input.book, &input.liquidations, &input.profiles))
            .collect()
    }

    fn resolve_row(
        &self,
        detail: &PayrollBookDetail,
        record: Option<&LiquidationRecord>,
        profile: Option<&EmployeeProfile>,
        warnings: &mut Vec<ReconciliationWarning>,
    ) -> PayrollLedgerRow {
        let rut = &detail.employee_rut;

        if record.is_none() {
            warnings.push(ReconciliationWarning::MissingLiquidation { rut: rut.clone() });
        }

        let (position, contract_type) = enrich(profile, rut, warnings);

        // Base haberes come from whichever source owns the row totals.
        let liquidation_owned = self.authority == AuthoritativeSource::Liquidation;
        let (sueldo_base, colacion, movilizacion, asignacion_familiar, authoritative) =
            match record {
                Some(r) if liquidation_owned => (
                    r.base_salary,
                    r.colacion,
                    r.movilizacion,
                    r.asignacion_familiar,
                    Authoritative {
                        total_haberes: r.total_haberes,
                        total_descuentos: r.total_deductions,
                        sueldo_liquido: r.net_salary,
                    },
                ),
                _ => (
                    detail.sueldo_base,
                    detail.colacion,
                    detail.movilizacion,
                    detail.asignacion_familiar,
                    Authoritative {
                        total_haberes: detail.total_haberes,
                        total_descuentos: detail.total_descuentos,
                        sueldo_liquido: detail.sueldo_liquido,
                    },
                ),
            };

        let zero = Decimal::ZERO;
        let (overtime_amount, bonuses, commissions, gratification) = record.map_or(
            (zero, zero, zero, zero),
            |r| (r.overtime_amount, r.bonuses, r.commissions, r.gratification),
        );

        let haberes = Residual::absorb(
            authoritative.total_haberes,
            [
                sueldo_base,
                colacion,
                movilizacion,
                asignacion_familiar,
                overtime_amount,
                bonuses,
                commissions,
                gratification,
            ],
        );
        if let Some(excess) = haberes.excess() {
            warnings.push(ReconciliationWarning::HaberesExceedAuthoritative {
                rut: rut.clone(),
                excess,
            });
        }

        let known_deductions = record.map_or(zero, LiquidationRecord::known_deductions);
        let deductions = Residual::absorb(authoritative.total_descuentos, [known_deductions]);
        if let Some(excess) = deductions.excess() {
            warnings.push(ReconciliationWarning::DeductionsExceedAuthoritative {
                rut: rut.clone(),
                excess,
            });
        }

        PayrollLedgerRow {
            employee_rut: rut.clone(),
            employee_name: detail.employee_name.clone(),
            position,
            contract_type,
            has_liquidation: record.is_some(),

            sueldo_base,
            colacion,
            movilizacion,
            asignacion_familiar,
            overtime_amount,
            bonuses,
            commissions,
            gratification,
            other_haberes: haberes.amount,
            haberes_delta: haberes.delta,

            afp_amount: record.map_or(zero, |r| r.afp_amount),
            afp_commission_amount: record.map_or(zero, |r| r.afp_commission_amount),
            health_amount: record.map_or(zero, |r| r.health_amount),
            unemployment_amount: record.map_or(zero, |r| r.unemployment_amount),
            income_tax_amount: record.map_or(zero, |r| r.income_tax_amount),
            apv_amount: record.map_or(zero, |r| r.apv_amount),
            loan_deductions: record.map_or(zero, |r| r.loan_deductions),
            advance_payments: record.map_or(zero, |r| r.advance_payments),
            other_deductions: deductions.amount,
            deductions_delta: deductions.delta,

            total_haberes: authoritative.total_haberes,
            total_descuentos: authoritative.total_descuentos,
            sueldo_liquido: authoritative.sueldo_liquido,
        }
    }
}

fn enrich(
    profile: Option<&EmployeeProfile>,
    rut: &Rut,
    warnings: &mut Vec<ReconciliationWarning>,
) -> (Option<String>, Option<ContractType>) {
    let Some(profile) = profile else {
        return (None, None);
    };
    match profile.active_contract() {
        Ok(Some(contract)) => (Some(contract.position.clone()), Some(contract.contract_type)),
        Ok(None) => (None, None),
        Err(_) => {
            warnings.push(ReconciliationWarning::MultipleActiveContracts { rut: rut.clone() });
            (None, None)
        }
    }
}

fn compare_footer(
    totals: &PayrollLedgerTotals,
    book: &BookTotals,
) -> Vec<ReconciliationWarning> {
    [
        (
            TotalsColumn::Employees,
            Decimal::from(book.total_employees),
            Decimal::from(totals.employees),
        ),
        (TotalsColumn::TotalHaberes, book.total_haberes, totals.total_haberes),
        (
            TotalsColumn::TotalDescuentos,
            book.total_descuentos,
            totals.total_descuentos,
        ),
        (TotalsColumn::SueldoLiquido, book.total_liquido, totals.sueldo_liquido),
    ]
    .into_iter()
    .filter(|(_, book, rows)| book != rows)
    .map(|(column, book, rows)| ReconciliationWarning::BookTotalsMismatch { column, book, rows })
    .collect()
}
