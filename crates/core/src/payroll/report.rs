//! Reconciled payroll ledger: rows, footer totals, and diagnostics.

use conciliador_shared::config::AuthoritativeSource;
use conciliador_shared::types::{CompanyId, Period, Rut};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{ContractType, PayrollBook};

/// One reconciled employee row. Derived on demand, never persisted.
///
/// The itemized haberes plus `other_haberes` add up to `total_haberes`, and
/// the itemized deductions plus `other_deductions` add up to
/// `total_descuentos`, except where a delta is negative (clamped residual).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLedgerRow {
    /// Employee RUT.
    pub employee_rut: Rut,
    /// Employee display name.
    pub employee_name: String,
    /// Position from the active contract, when known.
    pub position: Option<String>,
    /// Contract kind from the active contract, when known.
    pub contract_type: Option<ContractType>,
    /// Whether a liquidation record was matched.
    pub has_liquidation: bool,

    /// Sueldo base.
    pub sueldo_base: Decimal,
    /// Colación.
    pub colacion: Decimal,
    /// Movilización.
    pub movilizacion: Decimal,
    /// Asignación familiar.
    pub asignacion_familiar: Decimal,
    /// Horas extra.
    pub overtime_amount: Decimal,
    /// Bonos.
    pub bonuses: Decimal,
    /// Comisiones.
    pub commissions: Decimal,
    /// Gratificación.
    pub gratification: Decimal,
    /// Haberes not explained by the items above.
    pub other_haberes: Decimal,
    /// Unclamped `total_haberes - known haberes`.
    pub haberes_delta: Decimal,

    /// AFP contribution.
    pub afp_amount: Decimal,
    /// AFP commission.
    pub afp_commission_amount: Decimal,
    /// Health.
    pub health_amount: Decimal,
    /// Seguro de cesantía.
    pub unemployment_amount: Decimal,
    /// Impuesto único.
    pub income_tax_amount: Decimal,
    /// APV.
    pub apv_amount: Decimal,
    /// Loan installments.
    pub loan_deductions: Decimal,
    /// Advances.
    pub advance_payments: Decimal,
    /// Deductions not explained by the items above.
    pub other_deductions: Decimal,
    /// Unclamped `total_descuentos - known deductions`.
    pub deductions_delta: Decimal,

    /// Authoritative total haberes.
    pub total_haberes: Decimal,
    /// Authoritative total descuentos.
    pub total_descuentos: Decimal,
    /// Authoritative sueldo líquido.
    pub sueldo_liquido: Decimal,
}

impl PayrollLedgerRow {
    /// Sum of every deduction column, residual included.
    #[must_use]
    pub fn itemized_deductions(&self) -> Decimal {
        self.afp_amount
            + self.afp_commission_amount
            + self.health_amount
            + self.unemployment_amount
            + self.income_tax_amount
            + self.apv_amount
            + self.loan_deductions
            + self.advance_payments
            + self.other_deductions
    }

    /// Sum of every haberes column, residual included.
    #[must_use]
    pub fn itemized_haberes(&self) -> Decimal {
        self.sueldo_base
            + self.colacion
            + self.movilizacion
            + self.asignacion_familiar
            + self.overtime_amount
            + self.bonuses
            + self.commissions
            + self.gratification
            + self.other_haberes
    }
}

/// Column sums across all rows (the report footer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLedgerTotals {
    /// Number of rows.
    pub employees: u32,
    /// Σ sueldo base.
    pub sueldo_base: Decimal,
    /// Σ colación.
    pub colacion: Decimal,
    /// Σ movilización.
    pub movilizacion: Decimal,
    /// Σ asignación familiar.
    pub asignacion_familiar: Decimal,
    /// Σ horas extra.
    pub overtime_amount: Decimal,
    /// Σ bonos.
    pub bonuses: Decimal,
    /// Σ comisiones.
    pub commissions: Decimal,
    /// Σ gratificación.
    pub gratification: Decimal,
    /// Σ other haberes.
    pub other_haberes: Decimal,
    /// Σ AFP.
    pub afp_amount: Decimal,
    /// Σ AFP commission.
    pub afp_commission_amount: Decimal,
    /// Σ health.
    pub health_amount: Decimal,
    /// Σ cesantía.
    pub unemployment_amount: Decimal,
    /// Σ impuesto único.
    pub income_tax_amount: Decimal,
    /// Σ APV.
    pub apv_amount: Decimal,
    /// Σ loans.
    pub loan_deductions: Decimal,
    /// Σ advances.
    pub advance_payments: Decimal,
    /// Σ other deductions.
    pub other_deductions: Decimal,
    /// Σ total haberes.
    pub total_haberes: Decimal,
    /// Σ total descuentos.
    pub total_descuentos: Decimal,
    /// Σ sueldo líquido.
    pub sueldo_liquido: Decimal,
}

impl PayrollLedgerTotals {
    /// Adds one row to the running totals.
    pub fn add_row(&mut self, row: &PayrollLedgerRow) {
        self.employees += 1;
        self.sueldo_base += row.sueldo_base;
        self.colacion += row.colacion;
        self.movilizacion += row.movilizacion;
        self.asignacion_familiar += row.asignacion_familiar;
        self.overtime_amount += row.overtime_amount;
        self.bonuses += row.bonuses;
        self.commissions += row.commissions;
        self.gratification += row.gratification;
        self.other_haberes += row.other_haberes;
        self.afp_amount += row.afp_amount;
        self.afp_commission_amount += row.afp_commission_amount;
        self.health_amount += row.health_amount;
        self.unemployment_amount += row.unemployment_amount;
        self.income_tax_amount += row.income_tax_amount;
        self.apv_amount += row.apv_amount;
        self.loan_deductions += row.loan_deductions;
        self.advance_payments += row.advance_payments;
        self.other_deductions += row.other_deductions;
        self.total_haberes += row.total_haberes;
        self.total_descuentos += row.total_descuentos;
        self.sueldo_liquido += row.sueldo_liquido;
    }

    /// Sums a slice of rows.
    #[must_use]
    pub fn from_rows(rows: &[PayrollLedgerRow]) -> Self {
        let mut totals = Self::default();
        for row in rows {
            totals.add_row(row);
        }
        totals
    }
}

/// The book's own declared totals, carried next to the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTotals {
    /// Declared employee count.
    pub total_employees: u32,
    /// Declared total haberes.
    pub total_haberes: Decimal,
    /// Declared total descuentos.
    pub total_descuentos: Decimal,
    /// Total líquido (haberes - descuentos).
    pub total_liquido: Decimal,
}

impl From<&PayrollBook> for BookTotals {
    fn from(book: &PayrollBook) -> Self {
        Self {
            total_employees: book.total_employees,
            total_haberes: book.total_haberes,
            total_descuentos: book.total_descuentos,
            total_liquido: book.total_liquido(),
        }
    }
}

/// Footer column compared against the book's declared totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsColumn {
    /// Employee count.
    Employees,
    /// Total haberes.
    TotalHaberes,
    /// Total descuentos.
    TotalDescuentos,
    /// Sueldo líquido.
    SueldoLiquido,
}

/// Non-fatal findings produced while reconciling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconciliationWarning {
    /// The employee has no liquidation record; itemized fields are zero and
    /// the whole total sits in the residual.
    MissingLiquidation {
        /// Employee RUT.
        rut: Rut,
    },
    /// More than one liquidation record for the same RUT; the first was used.
    DuplicateLiquidation {
        /// Employee RUT.
        rut: Rut,
    },
    /// A liquidation record whose RUT has no book row.
    OrphanLiquidation {
        /// Employee RUT.
        rut: Rut,
    },
    /// A liquidation record of another company or period; it was not joined.
    OutOfScopeLiquidation {
        /// Employee RUT.
        rut: Rut,
        /// Company on the record.
        company_id: CompanyId,
        /// Period on the record.
        period: Period,
    },
    /// Itemized deductions exceed the authoritative total; the residual was
    /// clamped to zero and the excess is not reflected anywhere else.
    DeductionsExceedAuthoritative {
        /// Employee RUT.
        rut: Rut,
        /// Amount by which the items exceed the total.
        excess: Decimal,
    },
    /// Itemized haberes exceed the authoritative total.
    HaberesExceedAuthoritative {
        /// Employee RUT.
        rut: Rut,
        /// Amount by which the items exceed the total.
        excess: Decimal,
    },
    /// The employee holds several active contracts; position was left empty.
    MultipleActiveContracts {
        /// Employee RUT.
        rut: Rut,
    },
    /// A footer column disagrees with the book's declared total.
    BookTotalsMismatch {
        /// The column.
        column: TotalsColumn,
        /// Value declared by the book.
        book: Decimal,
        /// Value summed from the rows.
        rows: Decimal,
    },
}

impl ReconciliationWarning {
    /// Stable code for reports and logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingLiquidation { .. } => "MISSING_LIQUIDATION",
            Self::DuplicateLiquidation { .. } => "DUPLICATE_LIQUIDATION",
            Self::OrphanLiquidation { .. } => "ORPHAN_LIQUIDATION",
            Self::OutOfScopeLiquidation { .. } => "OUT_OF_SCOPE_LIQUIDATION",
            Self::DeductionsExceedAuthoritative { .. } => "DEDUCTIONS_EXCEED_AUTHORITATIVE",
            Self::HaberesExceedAuthoritative { .. } => "HABERES_EXCEED_AUTHORITATIVE",
            Self::MultipleActiveContracts { .. } => "MULTIPLE_ACTIVE_CONTRACTS",
            Self::BookTotalsMismatch { .. } => "BOOK_TOTALS_MISMATCH",
        }
    }
}

/// Output of a reconciliation run: what the report assembler renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLedgerReport {
    /// Company reconciled.
    pub company_id: CompanyId,
    /// Period reconciled.
    pub period: Period,
    /// Which source was ground truth.
    pub authoritative_source: AuthoritativeSource,
    /// One row per book detail, in book order.
    pub rows: Vec<PayrollLedgerRow>,
    /// Footer column sums.
    pub totals: PayrollLedgerTotals,
    /// The book's declared totals.
    pub book_totals: BookTotals,
    /// Non-fatal findings.
    pub warnings: Vec<ReconciliationWarning>,
}

impl PayrollLedgerReport {
    /// True when the footer agrees with the book on every compared column.
    #[must_use]
    pub fn footer_matches_book(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, ReconciliationWarning::BookTotalsMismatch { .. }))
    }

    /// Rows whose deduction residual was clamped.
    pub fn clamped_rows(&self) -> impl Iterator<Item = &PayrollLedgerRow> {
        self.rows
            .iter()
            .filter(|row| row.deductions_delta < Decimal::ZERO)
    }

    /// RUTs reconciled without a liquidation record.
    pub fn employees_without_liquidation(&self) -> impl Iterator<Item = &Rut> {
        self.rows
            .iter()
            .filter(|row| !row.has_liquidation)
            .map(|row| &row.employee_rut)
    }
}
