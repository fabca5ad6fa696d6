//! Payroll domain types.
//!
//! Two independently maintained sources describe the same month of payroll:
//! the payroll book (libro de remuneraciones), whose totals are authoritative,
//! and the per-employee liquidation records (liquidaciones de sueldo), which
//! carry the itemized breakdown. They are joined softly by RUT.

use chrono::NaiveDate;
use conciliador_shared::types::{
    CompanyId, ContractId, EmployeeId, LiquidationId, PayrollBookDetailId, PayrollBookId, Period,
    Rut,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PayrollError;

/// An employee of a company. Identity (RUT) is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier.
    pub id: EmployeeId,
    /// Employing company.
    pub company_id: CompanyId,
    /// National tax id, unique per company.
    pub rut: Rut,
    /// Given names.
    pub first_name: String,
    /// Family names.
    pub last_name: String,
    /// Bank the salary is paid into.
    pub bank_name: Option<String>,
    /// Account number the salary is paid into.
    pub bank_account: Option<String>,
}

impl Employee {
    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Kind of employment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Contrato indefinido.
    Indefinite,
    /// Contrato a plazo fijo.
    FixedTerm,
    /// Contrato por obra o faena.
    PerProject,
    /// Honorarios.
    FeeBased,
}

/// Contract lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// In force.
    Active,
    /// Ended.
    Terminated,
}

/// An employment contract. Belongs to exactly one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique identifier.
    pub id: ContractId,
    /// Owning employee.
    pub employee_id: EmployeeId,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Job title.
    pub position: String,
    /// Contract kind.
    pub contract_type: ContractType,
    /// Lifecycle status.
    pub status: ContractStatus,
    /// First day in force.
    pub start_date: NaiveDate,
    /// Last day in force, if known.
    pub end_date: Option<NaiveDate>,
}

/// An employee together with the contracts they have held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// The employee.
    pub employee: Employee,
    /// All contracts, any status.
    pub contracts: Vec<Contract>,
}

impl EmployeeProfile {
    /// Returns the single active contract, if any.
    ///
    /// # Errors
    ///
    /// Returns `PayrollError::MultipleActiveContracts` when more than one
    /// contract is active.
    pub fn active_contract(&self) -> Result<Option<&Contract>, PayrollError> {
        let mut active = self
            .contracts
            .iter()
            .filter(|c| c.status == ContractStatus::Active);
        let first = active.next();
        if active.next().is_some() {
            return Err(PayrollError::MultipleActiveContracts(
                self.employee.rut.clone(),
            ));
        }
        Ok(first)
    }
}

/// One employee's row in a payroll book. Owned by the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBookDetail {
    /// Unique identifier.
    pub id: PayrollBookDetailId,
    /// Employee RUT (soft join key).
    pub employee_rut: Rut,
    /// Employee display name as printed in the book.
    pub employee_name: String,
    /// Sueldo base.
    pub sueldo_base: Decimal,
    /// Total haberes (gross).
    pub total_haberes: Decimal,
    /// Total descuentos (deductions).
    pub total_descuentos: Decimal,
    /// Sueldo líquido (net).
    pub sueldo_liquido: Decimal,
    /// Asignación de colación.
    pub colacion: Decimal,
    /// Asignación de movilización.
    pub movilizacion: Decimal,
    /// Asignación familiar.
    pub asignacion_familiar: Decimal,
}

/// The authoritative payroll book for one company and period.
///
/// `total_liquido` is not stored: it is always
/// `total_haberes - total_descuentos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBook {
    /// Unique identifier.
    pub id: PayrollBookId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Payroll month.
    pub period: Period,
    /// Number of employees in the book.
    pub total_employees: u32,
    /// Total haberes across employees.
    pub total_haberes: Decimal,
    /// Total descuentos across employees.
    pub total_descuentos: Decimal,
    /// One row per employee.
    pub details: Vec<PayrollBookDetail>,
}

impl PayrollBook {
    /// Builds a book whose totals are computed from its rows.
    #[must_use]
    pub fn from_details(
        company_id: CompanyId,
        period: Period,
        details: Vec<PayrollBookDetail>,
    ) -> Self {
        let total_haberes = details.iter().map(|d| d.total_haberes).sum();
        let total_descuentos = details.iter().map(|d| d.total_descuentos).sum();

        Self {
            id: PayrollBookId::new(),
            company_id,
            period,
            total_employees: u32::try_from(details.len()).unwrap_or(u32::MAX),
            total_haberes,
            total_descuentos,
            details,
        }
    }

    /// Total líquido (net), by construction `total_haberes - total_descuentos`.
    #[must_use]
    pub fn total_liquido(&self) -> Decimal {
        self.total_haberes - self.total_descuentos
    }
}

/// A per-employee liquidation record, computed independently of the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationRecord {
    /// Unique identifier.
    pub id: LiquidationId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Payroll month.
    pub period: Period,
    /// Employee RUT (soft join key).
    pub employee_rut: Rut,

    /// Sueldo base.
    pub base_salary: Decimal,
    /// Horas extra.
    #[serde(default)]
    pub overtime_amount: Decimal,
    /// Bonos.
    #[serde(default)]
    pub bonuses: Decimal,
    /// Comisiones.
    #[serde(default)]
    pub commissions: Decimal,
    /// Gratificación (Art. 50).
    #[serde(default)]
    pub gratification: Decimal,
    /// Asignación de colación.
    #[serde(default)]
    pub colacion: Decimal,
    /// Asignación de movilización.
    #[serde(default)]
    pub movilizacion: Decimal,
    /// Asignación familiar.
    #[serde(default)]
    pub asignacion_familiar: Decimal,
    /// Total haberes as computed by the liquidation.
    pub total_haberes: Decimal,

    /// AFP pension contribution.
    #[serde(default)]
    pub afp_amount: Decimal,
    /// AFP commission.
    #[serde(default)]
    pub afp_commission_amount: Decimal,
    /// Health (Fonasa / Isapre).
    #[serde(default)]
    pub health_amount: Decimal,
    /// Seguro de cesantía.
    #[serde(default)]
    pub unemployment_amount: Decimal,
    /// Impuesto único.
    #[serde(default)]
    pub income_tax_amount: Decimal,
    /// Ahorro previsional voluntario.
    #[serde(default)]
    pub apv_amount: Decimal,
    /// Loan installments.
    #[serde(default)]
    pub loan_deductions: Decimal,
    /// Salary advances (anticipos).
    #[serde(default)]
    pub advance_payments: Decimal,
    /// Total descuentos as computed by the liquidation.
    pub total_deductions: Decimal,
    /// Sueldo líquido as computed by the liquidation.
    pub net_salary: Decimal,
}

impl LiquidationRecord {
    /// Sum of the itemized deductions the engine knows about.
    #[must_use]
    pub fn known_deductions(&self) -> Decimal {
        self.afp_amount
            + self.afp_commission_amount
            + self.health_amount
            + self.unemployment_amount
            + self.income_tax_amount
            + self.apv_amount
            + self.loan_deductions
            + self.advance_payments
    }

    /// Sum of the variable haberes only the liquidation itemizes.
    #[must_use]
    pub fn variable_haberes(&self) -> Decimal {
        self.overtime_amount + self.bonuses + self.commissions + self.gratification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rut(s: &str) -> Rut {
        Rut::parse(s).unwrap()
    }

    fn employee() -> Employee {
        Employee {
            id: EmployeeId::new(),
            company_id: CompanyId::new(),
            rut: rut("12.345.678-5"),
            first_name: "María José".to_string(),
            last_name: " Pérez Soto ".to_string(),
            bank_name: None,
            bank_account: None,
        }
    }

    fn contract(employee_id: EmployeeId, status: ContractStatus) -> Contract {
        Contract {
            id: ContractId::new(),
            employee_id,
            base_salary: dec!(900000),
            position: "Analista".to_string(),
            contract_type: ContractType::Indefinite,
            status,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end_date: None,
        }
    }

    fn detail(haberes: Decimal, descuentos: Decimal) -> PayrollBookDetail {
        PayrollBookDetail {
            id: PayrollBookDetailId::new(),
            employee_rut: rut("11.111.111-1"),
            employee_name: "Juan Soto".to_string(),
            sueldo_base: haberes,
            total_haberes: haberes,
            total_descuentos: descuentos,
            sueldo_liquido: haberes - descuentos,
            colacion: Decimal::ZERO,
            movilizacion: Decimal::ZERO,
            asignacion_familiar: Decimal::ZERO,
        }
    }

    #[test]
    fn test_full_name_trims_parts() {
        assert_eq!(employee().full_name(), "María José Pérez Soto");
    }

    #[test]
    fn test_active_contract_single() {
        let employee = employee();
        let profile = EmployeeProfile {
            contracts: vec![
                contract(employee.id, ContractStatus::Terminated),
                contract(employee.id, ContractStatus::Active),
            ],
            employee,
        };
        let active = profile.active_contract().unwrap().unwrap();
        assert_eq!(active.status, ContractStatus::Active);
    }

    #[test]
    fn test_active_contract_none() {
        let employee = employee();
        let profile = EmployeeProfile {
            contracts: vec![contract(employee.id, ContractStatus::Terminated)],
            employee,
        };
        assert!(profile.active_contract().unwrap().is_none());
    }

    #[test]
    fn test_active_contract_rejects_two_active() {
        let employee = employee();
        let profile = EmployeeProfile {
            contracts: vec![
                contract(employee.id, ContractStatus::Active),
                contract(employee.id, ContractStatus::Active),
            ],
            employee,
        };
        assert!(matches!(
            profile.active_contract(),
            Err(PayrollError::MultipleActiveContracts(_))
        ));
    }

    #[test]
    fn test_book_totals_from_details() {
        let book = PayrollBook::from_details(
            CompanyId::new(),
            Period::new(2024, 3).unwrap(),
            vec![
                detail(dec!(1000000), dec!(200000)),
                detail(dec!(2500000), dec!(610000)),
            ],
        );
        assert_eq!(book.total_employees, 2);
        assert_eq!(book.total_haberes, dec!(3500000));
        assert_eq!(book.total_descuentos, dec!(810000));
        assert_eq!(book.total_liquido(), dec!(2690000));
    }

    #[test]
    fn test_empty_book_has_zero_totals() {
        let book = PayrollBook::from_details(CompanyId::new(), Period::new(2024, 3).unwrap(), vec![]);
        assert_eq!(book.total_employees, 0);
        assert_eq!(book.total_liquido(), Decimal::ZERO);
    }
}
