//! Payroll book generation from liquidation records.

use std::collections::{HashMap, HashSet};

use conciliador_shared::types::{CompanyId, PayrollBookDetailId, Period, Rut};

use super::error::PayrollError;
use super::types::{EmployeeProfile, LiquidationRecord, PayrollBook, PayrollBookDetail};

/// Builds the payroll book for a period from its liquidation records.
pub struct PayrollBookGenerator;

impl PayrollBookGenerator {
    /// Generates one book row per liquidation record, sorted by RUT.
    ///
    /// Names come from the matching employee profile, falling back to the RUT.
    /// `sueldo_liquido` is `total_haberes - total_deductions` of each record.
    ///
    /// # Errors
    ///
    /// - `PayrollError::NoLiquidations` when `records` is empty
    /// - `PayrollError::DuplicateEmployee` when a RUT appears twice
    pub fn generate(
        company_id: CompanyId,
        period: Period,
        records: &[LiquidationRecord],
        profiles: &[EmployeeProfile],
    ) -> Result<PayrollBook, PayrollError> {
        if records.is_empty() {
            return Err(PayrollError::NoLiquidations { company_id, period });
        }

        let names: HashMap<&Rut, String> = profiles
            .iter()
            .map(|p| (&p.employee.rut, p.employee.full_name()))
            .collect();

        let mut seen = HashSet::with_capacity(records.len());
        let mut details = Vec::with_capacity(records.len());

        for record in records {
            if !seen.insert(&record.employee_rut) {
                return Err(PayrollError::DuplicateEmployee(record.employee_rut.clone()));
            }

            let employee_name = names
                .get(&record.employee_rut)
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| record.employee_rut.to_string());

            details.push(PayrollBookDetail {
                id: PayrollBookDetailId::new(),
                employee_rut: record.employee_rut.clone(),
                employee_name,
                sueldo_base: record.base_salary,
                total_haberes: record.total_haberes,
                total_descuentos: record.total_deductions,
                sueldo_liquido: record.total_haberes - record.total_deductions,
                colacion: record.colacion,
                movilizacion: record.movilizacion,
                asignacion_familiar: record.asignacion_familiar,
            });
        }

        details.sort_by(|a, b| a.employee_rut.cmp(&b.employee_rut));

        Ok(PayrollBook::from_details(company_id, period, details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::types::Employee;
    use conciliador_shared::types::{EmployeeId, LiquidationId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(company_id: CompanyId, rut: &str, haberes: Decimal, deductions: Decimal) -> LiquidationRecord {
        LiquidationRecord {
            id: LiquidationId::new(),
            company_id,
            period: Period::new(2024, 3).unwrap(),
            employee_rut: Rut::parse(rut).unwrap(),
            base_salary: haberes,
            overtime_amount: dec!(0),
            bonuses: dec!(0),
            commissions: dec!(0),
            gratification: dec!(0),
            colacion: dec!(0),
            movilizacion: dec!(0),
            asignacion_familiar: dec!(0),
            total_haberes: haberes,
            afp_amount: deductions,
            afp_commission_amount: dec!(0),
            health_amount: dec!(0),
            unemployment_amount: dec!(0),
            income_tax_amount: dec!(0),
            apv_amount: dec!(0),
            loan_deductions: dec!(0),
            advance_payments: dec!(0),
            total_deductions: deductions,
            net_salary: haberes - deductions,
        }
    }

    #[test]
    fn test_generate_computes_totals_and_sorts() {
        let company_id = CompanyId::new();
        let period = Period::new(2024, 3).unwrap();
        let records = vec![
            record(company_id, "12.345.678-5", dec!(1500000), dec!(310000)),
            record(company_id, "7.654.321-6", dec!(650000), dec!(120000)),
        ];
        let profile = EmployeeProfile {
            employee: Employee {
                id: EmployeeId::new(),
                company_id,
                rut: Rut::parse("12345678-5").unwrap(),
                first_name: "Ana".to_string(),
                last_name: "Pérez".to_string(),
                bank_name: None,
                bank_account: None,
            },
            contracts: vec![],
        };

        let book = PayrollBookGenerator::generate(company_id, period, &records, &[profile]).unwrap();

        assert_eq!(book.total_employees, 2);
        assert_eq!(book.total_haberes, dec!(2150000));
        assert_eq!(book.total_descuentos, dec!(430000));
        assert_eq!(book.total_liquido(), dec!(1720000));
        assert_eq!(book.details[0].employee_rut.to_string(), "7654321-6");
        assert_eq!(book.details[0].employee_name, "7654321-6");
        assert_eq!(book.details[1].employee_name, "Ana Pérez");
        assert_eq!(book.details[1].sueldo_liquido, dec!(1190000));
    }

    #[test]
    fn test_generate_rejects_empty_input() {
        let result = PayrollBookGenerator::generate(
            CompanyId::new(),
            Period::new(2024, 3).unwrap(),
            &[],
            &[],
        );
        assert!(matches!(result, Err(PayrollError::NoLiquidations { .. })));
    }

    #[test]
    fn test_generate_rejects_duplicate_rut() {
        let company_id = CompanyId::new();
        let records = vec![
            record(company_id, "11.111.111-1", dec!(500000), dec!(100000)),
            record(company_id, "11111111-1", dec!(500000), dec!(100000)),
        ];
        let result =
            PayrollBookGenerator::generate(company_id, Period::new(2024, 3).unwrap(), &records, &[]);
        assert!(matches!(result, Err(PayrollError::DuplicateEmployee(_))));
    }
}
