//! Conversions between `SeaORM` models and domain types.
//!
//! Reads are strict: a stored RUT or period that no longer parses is reported
//! as `StoreError::CorruptRecord` rather than skipped.

use conciliador_core::journal::JournalEntry;
use conciliador_core::payroll::{
    Contract, ContractStatus, ContractType, Employee, EmployeeProfile, LiquidationRecord,
    PayrollBook, PayrollBookDetail,
};
use conciliador_core::store::StoreError;
use conciliador_shared::types::{
    CompanyId, ContractId, EmployeeId, LiquidationId, PayrollBookDetailId, PayrollBookId, Period,
    Rut,
};
use sea_orm::{DbErr, Set, SqlErr};
use uuid::Uuid;

use crate::entities::{
    contracts, employees, journal_entries, journal_lines, liquidations, payroll_book_details,
    payroll_books, sea_orm_active_enums,
};

/// Maps a database error to a store error.
pub fn db_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::Conflict(msg),
        _ => StoreError::Backend(err.to_string()),
    }
}

fn rut(raw: &str) -> Result<Rut, StoreError> {
    Rut::parse(raw).map_err(|e| StoreError::CorruptRecord(format!("{raw}: {e}")))
}

fn period(year: i32, month: i32) -> Result<Period, StoreError> {
    let month = u32::try_from(month)
        .map_err(|_| StoreError::CorruptRecord(format!("month {month}")))?;
    Period::new(year, month).map_err(|e| StoreError::CorruptRecord(e.to_string()))
}

/// `(year, month)` columns of a period.
pub fn period_columns(period: Period) -> (i32, i32) {
    // Months are 1..=12.
    (period.year(), i32::try_from(period.month()).unwrap_or(0))
}

fn line_number(index: usize) -> Result<i32, StoreError> {
    i32::try_from(index + 1).map_err(|_| StoreError::Backend(format!("too many lines: {index}")))
}

impl From<sea_orm_active_enums::ContractType> for ContractType {
    fn from(value: sea_orm_active_enums::ContractType) -> Self {
        match value {
            sea_orm_active_enums::ContractType::Indefinite => Self::Indefinite,
            sea_orm_active_enums::ContractType::FixedTerm => Self::FixedTerm,
            sea_orm_active_enums::ContractType::PerProject => Self::PerProject,
            sea_orm_active_enums::ContractType::FeeBased => Self::FeeBased,
        }
    }
}

impl From<sea_orm_active_enums::ContractStatus> for ContractStatus {
    fn from(value: sea_orm_active_enums::ContractStatus) -> Self {
        match value {
            sea_orm_active_enums::ContractStatus::Active => Self::Active,
            sea_orm_active_enums::ContractStatus::Terminated => Self::Terminated,
        }
    }
}

/// Builds a payroll book from its header and rows (rows already ordered).
pub fn payroll_book(
    book: payroll_books::Model,
    details: Vec<payroll_book_details::Model>,
) -> Result<PayrollBook, StoreError> {
    let details = details
        .into_iter()
        .map(|d| -> Result<PayrollBookDetail, StoreError> {
            Ok(PayrollBookDetail {
                id: PayrollBookDetailId::from_uuid(d.id),
                employee_rut: rut(&d.employee_rut)?,
                employee_name: d.employee_name,
                sueldo_base: d.sueldo_base,
                total_haberes: d.total_haberes,
                total_descuentos: d.total_descuentos,
                sueldo_liquido: d.sueldo_liquido,
                colacion: d.colacion,
                movilizacion: d.movilizacion,
                asignacion_familiar: d.asignacion_familiar,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PayrollBook {
        id: PayrollBookId::from_uuid(book.id),
        company_id: CompanyId::from_uuid(book.company_id),
        period: period(book.year, book.month)?,
        total_employees: u32::try_from(book.total_employees).map_err(|_| {
            StoreError::CorruptRecord(format!("total_employees {}", book.total_employees))
        })?,
        total_haberes: book.total_haberes,
        total_descuentos: book.total_descuentos,
        details,
    })
}

/// Active models for a new book and its rows.
pub fn new_payroll_book(
    book: &PayrollBook,
    created_at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<(payroll_books::ActiveModel, Vec<payroll_book_details::ActiveModel>), StoreError> {
    let (year, month) = period_columns(book.period);
    let header = payroll_books::ActiveModel {
        id: Set(book.id.into_inner()),
        company_id: Set(book.company_id.into_inner()),
        year: Set(year),
        month: Set(month),
        total_employees: Set(i32::try_from(book.total_employees)
            .map_err(|_| StoreError::Backend("too many employees".to_string()))?),
        total_haberes: Set(book.total_haberes),
        total_descuentos: Set(book.total_descuentos),
        created_at: Set(created_at),
    };

    let rows = book
        .details
        .iter()
        .enumerate()
        .map(|(i, d)| -> Result<payroll_book_details::ActiveModel, StoreError> {
            Ok(payroll_book_details::ActiveModel {
                id: Set(d.id.into_inner()),
                book_id: Set(book.id.into_inner()),
                line_number: Set(line_number(i)?),
                employee_rut: Set(d.employee_rut.to_string()),
                employee_name: Set(d.employee_name.clone()),
                sueldo_base: Set(d.sueldo_base),
                total_haberes: Set(d.total_haberes),
                total_descuentos: Set(d.total_descuentos),
                sueldo_liquido: Set(d.sueldo_liquido),
                colacion: Set(d.colacion),
                movilizacion: Set(d.movilizacion),
                asignacion_familiar: Set(d.asignacion_familiar),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((header, rows))
}

/// Builds a liquidation record.
pub fn liquidation(model: liquidations::Model) -> Result<LiquidationRecord, StoreError> {
    Ok(LiquidationRecord {
        id: LiquidationId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        period: period(model.year, model.month)?,
        employee_rut: rut(&model.employee_rut)?,
        base_salary: model.base_salary,
        overtime_amount: model.overtime_amount,
        bonuses: model.bonuses,
        commissions: model.commissions,
        gratification: model.gratification,
        colacion: model.colacion,
        movilizacion: model.movilizacion,
        asignacion_familiar: model.asignacion_familiar,
        total_haberes: model.total_haberes,
        afp_amount: model.afp_amount,
        afp_commission_amount: model.afp_commission_amount,
        health_amount: model.health_amount,
        unemployment_amount: model.unemployment_amount,
        income_tax_amount: model.income_tax_amount,
        apv_amount: model.apv_amount,
        loan_deductions: model.loan_deductions,
        advance_payments: model.advance_payments,
        total_deductions: model.total_deductions,
        net_salary: model.net_salary,
    })
}

/// Builds an employee profile from the employee and its contracts.
pub fn employee_profile(
    employee: employees::Model,
    contracts: Vec<contracts::Model>,
) -> Result<EmployeeProfile, StoreError> {
    let employee_id = EmployeeId::from_uuid(employee.id);
    Ok(EmployeeProfile {
        employee: Employee {
            id: employee_id,
            company_id: CompanyId::from_uuid(employee.company_id),
            rut: rut(&employee.rut)?,
            first_name: employee.first_name,
            last_name: employee.last_name,
            bank_name: employee.bank_name,
            bank_account: employee.bank_account,
        },
        contracts: contracts
            .into_iter()
            .map(|c| Contract {
                id: ContractId::from_uuid(c.id),
                employee_id,
                base_salary: c.base_salary,
                position: c.position,
                contract_type: c.contract_type.into(),
                status: c.status.into(),
                start_date: c.start_date,
                end_date: c.end_date,
            })
            .collect(),
    })
}

/// Active models for a posted entry and its lines.
pub fn posted_entry(
    entry: &JournalEntry,
    entry_number: i64,
    posted_at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<(journal_entries::ActiveModel, Vec<journal_lines::ActiveModel>), StoreError> {
    let (year, month) = period_columns(entry.period);
    let entry_id: Uuid = entry.id.into_inner();
    let header = journal_entries::ActiveModel {
        id: Set(entry_id),
        company_id: Set(entry.company_id.into_inner()),
        ledger_id: Set(entry.ledger_id.map(|id| id.into_inner())),
        year: Set(year),
        month: Set(month),
        entry_number: Set(entry_number),
        description: Set(entry.description.clone()),
        currency: Set(entry.currency.to_string()),
        total_debit: Set(entry.total_debit()),
        total_credit: Set(entry.total_credit()),
        status: Set(sea_orm_active_enums::JournalStatus::Posted),
        posted_at: Set(posted_at),
    };

    let lines = entry
        .lines()
        .iter()
        .enumerate()
        .map(|(i, line)| -> Result<journal_lines::ActiveModel, StoreError> {
            Ok(journal_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                journal_entry_id: Set(entry_id),
                line_number: Set(line_number(i)?),
                account_code: Set(line.account_code.clone()),
                account_name: Set(line.account_name.clone()),
                description: Set(line.description.clone()),
                debit_amount: Set(line.debit_amount),
                credit_amount: Set(line.credit_amount),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((header, lines))
}
