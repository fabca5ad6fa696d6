//! Payroll schema.
//!
//! Employees, contracts, payroll books with their rows, and liquidation
//! records. Liquidations join books by RUT only, never by foreign key.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(EMPLOYEES_SQL).await?;
        db.execute_unprepared(CONTRACTS_SQL).await?;
        db.execute_unprepared(PAYROLL_BOOKS_SQL).await?;
        db.execute_unprepared(PAYROLL_BOOK_DETAILS_SQL).await?;
        db.execute_unprepared(LIQUIDATIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE contract_type AS ENUM ('indefinite', 'fixed_term', 'per_project', 'fee_based');
CREATE TYPE contract_status AS ENUM ('active', 'terminated');
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL,
    rut VARCHAR(12) NOT NULL,
    first_name VARCHAR(120) NOT NULL,
    last_name VARCHAR(120) NOT NULL,
    bank_name VARCHAR(120),
    bank_account VARCHAR(40),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_employees_company_rut UNIQUE (company_id, rut)
);
";

const CONTRACTS_SQL: &str = r"
CREATE TABLE contracts (
    id UUID PRIMARY KEY,
    employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    base_salary NUMERIC(14, 0) NOT NULL CHECK (base_salary >= 0),
    position VARCHAR(120) NOT NULL,
    contract_type contract_type NOT NULL,
    status contract_status NOT NULL DEFAULT 'active',
    start_date DATE NOT NULL,
    end_date DATE,
    CONSTRAINT chk_contract_dates CHECK (end_date IS NULL OR end_date >= start_date)
);

-- At most one active contract per employee
CREATE UNIQUE INDEX uq_contracts_one_active ON contracts(employee_id) WHERE status = 'active';
";

const PAYROLL_BOOKS_SQL: &str = r"
CREATE TABLE payroll_books (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    total_employees INTEGER NOT NULL CHECK (total_employees >= 0),
    total_haberes NUMERIC(16, 0) NOT NULL,
    total_descuentos NUMERIC(16, 0) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_payroll_books_period UNIQUE (company_id, year, month)
);
";

const PAYROLL_BOOK_DETAILS_SQL: &str = r"
CREATE TABLE payroll_book_details (
    id UUID PRIMARY KEY,
    book_id UUID NOT NULL REFERENCES payroll_books(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    employee_rut VARCHAR(12) NOT NULL,
    employee_name VARCHAR(240) NOT NULL,
    sueldo_base NUMERIC(14, 0) NOT NULL DEFAULT 0,
    total_haberes NUMERIC(14, 0) NOT NULL,
    total_descuentos NUMERIC(14, 0) NOT NULL,
    sueldo_liquido NUMERIC(14, 0) NOT NULL,
    colacion NUMERIC(14, 0) NOT NULL DEFAULT 0,
    movilizacion NUMERIC(14, 0) NOT NULL DEFAULT 0,
    asignacion_familiar NUMERIC(14, 0) NOT NULL DEFAULT 0,
    CONSTRAINT uq_book_details_rut UNIQUE (book_id, employee_rut),
    CONSTRAINT chk_book_detail_liquido CHECK (sueldo_liquido = total_haberes - total_descuentos)
);

CREATE INDEX idx_book_details_book ON payroll_book_details(book_id, line_number);
";

const LIQUIDATIONS_SQL: &str = r"
CREATE TABLE liquidations (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    employee_rut VARCHAR(12) NOT NULL,
    base_salary NUMERIC(14, 0) NOT NULL DEFAULT 0,
    overtime_amount NUMERIC(14, 0) NOT NULL DEFAULT 0,
    bonuses NUMERIC(14, 0) NOT NULL DEFAULT 0,
    commissions NUMERIC(14, 0) NOT NULL DEFAULT 0,
    gratification NUMERIC(14, 0) NOT NULL DEFAULT 0,
    colacion NUMERIC(14, 0) NOT NULL DEFAULT 0,
    movilizacion NUMERIC(14, 0) NOT NULL DEFAULT 0,
    asignacion_familiar NUMERIC(14, 0) NOT NULL DEFAULT 0,
    total_haberes NUMERIC(14, 0) NOT NULL,
    afp_amount NUMERIC(14, 0) NOT NULL DEFAULT 0,
    afp_commission_amount NUMERIC(14, 0) NOT NULL DEFAULT 0,
    health_amount NUMERIC(14, 0) NOT NULL DEFAULT 0,
    unemployment_amount NUMERIC(14, 0) NOT NULL DEFAULT 0,
    income_tax_amount NUMERIC(14, 0) NOT NULL DEFAULT 0,
    apv_amount NUMERIC(14, 0) NOT NULL DEFAULT 0,
    loan_deductions NUMERIC(14, 0) NOT NULL DEFAULT 0,
    advance_payments NUMERIC(14, 0) NOT NULL DEFAULT 0,
    total_deductions NUMERIC(14, 0) NOT NULL,
    net_salary NUMERIC(14, 0) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Soft join key: no uniqueness, duplicates are reported by the resolver
CREATE INDEX idx_liquidations_period ON liquidations(company_id, year, month, employee_rut);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS liquidations CASCADE;
DROP TABLE IF EXISTS payroll_book_details CASCADE;
DROP TABLE IF EXISTS payroll_books CASCADE;
DROP TABLE IF EXISTS contracts CASCADE;
DROP TABLE IF EXISTS employees CASCADE;
DROP TYPE IF EXISTS contract_status;
DROP TYPE IF EXISTS contract_type;
";
