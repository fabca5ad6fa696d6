//! Database seeder for Conciliador development and testing.
//!
//! Seeds a demo company for March 2024 with three employees, an imported
//! payroll book and the liquidations issued for two of them. Reconciling the
//! period afterwards shows a 390,000 deduction residual on the first
//! employee and a missing liquidation for the third.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use conciliador_db::entities::{
    contracts, employees, liquidations, payroll_book_details, payroll_books,
    sea_orm_active_enums::{ContractStatus, ContractType},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

const YEAR: i32 = 2024;
const MONTH: i32 = 3;

/// Itemized deductions printed on a liquidation.
struct Deductions {
    afp: Decimal,
    health: Decimal,
    unemployment: Decimal,
    income_tax: Decimal,
}

struct DemoEmployee {
    rut: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    position: &'static str,
    sueldo_base: Decimal,
    gratification: Decimal,
    colacion: Decimal,
    movilizacion: Decimal,
    /// Totals as imported into the payroll book.
    book_haberes: Decimal,
    book_descuentos: Decimal,
    /// `None` when no liquidation was issued this month.
    liquidation: Option<Deductions>,
}

fn demo_employees() -> Vec<DemoEmployee> {
    vec![
        DemoEmployee {
            rut: "12345678-5",
            first_name: "María",
            last_name: "González",
            position: "Gerente de Finanzas",
            sueldo_base: dec!(5500000),
            gratification: dec!(1100000),
            colacion: dec!(80000),
            movilizacion: dec!(60000),
            book_haberes: dec!(6740000),
            book_descuentos: dec!(1715000),
            liquidation: Some(Deductions {
                afp: dec!(520000),
                health: dec!(364000),
                unemployment: dec!(156000),
                income_tax: dec!(285000),
            }),
        },
        DemoEmployee {
            rut: "11111111-1",
            first_name: "Juan",
            last_name: "Pérez",
            position: "Analista Contable",
            sueldo_base: dec!(1000000),
            gratification: dec!(200000),
            colacion: dec!(50000),
            movilizacion: dec!(0),
            book_haberes: dec!(1250000),
            book_descuentos: dec!(210000),
            liquidation: Some(Deductions {
                afp: dec!(115000),
                health: dec!(87500),
                unemployment: dec!(7500),
                income_tax: dec!(0),
            }),
        },
        DemoEmployee {
            rut: "22222222-2",
            first_name: "Camila",
            last_name: "Rojas",
            position: "Asistente Administrativa",
            sueldo_base: dec!(850000),
            gratification: dec!(0),
            colacion: dec!(50000),
            movilizacion: dec!(0),
            book_haberes: dec!(900000),
            book_descuentos: dec!(150000),
            liquidation: None,
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = conciliador_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    if book_exists(&db).await? {
        println!("  Demo payroll book already exists, skipping...");
        return Ok(());
    }

    let employees = demo_employees();
    let txn = db.begin().await?;

    println!("Seeding employees and contracts...");
    for employee in &employees {
        seed_employee(&txn, employee).await?;
    }

    println!("Seeding payroll book {YEAR}-{MONTH:02}...");
    seed_payroll_book(&txn, &employees).await?;

    println!("Seeding liquidations...");
    for employee in &employees {
        seed_liquidation(&txn, employee).await?;
    }

    txn.commit().await?;
    println!("Seeding complete! Demo company: {DEMO_COMPANY_ID}");
    Ok(())
}

async fn book_exists(db: &DatabaseConnection) -> anyhow::Result<bool> {
    let existing = payroll_books::Entity::find()
        .filter(payroll_books::Column::CompanyId.eq(DEMO_COMPANY_ID))
        .filter(payroll_books::Column::Year.eq(YEAR))
        .filter(payroll_books::Column::Month.eq(MONTH))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

async fn seed_employee(txn: &DatabaseTransaction, employee: &DemoEmployee) -> anyhow::Result<()> {
    let employee_id = Uuid::now_v7();
    employees::ActiveModel {
        id: Set(employee_id),
        company_id: Set(DEMO_COMPANY_ID),
        rut: Set(employee.rut.to_string()),
        first_name: Set(employee.first_name.to_string()),
        last_name: Set(employee.last_name.to_string()),
        bank_name: Set(None),
        bank_account: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await
    .with_context(|| format!("Failed to insert employee {}", employee.rut))?;

    let start_date =
        NaiveDate::from_ymd_opt(2022, 1, 1).context("invalid contract start date")?;
    contracts::ActiveModel {
        id: Set(Uuid::now_v7()),
        employee_id: Set(employee_id),
        base_salary: Set(employee.sueldo_base),
        position: Set(employee.position.to_string()),
        contract_type: Set(ContractType::Indefinite),
        status: Set(ContractStatus::Active),
        start_date: Set(start_date),
        end_date: Set(None),
    }
    .insert(txn)
    .await?;

    println!("  Created {} {} ({})", employee.first_name, employee.last_name, employee.rut);
    Ok(())
}

async fn seed_payroll_book(
    txn: &DatabaseTransaction,
    employees: &[DemoEmployee],
) -> anyhow::Result<()> {
    let book_id = Uuid::now_v7();
    let total_haberes: Decimal = employees.iter().map(|e| e.book_haberes).sum();
    let total_descuentos: Decimal = employees.iter().map(|e| e.book_descuentos).sum();

    payroll_books::ActiveModel {
        id: Set(book_id),
        company_id: Set(DEMO_COMPANY_ID),
        year: Set(YEAR),
        month: Set(MONTH),
        total_employees: Set(i32::try_from(employees.len())?),
        total_haberes: Set(total_haberes),
        total_descuentos: Set(total_descuentos),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await
    .context("Failed to insert payroll book")?;

    for (line_number, employee) in (1..).zip(employees) {
        payroll_book_details::ActiveModel {
            id: Set(Uuid::now_v7()),
            book_id: Set(book_id),
            line_number: Set(line_number),
            employee_rut: Set(employee.rut.to_string()),
            employee_name: Set(format!("{} {}", employee.first_name, employee.last_name)),
            sueldo_base: Set(employee.sueldo_base),
            total_haberes: Set(employee.book_haberes),
            total_descuentos: Set(employee.book_descuentos),
            sueldo_liquido: Set(employee.book_haberes - employee.book_descuentos),
            colacion: Set(employee.colacion),
            movilizacion: Set(employee.movilizacion),
            asignacion_familiar: Set(Decimal::ZERO),
        }
        .insert(txn)
        .await?;
    }

    println!("  Created book: {total_haberes} haberes, {total_descuentos} descuentos");
    Ok(())
}

async fn seed_liquidation(
    txn: &DatabaseTransaction,
    employee: &DemoEmployee,
) -> anyhow::Result<()> {
    let Some(deductions) = &employee.liquidation else {
        println!("  No liquidation for {}, skipping...", employee.rut);
        return Ok(());
    };

    let total_haberes =
        employee.sueldo_base + employee.gratification + employee.colacion + employee.movilizacion;
    // Stored totals are those of the book; itemization may not account for all of it.
    let total_deductions = employee.book_descuentos;

    liquidations::ActiveModel {
        id: Set(Uuid::now_v7()),
        company_id: Set(DEMO_COMPANY_ID),
        year: Set(YEAR),
        month: Set(MONTH),
        employee_rut: Set(employee.rut.to_string()),
        base_salary: Set(employee.sueldo_base),
        overtime_amount: Set(Decimal::ZERO),
        bonuses: Set(Decimal::ZERO),
        commissions: Set(Decimal::ZERO),
        gratification: Set(employee.gratification),
        colacion: Set(employee.colacion),
        movilizacion: Set(employee.movilizacion),
        asignacion_familiar: Set(Decimal::ZERO),
        total_haberes: Set(total_haberes),
        afp_amount: Set(deductions.afp),
        afp_commission_amount: Set(Decimal::ZERO),
        health_amount: Set(deductions.health),
        unemployment_amount: Set(deductions.unemployment),
        income_tax_amount: Set(deductions.income_tax),
        apv_amount: Set(Decimal::ZERO),
        loan_deductions: Set(Decimal::ZERO),
        advance_payments: Set(Decimal::ZERO),
        total_deductions: Set(total_deductions),
        net_salary: Set(total_haberes - total_deductions),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await
    .with_context(|| format!("Failed to insert liquidation for {}", employee.rut))?;

    println!("  Created liquidation for {}", employee.rut);
    Ok(())
}
