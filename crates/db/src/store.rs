//! Postgres record store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use conciliador_core::journal::{JournalEntry, PostingReceipt};
use conciliador_core::payroll::{EmployeeProfile, LiquidationRecord, PayrollBook};
use conciliador_core::store::{RecordStore, StoreError};
use conciliador_shared::types::{CompanyId, Period};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use tracing::{debug, instrument};

use crate::entities::{
    contracts, employees, journal_entries, journal_lines, liquidations, payroll_book_details,
    payroll_books,
};
use crate::mapping::{self, db_err, period_columns};

/// [`RecordStore`] over a `SeaORM` connection.
///
/// Entry numbers are computed as `MAX + 1` inside the posting transaction;
/// the unique `(company_id, entry_number)` constraint turns a lost race into
/// `StoreError::Conflict`.
#[derive(Debug, Clone)]
pub struct SeaRecordStore {
    db: DatabaseConnection,
}

impl SeaRecordStore {
    /// Creates a store over an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl RecordStore for SeaRecordStore {
    #[instrument(skip_all, fields(company_id = %company_id, period = %period))]
    async fn get_payroll_book(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<Option<PayrollBook>, StoreError> {
        let (year, month) = period_columns(period);
        let Some(book) = payroll_books::Entity::find()
            .filter(payroll_books::Column::CompanyId.eq(company_id.into_inner()))
            .filter(payroll_books::Column::Year.eq(year))
            .filter(payroll_books::Column::Month.eq(month))
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let details = payroll_book_details::Entity::find()
            .filter(payroll_book_details::Column::BookId.eq(book.id))
            .order_by_asc(payroll_book_details::Column::LineNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        mapping::payroll_book(book, details).map(Some)
    }

    #[instrument(skip_all, fields(company_id = %book.company_id, period = %book.period))]
    async fn save_payroll_book(&self, book: &PayrollBook) -> Result<(), StoreError> {
        let (year, month) = period_columns(book.period);
        let (header, rows) = mapping::new_payroll_book(book, Utc::now().into())?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = payroll_books::Entity::find()
            .filter(payroll_books::Column::CompanyId.eq(book.company_id.into_inner()))
            .filter(payroll_books::Column::Year.eq(year))
            .filter(payroll_books::Column::Month.eq(month))
            .one(&txn)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(StoreError::Conflict(format!(
                "payroll book for company {} period {} already exists",
                book.company_id, book.period
            )));
        }

        payroll_books::Entity::insert(header)
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;
        if !rows.is_empty() {
            payroll_book_details::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        debug!(rows = book.details.len(), "Payroll book stored");
        Ok(())
    }

    #[instrument(skip_all, fields(company_id = %company_id, period = %period))]
    async fn list_liquidations(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<Vec<LiquidationRecord>, StoreError> {
        let (year, month) = period_columns(period);
        liquidations::Entity::find()
            .filter(liquidations::Column::CompanyId.eq(company_id.into_inner()))
            .filter(liquidations::Column::Year.eq(year))
            .filter(liquidations::Column::Month.eq(month))
            .order_by_asc(liquidations::Column::CreatedAt)
            .order_by_asc(liquidations::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(mapping::liquidation)
            .collect()
    }

    #[instrument(skip_all, fields(company_id = %company_id))]
    async fn list_employee_profiles(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<EmployeeProfile>, StoreError> {
        let employees = employees::Entity::find()
            .filter(employees::Column::CompanyId.eq(company_id.into_inner()))
            .order_by_asc(employees::Column::Rut)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if employees.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<_> = employees.iter().map(|e| e.id).collect();
        let mut contracts_by_employee: HashMap<_, Vec<contracts::Model>> = HashMap::new();
        for contract in contracts::Entity::find()
            .filter(contracts::Column::EmployeeId.is_in(ids))
            .order_by_asc(contracts::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?
        {
            contracts_by_employee
                .entry(contract.employee_id)
                .or_default()
                .push(contract);
        }

        employees
            .into_iter()
            .map(|employee| {
                let contracts = contracts_by_employee.remove(&employee.id).unwrap_or_default();
                mapping::employee_profile(employee, contracts)
            })
            .collect()
    }

    #[instrument(
        skip_all,
        fields(company_id = %company_id, period = %period, entry_id = %entry.id)
    )]
    async fn post_journal_entry(
        &self,
        company_id: CompanyId,
        period: Period,
        entry: &JournalEntry,
    ) -> Result<PostingReceipt, StoreError> {
        if !entry.is_balanced() {
            return Err(StoreError::Unbalanced {
                debit: entry.total_debit(),
                credit: entry.total_credit(),
            });
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        let last = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id.into_inner()))
            .order_by_desc(journal_entries::Column::EntryNumber)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?;
        let entry_number = last.map_or(0, |m| m.entry_number) + 1;

        let (header, lines) = mapping::posted_entry(entry, entry_number, Utc::now().into())?;
        journal_entries::Entity::insert(header)
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;
        if !lines.is_empty() {
            journal_lines::Entity::insert_many(lines)
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        debug!(entry_number, "Journal entry stored");

        Ok(PostingReceipt::for_entry(entry, entry_number))
    }
}
