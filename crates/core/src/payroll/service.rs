//! Store-backed payroll operations.

use conciliador_shared::types::{CompanyId, Period};
use tracing::info;

use super::book::PayrollBookGenerator;
use super::error::PayrollError;
use super::report::PayrollLedgerReport;
use super::resolver::ReconciliationResolver;
use super::types::PayrollBook;
use crate::store::RecordStore;

/// Fetches inputs from a [`RecordStore`] and runs the pure payroll logic.
pub struct ReconciliationService<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    resolver: ReconciliationResolver,
}

impl<'a, S: RecordStore + ?Sized> ReconciliationService<'a, S> {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: &'a S, resolver: ReconciliationResolver) -> Self {
        Self { store, resolver }
    }

    /// Reconciles the stored book of a period against its liquidations.
    ///
    /// # Errors
    ///
    /// `PayrollError::BookNotFound` when the book has not been generated,
    /// `PayrollError::Store` on store failures.
    pub async fn reconcile(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<PayrollLedgerReport, PayrollError> {
        let book = self
            .store
            .get_payroll_book(company_id, period)
            .await?
            .ok_or(PayrollError::BookNotFound { company_id, period })?;
        let liquidations = self.store.list_liquidations(company_id, period).await?;
        let profiles = self.store.list_employee_profiles(company_id).await?;

        let report = self.resolver.resolve(&book, &liquidations, &profiles);

        info!(
            company_id = %company_id,
            period = %period,
            employees = report.rows.len(),
            liquidations = liquidations.len(),
            warnings = report.warnings.len(),
            "Payroll reconciled"
        );

        Ok(report)
    }

    /// Generates and stores the book of a period from its liquidations.
    ///
    /// # Errors
    ///
    /// `PayrollError::BookAlreadyExists` if the period already has a book,
    /// plus the errors of [`PayrollBookGenerator::generate`].
    pub async fn generate_book(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<PayrollBook, PayrollError> {
        if self
            .store
            .get_payroll_book(company_id, period)
            .await?
            .is_some()
        {
            return Err(PayrollError::BookAlreadyExists { company_id, period });
        }

        let liquidations = self.store.list_liquidations(company_id, period).await?;
        let profiles = self.store.list_employee_profiles(company_id).await?;
        let book = PayrollBookGenerator::generate(company_id, period, &liquidations, &profiles)?;

        self.store.save_payroll_book(&book).await?;

        info!(
            company_id = %company_id,
            period = %period,
            book_id = %book.id,
            employees = book.total_employees,
            total_haberes = %book.total_haberes,
            "Payroll book generated"
        );

        Ok(book)
    }
}
