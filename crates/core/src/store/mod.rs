//! Record store seam.
//!
//! The engine never talks to a database directly. Everything it reads or
//! writes goes through [`RecordStore`], keyed by company and period. Each
//! method is one call-and-wait; implementations are atomic per write.

pub mod error;
pub mod memory;

use async_trait::async_trait;
use conciliador_shared::types::{CompanyId, Period};

use crate::journal::{JournalEntry, PostingReceipt};
use crate::payroll::{EmployeeProfile, LiquidationRecord, PayrollBook};

pub use error::StoreError;
pub use memory::InMemoryRecordStore;

/// Keyed retrieval and storage of payroll and journal records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The payroll book for a company and period, if one was generated.
    async fn get_payroll_book(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<Option<PayrollBook>, StoreError>;

    /// Stores a new payroll book with its details.
    ///
    /// Fails with `StoreError::Conflict` if a book already exists for the
    /// book's company and period.
    async fn save_payroll_book(&self, book: &PayrollBook) -> Result<(), StoreError>;

    /// All liquidation records for a company and period.
    async fn list_liquidations(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<Vec<LiquidationRecord>, StoreError>;

    /// Employees of a company with their contracts.
    async fn list_employee_profiles(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<EmployeeProfile>, StoreError>;

    /// Persists a journal entry as posted and assigns its entry number.
    ///
    /// Entry numbers increase monotonically per company. Fails with
    /// `StoreError::Unbalanced` if debits and credits differ.
    async fn post_journal_entry(
        &self,
        company_id: CompanyId,
        period: Period,
        entry: &JournalEntry,
    ) -> Result<PostingReceipt, StoreError>;
}
