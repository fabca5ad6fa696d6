//! In-memory record store.

use async_trait::async_trait;
use conciliador_shared::types::{CompanyId, Period};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{RecordStore, StoreError};
use crate::journal::{JournalEntry, PostingReceipt};
use crate::payroll::{EmployeeProfile, LiquidationRecord, PayrollBook};

/// A `RecordStore` backed by concurrent hash maps.
///
/// Posting serializes per company through the map entry lock, so entry
/// numbers never repeat even under concurrent posting.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    books: DashMap<(CompanyId, Period), PayrollBook>,
    liquidations: DashMap<(CompanyId, Period), Vec<LiquidationRecord>>,
    profiles: DashMap<CompanyId, Vec<EmployeeProfile>>,
    journal: DashMap<CompanyId, Vec<JournalEntry>>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a payroll book.
    pub fn insert_book(&self, book: PayrollBook) {
        self.books.insert((book.company_id, book.period), book);
    }

    /// Appends liquidation records for a company and period.
    pub fn insert_liquidations(
        &self,
        company_id: CompanyId,
        period: Period,
        records: impl IntoIterator<Item = LiquidationRecord>,
    ) {
        self.liquidations
            .entry((company_id, period))
            .or_default()
            .extend(records);
    }

    /// Adds an employee profile to its company.
    pub fn insert_profile(&self, profile: EmployeeProfile) {
        self.profiles
            .entry(profile.employee.company_id)
            .or_default()
            .push(profile);
    }

    /// Entries posted for a company, in posting order.
    #[must_use]
    pub fn posted_entries(&self, company_id: CompanyId) -> Vec<JournalEntry> {
        self.journal
            .get(&company_id)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Number of entries posted for a company.
    #[must_use]
    pub fn posted_count(&self, company_id: CompanyId) -> usize {
        self.journal.get(&company_id).map_or(0, |entries| entries.len())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_payroll_book(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<Option<PayrollBook>, StoreError> {
        Ok(self
            .books
            .get(&(company_id, period))
            .map(|book| book.clone()))
    }

    async fn save_payroll_book(&self, book: &PayrollBook) -> Result<(), StoreError> {
        match self.books.entry((book.company_id, book.period)) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "payroll book for company {} period {} already exists",
                book.company_id, book.period
            ))),
            Entry::Vacant(slot) => {
                slot.insert(book.clone());
                Ok(())
            }
        }
    }

    async fn list_liquidations(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<Vec<LiquidationRecord>, StoreError> {
        Ok(self
            .liquidations
            .get(&(company_id, period))
            .map(|records| records.clone())
            .unwrap_or_default())
    }

    async fn list_employee_profiles(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<EmployeeProfile>, StoreError> {
        Ok(self
            .profiles
            .get(&company_id)
            .map(|profiles| profiles.clone())
            .unwrap_or_default())
    }

    async fn post_journal_entry(
        &self,
        company_id: CompanyId,
        _period: Period,
        entry: &JournalEntry,
    ) -> Result<PostingReceipt, StoreError> {
        if !entry.is_balanced() {
            return Err(StoreError::Unbalanced {
                debit: entry.total_debit(),
                credit: entry.total_credit(),
            });
        }

        let mut journal = self.journal.entry(company_id).or_default();
        let last = journal
            .iter()
            .filter_map(JournalEntry::entry_number)
            .max()
            .unwrap_or(0);
        let entry_number = last + 1;

        let mut stored = entry.clone();
        stored.mark_posted(entry_number);
        journal.push(stored);

        Ok(PostingReceipt::for_entry(entry, entry_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{EntryType, JournalLine};
    use conciliador_shared::config::AccountRef;
    use rust_decimal_macros::dec;

    fn entry(company_id: CompanyId, debit: rust_decimal::Decimal) -> JournalEntry {
        let mut entry = JournalEntry::new(company_id, Period::new(2024, 3).unwrap(), "Test");
        let cash = AccountRef::new("1.1.01.001", "Caja");
        let sales = AccountRef::new("4.1.01.001", "Ventas");
        entry
            .add_line(JournalLine::on_side(&cash, EntryType::Debit, debit, "a").unwrap())
            .unwrap();
        entry
            .add_line(JournalLine::credit(&sales, dec!(100), "b"))
            .unwrap();
        entry
    }

    #[tokio::test]
    async fn test_save_book_refuses_overwrite() {
        let store = InMemoryRecordStore::new();
        let book = PayrollBook::from_details(CompanyId::new(), Period::new(2024, 3).unwrap(), vec![]);

        store.save_payroll_book(&book).await.unwrap();
        let err = store.save_payroll_book(&book).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(
            store.get_payroll_book(book.company_id, book.period).await.unwrap(),
            Some(book)
        );
    }

    #[tokio::test]
    async fn test_entry_numbers_are_per_company() {
        let store = InMemoryRecordStore::new();
        let a = CompanyId::new();
        let b = CompanyId::new();
        let period = Period::new(2024, 3).unwrap();

        let first = store.post_journal_entry(a, period, &entry(a, dec!(100))).await.unwrap();
        let other = store.post_journal_entry(b, period, &entry(b, dec!(100))).await.unwrap();
        let second = store.post_journal_entry(a, period, &entry(a, dec!(100))).await.unwrap();

        assert_eq!(first.entry_number, 1);
        assert_eq!(other.entry_number, 1);
        assert_eq!(second.entry_number, 2);
        assert_eq!(store.posted_entries(a)[1].entry_number(), Some(2));
        assert!(store.posted_entries(a).iter().all(JournalEntry::is_posted));
    }

    #[tokio::test]
    async fn test_store_refuses_unbalanced_entry() {
        let store = InMemoryRecordStore::new();
        let company_id = CompanyId::new();

        let err = store
            .post_journal_entry(company_id, Period::new(2024, 3).unwrap(), &entry(company_id, dec!(90)))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Unbalanced { .. }));
        assert_eq!(store.posted_count(company_id), 0);
    }

    #[tokio::test]
    async fn test_missing_keys_are_empty() {
        let store = InMemoryRecordStore::new();
        let company_id = CompanyId::new();
        let period = Period::new(2024, 3).unwrap();

        assert_eq!(store.get_payroll_book(company_id, period).await.unwrap(), None);
        assert!(store.list_liquidations(company_id, period).await.unwrap().is_empty());
        assert!(store.list_employee_profiles(company_id).await.unwrap().is_empty());
    }
}
