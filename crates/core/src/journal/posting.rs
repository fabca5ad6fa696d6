//! Posting journal entries to the record store.

use conciliador_shared::types::CompanyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::JournalError;
use super::types::JournalEntry;
use crate::store::RecordStore;

/// What the store reports back after posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingReceipt {
    /// Entry number, increasing per company.
    pub entry_number: i64,
    /// Number of lines written.
    pub total_lines: usize,
    /// Total debit written.
    pub total_debit: Decimal,
    /// Total credit written.
    pub total_credit: Decimal,
}

impl PostingReceipt {
    /// Receipt for `entry` posted under `entry_number`.
    #[must_use]
    pub fn for_entry(entry: &JournalEntry, entry_number: i64) -> Self {
        Self {
            entry_number,
            total_lines: entry.lines().len(),
            total_debit: entry.total_debit(),
            total_credit: entry.total_credit(),
        }
    }
}

/// A posted entry with its receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedJournalEntry {
    /// The entry, now immutable.
    pub entry: JournalEntry,
    /// Store receipt.
    pub receipt: PostingReceipt,
}

/// Gated posting of preliminary entries.
///
/// Posting the same entry twice is the caller's problem: the poster checks
/// the status of the value it is handed, nothing more.
pub struct JournalPoster;

impl JournalPoster {
    /// Posts `entry` for `company_id`.
    ///
    /// Requires a preliminary, balanced entry of at least two lines that
    /// belongs to `company_id`. The store is not called unless every check
    /// passes.
    ///
    /// # Errors
    ///
    /// - `JournalError::AlreadyPosted` if the entry carries an entry number
    /// - `JournalError::CompanyMismatch` if the entry is for another company
    /// - `JournalError::UnbalancedEntry` with the entry returned unchanged
    /// - `JournalError::InsufficientLines` for a balanced entry with fewer
    ///   than two lines (i.e. an empty one)
    /// - `JournalError::Store` if the store write fails
    pub async fn post<S>(
        store: &S,
        company_id: CompanyId,
        mut entry: JournalEntry,
    ) -> Result<PostedJournalEntry, JournalError>
    where
        S: RecordStore + ?Sized,
    {
        if let Some(number) = entry.entry_number() {
            return Err(JournalError::AlreadyPosted(number));
        }
        if entry.company_id != company_id {
            return Err(JournalError::CompanyMismatch {
                entry: entry.company_id,
                requested: company_id,
            });
        }
        // Every one-line entry is unbalanced; it must come back as such.
        if !entry.is_balanced() {
            return Err(JournalError::UnbalancedEntry {
                debit: entry.total_debit(),
                credit: entry.total_credit(),
                entry: Box::new(entry),
            });
        }
        if entry.lines().len() < 2 {
            return Err(JournalError::InsufficientLines);
        }

        let receipt = store
            .post_journal_entry(company_id, entry.period, &entry)
            .await?;
        entry.mark_posted(receipt.entry_number);

        info!(
            company_id = %company_id,
            period = %entry.period,
            entry_id = %entry.id,
            entry_number = receipt.entry_number,
            total_debit = %receipt.total_debit,
            "Journal entry posted"
        );

        Ok(PostedJournalEntry { entry, receipt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::balancer::{JournalBalancer, JournalOptions};
    use crate::journal::rcv::{RcvRegister, RcvSummary, RcvTotals};
    use crate::journal::types::{JournalLine, JournalStatus};
    use crate::store::{InMemoryRecordStore, MockRecordStore, StoreError};
    use conciliador_shared::config::AccountRef;
    use conciliador_shared::types::Period;
    use rust_decimal_macros::dec;

    fn period() -> Period {
        Period::new(2024, 3).unwrap()
    }

    fn proposal_entry(company_id: CompanyId, total: Decimal) -> JournalEntry {
        let summary = RcvSummary {
            register: RcvRegister::Purchases,
            period: period(),
            totals: RcvTotals {
                document_count: 12,
                exempt_amount: dec!(0),
                net_amount: dec!(7176471),
                iva_amount: dec!(1363529),
                total_amount: total,
                calculated_amount: dec!(8540000),
            },
            entities: vec![],
        };
        JournalBalancer::propose(company_id, &summary, period(), &JournalOptions::default())
            .unwrap()
            .entry
    }

    #[tokio::test]
    async fn test_post_balanced_entries_increments_number() {
        let store = InMemoryRecordStore::new();
        let company_id = CompanyId::new();

        let first = JournalPoster::post(&store, company_id, proposal_entry(company_id, dec!(8540000)))
            .await
            .unwrap();
        let second = JournalPoster::post(&store, company_id, proposal_entry(company_id, dec!(8540000)))
            .await
            .unwrap();

        assert_eq!(first.receipt.entry_number, 1);
        assert_eq!(second.receipt.entry_number, 2);
        assert_eq!(first.receipt.total_lines, 3);
        assert_eq!(first.receipt.total_debit, dec!(8540000));
        assert_eq!(first.receipt.total_credit, dec!(8540000));
        assert_eq!(first.entry.status(), JournalStatus::Posted);
        assert_eq!(first.entry.entry_number(), Some(1));
        assert_eq!(store.posted_count(company_id), 2);
    }

    #[tokio::test]
    async fn test_unbalanced_entry_is_refused_and_returned() {
        let store = InMemoryRecordStore::new();
        let company_id = CompanyId::new();
        let entry = proposal_entry(company_id, dec!(8400000));
        let original = entry.clone();

        let err = JournalPoster::post(&store, company_id, entry).await.unwrap_err();

        match err {
            JournalError::UnbalancedEntry { debit, credit, entry } => {
                assert_eq!(debit, dec!(8540000));
                assert_eq!(credit, dec!(8400000));
                assert_eq!(*entry, original);
                assert_eq!(entry.status(), JournalStatus::Preliminary);
            }
            other => panic!("expected UnbalancedEntry, got {other:?}"),
        }
        assert_eq!(store.posted_count(company_id), 0);
    }

    #[tokio::test]
    async fn test_one_line_proposal_is_returned_as_unbalanced() {
        let mut store = MockRecordStore::new();
        store.expect_post_journal_entry().times(0);
        let company_id = CompanyId::new();
        let summary = RcvSummary {
            register: RcvRegister::Purchases,
            period: period(),
            totals: RcvTotals {
                document_count: 1,
                exempt_amount: dec!(0),
                net_amount: dec!(8540000),
                iva_amount: dec!(0),
                total_amount: dec!(0),
                calculated_amount: dec!(0),
            },
            entities: vec![],
        };
        let entry = JournalBalancer::propose(company_id, &summary, period(), &JournalOptions::default())
            .unwrap()
            .entry;
        assert_eq!(entry.lines().len(), 1);
        let original = entry.clone();

        let err = JournalPoster::post(&store, company_id, entry).await.unwrap_err();

        match err {
            JournalError::UnbalancedEntry { debit, credit, entry } => {
                assert_eq!(debit, dec!(8540000));
                assert_eq!(credit, dec!(0));
                assert_eq!(*entry, original);
            }
            other => panic!("expected UnbalancedEntry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unbalanced_entry_never_reaches_store() {
        let mut store = MockRecordStore::new();
        store.expect_post_journal_entry().times(0);
        let company_id = CompanyId::new();

        let result =
            JournalPoster::post(&store, company_id, proposal_entry(company_id, dec!(8400000))).await;

        assert!(matches!(result, Err(JournalError::UnbalancedEntry { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let mut store = MockRecordStore::new();
        store
            .expect_post_journal_entry()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Backend("connection reset".to_string())));
        let company_id = CompanyId::new();

        let result =
            JournalPoster::post(&store, company_id, proposal_entry(company_id, dec!(8540000))).await;

        assert!(matches!(result, Err(JournalError::Store(StoreError::Backend(_)))));
    }

    #[tokio::test]
    async fn test_posting_preconditions() {
        let store = InMemoryRecordStore::new();
        let company_id = CompanyId::new();

        let foreign = proposal_entry(CompanyId::new(), dec!(8540000));
        assert!(matches!(
            JournalPoster::post(&store, company_id, foreign).await,
            Err(JournalError::CompanyMismatch { .. })
        ));

        let mut single = JournalEntry::new(company_id, period(), "Una línea");
        single
            .add_line(JournalLine::debit(&AccountRef::new("1", "Caja"), dec!(10), "x"))
            .unwrap();
        assert!(matches!(
            JournalPoster::post(&store, company_id, single).await,
            Err(JournalError::UnbalancedEntry { .. })
        ));

        let empty = JournalEntry::new(company_id, period(), "Sin líneas");
        assert!(matches!(
            JournalPoster::post(&store, company_id, empty).await,
            Err(JournalError::InsufficientLines)
        ));

        let posted = JournalPoster::post(&store, company_id, proposal_entry(company_id, dec!(8540000)))
            .await
            .unwrap();
        assert!(matches!(
            JournalPoster::post(&store, company_id, posted.entry).await,
            Err(JournalError::AlreadyPosted(1))
        ));
        assert_eq!(store.posted_count(company_id), 1);
    }
}
