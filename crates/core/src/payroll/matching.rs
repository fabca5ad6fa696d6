//! RUT-keyed join between payroll book rows and liquidation records.
//!
//! The two sources are related only by business key: RUT within one company
//! and period. The index is built once per period so the join is a single
//! O(n) pass instead of a scan per row.

use std::collections::{HashMap, HashSet};

use conciliador_shared::types::{CompanyId, Period, Rut};
use tracing::debug;

use super::types::{LiquidationRecord, PayrollBook};

/// Lookup of liquidation records by employee RUT, scoped to one company and
/// period.
#[derive(Debug)]
pub struct LiquidationIndex<'a> {
    by_rut: HashMap<&'a Rut, &'a LiquidationRecord>,
    duplicates: Vec<&'a Rut>,
    out_of_scope: Vec<&'a LiquidationRecord>,
}

impl<'a> LiquidationIndex<'a> {
    /// Indexes the records of `company_id` and `period` by RUT.
    ///
    /// Records of another company or period are never joined; they are listed
    /// in [`out_of_scope`](Self::out_of_scope). When a RUT repeats, the first
    /// record is kept and the RUT is listed in [`duplicates`](Self::duplicates).
    #[must_use]
    pub fn build(records: &'a [LiquidationRecord], company_id: CompanyId, period: Period) -> Self {
        let mut by_rut = HashMap::with_capacity(records.len());
        let mut duplicates = Vec::new();
        let mut out_of_scope = Vec::new();

        for record in records {
            if record.company_id != company_id || record.period != period {
                out_of_scope.push(record);
            } else if by_rut.contains_key(&record.employee_rut) {
                duplicates.push(&record.employee_rut);
            } else {
                by_rut.insert(&record.employee_rut, record);
            }
        }

        debug!(
            records = records.len(),
            indexed = by_rut.len(),
            duplicates = duplicates.len(),
            out_of_scope = out_of_scope.len(),
            "Built liquidation index"
        );

        Self {
            by_rut,
            duplicates,
            out_of_scope,
        }
    }

    /// The record for `rut`, if any.
    #[must_use]
    pub fn get(&self, rut: &Rut) -> Option<&'a LiquidationRecord> {
        self.by_rut.get(rut).copied()
    }

    /// Number of distinct RUTs indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_rut.len()
    }

    /// True when no records were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_rut.is_empty()
    }

    /// RUTs that appeared more than once in the input (one entry per extra
    /// occurrence).
    #[must_use]
    pub fn duplicates(&self) -> &[&'a Rut] {
        &self.duplicates
    }

    /// Records of another company or period, in input order.
    #[must_use]
    pub fn out_of_scope(&self) -> &[&'a LiquidationRecord] {
        &self.out_of_scope
    }

    /// RUTs with a liquidation record but no row in `book`, sorted.
    #[must_use]
    pub fn orphans(&self, book: &PayrollBook) -> Vec<&'a Rut> {
        let in_book: HashSet<&Rut> = book.details.iter().map(|d| &d.employee_rut).collect();
        let mut orphans: Vec<&'a Rut> = self
            .by_rut
            .keys()
            .copied()
            .filter(|rut| !in_book.contains(rut))
            .collect();
        orphans.sort();
        orphans
    }
}
