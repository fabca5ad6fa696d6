//! Journal entry domain types.

use conciliador_shared::config::AccountRef;
use conciliador_shared::types::{CompanyId, Currency, JournalEntryId, LedgerId, Period};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::JournalError;

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit (increases assets/expenses).
    Debit,
    /// Credit (increases liabilities/revenue).
    Credit,
}

impl EntryType {
    /// The other side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// One line of a journal entry. Exactly one of the amounts is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account code.
    pub account_code: String,
    /// Account display name.
    pub account_name: String,
    /// Line memo.
    #[serde(default)]
    pub description: Option<String>,
    /// Debit amount, zero on credit lines.
    #[serde(default)]
    pub debit_amount: Decimal,
    /// Credit amount, zero on debit lines.
    #[serde(default)]
    pub credit_amount: Decimal,
}

impl JournalLine {
    /// A debit line.
    #[must_use]
    pub fn debit(account: &AccountRef, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            description: Some(description.into()),
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
        }
    }

    /// A credit line.
    #[must_use]
    pub fn credit(account: &AccountRef, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            description: Some(description.into()),
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
        }
    }

    /// A line on `side`, or on the opposite side for a negative amount.
    ///
    /// Returns `None` for a zero amount.
    #[must_use]
    pub fn on_side(
        account: &AccountRef,
        side: EntryType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Option<Self> {
        if amount.is_zero() {
            return None;
        }
        let side = if amount.is_sign_negative() {
            side.opposite()
        } else {
            side
        };
        let amount = amount.abs();
        Some(match side {
            EntryType::Debit => Self::debit(account, amount, description),
            EntryType::Credit => Self::credit(account, amount, description),
        })
    }

    /// Which side the line is on. `None` for a malformed line.
    #[must_use]
    pub fn side(&self) -> Option<EntryType> {
        match (self.debit_amount.is_zero(), self.credit_amount.is_zero()) {
            (false, true) => Some(EntryType::Debit),
            (true, false) => Some(EntryType::Credit),
            _ => None,
        }
    }

    /// The non-zero amount of the line.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit_amount + self.credit_amount
    }

    /// Checks the line carries one positive amount on one side.
    pub fn validate(&self) -> Result<(), JournalError> {
        if self.account_code.trim().is_empty() {
            return Err(JournalError::InvalidLine("account code is empty".to_string()));
        }
        if self.debit_amount.is_sign_negative() || self.credit_amount.is_sign_negative() {
            return Err(JournalError::InvalidLine(format!(
                "negative amount on account {}",
                self.account_code
            )));
        }
        if self.side().is_none() {
            return Err(JournalError::InvalidLine(format!(
                "account {} needs exactly one of debit or credit",
                self.account_code
            )));
        }
        Ok(())
    }
}

/// Journal entry lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Proposed, still editable.
    #[default]
    Preliminary,
    /// Posted to the ledger, immutable.
    Posted,
}

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Totals from explicit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Totals of a set of lines.
    #[must_use]
    pub fn from_lines(lines: &[JournalLine]) -> Self {
        let total_debit = lines.iter().map(|l| l.debit_amount).sum();
        let total_credit = lines.iter().map(|l| l.credit_amount).sum();
        Self::new(total_debit, total_credit)
    }

    /// `total_debit - total_credit`.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// A double-entry journal entry.
///
/// Totals are derived from the lines and recomputed on every mutation, so
/// `is_balanced` can never go stale. Once posted, lines are frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Accounting period.
    pub period: Period,
    /// Ledger the entry is filed under, if any.
    pub ledger_id: Option<LedgerId>,
    /// Entry description.
    pub description: String,
    /// Currency of every amount in the entry.
    pub currency: Currency,
    lines: Vec<JournalLine>,
    #[serde(flatten)]
    totals: JournalTotals,
    status: JournalStatus,
    entry_number: Option<i64>,
}

impl JournalEntry {
    /// An empty preliminary entry in CLP.
    #[must_use]
    pub fn new(company_id: CompanyId, period: Period, description: impl Into<String>) -> Self {
        Self {
            id: JournalEntryId::new(),
            company_id,
            period,
            ledger_id: None,
            description: description.into(),
            currency: Currency::Clp,
            lines: Vec::new(),
            totals: JournalTotals::default(),
            status: JournalStatus::Preliminary,
            entry_number: None,
        }
    }

    /// Files the entry under an existing ledger.
    #[must_use]
    pub fn with_ledger(mut self, ledger_id: Option<LedgerId>) -> Self {
        self.ledger_id = ledger_id;
        self
    }

    /// Sets the entry currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Builds a preliminary entry from a draft, validating every line.
    pub fn from_draft(draft: JournalEntryDraft) -> Result<Self, JournalError> {
        let mut entry = Self::new(draft.company_id, draft.period, draft.description)
            .with_ledger(draft.ledger_id)
            .with_currency(draft.currency);
        if let Some(id) = draft.id {
            entry.id = id;
        }
        for line in draft.lines {
            entry.add_line(line)?;
        }
        Ok(entry)
    }

    /// The entry's lines.
    #[must_use]
    pub fn lines(&self) -> &[JournalLine] {
        &self.lines
    }

    /// Current totals.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        self.totals
    }

    /// Sum of debits.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.totals.total_debit
    }

    /// Sum of credits.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.totals.total_credit
    }

    /// Whether debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.totals.is_balanced
    }

    /// Lifecycle status.
    #[must_use]
    pub fn status(&self) -> JournalStatus {
        self.status
    }

    /// Entry number assigned on posting.
    #[must_use]
    pub fn entry_number(&self) -> Option<i64> {
        self.entry_number
    }

    /// Whether the entry has been posted.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.status == JournalStatus::Posted
    }

    /// Appends a line and recomputes totals.
    pub fn add_line(&mut self, line: JournalLine) -> Result<(), JournalError> {
        self.ensure_mutable()?;
        line.validate()?;
        self.lines.push(line);
        self.recompute();
        Ok(())
    }

    /// Removes the line at `index` and recomputes totals.
    pub fn remove_line(&mut self, index: usize) -> Result<JournalLine, JournalError> {
        self.ensure_mutable()?;
        if index >= self.lines.len() {
            return Err(JournalError::LineNotFound(index));
        }
        let line = self.lines.remove(index);
        self.recompute();
        Ok(line)
    }

    pub(crate) fn mark_posted(&mut self, entry_number: i64) {
        self.status = JournalStatus::Posted;
        self.entry_number = Some(entry_number);
    }

    fn ensure_mutable(&self) -> Result<(), JournalError> {
        if self.is_posted() {
            return Err(JournalError::CannotModifyPosted);
        }
        Ok(())
    }

    fn recompute(&mut self) {
        self.totals = JournalTotals::from_lines(&self.lines);
    }
}

/// Deserializable shape of an unposted entry.
///
/// Accepts the serialized form of [`JournalEntry`]; derived fields
/// (totals, status, entry number) are ignored and recomputed.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalEntryDraft {
    /// Identifier to keep, if any.
    #[serde(default)]
    pub id: Option<JournalEntryId>,
    /// Owning company.
    pub company_id: CompanyId,
    /// Accounting period.
    pub period: Period,
    /// Ledger the entry is filed under, if any.
    #[serde(default)]
    pub ledger_id: Option<LedgerId>,
    /// Entry description.
    pub description: String,
    /// Currency.
    #[serde(default)]
    pub currency: Currency,
    /// Lines.
    pub lines: Vec<JournalLine>,
}
