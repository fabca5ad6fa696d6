//! RCV journal centralization.
//!
//! - RCV register summaries
//! - Journal entry types with derived balance
//! - Proposal of a balanced entry from a summary
//! - Gated posting through the record store

pub mod balancer;
pub mod error;
pub mod posting;
pub mod rcv;
pub mod types;

#[cfg(test)]
mod balancer_props;

pub use balancer::{JournalBalancer, JournalOptions, JournalProposal};
pub use error::JournalError;
pub use posting::{JournalPoster, PostedJournalEntry, PostingReceipt};
pub use rcv::{RcvEntitySummary, RcvRegister, RcvSummary, RcvTotals};
pub use types::{
    EntryType, JournalEntry, JournalEntryDraft, JournalLine, JournalStatus, JournalTotals,
};
