//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Account types and their normal balance side
//! - The default chart of accounts and balance-sheet code buckets
//! - Journal entries and their lines
//! - Business rule validation (single-sided lines, debits = credits)
//! - Balance calculation from posted debit and credit totals
//! - Ledger service used by the persistence layer before writing

pub mod account;
pub mod balance;
pub mod chart;
pub mod entry;
pub mod error;
pub mod service;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use account::{Account, AccountType, NewAccount, NormalBalance};
pub use balance::AccountBalance;
pub use chart::{BalanceSheetBucket, DEFAULT_CHART, DefaultAccount, RETAINED_EARNINGS_CODE};
pub use entry::{JournalEntryType, JournalLineInput, JournalTotals, NewJournalEntry, PostingStatus};
pub use error::LedgerError;
pub use service::{AccountInfo, LedgerService};
pub use validation::validate_lines;
