//! Journal entries and their lines.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use orbis_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business origin of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryType {
    /// Entered by hand.
    #[default]
    Manual,
    /// Sales-related entry.
    Sales,
    /// Purchase-related entry.
    Purchase,
    /// Outgoing payment.
    Payment,
    /// Incoming receipt.
    Receipt,
    /// Correcting adjustment.
    Adjustment,
}

impl JournalEntryType {
    /// Returns the lowercase name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
            Self::Payment => "payment",
            Self::Receipt => "receipt",
            Self::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for JournalEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JournalEntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "sales" => Ok(Self::Sales),
            "purchase" => Ok(Self::Purchase),
            "payment" => Ok(Self::Payment),
            "receipt" => Ok(Self::Receipt),
            "adjustment" => Ok(Self::Adjustment),
            other => Err(format!("unknown journal entry type: {other}")),
        }
    }
}

/// Posting state of a journal entry.
///
/// The only transition is `Unposted -> Posted`; posted entries are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    /// Lines are not yet included in balances.
    Unposted,
    /// Lines are included in balances and can no longer change.
    Posted,
}

impl PostingStatus {
    /// Returns true if the entry may move to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (Self::Unposted, Self::Posted))
    }

    /// Value of the stored `is_posted` flag.
    #[must_use]
    pub const fn is_posted(self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// One requested line of a journal entry.
///
/// Exactly one of `debit` and `credit` must be positive; the other is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Account to post to.
    pub account_id: i32,
    /// Debit amount, zero for a credit line.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount, zero for a debit line.
    #[serde(default)]
    pub credit: Decimal,
    /// Optional line memo.
    #[serde(default)]
    pub description: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: i32, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: i32, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Attaches a memo to the line.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    /// Accounting date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Business origin.
    #[serde(default)]
    pub entry_type: JournalEntryType,
    /// Free-form reference (e.g. an invoice number).
    #[serde(default)]
    pub reference: Option<String>,
    /// The lines, in presentation order.
    pub lines: Vec<JournalLineInput>,
    /// User recording the entry.
    #[serde(default)]
    pub created_by: Option<UserId>,
}

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JournalTotals {
    /// Sum of all debits.
    pub total_debit: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
}

impl JournalTotals {
    /// Sums the lines of an entry.
    #[must_use]
    pub fn of(lines: &[JournalLineInput]) -> Self {
        Self {
            total_debit: lines.iter().map(|l| l.debit).sum(),
            total_credit: lines.iter().map(|l| l.credit).sum(),
        }
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }
}
