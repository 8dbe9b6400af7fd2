//! Human-readable document numbers.
//!
//! Every number is `format(scope, n)` where `n` comes from a per-scope
//! counter that the persistence layer advances inside the creating
//! transaction. Scopes are independent: a sales invoice never consumes a
//! purchase invoice number, and each calendar day or month starts at 1.

use chrono::{Datelike, NaiveDate};

use crate::billing::InvoiceType;

/// Category code used for products without a usable category.
pub const GENERAL_CATEGORY_CODE: &str = "GN";

/// A numbering sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequenceScope {
    /// `SO{YYYY}{MM}{NNNN}`, restarting each month.
    SalesOrder {
        /// Calendar year.
        year: i32,
        /// Calendar month, 1-12.
        month: u32,
    },
    /// `PO{NNNNNN}`, one global sequence.
    PurchaseOrder,
    /// `{SI|PI}-{YYYYMMDD}-{NNNN}`, per type and day.
    Invoice {
        /// Sales or purchase.
        invoice_type: InvoiceType,
        /// Issue date.
        date: NaiveDate,
    },
    /// `PAY{NNNNNN}`, one global sequence.
    Payment,
    /// `RCPT{NNNNNN}`, one global sequence for receipts only.
    Receipt,
    /// `JE-{YYYYMMDD}-{NNNN}`, per entry date.
    JournalEntry {
        /// Entry date.
        date: NaiveDate,
    },
    /// `C{YY}{MM}{NNNN}`, restarting each month.
    Customer {
        /// Calendar year.
        year: i32,
        /// Calendar month, 1-12.
        month: u32,
    },
    /// `V{YY}{MM}{NNNN}`, restarting each month.
    Vendor {
        /// Calendar year.
        year: i32,
        /// Calendar month, 1-12.
        month: u32,
    },
    /// `{CC}{YY}{MM}{NNNN}`, per category code and month.
    Product {
        /// Two-letter category code.
        category_code: String,
        /// Calendar year.
        year: i32,
        /// Calendar month, 1-12.
        month: u32,
    },
}

impl SequenceScope {
    /// Sales order scope for the month containing `date`.
    #[must_use]
    pub fn sales_order(date: NaiveDate) -> Self {
        Self::SalesOrder {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Customer code scope for the month containing `date`.
    #[must_use]
    pub fn customer(date: NaiveDate) -> Self {
        Self::Customer {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Vendor code scope for the month containing `date`.
    #[must_use]
    pub fn vendor(date: NaiveDate) -> Self {
        Self::Vendor {
            year: date.year(),
            month: date.month(),
        }
    }

    /// SKU scope for a product category in the month containing `date`.
    #[must_use]
    pub fn product(category: Option<&str>, date: NaiveDate) -> Self {
        Self::Product {
            category_code: category_code(category),
            year: date.year(),
            month: date.month(),
        }
    }

    /// Row key of this scope in the counter table.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::SalesOrder { year, month } => format!("sales_order:{year:04}{month:02}"),
            Self::PurchaseOrder => "purchase_order".to_string(),
            Self::Invoice { invoice_type, date } => {
                format!("invoice:{}:{}", invoice_type.prefix(), date.format("%Y%m%d"))
            }
            Self::Payment => "payment".to_string(),
            Self::Receipt => "receipt".to_string(),
            Self::JournalEntry { date } => format!("journal_entry:{}", date.format("%Y%m%d")),
            Self::Customer { year, month } => format!("customer:{year:04}{month:02}"),
            Self::Vendor { year, month } => format!("vendor:{year:04}{month:02}"),
            Self::Product {
                category_code,
                year,
                month,
            } => format!("product:{category_code}:{year:04}{month:02}"),
        }
    }

    /// Formats the `seq`-th number of this scope (1-based).
    #[must_use]
    pub fn format(&self, seq: i64) -> String {
        match self {
            Self::SalesOrder { year, month } => format!("SO{year:04}{month:02}{seq:04}"),
            Self::PurchaseOrder => format!("PO{seq:06}"),
            Self::Invoice { invoice_type, date } => format!(
                "{}-{}-{seq:04}",
                invoice_type.prefix(),
                date.format("%Y%m%d")
            ),
            Self::Payment => format!("PAY{seq:06}"),
            Self::Receipt => format!("RCPT{seq:06}"),
            Self::JournalEntry { date } => format!("JE-{}-{seq:04}", date.format("%Y%m%d")),
            Self::Customer { year, month } => {
                format!("C{:02}{month:02}{seq:04}", year.rem_euclid(100))
            }
            Self::Vendor { year, month } => {
                format!("V{:02}{month:02}{seq:04}", year.rem_euclid(100))
            }
            Self::Product {
                category_code,
                year,
                month,
            } => format!("{category_code}{:02}{month:02}{seq:04}", year.rem_euclid(100)),
        }
    }
}

/// First two letters of the category name, uppercased, or `GN`.
#[must_use]
pub fn category_code(category: Option<&str>) -> String {
    let letters: String = category
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(2)
        .collect();
    if letters.len() == 2 {
        letters.to_ascii_uppercase()
    } else {
        GENERAL_CATEGORY_CODE.to_string()
    }
}
