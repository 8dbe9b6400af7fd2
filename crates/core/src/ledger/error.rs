//! Ledger error types for validation and lookup errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Journal entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amounts cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Line carries neither a debit nor a credit.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line carries both a debit and a credit.
    #[error("Line must specify either debit or credit, not both")]
    DoubleSidedLine,

    /// Entry description is empty.
    #[error("Journal entry description is required")]
    MissingDescription,

    /// Account code is empty.
    #[error("Account code is required")]
    MissingAccountCode,

    /// Parent account is of a different type than the child.
    #[error("Parent account {0} has a different account type")]
    ParentTypeMismatch(i32),

    // ========== Lookup Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(i32),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(i32),

    // ========== State Errors ==========
    /// Account code is already taken.
    #[error("Account code {0} already exists")]
    DuplicateAccountCode(String),

    /// Posted entries cannot be changed.
    #[error("Journal entry is already posted")]
    AlreadyPosted,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::DoubleSidedLine => "DOUBLE_SIDED_LINE",
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::MissingAccountCode => "MISSING_ACCOUNT_CODE",
            Self::ParentTypeMismatch(_) => "PARENT_TYPE_MISMATCH",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::AlreadyPosted => "ALREADY_POSTED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines
            | Self::UnbalancedEntry { .. }
            | Self::NegativeAmount
            | Self::ZeroAmount
            | Self::DoubleSidedLine
            | Self::MissingDescription
            | Self::MissingAccountCode
            | Self::ParentTypeMismatch(_)
            | Self::AccountInactive(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) => 404,

            // 409 Conflict
            Self::DuplicateAccountCode(_) | Self::AlreadyPosted => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InsufficientLines.error_code(), "INSUFFICIENT_LINES");
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit: Decimal::new(100, 2),
                credit: Decimal::new(50, 2),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(LedgerError::NegativeAmount.error_code(), "NEGATIVE_AMOUNT");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InsufficientLines.http_status_code(), 400);
        assert_eq!(LedgerError::AccountNotFound(7).http_status_code(), 404);
        assert_eq!(
            LedgerError::DuplicateAccountCode("100".into()).http_status_code(),
            409
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: Decimal::new(10000, 2),
            credit: Decimal::new(5000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }
}
