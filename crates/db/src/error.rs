//! Folding of repository and domain errors into [`AppError`].
//!
//! Every repository error enum implements `From<_> for AppError` in its own
//! module using these helpers, so the API layer only ever sees `AppError`.

use orbis_core::billing::BillingError;
use orbis_core::inventory::InventoryError;
use orbis_core::ledger::LedgerError;
use orbis_core::orders::OrderError;
use orbis_core::reports::ReportError;
use orbis_shared::AppError;
use sea_orm::{DbErr, SqlErr};

/// Maps a database error, turning unique violations into conflicts.
pub(crate) fn database(err: &DbErr) -> AppError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return AppError::Conflict(detail);
    }
    tracing::error!(error = %err, "database error");
    AppError::Database(err.to_string())
}

pub(crate) fn ledger(err: &LedgerError) -> AppError {
    match err.http_status_code() {
        404 => AppError::NotFound(err.to_string()),
        409 => AppError::Conflict(err.to_string()),
        _ => AppError::Validation(err.to_string()),
    }
}

pub(crate) fn order(err: &OrderError) -> AppError {
    if err.is_state_error() {
        AppError::BusinessRule(err.to_string())
    } else {
        AppError::Validation(err.to_string())
    }
}

pub(crate) fn billing(err: &BillingError) -> AppError {
    if err.is_conflict() {
        AppError::Conflict(err.to_string())
    } else {
        AppError::Validation(err.to_string())
    }
}

pub(crate) fn inventory(err: &InventoryError) -> AppError {
    match err {
        InventoryError::InsufficientStock { .. } => AppError::BusinessRule(err.to_string()),
        _ => AppError::Validation(err.to_string()),
    }
}

pub(crate) fn report(err: &ReportError) -> AppError {
    AppError::Validation(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unbalanced_entry_is_validation() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(100),
            credit: dec!(90),
        };
        assert_eq!(ledger(&err).status_code(), 400);
    }

    #[test]
    fn test_unknown_account_is_not_found() {
        assert_eq!(ledger(&LedgerError::AccountNotFound(7)).status_code(), 404);
    }

    #[test]
    fn test_double_application_is_conflict() {
        assert_eq!(billing(&BillingError::AlreadyApplied).status_code(), 409);
        assert_eq!(billing(&BillingError::NegativeDiscount).status_code(), 400);
    }

    #[test]
    fn test_out_of_range_and_link_errors_are_validation() {
        assert_eq!(billing(&BillingError::AmountOutOfRange).status_code(), 400);
        assert_eq!(billing(&BillingError::OrderKindMismatch).status_code(), 400);
        assert_eq!(order(&OrderError::AmountOutOfRange).status_code(), 400);
    }

    #[test]
    fn test_closed_order_is_business_rule() {
        assert_eq!(order(&OrderError::OrderClosed).status_code(), 422);
    }

    #[test]
    fn test_insufficient_stock_is_business_rule() {
        let err = InventoryError::InsufficientStock {
            on_hand: 1,
            requested: 5,
        };
        assert_eq!(inventory(&err).status_code(), 422);
    }
}
