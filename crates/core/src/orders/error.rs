//! Order error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::status::{OrderKind, OrderStatus};

/// Errors that can occur during order operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    // ========== Validation Errors ==========
    /// Item quantity must be at least 1.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    /// Discount percent outside 0-100.
    #[error("Discount percent must be between 0 and 100, got {0}")]
    InvalidDiscount(Decimal),

    /// Tax rate outside 0-100.
    #[error("Tax rate must be between 0 and 100, got {0}")]
    InvalidTaxRate(Decimal),

    /// Unit price cannot be negative.
    #[error("Unit price cannot be negative")]
    NegativeUnitPrice,

    /// An amount exceeds the representable range.
    #[error("Amount is too large")]
    AmountOutOfRange,

    /// Received quantity cannot be negative.
    #[error("Received quantity cannot be negative")]
    NegativeReceivedQuantity,

    /// Sales orders need a customer, purchase orders a vendor.
    #[error("A {0} order requires a {party}", party = .0.party_name())]
    PartyMismatch(OrderKind),

    /// Status does not exist for this order kind.
    #[error("Status {status} is not valid for {kind} orders")]
    StatusNotAllowed {
        /// The order kind.
        kind: OrderKind,
        /// The requested status.
        status: OrderStatus,
    },

    // ========== State Errors ==========
    /// Cancelled orders cannot change.
    #[error("Order is cancelled")]
    OrderClosed,
}

impl OrderError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidDiscount(_) => "INVALID_DISCOUNT",
            Self::InvalidTaxRate(_) => "INVALID_TAX_RATE",
            Self::NegativeUnitPrice => "NEGATIVE_UNIT_PRICE",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            Self::NegativeReceivedQuantity => "NEGATIVE_RECEIVED_QUANTITY",
            Self::PartyMismatch(_) => "PARTY_MISMATCH",
            Self::StatusNotAllowed { .. } => "STATUS_NOT_ALLOWED",
            Self::OrderClosed => "ORDER_CLOSED",
        }
    }

    /// Returns true for state errors, as opposed to bad input.
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(self, Self::OrderClosed)
    }
}
