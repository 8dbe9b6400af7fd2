//! Inventory error types.

use thiserror::Error;

/// Errors that can occur when moving stock.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Quantity must be positive (non-negative for adjustments).
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    /// Unit cost cannot be negative.
    #[error("Unit cost cannot be negative")]
    NegativeUnitCost,

    /// The movement would take on-hand stock below zero.
    #[error("Insufficient stock: {on_hand} on hand, {requested} requested")]
    InsufficientStock {
        /// Quantity on hand before the movement.
        on_hand: i32,
        /// Quantity the movement removes.
        requested: i32,
    },

    /// Reorder settings cannot be negative.
    #[error("Reorder point and quantity cannot be negative")]
    InvalidReorderSettings,
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::NegativeUnitCost => "NEGATIVE_UNIT_COST",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::InvalidReorderSettings => "INVALID_REORDER_SETTINGS",
        }
    }
}
