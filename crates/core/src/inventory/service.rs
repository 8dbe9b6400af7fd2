//! Inventory service: stock movements, availability and reservations.

use orbis_shared::types::ProductId;
use rust_decimal::Decimal;

use super::error::InventoryError;
use super::types::{
    Allocation, InventoryTransactionType, NewInventoryTransaction, ReservationPlan, StockLevel,
    StockWarning,
};

/// Inventory service.
///
/// Pure logic; the caller loads and locks the affected stock rows and writes
/// them back inside one transaction.
pub struct InventoryService;

impl InventoryService {
    /// Returns true if `quantity` units are available in the given stock row.
    ///
    /// A missing row means nothing is available.
    #[must_use]
    pub fn check_stock_availability(stock: Option<&StockLevel>, quantity: i32) -> bool {
        stock.is_some_and(|s| s.quantity_available >= quantity)
    }

    /// Validates a movement before it is recorded.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive quantity (negative for
    /// adjustments) or a negative unit cost.
    pub fn validate_transaction(input: &NewInventoryTransaction) -> Result<(), InventoryError> {
        let min = match input.transaction_type {
            InventoryTransactionType::Adjustment => 0,
            _ => 1,
        };
        if input.quantity < min {
            return Err(InventoryError::InvalidQuantity(input.quantity));
        }
        if input.unit_cost < Decimal::ZERO {
            return Err(InventoryError::NegativeUnitCost);
        }
        Ok(())
    }

    /// Applies a movement to a stock row.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is invalid or would leave negative
    /// stock on hand. The row is left unchanged on error.
    pub fn apply_transaction(
        stock: &mut StockLevel,
        input: &NewInventoryTransaction,
    ) -> Result<(), InventoryError> {
        Self::validate_transaction(input)?;

        let on_hand = input
            .transaction_type
            .apply(stock.quantity_on_hand, input.quantity);
        if on_hand < 0 {
            return Err(InventoryError::InsufficientStock {
                on_hand: stock.quantity_on_hand,
                requested: input.quantity,
            });
        }

        stock.quantity_on_hand = on_hand;
        stock.recompute_available();
        Ok(())
    }

    /// Spreads `quantity` over the given stock rows in slice order.
    ///
    /// Each row contributes up to its available quantity until the request is
    /// covered. Any remainder is reported as `shortfall`.
    #[must_use]
    pub fn plan_reservation(stocks: &[StockLevel], quantity: i32) -> ReservationPlan {
        let mut remaining = quantity.max(0);
        let mut allocations = Vec::new();

        for stock in stocks {
            if remaining == 0 {
                break;
            }
            let take = stock.quantity_available.min(remaining);
            if take > 0 {
                allocations.push(Allocation {
                    warehouse_id: stock.warehouse_id,
                    quantity: take,
                });
                remaining -= take;
            }
        }

        ReservationPlan {
            allocations,
            requested: quantity,
            shortfall: remaining,
        }
    }

    /// Applies a reservation plan to the stock rows it was planned against.
    pub fn apply_reservation(stocks: &mut [StockLevel], plan: &ReservationPlan) {
        for allocation in &plan.allocations {
            if let Some(stock) = stocks
                .iter_mut()
                .find(|s| s.warehouse_id == allocation.warehouse_id)
            {
                stock.quantity_reserved += allocation.quantity;
                stock.recompute_available();
            }
        }
    }

    /// Returns the warning to surface when `requested` units of a product
    /// are ordered, given all of its stock rows.
    #[must_use]
    pub fn availability_warning(
        product_id: ProductId,
        stocks: &[StockLevel],
        requested: i32,
    ) -> Option<StockWarning> {
        if stocks.is_empty() {
            return Some(StockWarning::NoInventoryRecord { product_id });
        }
        let available: i32 = stocks.iter().map(|s| s.quantity_available.max(0)).sum();
        (requested > available).then_some(StockWarning::InsufficientStock {
            product_id,
            requested,
            available,
        })
    }

    /// Validates reorder settings.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is negative.
    pub fn validate_reorder_settings(
        reorder_point: i32,
        reorder_quantity: i32,
    ) -> Result<(), InventoryError> {
        if reorder_point < 0 || reorder_quantity < 0 {
            return Err(InventoryError::InvalidReorderSettings);
        }
        Ok(())
    }
}
