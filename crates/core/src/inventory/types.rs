//! Inventory domain types.

use std::fmt;
use std::str::FromStr;

use orbis_shared::types::{ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryTransactionType {
    /// Goods received.
    In,
    /// Goods issued.
    Out,
    /// Goods moved out of this warehouse.
    Transfer,
    /// Physical count; sets on-hand to the given quantity.
    Adjustment,
    /// Goods returned into stock.
    Return,
}

impl InventoryTransactionType {
    /// Returns the on-hand quantity after applying a movement of `quantity`.
    #[must_use]
    pub const fn apply(self, on_hand: i32, quantity: i32) -> i32 {
        match self {
            Self::In | Self::Return => on_hand + quantity,
            Self::Out | Self::Transfer => on_hand - quantity,
            Self::Adjustment => quantity,
        }
    }

    /// Returns the lowercase name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Transfer => "transfer",
            Self::Adjustment => "adjustment",
            Self::Return => "return",
        }
    }
}

impl fmt::Display for InventoryTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryTransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "transfer" => Ok(Self::Transfer),
            "adjustment" => Ok(Self::Adjustment),
            "return" => Ok(Self::Return),
            other => Err(format!("unknown inventory transaction type: {other}")),
        }
    }
}

/// Stock of one product in one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Product held.
    pub product_id: ProductId,
    /// Warehouse holding it.
    pub warehouse_id: i32,
    /// Warehouse name, the reservation order key.
    pub warehouse_name: String,
    /// Physical quantity.
    pub quantity_on_hand: i32,
    /// Quantity promised to committed orders.
    pub quantity_reserved: i32,
    /// `quantity_on_hand - quantity_reserved`.
    pub quantity_available: i32,
    /// Available quantity at or below which the row counts as low stock.
    pub reorder_point: i32,
    /// Suggested replenishment quantity.
    pub reorder_quantity: i32,
}

impl StockLevel {
    /// Creates an empty stock row.
    #[must_use]
    pub fn new(product_id: ProductId, warehouse_id: i32, warehouse_name: impl Into<String>) -> Self {
        Self {
            product_id,
            warehouse_id,
            warehouse_name: warehouse_name.into(),
            quantity_on_hand: 0,
            quantity_reserved: 0,
            quantity_available: 0,
            reorder_point: 0,
            reorder_quantity: 0,
        }
    }

    /// Re-derives `quantity_available` from on-hand and reserved.
    pub fn recompute_available(&mut self) {
        self.quantity_available = self.quantity_on_hand - self.quantity_reserved;
    }

    /// Returns true if available stock is at or below the reorder point.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.quantity_available <= self.reorder_point
    }
}

/// Input for recording a stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryTransaction {
    /// Product moved.
    pub product_id: ProductId,
    /// Warehouse affected.
    pub warehouse_id: i32,
    /// Kind of movement.
    pub transaction_type: InventoryTransactionType,
    /// Quantity moved, or the counted quantity for adjustments.
    pub quantity: i32,
    /// Cost per unit.
    #[serde(default)]
    pub unit_cost: Decimal,
    /// Kind of source document, e.g. `"purchase_order"`.
    #[serde(default)]
    pub reference_type: Option<String>,
    /// Identifier of the source document.
    #[serde(default)]
    pub reference_id: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// User recording the movement.
    #[serde(default)]
    pub created_by: Option<UserId>,
}

impl NewInventoryTransaction {
    /// `quantity * unit_cost`.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_cost
    }
}

/// Quantity reserved in one warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Warehouse the quantity is reserved in.
    pub warehouse_id: i32,
    /// Quantity reserved there.
    pub quantity: i32,
}

/// How a requested quantity is spread over warehouses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservationPlan {
    /// Per-warehouse reservations, in the order they were taken.
    pub allocations: Vec<Allocation>,
    /// Quantity requested.
    pub requested: i32,
    /// Quantity that could not be reserved.
    pub shortfall: i32,
}

impl ReservationPlan {
    /// Total quantity reserved.
    #[must_use]
    pub fn reserved(&self) -> i32 {
        self.allocations.iter().map(|a| a.quantity).sum()
    }
}

/// Non-fatal stock condition reported alongside a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockWarning {
    /// Less stock was available than requested.
    InsufficientStock {
        /// Product concerned.
        product_id: ProductId,
        /// Quantity requested.
        requested: i32,
        /// Quantity available across all warehouses.
        available: i32,
    },
    /// The product has no inventory row in any warehouse.
    NoInventoryRecord {
        /// Product concerned.
        product_id: ProductId,
    },
}

impl fmt::Display for StockWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientStock {
                product_id,
                requested,
                available,
            } => write!(
                f,
                "only {available} units of product {product_id} available, {requested} requested"
            ),
            Self::NoInventoryRecord { product_id } => {
                write!(f, "no inventory record for product {product_id}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(InventoryTransactionType::In, 10, 5, 15)]
    #[case(InventoryTransactionType::Return, 10, 5, 15)]
    #[case(InventoryTransactionType::Out, 10, 5, 5)]
    #[case(InventoryTransactionType::Transfer, 10, 5, 5)]
    #[case(InventoryTransactionType::Adjustment, 10, 7, 7)]
    fn test_apply(
        #[case] kind: InventoryTransactionType,
        #[case] on_hand: i32,
        #[case] quantity: i32,
        #[case] expected: i32,
    ) {
        assert_eq!(kind.apply(on_hand, quantity), expected);
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        let mut stock = StockLevel::new(ProductId::new(), 1, "Main");
        stock.quantity_on_hand = 12;
        stock.quantity_reserved = 2;
        stock.reorder_point = 10;
        stock.recompute_available();
        assert_eq!(stock.quantity_available, 10);
        assert!(stock.is_low_stock());

        stock.quantity_reserved = 1;
        stock.recompute_available();
        assert!(!stock.is_low_stock());
    }

    #[test]
    fn test_total_cost() {
        let tx = NewInventoryTransaction {
            product_id: ProductId::new(),
            warehouse_id: 1,
            transaction_type: InventoryTransactionType::In,
            quantity: 12,
            unit_cost: dec!(2.50),
            reference_type: None,
            reference_id: None,
            notes: None,
            created_by: None,
        };
        assert_eq!(tx.total_cost(), dec!(30.00));
    }
}
