//! Inventory ledger.
//!
//! Stock is tracked per (product, warehouse) row with on-hand, reserved and
//! available quantities, where `available = on_hand - reserved` always holds.
//! Movements are recorded as transactions; reservations are planned across
//! warehouses and never fail, they only report a shortfall.

pub mod error;
pub mod service;
pub mod types;

pub use error::InventoryError;
pub use service::InventoryService;
pub use types::{
    Allocation, InventoryTransactionType, NewInventoryTransaction, ReservationPlan, StockLevel,
    StockWarning,
};
