//! Sales and purchase orders.
//!
//! Both order kinds share one model: a header with a party, rates and derived
//! totals, plus line items. Totals are recomputed explicitly by the caller
//! after each batch of item changes via [`OrderTotals::recompute`]. Status
//! changes go through [`transition`], which returns the side effects the
//! caller must execute.

pub mod error;
pub mod service;
pub mod status;
pub mod totals;
pub mod types;

#[cfg(test)]
mod totals_props;

pub use error::OrderError;
pub use service::{AddItemPlan, OrderService, PricedItem};
pub use status::{OrderEvent, OrderKind, OrderStatus, Transition, transition};
pub use totals::{OrderTotals, line_total};
pub use types::{NewOrder, NewOrderItem, Order, OrderItem, OrderItemUpdate, OrderParty, OrderUpdate};
