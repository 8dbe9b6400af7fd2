//! Order kinds, statuses and the status transition function.

use std::fmt;
use std::str::FromStr;

use orbis_shared::types::OrderId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::OrderError;
use super::types::Order;

/// Sales (customer-facing) or purchase (vendor-facing) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Order placed by a customer.
    Sales,
    /// Order placed with a vendor.
    Purchase,
}

impl OrderKind {
    /// Returns the lowercase name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Purchase => "purchase",
        }
    }

    /// Name of the party this kind of order is placed with.
    #[must_use]
    pub const fn party_name(self) -> &'static str {
        match self {
            Self::Sales => "customer",
            Self::Purchase => "vendor",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Self::Sales),
            "purchase" => Ok(Self::Purchase),
            other => Err(format!("unknown order kind: {other}")),
        }
    }
}

/// Order status.
///
/// Sales: `draft -> pending -> confirmed -> shipped -> delivered -> completed`.
/// Purchase: `draft -> pending -> confirmed -> received -> completed`.
/// Either may be `cancelled`, after which nothing changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Being prepared.
    #[default]
    Draft,
    /// Awaiting confirmation.
    Pending,
    /// Accepted by both sides.
    Confirmed,
    /// Sales only: goods dispatched.
    Shipped,
    /// Purchase only: goods received.
    Received,
    /// Sales only: goods delivered.
    Delivered,
    /// Fully processed.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the status exists for the given order kind.
    #[must_use]
    pub const fn is_valid_for(self, kind: OrderKind) -> bool {
        match self {
            Self::Shipped | Self::Delivered => matches!(kind, OrderKind::Sales),
            Self::Received => matches!(kind, OrderKind::Purchase),
            _ => true,
        }
    }

    /// Returns true if entering this status should produce an invoice.
    #[must_use]
    pub const fn triggers_invoice(self, kind: OrderKind) -> bool {
        match kind {
            OrderKind::Sales => matches!(self, Self::Confirmed | Self::Shipped),
            OrderKind::Purchase => matches!(self, Self::Confirmed | Self::Received),
        }
    }

    /// Returns true if items added in this status reserve stock.
    ///
    /// Only sales orders reserve; purchase orders bring stock in.
    #[must_use]
    pub const fn reserves_stock(self, kind: OrderKind) -> bool {
        matches!(kind, OrderKind::Sales) && matches!(self, Self::Confirmed | Self::Shipped)
    }

    /// Returns the lowercase name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Received => "received",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "received" => Ok(Self::Received),
            "delivered" => Ok(Self::Delivered),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Side effect requested by a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrderEvent {
    /// Create the order's invoice.
    InvoiceRequested {
        /// Order to invoice.
        order_id: OrderId,
        /// Kind of the order, which decides the invoice type.
        kind: OrderKind,
    },
}

/// Outcome of a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Status before the change.
    pub from: OrderStatus,
    /// Status after the change.
    pub to: OrderStatus,
    /// Effects the caller must execute in the same transaction.
    pub events: Vec<OrderEvent>,
}

impl Transition {
    /// Returns true if the status actually changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Computes the effects of moving `order` to `new_status`.
///
/// An invoice is requested only when the status actually changes into a
/// qualifying state, the order total is positive, and `has_invoice` is false.
/// Setting the current status again is a no-op without events.
///
/// # Errors
///
/// Returns an error if the status does not exist for the order kind or the
/// order is cancelled.
pub fn transition(
    order: &Order,
    new_status: OrderStatus,
    has_invoice: bool,
) -> Result<Transition, OrderError> {
    if !new_status.is_valid_for(order.kind) {
        return Err(OrderError::StatusNotAllowed {
            kind: order.kind,
            status: new_status,
        });
    }

    let from = order.status;
    if from == new_status {
        return Ok(Transition {
            from,
            to: new_status,
            events: Vec::new(),
        });
    }
    if from == OrderStatus::Cancelled {
        return Err(OrderError::OrderClosed);
    }

    let mut events = Vec::new();
    if new_status.triggers_invoice(order.kind) && order.total_amount > Decimal::ZERO && !has_invoice
    {
        events.push(OrderEvent::InvoiceRequested {
            order_id: order.id,
            kind: order.kind,
        });
    }

    Ok(Transition {
        from,
        to: new_status,
        events,
    })
}
