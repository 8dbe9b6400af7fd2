//! Order domain types.

use chrono::{DateTime, NaiveDate, Utc};
use orbis_shared::types::{CustomerId, OrderId, ProductId, UserId, VendorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::OrderError;
use super::status::{OrderKind, OrderStatus};
use super::totals::OrderTotals;

/// The party an order is placed with; it also fixes the order kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum OrderParty {
    /// Sales order customer.
    Customer(CustomerId),
    /// Purchase order vendor.
    Vendor(VendorId),
}

impl OrderParty {
    /// Order kind implied by the party.
    #[must_use]
    pub const fn kind(self) -> OrderKind {
        match self {
            Self::Customer(_) => OrderKind::Sales,
            Self::Vendor(_) => OrderKind::Purchase,
        }
    }

    /// Returns the customer, if any.
    #[must_use]
    pub const fn customer_id(self) -> Option<CustomerId> {
        match self {
            Self::Customer(id) => Some(id),
            Self::Vendor(_) => None,
        }
    }

    /// Returns the vendor, if any.
    #[must_use]
    pub const fn vendor_id(self) -> Option<VendorId> {
        match self {
            Self::Vendor(id) => Some(id),
            Self::Customer(_) => None,
        }
    }
}

/// A sales or purchase order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Sales or purchase.
    pub kind: OrderKind,
    /// Human-readable number, `SO...` or `PO...`.
    pub order_number: String,
    /// Customer or vendor.
    pub party: OrderParty,
    /// Current status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Expected delivery.
    pub delivery_date: Option<DateTime<Utc>>,
    /// Order-level tax rate, percent.
    pub tax_rate: Decimal,
    /// Order-level discount, percent.
    pub discount_percent: Decimal,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// `subtotal * discount_percent / 100`.
    pub discount_amount: Decimal,
    /// `(subtotal - discount_amount) * tax_rate / 100`.
    pub tax_amount: Decimal,
    /// `subtotal - discount_amount + tax_amount`.
    pub total_amount: Decimal,
    /// Amount settled so far.
    pub paid_amount: Decimal,
    /// Purchase only: receiving warehouse.
    pub warehouse_id: Option<i32>,
    /// Purchase only: when the vendor expects payment.
    pub payment_due_date: Option<NaiveDate>,
    /// Purchase only: vendor's reference.
    pub reference_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// User who created the order.
    pub created_by: Option<UserId>,
}

impl Order {
    /// Creates an empty draft order.
    #[must_use]
    pub fn new(
        id: OrderId,
        order_number: String,
        party: OrderParty,
        order_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind: party.kind(),
            order_number,
            party,
            status: OrderStatus::Draft,
            order_date,
            delivery_date: None,
            tax_rate: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            warehouse_id: None,
            payment_due_date: None,
            reference_number: None,
            notes: None,
            created_by: None,
        }
    }

    /// Returns the stored derived totals.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        }
    }

    /// Overwrites the derived totals.
    pub fn set_totals(&mut self, totals: OrderTotals) {
        self.subtotal = totals.subtotal;
        self.discount_amount = totals.discount_amount;
        self.tax_amount = totals.tax_amount;
        self.total_amount = totals.total_amount;
    }

    /// Recomputes the derived totals from the given items.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AmountOutOfRange` if a total overflows; the
    /// stored totals are left unchanged.
    pub fn recompute(&mut self, items: &[OrderItem]) -> Result<OrderTotals, OrderError> {
        let totals = OrderTotals::recompute(
            items.iter().map(|i| i.line_total),
            self.discount_percent,
            self.tax_rate,
        )?;
        self.set_totals(totals);
        Ok(totals)
    }
}

/// An order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Integer surrogate key.
    pub id: i64,
    /// Owning order.
    pub order_id: OrderId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Quantity, at least 1.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Item-level discount, percent.
    pub discount_percent: Decimal,
    /// `unit_price * quantity * (1 - discount_percent / 100)`.
    pub line_total: Decimal,
    /// Purchase only: quantity received so far.
    pub received_quantity: i32,
}

/// Input for creating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Customer or vendor.
    pub party: OrderParty,
    /// Expected delivery.
    #[serde(default)]
    pub delivery_date: Option<DateTime<Utc>>,
    /// Order-level tax rate, percent.
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Order-level discount, percent.
    #[serde(default)]
    pub discount_percent: Decimal,
    /// Purchase only: receiving warehouse.
    #[serde(default)]
    pub warehouse_id: Option<i32>,
    /// Purchase only: payment due date.
    #[serde(default)]
    pub payment_due_date: Option<NaiveDate>,
    /// Purchase only: vendor's reference.
    #[serde(default)]
    pub reference_number: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// User creating the order.
    #[serde(default)]
    pub created_by: Option<UserId>,
}

/// Input for adding an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    /// Product ordered.
    pub product_id: ProductId,
    /// Quantity, at least 1.
    pub quantity: i32,
    /// Price per unit; defaults to the product's current unit price.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Item-level discount, percent.
    #[serde(default)]
    pub discount_percent: Decimal,
}

/// Partial update of an existing item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemUpdate {
    /// New quantity.
    pub quantity: Option<i32>,
    /// New unit price.
    pub unit_price: Option<Decimal>,
    /// New discount percent.
    pub discount_percent: Option<Decimal>,
    /// Purchase only: new received quantity.
    pub received_quantity: Option<i32>,
}

/// Partial update of an order header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    /// New tax rate.
    pub tax_rate: Option<Decimal>,
    /// New discount percent.
    pub discount_percent: Option<Decimal>,
    /// New delivery date.
    pub delivery_date: Option<DateTime<Utc>>,
    /// New notes.
    pub notes: Option<String>,
    /// Purchase only: receiving warehouse.
    pub warehouse_id: Option<i32>,
    /// Purchase only: payment due date.
    pub payment_due_date: Option<NaiveDate>,
    /// Purchase only: vendor's reference.
    pub reference_number: Option<String>,
}
