//! Order repository for sales and purchase orders.
//!
//! Every mutation locks the order row first, so item changes, status changes
//! and invoice creation on one order are serialized. Totals are recomputed
//! from the stored items before the transaction commits.

use std::collections::HashMap;

use chrono::Utc;
use orbis_core::billing::{BillingService, Invoice, NewInvoice};
use orbis_core::inventory::{ReservationPlan, StockWarning};
use orbis_core::numbering::SequenceScope;
use orbis_core::orders::{
    NewOrder, NewOrderItem, Order, OrderError, OrderEvent, OrderItem, OrderItemUpdate, OrderKind,
    OrderParty, OrderService, OrderStatus, OrderUpdate, transition,
};
use orbis_shared::AppError;
use orbis_shared::types::{CustomerId, OrderId, PageRequest, PageResponse, ProductId, VendorId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};

use super::{inventory as stock, invoice as invoices, sequence};
use crate::entities::{
    customers, order_items, orders, products,
    sea_orm_active_enums::{OrderKind as DbOrderKind, OrderStatus as DbOrderStatus},
    vendors, warehouses,
};
use crate::error;

/// Error types for order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderRepoError {
    /// Rejected by the order rules.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// Order item not found.
    #[error("Order item not found: {0}")]
    ItemNotFound(i64),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Vendor not found.
    #[error("Vendor not found: {0}")]
    VendorNotFound(VendorId),

    /// Warehouse not found.
    #[error("Warehouse not found: {0}")]
    WarehouseNotFound(i32),

    /// The order already has an invoice.
    #[error("Order {0} already has an invoice")]
    InvoiceAlreadyExists(OrderId),

    /// Only orders with a positive total can be invoiced.
    #[error("Order {0} has nothing to invoice")]
    NothingToInvoice(OrderId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OrderRepoError> for AppError {
    fn from(err: OrderRepoError) -> Self {
        match &err {
            OrderRepoError::Order(e) => error::order(e),
            OrderRepoError::InvoiceAlreadyExists(_) => Self::Conflict(err.to_string()),
            OrderRepoError::NothingToInvoice(_) => Self::BusinessRule(err.to_string()),
            OrderRepoError::Database(e) => error::database(e),
            _ => Self::NotFound(err.to_string()),
        }
    }
}

/// Order header with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    /// The order header.
    #[serde(flatten)]
    pub order: Order,
    /// Order lines.
    pub items: Vec<OrderItem>,
}

/// Outcome of adding an item.
#[derive(Debug, Clone, Serialize)]
pub struct AddItemResult {
    /// The order after recomputation.
    pub order: Order,
    /// The inserted item.
    pub item: OrderItem,
    /// Stock reserved for the item, if any.
    pub reservation: Option<ReservationPlan>,
    /// Stock condition the caller should surface.
    pub warning: Option<StockWarning>,
}

/// Outcome of a status change.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeResult {
    /// The order after the change.
    pub order: Order,
    /// Status before the change.
    pub from: OrderStatus,
    /// Status after the change.
    pub to: OrderStatus,
    /// Invoice created by the change, if any.
    pub invoice: Option<Invoice>,
}

/// Filter options for listing orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    /// Only orders with this status.
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

/// Order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft order with a generated number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or references an unknown
    /// party or warehouse.
    pub async fn create_order(
        &self,
        kind: OrderKind,
        input: NewOrder,
    ) -> Result<OrderWithItems, OrderRepoError> {
        OrderService::validate_new_order(kind, &input)?;
        self.ensure_party(input.party).await?;
        if kind == OrderKind::Purchase
            && let Some(warehouse_id) = input.warehouse_id
        {
            self.ensure_warehouse(warehouse_id).await?;
        }

        let now = Utc::now();
        let scope = match kind {
            OrderKind::Sales => SequenceScope::sales_order(now.date_naive()),
            OrderKind::Purchase => SequenceScope::PurchaseOrder,
        };

        let txn = self.db.begin().await?;
        let order_number = sequence::next_number(&txn, &scope).await?;
        let mut order = Order::new(OrderId::new(), order_number, input.party, now);
        order.delivery_date = input.delivery_date;
        order.tax_rate = input.tax_rate;
        order.discount_percent = input.discount_percent;
        order.notes = input.notes;
        order.created_by = input.created_by;
        if kind == OrderKind::Purchase {
            order.warehouse_id = input.warehouse_id;
            order.payment_due_date = input.payment_due_date;
            order.reference_number = input.reference_number;
        }

        orders::ActiveModel {
            id: Set(order.id.into_inner()),
            order_kind: Set(DbOrderKind::from(kind)),
            order_number: Set(order.order_number.clone()),
            customer_id: Set(order.party.customer_id().map(CustomerId::into_inner)),
            vendor_id: Set(order.party.vendor_id().map(VendorId::into_inner)),
            status: Set(DbOrderStatus::from(order.status)),
            order_date: Set(now.into()),
            delivery_date: Set(order.delivery_date.map(Into::into)),
            tax_rate: Set(order.tax_rate),
            discount_percent: Set(order.discount_percent),
            subtotal: Set(Decimal::ZERO),
            discount_amount: Set(Decimal::ZERO),
            tax_amount: Set(Decimal::ZERO),
            total_amount: Set(Decimal::ZERO),
            paid_amount: Set(Decimal::ZERO),
            warehouse_id: Set(order.warehouse_id),
            payment_due_date: Set(order.payment_due_date),
            reference_number: Set(order.reference_number.clone()),
            notes: Set(order.notes.clone()),
            created_by: Set(order.created_by.map(|u| u.into_inner())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(order_number = %order.order_number, kind = %kind, "order created");
        Ok(OrderWithItems {
            order,
            items: Vec::new(),
        })
    }

    /// Finds an order of `kind` with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist.
    pub async fn get_order(
        &self,
        kind: OrderKind,
        id: OrderId,
    ) -> Result<OrderWithItems, OrderRepoError> {
        let model = orders::Entity::find_by_id(id.into_inner())
            .filter(orders::Column::OrderKind.eq(DbOrderKind::from(kind)))
            .one(&self.db)
            .await?
            .ok_or(OrderRepoError::NotFound(id))?;
        let items = load_items(&self.db, id).await?;
        Ok(OrderWithItems {
            order: Order::try_from(model)?,
            items,
        })
    }

    /// Lists orders of `kind`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_orders(
        &self,
        kind: OrderKind,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<Order>, OrderRepoError> {
        let mut query = orders::Entity::find()
            .filter(orders::Column::OrderKind.eq(DbOrderKind::from(kind)))
            .order_by_desc(orders::Column::OrderDate);
        if let Some(status) = filter.status {
            query = query.filter(orders::Column::Status.eq(DbOrderStatus::from(status)));
        }

        let page = page.normalized();
        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        let data = models
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Applies a partial header update, recomputing totals if a rate changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or is cancelled, a rate
    /// is out of range, or the new warehouse does not exist.
    pub async fn update_order(
        &self,
        kind: OrderKind,
        id: OrderId,
        update: OrderUpdate,
    ) -> Result<OrderWithItems, OrderRepoError> {
        if kind == OrderKind::Purchase
            && let Some(warehouse_id) = update.warehouse_id
        {
            self.ensure_warehouse(warehouse_id).await?;
        }

        let txn = self.db.begin().await?;
        let mut order = lock_order(&txn, kind, id).await?;
        let rates_changed = OrderService::apply_header_update(&mut order, &update)?;
        let items = load_items(&txn, id).await?;
        if rates_changed {
            order.recompute(&items)?;
        }
        save_order(&txn, &order).await?;
        txn.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// Adds an item, reserving stock for sales orders in a committed status.
    ///
    /// Short stock never fails the add; it is reported in the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the order or product does not exist, the order is
    /// cancelled, or the item is invalid.
    pub async fn add_item(
        &self,
        kind: OrderKind,
        id: OrderId,
        input: NewOrderItem,
    ) -> Result<AddItemResult, OrderRepoError> {
        let product = products::Entity::find_by_id(input.product_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(OrderRepoError::ProductNotFound(input.product_id))?;

        let txn = self.db.begin().await?;
        let mut order = lock_order(&txn, kind, id).await?;
        let stocks = match kind {
            OrderKind::Sales => stock::lock_stock_levels(&txn, input.product_id).await?,
            OrderKind::Purchase => Vec::new(),
        };
        let plan = OrderService::plan_add_item(&order, &input, product.unit_price, &stocks)?;

        let item = order_items::ActiveModel {
            order_id: Set(id.into_inner()),
            product_id: Set(plan.item.product_id.into_inner()),
            quantity: Set(plan.item.quantity),
            unit_price: Set(plan.item.unit_price),
            discount_percent: Set(plan.item.discount_percent),
            line_total: Set(plan.item.line_total),
            received_quantity: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(reservation) = &plan.reservation {
            stock::apply_reservation(&txn, input.product_id, reservation).await?;
            if reservation.shortfall > 0 {
                tracing::warn!(
                    order_number = %order.order_number,
                    product_id = %input.product_id,
                    requested = reservation.requested,
                    shortfall = reservation.shortfall,
                    "order item under-reserved"
                );
            }
        }
        if let Some(warning) = &plan.warning {
            tracing::warn!(order_number = %order.order_number, ?warning, "stock warning on order item");
        }

        let items = load_items(&txn, id).await?;
        order.recompute(&items)?;
        save_order(&txn, &order).await?;
        txn.commit().await?;

        Ok(AddItemResult {
            order,
            item: OrderItem::from(item),
            reservation: plan.reservation,
            warning: plan.warning,
        })
    }

    /// Applies a partial update to an item and recomputes totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the order or item does not exist, the order is
    /// cancelled, or the updated item is invalid.
    pub async fn update_item(
        &self,
        kind: OrderKind,
        id: OrderId,
        item_id: i64,
        update: OrderItemUpdate,
    ) -> Result<OrderWithItems, OrderRepoError> {
        let txn = self.db.begin().await?;
        let mut order = lock_order(&txn, kind, id).await?;
        let model = find_item(&txn, id, item_id).await?;
        let mut item = OrderItem::from(model.clone());
        OrderService::apply_item_update(&order, &mut item, &update)?;

        let mut active: order_items::ActiveModel = model.into();
        active.quantity = Set(item.quantity);
        active.unit_price = Set(item.unit_price);
        active.discount_percent = Set(item.discount_percent);
        active.line_total = Set(item.line_total);
        active.received_quantity = Set(item.received_quantity);
        active.update(&txn).await?;

        let items = load_items(&txn, id).await?;
        order.recompute(&items)?;
        save_order(&txn, &order).await?;
        txn.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// Deletes an item and recomputes totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the order or item does not exist or the order is
    /// cancelled.
    pub async fn delete_item(
        &self,
        kind: OrderKind,
        id: OrderId,
        item_id: i64,
    ) -> Result<OrderWithItems, OrderRepoError> {
        let txn = self.db.begin().await?;
        let mut order = lock_order(&txn, kind, id).await?;
        OrderService::ensure_open(&order)?;
        find_item(&txn, id, item_id).await?.delete(&txn).await?;

        let items = load_items(&txn, id).await?;
        order.recompute(&items)?;
        save_order(&txn, &order).await?;
        txn.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// Moves an order to `status`, creating its invoice when the transition
    /// requests one.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, the status is not valid
    /// for the order kind, or the order is cancelled.
    pub async fn set_status(
        &self,
        kind: OrderKind,
        id: OrderId,
        status: OrderStatus,
        due_days: u32,
    ) -> Result<StatusChangeResult, OrderRepoError> {
        let txn = self.db.begin().await?;
        let mut order = lock_order(&txn, kind, id).await?;
        let has_invoice = invoices::order_has_invoice(&txn, id.into_inner()).await?;
        let change = transition(&order, status, has_invoice)?;

        if !change.changed() {
            txn.commit().await?;
            return Ok(StatusChangeResult {
                order,
                from: change.from,
                to: change.to,
                invoice: None,
            });
        }

        order.status = change.to;
        save_order(&txn, &order).await?;

        let mut invoice = None;
        for event in &change.events {
            match event {
                OrderEvent::InvoiceRequested { .. } => {
                    let input = invoice_for_order(&txn, &order, due_days).await?;
                    let (created, _) = invoices::insert_invoice(&txn, input).await?;
                    invoice = Some(created);
                }
            }
        }
        txn.commit().await?;

        tracing::info!(
            order_number = %order.order_number,
            from = %change.from,
            to = %change.to,
            invoiced = invoice.is_some(),
            "order status changed"
        );
        Ok(StatusChangeResult {
            order,
            from: change.from,
            to: change.to,
            invoice,
        })
    }

    /// Creates the order's invoice on demand.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or is cancelled, already
    /// has an invoice, or has no positive total.
    pub async fn create_invoice(
        &self,
        kind: OrderKind,
        id: OrderId,
        due_days: u32,
    ) -> Result<Invoice, OrderRepoError> {
        let txn = self.db.begin().await?;
        let order = lock_order(&txn, kind, id).await?;
        OrderService::ensure_open(&order)?;
        if invoices::order_has_invoice(&txn, id.into_inner()).await? {
            return Err(OrderRepoError::InvoiceAlreadyExists(id));
        }
        if order.total_amount <= Decimal::ZERO {
            return Err(OrderRepoError::NothingToInvoice(id));
        }

        let input = invoice_for_order(&txn, &order, due_days).await?;
        let (invoice, _) = invoices::insert_invoice(&txn, input).await?;
        txn.commit().await?;
        Ok(invoice)
    }

    async fn ensure_party(&self, party: OrderParty) -> Result<(), OrderRepoError> {
        match party {
            OrderParty::Customer(id) => customers::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?
                .map(|_| ())
                .ok_or(OrderRepoError::CustomerNotFound(id)),
            OrderParty::Vendor(id) => vendors::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?
                .map(|_| ())
                .ok_or(OrderRepoError::VendorNotFound(id)),
        }
    }

    async fn ensure_warehouse(&self, id: i32) -> Result<(), OrderRepoError> {
        warehouses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(OrderRepoError::WarehouseNotFound(id))
    }
}

async fn lock_order<C: ConnectionTrait>(
    conn: &C,
    kind: OrderKind,
    id: OrderId,
) -> Result<Order, OrderRepoError> {
    let model = orders::Entity::find_by_id(id.into_inner())
        .filter(orders::Column::OrderKind.eq(DbOrderKind::from(kind)))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(OrderRepoError::NotFound(id))?;
    Ok(Order::try_from(model)?)
}

async fn load_items<C: ConnectionTrait>(conn: &C, id: OrderId) -> Result<Vec<OrderItem>, DbErr> {
    Ok(order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(id.into_inner()))
        .order_by_asc(order_items::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect())
}

/// Builds the invoice for `order`, one line per order item.
async fn invoice_for_order<C: ConnectionTrait>(
    conn: &C,
    order: &Order,
    due_days: u32,
) -> Result<NewInvoice, DbErr> {
    let items = load_items(conn, order.id).await?;
    let product_ids: Vec<_> = items.iter().map(|i| i.product_id.into_inner()).collect();
    let names: HashMap<ProductId, String> = products::Entity::find()
        .filter(products::Column::Id.is_in(product_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (ProductId(p.id), p.name))
        .collect();

    Ok(BillingService::invoice_from_order(
        order,
        &items,
        |id| names.get(&id).cloned(),
        Utc::now().date_naive(),
        due_days,
    ))
}

async fn find_item<C: ConnectionTrait>(
    conn: &C,
    order_id: OrderId,
    item_id: i64,
) -> Result<order_items::Model, OrderRepoError> {
    order_items::Entity::find_by_id(item_id)
        .filter(order_items::Column::OrderId.eq(order_id.into_inner()))
        .one(conn)
        .await?
        .ok_or(OrderRepoError::ItemNotFound(item_id))
}

async fn save_order<C: ConnectionTrait>(conn: &C, order: &Order) -> Result<(), DbErr> {
    orders::ActiveModel {
        id: Unchanged(order.id.into_inner()),
        status: Set(DbOrderStatus::from(order.status)),
        delivery_date: Set(order.delivery_date.map(Into::into)),
        tax_rate: Set(order.tax_rate),
        discount_percent: Set(order.discount_percent),
        subtotal: Set(order.subtotal),
        discount_amount: Set(order.discount_amount),
        tax_amount: Set(order.tax_amount),
        total_amount: Set(order.total_amount),
        warehouse_id: Set(order.warehouse_id),
        payment_due_date: Set(order.payment_due_date),
        reference_number: Set(order.reference_number.clone()),
        notes: Set(order.notes.clone()),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .update(conn)
    .await?;
    Ok(())
}
