//! Sales and purchase order routes.
//!
//! Both order kinds expose the same operations; handlers are generic over an
//! [`OrderRoute`] marker that fixes the kind.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use orbis_core::orders::{
    NewOrder, NewOrderItem, OrderItemUpdate, OrderKind, OrderParty, OrderStatus, OrderUpdate,
};
use orbis_db::OrderRepository;
use orbis_db::repositories::OrderFilter;
use orbis_shared::AppError;
use orbis_shared::types::{CustomerId, OrderId, PageRequest, VendorId};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::ActingUser;

/// Fixes the order kind of a route family.
pub trait OrderRoute: Send + Sync + 'static {
    /// Kind handled by the routes.
    const KIND: OrderKind;
    /// Path prefix of the routes.
    const PREFIX: &'static str;
}

/// `/sales-orders`
pub struct SalesOrders;

impl OrderRoute for SalesOrders {
    const KIND: OrderKind = OrderKind::Sales;
    const PREFIX: &'static str = "/sales-orders";
}

/// `/purchase-orders`
pub struct PurchaseOrders;

impl OrderRoute for PurchaseOrders {
    const KIND: OrderKind = OrderKind::Purchase;
    const PREFIX: &'static str = "/purchase-orders";
}

/// Creates the sales and purchase order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(routes_for::<SalesOrders>())
        .merge(routes_for::<PurchaseOrders>())
}

fn routes_for<R: OrderRoute>() -> Router<AppState> {
    let prefix = R::PREFIX;
    Router::new()
        .route(prefix, get(list_orders::<R>).post(create_order::<R>))
        .route(
            &format!("{prefix}/{{id}}"),
            get(get_order::<R>).patch(update_order::<R>),
        )
        .route(&format!("{prefix}/{{id}}/items"), post(add_item::<R>))
        .route(
            &format!("{prefix}/{{id}}/items/{{item_id}}"),
            patch(update_item::<R>).delete(delete_item::<R>),
        )
        .route(&format!("{prefix}/{{id}}/status"), post(set_status::<R>))
        .route(&format!("{prefix}/{{id}}/invoice"), post(create_invoice::<R>))
}

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Customer, for sales orders.
    pub customer_id: Option<CustomerId>,
    /// Vendor, for purchase orders.
    pub vendor_id: Option<VendorId>,
    /// Expected delivery.
    pub delivery_date: Option<DateTime<Utc>>,
    /// Order-level tax rate, percent.
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Order-level discount, percent.
    #[serde(default)]
    pub discount_percent: Decimal,
    /// Purchase only: receiving warehouse.
    pub warehouse_id: Option<i32>,
    /// Purchase only: payment due date.
    pub payment_due_date: Option<NaiveDate>,
    /// Purchase only: vendor's reference.
    pub reference_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    fn into_new_order(self, kind: OrderKind, user: ActingUser) -> Result<NewOrder, ApiError> {
        let party = match (kind, self.customer_id, self.vendor_id) {
            (OrderKind::Sales, Some(customer), _) => OrderParty::Customer(customer),
            (OrderKind::Purchase, _, Some(vendor)) => OrderParty::Vendor(vendor),
            (kind, _, _) => {
                return Err(AppError::Validation(format!(
                    "A {kind} order requires a {}",
                    kind.party_name()
                ))
                .into());
            }
        };
        Ok(NewOrder {
            party,
            delivery_date: self.delivery_date,
            tax_rate: self.tax_rate,
            discount_percent: self.discount_percent,
            warehouse_id: self.warehouse_id,
            payment_due_date: self.payment_due_date,
            reference_number: self.reference_number,
            notes: self.notes,
            created_by: user.user_id(),
        })
    }
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Target status.
    pub status: OrderStatus,
}

/// POST `/{kind}-orders` - Create a draft order.
async fn create_order<R: OrderRoute>(
    State(state): State<AppState>,
    user: ActingUser,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_new_order(R::KIND, user)?;
    let order = OrderRepository::new(state.conn())
        .create_order(R::KIND, input)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET `/{kind}-orders` - List orders, newest first.
async fn list_orders<R: OrderRoute>(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let orders = OrderRepository::new(state.conn())
        .list_orders(R::KIND, &filter, &page)
        .await?;
    Ok(Json(orders))
}

/// GET `/{kind}-orders/{id}` - Order with its items.
async fn get_order<R: OrderRoute>(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> ApiResult<impl IntoResponse> {
    let order = OrderRepository::new(state.conn())
        .get_order(R::KIND, id)
        .await?;
    Ok(Json(order))
}

/// PATCH `/{kind}-orders/{id}` - Update header fields.
async fn update_order<R: OrderRoute>(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(payload): Json<OrderUpdate>,
) -> ApiResult<impl IntoResponse> {
    let order = OrderRepository::new(state.conn())
        .update_order(R::KIND, id, payload)
        .await?;
    Ok(Json(order))
}

/// POST `/{kind}-orders/{id}/items` - Add an item.
async fn add_item<R: OrderRoute>(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(payload): Json<NewOrderItem>,
) -> ApiResult<impl IntoResponse> {
    let result = OrderRepository::new(state.conn())
        .add_item(R::KIND, id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// PATCH `/{kind}-orders/{id}/items/{item_id}` - Update an item.
async fn update_item<R: OrderRoute>(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(OrderId, i64)>,
    Json(payload): Json<OrderItemUpdate>,
) -> ApiResult<impl IntoResponse> {
    let order = OrderRepository::new(state.conn())
        .update_item(R::KIND, id, item_id, payload)
        .await?;
    Ok(Json(order))
}

/// DELETE `/{kind}-orders/{id}/items/{item_id}` - Remove an item.
async fn delete_item<R: OrderRoute>(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(OrderId, i64)>,
) -> ApiResult<impl IntoResponse> {
    let order = OrderRepository::new(state.conn())
        .delete_item(R::KIND, id, item_id)
        .await?;
    Ok(Json(order))
}

/// POST `/{kind}-orders/{id}/status` - Change status, invoicing if due.
async fn set_status<R: OrderRoute>(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(payload): Json<StatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let result = OrderRepository::new(state.conn())
        .set_status(R::KIND, id, payload.status, state.invoice_due_days())
        .await?;
    Ok(Json(result))
}

/// POST `/{kind}-orders/{id}/invoice` - Invoice the order now.
async fn create_invoice<R: OrderRoute>(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> ApiResult<impl IntoResponse> {
    let invoice = OrderRepository::new(state.conn())
        .create_invoice(R::KIND, id, state.invoice_due_days())
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(customer_id: Option<CustomerId>, vendor_id: Option<VendorId>) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_id,
            vendor_id,
            delivery_date: None,
            tax_rate: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            warehouse_id: None,
            payment_due_date: None,
            reference_number: None,
            notes: None,
        }
    }

    #[test]
    fn test_sales_order_takes_customer() {
        let customer = CustomerId::new();
        let order = request(Some(customer), None)
            .into_new_order(OrderKind::Sales, ActingUser::default())
            .unwrap();
        assert_eq!(order.party, OrderParty::Customer(customer));
    }

    #[test]
    fn test_purchase_order_without_vendor_is_rejected() {
        let err = request(Some(CustomerId::new()), None)
            .into_new_order(OrderKind::Purchase, ActingUser::default())
            .unwrap_err();
        assert_eq!(err.0.status_code(), 400);
    }
}
