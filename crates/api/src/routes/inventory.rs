//! Stock movement and availability routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use orbis_core::inventory::NewInventoryTransaction;
use orbis_db::InventoryRepository;
use orbis_shared::types::ProductId;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::ActingUser;

/// Creates the inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory/transactions", post(record_transaction))
        .route("/inventory/availability", get(check_availability))
        .route("/inventory/low-stock", get(low_stock))
        .route("/products/{id}/stock", get(stock_levels))
        .route(
            "/products/{id}/stock/{warehouse_id}/reorder",
            put(set_reorder_settings),
        )
}

/// Query of an availability check.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Product to check.
    pub product_id: ProductId,
    /// Single warehouse; all warehouses when absent.
    pub warehouse_id: Option<i32>,
    /// Requested quantity.
    pub quantity: i32,
}

/// Body of a reorder settings update.
#[derive(Debug, Deserialize)]
pub struct ReorderSettingsRequest {
    /// Available quantity at or below which the row is low on stock.
    pub reorder_point: i32,
    /// Suggested quantity to reorder.
    pub reorder_quantity: i32,
}

fn repo(state: &AppState) -> InventoryRepository {
    InventoryRepository::new(state.conn())
}

/// POST `/inventory/transactions` - Record a stock movement.
async fn record_transaction(
    State(state): State<AppState>,
    user: ActingUser,
    Json(mut payload): Json<NewInventoryTransaction>,
) -> ApiResult<impl IntoResponse> {
    payload.created_by = payload.created_by.or(user.user_id());
    let result = repo(&state).record_transaction(payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET `/inventory/availability`
async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<impl IntoResponse> {
    let availability = repo(&state)
        .check_availability(query.product_id, query.warehouse_id, query.quantity)
        .await?;
    Ok(Json(availability))
}

/// GET `/inventory/low-stock` - Rows at or below their reorder point.
async fn low_stock(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).low_stock().await?))
}

/// GET `/products/{id}/stock` - Stock rows across warehouses.
async fn stock_levels(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).stock_levels(id).await?))
}

/// PUT `/products/{id}/stock/{warehouse_id}/reorder`
async fn set_reorder_settings(
    State(state): State<AppState>,
    Path((id, warehouse_id)): Path<(ProductId, i32)>,
    Json(payload): Json<ReorderSettingsRequest>,
) -> ApiResult<impl IntoResponse> {
    let stock = repo(&state)
        .set_reorder_settings(
            id,
            warehouse_id,
            payload.reorder_point,
            payload.reorder_quantity,
        )
        .await?;
    Ok(Json(stock))
}
