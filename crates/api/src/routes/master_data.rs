//! Customer, vendor, product and warehouse routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use orbis_db::MasterDataRepository;
use orbis_db::repositories::{CreatePartyInput, CreateProductInput, CreateWarehouseInput};
use orbis_shared::types::{CustomerId, PageRequest, ProductId, VendorId};

use crate::AppState;
use crate::error::ApiResult;

/// Creates the master data routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/{id}", get(get_customer))
        .route("/vendors", get(list_vendors).post(create_vendor))
        .route("/vendors/{id}", get(get_vendor))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product))
        .route("/warehouses", get(list_warehouses).post(create_warehouse))
        .route("/warehouses/{id}", get(get_warehouse))
}

fn repo(state: &AppState) -> MasterDataRepository {
    MasterDataRepository::new(state.conn())
}

/// POST `/customers` - Create a customer with a generated code.
async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartyInput>,
) -> ApiResult<impl IntoResponse> {
    let customer = repo(&state).create_customer(payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET `/customers` - List customers by code.
async fn list_customers(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).list_customers(&page).await?))
}

/// GET `/customers/{id}`
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).get_customer(id).await?))
}

/// POST `/vendors` - Create a vendor with a generated code.
async fn create_vendor(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartyInput>,
) -> ApiResult<impl IntoResponse> {
    let vendor = repo(&state).create_vendor(payload).await?;
    Ok((StatusCode::CREATED, Json(vendor)))
}

/// GET `/vendors` - List vendors by code.
async fn list_vendors(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).list_vendors(&page).await?))
}

/// GET `/vendors/{id}`
async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<VendorId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).get_vendor(id).await?))
}

/// POST `/products` - Create a product with a generated SKU.
async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductInput>,
) -> ApiResult<impl IntoResponse> {
    let product = repo(&state).create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET `/products` - List products by SKU.
async fn list_products(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).list_products(&page).await?))
}

/// GET `/products/{id}`
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).get_product(id).await?))
}

/// POST `/warehouses`
async fn create_warehouse(
    State(state): State<AppState>,
    Json(payload): Json<CreateWarehouseInput>,
) -> ApiResult<impl IntoResponse> {
    let warehouse = repo(&state).create_warehouse(payload).await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

/// GET `/warehouses` - List warehouses by name.
async fn list_warehouses(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).list_warehouses().await?))
}

/// GET `/warehouses/{id}`
async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).get_warehouse(id).await?))
}
