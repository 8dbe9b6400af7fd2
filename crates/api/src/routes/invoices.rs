//! Invoice routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use orbis_core::billing::{CreateInvoice, InvoiceUpdate, NewInvoiceItem};
use orbis_db::InvoiceRepository;
use orbis_db::repositories::InvoiceFilter;
use orbis_shared::types::{InvoiceId, PageRequest};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/invoices/{id}",
            get(get_invoice).patch(update_invoice).delete(delete_invoice),
        )
        .route("/invoices/{id}/items", post(add_item))
        .route(
            "/invoices/{id}/items/{item_id}",
            put(update_item).delete(delete_item),
        )
        .route("/invoices/{id}/mark-paid", post(mark_as_paid))
}

/// Optional body of a mark-paid request.
#[derive(Debug, Default, Deserialize)]
pub struct MarkPaidRequest {
    /// Amount to record; the outstanding balance when absent.
    pub amount: Option<Decimal>,
}

fn repo(state: &AppState) -> InvoiceRepository {
    InvoiceRepository::new(state.conn())
}

/// POST `/invoices` - Create an invoice with its items.
async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoice>,
) -> ApiResult<impl IntoResponse> {
    let invoice = repo(&state)
        .create_invoice(payload, state.invoice_due_days())
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// GET `/invoices` - List invoices, newest first.
async fn list_invoices(
    State(state): State<AppState>,
    Query(filter): Query<InvoiceFilter>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).list_invoices(&filter, &page).await?))
}

/// GET `/invoices/{id}` - Invoice with items and derived balance.
async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).get_invoice(id).await?))
}

/// PATCH `/invoices/{id}`
async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
    Json(payload): Json<InvoiceUpdate>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).update_invoice(id, payload).await?))
}

/// DELETE `/invoices/{id}` - Only unpaid invoices can be deleted.
async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> ApiResult<impl IntoResponse> {
    repo(&state).delete_invoice(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/invoices/{id}/items`
async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
    Json(payload): Json<NewInvoiceItem>,
) -> ApiResult<impl IntoResponse> {
    let invoice = repo(&state).add_item(id, payload).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// PUT `/invoices/{id}/items/{item_id}` - Replace an item.
async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(InvoiceId, i64)>,
    Json(payload): Json<NewInvoiceItem>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).update_item(id, item_id, payload).await?))
}

/// DELETE `/invoices/{id}/items/{item_id}`
async fn delete_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(InvoiceId, i64)>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).delete_item(id, item_id).await?))
}

/// POST `/invoices/{id}/mark-paid` - Record a payment amount directly.
async fn mark_as_paid(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
    payload: Option<Json<MarkPaidRequest>>,
) -> ApiResult<impl IntoResponse> {
    let amount = payload.and_then(|Json(body)| body.amount);
    Ok(Json(repo(&state).mark_as_paid(id, amount).await?))
}
