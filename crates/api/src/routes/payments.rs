//! Payment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use orbis_core::billing::NewPayment;
use orbis_db::PaymentRepository;
use orbis_db::repositories::PaymentFilter;
use orbis_shared::types::{PageRequest, PaymentId};

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::ActingUser;

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/{id}", get(get_payment))
}

/// POST `/payments` - Record a payment, applying receipts to their invoice.
async fn create_payment(
    State(state): State<AppState>,
    user: ActingUser,
    Json(mut payload): Json<NewPayment>,
) -> ApiResult<impl IntoResponse> {
    payload.created_by = payload.created_by.or(user.user_id());
    let payment = PaymentRepository::new(state.conn())
        .create_payment(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// GET `/payments` - List payments, newest first.
async fn list_payments(
    State(state): State<AppState>,
    Query(filter): Query<PaymentFilter>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let payments = PaymentRepository::new(state.conn())
        .list_payments(&filter, &page)
        .await?;
    Ok(Json(payments))
}

/// GET `/payments/{id}`
async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        PaymentRepository::new(state.conn()).get_payment(id).await?,
    ))
}
