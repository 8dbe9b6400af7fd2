//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounting;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod master_data;
pub mod orders;
pub mod payments;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(master_data::routes())
        .merge(orders::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
        .merge(accounting::routes())
        .merge(inventory::routes())
}
