//! Chart of accounts, journal entry and financial report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use orbis_core::ledger::{NewAccount, NewJournalEntry};
use orbis_db::repositories::JournalFilter;
use orbis_db::{AccountRepository, JournalRepository, ReportRepository};
use orbis_shared::types::PageRequest;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::ActingUser;

/// Creates the accounting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}/balance", get(account_balance))
        .route("/journal-entries", get(list_entries).post(create_entry))
        .route("/journal-entries/{id}", get(get_entry))
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/trial-balance", get(trial_balance))
        .route("/reports/income-statement", get(income_statement))
}

/// `?as_of=` query; today when absent.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    /// Inclusive cut-off date.
    pub as_of: Option<NaiveDate>,
}

impl AsOfQuery {
    fn date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// `?from=&to=` query of the income statement.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// First day of the period; open when absent.
    pub from: Option<NaiveDate>,
    /// Last day of the period; today when absent.
    pub to: Option<NaiveDate>,
}

// ============================================================================
// Accounts
// ============================================================================

/// GET `/accounts` - Chart of accounts with balances as of a date.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<impl IntoResponse> {
    let accounts = AccountRepository::new(state.conn())
        .list_accounts(query.date())
        .await?;
    Ok(Json(accounts))
}

/// POST `/accounts` - Create an account with a unique code.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<NewAccount>,
) -> ApiResult<impl IntoResponse> {
    let account = AccountRepository::new(state.conn())
        .create_account(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts/{id}`
async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(AccountRepository::new(state.conn()).get_account(id).await?))
}

/// GET `/accounts/{id}/balance` - Signed balance as of a date.
async fn account_balance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<impl IntoResponse> {
    let balance = AccountRepository::new(state.conn())
        .account_balance(id, query.date())
        .await?;
    Ok(Json(balance))
}

// ============================================================================
// Journal entries
// ============================================================================

/// POST `/journal-entries` - Validate and post a balanced entry.
async fn create_entry(
    State(state): State<AppState>,
    user: ActingUser,
    Json(mut payload): Json<NewJournalEntry>,
) -> ApiResult<impl IntoResponse> {
    payload.created_by = payload.created_by.or(user.user_id());
    let entry = JournalRepository::new(state.conn())
        .create_entry(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET `/journal-entries` - List entries, newest first.
async fn list_entries(
    State(state): State<AppState>,
    Query(filter): Query<JournalFilter>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let entries = JournalRepository::new(state.conn())
        .list_entries(&filter, &page)
        .await?;
    Ok(Json(entries))
}

/// GET `/journal-entries/{id}` - Entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(JournalRepository::new(state.conn()).get_entry(id).await?))
}

// ============================================================================
// Reports
// ============================================================================

/// GET `/reports/balance-sheet`
async fn balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportRepository::new(state.conn())
        .balance_sheet(query.date())
        .await?;
    Ok(Json(report))
}

/// GET `/reports/trial-balance`
async fn trial_balance(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportRepository::new(state.conn())
        .trial_balance(query.date())
        .await?;
    Ok(Json(report))
}

/// GET `/reports/income-statement`
async fn income_statement(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<impl IntoResponse> {
    let to = query.to.unwrap_or_else(|| Utc::now().date_naive());
    let report = ReportRepository::new(state.conn())
        .income_statement(query.from, to)
        .await?;
    Ok(Json(report))
}
