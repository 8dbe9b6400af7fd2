//! Chart of accounts repository and balance queries.
//!
//! Balances are never stored. They are aggregated from posted journal lines
//! in SQL and signed by the account's normal side in `orbis-core`.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use orbis_core::ledger::{
    Account, AccountBalance, AccountType, DEFAULT_CHART, LedgerError, LedgerService, NewAccount,
    PostingStatus,
};
use orbis_core::reports::AccountBalanceRow;
use orbis_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;

use crate::entities::{
    chart_of_accounts, journal_entries, journal_lines,
    sea_orm_active_enums::AccountType as DbAccountType,
};
use crate::error;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountRepoError {
    /// Rejected by the ledger rules.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountRepoError> for AppError {
    fn from(err: AccountRepoError) -> Self {
        match &err {
            AccountRepoError::Ledger(e) => error::ledger(e),
            AccountRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            AccountRepoError::Database(e) => error::database(e),
        }
    }
}

/// An account with its balance as of a date.
#[derive(Debug, Clone, Serialize)]
pub struct AccountWithBalance {
    /// The account.
    #[serde(flatten)]
    pub account: Account,
    /// Signed balance.
    pub balance: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    account_id: i32,
    total_debit: Option<Decimal>,
    total_credit: Option<Decimal>,
}

/// Sums debits and credits of posted lines per account over an inclusive
/// date range.
async fn posted_totals<C: ConnectionTrait>(
    conn: &C,
    account_id: Option<i32>,
    from: Option<NaiveDate>,
    to: NaiveDate,
) -> Result<HashMap<i32, (Decimal, Decimal)>, DbErr> {
    let mut query = journal_lines::Entity::find()
        .select_only()
        .column(journal_lines::Column::AccountId)
        .column_as(journal_lines::Column::Debit.sum(), "total_debit")
        .column_as(journal_lines::Column::Credit.sum(), "total_credit")
        .join(
            JoinType::InnerJoin,
            journal_lines::Relation::JournalEntries.def(),
        )
        .filter(journal_entries::Column::IsPosted.eq(PostingStatus::Posted.is_posted()))
        .filter(journal_entries::Column::EntryDate.lte(to))
        .group_by(journal_lines::Column::AccountId);
    if let Some(from) = from {
        query = query.filter(journal_entries::Column::EntryDate.gte(from));
    }
    if let Some(account_id) = account_id {
        query = query.filter(journal_lines::Column::AccountId.eq(account_id));
    }

    let rows = query.into_model::<TotalsRow>().all(conn).await?;
    Ok(rows
        .into_iter()
        .map(|r| {
            (
                r.account_id,
                (
                    r.total_debit.unwrap_or_default(),
                    r.total_credit.unwrap_or_default(),
                ),
            )
        })
        .collect())
}

fn balance_of(
    account_id: i32,
    account_type: AccountType,
    totals: &HashMap<i32, (Decimal, Decimal)>,
) -> AccountBalance {
    let (debit, credit) = totals.get(&account_id).copied().unwrap_or_default();
    AccountBalance::from_totals(account_id, account_type.normal_balance(), debit, credit)
}

/// Balance rows of all active accounts, ordered by code.
///
/// # Errors
///
/// Returns an error if a query fails.
pub(crate) async fn balance_rows<C: ConnectionTrait>(
    conn: &C,
    from: Option<NaiveDate>,
    to: NaiveDate,
) -> Result<Vec<AccountBalanceRow>, DbErr> {
    let accounts = chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::IsActive.eq(true))
        .order_by_asc(chart_of_accounts::Column::Code)
        .all(conn)
        .await?;
    let totals = posted_totals(conn, None, from, to).await?;

    Ok(accounts
        .into_iter()
        .map(|model| {
            let account = Account::from(model);
            let balance = balance_of(account.id, account.account_type, &totals);
            AccountBalanceRow::new(
                account.code,
                account.name,
                account.account_type,
                account.description,
                &balance,
            )
        })
        .collect())
}

/// Chart of accounts repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or taken, or the parent is
    /// missing or of a different type.
    pub async fn create_account(&self, input: NewAccount) -> Result<Account, AccountRepoError> {
        let code = input.code.trim().to_string();
        let txn = self.db.begin().await?;

        let code_taken = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::Code.eq(code.as_str()))
            .one(&txn)
            .await?
            .is_some();
        let parent_type = match input.parent_id {
            Some(parent_id) => chart_of_accounts::Entity::find_by_id(parent_id)
                .one(&txn)
                .await?
                .map(|p| AccountType::from(p.account_type)),
            None => None,
        };
        LedgerService::validate_new_account(&input, |_| code_taken, |_| parent_type)?;

        let model = chart_of_accounts::ActiveModel {
            code: Set(code),
            name: Set(input.name),
            account_type: Set(DbAccountType::from(input.account_type)),
            parent_id: Set(input.parent_id),
            is_active: Set(true),
            description: Set(input.description),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(code = %model.code, account_type = ?model.account_type, "account created");
        Ok(Account::from(model))
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub async fn get_account(&self, id: i32) -> Result<Account, AccountRepoError> {
        chart_of_accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Account::from)
            .ok_or(AccountRepoError::NotFound(id))
    }

    /// Lists all accounts with their balances as of `as_of`, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list_accounts(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountWithBalance>, AccountRepoError> {
        let accounts = chart_of_accounts::Entity::find()
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await?;
        let totals = posted_totals(&self.db, None, None, as_of).await?;

        Ok(accounts
            .into_iter()
            .map(|model| {
                let account = Account::from(model);
                let balance = balance_of(account.id, account.account_type, &totals).balance;
                AccountWithBalance { account, balance }
            })
            .collect())
    }

    /// Computes an account's balance from posted lines dated on or before
    /// `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub async fn account_balance(
        &self,
        id: i32,
        as_of: NaiveDate,
    ) -> Result<AccountBalance, AccountRepoError> {
        let account = self.get_account(id).await?;
        let totals = posted_totals(&self.db, Some(id), None, as_of).await?;
        Ok(balance_of(id, account.account_type, &totals))
    }

    /// Inserts the starter chart unless any account exists.
    ///
    /// Returns the number of accounts inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn bootstrap_default_chart(&self) -> Result<usize, AccountRepoError> {
        let txn = self.db.begin().await?;
        if chart_of_accounts::Entity::find().count(&txn).await? > 0 {
            txn.commit().await?;
            tracing::debug!("chart of accounts already present, skipping bootstrap");
            return Ok(0);
        }

        let now = Utc::now();
        for account in &DEFAULT_CHART {
            chart_of_accounts::ActiveModel {
                code: Set(account.code.to_string()),
                name: Set(account.name.to_string()),
                account_type: Set(DbAccountType::from(account.account_type)),
                parent_id: Set(None),
                is_active: Set(true),
                description: Set(Some(account.description.to_string())),
                created_at: Set(now.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        tracing::info!(accounts = DEFAULT_CHART.len(), "default chart of accounts created");
        Ok(DEFAULT_CHART.len())
    }
}
