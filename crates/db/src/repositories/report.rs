//! Financial report repository.
//!
//! Loads balance rows for the requested period and hands them to
//! [`ReportService`], which does all of the assembly.

use chrono::NaiveDate;
use orbis_core::reports::{
    BalanceSheetReport, IncomeStatementReport, ReportError, ReportService, TrialBalanceReport,
};
use orbis_shared::AppError;
use sea_orm::{DatabaseConnection, DbErr};

use super::account::balance_rows;
use crate::error;

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportRepoError {
    /// Rejected by the report rules.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportRepoError> for AppError {
    fn from(err: ReportRepoError) -> Self {
        match &err {
            ReportRepoError::Report(e) => error::report(e),
            ReportRepoError::Database(e) => error::database(e),
        }
    }
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn balance_sheet(
        &self,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportRepoError> {
        let rows = balance_rows(&self.db, None, as_of).await?;
        Ok(ReportService::generate_balance_sheet(as_of, &rows))
    }

    /// Trial balance as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn trial_balance(
        &self,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportRepoError> {
        let rows = balance_rows(&self.db, None, as_of).await?;
        Ok(ReportService::generate_trial_balance(as_of, rows))
    }

    /// Income statement for an inclusive period; an open start means since
    /// the first entry.
    ///
    /// # Errors
    ///
    /// Returns an error if `from` is after `to` or the query fails.
    pub async fn income_statement(
        &self,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportRepoError> {
        if let Some(start) = from
            && start > to
        {
            return Err(ReportError::InvalidDateRange { start, end: to }.into());
        }
        let rows = balance_rows(&self.db, from, to).await?;
        Ok(ReportService::generate_income_statement(from, to, rows)?)
    }
}
