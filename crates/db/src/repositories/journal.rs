//! Journal entry repository.
//!
//! Entries are validated in full before anything is written and are posted
//! in the same transaction that inserts them.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use orbis_core::ledger::{AccountInfo, LedgerError, LedgerService, NewJournalEntry, PostingStatus};
use orbis_core::numbering::SequenceScope;
use orbis_shared::AppError;
use orbis_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{fetch_page, sequence};
use crate::entities::{
    chart_of_accounts, journal_entries, journal_lines,
    sea_orm_active_enums::JournalEntryType as DbJournalEntryType,
};
use crate::error;

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalRepoError {
    /// Rejected by the ledger rules.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JournalRepoError> for AppError {
    fn from(err: JournalRepoError) -> Self {
        match &err {
            JournalRepoError::Ledger(e) => error::ledger(e),
            JournalRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            JournalRepoError::Database(e) => error::database(e),
        }
    }
}

/// A journal entry with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntryWithLines {
    /// Entry header.
    #[serde(flatten)]
    pub entry: journal_entries::Model,
    /// Entry lines, in insertion order.
    pub lines: Vec<journal_lines::Model>,
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalFilter {
    /// Entries dated on or after this date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Entries dated on or before this date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and posts a journal entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is unbalanced, has fewer than two lines,
    /// has an invalid line, or references a missing or inactive account.
    /// Nothing is written in that case.
    pub async fn create_entry(
        &self,
        input: NewJournalEntry,
    ) -> Result<JournalEntryWithLines, JournalRepoError> {
        let txn = self.db.begin().await?;

        let mut account_ids: Vec<i32> = input.lines.iter().map(|l| l.account_id).collect();
        account_ids.sort_unstable();
        account_ids.dedup();
        let accounts: HashMap<i32, AccountInfo> = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::Id.is_in(account_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|a| {
                (
                    a.id,
                    AccountInfo {
                        id: a.id,
                        is_active: a.is_active,
                    },
                )
            })
            .collect();
        let totals = LedgerService::validate_entry(&input, |id| accounts.get(&id).copied())?;

        let entry_number =
            sequence::next_number(&txn, &SequenceScope::JournalEntry { date: input.date }).await?;
        let id = Uuid::now_v7();
        let entry = journal_entries::ActiveModel {
            id: Set(id),
            entry_number: Set(entry_number),
            entry_date: Set(input.date),
            description: Set(input.description.trim().to_string()),
            entry_type: Set(DbJournalEntryType::from(input.entry_type)),
            reference: Set(input.reference),
            total_debit: Set(totals.total_debit),
            total_credit: Set(totals.total_credit),
            is_posted: Set(PostingStatus::Posted.is_posted()),
            created_by: Set(input.created_by.map(|u| u.into_inner())),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in input.lines {
            let model = journal_lines::ActiveModel {
                journal_entry_id: Set(id),
                account_id: Set(line.account_id),
                description: Set(line.description),
                debit: Set(line.debit),
                credit: Set(line.credit),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            lines.push(model);
        }
        txn.commit().await?;

        tracing::info!(
            entry_number = %entry.entry_number,
            total = %entry.total_debit,
            lines = lines.len(),
            "journal entry posted"
        );
        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Finds a journal entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist.
    pub async fn get_entry(&self, id: Uuid) -> Result<JournalEntryWithLines, JournalRepoError> {
        let entry = journal_entries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(JournalRepoError::NotFound(id))?;
        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.eq(id))
            .order_by_asc(journal_lines::Column::Id)
            .all(&self.db)
            .await?;
        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Lists journal entry headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_entries(
        &self,
        filter: &JournalFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<journal_entries::Model>, JournalRepoError> {
        let mut query = journal_entries::Entity::find()
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::EntryNumber);
        if let Some(from) = filter.from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        Ok(fetch_page(&self.db, query, page).await?)
    }
}
