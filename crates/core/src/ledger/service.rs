//! Ledger service for journal entry and account validation.
//!
//! The service holds no state; lookups are passed in as closures so the
//! persistence layer can answer them from inside its own transaction.

use super::account::{AccountType, NewAccount};
use super::entry::{JournalTotals, NewJournalEntry};
use super::error::LedgerError;
use super::validation::validate_lines;

/// Information about an account needed for posting validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: i32,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Ledger service for journal entry validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validates a journal entry before it is persisted.
    ///
    /// Steps:
    /// 1. The description is non-empty
    /// 2. Every line is single-sided and non-negative, and there are at least 2
    /// 3. Every referenced account exists and is active
    /// 4. Total debits equal total credits
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails. Nothing is adjusted.
    pub fn validate_entry<A>(
        entry: &NewJournalEntry,
        account_lookup: A,
    ) -> Result<JournalTotals, LedgerError>
    where
        A: Fn(i32) -> Option<AccountInfo>,
    {
        if entry.description.trim().is_empty() {
            return Err(LedgerError::MissingDescription);
        }

        let totals = validate_lines(&entry.lines)?;

        for line in &entry.lines {
            let info =
                account_lookup(line.account_id).ok_or(LedgerError::AccountNotFound(line.account_id))?;
            if !info.is_active {
                return Err(LedgerError::AccountInactive(info.id));
            }
        }

        Ok(totals)
    }

    /// Validates a new chart-of-accounts entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or taken, or the parent is
    /// missing or of a different type.
    pub fn validate_new_account<C, P>(
        input: &NewAccount,
        code_exists: C,
        parent_type: P,
    ) -> Result<(), LedgerError>
    where
        C: Fn(&str) -> bool,
        P: Fn(i32) -> Option<AccountType>,
    {
        let code = input.code.trim();
        if code.is_empty() {
            return Err(LedgerError::MissingAccountCode);
        }
        if code_exists(code) {
            return Err(LedgerError::DuplicateAccountCode(code.to_string()));
        }
        if let Some(parent_id) = input.parent_id {
            let parent = parent_type(parent_id).ok_or(LedgerError::AccountNotFound(parent_id))?;
            if parent != input.account_type {
                return Err(LedgerError::ParentTypeMismatch(parent_id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::ledger::entry::{JournalEntryType, JournalLineInput};

    fn entry(lines: Vec<JournalLineInput>) -> NewJournalEntry {
        NewJournalEntry {
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "Initial capital investment".to_string(),
            entry_type: JournalEntryType::Manual,
            reference: None,
            lines,
            created_by: None,
        }
    }

    fn active(id: i32) -> Option<AccountInfo> {
        Some(AccountInfo { id, is_active: true })
    }

    #[test]
    fn test_valid_entry() {
        let input = entry(vec![
            JournalLineInput::debit(1, dec!(100000)),
            JournalLineInput::credit(11, dec!(100000)),
        ]);
        let totals = LedgerService::validate_entry(&input, active).unwrap();
        assert_eq!(totals.total_debit, dec!(100000));
        assert_eq!(totals.total_credit, dec!(100000));
    }

    #[test]
    fn test_unknown_account() {
        let input = entry(vec![
            JournalLineInput::debit(1, dec!(10)),
            JournalLineInput::credit(99, dec!(10)),
        ]);
        let result = LedgerService::validate_entry(&input, |id| if id == 99 { None } else { active(id) });
        assert_eq!(result, Err(LedgerError::AccountNotFound(99)));
    }

    #[test]
    fn test_inactive_account() {
        let input = entry(vec![
            JournalLineInput::debit(1, dec!(10)),
            JournalLineInput::credit(2, dec!(10)),
        ]);
        let result = LedgerService::validate_entry(&input, |id| {
            Some(AccountInfo {
                id,
                is_active: id != 2,
            })
        });
        assert_eq!(result, Err(LedgerError::AccountInactive(2)));
    }

    #[test]
    fn test_blank_description() {
        let mut input = entry(vec![
            JournalLineInput::debit(1, dec!(10)),
            JournalLineInput::credit(2, dec!(10)),
        ]);
        input.description = "   ".to_string();
        assert_eq!(
            LedgerService::validate_entry(&input, active),
            Err(LedgerError::MissingDescription)
        );
    }

    #[test]
    fn test_unbalanced_entry_checked_before_accounts() {
        let input = entry(vec![
            JournalLineInput::debit(1, dec!(10)),
            JournalLineInput::credit(2, dec!(9.99)),
        ]);
        assert!(matches!(
            LedgerService::validate_entry(&input, |_| None),
            Err(LedgerError::UnbalancedEntry { .. })
        ));
    }

    fn new_account(code: &str, parent_id: Option<i32>) -> NewAccount {
        NewAccount {
            code: code.to_string(),
            name: "Petty Cash".to_string(),
            account_type: AccountType::Asset,
            parent_id,
            description: None,
        }
    }

    #[test]
    fn test_new_account_duplicate_code() {
        let result =
            LedgerService::validate_new_account(&new_account("100", None), |c| c == "100", |_| None);
        assert_eq!(result, Err(LedgerError::DuplicateAccountCode("100".into())));
    }

    #[test]
    fn test_new_account_parent_rules() {
        let ok = LedgerService::validate_new_account(
            &new_account("101", Some(1)),
            |_| false,
            |_| Some(AccountType::Asset),
        );
        assert!(ok.is_ok());

        let mismatch = LedgerService::validate_new_account(
            &new_account("101", Some(1)),
            |_| false,
            |_| Some(AccountType::Revenue),
        );
        assert_eq!(mismatch, Err(LedgerError::ParentTypeMismatch(1)));

        let missing =
            LedgerService::validate_new_account(&new_account("101", Some(5)), |_| false, |_| None);
        assert_eq!(missing, Err(LedgerError::AccountNotFound(5)));
    }

    #[test]
    fn test_new_account_blank_code() {
        let result = LedgerService::validate_new_account(&new_account(" ", None), |_| false, |_| None);
        assert_eq!(result, Err(LedgerError::MissingAccountCode));
    }
}
