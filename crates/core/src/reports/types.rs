//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{AccountBalance, AccountType};

/// Account balance for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalanceRow {
    /// Account ID.
    pub account_id: i32,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account description.
    pub description: Option<String>,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance, signed by the account's normal side.
    pub balance: Decimal,
}

impl AccountBalanceRow {
    /// Builds a row from account attributes and its computed balance.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        description: Option<String>,
        balance: &AccountBalance,
    ) -> Self {
        Self {
            account_id: balance.account_id,
            code: code.into(),
            name: name.into(),
            account_type,
            description,
            total_debit: balance.debit_total,
            total_credit: balance.credit_total,
            balance: balance.balance,
        }
    }
}

/// One account line on the balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetLine {
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Balance as of the report date.
    pub balance: Decimal,
    /// Account description.
    pub description: Option<String>,
}

impl From<&AccountBalanceRow> for BalanceSheetLine {
    fn from(row: &AccountBalanceRow) -> Self {
        Self {
            account_code: row.code.clone(),
            account_name: row.name.clone(),
            balance: row.balance,
            description: row.description.clone(),
        }
    }
}

/// Assets section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsSection {
    /// Current assets.
    pub current_assets: Vec<BalanceSheetLine>,
    /// Fixed assets.
    pub fixed_assets: Vec<BalanceSheetLine>,
    /// Sum of current assets.
    pub total_current_assets: Decimal,
    /// Sum of fixed assets.
    pub total_fixed_assets: Decimal,
    /// Current plus fixed.
    pub total_assets: Decimal,
}

/// Liabilities section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiabilitiesSection {
    /// Current liabilities.
    pub current_liabilities: Vec<BalanceSheetLine>,
    /// Long-term liabilities.
    pub long_term_liabilities: Vec<BalanceSheetLine>,
    /// Sum of current liabilities.
    pub total_current_liabilities: Decimal,
    /// Sum of long-term liabilities.
    pub total_long_term_liabilities: Decimal,
    /// Current plus long-term.
    pub total_liabilities: Decimal,
}

/// Equity section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquitySection {
    /// Equity lines, including synthesized retained earnings.
    pub accounts: Vec<BalanceSheetLine>,
    /// Sum of equity lines.
    pub total_equity: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Assets section.
    pub assets: AssetsSection,
    /// Liabilities section.
    pub liabilities: LiabilitiesSection,
    /// Equity section.
    pub equity: EquitySection,
    /// Liabilities plus equity.
    pub total_liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
    /// As of date.
    pub as_of_date: NaiveDate,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Account balances.
    pub accounts: Vec<AccountBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// Income statement section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountBalanceRow>,
}

/// Income statement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Period start date, inclusive. `None` means from the first entry.
    pub period_start: Option<NaiveDate>,
    /// Period end date, inclusive.
    pub period_end: NaiveDate,
    /// Revenue section.
    pub revenue: IncomeStatementSection,
    /// Expense section.
    pub expenses: IncomeStatementSection,
    /// Revenue minus expenses.
    pub net_income: Decimal,
}
