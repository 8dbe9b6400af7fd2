//! Default chart of accounts and balance-sheet code buckets.
//!
//! Asset and liability accounts are split into current and non-current groups
//! by the leading digits of their code. The starter chart below follows the
//! same convention, so a freshly bootstrapped ledger reports correctly.

use serde::Serialize;

use super::account::AccountType;

/// Code of the retained earnings account, also used for the synthesized line.
pub const RETAINED_EARNINGS_CODE: &str = "350";

/// Code prefixes of current assets (cash, receivables, inventory, prepaids).
const CURRENT_ASSET_PREFIXES: [&str; 5] = ["100", "110", "120", "130", "140"];

/// Code prefixes of current liabilities (payables, accruals, short-term debt).
const CURRENT_LIABILITY_PREFIXES: [&str; 3] = ["200", "210", "220"];

/// One account of the starter chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DefaultAccount {
    /// Account code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Account class.
    pub account_type: AccountType,
    /// Description.
    pub description: &'static str,
}

const fn account(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    description: &'static str,
) -> DefaultAccount {
    DefaultAccount {
        code,
        name,
        account_type,
        description,
    }
}

/// Starter chart inserted by the bootstrap when no account exists yet.
pub const DEFAULT_CHART: [DefaultAccount; 20] = [
    account("100", "Cash", AccountType::Asset, "Cash on hand and in bank"),
    account("110", "Accounts Receivable", AccountType::Asset, "Amounts owed by customers"),
    account("120", "Inventory", AccountType::Asset, "Stock on hand"),
    account("130", "Prepaid Expenses", AccountType::Asset, "Prepaid insurance, rent, etc."),
    account("150", "Equipment", AccountType::Asset, "Office equipment and machinery"),
    account("160", "Accumulated Depreciation", AccountType::Asset, "Depreciation on equipment"),
    account("200", "Accounts Payable", AccountType::Liability, "Amounts owed to suppliers"),
    account("210", "Accrued Expenses", AccountType::Liability, "Accrued wages, utilities, etc."),
    account("220", "Short-term Debt", AccountType::Liability, "Short-term loans and credit"),
    account("250", "Long-term Debt", AccountType::Liability, "Long-term loans and mortgages"),
    account("300", "Owner's Equity", AccountType::Equity, "Initial capital investment"),
    account(RETAINED_EARNINGS_CODE, "Retained Earnings", AccountType::Equity, "Accumulated profits/losses"),
    account("400", "Sales Revenue", AccountType::Revenue, "Revenue from sales"),
    account("410", "Service Revenue", AccountType::Revenue, "Revenue from services"),
    account("500", "Cost of Goods Sold", AccountType::Expense, "Direct costs of products sold"),
    account("510", "Salaries and Wages", AccountType::Expense, "Employee compensation"),
    account("520", "Rent Expense", AccountType::Expense, "Office and warehouse rent"),
    account("530", "Utilities Expense", AccountType::Expense, "Electricity, water, internet"),
    account("540", "Office Supplies", AccountType::Expense, "Office supplies and materials"),
    account("550", "Depreciation Expense", AccountType::Expense, "Depreciation on equipment"),
];

/// Looks up a starter-chart account by code.
#[must_use]
pub fn default_account(code: &str) -> Option<&'static DefaultAccount> {
    DEFAULT_CHART.iter().find(|a| a.code == code)
}

/// Balance-sheet section an account is presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSheetBucket {
    /// Assets expected to turn into cash within a year.
    CurrentAsset,
    /// Long-lived assets.
    FixedAsset,
    /// Obligations due within a year.
    CurrentLiability,
    /// Obligations due later.
    LongTermLiability,
    /// Owner's equity.
    Equity,
}

impl BalanceSheetBucket {
    /// Classifies an account for balance-sheet presentation.
    ///
    /// Returns `None` for revenue and expense accounts, which only reach the
    /// balance sheet through retained earnings.
    #[must_use]
    pub fn classify(account_type: AccountType, code: &str) -> Option<Self> {
        match account_type {
            AccountType::Asset => Some(if has_prefix(code, &CURRENT_ASSET_PREFIXES) {
                Self::CurrentAsset
            } else {
                Self::FixedAsset
            }),
            AccountType::Liability => {
                Some(if has_prefix(code, &CURRENT_LIABILITY_PREFIXES) {
                    Self::CurrentLiability
                } else {
                    Self::LongTermLiability
                })
            }
            AccountType::Equity => Some(Self::Equity),
            AccountType::Revenue | AccountType::Expense => None,
        }
    }
}

fn has_prefix(code: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| code.starts_with(p))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("100", BalanceSheetBucket::CurrentAsset)]
    #[case("110", BalanceSheetBucket::CurrentAsset)]
    #[case("1405", BalanceSheetBucket::CurrentAsset)]
    #[case("150", BalanceSheetBucket::FixedAsset)]
    #[case("160", BalanceSheetBucket::FixedAsset)]
    fn test_asset_buckets(#[case] code: &str, #[case] expected: BalanceSheetBucket) {
        assert_eq!(
            BalanceSheetBucket::classify(AccountType::Asset, code),
            Some(expected)
        );
    }

    #[rstest]
    #[case("200", BalanceSheetBucket::CurrentLiability)]
    #[case("220", BalanceSheetBucket::CurrentLiability)]
    #[case("250", BalanceSheetBucket::LongTermLiability)]
    fn test_liability_buckets(#[case] code: &str, #[case] expected: BalanceSheetBucket) {
        assert_eq!(
            BalanceSheetBucket::classify(AccountType::Liability, code),
            Some(expected)
        );
    }

    #[test]
    fn test_income_accounts_have_no_bucket() {
        assert_eq!(BalanceSheetBucket::classify(AccountType::Revenue, "400"), None);
        assert_eq!(BalanceSheetBucket::classify(AccountType::Expense, "500"), None);
    }

    #[test]
    fn test_default_chart_codes_are_unique() {
        let codes: HashSet<_> = DEFAULT_CHART.iter().map(|a| a.code).collect();
        assert_eq!(codes.len(), DEFAULT_CHART.len());
    }

    #[test]
    fn test_default_chart_spans_all_types() {
        for account_type in AccountType::ALL {
            assert!(DEFAULT_CHART.iter().any(|a| a.account_type == account_type));
        }
    }

    #[test]
    fn test_default_account_lookup() {
        let re = default_account(RETAINED_EARNINGS_CODE).unwrap();
        assert_eq!(re.name, "Retained Earnings");
        assert_eq!(re.account_type, AccountType::Equity);
        assert!(default_account("999").is_none());
    }
}
