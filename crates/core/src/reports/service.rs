//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountBalanceRow, AssetsSection, BalanceSheetLine, BalanceSheetReport, EquitySection,
    IncomeStatementReport, IncomeStatementSection, LiabilitiesSection, TrialBalanceReport,
    TrialBalanceTotals,
};
use crate::ledger::chart::{BalanceSheetBucket, RETAINED_EARNINGS_CODE};
use crate::ledger::AccountType;

/// Name and description of the synthesized retained earnings line.
const RETAINED_EARNINGS_NAME: &str = "Retained Earnings";
const RETAINED_EARNINGS_DESCRIPTION: &str = "Accumulated profits/losses";

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a balance sheet from the as-of balances of the active chart.
    ///
    /// Accounts with a zero balance are omitted. Assets and liabilities are
    /// bucketed by account code. When no equity line named like "retained
    /// earnings" is present, one is synthesized from revenue minus expenses,
    /// provided that difference is non-zero.
    #[must_use]
    pub fn generate_balance_sheet(
        as_of_date: NaiveDate,
        accounts: &[AccountBalanceRow],
    ) -> BalanceSheetReport {
        let mut assets = AssetsSection::default();
        let mut liabilities = LiabilitiesSection::default();
        let mut equity = EquitySection::default();

        for row in accounts.iter().filter(|r| !r.balance.is_zero()) {
            let Some(bucket) = BalanceSheetBucket::classify(row.account_type, &row.code) else {
                continue;
            };
            let line = BalanceSheetLine::from(row);
            match bucket {
                BalanceSheetBucket::CurrentAsset => {
                    assets.total_current_assets += line.balance;
                    assets.current_assets.push(line);
                }
                BalanceSheetBucket::FixedAsset => {
                    assets.total_fixed_assets += line.balance;
                    assets.fixed_assets.push(line);
                }
                BalanceSheetBucket::CurrentLiability => {
                    liabilities.total_current_liabilities += line.balance;
                    liabilities.current_liabilities.push(line);
                }
                BalanceSheetBucket::LongTermLiability => {
                    liabilities.total_long_term_liabilities += line.balance;
                    liabilities.long_term_liabilities.push(line);
                }
                BalanceSheetBucket::Equity => {
                    equity.total_equity += line.balance;
                    equity.accounts.push(line);
                }
            }
        }

        let has_retained_earnings = equity
            .accounts
            .iter()
            .any(|l| l.account_name.to_lowercase().contains("retained"));
        if !has_retained_earnings {
            let retained = Self::net_income(accounts);
            if !retained.is_zero() {
                equity.total_equity += retained;
                equity.accounts.push(BalanceSheetLine {
                    account_code: RETAINED_EARNINGS_CODE.to_string(),
                    account_name: RETAINED_EARNINGS_NAME.to_string(),
                    balance: retained,
                    description: Some(RETAINED_EARNINGS_DESCRIPTION.to_string()),
                });
            }
        }

        assets.total_assets = assets.total_current_assets + assets.total_fixed_assets;
        liabilities.total_liabilities =
            liabilities.total_current_liabilities + liabilities.total_long_term_liabilities;
        let total_liabilities_and_equity = liabilities.total_liabilities + equity.total_equity;

        BalanceSheetReport {
            is_balanced: assets.total_assets == total_liabilities_and_equity,
            assets,
            liabilities,
            equity,
            total_liabilities_and_equity,
            as_of_date,
        }
    }

    /// Generates a trial balance report from account balances.
    ///
    /// The trial balance verifies that total debits equal total credits.
    #[must_use]
    pub fn generate_trial_balance(
        as_of: NaiveDate,
        accounts: Vec<AccountBalanceRow>,
    ) -> TrialBalanceReport {
        let total_debit: Decimal = accounts.iter().map(|a| a.total_debit).sum();
        let total_credit: Decimal = accounts.iter().map(|a| a.total_credit).sum();

        TrialBalanceReport {
            as_of,
            accounts,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: total_debit == total_credit,
            },
        }
    }

    /// Generates an income statement from balances accumulated over a period.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `period_start` is after
    /// `period_end`.
    pub fn generate_income_statement(
        period_start: Option<NaiveDate>,
        period_end: NaiveDate,
        accounts: Vec<AccountBalanceRow>,
    ) -> Result<IncomeStatementReport, ReportError> {
        if let Some(start) = period_start
            && start > period_end
        {
            return Err(ReportError::InvalidDateRange {
                start,
                end: period_end,
            });
        }

        let mut revenue = IncomeStatementSection::default();
        let mut expenses = IncomeStatementSection::default();

        for account in accounts {
            match account.account_type {
                AccountType::Revenue => Self::add_to_income_section(&mut revenue, account),
                AccountType::Expense => Self::add_to_income_section(&mut expenses, account),
                _ => {}
            }
        }

        Ok(IncomeStatementReport {
            period_start,
            period_end,
            net_income: revenue.total - expenses.total,
            revenue,
            expenses,
        })
    }

    /// Sum of revenue balances minus sum of expense balances.
    #[must_use]
    pub fn net_income(accounts: &[AccountBalanceRow]) -> Decimal {
        let total_of = |account_type: AccountType| -> Decimal {
            accounts
                .iter()
                .filter(|a| a.account_type == account_type)
                .map(|a| a.balance)
                .sum()
        };
        total_of(AccountType::Revenue) - total_of(AccountType::Expense)
    }

    fn add_to_income_section(section: &mut IncomeStatementSection, account: AccountBalanceRow) {
        section.total += account.balance;
        section.accounts.push(account);
    }
}
