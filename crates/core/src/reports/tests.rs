//! Tests for the reports module.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::service::ReportService;
use super::types::AccountBalanceRow;
use crate::ledger::AccountType;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
}

fn row(id: i32, code: &str, name: &str, account_type: AccountType, balance: Decimal) -> AccountBalanceRow {
    let (total_debit, total_credit) = match account_type.normal_balance() {
        crate::ledger::NormalBalance::Debit if balance >= Decimal::ZERO => (balance, Decimal::ZERO),
        crate::ledger::NormalBalance::Debit => (Decimal::ZERO, -balance),
        crate::ledger::NormalBalance::Credit if balance >= Decimal::ZERO => (Decimal::ZERO, balance),
        crate::ledger::NormalBalance::Credit => (-balance, Decimal::ZERO),
    };
    AccountBalanceRow {
        account_id: id,
        code: code.to_string(),
        name: name.to_string(),
        account_type,
        description: None,
        total_debit,
        total_credit,
        balance,
    }
}

// ============================================================================
// Balance sheet
// ============================================================================

#[test]
fn test_balance_sheet_buckets_and_totals() {
    let accounts = vec![
        row(1, "100", "Cash", AccountType::Asset, dec!(65000)),
        row(2, "150", "Equipment", AccountType::Asset, dec!(25000)),
        row(3, "200", "Accounts Payable", AccountType::Liability, dec!(5000)),
        row(4, "250", "Long-term Debt", AccountType::Liability, dec!(0)),
        row(5, "300", "Owner's Equity", AccountType::Equity, dec!(85000)),
    ];

    let sheet = ReportService::generate_balance_sheet(as_of(), &accounts);

    assert_eq!(sheet.assets.current_assets.len(), 1);
    assert_eq!(sheet.assets.current_assets[0].account_code, "100");
    assert_eq!(sheet.assets.fixed_assets[0].account_code, "150");
    assert_eq!(sheet.assets.total_current_assets, dec!(65000));
    assert_eq!(sheet.assets.total_fixed_assets, dec!(25000));
    assert_eq!(sheet.assets.total_assets, dec!(90000));
    assert_eq!(sheet.liabilities.total_current_liabilities, dec!(5000));
    assert!(sheet.liabilities.long_term_liabilities.is_empty());
    assert_eq!(sheet.equity.total_equity, dec!(85000));
    assert_eq!(sheet.total_liabilities_and_equity, dec!(90000));
    assert!(sheet.is_balanced);
    assert_eq!(sheet.as_of_date, as_of());
}

#[test]
fn test_balance_sheet_synthesizes_retained_earnings() {
    // The six demonstration entries: capital, equipment, inventory on credit,
    // credit sale, COGS, supplier payment.
    let accounts = vec![
        row(1, "100", "Cash", AccountType::Asset, dec!(65000)),
        row(2, "110", "Accounts Receivable", AccountType::Asset, dec!(8000)),
        row(3, "120", "Inventory", AccountType::Asset, dec!(10000)),
        row(4, "150", "Equipment", AccountType::Asset, dec!(25000)),
        row(5, "200", "Accounts Payable", AccountType::Liability, dec!(5000)),
        row(6, "300", "Owner's Equity", AccountType::Equity, dec!(100000)),
        row(7, "350", "Retained Earnings", AccountType::Equity, dec!(0)),
        row(8, "400", "Sales Revenue", AccountType::Revenue, dec!(8000)),
        row(9, "500", "Cost of Goods Sold", AccountType::Expense, dec!(5000)),
    ];

    let sheet = ReportService::generate_balance_sheet(as_of(), &accounts);

    let retained = sheet
        .equity
        .accounts
        .iter()
        .find(|l| l.account_code == "350")
        .unwrap();
    assert_eq!(retained.balance, dec!(3000));
    assert_eq!(retained.description.as_deref(), Some("Accumulated profits/losses"));
    assert_eq!(sheet.equity.total_equity, dec!(103000));
    assert_eq!(sheet.assets.total_assets, dec!(108000));
    assert!(sheet.is_balanced);
}

#[test]
fn test_balance_sheet_keeps_explicit_retained_earnings() {
    let accounts = vec![
        row(1, "100", "Cash", AccountType::Asset, dec!(1500)),
        row(2, "350", "Retained Earnings", AccountType::Equity, dec!(1500)),
        row(3, "400", "Sales Revenue", AccountType::Revenue, dec!(700)),
    ];

    let sheet = ReportService::generate_balance_sheet(as_of(), &accounts);

    assert_eq!(sheet.equity.accounts.len(), 1);
    assert_eq!(sheet.equity.total_equity, dec!(1500));
}

#[test]
fn test_balance_sheet_matches_retained_earnings_by_name() {
    let accounts = vec![
        row(1, "100", "Cash", AccountType::Asset, dec!(900)),
        row(2, "360", "Retained Profits", AccountType::Equity, dec!(200)),
        row(3, "300", "Owner's Equity", AccountType::Equity, dec!(700)),
        row(4, "400", "Sales Revenue", AccountType::Revenue, dec!(300)),
    ];

    let sheet = ReportService::generate_balance_sheet(as_of(), &accounts);

    assert_eq!(sheet.equity.accounts.len(), 2);
    assert!(sheet.equity.accounts.iter().all(|l| l.account_code != "350"));
    assert_eq!(sheet.equity.total_equity, dec!(900));
}

#[test]
fn test_balance_sheet_no_retained_line_when_income_is_zero() {
    let accounts = vec![
        row(1, "100", "Cash", AccountType::Asset, dec!(100)),
        row(2, "300", "Owner's Equity", AccountType::Equity, dec!(100)),
        row(3, "400", "Sales Revenue", AccountType::Revenue, dec!(500)),
        row(4, "500", "Cost of Goods Sold", AccountType::Expense, dec!(500)),
    ];

    let sheet = ReportService::generate_balance_sheet(as_of(), &accounts);

    assert_eq!(sheet.equity.accounts.len(), 1);
}

#[test]
fn test_empty_ledger_balance_sheet() {
    let sheet = ReportService::generate_balance_sheet(as_of(), &[]);
    assert_eq!(sheet.assets.total_assets, Decimal::ZERO);
    assert!(sheet.equity.accounts.is_empty());
    assert!(sheet.is_balanced);
}

// ============================================================================
// Trial balance and income statement
// ============================================================================

#[test]
fn test_trial_balance_totals() {
    let accounts = vec![
        row(1, "100", "Cash", AccountType::Asset, dec!(300)),
        row(2, "400", "Sales Revenue", AccountType::Revenue, dec!(300)),
    ];
    let report = ReportService::generate_trial_balance(as_of(), accounts);
    assert_eq!(report.totals.total_debit, dec!(300));
    assert_eq!(report.totals.total_credit, dec!(300));
    assert!(report.totals.is_balanced);
}

#[test]
fn test_income_statement() {
    let accounts = vec![
        row(1, "100", "Cash", AccountType::Asset, dec!(300)),
        row(2, "400", "Sales Revenue", AccountType::Revenue, dec!(8000)),
        row(3, "410", "Service Revenue", AccountType::Revenue, dec!(2000)),
        row(4, "500", "Cost of Goods Sold", AccountType::Expense, dec!(5000)),
        row(5, "520", "Rent Expense", AccountType::Expense, dec!(1200)),
    ];
    let report = ReportService::generate_income_statement(None, as_of(), accounts).unwrap();
    assert_eq!(report.revenue.total, dec!(10000));
    assert_eq!(report.expenses.total, dec!(6200));
    assert_eq!(report.net_income, dec!(3800));
    assert_eq!(report.revenue.accounts.len(), 2);
}

#[test]
fn test_income_statement_rejects_inverted_range() {
    let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let result = ReportService::generate_income_statement(Some(start), as_of(), vec![]);
    assert_eq!(
        result,
        Err(ReportError::InvalidDateRange {
            start,
            end: as_of(),
        })
    );
}

// ============================================================================
// Properties
// ============================================================================

fn balance() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn asset_code() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("100"), Just("110"), Just("120"), Just("150"), Just("160"), Just("170")]
}

proptest! {
    /// *For any* set of asset balances, total assets SHALL equal current plus
    /// fixed, and no zero-balance account SHALL appear.
    #[test]
    fn prop_assets_total_and_zero_skip(
        assets in prop::collection::vec((asset_code(), balance()), 0..15),
    ) {
        let accounts: Vec<_> = assets
            .iter()
            .enumerate()
            .map(|(i, (code, b))| {
                row(i32::try_from(i).unwrap(), code, "Asset", AccountType::Asset, *b)
            })
            .collect();

        let sheet = ReportService::generate_balance_sheet(as_of(), &accounts);

        prop_assert_eq!(
            sheet.assets.total_assets,
            sheet.assets.total_current_assets + sheet.assets.total_fixed_assets
        );
        let listed = sheet.assets.current_assets.iter().chain(&sheet.assets.fixed_assets);
        for line in listed {
            prop_assert!(!line.balance.is_zero());
        }
        let non_zero = accounts.iter().filter(|a| !a.balance.is_zero()).count();
        prop_assert_eq!(
            sheet.assets.current_assets.len() + sheet.assets.fixed_assets.len(),
            non_zero
        );
    }

    /// *For any* balanced ledger summarized into account balances, the
    /// balance sheet SHALL balance once retained earnings are synthesized.
    #[test]
    fn prop_balance_sheet_balances(
        capital in 1i64..1_000_000,
        sales in 0i64..1_000_000,
        costs in 0i64..1_000_000,
    ) {
        let capital = Decimal::from(capital);
        let sales = Decimal::from(sales);
        let costs = Decimal::from(costs);
        // Cash = capital + sales - costs; all other sides follow from the entries.
        let accounts = vec![
            row(1, "100", "Cash", AccountType::Asset, capital + sales - costs),
            row(2, "300", "Owner's Equity", AccountType::Equity, capital),
            row(3, "400", "Sales Revenue", AccountType::Revenue, sales),
            row(4, "500", "Cost of Goods Sold", AccountType::Expense, costs),
        ];

        let sheet = ReportService::generate_balance_sheet(as_of(), &accounts);
        prop_assert!(sheet.is_balanced);
    }
}
