//! Account balance calculations.
//!
//! A balance is never stored; it is built from the debit and credit totals
//! of posted journal lines dated on or before the as-of date, signed by the
//! account's normal side. The persistence layer aggregates those totals in
//! SQL; tests check the aggregation against an in-memory replay of the lines.

#[cfg(test)]
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::NormalBalance;

/// A journal line as seen by balance calculations.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedLine {
    /// The account the line posts to.
    pub account_id: i32,
    /// Date of the owning journal entry.
    pub entry_date: NaiveDate,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Whether the owning entry is posted.
    pub is_posted: bool,
}

/// Account balance at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: i32,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Net balance, signed by the account's normal side.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Builds a balance from pre-aggregated totals.
    #[must_use]
    pub fn from_totals(
        account_id: i32,
        normal: NormalBalance,
        debit_total: Decimal,
        credit_total: Decimal,
    ) -> Self {
        Self {
            account_id,
            debit_total,
            credit_total,
            balance: normal.calculate_balance_change(debit_total, credit_total),
        }
    }
}

#[cfg(test)]
impl AccountBalance {
    /// Replays `lines` for one account up to and including `as_of`.
    ///
    /// Lines of other accounts, unposted lines, and lines dated after `as_of`
    /// are ignored.
    #[must_use]
    pub fn replay(
        account_id: i32,
        normal: NormalBalance,
        lines: &[PostedLine],
        as_of: NaiveDate,
    ) -> Self {
        Self::replay_range(account_id, normal, lines, None, as_of)
    }

    /// Replays `lines` for one account over an inclusive date range.
    #[must_use]
    pub fn replay_range(
        account_id: i32,
        normal: NormalBalance,
        lines: &[PostedLine],
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Self {
        let (debit_total, credit_total) = lines
            .iter()
            .filter(|l| l.account_id == account_id && l.is_posted && l.entry_date <= to)
            .filter(|l| from.is_none_or(|from| l.entry_date >= from))
            .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), l| {
                (d + l.debit, c + l.credit)
            });
        Self::from_totals(account_id, normal, debit_total, credit_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn line(account_id: i32, day: u32, debit: Decimal, credit: Decimal) -> PostedLine {
        PostedLine {
            account_id,
            entry_date: date(day),
            debit,
            credit,
            is_posted: true,
        }
    }

    #[test]
    fn test_asset_balance_is_debits_minus_credits() {
        let lines = vec![line(1, 1, dec!(500), dec!(0)), line(1, 2, dec!(0), dec!(200))];
        let balance = AccountBalance::replay(1, NormalBalance::Debit, &lines, date(31));
        assert_eq!(balance.balance, dec!(300));
        assert_eq!(balance.debit_total, dec!(500));
        assert_eq!(balance.credit_total, dec!(200));
    }

    #[test]
    fn test_revenue_balance_is_credits_minus_debits() {
        let lines = vec![line(4, 1, dec!(500), dec!(0)), line(4, 2, dec!(0), dec!(200))];
        let balance = AccountBalance::replay(4, NormalBalance::Credit, &lines, date(31));
        assert_eq!(balance.balance, dec!(-300));
    }

    #[test]
    fn test_lines_after_as_of_are_ignored() {
        let lines = vec![line(1, 5, dec!(100), dec!(0)), line(1, 6, dec!(50), dec!(0))];
        let balance = AccountBalance::replay(1, NormalBalance::Debit, &lines, date(5));
        assert_eq!(balance.balance, dec!(100));
    }

    #[test]
    fn test_unposted_and_foreign_lines_are_ignored() {
        let mut unposted = line(1, 1, dec!(70), dec!(0));
        unposted.is_posted = false;
        let lines = vec![unposted, line(2, 1, dec!(30), dec!(0))];
        let balance = AccountBalance::replay(1, NormalBalance::Debit, &lines, date(31));
        assert_eq!(balance.balance, Decimal::ZERO);
    }

    #[test]
    fn test_replay_range_excludes_earlier_lines() {
        let lines = vec![line(4, 1, dec!(0), dec!(100)), line(4, 10, dec!(0), dec!(40))];
        let balance =
            AccountBalance::replay_range(4, NormalBalance::Credit, &lines, Some(date(2)), date(31));
        assert_eq!(balance.balance, dec!(40));
    }
}
