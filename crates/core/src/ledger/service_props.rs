//! Property-based tests for balance calculation.
//!
//! - Sign convention per account type
//! - As-of filtering
//! - Replay agrees with pre-aggregated totals

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::account::{AccountType, NormalBalance};
use super::balance::{AccountBalance, PostedLine};

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn account_type() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Asset),
        Just(AccountType::Liability),
        Just(AccountType::Equity),
        Just(AccountType::Revenue),
        Just(AccountType::Expense),
    ]
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

/// (day offset, debit?, amount)
fn lines() -> impl Strategy<Value = Vec<(i64, bool, Decimal)>> {
    prop::collection::vec((0i64..60, any::<bool>(), amount()), 0..30)
}

fn to_posted(raw: &[(i64, bool, Decimal)]) -> Vec<PostedLine> {
    raw.iter()
        .map(|(offset, is_debit, amount)| PostedLine {
            account_id: 1,
            entry_date: base_date() + Duration::days(*offset),
            debit: if *is_debit { *amount } else { Decimal::ZERO },
            credit: if *is_debit { Decimal::ZERO } else { *amount },
            is_posted: true,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* debit and credit totals, a debit-normal account SHALL report
    /// debits - credits and a credit-normal account credits - debits.
    #[test]
    fn prop_sign_convention(
        account_type in account_type(),
        debit in amount(),
        credit in amount(),
    ) {
        let balance = AccountBalance::from_totals(1, account_type.normal_balance(), debit, credit);
        let expected = match account_type {
            AccountType::Asset | AccountType::Expense => debit - credit,
            _ => credit - debit,
        };
        prop_assert_eq!(balance.balance, expected);
    }

    /// *For any* line set and as-of date, replay SHALL equal aggregating only
    /// the lines dated on or before the as-of date.
    #[test]
    fn prop_replay_respects_as_of(raw in lines(), cutoff in 0i64..60) {
        let posted = to_posted(&raw);
        let as_of = base_date() + Duration::days(cutoff);
        let replayed = AccountBalance::replay(1, NormalBalance::Debit, &posted, as_of);

        let (debit, credit) = raw
            .iter()
            .filter(|(offset, _, _)| *offset <= cutoff)
            .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), (_, is_debit, a)| {
                if *is_debit { (d + a, c) } else { (d, c + a) }
            });
        prop_assert_eq!(replayed, AccountBalance::from_totals(1, NormalBalance::Debit, debit, credit));
    }

    /// *For any* line set, the debit-normal and credit-normal balances SHALL
    /// be negations of each other.
    #[test]
    fn prop_normal_sides_are_opposite(raw in lines()) {
        let posted = to_posted(&raw);
        let as_of = base_date() + Duration::days(60);
        let debit_side = AccountBalance::replay(1, NormalBalance::Debit, &posted, as_of);
        let credit_side = AccountBalance::replay(1, NormalBalance::Credit, &posted, as_of);
        prop_assert_eq!(debit_side.balance, -credit_side.balance);
    }
}

// ============================================================================
// Worked examples: $500 debited, $200 credited
// ============================================================================

#[test]
fn test_asset_with_500_debit_200_credit_is_300() {
    let balance = AccountBalance::from_totals(1, AccountType::Asset.normal_balance(), dec!(500), dec!(200));
    assert_eq!(balance.balance, dec!(300));
}

#[test]
fn test_revenue_with_500_debit_200_credit_is_minus_300() {
    let balance =
        AccountBalance::from_totals(1, AccountType::Revenue.normal_balance(), dec!(500), dec!(200));
    assert_eq!(balance.balance, dec!(-300));
}
