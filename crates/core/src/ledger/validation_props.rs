//! Property-based tests for journal line validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::JournalLineInput;
use super::error::LedgerError;
use super::validation::validate_lines;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

/// Strategy to generate a list of debit amounts whose sum is then credited.
fn amounts(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(positive_amount(), 1..=max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Double-entry: accepted entries balance, unbalanced entries are rejected
    // =========================================================================

    /// *For any* set of debits offset by one credit of their sum, validation
    /// SHALL accept the entry and report equal totals.
    #[test]
    fn prop_balanced_entries_accepted(debits in amounts(10)) {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<_> = debits
            .iter()
            .enumerate()
            .map(|(i, amount)| JournalLineInput::debit(i32::try_from(i).unwrap() + 1, *amount))
            .collect();
        lines.push(JournalLineInput::credit(100, total));

        let totals = validate_lines(&lines).unwrap();
        prop_assert_eq!(totals.total_debit, totals.total_credit);
        prop_assert_eq!(totals.total_debit, total);
    }

    /// *For any* entry whose credit differs from its debit by a non-zero
    /// amount, validation SHALL reject it with both totals.
    #[test]
    fn prop_unbalanced_entries_rejected(
        debit in positive_amount(),
        delta in positive_amount(),
    ) {
        let lines = vec![
            JournalLineInput::debit(1, debit),
            JournalLineInput::credit(2, debit + delta),
        ];
        prop_assert_eq!(
            validate_lines(&lines),
            Err(LedgerError::UnbalancedEntry { debit, credit: debit + delta })
        );
    }

    /// *For any* line with a negative side, validation SHALL reject it.
    #[test]
    fn prop_negative_amounts_rejected(
        negative in negative_amount(),
        other in positive_amount(),
    ) {
        let lines = vec![
            JournalLineInput::debit(1, negative),
            JournalLineInput::credit(2, other),
        ];
        prop_assert_eq!(validate_lines(&lines), Err(LedgerError::NegativeAmount));
    }

    /// *For any* line carrying both sides, validation SHALL reject it even if
    /// the entry would balance.
    #[test]
    fn prop_double_sided_lines_rejected(amount in positive_amount()) {
        let mut both = JournalLineInput::debit(1, amount);
        both.credit = amount;
        let lines = vec![
            both,
            JournalLineInput::debit(2, amount),
            JournalLineInput::credit(3, amount),
        ];
        prop_assert_eq!(validate_lines(&lines), Err(LedgerError::DoubleSidedLine));
    }
}
